//! ska-sign-url - print a signed URL.
//!
//! # Usage
//!
//! ```text
//! ska-sign-url --auth-user user --secret-key test --url http://e.com/api/
//! ska-sign-url --auth-user user --extra email=user@example.com --algorithm sha256
//! ```
//!
//! The signed URL goes to stdout. Logs and errors go to stderr.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SKA_SECRET_KEY` | *(unset)* | Secret key when `--secret-key` is absent |
//! | `SKA_AUTH_USER` | `ska-auth-user` | User when `--auth-user` is absent |
//! | `SKA_SIGNATURE_LIFETIME` | `600` | Lifetime when `--lifetime` is absent |
//! | `SKA_SIGNATURE_ALGORITHM` | `HMAC-SHA1` | Algorithm when `--algorithm` is absent |
//! | `SKA_*_PARAM` | *(field name)* | Wire field names |
//! | `LOG_LEVEL` | `warn` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde_json::Value;
use ska_auth::canonical::{Encoding, ExtraData};
use ska_auth::shortcuts::{SignOptions, sign_url};
use ska_core::{DEFAULT_URL_SUFFIX, SignatureAlgorithm, SkaConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "ska-sign-url", version, about = "Generate a signed URL.")]
struct Args {
    /// Acting user.
    #[arg(long, value_name = "AUTH_USER")]
    auth_user: Option<String>,

    /// Shared secret key.
    #[arg(long, value_name = "SECRET_KEY")]
    secret_key: Option<String>,

    /// Expiry Unix timestamp, e.g. 1628717009.0.
    #[arg(long, value_name = "VALID_UNTIL")]
    valid_until: Option<String>,

    /// Lifetime in seconds, used without --valid-until.
    #[arg(long, value_name = "LIFETIME")]
    lifetime: Option<u64>,

    /// URL to sign.
    #[arg(long, value_name = "URL", default_value = "")]
    url: String,

    /// Separator between the URL and the signed params.
    #[arg(long, value_name = "SUFFIX", default_value = DEFAULT_URL_SUFFIX)]
    suffix: String,

    /// Param holding the signature.
    #[arg(long, value_name = "SIGNATURE_PARAM")]
    signature_param: Option<String>,

    /// Param holding the acting user.
    #[arg(long, value_name = "AUTH_USER_PARAM")]
    auth_user_param: Option<String>,

    /// Param holding the expiry timestamp.
    #[arg(long, value_name = "VALID_UNTIL_PARAM")]
    valid_until_param: Option<String>,

    /// Param holding the list of extra keys.
    #[arg(long, value_name = "EXTRA_PARAM")]
    extra_param: Option<String>,

    /// Extra signed value. Repeatable.
    #[arg(long = "extra", value_name = "KEY=VALUE", value_parser = parse_extra)]
    extra: Vec<(String, String)>,

    /// HMAC variant, e.g. HMAC-SHA256.
    #[arg(long, value_name = "ALGORITHM")]
    algorithm: Option<SignatureAlgorithm>,

    /// Use the value dumper and quoter compatible with the JavaScript signer.
    #[arg(long)]
    javascript: bool,
}

fn parse_extra(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))
}

/// Initialize the tracing subscriber on stderr.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    Ok(())
}

/// Merge command line arguments over the environment configuration.
fn build_options(args: Args, config: SkaConfig) -> Result<SignOptions> {
    let secret_key = args
        .secret_key
        .or(config.secret_key)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| anyhow!("secret key is required: pass --secret-key or set SKA_SECRET_KEY"))?;

    let mut params = config.params;
    if let Some(v) = args.signature_param {
        params.signature_param = v;
    }
    if let Some(v) = args.auth_user_param {
        params.auth_user_param = v;
    }
    if let Some(v) = args.valid_until_param {
        params.valid_until_param = v;
    }
    if let Some(v) = args.extra_param {
        params.extra_param = v;
    }

    let extra: ExtraData = args
        .extra
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    let encoding = if args.javascript {
        Encoding::javascript()
    } else {
        Encoding::default()
    };

    Ok(SignOptions {
        auth_user: args.auth_user.unwrap_or(config.auth_user),
        secret_key,
        valid_until: args.valid_until,
        lifetime: args.lifetime.unwrap_or(config.signature_lifetime),
        url: args.url,
        suffix: args.suffix,
        params,
        extra,
        algorithm: args.algorithm.unwrap_or(config.signature_algorithm),
        encoding,
    })
}

fn run(args: Args, config: SkaConfig) -> Result<String> {
    let options = build_options(args, config)?;
    debug!(
        auth_user = %options.auth_user,
        algorithm = %options.algorithm,
        extra_keys = options.extra.len(),
        "signing url"
    );
    sign_url(&options).context("failed to sign url")
}

fn main() -> ExitCode {
    let args = Args::parse();
    let result = SkaConfig::from_env()
        .context("invalid configuration")
        .and_then(|config| {
            init_tracing(&config.log_level)?;
            run(args, config)
        });

    match result {
        Ok(url) => {
            println!("{url}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
