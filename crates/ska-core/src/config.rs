//! Configuration management for ska tools.
//!
//! All configuration is driven by environment variables prefixed with `SKA_`,
//! plus `LOG_LEVEL`.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{SkaError, SkaResult};
use crate::types::{SIGNATURE_LIFETIME, SignatureAlgorithm, WireParams};

/// Default `auth_user` used when signing without an explicit user.
const DEFAULT_AUTH_USER: &str = "ska-auth-user";

/// Global configuration for signing and validation.
///
/// # Examples
///
/// ```
/// use ska_core::{SignatureAlgorithm, SkaConfig};
///
/// let config = SkaConfig::default();
/// assert_eq!(config.signature_lifetime, 600);
/// assert_eq!(config.signature_algorithm, SignatureAlgorithm::HmacSha1);
/// assert!(config.secret_key.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct SkaConfig {
    /// Shared secret key. Required for signing and validating.
    #[builder(default, setter(strip_option, into))]
    pub secret_key: Option<String>,

    /// Default acting user when none is given.
    #[builder(default = String::from(DEFAULT_AUTH_USER), setter(into))]
    pub auth_user: String,

    /// Signature lifetime in seconds.
    #[builder(default = SIGNATURE_LIFETIME)]
    pub signature_lifetime: u64,

    /// HMAC variant.
    #[builder(default)]
    pub signature_algorithm: SignatureAlgorithm,

    /// Wire field names.
    #[builder(default)]
    pub params: WireParams,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("warn"), setter(into))]
    pub log_level: String,
}

impl Default for SkaConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SkaConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`SkaError::Config`] if a variable is present but malformed.
    pub fn from_env() -> SkaResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SkaResult<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("SKA_SECRET_KEY") {
            config.secret_key = Some(v);
        }
        if let Some(v) = lookup("SKA_AUTH_USER") {
            config.auth_user = v;
        }
        if let Some(v) = lookup("SKA_SIGNATURE_LIFETIME") {
            config.signature_lifetime = v.trim().parse().map_err(|_| {
                SkaError::Config(format!(
                    "SKA_SIGNATURE_LIFETIME must be a non-negative integer, got {v:?}"
                ))
            })?;
        }
        if let Some(v) = lookup("SKA_SIGNATURE_ALGORITHM") {
            config.signature_algorithm = v
                .parse()
                .map_err(|e: SkaError| SkaError::Config(e.to_string()))?;
        }
        if let Some(v) = lookup("SKA_SIGNATURE_PARAM") {
            config.params.signature_param = v;
        }
        if let Some(v) = lookup("SKA_AUTH_USER_PARAM") {
            config.params.auth_user_param = v;
        }
        if let Some(v) = lookup("SKA_VALID_UNTIL_PARAM") {
            config.params.valid_until_param = v;
        }
        if let Some(v) = lookup("SKA_EXTRA_PARAM") {
            config.params.extra_param = v;
        }
        if let Some(v) = lookup("SKA_PROVIDER_PARAM") {
            config.params.provider_param = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        Ok(config)
    }
}
