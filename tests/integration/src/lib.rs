//! Integration tests for ska signing.
//!
//! `test_compat` pins base strings and signatures shared with the other
//! signer implementations. `test_tamper` and `test_shortcuts` drive
//! complete sign, transport and validate cycles.
//!
//! Run them with:
//! ```text
//! cargo test -p ska-integration
//! ```

use std::sync::Once;

use serde_json::Value;
use ska_auth::canonical::{ExtraData, RequestData};
use ska_auth::request::parse_query;

static INIT: Once = Once::new();

/// Acting user of the shared compatibility vectors.
pub const AUTH_USER: &str = "me@example.com";

/// Secret key of the shared compatibility vectors.
pub const SECRET_KEY: &str = "UxuhnPaO4vKA";

/// Expiry of the shared compatibility vectors.
pub const VALID_UNTIL: &str = "1628717009.0";

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Build an extra payload from pairs.
#[must_use]
pub fn extra(pairs: &[(&str, Value)]) -> ExtraData {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect()
}

/// Request data carried by the query string of a signed URL.
#[must_use]
pub fn query_data(url: &str) -> RequestData {
    url.split_once('?')
        .map(|(_, query)| parse_query(query))
        .unwrap_or_default()
}

mod test_compat;
mod test_shortcuts;
mod test_tamper;
