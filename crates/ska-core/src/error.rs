//! Error types for ska signing.
//!
//! A signature that simply does not match is not an error: it is reported
//! through [`SignatureValidationResult`](crate::SignatureValidationResult).
//! [`SkaError`] covers misuse and malformed input only.

/// Error type for signing, validation and extraction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkaError {
    /// The caller did not configure something required (e.g. a secret key
    /// when validation was demanded).
    #[error("improperly configured: {0}")]
    ImproperlyConfigured(String),

    /// Signed data failed validation when the caller demanded it.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A timestamp could not be parsed or is out of the representable range.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The offending input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The signature lifetime does not fit into the supported time range.
    #[error("invalid signature lifetime: {0} seconds")]
    InvalidLifetime(u64),

    /// An extra key cannot be placed on the wire.
    #[error("invalid extra key {0:?}: empty, contains ',' or collides with a reserved param")]
    InvalidExtraKey(String),

    /// The requested signature algorithm is not supported.
    #[error("unknown signature algorithm: {0}")]
    UnknownAlgorithm(String),

    /// The request names a provider that has no secret key configured.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// Configuration error while loading settings.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SkaError {
    /// Build an [`SkaError::InvalidTimestamp`] for the given input.
    pub fn invalid_timestamp(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience result type for ska operations.
pub type SkaResult<T> = Result<T, SkaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_format_invalid_timestamp() {
        let err = SkaError::invalid_timestamp("abc", "not a number");
        assert_eq!(err.to_string(), "invalid timestamp \"abc\": not a number");
    }

    #[test]
    fn test_should_format_improperly_configured() {
        let err = SkaError::ImproperlyConfigured("missing secret key".to_owned());
        assert_eq!(err.to_string(), "improperly configured: missing secret key");
    }
}
