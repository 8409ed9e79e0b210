//! Core types, error codes, and configuration for ska request signing.
//!
//! This crate provides the building blocks shared by the signing engine and
//! the command-line tools: the error taxonomy, the validation result type,
//! the supported signature algorithms, the wire field names, and the
//! environment-driven configuration.

mod config;
mod error;
mod types;
mod validation;

pub use config::SkaConfig;
pub use error::{SkaError, SkaResult};
pub use types::{
    DEFAULT_AUTH_USER_PARAM, DEFAULT_EXTRA_PARAM, DEFAULT_PROVIDER_PARAM, DEFAULT_SIGNATURE_PARAM,
    DEFAULT_URL_SUFFIX, DEFAULT_VALID_UNTIL_PARAM, SIGNATURE_LIFETIME, SignatureAlgorithm,
    WireParams,
};
pub use validation::{ErrorCode, SignatureValidationResult};
