//! Symmetric-key signing of URLs and request data.
//!
//! A signature binds an acting user, an expiry timestamp and an optional
//! mapping of extra values to a shared secret with an HMAC. Signed values
//! travel as a query string or a form body and are validated on the way
//! back in: the MAC is re-derived, compared in constant time and the expiry
//! is checked against the clock.
//!
//! # Usage
//!
//! ```rust
//! use serde_json::json;
//! use ska_auth::request::parse_query;
//! use ska_auth::shortcuts::{
//!     SignOptions, ValidationOptions, extract_signed_request_data, sign_url,
//! };
//!
//! let options = SignOptions::builder()
//!     .auth_user("john.doe")
//!     .secret_key("your-secret-key")
//!     .url("http://e.com/api/")
//!     .extra([("email".to_owned(), json!("john.doe@mail.example.com"))].into())
//!     .build();
//! let url = sign_url(&options).unwrap();
//!
//! let (_, query) = url.split_once('?').unwrap();
//! let validation = ValidationOptions::builder().validate(true).build();
//! let extra =
//!     extract_signed_request_data(&parse_query(query), Some("your-secret-key"), &validation)
//!         .unwrap();
//! assert_eq!(extra["email"], "john.doe@mail.example.com");
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Deterministic serialization of the extra payload
//! - [`credentials`] - Secret key provider trait and in-memory implementation
//! - [`request`] - Conversion between signatures and request data
//! - [`shortcuts`] - One-call signing and validation
//! - [`signature`] - HMAC signature generation and validation
//! - [`timestamp`] - Expiry timestamps and date conversions

pub mod canonical;
pub mod credentials;
pub mod request;
pub mod shortcuts;
pub mod signature;
pub mod timestamp;

pub use canonical::{Encoding, ExtraData, Quoter, RequestData, ValueDumper};
pub use credentials::{SecretKeyProvider, StaticSecretKeyProvider};
pub use request::{RequestHelper, parse_query, request_data_from_uri};
pub use shortcuts::{
    SignOptions, ValidationOptions, extract_signed_request_data, sign_url, signature_to_dict,
    validate_signed_request_data,
};
pub use signature::{Signature, generate_signature, validate_signature, verify_signature};
pub use timestamp::ValidUntil;
