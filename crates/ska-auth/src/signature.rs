//! HMAC signature generation and validation.
//!
//! The MAC input is the base string:
//!
//! ```text
//! valid_until + "_" + auth_user [+ "_" + quote(k1=dump(v1)&k2=dump(v2)...)]
//! ```
//!
//! The signature is the standard base64 encoding of the raw MAC. All six
//! [`SignatureAlgorithm`] variants share this construction and differ only in
//! the digest.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use digest::KeyInit;
use hmac::{Hmac, Mac};
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use ska_core::{SignatureAlgorithm, SignatureValidationResult, SkaError, SkaResult};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{Encoding, ExtraData, sorted_urlencode};
use crate::timestamp::ValidUntil;

/// A generated (or reconstructed) signature and the payload it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    /// Base64 encoded MAC.
    pub signature: String,
    /// Acting user.
    pub auth_user: String,
    /// Expiry instant.
    pub valid_until: ValidUntil,
    /// Extra signed payload.
    pub extra: ExtraData,
}

impl Signature {
    /// Whether the signature has expired. Reads the clock on every call.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.valid_until.is_expired()
    }

    /// Whether the signature is expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.valid_until.is_expired_at(now)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature)
    }
}

/// Secret key bytes fed to the MAC.
#[must_use]
pub fn make_secret_key(secret_key: &str) -> Vec<u8> {
    secret_key.as_bytes().to_vec()
}

/// Build the base string the MAC is computed over.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use ska_auth::canonical::{Encoding, ExtraData};
/// use ska_auth::signature::get_base;
///
/// let base = get_base("me@example.com", "1628717009.0", &ExtraData::new(), Encoding::default());
/// assert_eq!(base, b"1628717009.0_me@example.com");
///
/// let extra: ExtraData = [("one".to_owned(), json!("1")), ("two".to_owned(), json!("2"))].into();
/// let base = get_base("me@example.com", "1628717009.0", &extra, Encoding::default());
/// assert_eq!(base, b"1628717009.0_me@example.com_one%3D1%26two%3D2");
/// ```
#[must_use]
pub fn get_base(auth_user: &str, valid_until: &str, extra: &ExtraData, encoding: Encoding) -> Vec<u8> {
    let mut base = format!("{valid_until}_{auth_user}");
    if !extra.is_empty() {
        base.push('_');
        base.push_str(&sorted_urlencode(extra, true, encoding));
    }
    base.into_bytes()
}

/// Compute the raw MAC of the base string.
///
/// # Errors
///
/// Returns [`SkaError::ImproperlyConfigured`] if the MAC rejects the key.
pub fn make_hash(
    algorithm: SignatureAlgorithm,
    auth_user: &str,
    secret_key: &str,
    valid_until: &str,
    extra: &ExtraData,
    encoding: Encoding,
) -> SkaResult<Vec<u8>> {
    let key = make_secret_key(secret_key);
    let base = get_base(auth_user, valid_until, extra, encoding);
    match algorithm {
        SignatureAlgorithm::HmacMd5 => mac::<Hmac<Md5>>(&key, &base),
        SignatureAlgorithm::HmacSha1 => mac::<Hmac<Sha1>>(&key, &base),
        SignatureAlgorithm::HmacSha224 => mac::<Hmac<Sha224>>(&key, &base),
        SignatureAlgorithm::HmacSha256 => mac::<Hmac<Sha256>>(&key, &base),
        SignatureAlgorithm::HmacSha384 => mac::<Hmac<Sha384>>(&key, &base),
        SignatureAlgorithm::HmacSha512 => mac::<Hmac<Sha512>>(&key, &base),
    }
}

/// Generate a signature.
///
/// When `valid_until` is `None` the signature expires `lifetime` seconds
/// from now. An explicit `valid_until` enters the base string verbatim.
///
/// # Errors
///
/// Returns [`SkaError::InvalidTimestamp`] for an unparsable `valid_until`,
/// [`SkaError::InvalidLifetime`] if `now + lifetime` is not representable.
///
/// # Examples
///
/// ```
/// use ska_auth::canonical::{Encoding, ExtraData};
/// use ska_auth::signature::generate_signature;
/// use ska_core::SignatureAlgorithm;
///
/// let signature = generate_signature(
///     SignatureAlgorithm::HmacSha1,
///     "me@example.com",
///     "UxuhnPaO4vKA",
///     Some("1628717009.0"),
///     600,
///     &ExtraData::new(),
///     Encoding::default(),
/// )
/// .unwrap();
/// assert_eq!(signature.valid_until.as_str(), "1628717009.0");
/// assert!(signature.is_expired());
/// ```
pub fn generate_signature(
    algorithm: SignatureAlgorithm,
    auth_user: &str,
    secret_key: &str,
    valid_until: Option<&str>,
    lifetime: u64,
    extra: &ExtraData,
    encoding: Encoding,
) -> SkaResult<Signature> {
    let valid_until = match valid_until {
        Some(raw) => ValidUntil::parse(raw)?,
        None => ValidUntil::after(lifetime)?,
    };

    let raw = make_hash(
        algorithm,
        auth_user,
        secret_key,
        valid_until.as_str(),
        extra,
        encoding,
    )?;

    debug!(
        auth_user = %auth_user,
        valid_until = %valid_until,
        algorithm = %algorithm,
        extra_keys = extra.len(),
        "Generated signature"
    );

    Ok(Signature {
        signature: BASE64.encode(raw),
        auth_user: auth_user.to_owned(),
        valid_until,
        extra: extra.clone(),
    })
}

/// Validate a presented signature against the payload it claims to cover.
///
/// The signature is re-derived from the inputs and compared in constant
/// time; expiry is judged against a fresh clock read. An empty
/// `valid_until` means no validity window was presented and fails with
/// [`ErrorCode::InvalidSignature`] only; an unparsable one fails with both
/// error codes.
///
/// [`ErrorCode::InvalidSignature`]: ska_core::ErrorCode::InvalidSignature
#[must_use]
pub fn validate_signature(
    algorithm: SignatureAlgorithm,
    signature: &str,
    auth_user: &str,
    secret_key: &str,
    valid_until: &str,
    extra: &ExtraData,
    encoding: Encoding,
) -> SignatureValidationResult {
    if valid_until.trim().is_empty() {
        debug!(auth_user = %auth_user, "No valid_until presented");
        return SignatureValidationResult::from_checks(false, false);
    }

    let expected = match generate_signature(
        algorithm,
        auth_user,
        secret_key,
        Some(valid_until),
        0,
        extra,
        encoding,
    ) {
        Ok(expected) => expected,
        Err(e) => {
            debug!(
                auth_user = %auth_user,
                valid_until = %valid_until,
                error = %e,
                "Cannot re-derive signature"
            );
            return SignatureValidationResult::from_checks(false, true);
        }
    };

    let signature_matches: bool = signature
        .as_bytes()
        .ct_eq(expected.signature.as_bytes())
        .into();
    let expired = expected.is_expired();
    let result = SignatureValidationResult::from_checks(signature_matches, expired);

    debug!(
        auth_user = %auth_user,
        valid_until = %valid_until,
        algorithm = %algorithm,
        signature_matches,
        expired,
        "Validated signature"
    );

    result
}

/// Boolean form of [`validate_signature`].
#[must_use]
pub fn verify_signature(
    algorithm: SignatureAlgorithm,
    signature: &str,
    auth_user: &str,
    secret_key: &str,
    valid_until: &str,
    extra: &ExtraData,
    encoding: Encoding,
) -> bool {
    validate_signature(
        algorithm,
        signature,
        auth_user,
        secret_key,
        valid_until,
        extra,
        encoding,
    )
    .is_valid()
}

fn mac<M: Mac + KeyInit>(key: &[u8], message: &[u8]) -> SkaResult<Vec<u8>> {
    let mut mac = <M as KeyInit>::new_from_slice(key)
        .map_err(|e| SkaError::ImproperlyConfigured(format!("invalid secret key: {e}")))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}
