//! Common type definitions shared by the signer and the validator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::SkaError;

/// Signature lifetime in seconds used when no `valid_until` is given.
pub const SIGNATURE_LIFETIME: u64 = 600;

/// Default name of the param holding the generated signature value.
pub const DEFAULT_SIGNATURE_PARAM: &str = "signature";

/// Default name of the param holding the `auth_user` value.
pub const DEFAULT_AUTH_USER_PARAM: &str = "auth_user";

/// Default name of the param holding the `valid_until` value.
pub const DEFAULT_VALID_UNTIL_PARAM: &str = "valid_until";

/// Default name of the param holding the comma-separated extra keys.
pub const DEFAULT_EXTRA_PARAM: &str = "extra";

/// Default name of the param selecting a secret key provider.
pub const DEFAULT_PROVIDER_PARAM: &str = "provider";

/// Default separator between an endpoint URL and the signed params.
pub const DEFAULT_URL_SUFFIX: &str = "?";

/// HMAC variant used to compute signatures.
///
/// All variants share the same base string construction and differ only in
/// the digest algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    /// HMAC with MD5.
    #[serde(rename = "HMAC-MD5")]
    HmacMd5,
    /// HMAC with SHA-1.
    #[default]
    #[serde(rename = "HMAC-SHA1")]
    HmacSha1,
    /// HMAC with SHA-224.
    #[serde(rename = "HMAC-SHA224")]
    HmacSha224,
    /// HMAC with SHA-256.
    #[serde(rename = "HMAC-SHA256")]
    HmacSha256,
    /// HMAC with SHA-384.
    #[serde(rename = "HMAC-SHA384")]
    HmacSha384,
    /// HMAC with SHA-512.
    #[serde(rename = "HMAC-SHA512")]
    HmacSha512,
}

impl SignatureAlgorithm {
    /// Every supported algorithm, weakest digest first.
    pub const ALL: [Self; 6] = [
        Self::HmacMd5,
        Self::HmacSha1,
        Self::HmacSha224,
        Self::HmacSha256,
        Self::HmacSha384,
        Self::HmacSha512,
    ];

    /// Canonical name, e.g. `HMAC-SHA256`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HmacMd5 => "HMAC-MD5",
            Self::HmacSha1 => "HMAC-SHA1",
            Self::HmacSha224 => "HMAC-SHA224",
            Self::HmacSha256 => "HMAC-SHA256",
            Self::HmacSha384 => "HMAC-SHA384",
            Self::HmacSha512 => "HMAC-SHA512",
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = SkaError;

    /// Parse an algorithm name. Case, `-` and `_` are ignored and the `HMAC`
    /// prefix is optional, so `hmac_sha256`, `HMAC-SHA256` and `sha256` are
    /// all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();
        let digest = normalized.strip_prefix("HMAC").unwrap_or(&normalized);

        match digest {
            "MD5" => Ok(Self::HmacMd5),
            "SHA1" => Ok(Self::HmacSha1),
            "SHA224" => Ok(Self::HmacSha224),
            "SHA256" => Ok(Self::HmacSha256),
            "SHA384" => Ok(Self::HmacSha384),
            "SHA512" => Ok(Self::HmacSha512),
            _ => Err(SkaError::UnknownAlgorithm(s.to_owned())),
        }
    }
}

/// Names of the fields a signature occupies on the wire.
///
/// Integrators can rename any field; signer and validator must agree.
///
/// # Examples
///
/// ```
/// use ska_core::WireParams;
///
/// let params = WireParams::builder().signature_param("sig").build();
/// assert_eq!(params.signature_param, "sig");
/// assert_eq!(params.auth_user_param, "auth_user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct WireParams {
    /// Field holding the base64 signature.
    #[builder(default = String::from(DEFAULT_SIGNATURE_PARAM), setter(into))]
    pub signature_param: String,

    /// Field holding the acting user.
    #[builder(default = String::from(DEFAULT_AUTH_USER_PARAM), setter(into))]
    pub auth_user_param: String,

    /// Field holding the expiry Unix timestamp.
    #[builder(default = String::from(DEFAULT_VALID_UNTIL_PARAM), setter(into))]
    pub valid_until_param: String,

    /// Field holding the comma-separated, sorted list of signed extra keys.
    #[builder(default = String::from(DEFAULT_EXTRA_PARAM), setter(into))]
    pub extra_param: String,

    /// Field naming the secret key provider, looked up among the request data.
    #[builder(default = String::from(DEFAULT_PROVIDER_PARAM), setter(into))]
    pub provider_param: String,
}

impl Default for WireParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WireParams {
    /// Whether `key` is one of the fields carrying the signature itself.
    ///
    /// Extra keys must not use these names.
    #[must_use]
    pub fn is_reserved(&self, key: &str) -> bool {
        key == self.signature_param
            || key == self.auth_user_param
            || key == self.valid_until_param
            || key == self.extra_param
    }
}
