//! One-call signing and validation.
//!
//! Each shortcut builds a [`RequestHelper`] from its options and delegates
//! to it.

use ska_core::{
    DEFAULT_URL_SUFFIX, SIGNATURE_LIFETIME, SignatureAlgorithm, SignatureValidationResult,
    SkaResult, WireParams,
};
use typed_builder::TypedBuilder;

use crate::canonical::{Encoding, ExtraData, RequestData};
use crate::request::RequestHelper;
use crate::signature::{Signature, generate_signature};

/// Inputs of [`sign_url`] and [`signature_to_dict`].
///
/// # Examples
///
/// ```
/// use ska_auth::shortcuts::{SignOptions, sign_url};
///
/// let options = SignOptions::builder()
///     .auth_user("user")
///     .secret_key("secret")
///     .url("http://e.com/api/")
///     .build();
/// let url = sign_url(&options).unwrap();
/// assert!(url.starts_with("http://e.com/api/?signature="));
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct SignOptions {
    /// Acting user.
    #[builder(setter(into))]
    pub auth_user: String,

    /// Shared secret key.
    #[builder(setter(into))]
    pub secret_key: String,

    /// Explicit expiry Unix timestamp. Defaults to now plus `lifetime`.
    #[builder(default, setter(strip_option, into))]
    pub valid_until: Option<String>,

    /// Lifetime in seconds, used when `valid_until` is not given.
    #[builder(default = SIGNATURE_LIFETIME)]
    pub lifetime: u64,

    /// Endpoint URL the signed params are appended to.
    #[builder(default, setter(into))]
    pub url: String,

    /// Separator between `url` and the signed params.
    #[builder(default = String::from(DEFAULT_URL_SUFFIX), setter(into))]
    pub suffix: String,

    /// Wire field names.
    #[builder(default)]
    pub params: WireParams,

    /// Extra signed payload.
    #[builder(default)]
    pub extra: ExtraData,

    /// HMAC variant.
    #[builder(default)]
    pub algorithm: SignatureAlgorithm,

    /// Value dumper and quoter.
    #[builder(default)]
    pub encoding: Encoding,
}

impl SignOptions {
    fn helper(&self) -> RequestHelper {
        RequestHelper::builder()
            .params(self.params.clone())
            .algorithm(self.algorithm)
            .encoding(self.encoding)
            .build()
    }

    fn generate(&self) -> SkaResult<Signature> {
        generate_signature(
            self.algorithm,
            &self.auth_user,
            &self.secret_key,
            self.valid_until.as_deref(),
            self.lifetime,
            &self.extra,
            self.encoding,
        )
    }
}

/// Options of [`validate_signed_request_data`] and
/// [`extract_signed_request_data`].
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct ValidationOptions {
    /// Wire field names.
    #[builder(default)]
    pub params: WireParams,

    /// HMAC variant.
    #[builder(default)]
    pub algorithm: SignatureAlgorithm,

    /// Value dumper and quoter.
    #[builder(default)]
    pub encoding: Encoding,

    /// Validate before extracting.
    #[builder(default)]
    pub validate: bool,

    /// Turn extraction errors into an empty mapping.
    #[builder(default)]
    pub fail_silently: bool,
}

impl ValidationOptions {
    fn helper(&self) -> RequestHelper {
        RequestHelper::builder()
            .params(self.params.clone())
            .algorithm(self.algorithm)
            .encoding(self.encoding)
            .build()
    }
}

/// Sign and return `url + suffix + query`.
///
/// # Errors
///
/// Signature generation errors and [`ska_core::SkaError::InvalidExtraKey`].
pub fn sign_url(options: &SignOptions) -> SkaResult<String> {
    let signature = options.generate()?;
    options
        .helper()
        .signature_to_url(&signature, &options.url, &options.suffix)
}

/// Sign and return the signed fields as a flat mapping.
///
/// # Errors
///
/// Same as [`sign_url`].
pub fn signature_to_dict(options: &SignOptions) -> SkaResult<RequestData> {
    let signature = options.generate()?;
    options.helper().signature_to_dict(&signature)
}

/// Validate signed request data.
#[must_use]
pub fn validate_signed_request_data(
    data: &RequestData,
    secret_key: &str,
    options: &ValidationOptions,
) -> SignatureValidationResult {
    options.helper().validate_request_data(data, secret_key)
}

/// Extract the signed extra payload, validating first if requested.
///
/// # Errors
///
/// See [`RequestHelper::extract_signed_data`].
pub fn extract_signed_request_data(
    data: &RequestData,
    secret_key: Option<&str>,
    options: &ValidationOptions,
) -> SkaResult<RequestData> {
    options.helper().extract_signed_data(
        data,
        secret_key,
        options.validate,
        options.fail_silently,
    )
}
