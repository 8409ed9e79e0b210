//! Moving signatures in and out of flat request data.
//!
//! A [`Signature`] travels as a URL query string or a form body. Each field
//! takes a configurable name ([`WireParams`]):
//!
//! ```text
//! signature=<base64>&auth_user=<user>&valid_until=<ts>&extra=<k1,k2>&k1=<v1>&k2=<v2>
//! ```
//!
//! The `extra` field lists the signed keys. On the way back in, only the
//! listed keys are read, so injected fields are ignored, while editing the
//! listing itself changes the base string and invalidates the signature.

use http::Uri;
use serde_json::Value;
use ska_core::{SignatureAlgorithm, SignatureValidationResult, SkaError, SkaResult, WireParams};
use tracing::debug;
use typed_builder::TypedBuilder;

use crate::canonical::{
    Encoding, ExtraData, RequestData, dict_keys_string, extract_signed_data, parse_extra_keys,
};
use crate::credentials::SecretKeyProvider;
use crate::signature::{Signature, validate_signature};

/// Converts signatures to and from request data.
///
/// Signer and validator must be configured alike: same field names, same
/// algorithm, same encoding.
///
/// # Examples
///
/// ```
/// use ska_auth::canonical::{Encoding, ExtraData};
/// use ska_auth::request::{RequestHelper, parse_query};
/// use ska_auth::signature::generate_signature;
/// use ska_core::SignatureAlgorithm;
///
/// let helper = RequestHelper::default();
/// let signature = generate_signature(
///     SignatureAlgorithm::HmacSha1,
///     "user",
///     "secret",
///     None,
///     600,
///     &ExtraData::new(),
///     Encoding::default(),
/// )
/// .unwrap();
///
/// let url = helper.signature_to_url(&signature, "http://e.com/api/", "?").unwrap();
/// let (_, query) = url.split_once('?').unwrap();
/// let result = helper.validate_request_data(&parse_query(query), "secret");
/// assert!(result.is_valid());
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct RequestHelper {
    #[builder(default)]
    params: WireParams,
    #[builder(default)]
    algorithm: SignatureAlgorithm,
    #[builder(default)]
    encoding: Encoding,
}

impl Default for RequestHelper {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RequestHelper {
    /// Wire field names in use.
    #[must_use]
    pub fn params(&self) -> &WireParams {
        &self.params
    }

    /// Signature algorithm in use.
    #[must_use]
    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    /// Value dumper and quoter in use.
    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Append the signature to `endpoint_url` as a query string.
    ///
    /// # Errors
    ///
    /// Returns [`SkaError::InvalidExtraKey`] if an extra key is empty,
    /// contains `,` or collides with a wire field name.
    pub fn signature_to_url(
        &self,
        signature: &Signature,
        endpoint_url: &str,
        suffix: &str,
    ) -> SkaResult<String> {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.wire_pairs(signature)? {
            serializer.append_pair(&key, &value);
        }
        Ok(format!("{endpoint_url}{suffix}{}", serializer.finish()))
    }

    /// Put the signature into a flat mapping, e.g. for a POST body.
    ///
    /// # Errors
    ///
    /// Same as [`signature_to_url`](Self::signature_to_url).
    pub fn signature_to_dict(&self, signature: &Signature) -> SkaResult<RequestData> {
        Ok(self.wire_pairs(signature)?.into_iter().collect())
    }

    /// Validate request data against `secret_key`.
    ///
    /// Missing fields read as empty strings, which fail validation. A
    /// missing `valid_until` is reported as an invalid signature only.
    #[must_use]
    pub fn validate_request_data(
        &self,
        data: &RequestData,
        secret_key: &str,
    ) -> SignatureValidationResult {
        let field = |name: &str| data.get(name).map_or("", String::as_str);
        let extra: ExtraData = self
            .signed_extra(data)
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();

        validate_signature(
            self.algorithm,
            field(&self.params.signature_param),
            field(&self.params.auth_user_param),
            secret_key,
            field(&self.params.valid_until_param),
            &extra,
            self.encoding,
        )
    }

    /// Validate request data, resolving the secret from the provider field.
    ///
    /// # Errors
    ///
    /// Propagates the provider's lookup error, e.g.
    /// [`SkaError::UnknownProvider`].
    pub fn validate_request_data_with_provider(
        &self,
        data: &RequestData,
        provider: &dyn SecretKeyProvider,
    ) -> SkaResult<SignatureValidationResult> {
        let name = data.get(&self.params.provider_param).map(String::as_str);
        let secret_key = provider.get_secret_key(name)?;
        Ok(self.validate_request_data(data, &secret_key))
    }

    /// Return the signed extra payload of the request data.
    ///
    /// With `validate` set, the data is validated first. A missing secret
    /// key fails with [`SkaError::ImproperlyConfigured`] and a failed
    /// validation with [`SkaError::InvalidData`]; with `fail_silently` both
    /// yield an empty mapping instead.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn extract_signed_data(
        &self,
        data: &RequestData,
        secret_key: Option<&str>,
        validate: bool,
        fail_silently: bool,
    ) -> SkaResult<RequestData> {
        if validate {
            let Some(secret_key) = secret_key.filter(|k| !k.is_empty()) else {
                return silence(
                    fail_silently,
                    SkaError::ImproperlyConfigured(
                        "secret_key is required when validate is set".to_owned(),
                    ),
                );
            };
            let result = self.validate_request_data(data, secret_key);
            if !result.is_valid() {
                debug!(reason = %result.message(), "Rejected signed request data");
                return silence(fail_silently, SkaError::InvalidData(result.message()));
            }
        }

        Ok(self.signed_extra(data))
    }

    /// Validate with a secret resolved from the provider field and return
    /// the signed extra payload.
    ///
    /// # Errors
    ///
    /// Provider lookup errors and [`SkaError::InvalidData`], unless
    /// `fail_silently` is set.
    pub fn extract_signed_data_with_provider(
        &self,
        data: &RequestData,
        provider: &dyn SecretKeyProvider,
        fail_silently: bool,
    ) -> SkaResult<RequestData> {
        let name = data.get(&self.params.provider_param).map(String::as_str);
        match provider.get_secret_key(name) {
            Ok(secret_key) => self.extract_signed_data(data, Some(&secret_key), true, fail_silently),
            Err(e) => silence(fail_silently, e),
        }
    }

    /// Entries of `data` declared in the extra listing.
    fn signed_extra(&self, data: &RequestData) -> RequestData {
        let listing = data.get(&self.params.extra_param).map_or("", String::as_str);
        extract_signed_data(data, &parse_extra_keys(listing))
    }

    /// Wire fields in emission order: the four signature fields, then the
    /// extra entries sorted by key.
    fn wire_pairs(&self, signature: &Signature) -> SkaResult<Vec<(String, String)>> {
        self.check_extra_keys(&signature.extra)?;

        let mut pairs = vec![
            (
                self.params.signature_param.clone(),
                signature.signature.clone(),
            ),
            (
                self.params.auth_user_param.clone(),
                signature.auth_user.clone(),
            ),
            (
                self.params.valid_until_param.clone(),
                signature.valid_until.to_string(),
            ),
            (
                self.params.extra_param.clone(),
                dict_keys_string(&signature.extra),
            ),
        ];
        pairs.extend(
            signature
                .extra
                .iter()
                .map(|(k, v)| (k.clone(), self.encoding.value_dumper.dump(v))),
        );
        Ok(pairs)
    }

    fn check_extra_keys(&self, extra: &ExtraData) -> SkaResult<()> {
        match extra
            .keys()
            .find(|k| k.is_empty() || k.contains(',') || self.params.is_reserved(k))
        {
            Some(key) => Err(SkaError::InvalidExtraKey(key.clone())),
            None => Ok(()),
        }
    }
}

/// Decode an `application/x-www-form-urlencoded` query into request data.
///
/// A leading `?` is ignored. For repeated keys the last value wins.
#[must_use]
pub fn parse_query(query: &str) -> RequestData {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

/// Request data carried by the query string of `uri`.
#[must_use]
pub fn request_data_from_uri(uri: &Uri) -> RequestData {
    uri.query().map(parse_query).unwrap_or_default()
}

fn silence(fail_silently: bool, error: SkaError) -> SkaResult<RequestData> {
    if fail_silently {
        Ok(RequestData::new())
    } else {
        Err(error)
    }
}
