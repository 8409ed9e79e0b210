//! Secret key providers.
//!
//! A deployment may sign requests for several parties with different
//! secrets. The request names its party in the provider field and a
//! [`SecretKeyProvider`] resolves that name to a secret before validation.
//! Requests without the field use the provider's default secret.

use std::collections::HashMap;

use ska_core::{SkaError, SkaResult};

/// Trait for looking up secret keys by provider name.
///
/// Implementations may back this with a database, configuration file,
/// or any other secret store.
pub trait SecretKeyProvider: Send + Sync {
    /// Retrieve the secret key for `provider`, or the default secret when
    /// `provider` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SkaError::UnknownProvider`] if the provider is not
    /// recognized, [`SkaError::ImproperlyConfigured`] if no default secret
    /// exists.
    fn get_secret_key(&self, provider: Option<&str>) -> SkaResult<String>;
}

/// In-memory provider: one optional default secret plus named secrets.
///
/// # Examples
///
/// ```
/// use ska_auth::credentials::{SecretKeyProvider, StaticSecretKeyProvider};
///
/// let provider = StaticSecretKeyProvider::new(
///     Some("default-secret".to_owned()),
///     vec![("client-a".to_owned(), "secret-a".to_owned())],
/// );
///
/// assert_eq!(provider.get_secret_key(None).unwrap(), "default-secret");
/// assert_eq!(provider.get_secret_key(Some("client-a")).unwrap(), "secret-a");
/// assert!(provider.get_secret_key(Some("client-b")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticSecretKeyProvider {
    default: Option<String>,
    providers: HashMap<String, String>,
}

impl StaticSecretKeyProvider {
    /// Create a provider from a default secret and (provider, secret) pairs.
    pub fn new(
        default: Option<String>,
        providers: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            default,
            providers: providers.into_iter().collect(),
        }
    }

    /// A provider that only knows a single default secret.
    pub fn single(secret_key: impl Into<String>) -> Self {
        Self::new(Some(secret_key.into()), Vec::new())
    }
}

impl SecretKeyProvider for StaticSecretKeyProvider {
    fn get_secret_key(&self, provider: Option<&str>) -> SkaResult<String> {
        match provider {
            Some(name) => self
                .providers
                .get(name)
                .cloned()
                .ok_or_else(|| SkaError::UnknownProvider(name.to_owned())),
            None => self.default.clone().ok_or_else(|| {
                SkaError::ImproperlyConfigured("no default secret key configured".to_owned())
            }),
        }
    }
}
