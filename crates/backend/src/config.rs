//! Backend connection settings.

use secrecy::SecretString;
use url::Url;

/// Where the backend lives and which key to present.
///
/// The storefront uses the public (anon) key; the admin and CLI use the
/// service key, which bypasses row-level security.
#[derive(Clone)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://abcd.supabase.co`.
    pub url: Url,
    /// API key sent as both `apikey` and bearer token.
    pub api_key: SecretString,
}

impl BackendConfig {
    #[must_use]
    pub const fn new(url: Url, api_key: SecretString) -> Self {
        Self { url, api_key }
    }

    /// REST root: the base URL with `rest/v1/` appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL can't be a base (e.g. `mailto:`).
    pub fn rest_endpoint(&self) -> Result<Url, url::ParseError> {
        let mut base = self.url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join("rest/v1/")
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
