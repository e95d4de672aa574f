use std::time::Duration;

use misp_standard::scalar;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Default ipgeolocation.io lookup endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.ipgeolocation.io/ipgeo";

/// Default timeout applied to the whole HTTP exchange.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration options the module recognizes in a request's `config`.
pub const MODULE_CONFIG: &[&str] = &["apiKey"];

/// Settings for the HTTP client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Lookup endpoint; `apiKey` and `ip` are appended as query parameters.
    pub base_url: String,
    pub timeout: Duration,
    /// Route requests through the proxy named by `HTTPS_PROXY`/`HTTP_PROXY`/`ALL_PROXY`.
    pub proxy_from_env: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxy_from_env: true,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_proxy_from_env(mut self, enabled: bool) -> Self {
        self.proxy_from_env = enabled;
        self
    }
}

/// The `config` object of a request.
///
/// `apiKey` is kept as raw JSON: any falsy value counts as missing, and a
/// numeric or boolean key is sent in its textual form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    #[serde(rename = "apiKey", default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<Value>,
}

impl ModuleConfig {
    /// The API key as sent to the provider.
    ///
    /// # Errors
    ///
    /// [`Error::ApiKeyMissing`] when the key is absent or falsy, and
    /// [`Error::InvalidRequest`] when it is an array or object.
    pub fn api_key(&self) -> Result<String> {
        let key = self
            .api_key
            .as_ref()
            .filter(|k| scalar::is_truthy(k))
            .ok_or(Error::ApiKeyMissing)?;
        scalar::to_text(key).ok_or_else(|| Error::InvalidRequest {
            reason: format!("config: apiKey must be a scalar, found {key}"),
        })
    }
}
