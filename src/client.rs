//! ipgeolocation.io lookups.
//!
//! [`GeoLookup`] is the seam between the request handler and the network:
//! [`IpGeolocationClient`] implements it over HTTP, tests implement it with
//! canned records.

use misp_standard::scalar;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};
use ureq::http::StatusCode;
use ureq::{Agent, Proxy};

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// A decoded ipgeolocation.io reply.
///
/// The provider returns a flat JSON object; on failure it carries a
/// `message` field instead of location data.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct GeoRecord(Map<String, Value>);

impl GeoRecord {
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The provider's error message, if any. Any truthy `message` counts,
    /// whatever its JSON type.
    #[must_use]
    pub fn message(&self) -> Option<&Value> {
        self.0.get("message").filter(|m| scalar::is_truthy(m))
    }

    /// Reject replies that carry a `message` instead of location data.
    ///
    /// # Errors
    ///
    /// [`Error::Bogon`] when the message mentions a bogon address,
    /// [`Error::Extraction`] for any other message.
    pub fn ensure_located(&self) -> Result<()> {
        match self.message() {
            Some(Value::String(message)) if message.contains("bogon") => Err(Error::Bogon),
            Some(message) => Err(Error::Extraction {
                message: scalar::to_text(message).unwrap_or_else(|| message.to_string()),
            }),
            None => Ok(()),
        }
    }
}

/// Source of geolocation records for an IP address.
pub trait GeoLookup {
    /// Query geolocation data for `ip` using `api_key`.
    ///
    /// # Errors
    ///
    /// [`Error::Status`] for non-200 replies and [`Error::Query`] when the
    /// exchange or decoding fails.
    fn lookup(&self, api_key: &str, ip: &str) -> Result<GeoRecord>;
}

impl<L: GeoLookup + ?Sized> GeoLookup for &L {
    fn lookup(&self, api_key: &str, ip: &str) -> Result<GeoRecord> {
        (**self).lookup(api_key, ip)
    }
}

/// Blocking HTTP client for the ipgeolocation.io `ipgeo` endpoint.
pub struct IpGeolocationClient {
    agent: Agent,
    base_url: String,
}

impl Default for IpGeolocationClient {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

impl IpGeolocationClient {
    pub fn new(config: &ClientConfig) -> Self {
        let proxy = if config.proxy_from_env {
            Proxy::try_from_env()
        } else {
            None
        };

        // Non-2xx replies are inspected, not turned into transport errors.
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .proxy(proxy)
            .build()
            .into();

        Self {
            agent,
            base_url: config.base_url.clone(),
        }
    }
}

impl GeoLookup for IpGeolocationClient {
    fn lookup(&self, api_key: &str, ip: &str) -> Result<GeoRecord> {
        debug!(ip, base_url = %self.base_url, "querying ipgeolocation.io");

        let mut resp = self
            .agent
            .get(&self.base_url)
            .query("apiKey", api_key)
            .query("ip", ip)
            .call()
            .map_err(|source| {
                warn!(ip, "ipgeolocation.io request failed: {}", source);
                Error::Query { source }
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
            warn!(ip, code = status.as_u16(), %reason, "ipgeolocation.io returned an error status");
            return Err(Error::Status {
                code: status.as_u16(),
                reason,
            });
        }

        let record: GeoRecord = resp.body_mut().read_json().map_err(|source| {
            warn!(ip, "ipgeolocation.io response could not be decoded: {}", source);
            Error::Query { source }
        })?;

        trace!(ip, ?record, "ipgeolocation.io response");
        Ok(record)
    }
}
