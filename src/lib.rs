//! The ipgeo-expansion library: enrich IP address attributes with
//! ipgeolocation.io data.
//!
//! A request names an `ip-src` or `ip-dst` attribute and carries the API key
//! in its `config`. The handler queries ipgeolocation.io once and returns the
//! input attribute together with an `ip-api-address` object that `locates`
//! it, in MISP standard format.
//!
//! # Examples
//!
//! Running a request against a canned lookup:
//!
//! ```rust
//! use ipgeo_expansion::{handler, GeoLookup, GeoRecord, Result};
//! use serde_json::json;
//!
//! struct Canned;
//!
//! impl GeoLookup for Canned {
//!     fn lookup(&self, _api_key: &str, ip: &str) -> Result<GeoRecord> {
//!         let reply = json!({
//!             "ip": ip,
//!             "isp": "Google LLC",
//!             "asn": "AS15169",
//!             "organization": "Google LLC",
//!             "city": "Mountain View",
//!             "state_prov": "California",
//!             "zipcode": "94043-1351",
//!             "country_name": "United States",
//!             "country_code2": "US",
//!             "continent_name": "North America",
//!             "continent_code": "NA",
//!             "latitude": "37.42240",
//!             "longitude": "-122.08421"
//!         });
//!         Ok(serde_json::from_value(reply).unwrap())
//!     }
//! }
//!
//! let request = json!({
//!     "config": {"apiKey": "secret"},
//!     "attribute": {"type": "ip-dst", "value": "8.8.8.8"}
//! })
//! .to_string();
//!
//! let response = handler(Some(request.as_str()), &Canned);
//! let object = &response["results"]["Object"][0];
//! assert_eq!(object["name"], "ip-api-address");
//! assert_eq!(object["Attribute"].as_array().unwrap().len(), 13);
//! assert_eq!(object["ObjectReference"][0]["relationship_type"], "locates");
//! ```
//!
//! Against the live service, use [`IpGeolocationClient`]:
//!
//! ```rust,no_run
//! use ipgeo_expansion::{handler, ClientConfig, IpGeolocationClient};
//!
//! let client = IpGeolocationClient::new(&ClientConfig::default());
//! let request = r#"{"config": {"apiKey": "KEY"}, "attribute": {"type": "ip-src", "value": "1.1.1.1"}}"#;
//! println!("{}", handler(Some(request), &client));
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod input;
pub mod logging;
pub mod mapping;
pub mod request;

pub use crate::client::{GeoLookup, GeoRecord, IpGeolocationClient};
pub use crate::config::{ClientConfig, ModuleConfig};
pub use crate::error::{Error, Result};
pub use crate::handler::{enrich, handler, introspection, version};
pub use crate::request::{IpAttributeType, Request};
