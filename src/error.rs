use serde_json::{json, Value};

/// Error types for the ipgeo-expansion library.
///
/// The `Display` text of each variant is the message handed back to the
/// enrichment platform in an `{"error": ...}` payload.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request carries no `config` object.
    #[error("IpGeolocation Configuration is missing")]
    ConfigMissing,

    /// The `config` object has no usable `apiKey`.
    #[error("IpGeolocation apiKey is missing")]
    ApiKeyMissing,

    /// The attribute type is not one this module can enrich.
    #[error("Unsupported attribute type.")]
    UnsupportedAttributeType { kind: String },

    /// The request envelope is not valid JSON or lacks required fields.
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// The input attribute could not be built.
    #[error("Invalid request: {0}")]
    Model(#[from] misp_standard::Error),

    /// ipgeolocation.io answered with a non-200 status.
    #[error("Error while querying ipGeolocation.io - {code}: {reason}")]
    Status { code: u16, reason: String },

    /// The address is a bogon and has no geolocation.
    #[error("The IP address(bogon IP) is reserved for special use")]
    Bogon,

    /// The provider returned a `message` instead of location data.
    #[error("Error Occurred during IP data Extraction from Message")]
    Extraction { message: String },

    /// The request could not be sent or the reply could not be decoded.
    #[error("Error while Querying IP Address")]
    Query {
        #[source]
        source: ureq::Error,
    },

    /// The results could not be serialized.
    #[error("Error while serializing results: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Render the error as the payload returned to the platform.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

/// Convenience type alias for Results using the library error.
pub type Result<T> = std::result::Result<T, Error>;
