//! Module entry points: `handler`, `introspection` and `version`.

use misp_standard::Event;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::client::GeoLookup;
use crate::config::MODULE_CONFIG;
use crate::error::Result;
use crate::mapping;
use crate::request::{IpAttributeType, Request};

/// Relationship from the geolocation object to the input attribute.
pub const REFERENCE_RELATION: &str = "locates";

/// Output format descriptor advertised to the platform.
pub const OUTPUT_FORMAT: &str = "misp_standard";

/// Supported input types and output format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Introspection {
    pub input: Vec<&'static str>,
    pub format: &'static str,
}

/// Module metadata reported by [`version`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    pub version: &'static str,
    pub author: &'static str,
    pub description: &'static str,
    #[serde(rename = "module-type")]
    pub module_type: Vec<&'static str>,
    pub config: Vec<&'static str>,
}

#[must_use]
pub fn introspection() -> Introspection {
    Introspection {
        input: IpAttributeType::ALL.iter().map(|t| t.as_str()).collect(),
        format: OUTPUT_FORMAT,
    }
}

#[must_use]
pub fn version() -> ModuleInfo {
    ModuleInfo {
        version: "1",
        author: "IpGeolocation",
        description: "Querry Using IpGeolocation.io",
        module_type: vec!["expansion", "hover"],
        config: MODULE_CONFIG.to_vec(),
    }
}

/// Handle one raw enrichment request.
///
/// Returns `false` when there is no input, otherwise either
/// `{"results": {...}}` or `{"error": "..."}`. Failures never escape as
/// Rust errors.
pub fn handler<L: GeoLookup + ?Sized>(q: Option<&str>, lookup: &L) -> Value {
    let Some(q) = q else {
        return Value::Bool(false);
    };

    match enrich(q, lookup) {
        Ok(results) => json!({ "results": results }),
        Err(err) => {
            debug!(error = %err, "enrichment failed");
            err.to_payload()
        }
    }
}

/// Validate `q`, query the provider and build the result sections.
///
/// # Errors
///
/// Any validation, remote or serialization failure, in the order the checks
/// run.
pub fn enrich<L: GeoLookup + ?Sized>(q: &str, lookup: &L) -> Result<Value> {
    let request = Request::parse(q)?;
    debug!(ip = request.ip(), kind = %request.attribute_type, "enriching attribute");

    let record = lookup.lookup(&request.api_key, request.ip())?;
    record.ensure_located()?;

    let mut object = mapping::build_object(&record)?;
    object.add_reference(request.attribute.uuid, REFERENCE_RELATION);

    let mut event = Event::new();
    event.add_attribute(request.attribute);
    event.add_object(object);

    Ok(serde_json::to_value(event.sections())?)
}
