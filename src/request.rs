use std::fmt;

use misp_standard::scalar::{self, is_truthy};
use misp_standard::{category_for, Attribute};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::config::ModuleConfig;
use crate::error::{Error, Result};

/// Attribute types this module accepts as input.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IpAttributeType {
    IpDst,
    IpSrc,
}

impl IpAttributeType {
    pub const ALL: [IpAttributeType; 2] = [IpAttributeType::IpDst, IpAttributeType::IpSrc];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IpAttributeType::IpDst => "ip-dst",
            IpAttributeType::IpSrc => "ip-src",
        }
    }

    #[must_use]
    pub fn parse(kind: &str) -> Option<IpAttributeType> {
        Self::ALL.into_iter().find(|t| t.as_str() == kind)
    }
}

impl fmt::Display for IpAttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fields of an input attribute the module understands. Anything else
/// in the request's `attribute` object is ignored.
#[derive(Debug, Deserialize)]
struct AttributeFields {
    #[serde(rename = "type")]
    kind: String,
    value: String,
    #[serde(default)]
    uuid: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    to_ids: Option<bool>,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default, deserialize_with = "scalar::optional_text")]
    event_id: Option<String>,
    #[serde(default, deserialize_with = "scalar::optional_text")]
    object_id: Option<String>,
    #[serde(default, deserialize_with = "scalar::optional_text")]
    distribution: Option<String>,
    #[serde(default, deserialize_with = "scalar::optional_text")]
    timestamp: Option<String>,
}

impl AttributeFields {
    fn into_attribute(self) -> Result<Attribute> {
        let category = self
            .category
            .unwrap_or_else(|| category_for(&self.kind).to_string());
        let mut attribute = Attribute::new(self.kind, self.value)
            .with_category(category)
            .with_to_ids(self.to_ids.unwrap_or(false))
            .with_comment(self.comment.unwrap_or_default());
        if let Some(uuid) = self.uuid.as_deref().filter(|u| !u.is_empty()) {
            attribute = attribute.with_uuid_str(uuid)?;
        }
        attribute.event_id = self.event_id;
        attribute.object_id = self.object_id;
        attribute.distribution = self.distribution;
        attribute.timestamp = self.timestamp;
        attribute.validate()?;
        Ok(attribute)
    }
}

/// A validated enrichment request.
#[derive(Clone, Debug)]
pub struct Request {
    pub api_key: String,
    pub attribute_type: IpAttributeType,
    /// The input attribute, ready to be placed in the result graph.
    pub attribute: Attribute,
}

impl Request {
    /// Parse and validate a JSON request envelope.
    ///
    /// Checks run in a fixed order and the first failure wins: missing
    /// `config`, missing `apiKey`, then an unsupported attribute type.
    ///
    /// # Errors
    ///
    /// Returns the validation error for the first check that fails, or
    /// [`Error::InvalidRequest`] when the envelope is not usable JSON.
    pub fn parse(q: &str) -> Result<Request> {
        let envelope: Value = serde_json::from_str(q).map_err(|e| invalid(e.to_string()))?;

        let config = envelope
            .get("config")
            .filter(|c| is_truthy(c))
            .ok_or(Error::ConfigMissing)?;
        let config = ModuleConfig::deserialize(config).map_err(|e| invalid(format!("config: {e}")))?;
        let api_key = config.api_key()?;

        let attribute = envelope
            .get("attribute")
            .filter(|a| a.is_object())
            .ok_or_else(|| invalid("attribute is missing"))?;
        let kind = attribute
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("attribute type is missing"))?;
        let attribute_type =
            IpAttributeType::parse(kind).ok_or_else(|| Error::UnsupportedAttributeType {
                kind: kind.to_string(),
            })?;

        let fields =
            AttributeFields::deserialize(attribute).map_err(|e| invalid(format!("attribute: {e}")))?;

        Ok(Request {
            api_key,
            attribute_type,
            attribute: fields.into_attribute()?,
        })
    }

    /// The IP address to look up.
    #[must_use]
    pub fn ip(&self) -> &str {
        &self.attribute.value
    }
}

/// Build a request envelope for a bare IP address.
#[must_use]
pub fn build_envelope(ip: &str, kind: IpAttributeType, api_key: Option<&str>) -> Value {
    let mut envelope = json!({
        "attribute": { "type": kind.as_str(), "value": ip },
    });
    if let Some(key) = api_key {
        envelope["config"] = json!({ "apiKey": key });
    }
    envelope
}

/// Fill in `config.apiKey` when a raw request does not carry one.
///
/// Requests that are not JSON objects, or whose `config` is set to something
/// other than an object, are returned unchanged so that validation reports
/// them as usual.
#[must_use]
pub fn apply_default_api_key(raw: &str, api_key: &str) -> String {
    let Ok(Value::Object(mut envelope)) = serde_json::from_str::<Value>(raw) else {
        return raw.to_string();
    };

    let config = envelope
        .entry("config")
        .or_insert_with(|| Value::Object(Map::new()));
    if config.is_null() {
        *config = Value::Object(Map::new());
    }
    let Some(config) = config.as_object_mut() else {
        return raw.to_string();
    };

    let has_key = config.get("apiKey").is_some_and(is_truthy);
    if !has_key {
        config.insert("apiKey".to_string(), Value::String(api_key.to_string()));
    }
    Value::Object(envelope).to_string()
}

fn invalid<S: Into<String>>(reason: S) -> Error {
    Error::InvalidRequest {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(v: Value) -> Result<Request> {
        Request::parse(&v.to_string())
    }

    #[test]
    fn missing_config_wins_over_everything() {
        let err = parse(json!({"attribute": {"type": "domain", "value": "x"}})).unwrap_err();
        assert!(matches!(err, Error::ConfigMissing));

        let err = parse(json!({"config": {}, "attribute": {"type": "ip-src", "value": "1.1.1.1"}}))
            .unwrap_err();
        assert!(matches!(err, Error::ConfigMissing));

        let err = parse(json!({"config": null})).unwrap_err();
        assert!(matches!(err, Error::ConfigMissing));
    }

    #[test]
    fn missing_api_key_before_type_check() {
        let err = parse(json!({
            "config": {"other": "x"},
            "attribute": {"type": "domain", "value": "example.com"}
        }))
        .unwrap_err();
        assert!(matches!(err, Error::ApiKeyMissing));

        let err = parse(json!({"config": {"apiKey": ""}})).unwrap_err();
        assert!(matches!(err, Error::ApiKeyMissing));

        for key in [json!(0), json!(false)] {
            let err = parse(json!({
                "config": {"apiKey": key},
                "attribute": {"type": "domain", "value": "example.com"}
            }))
            .unwrap_err();
            assert!(matches!(err, Error::ApiKeyMissing), "apiKey: {key}");
        }
    }

    #[test]
    fn numeric_api_key_is_accepted() {
        let request = parse(json!({
            "config": {"apiKey": 12345},
            "attribute": {"type": "ip-src", "value": "8.8.8.8"}
        }))
        .unwrap();
        assert_eq!(request.api_key, "12345");
    }

    #[test]
    fn unsupported_type() {
        let err = parse(json!({
            "config": {"apiKey": "k"},
            "attribute": {"type": "domain", "value": "example.com"}
        }))
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedAttributeType { ref kind } if kind == "domain"));
    }

    #[test]
    fn malformed_json_is_invalid_request() {
        let err = Request::parse("{not json").unwrap_err();
        assert!(matches!(err, Error::InvalidRequest { .. }));
        assert!(err.to_string().starts_with("Invalid request: "));
    }

    #[test]
    fn missing_attribute_or_value_is_invalid_request() {
        let err = parse(json!({"config": {"apiKey": "k"}})).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest { .. }));

        let err = parse(json!({"config": {"apiKey": "k"}, "attribute": {"type": "ip-src"}}))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest { .. }));

        let err = parse(json!({"config": {"apiKey": "k"}, "attribute": {"type": "ip-src", "value": ""}}))
            .unwrap_err();
        assert!(matches!(err, Error::Model(_)));
    }

    #[test]
    fn builds_attribute_field_by_field() {
        let request = parse(json!({
            "config": {"apiKey": "secret"},
            "attribute": {
                "type": "ip-dst",
                "value": "8.8.8.8",
                "uuid": "5b5f1b45-1c1c-4e3a-8f6e-0e2a7c8b9d10",
                "to_ids": true,
                "comment": "resolver",
                "event_id": 12,
                "unrelated": {"nested": true}
            }
        }))
        .unwrap();

        assert_eq!(request.api_key, "secret");
        assert_eq!(request.attribute_type, IpAttributeType::IpDst);
        assert_eq!(request.ip(), "8.8.8.8");
        assert_eq!(request.attribute.uuid.to_string(), "5b5f1b45-1c1c-4e3a-8f6e-0e2a7c8b9d10");
        assert_eq!(request.attribute.category, "Network activity");
        assert!(request.attribute.to_ids);
        assert_eq!(request.attribute.comment, "resolver");
        assert_eq!(request.attribute.event_id.as_deref(), Some("12"));
    }

    #[test]
    fn invalid_uuid_is_reported() {
        let err = parse(json!({
            "config": {"apiKey": "k"},
            "attribute": {"type": "ip-src", "value": "8.8.8.8", "uuid": "nope"}
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: invalid uuid: nope");
    }

    #[test]
    fn envelope_for_bare_ip() {
        let envelope = build_envelope("1.1.1.1", IpAttributeType::IpSrc, Some("k"));
        assert_eq!(
            envelope,
            json!({"config": {"apiKey": "k"}, "attribute": {"type": "ip-src", "value": "1.1.1.1"}})
        );
        let envelope = build_envelope("1.1.1.1", IpAttributeType::IpDst, None);
        assert!(envelope.get("config").is_none());
    }

    #[test]
    fn default_api_key_only_fills_gaps() {
        let filled = apply_default_api_key(r#"{"attribute": {}}"#, "fallback");
        let v: Value = serde_json::from_str(&filled).unwrap();
        assert_eq!(v["config"]["apiKey"], "fallback");

        let kept = apply_default_api_key(r#"{"config": {"apiKey": "mine"}}"#, "fallback");
        let v: Value = serde_json::from_str(&kept).unwrap();
        assert_eq!(v["config"]["apiKey"], "mine");

        assert_eq!(apply_default_api_key("garbage", "fallback"), "garbage");
        assert_eq!(apply_default_api_key(r#"{"config": "x"}"#, "fallback"), r#"{"config": "x"}"#);
    }
}
