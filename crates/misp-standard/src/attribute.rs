use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;
use crate::scalar;

/// Category assigned when the producer does not supply one.
///
/// Network observables land in `Network activity`; everything else,
/// including free text and coordinates carried by objects, is `Other`.
#[must_use]
pub fn category_for(kind: &str) -> &'static str {
    match kind {
        "ip-src" | "ip-dst" | "ip-src|port" | "ip-dst|port" | "AS" | "hostname" | "domain"
        | "port" => "Network activity",
        _ => "Other",
    }
}

/// An atomic observable such as an IP address.
///
/// Attributes appear both loose on an event and nested inside objects; in
/// the latter case `object_relation` names the slot they fill.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Stable identifier used as the target of object references.
    pub uuid: Uuid,
    /// MISP attribute type, e.g. `ip-src` or `text`.
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub value: String,
    #[serde(default)]
    pub to_ids: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_relation: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::optional_text"
    )]
    pub event_id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::optional_text"
    )]
    pub object_id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::optional_text"
    )]
    pub distribution: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::optional_text"
    )]
    pub timestamp: Option<String>,
}

impl Attribute {
    /// Create an attribute with a fresh random UUID and the default category
    /// for its type.
    pub fn new<K: Into<String>, V: Into<String>>(kind: K, value: V) -> Attribute {
        let kind = kind.into();
        Attribute {
            uuid: Uuid::new_v4(),
            category: category_for(&kind).to_string(),
            kind,
            value: value.into(),
            to_ids: false,
            object_relation: None,
            comment: String::new(),
            event_id: None,
            object_id: None,
            distribution: None,
            timestamp: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = uuid;
        self
    }

    /// Replace the generated UUID with one supplied as text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUuid`] if `uuid` does not parse.
    pub fn with_uuid_str(self, uuid: &str) -> Result<Self, Error> {
        let parsed = Uuid::parse_str(uuid).map_err(|source| Error::InvalidUuid {
            value: uuid.to_string(),
            source,
        })?;
        Ok(self.with_uuid(parsed))
    }

    #[inline]
    #[must_use]
    pub fn with_category<S: Into<String>>(mut self, category: S) -> Self {
        self.category = category.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_comment<S: Into<String>>(mut self, comment: S) -> Self {
        self.comment = comment.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_to_ids(mut self, to_ids: bool) -> Self {
        self.to_ids = to_ids;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_object_relation<S: Into<String>>(mut self, relation: S) -> Self {
        self.object_relation = Some(relation.into());
        self
    }

    /// Check that the attribute carries a usable value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyValue`] if the value is empty or whitespace.
    pub fn validate(&self) -> Result<(), Error> {
        if self.value.trim().is_empty() {
            return Err(Error::EmptyValue {
                kind: self.kind.clone(),
            });
        }
        Ok(())
    }
}
