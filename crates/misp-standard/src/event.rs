use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;
use crate::object::MispObject;

/// Transient container used to assemble an attribute/object graph.
///
/// Enrichment results are never persisted as an event; the container only
/// exists so the graph can be serialized in one piece.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub info: String,
    #[serde(rename = "Attribute", default)]
    pub attributes: Vec<Attribute>,
    #[serde(rename = "Object", default)]
    pub objects: Vec<MispObject>,
}

/// The `Attribute` and `Object` sections of an event, which is all an
/// enrichment module returns.
#[derive(Clone, Debug, Serialize)]
pub struct Sections<'a> {
    #[serde(rename = "Attribute")]
    pub attributes: &'a [Attribute],
    #[serde(rename = "Object")]
    pub objects: &'a [MispObject],
}

impl Event {
    #[must_use]
    pub fn new() -> Event {
        Event::default()
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn add_object(&mut self, object: MispObject) {
        self.objects.push(object);
    }

    /// Borrow the sections returned to the platform.
    #[must_use]
    pub fn sections(&self) -> Sections<'_> {
        Sections {
            attributes: &self.attributes,
            objects: &self.objects,
        }
    }
}
