use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attribute::Attribute;

/// A directed, typed link from an object to an attribute or another object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectReference {
    pub uuid: Uuid,
    /// The object the reference originates from.
    pub object_uuid: Uuid,
    /// The attribute or object being pointed at.
    pub referenced_uuid: Uuid,
    pub relationship_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

/// A named group of related attributes, e.g. the geolocation of one IP.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MispObject {
    pub uuid: Uuid,
    /// Object template name, e.g. `ip-api-address`.
    pub name: String,
    #[serde(rename = "meta-category", default, skip_serializing_if = "String::is_empty")]
    pub meta_category: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "Attribute", default)]
    pub attributes: Vec<Attribute>,
    #[serde(rename = "ObjectReference", default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ObjectReference>,
}

impl MispObject {
    /// Create an empty object for the given template name.
    pub fn new<S: Into<String>>(name: S) -> MispObject {
        MispObject {
            uuid: Uuid::new_v4(),
            name: name.into(),
            meta_category: String::new(),
            description: String::new(),
            attributes: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Set the template metadata carried alongside the object.
    #[must_use]
    pub fn with_template<M: Into<String>, D: Into<String>>(
        mut self,
        meta_category: M,
        description: D,
    ) -> Self {
        self.meta_category = meta_category.into();
        self.description = description.into();
        self
    }

    /// Append an attribute filling the `relation` slot and return it.
    pub fn add_attribute<R, K, V>(&mut self, relation: R, kind: K, value: V) -> &Attribute
    where
        R: Into<String>,
        K: Into<String>,
        V: Into<String>,
    {
        let attribute = Attribute::new(kind, value).with_object_relation(relation);
        self.attributes.push(attribute);
        &self.attributes[self.attributes.len() - 1]
    }

    /// Link this object to `referenced_uuid` with the given relationship.
    pub fn add_reference<S: Into<String>>(
        &mut self,
        referenced_uuid: Uuid,
        relationship_type: S,
    ) -> &ObjectReference {
        self.references.push(ObjectReference {
            uuid: Uuid::new_v4(),
            object_uuid: self.uuid,
            referenced_uuid,
            relationship_type: relationship_type.into(),
            comment: String::new(),
        });
        &self.references[self.references.len() - 1]
    }

    /// Look up the attribute filling a given relation slot.
    #[must_use]
    pub fn attribute(&self, relation: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.object_relation.as_deref() == Some(relation))
    }
}
