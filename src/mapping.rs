use misp_standard::{scalar, MispObject};
use tracing::trace;

use crate::client::GeoRecord;
use crate::error::{Error, Result};

/// Template name of the derived geolocation object.
pub const OBJECT_NAME: &str = "ip-api-address";
pub const OBJECT_META_CATEGORY: &str = "network";
pub const OBJECT_DESCRIPTION: &str =
    "IP Address information. Useful if you are pulling your ip information from ip-api.com.";

/// One row of the provider-field to object-relation table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldMapping {
    /// Key in the ipgeolocation.io reply.
    pub field: &'static str,
    /// Relation name on the `ip-api-address` object.
    pub relation: &'static str,
    /// MISP attribute type of that relation.
    pub attribute_type: &'static str,
}

const fn map(
    field: &'static str,
    relation: &'static str,
    attribute_type: &'static str,
) -> FieldMapping {
    FieldMapping {
        field,
        relation,
        attribute_type,
    }
}

/// Provider fields copied onto the object, in output order.
pub const FIELD_MAPPINGS: [FieldMapping; 13] = [
    map("isp", "ISP", "text"),
    map("asn", "asn", "AS"),
    map("city", "city", "text"),
    map("country_name", "country", "text"),
    map("country_code2", "country-code", "text"),
    map("latitude", "latitude", "float"),
    map("longitude", "longitude", "float"),
    map("organization", "organization", "text"),
    map("continent_name", "region", "text"),
    map("continent_code", "region-code", "text"),
    map("state_prov", "state", "text"),
    map("zipcode", "zipcode", "text"),
    map("ip", "ip-src", "ip-src"),
];

/// Build the `ip-api-address` object for a provider record.
///
/// Values are copied as-is in their textual form. A field set to `null` or
/// `""` is left off the object, the way MISP drops empty values.
///
/// # Errors
///
/// [`Error::Extraction`] when a mapped field is absent from the reply or is
/// not a scalar, or when no field yields a value at all.
pub fn build_object(record: &GeoRecord) -> Result<MispObject> {
    let mut object =
        MispObject::new(OBJECT_NAME).with_template(OBJECT_META_CATEGORY, OBJECT_DESCRIPTION);

    for mapping in &FIELD_MAPPINGS {
        let raw = record.get(mapping.field).ok_or_else(|| Error::Extraction {
            message: format!("reply has no `{}` field", mapping.field),
        })?;
        if raw.is_null() {
            trace!(field = mapping.field, "provider field is null");
            continue;
        }
        let value = scalar::to_text(raw).ok_or_else(|| Error::Extraction {
            message: format!("`{}` is not a scalar: {raw}", mapping.field),
        })?;
        if value.is_empty() {
            trace!(field = mapping.field, "provider field is empty");
            continue;
        }
        object.add_attribute(mapping.relation, mapping.attribute_type, value);
    }

    if object.attributes.is_empty() {
        return Err(Error::Extraction {
            message: "reply has no location data".to_string(),
        });
    }
    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn table_relations_are_unique() {
        let mut relations: Vec<_> = FIELD_MAPPINGS.iter().map(|m| m.relation).collect();
        relations.sort_unstable();
        relations.dedup();
        assert_eq!(relations.len(), FIELD_MAPPINGS.len());
    }

    /// A reply carrying every mapped field, all set to `null`.
    fn blank_reply() -> serde_json::Map<String, serde_json::Value> {
        FIELD_MAPPINGS
            .iter()
            .map(|m| (m.field.to_string(), serde_json::Value::Null))
            .collect()
    }

    fn record_with(fields: serde_json::Value) -> GeoRecord {
        let mut reply = blank_reply();
        if let serde_json::Value::Object(fields) = fields {
            reply.extend(fields);
        }
        serde_json::from_value(serde_json::Value::Object(reply)).unwrap()
    }

    #[test]
    fn numbers_keep_their_text() {
        let record = record_with(json!({
            "asn": 15169,
            "latitude": "37.42240",
            "longitude": -122.08421
        }));
        let object = build_object(&record).unwrap();

        assert_eq!(object.attribute("asn").unwrap().value, "15169");
        assert_eq!(object.attribute("asn").unwrap().kind, "AS");
        assert_eq!(object.attribute("latitude").unwrap().value, "37.42240");
        assert_eq!(object.attribute("longitude").unwrap().value, "-122.08421");
    }

    #[test]
    fn null_and_empty_fields_are_skipped() {
        let record = record_with(json!({
            "ip": "8.8.8.8",
            "zipcode": null,
            "state_prov": ""
        }));
        let object = build_object(&record).unwrap();

        let relations: Vec<_> = object
            .attributes
            .iter()
            .filter_map(|a| a.object_relation.as_deref())
            .collect();
        assert_eq!(relations, vec!["ip-src"]);
        assert_eq!(object.name, "ip-api-address");
        assert_eq!(object.meta_category, "network");
    }

    #[test]
    fn absent_field_is_an_extraction_error() {
        let mut reply = blank_reply();
        reply.insert("city".to_string(), json!("Mountain View"));
        reply.remove("ip");
        let record: GeoRecord = serde_json::from_value(serde_json::Value::Object(reply)).unwrap();

        let err = build_object(&record).unwrap_err();
        assert!(matches!(err, Error::Extraction { ref message } if message.contains("`ip`")));
    }

    #[test]
    fn container_field_is_an_extraction_error() {
        let record = record_with(json!({"ip": "8.8.8.8", "asn": {"number": 15169}}));
        assert!(matches!(build_object(&record), Err(Error::Extraction { .. })));
    }

    #[test]
    fn reply_without_values_is_an_extraction_error() {
        let record = record_with(json!({}));
        assert!(matches!(build_object(&record), Err(Error::Extraction { .. })));
    }
}
