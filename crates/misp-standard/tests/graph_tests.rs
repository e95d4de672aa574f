use misp_standard::{Attribute, Event, MispObject};
use serde_json::Value;

/// Build a small event graph: one loose attribute and one object pointing at it.
fn build_graph() -> (Event, Attribute) {
    let input = Attribute::new("ip-dst", "8.8.8.8")
        .with_uuid_str("0a8a4b9e-4c1b-4f55-9a51-3c6b4d3a2e10")
        .expect("valid uuid");

    let mut geo = MispObject::new("ip-api-address")
        .with_template("network", "IP Address information");
    geo.add_attribute("country", "text", "United States");
    geo.add_attribute("latitude", "float", "37.42240");
    geo.add_reference(input.uuid, "locates");

    let mut event = Event::new();
    event.add_attribute(input.clone());
    event.add_object(geo);
    (event, input)
}

#[test]
fn test_sections_layout() {
    let (event, input) = build_graph();
    let v = serde_json::to_value(event.sections()).expect("serializable");

    let attributes = v["Attribute"].as_array().expect("attribute array");
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes[0]["uuid"], Value::String(input.uuid.to_string()));
    assert_eq!(attributes[0]["type"], "ip-dst");

    let objects = v["Object"].as_array().expect("object array");
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0]["name"], "ip-api-address");
    assert_eq!(objects[0]["meta-category"], "network");
    assert_eq!(objects[0]["Attribute"][1]["object_relation"], "latitude");
    assert_eq!(objects[0]["Attribute"][1]["type"], "float");
}

#[test]
fn test_reference_targets_loose_attribute() {
    let (event, input) = build_graph();
    let reference = &event.objects[0].references[0];

    assert_eq!(reference.referenced_uuid, input.uuid);
    assert_eq!(reference.object_uuid, event.objects[0].uuid);
    assert_eq!(
        event.attributes.iter().find(|a| a.uuid == reference.referenced_uuid),
        Some(&input)
    );
}

#[test]
fn test_event_reads_back() {
    let (event, _) = build_graph();
    let text = serde_json::to_string(&event).expect("serializable");
    let parsed: Event = serde_json::from_str(&text).expect("parsable");
    assert_eq!(parsed, event);
}
