use geoprompt::models::item::{
    self, client_actions, confidence, effective_id, effective_label, field_as_string, Record,
};
use serde_json::json;

fn record(value: serde_json::Value) -> Record {
    value.as_object().expect("object").clone()
}

#[test]
fn payload_unwraps_nested_object() {
    let item = record(json!({
        "id": "env-1",
        "payload": { "id": "p-1", "label": "Inner" }
    }));

    let payload = item::payload(&item);

    assert_eq!(payload.get("id"), Some(&json!("p-1")));
    assert!(!payload.contains_key("payload"));
}

#[test]
fn payload_falls_back_to_item_itself() {
    let item = record(json!({ "id": "flat-1", "label": "Flat" }));
    assert_eq!(item::payload(&item), item);
}

#[test]
fn non_object_payload_is_ignored() {
    let item = record(json!({ "id": "env-2", "payload": "not an object" }));
    assert_eq!(item::payload(&item), item);
}

#[test]
fn effective_id_prefers_payload_over_envelope() {
    let item = record(json!({ "id": "outer", "payload": { "id": "inner" } }));
    assert_eq!(effective_id(&item), Some("inner".to_owned()));

    let flat = record(json!({ "id": "outer" }));
    assert_eq!(effective_id(&flat), Some("outer".to_owned()));

    let bare = record(json!({ "label": "no id" }));
    assert_eq!(effective_id(&bare), None);
}

#[test]
fn numeric_ids_are_stringified() {
    let item = record(json!({ "id": 42 }));
    assert_eq!(effective_id(&item), Some("42".to_owned()));
}

#[test]
fn effective_label_prefers_payload() {
    let item = record(json!({ "label": "outer", "payload": { "label": "inner" } }));
    assert_eq!(effective_label(&item), Some("inner".to_owned()));
}

#[test]
fn confidence_reads_payload_then_envelope() {
    let nested = record(json!({ "confidence": 0.2, "payload": { "confidence": 0.9 } }));
    assert_eq!(confidence(&nested), Some(0.9));

    let flat = record(json!({ "confidence": 0.5 }));
    assert_eq!(confidence(&flat), Some(0.5));

    let none = record(json!({ "id": "x" }));
    assert_eq!(confidence(&none), None);
}

#[test]
fn single_client_action_object_is_accepted() {
    let item = record(json!({
        "clientAction": { "type": "setView", "payload": { "zoom": 12 } }
    }));

    let actions = client_actions(&item);

    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].action_type, "setView");
    assert_eq!(actions[0].payload.get("zoom"), Some(&json!(12)));
}

#[test]
fn client_action_list_is_accepted_in_order() {
    let item = record(json!({
        "clientAction": [
            { "type": "setView", "payload": {} },
            { "type": "addMarker", "payload": {} }
        ]
    }));

    let actions = client_actions(&item);

    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0].action_type, "setView");
    assert_eq!(actions[1].action_type, "addMarker");
}

#[test]
fn malformed_client_action_entries_are_dropped() {
    let item = record(json!({
        "clientAction": [
            { "payload": {} },
            { "type": "addMarker", "payload": "not an object" },
            "just a string",
            { "type": "setView", "payload": {} }
        ]
    }));

    let actions = client_actions(&item);

    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].action_type, "setView");
}

#[test]
fn field_as_string_handles_strings_and_numbers() {
    let rec = record(json!({ "a": "text", "b": 7, "c": true }));

    assert_eq!(field_as_string(&rec, "a"), Some("text".to_owned()));
    assert_eq!(field_as_string(&rec, "b"), Some("7".to_owned()));
    assert_eq!(field_as_string(&rec, "c"), None);
    assert_eq!(field_as_string(&rec, "missing"), None);
}
