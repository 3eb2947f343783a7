use geoprompt::actions::ActionTemplater;
use geoprompt::models::intent::IntentType;
use geoprompt::models::item::Record;
use geoprompt::models::plan::{CapabilityResult, ResultStatus};
use serde_json::json;

fn record(value: serde_json::Value) -> Record {
    value.as_object().expect("object").clone()
}

fn address_item(id: &str, label: &str) -> Record {
    record(json!({
        "id": id,
        "label": label,
        "coord": [2_607_190.0, 1_228_596.0],
        "crs": "EPSG:2056"
    }))
}

#[test]
fn single_address_item_yields_set_view_and_marker() {
    let templater = ActionTemplater::new();
    let result = CapabilityResult::ok(vec![address_item("123", "Main Street 1")], "1 match");

    let plan = templater.to_action_plan(IntentType::GotoAddress, Some(&result));

    assert_eq!(plan.status, ResultStatus::Ok);
    assert_eq!(plan.map_actions.len(), 2);

    let set_view = &plan.map_actions[0];
    assert_eq!(set_view.action_type, "setView");
    assert_eq!(set_view.payload.get("zoom"), Some(&json!(17)));
    assert_eq!(set_view.payload.get("crs"), Some(&json!("EPSG:2056")));
    assert_eq!(
        set_view.payload.get("center"),
        Some(&json!([2_607_190.0, 1_228_596.0]))
    );

    let marker = &plan.map_actions[1];
    assert_eq!(marker.action_type, "addMarker");
    assert_eq!(marker.payload.get("id"), Some(&json!("addr-123")));
    assert_eq!(marker.payload.get("style"), Some(&json!("pin-default")));
}

#[test]
fn missing_crs_falls_back_to_default() {
    let templater = ActionTemplater::new();
    let item = record(json!({ "id": "9", "coord": [1.0, 2.0] }));
    let result = CapabilityResult::ok(vec![item], "1 match");

    let plan = templater.to_action_plan(IntentType::SearchPlace, Some(&result));

    assert_eq!(plan.map_actions[0].payload.get("crs"), Some(&json!("EPSG:2056")));
}

#[test]
fn address_item_without_coord_yields_no_actions() {
    let templater = ActionTemplater::new();
    let item = record(json!({ "id": "9", "label": "No coordinate" }));
    let result = CapabilityResult::ok(vec![item], "1 match");

    let plan = templater.to_action_plan(IntentType::GotoAddress, Some(&result));

    assert_eq!(plan.status, ResultStatus::Ok);
    assert!(plan.map_actions.is_empty());
}

#[test]
fn multiple_items_become_choices() {
    let templater = ActionTemplater::new();
    let result = CapabilityResult::ok(
        vec![address_item("1", "Option A"), address_item("2", "Option B")],
        "2 matches",
    );

    let plan = templater.to_action_plan(IntentType::GotoAddress, Some(&result));

    assert_eq!(plan.status, ResultStatus::NeedsUserChoice);
    assert!(plan.map_actions.is_empty());
    assert_eq!(plan.choices.len(), 2);
    assert_eq!(plan.choices[0].id, "1");
    assert_eq!(plan.choices[0].label, "Option A");
    // Each choice carries the actions it would produce when selected.
    assert_eq!(plan.choices[0].map_actions.len(), 2);
}

#[test]
fn needs_user_choice_status_with_single_item_still_asks() {
    let templater = ActionTemplater::new();
    let result =
        CapabilityResult::needs_user_choice(vec![address_item("1", "Only option")], "choose");

    let plan = templater.to_action_plan(IntentType::GotoAddress, Some(&result));

    assert_eq!(plan.status, ResultStatus::NeedsUserChoice);
    assert_eq!(plan.choices.len(), 1);
}

#[test]
fn choice_without_id_gets_generated_one() {
    let templater = ActionTemplater::new();
    let items = vec![
        record(json!({ "label": "Anonymous A" })),
        record(json!({ "label": "Anonymous B" })),
    ];
    let result = CapabilityResult::ok(items, "2 matches");

    let plan = templater.to_action_plan(IntentType::SearchPlace, Some(&result));

    assert!(!plan.choices[0].id.is_empty());
    assert_ne!(plan.choices[0].id, plan.choices[1].id);
}

#[test]
fn layer_item_yields_add_layer() {
    let templater = ActionTemplater::new();
    let item = record(json!({
        "id": "env-1",
        "label": "Water protection",
        "payload": {
            "layerId": "ch.so.water",
            "type": "wms",
            "source": { "url": "https://example.org/wms", "LAYERS": "ch.so.water" }
        }
    }));
    let result = CapabilityResult::ok(vec![item], "1 layer");

    let plan = templater.to_action_plan(IntentType::LoadLayer, Some(&result));

    assert_eq!(plan.status, ResultStatus::Ok);
    assert_eq!(plan.map_actions.len(), 1);
    let action = &plan.map_actions[0];
    assert_eq!(action.action_type, "addLayer");
    assert_eq!(action.payload.get("id"), Some(&json!("ch.so.water")));
    assert_eq!(action.payload.get("visible"), Some(&json!(true)));
    assert_eq!(
        action.payload.get("source").and_then(|s| s.get("url")),
        Some(&json!("https://example.org/wms"))
    );
}

#[test]
fn grouped_layer_yields_one_action_per_sublayer() {
    let templater = ActionTemplater::new();
    let item = record(json!({
        "id": "group-1",
        "label": "Nature reserves",
        "payload": {
            "id": "group-1",
            "sublayers": [
                { "layerId": "reserves.a", "type": "wms", "source": {} },
                { "layerId": "reserves.b", "type": "wms", "source": {} }
            ]
        }
    }));
    let result = CapabilityResult::ok(vec![item], "1 layer");

    let plan = templater.to_action_plan(IntentType::LoadLayer, Some(&result));

    assert_eq!(plan.map_actions.len(), 2);
    assert_eq!(plan.map_actions[0].payload.get("id"), Some(&json!("reserves.a")));
    assert_eq!(plan.map_actions[1].payload.get("id"), Some(&json!("reserves.b")));
}

#[test]
fn layer_type_defaults_to_wms() {
    let templater = ActionTemplater::new();
    let item = record(json!({ "layerId": "bare.layer" }));
    let result = CapabilityResult::ok(vec![item], "1 layer");

    let plan = templater.to_action_plan(IntentType::LoadLayer, Some(&result));

    assert_eq!(plan.map_actions[0].payload.get("type"), Some(&json!("wms")));
}

#[test]
fn document_item_yields_set_view_and_show_document() {
    let templater = ActionTemplater::new();
    let item = record(json!({
        "id": "CH123456789",
        "coord": [2_607_000.0, 1_228_000.0],
        "pdfUrl": "https://example.org/extract.pdf",
        "pdfLabel": "Extract CH123456789"
    }));
    let result = CapabilityResult::ok(vec![item], "extract ready");

    let plan = templater.to_action_plan(IntentType::OerebExtract, Some(&result));

    assert_eq!(plan.map_actions.len(), 2);
    assert_eq!(plan.map_actions[0].action_type, "setView");
    let doc = &plan.map_actions[1];
    assert_eq!(doc.action_type, "showDocument");
    assert_eq!(doc.payload.get("url"), Some(&json!("https://example.org/extract.pdf")));
    assert_eq!(doc.payload.get("label"), Some(&json!("Extract CH123456789")));
}

#[test]
fn document_label_falls_back_to_generic() {
    let templater = ActionTemplater::new();
    let item = record(json!({ "pdfUrl": "https://example.org/plan.pdf" }));
    let result = CapabilityResult::ok(vec![item], "plan ready");

    let plan = templater.to_action_plan(IntentType::CadastralPlan, Some(&result));

    assert_eq!(plan.map_actions.len(), 1);
    assert_eq!(plan.map_actions[0].payload.get("label"), Some(&json!("Document")));
}

#[test]
fn embedded_client_actions_come_first_and_deduplicate() {
    let templater = ActionTemplater::new();
    let item = record(json!({
        "id": "7",
        "coord": [1.0, 2.0],
        "crs": "EPSG:2056",
        "clientAction": [
            { "type": "highlight", "payload": { "id": "7" } },
            {
                "type": "addMarker",
                "payload": { "id": "addr-7", "coord": [1.0, 2.0], "style": "pin-default" }
            }
        ]
    }));
    let result = CapabilityResult::ok(vec![item], "1 match");

    let plan = templater.to_action_plan(IntentType::GotoAddress, Some(&result));

    let types: Vec<&str> = plan
        .map_actions
        .iter()
        .map(|a| a.action_type.as_str())
        .collect();
    // Hint order preserved, templated duplicate of addMarker dropped.
    assert_eq!(types, vec!["highlight", "addMarker", "setView"]);
}

#[test]
fn needs_clarification_passes_message_through() {
    let templater = ActionTemplater::new();
    let result = CapabilityResult {
        status: ResultStatus::NeedsClarification,
        items: Vec::new(),
        message: Some("Which municipality?".into()),
    };

    let plan = templater.to_action_plan(IntentType::OerebExtract, Some(&result));

    assert_eq!(plan.status, ResultStatus::NeedsClarification);
    assert_eq!(plan.message.as_deref(), Some("Which municipality?"));
    assert!(plan.map_actions.is_empty());
    assert!(plan.choices.is_empty());
}

#[test]
fn error_result_keeps_its_message() {
    let templater = ActionTemplater::new();
    let result = CapabilityResult::error("No matches found.");

    let plan = templater.to_action_plan(IntentType::GotoAddress, Some(&result));

    assert_eq!(plan.status, ResultStatus::Error);
    assert_eq!(plan.message.as_deref(), Some("No matches found."));
}

#[test]
fn ok_with_no_items_is_an_error() {
    let templater = ActionTemplater::new();
    let result = CapabilityResult::ok(Vec::new(), "");

    let plan = templater.to_action_plan(IntentType::GotoAddress, Some(&result));

    assert_eq!(plan.status, ResultStatus::Error);
}

#[test]
fn missing_result_is_an_error() {
    let templater = ActionTemplater::new();

    let plan = templater.to_action_plan(IntentType::GotoAddress, None);

    assert_eq!(plan.status, ResultStatus::Error);
    assert!(plan.message.is_some());
}

#[test]
fn choices_are_built_from_payload_fields() {
    let templater = ActionTemplater::new();
    let items = vec![
        record(json!({
            "id": "outer-1",
            "payload": { "id": "inner-1", "label": "Inner label", "confidence": 0.8 }
        })),
        record(json!({ "id": "outer-2", "label": "Outer label" })),
    ];
    let result = CapabilityResult::ok(items, "2 matches");

    let plan = templater.to_action_plan(IntentType::SearchPlace, Some(&result));

    assert_eq!(plan.choices[0].id, "inner-1");
    assert_eq!(plan.choices[0].label, "Inner label");
    assert_eq!(plan.choices[0].confidence, Some(0.8));
    assert_eq!(plan.choices[1].id, "outer-2");
    assert_eq!(plan.choices[1].label, "Outer label");
}
