//! Result-to-action templating: turns a capability result into client map
//! actions and choice lists per intent type.
//!
//! Pure functions only — no I/O, no failures on missing optional fields
//! (the dependent action is simply skipped).

use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::action::{Choice, MapAction};
use crate::models::intent::IntentType;
use crate::models::item::{self, Record};
use crate::models::plan::{CapabilityResult, ResultStatus};

/// Default map zoom applied when centering on a single feature.
const FEATURE_ZOOM: u32 = 17;

/// Fallback coordinate reference system for payloads that omit one.
const DEFAULT_CRS: &str = "EPSG:2056";

/// Templated outcome of one step: status, message, and the derived map
/// actions or choices.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionPlan {
    /// Step outcome classification.
    pub status: ResultStatus,
    /// Fallback message when the capability result carries none.
    pub message: Option<String>,
    /// Map actions for a resolved (single-item) result.
    pub map_actions: Vec<MapAction>,
    /// Candidate options for an ambiguous result.
    pub choices: Vec<Choice>,
}

impl ActionPlan {
    fn ok(map_actions: Vec<MapAction>, message: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Ok,
            message: Some(message.into()),
            map_actions,
            choices: Vec::new(),
        }
    }

    fn needs_user_choice(choices: Vec<Choice>, message: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::NeedsUserChoice,
            message: Some(message.into()),
            map_actions: Vec::new(),
            choices,
        }
    }

    fn needs_clarification(message: Option<String>) -> Self {
        Self {
            status: ResultStatus::NeedsClarification,
            message,
            map_actions: Vec::new(),
            choices: Vec::new(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Error,
            message: Some(message.into()),
            map_actions: Vec::new(),
            choices: Vec::new(),
        }
    }
}

/// Stateless templater mapping `(intent, result)` to an [`ActionPlan`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionTemplater;

#[allow(clippy::unused_self)] // Stateless; instance receivers keep the orchestrator wiring uniform.
impl ActionTemplater {
    /// Create a templater.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Derive the client-facing plan for one executed step.
    #[must_use]
    pub fn to_action_plan(
        &self,
        intent: IntentType,
        result: Option<&CapabilityResult>,
    ) -> ActionPlan {
        let Some(result) = result else {
            return ActionPlan::error("No result from planner or capabilities.");
        };

        match (result.status, result.items.len()) {
            (ResultStatus::Ok, 1) => {
                ActionPlan::ok(self.actions_for(intent, &result.items[0]), "Done.")
            }
            (ResultStatus::Ok | ResultStatus::NeedsUserChoice, n) if n >= 1 => {
                let choices = result
                    .items
                    .iter()
                    .map(|item| self.choice_for(intent, item))
                    .collect();
                ActionPlan::needs_user_choice(choices, "Please choose an option.")
            }
            (ResultStatus::NeedsClarification, _) => {
                ActionPlan::needs_clarification(result.message.clone())
            }
            _ => ActionPlan::error(
                result
                    .message
                    .clone()
                    .unwrap_or_else(|| "Unknown result status.".to_owned()),
            ),
        }
    }

    /// Final action list for one item: the order-preserving union of the
    /// capability-embedded client-action hints and the intent template,
    /// with duplicates eliminated.
    #[must_use]
    pub fn actions_for(&self, intent: IntentType, item: &Record) -> Vec<MapAction> {
        let mut actions = item::client_actions(item);
        for action in self.template(intent, &item::payload(item)) {
            if !actions.contains(&action) {
                actions.push(action);
            }
        }
        actions
    }

    fn choice_for(&self, intent: IntentType, item: &Record) -> Choice {
        Choice {
            id: item::effective_id(item).unwrap_or_else(|| Uuid::new_v4().to_string()),
            label: item::effective_label(item).unwrap_or_else(|| format!("{intent} option")),
            confidence: item::confidence(item),
            map_actions: self.actions_for(intent, item),
            data: item.clone(),
        }
    }

    /// Per-intent pure template over an item payload. Unrecognized field
    /// combinations yield no actions, never an error.
    fn template(&self, intent: IntentType, payload: &Record) -> Vec<MapAction> {
        match intent {
            IntentType::GotoAddress | IntentType::SearchPlace => locate_actions(payload),
            IntentType::LoadLayer => layer_actions(payload),
            IntentType::OerebExtract
            | IntentType::GeothermalProbeAssessment
            | IntentType::CadastralPlan => document_actions(payload),
        }
    }
}

/// `setView` + `addMarker` for a geocoded feature. Requires `coord`.
fn locate_actions(payload: &Record) -> Vec<MapAction> {
    let Some(coord) = payload.get("coord").cloned() else {
        return Vec::new();
    };
    let crs = item::field_as_string(payload, "crs").unwrap_or_else(|| DEFAULT_CRS.to_owned());
    let id = item::field_as_string(payload, "id").unwrap_or_else(|| "addr".to_owned());

    vec![
        MapAction::new(
            "setView",
            record(json!({ "center": coord, "zoom": FEATURE_ZOOM, "crs": crs })),
        ),
        MapAction::new(
            "addMarker",
            record(json!({ "id": format!("addr-{id}"), "coord": coord, "style": "pin-default" })),
        ),
    ]
}

/// `addLayer` per layer; grouped payloads emit one action per sublayer.
fn layer_actions(payload: &Record) -> Vec<MapAction> {
    if let Some(Value::Array(sublayers)) = payload.get("sublayers") {
        return sublayers
            .iter()
            .filter_map(Value::as_object)
            .filter_map(single_layer_action)
            .collect();
    }
    single_layer_action(payload).into_iter().collect()
}

fn single_layer_action(payload: &Record) -> Option<MapAction> {
    let layer_id = item::field_as_string(payload, "layerId")?;
    let layer_type = item::field_as_string(payload, "type").unwrap_or_else(|| "wms".to_owned());
    let source = payload.get("source").cloned().unwrap_or(Value::Null);

    Some(MapAction::new(
        "addLayer",
        record(json!({ "id": layer_id, "type": layer_type, "source": source, "visible": true })),
    ))
}

/// `setView` when a coordinate is present plus `showDocument` when the
/// payload links a generated PDF.
fn document_actions(payload: &Record) -> Vec<MapAction> {
    let mut actions = Vec::new();

    if let Some(coord) = payload.get("coord").cloned() {
        let crs = item::field_as_string(payload, "crs").unwrap_or_else(|| DEFAULT_CRS.to_owned());
        actions.push(MapAction::new(
            "setView",
            record(json!({ "center": coord, "zoom": FEATURE_ZOOM, "crs": crs })),
        ));
    }

    if let Some(url) = item::field_as_string(payload, "pdfUrl") {
        let label = item::field_as_string(payload, "pdfLabel")
            .or_else(|| item::field_as_string(payload, "label"))
            .unwrap_or_else(|| "Document".to_owned());
        actions.push(MapAction::new(
            "showDocument",
            record(json!({ "url": url, "label": label })),
        ));
    }

    actions
}

/// Convert a `serde_json::Value::Object` into a [`Record`]; any other
/// shape yields an empty record.
fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}
