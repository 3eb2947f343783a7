//! Helpers over the loosely-typed item records returned by capabilities.
//!
//! A capability result item is a JSON object that may nest its domain
//! fields under a `payload` sub-record and may carry a `clientAction`
//! hint (a single `{type, payload}` object or a list of them). These
//! helpers extract the commonly-needed projections without ever failing
//! on absent or oddly-typed fields.

use serde_json::Value;

use super::action::MapAction;

/// Loosely-typed record: a JSON object keyed by field name.
pub type Record = serde_json::Map<String, Value>;

/// Effective domain payload of an item.
///
/// Returns the nested `payload` object when present, otherwise the item
/// itself, so callers never see the envelope fields (`type`,
/// `clientAction`, `options`).
#[must_use]
pub fn payload(item: &Record) -> Record {
    match item.get("payload") {
        Some(Value::Object(map)) => map.clone(),
        _ => item.clone(),
    }
}

/// Effective identifier of an item: payload `id` first, envelope `id` as
/// fallback, stringified.
#[must_use]
pub fn effective_id(item: &Record) -> Option<String> {
    field_as_string(&payload(item), "id").or_else(|| field_as_string(item, "id"))
}

/// Effective label of an item: payload `label` first, envelope `label` as
/// fallback.
#[must_use]
pub fn effective_label(item: &Record) -> Option<String> {
    field_as_string(&payload(item), "label").or_else(|| field_as_string(item, "label"))
}

/// Numeric `confidence` field, when present on the payload or the item.
#[must_use]
pub fn confidence(item: &Record) -> Option<f64> {
    payload(item)
        .get("confidence")
        .or_else(|| item.get("confidence"))
        .and_then(Value::as_f64)
}

/// Client-action hints embedded directly by the producing capability.
///
/// Accepts a single `{type, payload}` object or a list of them; anything
/// else (including entries with a missing type or non-object payload)
/// yields no actions.
#[must_use]
pub fn client_actions(item: &Record) -> Vec<MapAction> {
    match item.get("clientAction") {
        Some(Value::Object(map)) => action_from_map(map).into_iter().collect(),
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| entry.as_object().and_then(action_from_map))
            .collect(),
        _ => Vec::new(),
    }
}

fn action_from_map(map: &Record) -> Option<MapAction> {
    let action_type = map.get("type").and_then(Value::as_str)?;
    let payload = map.get("payload").and_then(Value::as_object)?;
    Some(MapAction {
        action_type: action_type.to_owned(),
        payload: payload.clone(),
    })
}

/// Read a field as a string, stringifying bare numbers.
///
/// Choice ids arrive as strings from the client but may be numeric in a
/// capability item, so comparisons go through this projection.
#[must_use]
pub fn field_as_string(record: &Record, key: &str) -> Option<String> {
    match record.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
