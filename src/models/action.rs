//! Client-facing map instruction and choice models.

use serde::{Deserialize, Serialize};

use super::item::Record;

/// An opaque, client-interpreted map instruction (e.g. `setView`,
/// `addMarker`, `addLayer`, `showDocument`).
///
/// The engine never interprets these beyond structural handling; equality
/// is used for order-preserving deduplication when capability-embedded
/// hints and intent templates produce overlapping actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapAction {
    /// Action discriminator understood by the client.
    #[serde(rename = "type")]
    pub action_type: String,
    /// Action-specific parameters.
    #[serde(default)]
    pub payload: Record,
}

impl MapAction {
    /// Construct an action from a type and payload.
    #[must_use]
    pub fn new(action_type: impl Into<String>, payload: Record) -> Self {
        Self {
            action_type: action_type.into(),
            payload,
        }
    }
}

/// Client-visible projection of one ambiguous candidate item.
///
/// Carries the same map actions that would have been produced had the
/// item been the single result of its step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// Identifier the client echoes back as `choiceId` to resume.
    pub id: String,
    /// Human-readable option label.
    pub label: String,
    /// Optional match confidence reported by the capability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Map actions for this candidate.
    pub map_actions: Vec<MapAction>,
    /// The raw item record backing this choice.
    pub data: Record,
}
