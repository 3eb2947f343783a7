//! Inbound chat request and client-facing response models.

use serde::{Deserialize, Serialize};

use super::action::{Choice, MapAction};
use super::intent::IntentType;
use super::plan::ResultStatus;

/// Inbound chat request.
///
/// Carries either a fresh `user_message` (plan-and-execute) or a
/// `choice_id` answering a previously returned set of choices (resume).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Session identifier chosen by the client.
    pub session_id: String,
    /// Natural-language prompt; absent on resume requests.
    #[serde(default)]
    pub user_message: Option<String>,
    /// Identifier of the selected choice; absent on fresh requests.
    #[serde(default)]
    pub choice_id: Option<String>,
}

/// Per-step outcome reported to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    /// Intent this step served; absent for synthetic error steps.
    #[serde(default)]
    pub intent: Option<IntentType>,
    /// Step outcome classification.
    pub status: ResultStatus,
    /// Human-readable outcome message.
    #[serde(default)]
    pub message: Option<String>,
    /// Map instructions the client should replay in order.
    pub map_actions: Vec<MapAction>,
    /// Candidate options when `status` is `needs_user_choice`.
    pub choices: Vec<Choice>,
}

/// Consistent response to the client: one step report per plan step plus
/// the aggregated overall status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Request identifier (from the plan, or generated for synthetic
    /// error responses).
    pub request_id: String,
    /// Per-step outcomes in plan order.
    pub steps: Vec<StepReport>,
    /// Worst-case step status under the fixed priority order.
    pub overall_status: ResultStatus,
}
