//! Execution plan produced by the external planner.

use serde::{Deserialize, Serialize};

use super::capability::CapabilityId;
use super::intent::IntentType;
use super::item::Record;

/// Status carried by a capability result and by step reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    /// Call succeeded.
    Ok,
    /// More than one candidate; a user decision is required.
    NeedsUserChoice,
    /// The capability needs a clarified prompt before it can act.
    NeedsClarification,
    /// Call failed.
    Error,
    /// Placeholder emitted by the planner before execution.
    Pending,
}

/// Canonical capability result: every heterogeneous capability return is
/// normalized into this shape at the registry boundary, so the engine
/// only ever sees one contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityResult {
    /// Outcome classification.
    pub status: ResultStatus,
    /// Domain items (e.g. geocode hits), possibly empty.
    #[serde(default)]
    pub items: Vec<Record>,
    /// Human-readable outcome message.
    #[serde(default)]
    pub message: Option<String>,
}

impl CapabilityResult {
    /// Successful result with items and a message.
    #[must_use]
    pub fn ok(items: Vec<Record>, message: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Ok,
            items,
            message: Some(message.into()),
        }
    }

    /// Result that pauses the step for a user decision.
    #[must_use]
    pub fn needs_user_choice(items: Vec<Record>, message: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::NeedsUserChoice,
            items,
            message: Some(message.into()),
        }
    }

    /// Failed result with a diagnostic message and no items.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Error,
            items: Vec::new(),
            message: Some(message.into()),
        }
    }
}

/// One proposed capability invocation within a step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    /// Capability to invoke.
    pub capability_id: CapabilityId,
    /// Loosely-typed invocation arguments; the orchestrator may add or
    /// overwrite fields before invocation (selection injection).
    #[serde(default)]
    pub args: Record,
}

/// One intent's execution unit within a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// The user intent this step serves.
    pub intent: IntentType,
    /// Ordered capability calls proposed by the planner.
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    /// Planner-provided placeholder result, overwritten by execution.
    /// Used as-is for steps that carry no tool calls.
    #[serde(default)]
    pub result: Option<CapabilityResult>,
}

/// Machine-generated execution plan: one plan per user prompt, immutable
/// once received.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Planner-assigned request identifier, echoed in the response.
    pub request_id: String,
    /// Ordered steps; may be empty.
    #[serde(default)]
    pub steps: Vec<Step>,
}
