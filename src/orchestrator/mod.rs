//! Central execution engine between the API layer, the planner, the
//! capability registry, and the action templater.
//!
//! Executes a plan's steps in order, runs each step's capability calls in
//! order, pauses a step when an intermediate result is ambiguous, resumes
//! it once the user answers with a `choiceId`, and aggregates per-step
//! outcomes into one overall response status.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::actions::ActionTemplater;
use crate::models::intent::IntentType;
use crate::models::item::{self, Record};
use crate::models::message::ChatMessage;
use crate::models::plan::{CapabilityResult, Plan, ResultStatus, Step};
use crate::models::response::{ChatRequest, ChatResponse, StepReport};
use crate::planner::Planner;
use crate::registry::CapabilityRegistry;
use crate::stores::{
    ChatMemoryStore, PendingChoiceContext, PendingChoiceStore, SelectionMemoryStore,
};

/// Message used when a pause must be reported but the capability did not
/// provide one.
const DEFAULT_CHOICE_PROMPT: &str = "Please choose an option.";

/// Orchestrates plan execution, pause/resume, and response assembly.
pub struct ChatOrchestrator {
    planner: Arc<dyn Planner>,
    registry: Arc<CapabilityRegistry>,
    templater: ActionTemplater,
    chat_memory: Arc<dyn ChatMemoryStore>,
    pending_choices: Arc<dyn PendingChoiceStore>,
    selection_memory: Arc<dyn SelectionMemoryStore>,
}

impl ChatOrchestrator {
    /// Wire the orchestrator to its collaborators.
    #[must_use]
    pub fn new(
        planner: Arc<dyn Planner>,
        registry: Arc<CapabilityRegistry>,
        chat_memory: Arc<dyn ChatMemoryStore>,
        pending_choices: Arc<dyn PendingChoiceStore>,
        selection_memory: Arc<dyn SelectionMemoryStore>,
    ) -> Self {
        Self {
            planner,
            registry,
            templater: ActionTemplater::new(),
            chat_memory,
            pending_choices,
            selection_memory,
        }
    }

    /// Run the full interaction cycle for one request: planner run,
    /// capability execution, map-action derivation, and response assembly.
    ///
    /// Never fails from the caller's point of view — every failure mode is
    /// converted into a step-level `error` report at the point of
    /// detection.
    pub async fn handle_prompt(&self, request: ChatRequest) -> ChatResponse {
        info!(session_id = %request.session_id, "handling prompt");

        if let Some(choice_id) = request
            .choice_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
        {
            return self.handle_choice_follow_up(&request.session_id, choice_id).await;
        }

        let user_message = request.user_message.unwrap_or_default();
        let plan = match self.planner.plan(&request.session_id, &user_message).await {
            Ok(plan) => plan,
            Err(err) => {
                warn!(%err, "planner failed");
                let step = synthetic_error_step(None, format!("Planning failed: {err}"));
                return response_for(Uuid::new_v4().to_string(), vec![step]);
            }
        };

        info!(request_id = %plan.request_id, steps = plan.steps.len(), "plan received");
        let steps = self.build_steps(&request.session_id, &plan).await;
        response_for(plan.request_id, steps)
    }

    /// Clear chat history, pending choice, and cached selection for a
    /// session. Idempotent.
    pub async fn clear_session(&self, session_id: &str) {
        self.chat_memory.clear(session_id).await;
        self.pending_choices.clear(session_id).await;
        self.selection_memory.clear(session_id).await;
        info!(session_id, "session cleared");
    }

    async fn build_steps(&self, session_id: &str, plan: &Plan) -> Vec<StepReport> {
        let mut reports = Vec::with_capacity(plan.steps.len());
        // Each step is an independent intent: an earlier pause does not
        // stop later steps from being attempted.
        for step in &plan.steps {
            let result = self
                .execute_tool_calls(session_id, &plan.request_id, step, 0, None)
                .await;
            reports.push(self.report_for(step.intent, result));
        }
        reports
    }

    async fn handle_choice_follow_up(&self, session_id: &str, choice_id: &str) -> ChatResponse {
        let Some(context) = self.pending_choices.consume(session_id).await else {
            let step =
                synthetic_error_step(None, "No open choice exists for this session.".to_owned());
            return response_for(Uuid::new_v4().to_string(), vec![step]);
        };

        self.chat_memory
            .append(session_id, ChatMessage::user(format!("User choice: {choice_id}")))
            .await;

        let Some(selected) = resolve_selected_item(&context.choice_items, choice_id) else {
            let step = synthetic_error_step(
                Some(context.step.intent),
                "The selected option could not be found.".to_owned(),
            );
            return response_for(context.request_id, vec![step]);
        };

        // Downstream calls receive the flattened domain payload, not the
        // item envelope.
        let selection = item::payload(&selected);
        self.selection_memory.save(session_id, selection.clone()).await;

        let result = self
            .execute_tool_calls(
                session_id,
                &context.request_id,
                &context.step,
                context.next_tool_call_index,
                Some(selection),
            )
            .await;

        let report = self.report_for(context.step.intent, result);
        response_for(context.request_id, vec![report])
    }

    /// Execute a step's capability calls in order, starting at
    /// `start_index`, and return the step's final result.
    ///
    /// A result with more than one item while further calls remain pauses
    /// the step: the pending context is persisted and a
    /// `needs_user_choice` result is returned. A failing call terminates
    /// the step with its error result; earlier calls are not rolled back.
    async fn execute_tool_calls(
        &self,
        session_id: &str,
        request_id: &str,
        step: &Step,
        start_index: usize,
        initial_selection: Option<Record>,
    ) -> Option<CapabilityResult> {
        if step.tool_calls.is_empty() {
            return step.result.clone();
        }

        let mut last = step.result.clone();
        let mut selection = initial_selection;

        for (index, tool_call) in step.tool_calls.iter().enumerate().skip(start_index) {
            let mut args = tool_call.args.clone();
            if let Some(sel) = selection.as_ref().filter(|sel| !sel.is_empty()) {
                inject_selection(&mut args, sel);
            }

            let result = self.registry.execute(tool_call.capability_id, args).await;

            let transcript = serde_json::to_string(&result).unwrap_or_default();
            self.chat_memory
                .append(
                    session_id,
                    ChatMessage::assistant(format!(
                        "Tool {} result: {transcript}",
                        tool_call.capability_id
                    )),
                )
                .await;

            if result.status == ResultStatus::Error {
                warn!(capability = %tool_call.capability_id, "tool call failed, step aborted");
                return Some(result);
            }

            let has_next = index < step.tool_calls.len() - 1;
            if has_next && result.items.len() > 1 {
                self.pending_choices
                    .save(
                        session_id,
                        PendingChoiceContext {
                            request_id: request_id.to_owned(),
                            step: step.clone(),
                            next_tool_call_index: index + 1,
                            choice_items: result.items.clone(),
                        },
                    )
                    .await;
                info!(
                    capability = %tool_call.capability_id,
                    candidates = result.items.len(),
                    "step paused for user choice"
                );
                let message = result
                    .message
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CHOICE_PROMPT.to_owned());
                return Some(CapabilityResult::needs_user_choice(result.items, message));
            }

            selection = result.items.first().map(item::payload);
            if let Some(sel) = selection.clone().filter(|_| result.items.len() == 1) {
                self.selection_memory.save(session_id, sel).await;
            }

            last = Some(result);
        }

        last
    }

    fn report_for(&self, intent: IntentType, result: Option<CapabilityResult>) -> StepReport {
        let plan = self.templater.to_action_plan(intent, result.as_ref());
        let message = result.and_then(|r| r.message).or(plan.message);
        StepReport {
            intent: Some(intent),
            status: plan.status,
            message,
            map_actions: plan.map_actions,
            choices: plan.choices,
        }
    }
}

/// Merge the carried selection into the next call's arguments.
///
/// The full selection record goes under `selection`; the commonly-needed
/// scalar identifiers are additionally lifted to `id` and `egrid`
/// (falling back to `id`) so downstream capabilities need no
/// per-capability special-casing.
fn inject_selection(args: &mut Record, selection: &Record) {
    args.insert("selection".to_owned(), Value::Object(selection.clone()));

    let id = selection.get("id").cloned();
    if let Some(id) = id.clone() {
        args.insert("id".to_owned(), id);
    }
    if let Some(egrid) = selection.get("egrid").cloned().or(id) {
        args.insert("egrid".to_owned(), egrid);
    }
}

/// Scan the persisted candidates for the item whose effective id equals
/// the submitted choice id (string comparison).
fn resolve_selected_item(choice_items: &[Record], choice_id: &str) -> Option<Record> {
    choice_items
        .iter()
        .find(|candidate| item::effective_id(candidate).as_deref() == Some(choice_id))
        .cloned()
}

/// Aggregate step statuses under the fixed priority order
/// `error > needs_clarification > needs_user_choice > ok`.
#[must_use]
pub fn aggregate_status(steps: &[StepReport]) -> ResultStatus {
    for status in [
        ResultStatus::Error,
        ResultStatus::NeedsClarification,
        ResultStatus::NeedsUserChoice,
    ] {
        if steps.iter().any(|step| step.status == status) {
            return status;
        }
    }
    ResultStatus::Ok
}

fn synthetic_error_step(intent: Option<IntentType>, message: String) -> StepReport {
    StepReport {
        intent,
        status: ResultStatus::Error,
        message: Some(message),
        map_actions: Vec::new(),
        choices: Vec::new(),
    }
}

fn response_for(request_id: String, steps: Vec<StepReport>) -> ChatResponse {
    let overall_status = aggregate_status(&steps);
    ChatResponse {
        request_id,
        steps,
        overall_status,
    }
}
