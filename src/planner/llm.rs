//! LLM-backed planner against an OpenAI-compatible chat-completions API.
//!
//! Builds a system prompt from the registered capability descriptors,
//! prepends the session's chat history, and parses the model reply as a
//! [`Plan`]. The raw user message and the raw model reply are recorded in
//! chat memory so follow-up prompts carry conversational context.

use std::fmt::Write as _;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use crate::models::message::{ChatMessage, Role};
use crate::models::plan::Plan;
use crate::registry::{CapabilityDescriptor, CapabilityRegistry};
use crate::stores::ChatMemoryStore;
use crate::{AppError, Result};

use super::Planner;

/// Planner implementation calling an OpenAI-compatible endpoint.
pub struct LlmPlanner {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    history_limit: usize,
    chat_memory: Arc<dyn ChatMemoryStore>,
    registry: Arc<CapabilityRegistry>,
}

impl LlmPlanner {
    /// Create a planner bound to shared chat memory and the capability
    /// registry whose descriptors document the available tools.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        history_limit: usize,
        chat_memory: Arc<dyn ChatMemoryStore>,
        registry: Arc<CapabilityRegistry>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
            history_limit,
            chat_memory,
            registry,
        }
    }

    async fn plan_inner(&self, session_id: String, user_message: String) -> Result<Plan> {
        debug!(session_id = %session_id, "planning");

        let history = self.chat_memory.messages(&session_id).await;
        let recent = history
            .iter()
            .skip(history.len().saturating_sub(self.history_limit));

        let mut messages = vec![json!({
            "role": "system",
            "content": build_system_prompt(&self.registry.descriptors()),
        })];
        for message in recent {
            messages.push(json!({
                "role": role_name(message.role),
                "content": message.content,
            }));
        }
        messages.push(json!({ "role": "user", "content": user_message }));

        let body = json!({ "model": self.model, "messages": messages });
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| AppError::Planner(format!("planner call failed: {err}")))?
            .error_for_status()
            .map_err(|err| AppError::Planner(format!("planner returned an error: {err}")))?;

        let reply: Value = response
            .json()
            .await
            .map_err(|err| AppError::Planner(format!("planner reply unreadable: {err}")))?;

        let content = reply
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::Planner("planner reply carries no content".into()))?
            .to_owned();

        debug!(content_len = content.len(), "planner replied");

        self.chat_memory
            .append(&session_id, ChatMessage::user(&user_message))
            .await;
        self.chat_memory
            .append(&session_id, ChatMessage::assistant(&content))
            .await;

        serde_json::from_str(strip_code_fences(&content))
            .map_err(|err| AppError::Planner(format!("planner JSON parse failed: {err}")))
    }
}

impl Planner for LlmPlanner {
    fn plan(
        &self,
        session_id: &str,
        user_message: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Plan>> + Send + '_>> {
        let session_id = session_id.to_owned();
        let user_message = user_message.to_owned();
        Box::pin(self.plan_inner(session_id, user_message))
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

/// Tolerate replies wrapped in Markdown code fences.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn build_system_prompt(descriptors: &[CapabilityDescriptor]) -> String {
    let mut capabilities = String::new();
    for descriptor in descriptors {
        let _ = writeln!(
            capabilities,
            "- \"{}\": {}",
            descriptor.id, descriptor.description
        );
        if descriptor.params.is_empty() {
            let _ = writeln!(capabilities, "  Params: (none documented)");
            continue;
        }
        let _ = writeln!(capabilities, "  Params:");
        for param in &descriptor.params {
            let _ = writeln!(
                capabilities,
                "  * {}{} - {}",
                param.name,
                if param.required { " (required)" } else { "" },
                param.description
            );
            if let Some(schema) = &param.schema {
                let _ = writeln!(capabilities, "    Schema: {schema}");
            }
        }
    }
    if capabilities.is_empty() {
        capabilities.push_str("- (no capabilities registered)\n");
    }

    format!(
        r#"You are the planner for an interactive map application.

AVAILABLE CAPABILITIES (capabilityId: description):
{capabilities}
TASK:
- You receive one natural-language user message.
- You determine one or more intents, each becoming one step:
  - "goto_address"                => center the map on an address.
  - "load_layer"                  => load a thematic map layer.
  - "search_place"                => locate a named place.
  - "oereb_extract"               => fetch a cadastral restriction extract for a parcel.
  - "geothermal_probe_assessment" => check geothermal probe feasibility at a coordinate.
  - "cadastral_plan"              => produce a land-register plan PDF for a parcel.
- Order the steps as the user wants them executed; one intent means exactly one step.
- Propose MINIMAL capability calls from the list above; a step may contain several calls.

IMPORTANT:
- You never invoke capabilities yourself, you only produce the plan.
- You never emit map actions (setView, addLayer, ...).
- You reply with a single JSON object, no prose, no Markdown.

OUTPUT FORMAT (JSON):
{{
  "requestId": "string",
  "steps": [
    {{
      "intent": "goto_address | load_layer | search_place | oereb_extract | geothermal_probe_assessment | cadastral_plan",
      "toolCalls": [ {{ "capabilityId": "string", "args": {{ }} }} ],
      "result": {{ "status": "pending", "items": [], "message": "" }}
    }}
  ]
}}

RULES:
- "steps" is an ordered list; each entry covers exactly one intent.
- "toolCalls" may be empty when the answer follows from context alone.
- Drop generic words like "map" or "layer" from layer search queries
  (e.g. "water protection map" => "water protection").
- Fix obvious typos in addresses and place names yourself.
- Multi-call example: an extract at a coordinate is one "oereb_extract" step with
  "oereb.egridByXY" followed by "oereb.extractById"."#
    )
}
