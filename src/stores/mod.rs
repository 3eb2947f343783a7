//! Session state stores: chat history, pending-choice context, and
//! last-selection memory, all keyed by session identifier.
//!
//! Each store is a trait so the in-memory implementations used at startup
//! can later be replaced by a durable key-value backend without touching
//! orchestrator logic. Individual operations are atomic per key; no
//! cross-session locking exists, and no lock is ever held across a
//! capability invocation.

pub mod chat_memory;
pub mod pending_choice;
pub mod selection_memory;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::models::item::Record;
use crate::models::message::ChatMessage;
use crate::models::plan::Step;

pub use chat_memory::InMemoryChatMemory;
pub use pending_choice::InMemoryPendingChoices;
pub use selection_memory::InMemorySelectionMemory;

/// Persisted pause point awaiting a user decision.
///
/// Created when a step's intermediate result is ambiguous while further
/// tool calls remain; consumed exactly once when the session's next
/// request carries a `choiceId`. At most one context exists per session;
/// saving replaces any unconsumed predecessor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingChoiceContext {
    /// Request the paused step belongs to.
    pub request_id: String,
    /// The paused step, kept whole so execution can resume in place.
    pub step: Step,
    /// Index of the first tool call still to run.
    pub next_tool_call_index: usize,
    /// Candidate items the user is choosing between.
    pub choice_items: Vec<Record>,
}

/// Append-only per-session chat history, used to give the external
/// planner conversational context.
pub trait ChatMemoryStore: Send + Sync {
    /// Snapshot of the session's messages in append order.
    fn messages(
        &self,
        session_id: &str,
    ) -> Pin<Box<dyn Future<Output = Vec<ChatMessage>> + Send + '_>>;

    /// Append one message to the session's history.
    fn append(
        &self,
        session_id: &str,
        message: ChatMessage,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;

    /// Drop the session's history entirely.
    fn clear(&self, session_id: &str) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// Single current pause context per session.
pub trait PendingChoiceStore: Send + Sync {
    /// Remove and return the session's pending context, if any.
    fn consume(
        &self,
        session_id: &str,
    ) -> Pin<Box<dyn Future<Output = Option<PendingChoiceContext>> + Send + '_>>;

    /// Return the session's pending context without removing it.
    fn peek(
        &self,
        session_id: &str,
    ) -> Pin<Box<dyn Future<Output = Option<PendingChoiceContext>> + Send + '_>>;

    /// Save a pending context, replacing any unconsumed predecessor.
    fn save(
        &self,
        session_id: &str,
        context: PendingChoiceContext,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;

    /// Drop the session's pending context, if any.
    fn clear(&self, session_id: &str) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// Last resolved selection per session — a convenience cache.
pub trait SelectionMemoryStore: Send + Sync {
    /// Return the session's last resolved selection, if any.
    fn get(&self, session_id: &str) -> Pin<Box<dyn Future<Output = Option<Record>> + Send + '_>>;

    /// Remember the session's last resolved selection.
    fn save(
        &self,
        session_id: &str,
        selection: Record,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;

    /// Drop the session's remembered selection, if any.
    fn clear(&self, session_id: &str) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}
