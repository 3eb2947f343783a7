//! External planner interface and the LLM-backed implementation.

pub mod llm;

use std::future::Future;
use std::pin::Pin;

use crate::models::plan::Plan;
use crate::Result;

pub use llm::LlmPlanner;

/// Produces an execution plan from a user prompt.
///
/// The planner is an opaque external collaborator; the engine only
/// requires the [`Plan`] shape and tolerates an empty step list.
pub trait Planner: Send + Sync {
    /// Plan the capability calls for one user message.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Planner`](crate::AppError::Planner) if the
    /// planner call fails or its output cannot be parsed as a plan.
    fn plan(
        &self,
        session_id: &str,
        user_message: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Plan>> + Send + '_>>;
}
