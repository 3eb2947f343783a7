//! Capability registry: lookup from capability identifier to an invocable
//! capability, with result normalization at the boundary.
//!
//! The registry is the single conversion point between heterogeneous
//! capability behavior and the canonical [`CapabilityResult`] contract:
//! unknown identifiers, invocation failures, and timeouts all surface as
//! error-status results, never as errors crossing into the orchestrator.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::models::capability::CapabilityId;
use crate::models::item::Record;
use crate::models::plan::CapabilityResult;
use crate::Result;

/// An invocable external-facing operation.
///
/// Implementations perform arbitrary (typically network) I/O and may fail
/// with any [`AppError`](crate::AppError); the registry converts failures
/// into error-status results at the invocation boundary.
pub trait Capability: Send + Sync {
    /// Invoke the capability with loosely-typed arguments.
    fn invoke(
        &self,
        args: Record,
    ) -> Pin<Box<dyn Future<Output = Result<CapabilityResult>> + Send + '_>>;
}

/// One documented capability parameter, used to build planner prompt
/// documentation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParamDescriptor {
    /// Parameter name as it appears in `args`.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Whether the capability requires the parameter.
    pub required: bool,
    /// Optional free-form schema hint (e.g. `{ 'q': 'string' }`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

/// Introspection record for one registered capability.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityDescriptor {
    /// Capability identifier.
    pub id: CapabilityId,
    /// Human-readable description.
    pub description: String,
    /// Documented parameters.
    pub params: Vec<ParamDescriptor>,
}

struct RegisteredCapability {
    descriptor: CapabilityDescriptor,
    handler: Arc<dyn Capability>,
}

/// Immutable-after-startup lookup table of capabilities.
pub struct CapabilityRegistry {
    entries: HashMap<CapabilityId, RegisteredCapability>,
    call_timeout: Duration,
}

impl CapabilityRegistry {
    /// Create an empty registry whose invocations are bounded by
    /// `call_timeout`.
    #[must_use]
    pub fn new(call_timeout: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            call_timeout,
        }
    }

    /// Register a capability under its descriptor's identifier.
    ///
    /// Re-registering an identifier replaces the previous entry; this is
    /// logged since it usually indicates a wiring mistake.
    pub fn register(&mut self, descriptor: CapabilityDescriptor, handler: Arc<dyn Capability>) {
        let id = descriptor.id;
        if self
            .entries
            .insert(id, RegisteredCapability { descriptor, handler })
            .is_some()
        {
            warn!(capability = %id, "capability re-registered, replacing previous entry");
        } else {
            info!(capability = %id, "capability registered");
        }
    }

    /// Execute a capability and normalize its outcome.
    ///
    /// Never fails from the caller's point of view: an unregistered
    /// identifier, an invocation error, or a timeout all yield an
    /// error-status [`CapabilityResult`].
    pub async fn execute(&self, id: CapabilityId, args: Record) -> CapabilityResult {
        let Some(entry) = self.entries.get(&id) else {
            warn!(capability = %id, "unknown capability");
            return CapabilityResult::error(format!("unknown capability: {id}"));
        };

        match tokio::time::timeout(self.call_timeout, entry.handler.invoke(args)).await {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                warn!(capability = %id, %err, "capability invocation failed");
                CapabilityResult::error(format!("capability {id} failed: {err}"))
            }
            Err(_) => {
                warn!(capability = %id, timeout = ?self.call_timeout, "capability timed out");
                CapabilityResult::error(format!(
                    "capability {id} timed out after {}s",
                    self.call_timeout.as_secs()
                ))
            }
        }
    }

    /// Descriptors of all registered capabilities, sorted by identifier.
    ///
    /// Not on the hot path; used to build planner documentation and the
    /// introspection endpoint.
    #[must_use]
    pub fn descriptors(&self) -> Vec<CapabilityDescriptor> {
        let mut descriptors: Vec<CapabilityDescriptor> = self
            .entries
            .values()
            .map(|entry| entry.descriptor.clone())
            .collect();
        descriptors.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        descriptors
    }
}
