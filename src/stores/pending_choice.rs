//! In-memory pending-choice store.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use tokio::sync::Mutex;

use super::{PendingChoiceContext, PendingChoiceStore};

/// Concurrent-safe in-memory implementation of [`PendingChoiceStore`].
#[derive(Default)]
pub struct InMemoryPendingChoices {
    pending: Mutex<HashMap<String, PendingChoiceContext>>,
}

impl InMemoryPendingChoices {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PendingChoiceStore for InMemoryPendingChoices {
    fn consume(
        &self,
        session_id: &str,
    ) -> Pin<Box<dyn Future<Output = Option<PendingChoiceContext>> + Send + '_>> {
        let session_id = session_id.to_owned();
        Box::pin(async move {
            if session_id.is_empty() {
                return None;
            }
            let mut pending = self.pending.lock().await;
            pending.remove(&session_id)
        })
    }

    fn peek(
        &self,
        session_id: &str,
    ) -> Pin<Box<dyn Future<Output = Option<PendingChoiceContext>> + Send + '_>> {
        let session_id = session_id.to_owned();
        Box::pin(async move {
            let pending = self.pending.lock().await;
            pending.get(&session_id).cloned()
        })
    }

    fn save(
        &self,
        session_id: &str,
        context: PendingChoiceContext,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        let session_id = session_id.to_owned();
        Box::pin(async move {
            if session_id.is_empty() {
                return;
            }
            let mut pending = self.pending.lock().await;
            pending.insert(session_id, context);
        })
    }

    fn clear(&self, session_id: &str) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        let session_id = session_id.to_owned();
        Box::pin(async move {
            let mut pending = self.pending.lock().await;
            pending.remove(&session_id);
        })
    }
}
