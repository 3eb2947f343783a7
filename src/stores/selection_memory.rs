//! In-memory last-selection store.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use tokio::sync::Mutex;

use crate::models::item::Record;

use super::SelectionMemoryStore;

/// Concurrent-safe in-memory implementation of [`SelectionMemoryStore`].
#[derive(Default)]
pub struct InMemorySelectionMemory {
    selections: Mutex<HashMap<String, Record>>,
}

impl InMemorySelectionMemory {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionMemoryStore for InMemorySelectionMemory {
    fn get(&self, session_id: &str) -> Pin<Box<dyn Future<Output = Option<Record>> + Send + '_>> {
        let session_id = session_id.to_owned();
        Box::pin(async move {
            let selections = self.selections.lock().await;
            selections.get(&session_id).cloned()
        })
    }

    fn save(
        &self,
        session_id: &str,
        selection: Record,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        let session_id = session_id.to_owned();
        Box::pin(async move {
            if session_id.is_empty() || selection.is_empty() {
                return;
            }
            let mut selections = self.selections.lock().await;
            selections.insert(session_id, selection);
        })
    }

    fn clear(&self, session_id: &str) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        let session_id = session_id.to_owned();
        Box::pin(async move {
            let mut selections = self.selections.lock().await;
            selections.remove(&session_id);
        })
    }
}
