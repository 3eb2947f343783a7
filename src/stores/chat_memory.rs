//! In-memory chat history store.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use tokio::sync::Mutex;

use crate::models::message::ChatMessage;

use super::ChatMemoryStore;

/// Concurrent-safe in-memory implementation of [`ChatMemoryStore`].
///
/// Entries are created on first append and grow monotonically until the
/// session is cleared.
#[derive(Default)]
pub struct InMemoryChatMemory {
    entries: Mutex<HashMap<String, Vec<ChatMessage>>>,
}

impl InMemoryChatMemory {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChatMemoryStore for InMemoryChatMemory {
    fn messages(
        &self,
        session_id: &str,
    ) -> Pin<Box<dyn Future<Output = Vec<ChatMessage>> + Send + '_>> {
        let session_id = session_id.to_owned();
        Box::pin(async move {
            let entries = self.entries.lock().await;
            entries.get(&session_id).cloned().unwrap_or_default()
        })
    }

    fn append(
        &self,
        session_id: &str,
        message: ChatMessage,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        let session_id = session_id.to_owned();
        Box::pin(async move {
            if session_id.is_empty() {
                return;
            }
            let mut entries = self.entries.lock().await;
            entries.entry(session_id).or_default().push(message);
        })
    }

    fn clear(&self, session_id: &str) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        let session_id = session_id.to_owned();
        Box::pin(async move {
            let mut entries = self.entries.lock().await;
            entries.remove(&session_id);
        })
    }
}
