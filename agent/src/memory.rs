//! In-memory conversation checkpointer
//!
//! History is kept per thread id for the lifetime of the process and is
//! never written to disk.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::message::Message;

/// Conversation history keyed by thread id
#[derive(Debug, Default)]
pub struct MemorySaver {
    threads: Mutex<HashMap<String, Vec<Message>>>,
}

impl MemorySaver {
    /// Create an empty checkpointer
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages recorded for `thread_id`
    pub async fn load(&self, thread_id: &str) -> Vec<Message> {
        self.threads
            .lock()
            .await
            .get(thread_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Append messages to `thread_id`
    pub async fn append(&self, thread_id: &str, messages: &[Message]) {
        self.threads
            .lock()
            .await
            .entry(thread_id.to_string())
            .or_default()
            .extend_from_slice(messages);
    }

    /// Drop the history of `thread_id`
    pub async fn clear(&self, thread_id: &str) {
        self.threads.lock().await.remove(thread_id);
    }
}
