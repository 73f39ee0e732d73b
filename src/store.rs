// store.rs
use crate::error::ChatError;
use crate::message::Message;

/// Append-only in-memory message log. Not synchronized by itself; the
/// service wraps it in the shared lock.
#[derive(Debug, Default)]
pub struct MessageStore {
    next_id: u64,
    messages: Vec<Message>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates, allocates the next id, stamps the timestamp and stores the
    /// message. A rejected append leaves the store untouched.
    pub fn append(&mut self, username: &str, content: &str) -> Result<Message, ChatError> {
        if username.trim().is_empty() {
            return Err(ChatError::EmptyUsername);
        }
        if content.trim().is_empty() {
            return Err(ChatError::EmptyContent);
        }
        self.next_id += 1;
        let message = Message::new(self.next_id, username, content);
        self.messages.push(message.clone());
        Ok(message)
    }

    /// All messages in insertion order.
    pub fn list(&self) -> &[Message] {
        &self.messages
    }

    /// Drops every message. Ids keep increasing across clears so they stay
    /// unique for the lifetime of the store.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}
