// message.rs
use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};

/// A stored chat message. Immutable once created; `id` is allocated by the
/// store and strictly increases in arrival order, `timestamp` is stamped by
/// the store rather than trusted from the client.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Message {
    pub id: u64,
    pub username: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(id: u64, username: &str, content: &str) -> Self {
        Self {
            id,
            username: username.to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }
}
