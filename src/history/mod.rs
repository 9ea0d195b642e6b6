mod memory;
mod redis;

use crate::error::StoreError;
use crate::models::{ conversation_key, Message };
use async_trait::async_trait;
use log::{ info, warn };

pub use self::memory::MemoryConversationStore;
pub use self::redis::RedisConversationStore;

/// Per-conversation message lists.
///
/// Entries are serialized `Message` JSON. New entries go to the head of the
/// list, so `entries` returns the most recent message first.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn push_entry(&self, key: &str, entry: String) -> Result<(), StoreError>;

    /// Every entry stored under `key`, head first. Unknown keys yield an empty list.
    async fn entries(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// Serializes `message` and prepends it to its conversation list.
    async fn save_message(&self, message: &Message) -> Result<(), StoreError> {
        let key = message.conversation_key();
        let value = serde_json::to_string(message)?;
        info!("Saving message to Redis: {}", value);
        self.push_entry(&key, value).await
    }

    /// Reads the conversation from `sender` to `receiver`, skipping entries
    /// that do not decode.
    async fn get_messages(
        &self,
        sender: &str,
        receiver: &str
    ) -> Result<Vec<Message>, StoreError> {
        let key = conversation_key(sender, receiver);
        let entries = self.entries(&key).await?;
        Ok(decode_entries(&key, &entries))
    }
}

pub fn decode_entries(key: &str, entries: &[String]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(entries.len());
    for entry in entries {
        match serde_json::from_str::<Message>(entry) {
            Ok(msg) => messages.push(msg),
            Err(e) => warn!("Skipping unreadable entry under '{}': {}", key, e),
        }
    }
    messages
}
