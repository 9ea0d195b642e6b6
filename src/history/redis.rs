use crate::error::StoreError;
use crate::history::ConversationStore;
use async_trait::async_trait;
use log::info;
use redis::aio::MultiplexedConnection;
use redis::{ AsyncCommands, Client };

/// Redis lists keyed by conversation. `LPUSH` to write, `LRANGE 0 -1` to read.
pub struct RedisConversationStore {
    connection: MultiplexedConnection,
}

impl RedisConversationStore {
    /// Opens one multiplexed connection that every operation clones.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = Client::open(url)?;
        let connection = client.get_multiplexed_async_connection().await?;
        info!("Connected to Redis");
        Ok(Self { connection })
    }
}

#[async_trait]
impl ConversationStore for RedisConversationStore {
    async fn push_entry(&self, key: &str, entry: String) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        let _: i64 = conn.lpush(key, entry).await?;
        Ok(())
    }

    async fn entries(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.connection.clone();
        let entries: Vec<String> = conn.lrange(key, 0, -1).await?;
        Ok(entries)
    }
}
