pub mod amqp;
pub mod memory;

use crate::error::QueueError;
use crate::models::Message;
use async_trait::async_trait;
use futures::stream::BoxStream;

pub use amqp::AmqpQueue;
pub use memory::MemoryQueue;

/// Name of the queue shared by the ingestion API and the processor.
pub const DEFAULT_QUEUE_NAME: &str = "message_queue";

/// Raw delivery bodies, in the order the broker hands them out.
pub type DeliveryStream = BoxStream<'static, Result<Vec<u8>, QueueError>>;

/// A named queue that can be published to and consumed from.
///
/// Deliveries are auto-acknowledged: once a body is yielded by the stream
/// returned from [`consume`](MessageQueue::consume) the broker considers it
/// handled.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    fn name(&self) -> &str;

    /// Enqueues an already serialized body. Does not wait for a confirm.
    async fn publish_body(&self, body: Vec<u8>) -> Result<(), QueueError>;

    /// Starts the single consumer for this queue.
    async fn consume(&self) -> Result<DeliveryStream, QueueError>;

    async fn close(&self) -> Result<(), QueueError>;

    async fn publish(&self, message: &Message) -> Result<(), QueueError> {
        let body = serde_json::to_vec(message)?;
        self.publish_body(body).await
    }
}
