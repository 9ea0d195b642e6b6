use crate::error::{ ProcessError, QueueError };
use crate::history::ConversationStore;
use crate::models::Message;
use crate::queue::{ DeliveryStream, MessageQueue };
use futures::StreamExt;
use log::{ error, info, warn };
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Moves messages from the queue into the conversation store.
///
/// Deliveries are handled one at a time. A delivery that cannot be decoded
/// or stored is logged and dropped; it is already acknowledged and will not
/// come back.
pub struct Processor {
    queue: Arc<dyn MessageQueue>,
    store: Arc<dyn ConversationStore>,
}

impl Processor {
    pub fn new(queue: Arc<dyn MessageQueue>, store: Arc<dyn ConversationStore>) -> Self {
        Self { queue, store }
    }

    /// Subscribes to the queue and spawns the consume loop.
    ///
    /// Subscribing happens before this returns, so a broker failure surfaces
    /// here rather than inside the task. The task ends when `shutdown` is
    /// cancelled or the delivery stream closes.
    pub async fn start(self, shutdown: CancellationToken) -> Result<JoinHandle<()>, QueueError> {
        let deliveries = self.queue.consume().await?;
        info!("Subscribed to queue '{}'", self.queue.name());
        Ok(tokio::spawn(async move { self.run(deliveries, shutdown).await }))
    }

    pub async fn run(&self, mut deliveries: DeliveryStream, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Processor stopping: shutdown requested");
                    break;
                }
                next = deliveries.next() => {
                    match next {
                        Some(Ok(body)) => {
                            if let Err(e) = self.handle_delivery(&body).await {
                                error!("{}", e);
                            }
                        }
                        Some(Err(e)) => {
                            error!("Error receiving delivery from '{}': {}", self.queue.name(), e);
                        }
                        None => {
                            warn!("Processor stopping: delivery stream for '{}' closed", self.queue.name());
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Decodes one delivery body and prepends it to its conversation list.
    pub async fn handle_delivery(&self, body: &[u8]) -> Result<Message, ProcessError> {
        let message: Message = serde_json::from_slice(body).map_err(ProcessError::Decode)?;
        self.store.save_message(&message).await?;
        Ok(message)
    }
}
