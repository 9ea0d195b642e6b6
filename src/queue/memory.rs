use crate::error::QueueError;
use crate::queue::{ DeliveryStream, MessageQueue };
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::Mutex;
use tokio::sync::mpsc::{ self, UnboundedReceiver, UnboundedSender };
use tokio_stream::wrappers::UnboundedReceiverStream;

/// In-process queue with the same single-consumer, auto-ack behaviour as the
/// broker queue. Closing it ends the consumer's stream and makes further
/// publishes fail.
pub struct MemoryQueue {
    name: String,
    sender: Mutex<Option<UnboundedSender<Vec<u8>>>>,
    receiver: Mutex<Option<UnboundedReceiver<Vec<u8>>>>,
    published: AtomicUsize,
}

impl MemoryQueue {
    pub fn new(name: &str) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            name: name.to_string(),
            sender: Mutex::new(Some(tx)),
            receiver: Mutex::new(Some(rx)),
            published: AtomicUsize::new(0),
        }
    }

    /// Number of bodies accepted by `publish_body` so far.
    pub fn published_count(&self) -> usize {
        self.published.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageQueue for MemoryQueue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish_body(&self, body: Vec<u8>) -> Result<(), QueueError> {
        let sender = self.sender
            .lock()
            .map_err(|_| QueueError::Closed(self.name.clone()))?
            .clone();
        match sender {
            Some(tx) => {
                tx.send(body).map_err(|_| QueueError::Closed(self.name.clone()))?;
                self.published.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            None => Err(QueueError::Closed(self.name.clone())),
        }
    }

    async fn consume(&self) -> Result<DeliveryStream, QueueError> {
        let rx = self.receiver
            .lock()
            .map_err(|_| QueueError::Closed(self.name.clone()))?
            .take()
            .ok_or_else(|| QueueError::AlreadyConsumed(self.name.clone()))?;
        Ok(UnboundedReceiverStream::new(rx).map(Ok).boxed())
    }

    async fn close(&self) -> Result<(), QueueError> {
        if let Ok(mut sender) = self.sender.lock() {
            sender.take();
        }
        Ok(())
    }
}
