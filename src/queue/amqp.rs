use crate::error::QueueError;
use crate::queue::{ DeliveryStream, MessageQueue };
use async_trait::async_trait;
use futures::StreamExt;
use lapin::options::{ BasicConsumeOptions, BasicPublishOptions, QueueDeclareOptions };
use lapin::types::FieldTable;
use lapin::{ BasicProperties, Channel, Connection, ConnectionProperties };
use log::{ debug, info };

const JSON_CONTENT_TYPE: &str = "application/json";

/// RabbitMQ-backed queue. One connection and one channel, held until
/// [`close`](MessageQueue::close) is called.
pub struct AmqpQueue {
    connection: Connection,
    channel: Channel,
    queue_name: String,
}

impl AmqpQueue {
    /// Dials the broker, opens a channel and declares `queue_name` as a
    /// non-durable, non-exclusive queue that is not auto-deleted.
    pub async fn connect(url: &str, queue_name: &str) -> Result<Self, QueueError> {
        let connection = Connection::connect(url, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;

        let queue = channel.queue_declare(
            queue_name,
            QueueDeclareOptions {
                passive: false,
                durable: false,
                exclusive: false,
                auto_delete: false,
                nowait: false,
            },
            FieldTable::default()
        ).await?;
        info!(
            "Declared queue '{}' ({} messages, {} consumers)",
            queue.name().as_str(),
            queue.message_count(),
            queue.consumer_count()
        );

        Ok(Self {
            connection,
            channel,
            queue_name: queue_name.to_string(),
        })
    }
}

#[async_trait]
impl MessageQueue for AmqpQueue {
    fn name(&self) -> &str {
        &self.queue_name
    }

    async fn publish_body(&self, body: Vec<u8>) -> Result<(), QueueError> {
        // Default exchange, routed by queue name. The confirm is dropped unawaited.
        let _confirm = self.channel.basic_publish(
            "",
            &self.queue_name,
            BasicPublishOptions::default(),
            &body,
            BasicProperties::default().with_content_type(JSON_CONTENT_TYPE.into())
        ).await?;
        debug!("Published {} bytes to '{}'", body.len(), self.queue_name);
        Ok(())
    }

    async fn consume(&self) -> Result<DeliveryStream, QueueError> {
        let consumer = self.channel.basic_consume(
            &self.queue_name,
            "",
            BasicConsumeOptions {
                no_ack: true,
                ..BasicConsumeOptions::default()
            },
            FieldTable::default()
        ).await?;
        info!("Consuming from '{}' with tag '{}'", self.queue_name, consumer.tag().as_str());

        let deliveries = consumer.map(|delivery| {
            delivery.map(|d| d.data).map_err(QueueError::from)
        });
        Ok(deliveries.boxed())
    }

    async fn close(&self) -> Result<(), QueueError> {
        self.channel.close(200, "Bye").await?;
        self.connection.close(200, "Bye").await?;
        info!("Closed AMQP connection for '{}'", self.queue_name);
        Ok(())
    }
}
