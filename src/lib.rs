pub mod cli;
pub mod error;
pub mod history;
pub mod models;
pub mod processor;
pub mod queue;
pub mod server;
pub mod shutdown;

use cli::{ mask_url, IngestArgs, ProcessorArgs, ReportingArgs };
use history::RedisConversationStore;
use log::{ error, info };
use processor::Processor;
use queue::{ AmqpQueue, MessageQueue };
use std::error::Error;
use std::sync::Arc;

pub async fn run_ingest_api(args: IngestArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Ingestion API Configuration ---");
    info!("Listen Address: {}", args.listen_addr);
    info!("AMQP URL: {}", mask_url(&args.amqp_url));
    info!("Queue Name: {}", args.queue_name);
    info!("-----------------------------------");

    let queue = Arc::new(AmqpQueue::connect(&args.amqp_url, &args.queue_name).await?);
    let shutdown = shutdown::install_signal_handler();

    let app = server::ingest::router(queue.clone());
    let served = server::serve(&args.listen_addr, app, shutdown).await;

    if let Err(e) = queue.close().await {
        error!("Error closing AMQP connection: {}", e);
    }
    served
}

pub async fn run_processor(args: ProcessorArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Message Processor Configuration ---");
    info!("AMQP URL: {}", mask_url(&args.amqp_url));
    info!("Queue Name: {}", args.queue_name);
    info!("Redis URL: {}", mask_url(&args.redis_url));
    info!("---------------------------------------");

    let queue = Arc::new(AmqpQueue::connect(&args.amqp_url, &args.queue_name).await?);
    let store = Arc::new(RedisConversationStore::connect(&args.redis_url).await?);
    let shutdown = shutdown::install_signal_handler();

    let consumer = Processor::new(queue.clone(), store).start(shutdown.clone()).await?;
    info!("MessageProcessor is running. Press CTRL+C to exit.");

    shutdown.cancelled().await;
    if let Err(e) = consumer.await {
        error!("Processor task failed: {}", e);
    }
    if let Err(e) = queue.close().await {
        error!("Error closing AMQP connection: {}", e);
    }
    Ok(())
}

pub async fn run_reporting_api(args: ReportingArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Reporting API Configuration ---");
    info!("Listen Address: {}", args.listen_addr);
    info!("Redis URL: {}", mask_url(&args.redis_url));
    info!("-----------------------------------");

    let store = Arc::new(RedisConversationStore::connect(&args.redis_url).await?);
    let shutdown = shutdown::install_signal_handler();

    let app = server::reporting::router(store);
    server::serve(&args.listen_addr, app, shutdown).await
}
