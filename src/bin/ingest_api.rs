use chat_pipeline::cli::IngestArgs;
use chat_pipeline::run_ingest_api;
use clap::Parser;
use dotenv::dotenv;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = IngestArgs::parse();

    run_ingest_api(args).await
}
