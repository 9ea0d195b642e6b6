use chat_pipeline::cli::ProcessorArgs;
use chat_pipeline::run_processor;
use clap::Parser;
use dotenv::dotenv;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = ProcessorArgs::parse();

    run_processor(args).await
}
