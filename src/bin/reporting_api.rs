use chat_pipeline::cli::ReportingArgs;
use chat_pipeline::run_reporting_api;
use clap::Parser;
use dotenv::dotenv;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = ReportingArgs::parse();

    run_reporting_api(args).await
}
