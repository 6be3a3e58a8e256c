use anyhow::Result;
use clap::Parser;
use log::info;
use wiz_review::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    // A missing .env file is fine; the environment may already be populated.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    info!("Starting wiz-review");
    cli.execute().await?;

    Ok(())
}
