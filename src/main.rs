// src/main.rs

use tracing::info;
use tracing_subscriber::EnvFilter;
use universe_loader::{HttpSession, Pipeline, PipelineConfig, YahooProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = PipelineConfig::default();
    let session = HttpSession::new()?;
    let provider = YahooProvider::new(session.clone());

    let report = Pipeline::new(config, provider).run(&session).await?;

    info!(
        "Done: {} registry tickers, {} fetched, {} failed, {} kept, {} sectors",
        report.registry_size,
        report.fetched,
        report.failed.len(),
        report.table.symbols().len(),
        report.sectors.shares.len()
    );
    Ok(())
}
