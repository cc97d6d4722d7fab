//! Headless market daemon.

use market_server::config::Config;
use market_server::server;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        tick_ms = config.tick_interval.as_millis() as u64,
        store = %config.store_dir.display(),
        data = ?config.data_path,
        "starting market-server"
    );

    server::run(config).await
}
