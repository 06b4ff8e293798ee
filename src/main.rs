use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use vayu::{VayuConfig, cache, web};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = VayuConfig::from_env();
    tracing::info!(
        port = config.port,
        cache = %config.cache_path.display(),
        "Starting vayu {}",
        vayu::VERSION
    );

    cache::init(&config.cache_path).context("Failed to open cache database")?;

    web::run(config).await
}
