//! Image proxy server.
//!
//! Serves `/api/image/{name}` out of blob storage using the host's managed
//! identity, plus the static front-end.

use mapty::proxy::{self, AzureBlobClient};
use mapty::storage::config::{self, AppConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::load_config().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });
    let settings = config.proxy.with_env_port();

    let blobs = AzureBlobClient::from_env(&settings.storage_account, &settings.container)?;
    proxy::serve(settings, blobs).await?;

    Ok(())
}
