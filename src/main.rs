use anyhow::Result;
use shopdesk::config::AppConfig;
use shopdesk::demo;
use shopdesk::server::ServerBuilder;
use shopdesk::storage::Catalog;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shopdesk=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::load()?;
    let catalog = Catalog::in_memory();

    if config.seed_demo_data {
        let ids = demo::seed(&catalog).await?;
        tracing::info!(store_id = %ids.store, "sample store ready");
    }
    if config.auth.tokens.is_empty() {
        tracing::warn!("no auth tokens configured, every admin route will answer 401");
    }

    ServerBuilder::new()
        .with_config(config)
        .with_catalog(catalog)
        .with_default_descriptors()
        .serve()
        .await
}
