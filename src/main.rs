//! SneakerAsk Admin - back-office pricing and WTB order service

use anyhow::Result;
use sneakerask_admin::{api, config::Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = Config::from_env()?;
    let nats = match &config.nats_url {
        Some(url) => match async_nats::connect(url.as_str()).await {
            Ok(client) => {
                tracing::info!(%url, "connected to NATS");
                Some(client)
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "NATS unavailable, domain events will not be published");
                None
            }
        },
        None => None,
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let app = api::router(api::AppState::new(config, nats));

    tracing::info!("🚀 SneakerAsk admin listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app).await?;
    Ok(())
}
