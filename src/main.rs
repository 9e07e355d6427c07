mod api;
mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use liqpay_gateway::{ExpressGateway, PaymentGateway};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::Config::from_env()?;

    let gateway =
        ExpressGateway::new(config.liqpay.clone()).context("Failed to create LiqPay gateway")?;

    tracing::info!("Starting LiqPay gateway service");
    tracing::info!("Environment: {}", config.server.environment);
    tracing::info!(
        "Gateway: {} (API v{}, sandbox={})",
        gateway.name(),
        config.liqpay.version,
        config.liqpay.test_mode
    );

    let state = api::AppState {
        gateway: Arc::new(gateway),
        environment: config.server.environment.clone(),
    };
    let app = api::router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("HOST and PORT must form a socket address")?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
