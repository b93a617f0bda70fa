use std::sync::Arc;

use anyhow::Result;
use nimbus_core::{AppError, Config};
use nimbus_weather::WeatherService;

#[tokio::main]
async fn main() -> Result<()> {
    nimbus_core::init()?;

    if let Err(e) = run().await {
        tracing::error!("{} ({})", e.user_message(), e);
        return Err(e.into());
    }

    Ok(())
}

async fn run() -> Result<(), AppError> {
    let config = Config::load_validated()?;
    let service = Arc::new(WeatherService::from_config(&config)?);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    tracing::info!("Nimbus listening on {}", listener.local_addr()?);

    axum::serve(listener, nimbus::routes::router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Nimbus stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
