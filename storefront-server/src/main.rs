//! storefront-server binary

use storefront_server::utils::logger;
use storefront_server::{AppState, Config, api};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let _log_guard = logger::init_logger();

    let config = Config::from_env()?;
    tracing::info!(
        environment = %config.environment,
        store = ?config.store,
        cloud = %config.cloudinary.cloud_name,
        "Starting storefront-server"
    );
    if config.cloudinary.eager_async && config.cloudinary.notification_url.is_none() {
        tracing::warn!(
            "CLOUDINARY_EAGER_ASYNC is on but CLOUDINARY_NOTIFICATION_URL is unset; \
             variants will only arrive via the account-level notification URL"
        );
    }

    let state = AppState::new(&config)?;
    let app = api::build_app(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("storefront-server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("storefront-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
