use tracing_subscriber::EnvFilter;

use doc_sentry::api;
use doc_sentry::config::Config;
use doc_sentry::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("LLM provider: {} ({})", config.llm.provider, config.llm.base_url);
    tracing::info!(
        "Chat model: {}, embedding model: {}",
        config.llm.chat_model,
        config.llm.embedding_model
    );

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config)?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
