use anyhow::{Context, Result};
use dotenv::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use valet_relay::gemini::GeminiClient;
use valet_relay::{app, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // GEMINI_API_KEY has no fallback
    let config = Config::from_env().context("invalid configuration")?;

    let gemini = GeminiClient::new(&config.gemini).context("failed to build Gemini client")?;
    let router = app(AppState {
        gemini,
        validate_cards: config.validate_cards,
    });

    tracing::info!(
        model = %config.gemini.model,
        timeout_secs = config.gemini.timeout.as_secs(),
        validate_cards = config.validate_cards,
        "upstream configured"
    );

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!("listening on http://{}", config.addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
