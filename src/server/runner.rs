//! Server assembly and execution.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::assistant::{AnswerService, AssistantService, OllamaClient};
use crate::config::Config;
use crate::translate::{GoogleTranslateClient, TranslationService, Translator};

use super::{
    handler::{health_check, websocket_handler},
    registry::SessionRegistry,
    router::MessageRouter,
    signal::shutdown_signal,
    state::AppState,
};

/// Build the axum application. Separated from [`run_server`] so tests
/// can serve it on an ephemeral port with stub collaborators.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the chat server with the production collaborator backends.
///
/// # Arguments
///
/// * `host` - The host address to bind to (e.g., "127.0.0.1")
/// * `port` - The port number to bind to (e.g., 8080)
/// * `config` - Backend configuration, usually [`Config::from_env`]
pub async fn run_server(
    host: String,
    port: u16,
    config: Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = Arc::new(SessionRegistry::new());
    let translator: Arc<dyn Translator> = Arc::new(TranslationService::new(
        GoogleTranslateClient::new(&config.translate_url),
    ));
    let assistant: Arc<dyn AnswerService> = Arc::new(AssistantService::new(OllamaClient::new(
        &config.ollama_url,
        &config.ollama_model,
    )));
    let router = MessageRouter::new(registry.clone(), translator, assistant);
    let app_state = Arc::new(AppState { registry, router });

    let app = app(app_state);

    let bind_addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!(
        "WebSocket chat server listening on {}",
        listener.local_addr()?
    );
    tracing::info!("Connect to: ws://{}/ws", bind_addr);
    tracing::info!("Answering questions via {}", config.ollama_url);
    tracing::info!("Press Ctrl+C to shutdown gracefully");

    // Set up graceful shutdown signal handler
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
