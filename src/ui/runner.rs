//! Server runner: builds application state and router, then serves.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    error::ServerError,
    infrastructure::{repository::InMemoryCodeBlockRepository, seed::default_code_blocks},
    ui::{
        handler::{
            get_code_block, get_rating, health_check, list_code_blocks, submit_rating,
            websocket_handler,
        },
        signal::shutdown_signal,
        state::{AppState, RoomRegistry},
    },
};

/// Build default application state backed by the in-memory store and the
/// seeded code block catalog.
pub fn default_state() -> Arc<AppState> {
    let repository = Arc::new(InMemoryCodeBlockRepository::new(default_code_blocks()));
    let registry = Arc::new(RoomRegistry::new());
    Arc::new(AppState {
        repository,
        registry,
    })
}

/// Build the axum application router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/codeblocks", get(list_code_blocks))
        .route("/api/codeblock/{id}", get(get_code_block))
        .route(
            "/api/codeblock/{id}/rating",
            get(get_rating).post(submit_rating),
        )
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until a shutdown signal arrives.
pub async fn run(host: &str, port: u16) -> Result<(), ServerError> {
    let state = default_state();
    let router = app(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
