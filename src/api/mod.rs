//! HTTP API: chat endpoint, session reset, capability listing, health.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use tracing::info;

use crate::orchestrator::ChatOrchestrator;
use crate::registry::CapabilityRegistry;
use crate::models::response::ChatRequest;
use crate::{AppError, Result};

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct ApiState {
    /// Engine executing plans and assembling responses.
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Registry queried by the capability listing endpoint.
    pub registry: Arc<CapabilityRegistry>,
}

/// Build the application router.
#[must_use]
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/chat/clear", post(clear))
        .route("/api/capabilities", get(capabilities))
        .route("/health", get(health))
        .with_state(state)
}

/// Bind and serve the HTTP API until `shutdown` resolves.
///
/// # Errors
///
/// Returns [`AppError::Http`] if binding or serving fails.
pub async fn serve(
    state: ApiState,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let bind = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|err| AppError::Http(format!("failed to bind on {bind}: {err}")))?;

    info!(%bind, "starting HTTP API");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|err| AppError::Http(format!("server error: {err}")))?;

    info!("HTTP API shut down");
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn chat(State(state): State<ApiState>, Json(request): Json<ChatRequest>) -> Response {
    if request.session_id.trim().is_empty() {
        return bad_request("sessionId must not be empty");
    }
    let response = state.orchestrator.handle_prompt(request).await;
    Json(response).into_response()
}

async fn clear(State(state): State<ApiState>, Json(request): Json<ChatRequest>) -> Response {
    if request.session_id.trim().is_empty() {
        return bad_request("sessionId must not be empty");
    }
    state.orchestrator.clear_session(&request.session_id).await;
    Json(json!({ "status": "ok" })).into_response()
}

async fn capabilities(State(state): State<ApiState>) -> Response {
    Json(state.registry.descriptors()).into_response()
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}
