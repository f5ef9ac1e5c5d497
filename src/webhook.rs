//! HTTP ingress: Telegram posts updates to `/webhook/{secret}`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::conversation::Conversations;
use crate::services::Update;

#[derive(Clone)]
pub struct AppState {
    pub conversations: Arc<Conversations>,
    pub secret: Arc<str>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Acknowledges every update carrying the right secret, decodable or not.
/// Conversation steps run in the background, in arrival order per
/// conversation.
async fn receive_update(
    State(state): State<AppState>,
    Path(secret): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    if secret != *state.secret {
        return Err(StatusCode::NOT_FOUND);
    }

    match serde_json::from_slice::<Update>(&body) {
        Ok(update) => {
            let update_id = update.update_id;
            match update.into_incoming() {
                Some(incoming) => state.conversations.submit(incoming),
                None => debug!(update_id, "Update carries no user message"),
            }
        }
        Err(e) => warn!(error = %e, size = body.len(), "Undecodable update"),
    }

    Ok(Json(json!({ "ok": true })))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/webhook/{secret}", post(receive_update))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
