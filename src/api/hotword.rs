//! Wake-word event endpoint

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tokio::sync::mpsc::error::TrySendError;

use super::{ApiState, HotwordEvent};

/// Build hotword router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/hotword", post(hotword))
        .with_state(state)
}

/// Hotword acknowledgement
#[derive(Debug, Serialize)]
pub struct HotwordResponse {
    pub status: &'static str,
}

/// Queue a turn for the daemon
///
/// Events arriving while a turn is running wait in the queue; turns never
/// overlap.
async fn hotword(State(state): State<Arc<ApiState>>) -> (StatusCode, Json<HotwordResponse>) {
    match state.hotword_tx.try_send(HotwordEvent) {
        Ok(()) => {
            tracing::debug!("hotword queued");
            (StatusCode::ACCEPTED, Json(HotwordResponse { status: "queued" }))
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!("hotword dropped, turn queue full");
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(HotwordResponse { status: "busy" }),
            )
        }
        Err(TrySendError::Closed(_)) => {
            tracing::error!("hotword dropped, dialog loop stopped");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HotwordResponse { status: "stopped" }),
            )
        }
    }
}
