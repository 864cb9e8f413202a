//! Health and status endpoints

use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use super::ApiState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub questions: usize,
}

/// Session status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub turns: u32,
    pub predefined_limit: u32,
    pub relisten_limit: u32,
    /// Whether the next turn is answered from the question bank
    pub predefined_next: bool,
    /// Whether listening is re-armed after the next turn
    pub rearm_next: bool,
}

/// Liveness probe - is the service running?
async fn health(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        questions: state.questions,
    })
}

/// Current turn counter and what it implies
async fn status(State(state): State<Arc<ApiState>>) -> Json<StatusResponse> {
    let turns = state.turns.load(Ordering::SeqCst);
    Json(StatusResponse {
        turns,
        predefined_limit: state.limits.predefined_limit,
        relisten_limit: state.limits.relisten_limit,
        predefined_next: turns < state.limits.predefined_limit,
        rearm_next: turns < state.limits.relisten_limit,
    })
}

/// Build health router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .with_state(state)
}
