//! HTTP API server
//!
//! Receives the upstream wake-word event and exposes liveness and session
//! status. Turns themselves run in the daemon, one at a time.

pub mod health;
pub mod hotword;

use std::sync::Arc;
use std::sync::atomic::AtomicU32;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

use crate::dialog::DialogLimits;
use crate::Result;

/// Wake word heard upstream; the daemon answers with one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotwordEvent;

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Queue feeding the daemon's turn loop
    pub hotword_tx: mpsc::Sender<HotwordEvent>,
    /// Entries in the loaded question bank
    pub questions: usize,
    /// Session turn count, published by the daemon after each turn
    pub turns: Arc<AtomicU32>,
    pub limits: DialogLimits,
}

/// Build the full API router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(health::router(state.clone()))
        .merge(hotword::router(state))
        .layer(TraceLayer::new_for_http())
}

/// HTTP API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    #[must_use]
    pub const fn new(state: Arc<ApiState>, port: u16) -> Self {
        Self { state, port }
    }

    /// Run the API server until it fails
    ///
    /// # Errors
    ///
    /// Returns error if the port cannot be bound or the server stops
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, router(self.state))
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }

    /// Run the API server in a background task
    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}
