//! Listening re-arm signal for the upstream wake-word gate

use async_trait::async_trait;
use serde::Serialize;

use super::ServiceClient;
use crate::dialog::ListenTrigger;
use crate::Result;

#[derive(Serialize)]
struct ActivateRequest {}

/// Re-arms the wake-word gate over HTTP
pub struct HttpListenTrigger {
    client: ServiceClient,
}

impl HttpListenTrigger {
    #[must_use]
    pub const fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListenTrigger for HttpListenTrigger {
    async fn rearm(&self) -> Result<()> {
        tracing::debug!(url = self.client.url(), "re-arming wake word gate");
        self.client.notify(&ActivateRequest {}).await
    }
}

/// Trigger for deployments without a wake-word gate to notify
pub struct LogOnlyTrigger;

#[async_trait]
impl ListenTrigger for LogOnlyTrigger {
    async fn rearm(&self) -> Result<()> {
        tracing::info!("listening re-armed (no hotword gate configured)");
        Ok(())
    }
}
