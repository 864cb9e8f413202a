//! Text-to-speech (TTS) service adapter

use async_trait::async_trait;
use serde::Serialize;

use super::ServiceClient;
use crate::dialog::SpeechOutput;
use crate::Result;

#[derive(Serialize)]
struct SpeakRequest<'a> {
    text: &'a str,
}

/// Speech output over HTTP; the service plays the text, nothing comes back
pub struct HttpSpeechOutput {
    client: ServiceClient,
}

impl HttpSpeechOutput {
    #[must_use]
    pub const fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SpeechOutput for HttpSpeechOutput {
    async fn speak(&self, text: &str) -> Result<()> {
        self.client.notify(&SpeakRequest { text }).await
    }
}

/// Speech output for deployments without a TTS service: text goes to the log
pub struct LogOnlyOutput;

#[async_trait]
impl SpeechOutput for LogOnlyOutput {
    async fn speak(&self, text: &str) -> Result<()> {
        tracing::info!(text, "speak (no TTS service configured)");
        Ok(())
    }
}
