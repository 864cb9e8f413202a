//! Speech-to-text (STT) service adapter
//!
//! The service owns the microphone: a request starts recognition of the
//! current utterance and the response carries the recognized text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ServiceClient;
use crate::dialog::SpeechToText;
use crate::Result;

#[derive(Serialize)]
struct TranscribeRequest {}

/// Response from the speech-to-text service
#[derive(Deserialize)]
struct TranscribeResponse {
    text: String,
}

/// Speech-to-text over HTTP
pub struct HttpSpeechToText {
    client: ServiceClient,
}

impl HttpSpeechToText {
    #[must_use]
    pub const fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SpeechToText for HttpSpeechToText {
    async fn transcribe(&self) -> Result<String> {
        tracing::debug!(url = self.client.url(), "requesting transcription");

        let result: TranscribeResponse = self.client.call(&TranscribeRequest {}).await?;

        tracing::info!(transcript = %result.text, "transcription complete");
        Ok(result.text)
    }
}
