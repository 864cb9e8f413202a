//! Open-domain question answering service adapter

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ServiceClient;
use crate::dialog::OpenAnswer;
use crate::Result;

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

#[derive(Deserialize)]
struct AskResponse {
    answer: String,
}

/// Open answering over HTTP
pub struct HttpOpenAnswer {
    client: ServiceClient,
}

impl HttpOpenAnswer {
    #[must_use]
    pub const fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OpenAnswer for HttpOpenAnswer {
    async fn ask(&self, question: &str) -> Result<String> {
        tracing::debug!(question, "forwarding open question");

        let result: AskResponse = self.client.call(&AskRequest { question }).await?;

        tracing::info!(answer_len = result.answer.len(), "open answer received");
        Ok(result.answer)
    }
}
