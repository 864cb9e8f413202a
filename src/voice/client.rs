//! Shared HTTP plumbing for collaborator services

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// JSON-over-HTTP client bound to a single service endpoint
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: reqwest::Client,
    name: &'static str,
    url: String,
}

impl ServiceClient {
    /// Create a client for `url`
    ///
    /// # Errors
    ///
    /// Returns `Config` if the URL is empty or the HTTP client cannot be built
    pub fn new(name: &'static str, url: &str, timeout: Option<Duration>) -> Result<Self> {
        if url.trim().is_empty() {
            return Err(Error::Config(format!("{name} service URL is empty")));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build {name} client: {e}")))?;

        Ok(Self {
            client,
            name,
            url: url.to_string(),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST a JSON body and decode a JSON response
    ///
    /// # Errors
    ///
    /// Returns `CollaboratorUnavailable` on transport failure, non-success
    /// status or an undecodable body
    pub async fn call<B, R>(&self, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self.send(body).await?;
        response.json().await.map_err(|e| {
            tracing::error!(service = self.name, error = %e, "failed to parse response");
            Error::CollaboratorUnavailable(format!("{} returned an invalid response: {e}", self.name))
        })
    }

    /// POST a JSON body, ignoring the response body
    ///
    /// # Errors
    ///
    /// Returns `CollaboratorUnavailable` on transport failure or non-success
    /// status
    pub async fn notify<B>(&self, body: &B) -> Result<()>
    where
        B: Serialize + Sync,
    {
        self.send(body).await.map(|_| ())
    }

    async fn send<B>(&self, body: &B) -> Result<reqwest::Response>
    where
        B: Serialize + Sync,
    {
        let response = self
            .client
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(service = self.name, error = %e, "request failed");
                Error::CollaboratorUnavailable(format!("{} unreachable: {e}", self.name))
            })?;

        let status = response.status();
        tracing::debug!(service = self.name, status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(service = self.name, status = %status, body = %body, "service error");
            return Err(Error::CollaboratorUnavailable(format!(
                "{} error {status}: {body}",
                self.name
            )));
        }

        Ok(response)
    }
}
