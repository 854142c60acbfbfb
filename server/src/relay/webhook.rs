use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use super::message::OutboundMessage;
use crate::error::SendError;

/// Posts messages to a single Slack incoming webhook.
pub struct WebhookClient {
    client: reqwest::Client,
    url: Option<SecretString>,
}

impl WebhookClient {
    /// Build a client whose requests give up after `timeout`.
    ///
    /// A missing or empty `url` is accepted; every send then fails with
    /// [`SendError::NoWebhook`].
    pub fn new(url: Option<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("ShroudRelay/0.1")
            .build()?;
        Ok(Self {
            client,
            url: url.filter(|u| !u.trim().is_empty()).map(SecretString::from),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// POST `message` as JSON. Non-2xx responses count as failures.
    pub async fn send(&self, message: &OutboundMessage) -> Result<(), SendError> {
        let url = self.url.as_ref().ok_or(SendError::NoWebhook)?;
        let body = serde_json::to_vec(message)?;

        let resp = self
            .client
            .post(url.expose_secret())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        debug!(status = %resp.status(), "Webhook accepted message");
        Ok(())
    }
}
