use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use super::command::SlashCommand;
use super::message::OutboundMessage;
use super::webhook::WebhookClient;
use crate::config::ServerConfig;
use crate::error::RelayError;
use crate::roster::Roster;

/// A message that made it to the webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub text: String,
    /// The real sender, only echoed back to them.
    pub user_name: String,
    pub disguise_name: String,
}

impl Delivery {
    /// Reply shown to the invoker only.
    pub fn confirmation(&self) -> String {
        format!("Anonymously sent [{}] to {}", self.text, self.user_name)
    }
}

/// Relays slash commands to the webhook under the sender's disguise.
pub struct Relay {
    roster: Roster,
    token: Option<SecretString>,
    channel: String,
    webhook: WebhookClient,
}

impl Relay {
    /// An empty or missing `token` rejects every request.
    pub fn new(
        roster: Roster,
        token: Option<String>,
        channel: impl Into<String>,
        webhook: WebhookClient,
    ) -> Self {
        Self {
            roster,
            token: token.filter(|t| !t.is_empty()).map(SecretString::from),
            channel: channel.into(),
            webhook,
        }
    }

    pub fn from_config(config: &ServerConfig, roster: Roster) -> Result<Self, reqwest::Error> {
        let webhook =
            WebhookClient::new(config.slack.webhook_url.clone(), config.request_timeout())?;
        Ok(Self::new(
            roster,
            config.slack.token.clone(),
            config.slack.channel.clone(),
            webhook,
        ))
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn has_webhook(&self) -> bool {
        self.webhook.is_configured()
    }

    /// Validate the command and post it under the sender's disguise.
    pub async fn relay(&self, command: SlashCommand) -> Result<Delivery, RelayError> {
        self.authenticate(command.token.as_deref())?;

        let text = command.text.ok_or(RelayError::Protocol("text"))?;
        let text = text.trim().to_string();
        let user_name = command.user_name.ok_or(RelayError::Protocol("user_name"))?;

        let disguise = self.roster.resolve(&user_name);
        let message = OutboundMessage::disguised(text, disguise, self.channel.as_str());
        self.webhook.send(&message).await?;

        debug!(user = %user_name, disguise = %message.username, "Relayed message");
        Ok(Delivery {
            text: message.text,
            user_name,
            disguise_name: message.username,
        })
    }

    /// Run [`Relay::relay`] and turn the outcome into the plain-text reply Slack shows.
    pub async fn respond(&self, command: SlashCommand) -> String {
        match self.relay(command).await {
            Ok(delivery) => {
                info!(
                    disguise = %delivery.disguise_name,
                    channel = %self.channel,
                    "Anonymous message relayed"
                );
                delivery.confirmation()
            }
            Err(e) => {
                warn!(code = e.code(), error = %e, "Slash command rejected");
                e.reply().to_string()
            }
        }
    }

    fn authenticate(&self, submitted: Option<&str>) -> Result<(), RelayError> {
        let expected = self
            .token
            .as_ref()
            .ok_or(RelayError::Config("no verification token configured"))?;
        let submitted = submitted.ok_or(RelayError::Config("token missing from request"))?;

        if constant_time_compare(submitted.as_bytes(), expected.expose_secret().as_bytes()) {
            Ok(())
        } else {
            Err(RelayError::Config("token mismatch"))
        }
    }
}

/// Constant-time byte comparison so token checks don't leak timing.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
