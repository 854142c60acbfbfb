//! Error types for roster loading, configuration, and message relaying.

use std::path::PathBuf;

use thiserror::Error;

/// Response shown to the invoker when the shared secret check fails.
pub const CONFIG_ERROR_REPLY: &str = "Config error.";

/// Response shown when Slack omitted a field it always sends.
pub const PROTOCOL_ERROR_REPLY: &str = "Slack bug; inform the team.";

/// Response shown when the webhook could not be reached.
pub const SEND_ERROR_REPLY: &str = "Failed to send message.";

/// Errors raised while loading the roster at startup. All of them are fatal.
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("failed to read roster file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse roster file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate roster entry for username '{0}'")]
    DuplicateUsername(String),

    #[error("roster entry {index} has an empty username")]
    BlankUsername { index: usize },
}

/// Errors raised while loading the server configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Per-request failures. Each one maps to a fixed plain-text reply.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Token missing, wrong, or no token configured on this side.
    #[error("configuration error: {0}")]
    Config(&'static str),

    /// Slack left out a field every slash command carries.
    #[error("missing field '{0}' in slash command payload")]
    Protocol(&'static str),

    #[error("failed to send webhook message: {0}")]
    Send(#[from] SendError),
}

/// Failures talking to the incoming webhook.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("no webhook URL configured")]
    NoWebhook,

    #[error("failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("webhook request timed out")]
    Timeout,

    #[error("webhook request failed: {0}")]
    Transport(reqwest::Error),

    #[error("webhook responded with status {0}")]
    Status(reqwest::StatusCode),
}

impl From<reqwest::Error> for SendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SendError::Timeout
        } else if let Some(status) = err.status() {
            SendError::Status(status)
        } else {
            SendError::Transport(err)
        }
    }
}

impl RelayError {
    /// Stable code used in logs so operators can tell failures apart even
    /// though every reply goes out as HTTP 200.
    pub fn code(&self) -> &'static str {
        match self {
            RelayError::Config(_) => "config_error",
            RelayError::Protocol(_) => "protocol_error",
            RelayError::Send(_) => "send_error",
        }
    }

    /// The text the invoking user sees in Slack.
    pub fn reply(&self) -> &'static str {
        match self {
            RelayError::Config(_) => CONFIG_ERROR_REPLY,
            RelayError::Protocol(_) => PROTOCOL_ERROR_REPLY,
            RelayError::Send(_) => SEND_ERROR_REPLY,
        }
    }
}
