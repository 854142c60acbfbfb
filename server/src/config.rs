use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::error::ConfigError;

/// Top-level server configuration, loaded from shroud.toml.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub slack: SlackSection,
    pub roster: RosterSection,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct SlackSection {
    /// Shared secret Slack sends as `token` with every slash command.
    pub token: Option<String>,
    /// Incoming webhook URL relayed messages are posted to.
    pub webhook_url: Option<String>,
    /// Channel every relayed message lands in.
    pub channel: String,
    pub request_timeout_secs: u64,
}

impl Default for SlackSection {
    fn default() -> Self {
        Self {
            token: None,
            webhook_url: None,
            channel: "#assassins".into(),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct RosterSection {
    pub path: PathBuf,
}

impl Default for RosterSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./assassins.json"),
        }
    }
}

impl ServerConfig {
    /// Load config from a TOML file. Falls back to defaults if the file doesn't exist.
    /// Environment variables override TOML values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            info!("No config file found at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("INCOMING_SLACK_TOKEN") {
            self.slack.token = Some(v);
        }
        if let Ok(v) = std::env::var("INCOMING_SLACK_WEBHOOK") {
            self.slack.webhook_url = Some(v);
        }
        if let Ok(v) = std::env::var("SLACK_CHANNEL") {
            self.slack.channel = v;
        }
        if let Ok(v) = std::env::var("SLACK_REQUEST_TIMEOUT_SECS")
            && let Ok(secs) = v.parse()
        {
            self.slack.request_timeout_secs = secs;
        }
        if let Ok(v) = std::env::var("ROSTER_PATH") {
            self.roster.path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = std::env::var("PORT")
            && let Ok(port) = v.parse()
        {
            self.server.port = port;
        }
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Outbound webhook timeout. Zero is bumped to one second so the call stays bounded.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.slack.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests that modify environment variables must be serialized to avoid races.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_KEYS: [&str; 7] = [
        "INCOMING_SLACK_TOKEN",
        "INCOMING_SLACK_WEBHOOK",
        "SLACK_CHANNEL",
        "SLACK_REQUEST_TIMEOUT_SECS",
        "ROSTER_PATH",
        "HOST",
        "PORT",
    ];

    /// Helper: clear all relay env vars, set specific ones, then restore.
    fn with_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _lock = ENV_LOCK.lock().unwrap();

        let originals: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        for key in &ENV_KEYS {
            // SAFETY: env access is serialized by ENV_LOCK
            unsafe {
                std::env::remove_var(key);
            }
        }
        for (k, v) in vars {
            // SAFETY: env access is serialized by ENV_LOCK
            unsafe {
                std::env::set_var(k, v);
            }
        }

        f();

        for (k, v) in originals {
            match v {
                // SAFETY: env access is serialized by ENV_LOCK
                Some(val) => unsafe { std::env::set_var(k, val) },
                None => unsafe { std::env::remove_var(k) },
            }
        }
    }

    fn missing_config_path() -> PathBuf {
        tempfile::tempdir().unwrap().path().join("shroud.toml")
    }

    #[test]
    fn test_defaults_when_no_file_and_no_env() {
        with_env(&[], || {
            let config = ServerConfig::load(missing_config_path()).unwrap();
            assert_eq!(config.server.port, 5000);
            assert_eq!(config.listen_address(), "0.0.0.0:5000");
            assert_eq!(config.slack.channel, "#assassins");
            assert!(config.slack.token.is_none());
            assert!(config.slack.webhook_url.is_none());
            assert_eq!(config.roster.path, PathBuf::from("./assassins.json"));
            assert_eq!(config.request_timeout(), Duration::from_secs(10));
        });
    }

    #[test]
    fn test_env_overrides() {
        with_env(
            &[
                ("INCOMING_SLACK_TOKEN", "s3cret"),
                ("INCOMING_SLACK_WEBHOOK", "https://hooks.slack.test/T/B/X"),
                ("SLACK_CHANNEL", "#ops"),
                ("SLACK_REQUEST_TIMEOUT_SECS", "3"),
                ("ROSTER_PATH", "/etc/shroud/roster.json"),
                ("PORT", "8081"),
            ],
            || {
                let config = ServerConfig::load(missing_config_path()).unwrap();
                assert_eq!(config.slack.token.as_deref(), Some("s3cret"));
                assert_eq!(
                    config.slack.webhook_url.as_deref(),
                    Some("https://hooks.slack.test/T/B/X")
                );
                assert_eq!(config.slack.channel, "#ops");
                assert_eq!(config.request_timeout(), Duration::from_secs(3));
                assert_eq!(config.roster.path, PathBuf::from("/etc/shroud/roster.json"));
                assert_eq!(config.server.port, 8081);
            },
        );
    }

    #[test]
    fn test_unparseable_numeric_env_is_ignored() {
        with_env(
            &[("PORT", "not-a-port"), ("SLACK_REQUEST_TIMEOUT_SECS", "soon")],
            || {
                let config = ServerConfig::load(missing_config_path()).unwrap();
                assert_eq!(config.server.port, 5000);
                assert_eq!(config.slack.request_timeout_secs, 10);
            },
        );
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shroud.toml");
        std::fs::write(
            &path,
            "[slack]\ntoken = \"from-file\"\nchannel = \"#file\"\n\n[server]\nport = 7000\n",
        )
        .unwrap();

        with_env(&[("INCOMING_SLACK_TOKEN", "from-env")], || {
            let config = ServerConfig::load(&path).unwrap();
            assert_eq!(config.slack.token.as_deref(), Some("from-env"));
            assert_eq!(config.slack.channel, "#file");
            assert_eq!(config.server.port, 7000);
        });
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shroud.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        with_env(&[], || {
            let result = ServerConfig::load(&path);
            assert!(matches!(result, Err(ConfigError::Parse { .. })));
        });
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ServerConfig::from_toml("[roster]\npath = \"team.json\"\n").unwrap();
        assert_eq!(config.roster.path, PathBuf::from("team.json"));
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.slack.channel, "#assassins");
    }

    #[test]
    fn test_zero_timeout_is_bounded() {
        let config = ServerConfig::from_toml("[slack]\nrequest_timeout_secs = 0\n").unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }
}
