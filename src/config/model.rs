//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a default, so an empty file connects to Libera over TLS
//! with a random nickname.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::nickname::generate_nickname;
use crate::client::reconnect::ReconnectPolicy;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub reconnect: ReconnectConfig,
    #[serde(default)]
    pub ctcp: CtcpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The server to connect to and how to register with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub tls: bool,
    #[serde(default)]
    pub accept_invalid_certs: bool,
    #[serde(default = "default_nickname")]
    pub nickname: String,
    /// Defaults to the nickname.
    #[serde(default)]
    pub username: Option<String>,
    /// Defaults to the nickname.
    #[serde(default)]
    pub realname: Option<String>,
    /// Sent as `PASS` before registration when set.
    #[serde(default)]
    pub password: Option<String>,
    /// Joined once the server welcomes us.
    #[serde(default)]
    pub channels: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            tls: true,
            accept_invalid_certs: false,
            nickname: default_nickname(),
            username: None,
            realname: None,
            password: None,
            channels: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.nickname)
    }

    pub fn realname(&self) -> &str {
        self.realname.as_deref().unwrap_or(&self.nickname)
    }
}

/// Automatic reconnection after the link drops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconnectConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// First wait; the n-th consecutive attempt waits `n` times this.
    #[serde(default = "default_base_delay")]
    pub base_delay_secs: u64,
    #[serde(default)]
    pub max_delay_secs: Option<u64>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_delay_secs: default_base_delay(),
            max_delay_secs: None,
        }
    }
}

impl ReconnectConfig {
    pub fn policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            base_delay: Duration::from_secs(self.base_delay_secs),
            max_delay: self.max_delay_secs.map(Duration::from_secs),
        }
    }
}

/// CTCP (Client-To-Client Protocol) auto-reply settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtcpConfig {
    #[serde(default = "default_true")]
    pub reply_version: bool,
    #[serde(default = "default_true")]
    pub reply_ping: bool,
    #[serde(default = "default_true")]
    pub reply_time: bool,
    #[serde(default)]
    pub reply_finger: bool,
    #[serde(default = "default_version_string")]
    pub version_string: String,
    #[serde(default = "default_finger_string")]
    pub finger_string: String,
}

impl Default for CtcpConfig {
    fn default() -> Self {
        Self {
            reply_version: true,
            reply_ping: true,
            reply_time: true,
            reply_finger: false,
            version_string: default_version_string(),
            finger_string: default_finger_string(),
        }
    }
}

/// Diagnostic output and the optional wire transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn` or `error`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Append every line sent and received to a daily file in `log_dir`.
    #[serde(default)]
    pub transcript: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            transcript: false,
            log_dir: default_log_dir(),
        }
    }
}

fn default_host() -> String {
    "irc.libera.chat".to_string()
}
fn default_port() -> u16 {
    6697
}
fn default_nickname() -> String {
    generate_nickname()
}
fn default_true() -> bool {
    true
}
fn default_base_delay() -> u64 {
    5
}
fn default_version_string() -> String {
    format!("crabirc {}", env!("CARGO_PKG_VERSION"))
}
fn default_finger_string() -> String {
    "crabirc user".to_string()
}
fn default_level() -> String {
    "info".to_string()
}
fn default_log_dir() -> String {
    "~/.local/share/crabirc/logs".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "irc.libera.chat");
        assert_eq!(config.server.port, 6697);
        assert!(config.server.tls);
        assert!(!config.server.accept_invalid_certs);
        assert!(!config.server.nickname.is_empty());
        assert_eq!(config.server.username(), config.server.nickname);
        assert!(config.reconnect.enabled);
        assert_eq!(config.reconnect.base_delay_secs, 5);
        assert!(config.ctcp.reply_version);
        assert!(!config.ctcp.reply_finger);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.transcript);
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r##"
            [server]
            host = "irc.example.net"
            tls = false
            port = 6667
            nickname = "crab"
            realname = "Crab Bot"
            channels = ["#rust", "#crabs"]

            [reconnect]
            base_delay_secs = 2
            max_delay_secs = 30
            "##,
        )
        .unwrap();

        assert_eq!(config.server.host, "irc.example.net");
        assert_eq!(config.server.port, 6667);
        assert!(!config.server.tls);
        assert_eq!(config.server.username(), "crab");
        assert_eq!(config.server.realname(), "Crab Bot");
        assert_eq!(config.server.channels, vec!["#rust", "#crabs"]);

        let policy = config.reconnect.policy();
        assert_eq!(policy.base_delay, Duration::from_secs(2));
        assert_eq!(policy.max_delay, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_serialize_round_trip_keeps_nickname() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.server.nickname, config.server.nickname);
    }
}
