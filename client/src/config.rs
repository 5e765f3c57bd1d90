use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::ClientError;

pub const USERNAME_ENV: &str = "RPS_USERNAME";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server_url: Option<String>,
    pub username: Option<String>,
    /// Second seat is played by an agent
    pub ai_opponent: bool,
    /// Pause between a round result and the next round opening
    pub result_delay_ms: u64,
    pub log_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_url: Some("http://127.0.0.1:8080".to_string()),
            username: None,
            ai_opponent: false,
            result_delay_ms: 3000,
            log_path: "client.log".to_string(),
        }
    }
}

impl Config {
    pub fn load_from(config_path: &str) -> Result<Config, ClientError> {
        let mut config = if Path::new(config_path).exists() {
            let content = fs::read_to_string(config_path)?;
            serde_json::from_str(&content)?
        } else {
            Config::default()
        };

        if let Ok(username) = std::env::var(USERNAME_ENV) {
            if !username.trim().is_empty() {
                config.username = Some(username.trim().to_string());
            }
        }

        Ok(config)
    }

    pub fn save_to(&self, config_path: &str) -> Result<(), ClientError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    pub fn result_delay(&self) -> Duration {
        Duration::from_millis(self.result_delay_ms)
    }

    /// WebSocket endpoint derived from the HTTP server url
    pub fn websocket_url(&self) -> Result<String, ClientError> {
        let server_url = self
            .server_url
            .as_ref()
            .ok_or_else(|| ClientError::Config("No server URL configured".to_string()))?;

        let base = server_url.trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ClientError::Config(format!("Unsupported server URL: {server_url}")));
        }
        Ok(format!("{}/ws", base.replacen("http", "ws", 1)))
    }

    pub fn username(&self) -> Result<&str, ClientError> {
        self.username
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(ClientError::MissingUsername)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.result_delay_ms, 3000);
        assert!(!config.ai_opponent);
        assert_eq!(config.log_path, "client.log");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "ai_opponent": true, "result_delay_ms": 500 }"#).unwrap();

        let config = Config::load_from(path.to_str().unwrap()).unwrap();
        assert!(config.ai_opponent);
        assert_eq!(config.result_delay(), Duration::from_millis(500));
        assert_eq!(config.server_url.as_deref(), Some("http://127.0.0.1:8080"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let path = path.to_str().unwrap();

        let config = Config {
            username: Some("alice".to_string()),
            ..Config::default()
        };
        config.save_to(path).unwrap();

        let reloaded = Config::load_from(path).unwrap();
        assert_eq!(reloaded.username, config.username);
    }

    #[test]
    fn test_websocket_url() {
        let mut config = Config::default();
        assert_eq!(config.websocket_url().unwrap(), "ws://127.0.0.1:8080/ws");

        config.server_url = Some("https://rps.example.com/".to_string());
        assert_eq!(config.websocket_url().unwrap(), "wss://rps.example.com/ws");

        config.server_url = Some("ftp://nope".to_string());
        assert!(config.websocket_url().is_err());
    }

    #[test]
    fn test_username_required() {
        let config = Config {
            username: Some(String::new()),
            ..Config::default()
        };
        assert!(matches!(config.username(), Err(ClientError::MissingUsername)));
    }
}
