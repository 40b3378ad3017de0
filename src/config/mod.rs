use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub sync: SyncConfig,
    pub api: ApiConfig,
}

/// Where the Meeting Copilot backend lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Backend base URL. The WebSocket URL is derived from it.
    pub base_url: String,
    /// Path of the push-stream endpoint on the backend.
    pub ws_path: String,
    /// OAuth token forwarded on join requests, if the backend requires one.
    pub oauth_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            ws_path: "/ws/agent".to_string(),
            oauth_token: None,
        }
    }
}

impl ServerConfig {
    /// Derive the WebSocket URL from the HTTP base URL.
    pub fn ws_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            // Already a ws:// or wss:// URL
            base.to_string()
        };
        format!("{}{}", ws_base, self.ws_path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Fixed delay before reconnecting after the stream drops (default: 3s)
    pub reconnect_delay_ms: u64,
    /// Interval between heartbeat probes on an open stream (default: 30s)
    pub heartbeat_interval_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: 3000,
            heartbeat_interval_ms: 30000,
        }
    }
}

impl SyncConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Port the local HTTP API listens on.
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { port: 3939 }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.sync.reconnect_delay_ms, 3000);
        assert_eq!(config.sync.heartbeat_interval_ms, 30000);
        assert_eq!(config.api.port, 3939);
    }

    #[test]
    fn test_ws_url_derivation() {
        let mut server = ServerConfig::default();
        assert_eq!(server.ws_url(), "ws://127.0.0.1:8000/ws/agent");

        server.base_url = "https://copilot.example.com/".to_string();
        assert_eq!(server.ws_url(), "wss://copilot.example.com/ws/agent");

        server.base_url = "ws://10.0.0.5:9000".to_string();
        assert_eq!(server.ws_url(), "ws://10.0.0.5:9000/ws/agent");
    }

    #[test]
    fn test_partial_config_parses_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            base_url = "https://copilot.example.com"

            [sync]
            reconnect_delay_ms = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.server.base_url, "https://copilot.example.com");
        assert_eq!(config.server.ws_path, "/ws/agent");
        assert_eq!(config.sync.reconnect_delay_ms, 500);
        assert_eq!(config.sync.heartbeat_interval_ms, 30000);
        assert_eq!(config.api.port, 3939);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.server.oauth_token = Some("tok-123".to_string());
        config.api.port = 4001;

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.server.oauth_token, Some("tok-123".to_string()));
        assert_eq!(parsed.api.port, 4001);
    }
}
