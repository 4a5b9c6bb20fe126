use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub poller: PollerConfig,
    pub upload: UploadConfig,
}

/// Backend endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the ingestion backend.
    pub base_url: String,
}

/// Document status poller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Wall-clock interval between poll ticks, in milliseconds.
    pub interval_ms: u64,
    /// Poll attempts per document before its status is forced to
    /// `PollingTimeout`.
    pub max_attempts: u32,
}

/// Upload batch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Lowercased file extensions accepted for upload.
    pub allowed_extensions: Vec<String>,
    /// How long the post-batch banner stays visible, in milliseconds.
    pub banner_dismiss_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            poller: PollerConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:50505".to_string(),
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            max_attempts: 30,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: ["pdf", "txt", "md", "docx", "pptx", "html"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            banner_dismiss_ms: 15_000,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/chatdocs/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e} — using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {} — using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("chatdocs").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
