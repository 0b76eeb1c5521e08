use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{GenesisError, Result};

/// Top-level configuration for the Genesis client.
///
/// Loaded from `~/.genesis/config.toml` by default. Every section is
/// optional; missing keys fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenesisConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl GenesisConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GenesisConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| GenesisError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Where the explanation backend lives and how to reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Main query endpoint (POST).
    pub ask_path: String,
    /// "Why this decision" endpoint; the source row is appended as a path segment.
    pub explain_path: String,
    /// "What would flip it" endpoint; the source row is appended as a path segment.
    pub flip_path: String,
    /// Market analytics filter metadata.
    pub market_filters_path: String,
    /// Market analytics snapshot.
    pub market_snapshot_path: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            ask_path: "/ask".to_string(),
            explain_path: "/explain".to_string(),
            flip_path: "/flip".to_string(),
            market_filters_path: "/market_filters".to_string(),
            market_snapshot_path: "/market_snapshot".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Fixed texts the session controller shows when the backend gives it nothing better.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Assistant text when a successful response carries no answer.
    pub no_answer_text: String,
    /// Assistant text appended when the main query fails.
    pub failure_text: String,
    /// Banner text when a failure carries no usable message.
    pub error_fallback: String,
    /// Detail modal text when an explanation fails without any message.
    pub detail_error_fallback: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            no_answer_text: "No answer returned from the RAG system.".to_string(),
            failure_text: "\u{26a0}\u{fe0f} Failed to fetch answer from backend.".to_string(),
            error_fallback: "Something went wrong calling the RAG API.".to_string(),
            detail_error_fallback: "Failed to load explanation.".to_string(),
        }
    }
}
