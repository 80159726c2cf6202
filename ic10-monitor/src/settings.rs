//! Monitor settings

use std::path::{Path, PathBuf};

use anyhow::Context;
use ic10_link::{RigConfig, SerialSettings};
use ic10_protocol::RigDatabase;
use serde::{Deserialize, Serialize};

/// Monitor settings, stored as JSON
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitorSettings {
    /// Serial line
    #[serde(default)]
    pub serial: SerialSettings,
    /// Rig model name (for frame layout and channel count)
    pub model: String,
    /// Status query attempts
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Sleep between event polls when nothing arrived
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_retries() -> u32 {
    3
}

fn default_poll_interval() -> u64 {
    50
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            serial: SerialSettings::default(),
            model: "TS-440S".to_string(),
            retries: default_retries(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl MonitorSettings {
    /// Get the XDG config directory for ic10
    /// Uses $XDG_CONFIG_HOME/ic10, falls back to ~/.config/ic10
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("ic10"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("ic10"))
    }

    /// Default settings file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("monitor.json"))
    }

    /// Load from `path`, or from the default path if none is given
    ///
    /// An explicit path must exist and parse. A missing default file yields
    /// the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn load_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))
    }

    /// Save settings to the default path
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = Self::default_path().context("Could not determine settings path")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create settings directory")?;
        }
        std::fs::write(&path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Rig configuration for the configured model
    pub fn rig_config(&self) -> anyhow::Result<RigConfig> {
        let model = RigDatabase::by_name(&self.model)
            .with_context(|| format!("Unknown rig model {}", self.model))?;
        let config = RigConfig::for_model(model).with_retries(self.retries);
        config.validate()?;
        Ok(config)
    }
}
