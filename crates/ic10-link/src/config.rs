//! Link and rig configuration

use std::time::Duration;

use ic10_protocol::channel::MAX_CHANNELS;
use ic10_protocol::{FrameLayout, RigModel};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RigError};

/// Longest reply read before giving up on a terminator
pub const DEFAULT_REPLY_LIMIT: usize = 50;

/// Per-rig protocol configuration, passed to every core operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Status frame layout of the model
    pub layout: FrameLayout,
    /// Attempts for the status frame query (at least 1)
    pub retries: u32,
    /// Memory channels the model has
    pub channel_count: u8,
    /// Maximum reply length in bytes
    pub reply_limit: usize,
    /// The model cannot transmit
    pub receive_only: bool,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            layout: FrameLayout::default(),
            retries: 3,
            channel_count: MAX_CHANNELS,
            reply_limit: DEFAULT_REPLY_LIMIT,
            receive_only: false,
        }
    }
}

impl RigConfig {
    /// Configuration for a model from the database, default retries
    pub fn for_model(model: &RigModel) -> Self {
        Self {
            layout: model.layout(),
            channel_count: model.channel_count,
            receive_only: model.receive_only,
            ..Self::default()
        }
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.retries == 0 {
            return Err(RigError::Config("retries must be at least 1".into()));
        }
        if !self.layout.is_valid() {
            return Err(RigError::Config(format!(
                "frame width {} is below the minimum of {}",
                self.layout.frame_width,
                FrameLayout::MIN_WIDTH
            )));
        }
        if self.channel_count == 0 || self.channel_count > MAX_CHANNELS {
            return Err(RigError::Config(format!(
                "channel count {} outside 1..={}",
                self.channel_count, MAX_CHANNELS
            )));
        }
        if self.reply_limit <= self.layout.frame_width {
            return Err(RigError::Config(format!(
                "reply limit {} cannot hold a {}-byte status frame",
                self.reply_limit,
                self.layout.frame_width + 1
            )));
        }
        Ok(())
    }
}

/// Serial line parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    /// Port name (e.g. `/dev/ttyUSB0`, `COM3`)
    pub port: String,
    pub baud_rate: u32,
    /// 1 or 2
    pub stop_bits: u8,
    /// Read timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: 4800,
            stop_bits: 2,
            timeout_ms: 500,
        }
    }
}

impl SerialSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ic10_protocol::RigDatabase;

    #[test]
    fn test_default_config_is_valid() {
        let config = RigConfig::default();
        assert_eq!(config.layout.frame_width, 38);
        assert_eq!(config.retries, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_retries_rejected() {
        assert!(matches!(
            RigConfig::default().with_retries(0).validate(),
            Err(RigError::Config(_))
        ));
    }

    #[test]
    fn test_narrow_layout_rejected() {
        let config = RigConfig {
            layout: FrameLayout::new(12),
            ..RigConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_for_model() {
        let model = RigDatabase::by_name("R-5000").unwrap();
        let config = RigConfig::for_model(model);
        assert_eq!(config.layout.frame_width, model.frame_width);
        assert_eq!(config.channel_count, 100);
        assert!(config.receive_only);
        assert!(config.validate().is_ok());
        assert!(!RigConfig::default().receive_only);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: RigConfig = serde_json::from_str(r#"{"retries": 5}"#).unwrap();
        assert_eq!(config.retries, 5);
        assert_eq!(config.layout, FrameLayout::default());

        let serial: SerialSettings =
            serde_json::from_str(r#"{"port": "/dev/ttyUSB0"}"#).unwrap();
        assert_eq!(serial.baud_rate, 4800);
        assert_eq!(serial.stop_bits, 2);
    }
}
