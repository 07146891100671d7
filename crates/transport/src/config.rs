use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Errors from loading a [`TransportConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid transport config: {0}")]
    Invalid(String),
}

/// Tuning for passenger world-position recomputation.
///
/// `position_update_interval_ms` bounds how often every passenger's world pose
/// is rederived from its local pose. Between passes a passenger's world pose
/// may trail the transport's motion by up to one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Milliseconds of accumulated tick time between recompute passes.
    pub position_update_interval_ms: u64,
    /// Orientation change (radians) below which cached sin/cos are reused.
    pub orientation_epsilon: f32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            position_update_interval_ms: 500,
            orientation_epsilon: 1.0e-4,
        }
    }
}

impl TransportConfig {
    pub fn position_update_interval(&self) -> Duration {
        Duration::from_millis(self.position_update_interval_ms)
    }

    /// Parse and validate a config from JSON. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.position_update_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "position_update_interval_ms must be greater than zero".into(),
            ));
        }
        if !self.orientation_epsilon.is_finite() || self.orientation_epsilon < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "orientation_epsilon must be finite and non-negative, got {}",
                self.orientation_epsilon
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_config_defaults() {
        let config = TransportConfig::default();
        assert_eq!(config.position_update_interval_ms, 500);
        assert_eq!(config.position_update_interval(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = TransportConfig::from_json_str(r#"{ "position_update_interval_ms": 100 }"#)
            .unwrap();
        assert_eq!(config.position_update_interval_ms, 100);
        assert_eq!(
            config.orientation_epsilon,
            TransportConfig::default().orientation_epsilon
        );
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = TransportConfig::from_json_str(r#"{ "position_update_interval_ms": 0 }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn negative_epsilon_is_rejected() {
        let config = TransportConfig {
            orientation_epsilon: -1.0,
            ..TransportConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = TransportConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = TransportConfig::from_json_file("/nonexistent/ferry/transport.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
