//! Configuration types for visualization sessions.

use serde::{Deserialize, Serialize};

use super::{DatasetSpec, MAX_INPUT_LEN};

fn default_speed() -> f64 {
    1.0
}

fn default_tick_hz() -> u32 {
    60
}

/// Top-level visualizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizerConfig {
    /// Catalog topic (e.g. "sorting").
    pub topic: String,
    /// Algorithm slug within the topic.
    pub slug: String,
    /// Input dataset.
    #[serde(default)]
    pub dataset: DatasetSpec,
    /// Playback parameters.
    #[serde(default)]
    pub playback: PlaybackConfig,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            topic: "sorting".to_string(),
            slug: "bubble-sort".to_string(),
            dataset: DatasetSpec::default(),
            playback: PlaybackConfig::default(),
        }
    }
}

/// Real-time playback parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Frames per second.
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Host tick rate in Hz (how often the scheduler is ticked).
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    /// Start playing backward from the last frame.
    #[serde(default)]
    pub backward: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            tick_hz: default_tick_hz(),
            backward: false,
        }
    }
}

impl VisualizerConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.topic.is_empty() || self.slug.is_empty() {
            return Err(ConfigError::MissingAlgorithm);
        }
        if self.dataset.n > MAX_INPUT_LEN {
            return Err(ConfigError::DatasetTooLarge {
                n: self.dataset.n,
                max: MAX_INPUT_LEN,
            });
        }
        if self.dataset.min > self.dataset.max {
            return Err(ConfigError::InvalidRange {
                min: self.dataset.min,
                max: self.dataset.max,
            });
        }
        if !self.playback.speed.is_finite() || self.playback.speed <= 0.0 {
            return Err(ConfigError::InvalidSpeed(self.playback.speed));
        }
        if self.playback.tick_hz == 0 {
            return Err(ConfigError::InvalidTickRate);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Topic and slug must be non-empty")]
    MissingAlgorithm,
    #[error("Dataset size {n} exceeds the maximum of {max}")]
    DatasetTooLarge { n: usize, max: usize },
    #[error("Dataset range is empty: min {min} > max {max}")]
    InvalidRange { min: i64, max: i64 },
    #[error("Playback speed must be positive and finite, got {0}")]
    InvalidSpeed(f64),
    #[error("Tick rate must be non-zero")]
    InvalidTickRate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(VisualizerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: VisualizerConfig =
            serde_json::from_str(r#"{"topic": "sorting", "slug": "selection-sort"}"#).unwrap();
        assert_eq!(config.slug, "selection-sort");
        assert_eq!(config.dataset, DatasetSpec::default());
        assert_eq!(config.playback, PlaybackConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = VisualizerConfig::default();
        config.dataset.n = MAX_INPUT_LEN + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DatasetTooLarge { .. })
        ));

        let mut config = VisualizerConfig::default();
        config.dataset.min = 10;
        config.dataset.max = 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { .. })
        ));

        let mut config = VisualizerConfig::default();
        config.playback.speed = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSpeed(_))));

        let mut config = VisualizerConfig::default();
        config.playback.tick_hz = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTickRate)));

        let mut config = VisualizerConfig::default();
        config.slug.clear();
        assert!(matches!(config.validate(), Err(ConfigError::MissingAlgorithm)));
    }
}
