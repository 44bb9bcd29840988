//! Application configuration.
//!
//! One immutable value, built at startup and passed by reference into the
//! components that need it. Nothing reads ad hoc globals, least of all the
//! audio callback.

use crate::error::{CoreError, Result};
use std::path::PathBuf;

/// Immutable application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Sample rate everything runs at, in Hz. Fixed by the model.
    pub sample_rate: u32,
    /// Boundary fade length in milliseconds.
    pub fade_ms: u32,
    /// Shortest requestable clip, seconds.
    pub min_duration_secs: f32,
    /// Longest requestable clip, seconds.
    pub max_duration_secs: f32,
    /// Slider position on first launch, seconds.
    pub default_duration_secs: f32,
    /// Prompt field character cap.
    pub max_prompt_len: usize,
    /// Root cache directory; `samples/` and `models/` live under it.
    pub cache_dir: PathBuf,
}

impl AppConfig {
    /// Build the configuration with platform cache paths.
    pub fn new() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("sylva");
        Self {
            sample_rate: 32_000,
            fade_ms: 20,
            min_duration_secs: 1.0,
            max_duration_secs: 8.0,
            default_duration_secs: 5.0,
            max_prompt_len: 500,
            cache_dir,
        }
    }

    /// Directory generated samples are written to.
    pub fn samples_dir(&self) -> PathBuf {
        self.cache_dir.join("samples")
    }

    /// Directory model files are cached in.
    pub fn models_dir(&self) -> PathBuf {
        self.cache_dir.join("models")
    }

    /// Create the cache directories if they don't exist.
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.cache_dir)?;
        std::fs::create_dir_all(self.samples_dir())?;
        std::fs::create_dir_all(self.models_dir())?;
        Ok(())
    }

    /// Fade window length in samples: `round(sample_rate * fade_ms / 1000)`.
    pub fn fade_samples(&self) -> usize {
        (self.sample_rate as f64 * self.fade_ms as f64 / 1000.0).round() as usize
    }

    /// Target sample count for a requested duration.
    pub fn samples_for_duration(&self, secs: f32) -> usize {
        (secs as f64 * self.sample_rate as f64).round() as usize
    }

    /// Reject configurations the engine can't run with.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(CoreError::InvalidConfig("sample rate is zero".into()));
        }
        if self.min_duration_secs <= 0.0 || self.max_duration_secs < self.min_duration_secs {
            return Err(CoreError::InvalidConfig(format!(
                "bad duration bounds: {}..{}",
                self.min_duration_secs, self.max_duration_secs
            )));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_samples_at_model_rate() {
        let config = AppConfig::new();
        assert_eq!(config.fade_samples(), 640);
    }

    #[test]
    fn test_samples_for_duration() {
        let config = AppConfig::new();
        assert_eq!(config.samples_for_duration(1.0), 32_000);
        assert_eq!(config.samples_for_duration(5.0), 160_000);
        assert_eq!(config.samples_for_duration(0.5), 16_000);
    }

    #[test]
    fn test_default_validates() {
        assert!(AppConfig::new().validate().is_ok());
    }

    #[test]
    fn test_bad_bounds_rejected() {
        let mut config = AppConfig::new();
        config.max_duration_secs = 0.5;
        assert!(config.validate().is_err());
    }
}
