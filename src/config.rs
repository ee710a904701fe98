//! Reveal configuration
//!
//! Read from a JS object (`serde-wasm-bindgen`) or JSON. Field names follow the
//! JS convention (`animateOnScroll`, `blockColor`, ...); every field is optional.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite number >= 0 (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("duration must be a finite number > 0 (got {0})")]
    Duration(f64),

    #[error("Invalid block color: {0:?}")]
    BlockColor(String),

    #[error("Invalid config JSON: {0}")]
    Json(String),
}

/// Options for one reveal instance. Changing any of them rebuilds the reveal.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RevealConfig {
    /// Wait for the root to scroll into view before playing
    pub animate_on_scroll: bool,

    /// Seconds added to every line's start time
    pub delay: f64,

    /// CSS color of the overlay blocks
    pub block_color: String,

    /// Flat addend in the per-line offset, see `reveal::timeline::start_offset`
    pub stagger: f64,

    /// Seconds per scale tween (each line runs two)
    pub duration: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            animate_on_scroll: true,
            delay: 0.0,
            block_color: "#000".to_string(),
            stagger: 0.15,
            duration: 0.75,
        }
    }
}

impl RevealConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("delay", self.delay), ("stagger", self.stagger)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ConfigError::Duration(self.duration));
        }
        // The color lands in an inline style, so keep it to a single value
        let color = self.block_color.trim();
        if color.is_empty() || color.contains(|c: char| matches!(c, ';' | '{' | '}')) {
            return Err(ConfigError::BlockColor(self.block_color.clone()));
        }
        Ok(())
    }

    pub fn with_animate_on_scroll(mut self, animate_on_scroll: bool) -> Self {
        self.animate_on_scroll = animate_on_scroll;
        self
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_block_color(mut self, block_color: impl Into<String>) -> Self {
        self.block_color = block_color.into();
        self
    }

    pub fn with_stagger(mut self, stagger: f64) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }
}
