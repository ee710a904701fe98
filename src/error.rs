//! Error types for the reveal pipeline

use thiserror::Error;

use crate::config::ConfigError;
use crate::dom::DomError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RevealError {
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The line splitter could not segment a target
    #[error("Line splitting failed: {0}")]
    Split(String),
}
