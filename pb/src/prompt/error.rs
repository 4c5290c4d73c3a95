//! Prompt error types

use thiserror::Error;

/// Errors produced by prompt configuration and result delivery
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("Prompt was cancelled")]
    Cancelled,

    #[error("Prompt controller dropped before the session finished")]
    ControllerDropped,

    #[error("Unsupported field option: {0}")]
    UnsupportedFieldOption(String),

    #[error("Invalid value for field option {name}: expected {expected}")]
    InvalidFieldOption { name: String, expected: &'static str },

    #[error("Invalid input width: {0} (expected N% or N columns)")]
    InvalidWidth(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

impl PromptError {
    /// Check if this error means the user dismissed the prompt
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PromptError::Cancelled)
    }
}
