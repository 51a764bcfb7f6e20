//! Error handling module for the wizard
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Module-level errors (source parsing, API calls, step transitions) convert
//! into [`WizardError`] so callers can use a single `Result` alias.

use thiserror::Error;

use crate::api::ApiError;
use crate::source::SourceError;
use crate::wizard::WizardTransitionError;

/// Main error type for the wizard
#[derive(Error, Debug)]
pub enum WizardError {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The file reference could not be parsed
    #[error("Invalid file reference: {0}")]
    Source(#[from] SourceError),

    /// A call to an external visualization API failed
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Validation did not produce a usable result
    #[error("Validation error: {0}")]
    Validation(String),

    /// Wizard step transition errors
    #[error("Wizard transition error: {0}")]
    Transition(#[from] WizardTransitionError),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// State errors (mutex poisoning, closed channels)
    #[error("State error: {0}")]
    State(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General errors (catch-all for edge cases)
    #[error("{0}")]
    General(String),
}

/// Result type alias for wizard operations
pub type Result<T> = std::result::Result<T, WizardError>;

impl WizardError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Create a state error
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Create a general error
    pub fn general(msg: impl Into<String>) -> Self {
        Self::General(msg.into())
    }
}
