//! Error types for the slot engine

use thiserror::Error;

/// Slot engine error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    /// The symbol set or global settings cannot be played
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed request parameters (probability queries, solve targets)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Convolution lost or gained probability mass
    #[error("Numeric drift: distribution mass {total} deviates from 1.0 by more than {tolerance}")]
    NumericDrift { total: f64, tolerance: f64 },

    #[error("JSON error: {0}")]
    Json(String),
}

impl SlotError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_numeric_drift(&self) -> bool {
        matches!(self, Self::NumericDrift { .. })
    }
}

impl From<serde_json::Error> for SlotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias
pub type SlotResult<T> = Result<T, SlotError>;
