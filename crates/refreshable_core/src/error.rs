//! Core error types

use thiserror::Error;

/// Errors raised while building a refresh state machine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RefreshError {
    /// A configuration distance was zero, negative or not finite
    #[error("Invalid refresh configuration: {field} must be a positive finite number, got {value}")]
    InvalidConfig { field: &'static str, value: f32 },

    /// A mode name did not match any preset
    #[error("Unknown refresh mode: {0} (expected normal, navigation or searchable_navigation)")]
    UnknownMode(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, RefreshError>;
