//! Runtime error types

use refreshable_core::RefreshError;
use thiserror::Error;

/// Errors raised by the refresh controller
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration rejected while building the controller
    #[error("Invalid refresh configuration: {0}")]
    Config(#[from] RefreshError),

    /// A refresh had to be launched outside of a tokio runtime
    #[error("No tokio runtime available to run the refresh action")]
    NoRuntime,

    /// The controller owning the update queue was dropped
    #[error("Refresh controller is closed")]
    Closed,
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
