//! Error types for the Z-Wave HomeKit bridge
//!
//! This module provides the error taxonomy shared by the coordination core:
//! construction-time configuration errors, per-request failures surfaced
//! through HomeKit completion callbacks, and device transport failures.

use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Error types for value coordination and device communication
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Configuration errors (construction-time, fatal)
    #[error("Configuration error: {0}")]
    Config(String),

    /// No value is available and none can be requested
    #[error("Value unavailable: {0}")]
    Unavailable(String),

    /// Device control errors (set/poll failures on the Z-Wave side)
    #[error("Device control error: {0}")]
    DeviceControl(String),

    /// Timeout errors (write confirmation, device polls)
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Generic errors from collaborator layers
    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl BridgeError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unavailable-value error
    pub fn unavailable<S: Into<String>>(msg: S) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a device control error
    pub fn device_control<S: Into<String>>(msg: S) -> Self {
        Self::DeviceControl(msg.into())
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Self::Timeout(msg.into())
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BridgeError::Timeout(_) | BridgeError::DeviceControl(_)
        )
    }

    /// Check if error is a configuration problem that retrying cannot fix
    pub fn is_config_error(&self) -> bool {
        matches!(self, BridgeError::Config(_))
    }
}
