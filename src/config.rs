//! Bridge-level configuration
//!
//! Defaults shared by every coordinator a bridge registers. Individual
//! coordinators can override the confirmation timeout through
//! [`crate::values::CoordinatorConfig`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default timeout for a set-then-refresh confirmation round trip
pub const DEFAULT_SET_CONFIRM_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default broadcast buffer for device value updates
pub const DEFAULT_UPDATE_BUFFER: usize = 16;

/// Bridge-wide defaults applied when registering characteristics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// How long a write waits for a refreshed confirmation before failing
    pub set_confirm_timeout: Duration,

    /// Capacity of the per-value update broadcast buffer
    pub update_buffer: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            set_confirm_timeout: DEFAULT_SET_CONFIRM_TIMEOUT,
            update_buffer: DEFAULT_UPDATE_BUFFER,
        }
    }
}

impl BridgeConfig {
    /// Create config from environment
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(timeout_ms) = std::env::var("ZWAVE_HAP_SET_CONFIRM_TIMEOUT_MS") {
            if let Ok(ms) = timeout_ms.parse::<u64>() {
                config.set_confirm_timeout = Duration::from_millis(ms);
            }
        }

        if let Ok(buffer) = std::env::var("ZWAVE_HAP_UPDATE_BUFFER") {
            if let Ok(capacity) = buffer.parse::<usize>() {
                if capacity > 0 {
                    config.update_buffer = capacity;
                }
            }
        }

        config
    }
}
