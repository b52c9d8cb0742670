//! Value transformer contract
//!
//! A transformer maps between the Z-Wave representation of a value and its
//! HomeKit representation, with optional validity filters on each side. The
//! two mappings must be mutual inverses on the domain of valid values; the
//! coordinator relies on that and does not verify it.

use std::fmt;
use std::sync::Arc;

/// A value mapping in one direction
pub type TransformFn = Arc<dyn Fn(&serde_json::Value) -> serde_json::Value + Send + Sync>;

/// A validity predicate over one representation
pub type ValidityFn = Arc<dyn Fn(&serde_json::Value) -> bool + Send + Sync>;

/// Capability bundle describing how a value is represented on each side
///
/// `zwave_to_homekit` is always required. `homekit_to_zwave` is required for
/// read-write values; [`ValueCoordinator`](crate::values::ValueCoordinator)
/// construction enforces that. Absent validity filters accept every value.
#[derive(Clone)]
pub struct ValueTransformer {
    /// Map a device report to its HomeKit representation
    pub zwave_to_homekit: TransformFn,

    /// Map a proposed HomeKit value to the device representation
    pub homekit_to_zwave: Option<TransformFn>,

    /// Filter applied to device reports before they reach HomeKit
    pub is_zwave_valid: Option<ValidityFn>,

    /// Filter applied to proposed HomeKit values before they reach the device
    pub is_homekit_valid: Option<ValidityFn>,
}

impl ValueTransformer {
    /// Identity transformer with no filters
    ///
    /// Used whenever a coordinator is constructed without an explicit
    /// transformer.
    pub fn noop() -> Self {
        Self {
            zwave_to_homekit: Arc::new(|value| value.clone()),
            homekit_to_zwave: Some(Arc::new(|value| value.clone())),
            is_zwave_valid: None,
            is_homekit_valid: None,
        }
    }

    /// Whether a device report passes the Z-Wave validity filter
    pub fn accepts_zwave(&self, value: &serde_json::Value) -> bool {
        self.is_zwave_valid.as_ref().map_or(true, |valid| valid(value))
    }

    /// Whether a proposed HomeKit value passes the HomeKit validity filter
    pub fn accepts_homekit(&self, value: &serde_json::Value) -> bool {
        self.is_homekit_valid
            .as_ref()
            .map_or(true, |valid| valid(value))
    }
}

impl fmt::Debug for ValueTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueTransformer")
            .field("homekit_to_zwave", &self.homekit_to_zwave.is_some())
            .field("is_zwave_valid", &self.is_zwave_valid.is_some())
            .field("is_homekit_valid", &self.is_homekit_valid.is_some())
            .finish()
    }
}
