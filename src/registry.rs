//! Registration of characteristics with the coordination core
//!
//! Thin factory used by accessory drivers: one call per discovered device
//! value wires a [`BoundValueStream`] and a [`ValueCoordinator`] to a
//! characteristic and starts the coordination.

use crate::config::BridgeConfig;
use crate::error::Result;
use crate::hap::Characteristic;
use crate::stream::BoundValueStream;
use crate::values::{CoordinatorConfig, ValueCoordinator, ValueTransformer};
use std::sync::Arc;

/// Parameters for registering one characteristic
pub struct RegisterCharacteristicParams {
    /// The characteristic to keep in sync
    pub characteristic: Arc<dyn Characteristic>,

    /// The device-side stream for the value (the transport layer publishes
    /// spontaneous reports into it)
    pub value_stream: BoundValueStream,

    /// Whether the device proactively reports this value
    pub listening: bool,

    /// Explicitly mark the value read-only
    pub readonly: Option<bool>,

    /// Representation mapping; identity when omitted
    pub transformer: Option<ValueTransformer>,
}

/// Wire a characteristic to its device value and start coordinating
///
/// Applies the bridge-wide confirmation timeout from `bridge_config`. The
/// returned coordinator is already running; the caller owns its lifetime and
/// is responsible for calling [`ValueCoordinator::stop`] when the accessory
/// goes away.
pub async fn register_characteristic(
    params: RegisterCharacteristicParams,
    bridge_config: &BridgeConfig,
) -> Result<ValueCoordinator> {
    let mut coordinator = ValueCoordinator::new(CoordinatorConfig {
        characteristic: params.characteristic,
        value_stream: params.value_stream,
        readonly: params.readonly,
        listening: params.listening,
        transformer: params.transformer,
        set_confirm_timeout: Some(bridge_config.set_confirm_timeout),
    })?;

    coordinator.start().await;
    Ok(coordinator)
}
