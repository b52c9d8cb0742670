//! Stock transformers for common Z-Wave command classes

use super::transformer::ValueTransformer;
use serde_json::json;
use std::sync::Arc;

fn level_of(value: &serde_json::Value) -> Option<f64> {
    value.as_f64()
}

/// Multilevel switch level (0..=99) exposed as a HomeKit percentage
///
/// Levels pass through unchanged; HomeKit 100% clamps to the Z-Wave maximum
/// of 99 on write, so the round trip is exact on the whole device domain.
pub fn multilevel() -> ValueTransformer {
    ValueTransformer {
        zwave_to_homekit: Arc::new(|value| value.clone()),
        homekit_to_zwave: Some(Arc::new(|value| match level_of(value) {
            Some(level) => json!(level.round().clamp(0.0, 99.0) as u64),
            None => value.clone(),
        })),
        is_zwave_valid: Some(Arc::new(|value| {
            level_of(value).is_some_and(|level| (0.0..=99.0).contains(&level))
        })),
        is_homekit_valid: Some(Arc::new(|value| {
            level_of(value).is_some_and(|level| (0.0..=100.0).contains(&level))
        })),
    }
}

/// Multilevel switch level exposed as a binary HomeKit characteristic
///
/// Any level above zero reads as `truthy`. Writing `truthy` sends 255, which
/// restores the device's last non-zero level; anything else sends 0.
pub fn multilevel_binary(
    truthy: serde_json::Value,
    falsey: serde_json::Value,
) -> ValueTransformer {
    let read_truthy = truthy.clone();
    let read_falsey = falsey.clone();
    let write_truthy = truthy.clone();
    let valid_truthy = truthy;
    let valid_falsey = falsey;

    ValueTransformer {
        zwave_to_homekit: Arc::new(move |value| {
            if level_of(value).is_some_and(|level| level > 0.0) {
                read_truthy.clone()
            } else {
                read_falsey.clone()
            }
        }),
        homekit_to_zwave: Some(Arc::new(move |value| {
            if *value == write_truthy {
                json!(255)
            } else {
                json!(0)
            }
        })),
        is_zwave_valid: Some(Arc::new(|value| {
            level_of(value).is_some_and(|level| (0.0..=99.0).contains(&level))
        })),
        is_homekit_valid: Some(Arc::new(move |value| {
            *value == valid_truthy || *value == valid_falsey
        })),
    }
}
