//! Z-Wave to HomeKit value synchronization in Rust
//!
//! This crate provides the coordination core of a HomeKit bridge for Z-Wave
//! networks: for each device value exposed as a HomeKit characteristic, a
//! [`ValueCoordinator`] keeps the two sides in sync for the lifetime of the
//! accessory.
//!
//! # Features
//!
//! - Bidirectional synchronization between a Z-Wave value and a characteristic
//! - Cached reads with subscribe-time replay of the last known device value
//! - Write confirmation via set-then-refresh with a configurable timeout
//! - Exactly-once completion for every HomeKit read/write request
//! - Pluggable value transformers for device-specific representations
//!
//! Device discovery, the Z-Wave transport, and HAP accessory publication are
//! out of scope; they interact with this crate through the [`DeviceChannel`]
//! and [`hap::Characteristic`] boundaries.

// Core modules
pub mod config;
pub mod error;
pub mod hap;
pub mod logging;
pub mod registry;
pub mod stream;
pub mod support;
pub mod values;

// Re-export main types for convenience
pub use config::BridgeConfig;
pub use error::{BridgeError, Result};
pub use stream::{BoundValueStream, DeviceChannel};
pub use values::{CoordinatorConfig, ValueCoordinator, ValueTransformer};
