//! Value coordination between Z-Wave and HomeKit
//!
//! The [`ValueCoordinator`] owns bidirectional synchronization for exactly
//! one logical value; [`ValueTransformer`] describes how that value is
//! represented on each side.

pub mod coordinator;
pub mod transformer;
pub mod transformers;

pub use coordinator::{CoordinatorConfig, ValueCoordinator};
pub use transformer::{TransformFn, ValidityFn, ValueTransformer};
