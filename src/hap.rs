//! HomeKit characteristic boundary
//!
//! The HAP accessory layer is out of scope for this crate; coordinators talk
//! to it through the [`Characteristic`] trait. Instead of an open-ended event
//! emitter, the surface is an explicit capability interface: the coordinator
//! registers one read handler and (for writable values) one write handler,
//! and pushes spontaneous updates through [`Characteristic::update_value`].
//!
//! Each incoming request carries a responder the handler must complete at
//! most once; coordinators enforce that with
//! [`crate::support::ExactlyOnce`].

use crate::error::BridgeError;

/// Completion callback for a HomeKit read request
///
/// Receives the characteristic value in HomeKit representation, or the error
/// to report back to the controller.
pub type ReadResponder = Box<dyn FnOnce(Result<serde_json::Value, BridgeError>) + Send>;

/// Completion callback for a HomeKit write request
pub type WriteResponder = Box<dyn FnOnce(Result<(), BridgeError>) + Send>;

/// Handler invoked for every read request on a characteristic
pub type ReadHandler = Box<dyn Fn(ReadResponder) + Send + Sync>;

/// Handler invoked for every write request, with the proposed HomeKit value
pub type WriteHandler = Box<dyn Fn(serde_json::Value, WriteResponder) + Send + Sync>;

/// A HomeKit characteristic as seen by the coordination core
///
/// Implementations are expected to deliver requests sequentially and to
/// tolerate `update_value` pushes at any time, including while a read or
/// write request is still pending. Handler registrations live as long as the
/// characteristic object; they are not torn down when a coordinator stops.
pub trait Characteristic: Send + Sync {
    /// Display name, used for diagnostic logging only
    fn display_name(&self) -> String;

    /// Push a new value to HomeKit, fire-and-forget
    ///
    /// There is no acknowledgment and no failure channel; delivery is
    /// best-effort.
    fn update_value(&self, value: serde_json::Value);

    /// Register the handler for read ("get") requests
    fn register_read_handler(&self, handler: ReadHandler);

    /// Register the handler for write ("set") requests
    fn register_write_handler(&self, handler: WriteHandler);
}
