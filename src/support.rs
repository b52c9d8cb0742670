//! Support utilities for callback handling

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use tracing::{debug, error};

/// Decorates a completion callback so that only the first invocation has
/// effect
///
/// HomeKit treats a doubly-invoked completion callback as a protocol
/// violation, while the coordinator may reach a completion point from more
/// than one code path. The wrapper delivers the first outcome and logs every
/// later invocation, including the invocation count and the dropped outcome.
pub struct ExactlyOnce<T> {
    delegate: Mutex<Option<Box<dyn FnOnce(T) + Send>>>,
    invocations: AtomicU32,
}

impl<T: fmt::Debug> ExactlyOnce<T> {
    /// Wrap a completion callback
    pub fn new(delegate: impl FnOnce(T) + Send + 'static) -> Self {
        Self {
            delegate: Mutex::new(Some(Box::new(delegate))),
            invocations: AtomicU32::new(0),
        }
    }

    /// Deliver an outcome to the wrapped callback
    ///
    /// Only the first call goes through; repeats are counted, logged at debug
    /// level and discarded.
    pub fn invoke(&self, outcome: T) {
        let invocation = self.invocations.fetch_add(1, Ordering::SeqCst) + 1;

        let delegate = match self.delegate.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => {
                error!("completion callback mutex poisoned; dropping outcome");
                return;
            }
        };

        match delegate {
            Some(callback) => callback(outcome),
            None => debug!(
                invocation,
                outcome = ?outcome,
                "completion callback already invoked; discarding repeat"
            ),
        }
    }

    /// How many times `invoke` has been called so far
    pub fn invocations(&self) -> u32 {
        self.invocations.load(Ordering::SeqCst)
    }
}
