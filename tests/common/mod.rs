//! Shared mock collaborators for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use tokio::sync::{mpsc, oneshot};
use zwave_hap_rust::error::{BridgeError, Result};
use zwave_hap_rust::hap::{Characteristic, ReadHandler, WriteHandler};
use zwave_hap_rust::stream::DeviceChannel;

/// Characteristic test double: records pushes, lets tests fire requests
pub struct MockCharacteristic {
    name: String,
    updates: mpsc::UnboundedSender<serde_json::Value>,
    read_handler: Mutex<Option<ReadHandler>>,
    write_handler: Mutex<Option<WriteHandler>>,
}

impl MockCharacteristic {
    /// Create a mock plus the receiver for values pushed via `update_value`
    pub fn new(name: &str) -> (Self, mpsc::UnboundedReceiver<serde_json::Value>) {
        let (updates, pushed) = mpsc::unbounded_channel();
        (
            Self {
                name: name.to_string(),
                updates,
                read_handler: Mutex::new(None),
                write_handler: Mutex::new(None),
            },
            pushed,
        )
    }

    pub fn has_read_handler(&self) -> bool {
        self.read_handler.lock().unwrap().is_some()
    }

    pub fn has_write_handler(&self) -> bool {
        self.write_handler.lock().unwrap().is_some()
    }

    /// Deliver a read request; the returned receiver resolves when (and if)
    /// the responder is completed
    pub fn read(&self) -> oneshot::Receiver<std::result::Result<serde_json::Value, BridgeError>> {
        let (tx, rx) = oneshot::channel();
        let handler = self.read_handler.lock().unwrap();
        let handler = handler.as_ref().expect("no read handler registered");
        handler(Box::new(move |outcome| {
            let _ = tx.send(outcome);
        }));
        rx
    }

    /// Deliver a write request with a proposed HomeKit value
    pub fn write(
        &self,
        value: serde_json::Value,
    ) -> oneshot::Receiver<std::result::Result<(), BridgeError>> {
        let (tx, rx) = oneshot::channel();
        let handler = self.write_handler.lock().unwrap();
        let handler = handler.as_ref().expect("no write handler registered");
        handler(
            value,
            Box::new(move |outcome| {
                let _ = tx.send(outcome);
            }),
        );
        rx
    }
}

impl Characteristic for MockCharacteristic {
    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn update_value(&self, value: serde_json::Value) {
        let _ = self.updates.send(value);
    }

    fn register_read_handler(&self, handler: ReadHandler) {
        *self.read_handler.lock().unwrap() = Some(handler);
    }

    fn register_write_handler(&self, handler: WriteHandler) {
        *self.write_handler.lock().unwrap() = Some(handler);
    }
}

/// How the mock device answers poll requests
#[derive(Clone)]
pub enum PollBehavior {
    /// Report this value
    Report(serde_json::Value),
    /// Fail the poll
    Fail(String),
    /// Never answer
    Silent,
}

/// Device channel test double with scripted poll/set behavior
pub struct MockDeviceChannel {
    poll_behavior: Mutex<PollBehavior>,
    poll_count: AtomicU32,
    set_calls: Mutex<Vec<serde_json::Value>>,
    set_failure: Mutex<Option<String>>,
}

impl MockDeviceChannel {
    /// A channel that never answers polls
    pub fn silent() -> Self {
        Self {
            poll_behavior: Mutex::new(PollBehavior::Silent),
            poll_count: AtomicU32::new(0),
            set_calls: Mutex::new(Vec::new()),
            set_failure: Mutex::new(None),
        }
    }

    /// A channel that reports `value` on every poll
    pub fn reporting(value: serde_json::Value) -> Self {
        let channel = Self::silent();
        channel.respond_with(value);
        channel
    }

    pub fn respond_with(&self, value: serde_json::Value) {
        *self.poll_behavior.lock().unwrap() = PollBehavior::Report(value);
    }

    pub fn fail_polls(&self, message: &str) {
        *self.poll_behavior.lock().unwrap() = PollBehavior::Fail(message.to_string());
    }

    pub fn fail_sets(&self, message: &str) {
        *self.set_failure.lock().unwrap() = Some(message.to_string());
    }

    /// How many times the device was polled
    pub fn poll_count(&self) -> u32 {
        self.poll_count.load(Ordering::SeqCst)
    }

    /// Every value written so far, in order
    pub fn set_values(&self) -> Vec<serde_json::Value> {
        self.set_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceChannel for MockDeviceChannel {
    async fn current_value(&self) -> Result<serde_json::Value> {
        self.poll_count.fetch_add(1, Ordering::SeqCst);
        let behavior = self.poll_behavior.lock().unwrap().clone();
        match behavior {
            PollBehavior::Report(value) => Ok(value),
            PollBehavior::Fail(message) => Err(BridgeError::device_control(message)),
            PollBehavior::Silent => std::future::pending().await,
        }
    }

    async fn set_value(&self, value: serde_json::Value) -> Result<()> {
        self.set_calls.lock().unwrap().push(value);
        let failure = self.set_failure.lock().unwrap().clone();
        match failure {
            Some(message) => Err(BridgeError::device_control(message)),
            None => Ok(()),
        }
    }
}
