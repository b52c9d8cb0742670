//! Per-value device stream with last-value cache and fan-out
//!
//! A [`BoundValueStream`] adapts a single Z-Wave value for coordination: it
//! caches the most recent report so new subscribers get an immediate replay,
//! fans live reports out to all subscribers in order, and exposes the two
//! operations a coordinator needs against the device: a fire-and-forget
//! refresh and a confirmed write.
//!
//! The transport layer owns delivery of spontaneous device reports and is
//! expected to call [`BoundValueStream::publish`] for each one.

use crate::error::{BridgeError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

/// A single Z-Wave data point as seen by the coordination core
///
/// Implemented by the transport layer. Both operations address exactly one
/// value on one node; addressing and framing live below this boundary.
#[async_trait]
pub trait DeviceChannel: Send + Sync {
    /// Ask the device to report its current value
    async fn current_value(&self) -> Result<serde_json::Value>;

    /// Write a new value to the device
    async fn set_value(&self, value: serde_json::Value) -> Result<()>;
}

struct StreamInner {
    channel: Arc<dyn DeviceChannel>,
    last: RwLock<Option<serde_json::Value>>,
    updates: broadcast::Sender<serde_json::Value>,
}

impl StreamInner {
    async fn publish(&self, value: serde_json::Value) {
        *self.last.write().await = Some(value.clone());
        if self.updates.send(value).is_err() {
            debug!("device value published with no subscribers");
        }
    }
}

/// Multicast stream of device values with subscribe-time replay
///
/// Cheap to clone; all clones share the same cache and subscriber set.
#[derive(Clone)]
pub struct BoundValueStream {
    inner: Arc<StreamInner>,
}

impl BoundValueStream {
    /// Create a stream over a device channel with the default buffer
    pub fn new(channel: Arc<dyn DeviceChannel>) -> Self {
        Self::with_capacity(channel, crate::config::DEFAULT_UPDATE_BUFFER)
    }

    /// Create a stream with an explicit update buffer capacity
    pub fn with_capacity(channel: Arc<dyn DeviceChannel>, capacity: usize) -> Self {
        let (updates, _) = broadcast::channel(capacity);
        Self {
            inner: Arc::new(StreamInner {
                channel,
                last: RwLock::new(None),
                updates,
            }),
        }
    }

    /// Record a device report and fan it out to subscribers
    ///
    /// Called by the transport layer for every spontaneous report, and
    /// internally once a refresh poll completes. Having no subscribers is not
    /// an error.
    pub async fn publish(&self, value: serde_json::Value) {
        self.inner.publish(value).await;
    }

    /// The most recent value seen from the device, if any
    pub async fn last_value(&self) -> Option<serde_json::Value> {
        self.inner.last.read().await.clone()
    }

    /// Subscribe to device values
    ///
    /// Returns the cached last value (the replay a brand-new subscriber gets
    /// immediately) together with a receiver for everything published from
    /// now on. The receiver is registered before the cache is read, so a
    /// report arriving concurrently is never lost; it may be observed both as
    /// the replayed value and as a live update.
    pub async fn subscribe(
        &self,
    ) -> (Option<serde_json::Value>, broadcast::Receiver<serde_json::Value>) {
        let receiver = self.inner.updates.subscribe();
        let cached = self.inner.last.read().await.clone();
        (cached, receiver)
    }

    /// Ask the device to re-report its value, without waiting for the result
    ///
    /// The refreshed value, if any, arrives through [`subscribe`] receivers
    /// like any other report. Poll failures are logged and dropped; a refresh
    /// has no failure channel.
    ///
    /// [`subscribe`]: BoundValueStream::subscribe
    pub fn refresh(&self, reason: &str) {
        debug!(reason, "requesting device value refresh");

        let inner = self.inner.clone();
        tokio::spawn(async move {
            match inner.channel.current_value().await {
                Ok(value) => inner.publish(value).await,
                Err(e) => warn!(error = %e, "device value refresh failed"),
            }
        });
    }

    /// Write a value and wait for a refreshed report to confirm it
    ///
    /// Subscribes before writing so the confirming report cannot be missed,
    /// performs the write, triggers a refresh, and then waits up to
    /// `confirm_timeout` for the next published value. Any report published
    /// after the write counts as confirmation, whether it came from the
    /// confirming poll or a spontaneous device report.
    pub async fn set_then_refresh(
        &self,
        value: serde_json::Value,
        confirm_timeout: Duration,
    ) -> Result<()> {
        let mut confirmations = self.inner.updates.subscribe();

        debug!(value = ?value, "writing device value");
        self.inner.channel.set_value(value).await?;

        self.refresh("confirming value write");

        match tokio::time::timeout(confirm_timeout, confirmations.recv()).await {
            Ok(Ok(confirmed)) => {
                debug!(value = ?confirmed, "device value write confirmed");
                Ok(())
            }
            Ok(Err(e)) => Err(BridgeError::device_control(format!(
                "value stream closed before write confirmation: {e}"
            ))),
            Err(_) => Err(BridgeError::timeout(format!(
                "no refreshed value within {}ms of write",
                confirm_timeout.as_millis()
            ))),
        }
    }
}
