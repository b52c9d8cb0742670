//! Coordinates value streams from both Z-Wave and HomeKit for a single
//! characteristic

use crate::config::DEFAULT_SET_CONFIRM_TIMEOUT;
use crate::error::{BridgeError, Result};
use crate::hap::Characteristic;
use crate::stream::BoundValueStream;
use crate::support::ExactlyOnce;
use crate::values::transformer::ValueTransformer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Construction parameters for a [`ValueCoordinator`]
pub struct CoordinatorConfig {
    /// The HomeKit characteristic this value is exposed as
    pub characteristic: Arc<dyn Characteristic>,

    /// The device-side stream for this value
    pub value_stream: BoundValueStream,

    /// Explicitly mark the value read-only
    pub readonly: Option<bool>,

    /// Whether the device proactively reports value changes
    ///
    /// A non-listening value is treated as read-only regardless of
    /// `readonly`: without spontaneous reports there is no reliable notion of
    /// a current value to accept writes against.
    pub listening: bool,

    /// Representation mapping; identity when omitted
    pub transformer: Option<ValueTransformer>,

    /// Write confirmation timeout; bridge default when omitted
    pub set_confirm_timeout: Option<Duration>,
}

struct CoordinatorContext {
    name: String,
    characteristic: Arc<dyn Characteristic>,
    value_stream: BoundValueStream,
    transformer: ValueTransformer,
    readonly: bool,
    listening: bool,
    set_confirm_timeout: Duration,
}

/// Owns bidirectional synchronization for exactly one logical value
///
/// Constructed once per characteristic; [`start`](ValueCoordinator::start)
/// activates both directions and must be called exactly once,
/// [`stop`](ValueCoordinator::stop) releases the device subscription.
/// Handler registrations on the characteristic live as long as the
/// characteristic itself and are not torn down on stop.
pub struct ValueCoordinator {
    context: Arc<CoordinatorContext>,
    shutdown: CancellationToken,
    forward_task: Option<JoinHandle<()>>,
}

impl ValueCoordinator {
    /// Create a coordinator for one characteristic/value pair
    ///
    /// Fails when the value resolves read-write but the transformer has no
    /// `homekit_to_zwave` mapping. This is a configuration error; the
    /// coordinator must not be constructed.
    pub fn new(config: CoordinatorConfig) -> Result<Self> {
        let readonly = !config.listening || config.readonly.unwrap_or(false);
        let transformer = config.transformer.unwrap_or_else(ValueTransformer::noop);

        if !readonly && transformer.homekit_to_zwave.is_none() {
            return Err(BridgeError::config(
                "homekit_to_zwave is required for readwrite values",
            ));
        }

        let context = CoordinatorContext {
            name: config.characteristic.display_name(),
            characteristic: config.characteristic,
            value_stream: config.value_stream,
            transformer,
            readonly,
            listening: config.listening,
            set_confirm_timeout: config
                .set_confirm_timeout
                .unwrap_or(DEFAULT_SET_CONFIRM_TIMEOUT),
        };

        Ok(Self {
            context: Arc::new(context),
            shutdown: CancellationToken::new(),
            forward_task: None,
        })
    }

    /// Whether the value resolved to read-only
    pub fn is_readonly(&self) -> bool {
        self.context.readonly
    }

    /// Activate both directions of synchronization
    ///
    /// Call exactly once per instance; a second call would subscribe and
    /// register handlers a second time.
    pub async fn start(&mut self) {
        let context = self.context.clone();

        let (cached, updates) = context.value_stream.subscribe().await;
        let cached = cached.filter(|value| context.transformer.accepts_zwave(value));
        let had_initial = cached.is_some();

        let forward_context = context.clone();
        let shutdown = self.shutdown.clone();
        self.forward_task = Some(tokio::spawn(async move {
            forward_context
                .forward_device_values(cached, updates, shutdown)
                .await;
        }));

        // The stream replays its last value to new subscribers; if there was
        // nothing to replay, the device has never reported and we have to ask.
        if !had_initial {
            context.value_stream.refresh("No initial value on startup");
        }

        if !context.readonly {
            let write_context = context.clone();
            context
                .characteristic
                .register_write_handler(Box::new(move |proposed, respond| {
                    let context = write_context.clone();
                    let respond = ExactlyOnce::new(respond);
                    tokio::spawn(async move { context.handle_write(proposed, respond).await });
                }));
        }

        let read_context = context.clone();
        context
            .characteristic
            .register_read_handler(Box::new(move |respond| {
                let context = read_context.clone();
                let respond = ExactlyOnce::new(respond);
                tokio::spawn(async move { context.handle_read(respond).await });
            }));

        info!(
            characteristic = %context.name,
            readonly = context.readonly,
            listening = context.listening,
            "value coordination started"
        );
    }

    /// Release the device subscription; idempotent
    pub fn stop(&mut self) {
        if self.forward_task.take().is_some() {
            self.shutdown.cancel();
            info!(characteristic = %self.context.name, "value coordination stopped");
        }
    }
}

impl CoordinatorContext {
    async fn forward_device_values(
        &self,
        cached: Option<serde_json::Value>,
        mut updates: broadcast::Receiver<serde_json::Value>,
        shutdown: CancellationToken,
    ) {
        if let Some(value) = cached {
            self.send_to_homekit(&value);
        }

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                update = updates.recv() => {
                    match update {
                        Ok(value) => {
                            if !self.transformer.accepts_zwave(&value) {
                                debug!(
                                    characteristic = %self.name,
                                    value = ?value,
                                    "dropping device value rejected by validity filter"
                                );
                                continue;
                            }
                            // Defer one tick so the push cannot reenter HAP
                            // event delivery from inside a callback.
                            tokio::task::yield_now().await;
                            self.send_to_homekit(&value);
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(
                                characteristic = %self.name,
                                skipped,
                                "device value updates lagged"
                            );
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            }
        }
    }

    fn send_to_homekit(&self, value: &serde_json::Value) {
        let homekit_value = (self.transformer.zwave_to_homekit)(value);
        debug!(
            characteristic = %self.name,
            value = ?homekit_value,
            "forwarding device value to HomeKit"
        );
        self.characteristic.update_value(homekit_value);
    }

    async fn handle_read(&self, respond: ExactlyOnce<Result<serde_json::Value>>) {
        let cached = self
            .value_stream
            .last_value()
            .await
            .filter(|value| self.transformer.accepts_zwave(value));

        if let Some(value) = cached {
            let homekit_value = (self.transformer.zwave_to_homekit)(&value);
            debug!(
                characteristic = %self.name,
                value = ?homekit_value,
                "answering read from cached value"
            );
            respond.invoke(Ok(homekit_value));
            return;
        }

        if !self.listening {
            respond.invoke(Err(BridgeError::unavailable("unable to request value")));
            return;
        }

        // The refreshed value reaches HomeKit through the ordinary push path;
        // this request's responder stays pending.
        debug!(
            characteristic = %self.name,
            "no cached value for read; requesting refresh"
        );
        self.value_stream.refresh("HomeKit requested");
    }

    async fn handle_write(&self, proposed: serde_json::Value, respond: ExactlyOnce<Result<()>>) {
        if self.readonly {
            debug!(characteristic = %self.name, "ignoring write to readonly value");
            return;
        }

        if !self.transformer.accepts_homekit(&proposed) {
            debug!(
                characteristic = %self.name,
                value = ?proposed,
                "ignoring write rejected by validity filter"
            );
            return;
        }

        // Construction guarantees the mapping exists for writable values
        let Some(homekit_to_zwave) = self.transformer.homekit_to_zwave.as_ref() else {
            debug!(characteristic = %self.name, "no homekit_to_zwave mapping; ignoring write");
            return;
        };

        let device_value = homekit_to_zwave(&proposed);
        debug!(
            characteristic = %self.name,
            value = ?device_value,
            "forwarding HomeKit value to device"
        );

        match self
            .value_stream
            .set_then_refresh(device_value, self.set_confirm_timeout)
            .await
        {
            Ok(()) => respond.invoke(Ok(())),
            Err(e) => respond.invoke(Err(e)),
        }
    }
}
