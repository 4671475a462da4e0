// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Handoff between the transport's delivery context and the session.
//!
//! The delivery context calls [`SessionHandler`], which commits snapshots to
//! the shared [`SessionState`] and pushes them into one channel per wait
//! category. The session owns the receiving ends in [`Handoff`] and awaits
//! them with a timeout.

use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::mpsc;

use crate::error::ProtocolError;
use crate::protocol::{ConnectionOutcome, EventHandler};
use crate::state::{SessionState, SessionStatus};
use crate::telemetry::{self, DeviceMessage, SensorSnapshot, StateSnapshot};

/// Pending items kept per wait category while nobody waits.
const HANDOFF_CAPACITY: usize = 4;

/// Session side of the delivery context, shared with the transport.
pub(crate) struct SessionHandler {
    status_topic: String,
    status: RwLock<SessionStatus>,
    snapshots: RwLock<SessionState>,
    connect_tx: mpsc::Sender<ConnectionOutcome>,
    disconnect_tx: mpsc::Sender<u8>,
    state_tx: mpsc::Sender<StateSnapshot>,
    sensors_tx: mpsc::Sender<SensorSnapshot>,
}

/// Receiving ends of the handoff channels.
pub(crate) struct Handoff {
    pub(crate) connect: mpsc::Receiver<ConnectionOutcome>,
    pub(crate) disconnect: mpsc::Receiver<u8>,
    pub(crate) state: mpsc::Receiver<StateSnapshot>,
    pub(crate) sensors: mpsc::Receiver<SensorSnapshot>,
}

impl SessionHandler {
    /// Creates a handler listening on `status_topic` and its handoff.
    pub(crate) fn new(status_topic: String) -> (Self, Handoff) {
        let (connect_tx, connect) = mpsc::channel(HANDOFF_CAPACITY);
        let (disconnect_tx, disconnect) = mpsc::channel(HANDOFF_CAPACITY);
        let (state_tx, state) = mpsc::channel(HANDOFF_CAPACITY);
        let (sensors_tx, sensors) = mpsc::channel(HANDOFF_CAPACITY);

        let handler = Self {
            status_topic,
            status: RwLock::new(SessionStatus::Idle),
            snapshots: RwLock::new(SessionState::new()),
            connect_tx,
            disconnect_tx,
            state_tx,
            sensors_tx,
        };
        let handoff = Handoff {
            connect,
            disconnect,
            state,
            sensors,
        };
        (handler, handoff)
    }

    pub(crate) fn status(&self) -> SessionStatus {
        *self.status.read()
    }

    pub(crate) fn set_status(&self, status: SessionStatus) {
        *self.status.write() = status;
    }

    pub(crate) fn snapshots(&self) -> SessionState {
        self.snapshots.read().clone()
    }

    pub(crate) fn with_snapshots<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.snapshots.read())
    }

    pub(crate) fn clear_snapshots(&self) {
        self.snapshots.write().clear();
    }
}

impl EventHandler for SessionHandler {
    fn on_connect(&self, outcome: ConnectionOutcome) {
        if let ConnectionOutcome::Refused { code } = outcome {
            tracing::warn!(?code, "Device refused connection");
        }
        offer(&self.connect_tx, outcome, "connect");
    }

    fn on_disconnect(&self, reason_code: u8) {
        if reason_code != 0 {
            let mut status = self.status.write();
            if status.is_connected() {
                *status = SessionStatus::Failed;
            }
            tracing::warn!(
                code = reason_code,
                reason = crate::error::disconnection_reason(reason_code),
                "Device connection lost"
            );
        }
        offer(&self.disconnect_tx, reason_code, "disconnect");
    }

    fn on_message(&self, topic: &str, payload: &[u8]) {
        if topic != self.status_topic {
            tracing::debug!(topic = %topic, "Ignoring message on unexpected topic");
            return;
        }

        let message = match telemetry::parse_message(payload) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(topic = %topic, error = %e, "Dropping undecodable device message");
                return;
            }
        };

        match message {
            DeviceMessage::State(state) => {
                let mut snapshots = self.snapshots.write();
                snapshots.set_state(state.clone());
                offer(&self.state_tx, state, "state");
            }
            DeviceMessage::Sensor(sensors) => {
                let mut snapshots = self.snapshots.write();
                snapshots.set_sensors(sensors.clone());
                offer(&self.sensors_tx, sensors, "sensors");
            }
            DeviceMessage::Unrecognized(msg) => {
                tracing::debug!(msg = ?msg, "Ignoring unrecognized device message");
            }
        }
    }
}

/// Hands an item to a waiter without blocking the delivery context.
fn offer<T>(tx: &mpsc::Sender<T>, item: T, kind: &'static str) {
    if tx.try_send(item).is_err() {
        tracing::debug!(kind, "Handoff full, dropping item nobody is waiting for");
    }
}

impl Handoff {
    /// Discards everything queued before a new request.
    pub(crate) fn drain(&mut self) {
        drain(&mut self.connect);
        drain(&mut self.disconnect);
        drain(&mut self.state);
        drain(&mut self.sensors);
    }
}

/// Discards items that arrived while nobody was waiting.
pub(crate) fn drain<T>(rx: &mut mpsc::Receiver<T>) {
    while rx.try_recv().is_ok() {}
}

/// Waits for the next item, giving up after `limit`.
pub(crate) async fn recv_within<T>(
    rx: &mut mpsc::Receiver<T>,
    limit: Duration,
    kind: &str,
) -> Result<T, ProtocolError> {
    match tokio::time::timeout(limit, rx.recv()).await {
        Ok(Some(item)) => Ok(item),
        Ok(None) => Err(ProtocolError::ChannelClosed(format!("{kind} handoff"))),
        Err(_) => Err(ProtocolError::Timeout(millis(limit))),
    }
}

/// Converts a duration to whole milliseconds for error reporting.
pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
