// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device session: connection lifecycle and request/response exchange.
//!
//! A [`DeviceSession`] talks to one device over a [`Transport`]. Network
//! events arrive on the transport's background delivery context; every
//! public operation awaits the matching reply with a bounded timeout.
//!
//! ```no_run
//! use purelink::{DeviceCredentials, DeviceSession};
//! use purelink::types::{FanMode, SwitchState};
//!
//! # async fn example() -> purelink::Result<()> {
//! let creds = DeviceCredentials::new("NN2-EU-KJA1234A", "475", "password", "192.168.1.20");
//! let mut session = DeviceSession::mqtt(creds);
//!
//! session.connect().await?;
//! if let Some((state, sensors)) = session.data() {
//!     println!("{state}");
//!     println!("{sensors}");
//! }
//!
//! session.set_fan_mode(FanMode::Auto).await?;
//! session.set_oscillation(SwitchState::On).await?;
//! session.set_fan_speed("up".parse()?).await?;
//!
//! session.disconnect().await?;
//! # Ok(())
//! # }
//! ```

mod control;
mod handoff;
mod timeouts;

pub use timeouts::SessionTimeouts;

use std::fmt;
use std::sync::Arc;

use crate::command::{Command, RequestCurrentState, SetState, StateChange};
use crate::credentials::DeviceCredentials;
use crate::error::{DISCONNECT_TIMEOUT_CODE, DeviceError, ProtocolError, Result};
use crate::protocol::{ConnectOptions, ConnectionOutcome, EventHandler, Transport};
use crate::state::{SessionState, SessionStatus};
use crate::telemetry::{SensorSnapshot, StateSnapshot};

use handoff::{Handoff, SessionHandler, drain, recv_within};

/// A control session with one device.
///
/// Commands are serialized by taking `&mut self`: the device protocol has a
/// single outstanding request at a time.
pub struct DeviceSession<T: Transport> {
    credentials: DeviceCredentials,
    timeouts: SessionTimeouts,
    transport: T,
    handler: Arc<SessionHandler>,
    handoff: Handoff,
}

#[cfg(feature = "mqtt")]
impl DeviceSession<crate::protocol::MqttTransport> {
    /// Creates a session that connects over MQTT.
    #[must_use]
    pub fn mqtt(credentials: DeviceCredentials) -> Self {
        Self::new(credentials, crate::protocol::MqttTransport::new())
    }
}

impl<T: Transport> DeviceSession<T> {
    /// Creates an idle session for a device over the given transport.
    #[must_use]
    pub fn new(credentials: DeviceCredentials, transport: T) -> Self {
        let (handler, handoff) = SessionHandler::new(credentials.status_topic());
        Self {
            credentials,
            timeouts: SessionTimeouts::default(),
            transport,
            handler: Arc::new(handler),
            handoff,
        }
    }

    /// Replaces the wait bounds.
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: SessionTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Returns the device credentials.
    #[must_use]
    pub fn credentials(&self) -> &DeviceCredentials {
        &self.credentials
    }

    /// Returns the wait bounds.
    #[must_use]
    pub fn timeouts(&self) -> &SessionTimeouts {
        &self.timeouts
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.handler.status()
    }

    /// Returns true if commands can be sent.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.status().is_connected()
    }

    /// Returns the latest state snapshot.
    #[must_use]
    pub fn state(&self) -> Option<StateSnapshot> {
        self.handler.with_snapshots(|s| s.state().cloned())
    }

    /// Returns the latest sensor snapshot.
    #[must_use]
    pub fn sensors(&self) -> Option<SensorSnapshot> {
        self.handler.with_snapshots(|s| s.sensors().cloned())
    }

    /// Returns a copy of both latest snapshots.
    #[must_use]
    pub fn snapshots(&self) -> SessionState {
        self.handler.snapshots()
    }

    /// Returns the state and sensor snapshots if the sensors hold readings.
    #[must_use]
    pub fn data(&self) -> Option<(StateSnapshot, SensorSnapshot)> {
        self.handler.with_snapshots(SessionState::data)
    }

    /// Connects to the device and fetches its initial state and sensors.
    ///
    /// Waits for the connect acknowledgment, subscribes to the status
    /// topic, requests the current state, then waits for one state and one
    /// sensor snapshot. On any failure the connection is torn down and the
    /// session ends in [`SessionStatus::Failed`].
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `DeviceError::AlreadyConnected` if a connection is up or underway
    /// - `ProtocolError::ConnectionRefused` if the device refuses
    /// - `ProtocolError::ConnectionTimeout` if no acknowledgment arrives
    /// - `ProtocolError::Timeout` if the initial snapshots do not arrive
    pub async fn connect(&mut self) -> Result<()> {
        if !self.status().can_connect() {
            return Err(DeviceError::AlreadyConnected.into());
        }

        self.handler.set_status(SessionStatus::Connecting);
        self.handler.clear_snapshots();
        self.handoff.drain();

        match self.establish().await {
            Ok(()) => {
                tracing::info!(
                    serial = %self.credentials.serial_number(),
                    address = %self.credentials.address(),
                    "Connected to device"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    serial = %self.credentials.serial_number(),
                    error = %e,
                    "Connection to device failed"
                );
                self.transport.abort();
                self.handler.set_status(SessionStatus::Failed);
                Err(e)
            }
        }
    }

    async fn establish(&mut self) -> Result<()> {
        let options = ConnectOptions::for_device(&self.credentials, self.timeouts.keep_alive());
        let handler: Arc<dyn EventHandler> = self.handler.clone();
        self.transport.open(&options, handler).await?;

        let limit = self.timeouts.connect();
        let outcome = recv_within(&mut self.handoff.connect, limit, "connect")
            .await
            .map_err(|e| match e {
                ProtocolError::Timeout(ms) => ProtocolError::ConnectionTimeout(ms),
                other => other,
            })?;

        match outcome {
            ConnectionOutcome::Accepted => {}
            ConnectionOutcome::Refused { code: Some(code) } => {
                return Err(ProtocolError::refused(code).into());
            }
            ConnectionOutcome::Refused { code: None } => {
                return Err(ProtocolError::ConnectionFailed(format!(
                    "could not reach {}:{}",
                    options.host, options.port
                ))
                .into());
            }
        }

        let status_topic = self.credentials.status_topic();
        self.transport.subscribe(&status_topic).await?;
        tracing::debug!(topic = %status_topic, "Subscribed to device status");

        self.handler.set_status(SessionStatus::Connected);
        self.request_state().await?;

        let limit = self.timeouts.response();
        recv_within(&mut self.handoff.state, limit, "state").await?;
        recv_within(&mut self.handoff.sensors, limit, "sensors").await?;
        Ok(())
    }

    /// Asks the device to publish its current state and sensors.
    ///
    /// The replies arrive asynchronously and update the snapshots; this
    /// call does not wait for them.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::NotConnected` if the session is not connected,
    /// or `ProtocolError` if publishing fails.
    pub async fn request_state(&mut self) -> Result<()> {
        self.ensure_connected()?;
        drain(&mut self.handoff.state);
        drain(&mut self.handoff.sensors);
        self.publish(&RequestCurrentState).await
    }

    /// Publishes a state change and waits for the resulting state.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `DeviceError::NotConnected` if the session is not connected
    /// - `DeviceError::CommandTimeout` if no state arrives in time; the
    ///   session stays connected
    /// - `ProtocolError` if publishing fails
    pub async fn change_state(&mut self, change: StateChange) -> Result<StateSnapshot> {
        self.ensure_connected()?;
        drain(&mut self.handoff.state);
        self.publish(&SetState::new(change)).await?;

        let limit = self.timeouts.response();
        match recv_within(&mut self.handoff.state, limit, "state").await {
            Ok(state) => Ok(state),
            Err(ProtocolError::Timeout(ms)) => {
                tracing::warn!(timeout_ms = ms, "No state reply to state change");
                Err(DeviceError::CommandTimeout(ms).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Closes the connection and waits for the disconnect acknowledgment.
    ///
    /// The session is released in every case. Calling this on a session
    /// that is not connected only stops any leftover delivery context.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Disconnection` if the acknowledgment carries
    /// an unexpected reason code or does not arrive in time.
    pub async fn disconnect(&mut self) -> Result<()> {
        if !self.is_connected() {
            self.transport.abort();
            return Ok(());
        }

        self.handler.set_status(SessionStatus::Disconnecting);
        drain(&mut self.handoff.disconnect);

        let result = match self.transport.close().await {
            Ok(()) => {
                let limit = self.timeouts.disconnect();
                match recv_within(&mut self.handoff.disconnect, limit, "disconnect").await {
                    Ok(0) => Ok(()),
                    Ok(code) => Err(ProtocolError::disconnection(code)),
                    Err(ProtocolError::Timeout(_)) => {
                        Err(ProtocolError::disconnection(DISCONNECT_TIMEOUT_CODE))
                    }
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        };

        self.transport.abort();
        self.handler.set_status(SessionStatus::Disconnected);

        match &result {
            Ok(()) => tracing::info!(
                serial = %self.credentials.serial_number(),
                "Disconnected from device"
            ),
            Err(e) => tracing::warn!(
                serial = %self.credentials.serial_number(),
                error = %e,
                "Device released after disconnection error"
            ),
        }
        result.map_err(Into::into)
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(DeviceError::NotConnected.into())
        }
    }

    async fn publish<C: Command>(&self, command: &C) -> Result<()> {
        let topic = self.credentials.command_topic();
        let payload = command.payload();

        tracing::debug!(topic = %topic, payload = %payload, "Publishing device command");

        self.transport
            .publish(&topic, payload, command.delivery())
            .await
            .map_err(Into::into)
    }
}

impl<T: Transport> fmt::Debug for DeviceSession<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceSession")
            .field("credentials", &self.credentials)
            .field("status", &self.status())
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}
