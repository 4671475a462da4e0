// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Publish/subscribe transport used by a device session.
//!
//! A [`Transport`] owns one connection to the device and a background
//! delivery context that reports network events to an [`EventHandler`]:
//!
//! - `on_connect` when the connect acknowledgment (or a refusal) arrives
//! - `on_disconnect` when the connection closes, with a reason code
//! - `on_message` for every message received on a subscribed topic
//!
//! [`MqttTransport`] is the MQTT 3.1.1 implementation used with real devices.

#[cfg(feature = "mqtt")]
mod mqtt;

#[cfg(feature = "mqtt")]
pub use mqtt::MqttTransport;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::credentials::DeviceCredentials;
use crate::error::ProtocolError;

/// Global counter for generating unique client IDs.
static CLIENT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Delivery guarantee for a published message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delivery {
    /// Fire and forget.
    AtMostOnce,
    /// Acknowledged delivery, possibly repeated.
    AtLeastOnce,
}

/// Result of a connection attempt as reported by the delivery context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionOutcome {
    /// The device accepted the connection.
    Accepted,
    /// The connection was refused or could not be established.
    ///
    /// `code` is the acknowledgment reason code when the device sent one,
    /// and `None` for network failures.
    Refused {
        /// Reason code from the device.
        code: Option<u8>,
    },
}

impl ConnectionOutcome {
    /// Returns true if the connection was accepted.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Parameters for opening a transport connection.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Device host name or IP address.
    pub host: String,
    /// Device port.
    pub port: u16,
    /// Client identifier presented to the device.
    pub client_id: String,
    /// Username (the device serial number).
    pub username: String,
    /// Secret (the hashed device password).
    pub password: String,
    /// Keep-alive interval.
    pub keep_alive: Duration,
}

impl ConnectOptions {
    /// Builds options for a device, deriving the secret from its password.
    #[must_use]
    pub fn for_device(credentials: &DeviceCredentials, keep_alive: Duration) -> Self {
        let counter = CLIENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self {
            host: credentials.address().to_string(),
            port: credentials.port(),
            client_id: format!("purelink_{}_{}", std::process::id(), counter),
            username: credentials.serial_number().to_string(),
            password: credentials.hashed_secret(),
            keep_alive,
        }
    }
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("keep_alive", &self.keep_alive)
            .finish_non_exhaustive()
    }
}

/// Receives network events from a transport's delivery context.
///
/// Implementations are called from the background context and must not
/// block.
pub trait EventHandler: Send + Sync {
    /// The connection attempt finished.
    fn on_connect(&self, outcome: ConnectionOutcome);

    /// The connection closed. `0` means a requested, clean disconnect.
    fn on_disconnect(&self, reason_code: u8);

    /// A message arrived on a subscribed topic.
    fn on_message(&self, topic: &str, payload: &[u8]);
}

/// A publish/subscribe connection to one device.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Opens the connection and starts the delivery context.
    ///
    /// Returning `Ok` only means the attempt started; the outcome is
    /// reported through [`EventHandler::on_connect`].
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the attempt cannot be started.
    async fn open(
        &mut self,
        options: &ConnectOptions,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), ProtocolError>;

    /// Subscribes to a topic.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request cannot be queued.
    async fn subscribe(&self, topic: &str) -> Result<(), ProtocolError>;

    /// Publishes a payload on a topic.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request cannot be queued.
    async fn publish(
        &self,
        topic: &str,
        payload: String,
        delivery: Delivery,
    ) -> Result<(), ProtocolError>;

    /// Requests a clean disconnect.
    ///
    /// The delivery context reports completion through
    /// [`EventHandler::on_disconnect`] and then stops.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request cannot be sent.
    async fn close(&mut self) -> Result<(), ProtocolError>;

    /// Stops the delivery context and drops the connection immediately.
    fn abort(&mut self);
}
