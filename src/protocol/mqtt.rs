// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT transport for Pure Link devices.

use std::sync::Arc;

use rumqttc::{
    AsyncClient, ConnectReturnCode, ConnectionError, Event, EventLoop, MqttOptions, Outgoing,
    Packet, QoS,
};
use tokio::task::JoinHandle;

use crate::error::{ProtocolError, UNEXPECTED_DISCONNECT_CODE};
use crate::protocol::{ConnectOptions, ConnectionOutcome, Delivery, EventHandler, Transport};

/// Capacity of the request queue between the client and its event loop.
const REQUEST_CAPACITY: usize = 10;

/// MQTT 3.1.1 connection to a device, with a clean session.
///
/// The event loop runs on a spawned tokio task and forwards connection
/// events and incoming publishes to the session's [`EventHandler`].
///
/// # Examples
///
/// ```no_run
/// use purelink::{DeviceCredentials, DeviceSession, MqttTransport};
///
/// # async fn example() -> purelink::Result<()> {
/// let creds = DeviceCredentials::new("NN2-EU-KJA1234A", "475", "password", "192.168.1.20");
/// let mut session = DeviceSession::new(creds, MqttTransport::new());
/// session.connect().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MqttTransport {
    client: Option<AsyncClient>,
    event_task: Option<JoinHandle<()>>,
}

impl MqttTransport {
    /// Creates an unconnected transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<&AsyncClient, ProtocolError> {
        self.client
            .as_ref()
            .ok_or_else(|| ProtocolError::ConnectionFailed("transport is not open".to_string()))
    }
}

impl Transport for MqttTransport {
    async fn open(
        &mut self,
        options: &ConnectOptions,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), ProtocolError> {
        self.abort();

        let mut mqtt_options = MqttOptions::new(&options.client_id, &options.host, options.port);
        mqtt_options.set_keep_alive(options.keep_alive);
        mqtt_options.set_clean_session(true);
        mqtt_options.set_credentials(&options.username, &options.password);

        let (client, event_loop) = AsyncClient::new(mqtt_options, REQUEST_CAPACITY);

        tracing::debug!(
            host = %options.host,
            port = options.port,
            client_id = %options.client_id,
            "Opening MQTT connection"
        );

        self.event_task = Some(tokio::spawn(handle_mqtt_events(event_loop, handler)));
        self.client = Some(client);
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<(), ProtocolError> {
        self.client()?
            .subscribe(topic, QoS::AtLeastOnce)
            .await
            .map_err(ProtocolError::Mqtt)
    }

    async fn publish(
        &self,
        topic: &str,
        payload: String,
        delivery: Delivery,
    ) -> Result<(), ProtocolError> {
        self.client()?
            .publish(topic, qos(delivery), false, payload)
            .await
            .map_err(ProtocolError::Mqtt)
    }

    async fn close(&mut self) -> Result<(), ProtocolError> {
        let Some(client) = self.client.take() else {
            return Ok(());
        };

        if let Err(e) = client.disconnect().await {
            self.abort();
            return Err(ProtocolError::Mqtt(e));
        }
        Ok(())
    }

    fn abort(&mut self) {
        if let Some(task) = self.event_task.take() {
            task.abort();
        }
        self.client = None;
    }
}

impl Drop for MqttTransport {
    fn drop(&mut self) {
        self.abort();
    }
}

fn qos(delivery: Delivery) -> QoS {
    match delivery {
        Delivery::AtMostOnce => QoS::AtMostOnce,
        Delivery::AtLeastOnce => QoS::AtLeastOnce,
    }
}

fn return_code(code: ConnectReturnCode) -> u8 {
    match code {
        ConnectReturnCode::Success => 0,
        ConnectReturnCode::RefusedProtocolVersion => 1,
        ConnectReturnCode::BadClientId => 2,
        ConnectReturnCode::ServiceUnavailable => 3,
        ConnectReturnCode::BadUserNamePassword => 4,
        ConnectReturnCode::NotAuthorized => 5,
    }
}

/// Polls the event loop until the connection ends.
async fn handle_mqtt_events(mut event_loop: EventLoop, handler: Arc<dyn EventHandler>) {
    let mut connected = false;

    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                tracing::debug!(?connack, "MQTT connect acknowledged");
                if connack.code == ConnectReturnCode::Success {
                    connected = true;
                    handler.on_connect(ConnectionOutcome::Accepted);
                } else {
                    handler.on_connect(ConnectionOutcome::Refused {
                        code: Some(return_code(connack.code)),
                    });
                    break;
                }
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::debug!(?suback, "MQTT subscription acknowledged");
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                tracing::debug!(
                    topic = %publish.topic,
                    bytes = publish.payload.len(),
                    "Received MQTT message"
                );
                handler.on_message(&publish.topic, &publish.payload);
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                tracing::warn!("Device closed the MQTT connection");
                handler.on_disconnect(UNEXPECTED_DISCONNECT_CODE);
                break;
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                tracing::debug!("MQTT disconnect sent");
                handler.on_disconnect(0);
                break;
            }
            Ok(_) => {}
            Err(ConnectionError::ConnectionRefused(code)) => {
                tracing::warn!(?code, "MQTT connection refused");
                handler.on_connect(ConnectionOutcome::Refused {
                    code: Some(return_code(code)),
                });
                break;
            }
            Err(e) => {
                tracing::error!(error = %e, "MQTT event loop error");
                if connected {
                    handler.on_disconnect(UNEXPECTED_DISCONNECT_CODE);
                } else {
                    handler.on_connect(ConnectionOutcome::Refused { code: None });
                }
                break;
            }
        }
    }
}
