// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![cfg(feature = "mqtt")]

//! Integration tests for the MQTT transport using mockforge-mqtt.
//!
//! The mock broker accepts connections but never plays the device, so these
//! tests cover the network half of a session.

use std::time::Duration;

use mockforge_mqtt::broker::MqttConfig;
use mockforge_mqtt::start_mqtt_server;
use purelink::{
    DeviceCredentials, DeviceSession, Error, ProtocolError, SessionStatus, SessionTimeouts,
};
use tokio::time::sleep;

/// Helper to find an available port for testing.
fn get_test_port() -> u16 {
    use std::sync::atomic::{AtomicU16, Ordering};
    static PORT_COUNTER: AtomicU16 = AtomicU16::new(18950);
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Starts a mock MQTT broker on the given port.
async fn start_mock_broker(port: u16) {
    let config = MqttConfig {
        port,
        host: "127.0.0.1".to_string(),
        ..Default::default()
    };

    tokio::spawn(async move {
        let _ = start_mqtt_server(config).await;
    });

    // Give the broker time to bind
    sleep(Duration::from_millis(500)).await;
}

fn credentials(port: u16) -> DeviceCredentials {
    DeviceCredentials::new("NN2-EU-KJA1234A", "475", "password", "127.0.0.1").with_port(port)
}

fn short_timeouts() -> SessionTimeouts {
    SessionTimeouts::default()
        .with_connect(Duration::from_secs(2))
        .with_response(Duration::from_millis(300))
        .with_disconnect(Duration::from_millis(300))
}

// ============================================================================
// Session over a live broker
// ============================================================================

mod session_over_broker {
    use super::*;

    #[tokio::test]
    async fn broker_without_device_times_out_waiting_for_state() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let mut session = DeviceSession::mqtt(credentials(port)).with_timeouts(short_timeouts());
        let result = session.connect().await;

        assert!(
            matches!(
                result,
                Err(Error::Protocol(
                    ProtocolError::Timeout(_) | ProtocolError::ConnectionRefused { .. }
                ))
            ),
            "unexpected result: {result:?}"
        );
        assert_eq!(session.status(), SessionStatus::Failed);
        assert!(!session.is_connected());
        assert!(session.data().is_none());
    }

    #[tokio::test]
    async fn failed_session_disconnects_quietly() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let mut session = DeviceSession::mqtt(credentials(port)).with_timeouts(short_timeouts());
        assert!(session.connect().await.is_err());

        assert!(session.disconnect().await.is_ok());
    }
}

// ============================================================================
// Unreachable device
// ============================================================================

mod unreachable {
    use super::*;

    #[tokio::test]
    async fn closed_port_fails_to_connect() {
        let port = get_test_port();

        let mut session = DeviceSession::mqtt(credentials(port)).with_timeouts(short_timeouts());
        let result = session.connect().await;

        assert!(
            matches!(
                result,
                Err(Error::Protocol(
                    ProtocolError::ConnectionFailed(_) | ProtocolError::ConnectionTimeout(_)
                ))
            ),
            "unexpected result: {result:?}"
        );
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn controls_without_connection_do_nothing() {
        let port = get_test_port();

        let mut session = DeviceSession::mqtt(credentials(port));
        session
            .set_fan_mode(purelink::FanMode::Auto)
            .await
            .unwrap();

        assert_eq!(session.status(), SessionStatus::Idle);
    }
}
