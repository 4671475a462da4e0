// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `purelink` library.
//!
//! This module provides the error hierarchy for everything that can go wrong
//! while talking to a Pure Link device: value validation, transport
//! communication, payload decoding, session usage and configuration loading.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during transport communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while decoding a device payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during a device session operation.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// Error occurred while loading configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i32,
        /// Maximum allowed value.
        max: i32,
        /// The actual value that was provided.
        actual: i32,
    },

    /// An unknown fan mode token was provided.
    #[error("invalid fan mode: {0}")]
    InvalidFanMode(String),

    /// An unknown on/off token was provided.
    #[error("invalid switch state: {0}")]
    InvalidSwitchState(String),

    /// A fan speed that is neither `up`, `down` nor a number.
    #[error("invalid fan speed: {0}")]
    InvalidFanSpeed(String),
}

/// Errors related to the publish/subscribe transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT client request failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// The device answered the connection attempt with a refusal code.
    #[error("{reason} (code {code})")]
    ConnectionRefused {
        /// Reason code from the connect acknowledgment.
        code: u8,
        /// Human readable reason.
        reason: &'static str,
    },

    /// No connect acknowledgment arrived in time.
    #[error("connection timed out after {0} ms")]
    ConnectionTimeout(u64),

    /// The network connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Teardown finished with an unexpected reason code.
    #[error("{reason} (code {code})")]
    Disconnection {
        /// Reason code reported at disconnect.
        code: u8,
        /// Human readable reason.
        reason: &'static str,
    },

    /// A reply did not arrive in time.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Internal channel was closed.
    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

impl ProtocolError {
    /// Builds a refusal error from a connect acknowledgment code.
    #[must_use]
    pub fn refused(code: u8) -> Self {
        Self::ConnectionRefused {
            code,
            reason: connection_reason(code),
        }
    }

    /// Builds a disconnection error from a disconnect reason code.
    #[must_use]
    pub fn disconnection(code: u8) -> Self {
        Self::Disconnection {
            code,
            reason: disconnection_reason(code),
        }
    }
}

/// Reason code used when a connect acknowledgment never arrives.
pub const CONNECT_TIMEOUT_CODE: u8 = 99;

/// Reason code reported for any disconnect the client did not ask for.
pub const UNEXPECTED_DISCONNECT_CODE: u8 = 50;

/// Reason code used when a disconnect acknowledgment never arrives.
pub const DISCONNECT_TIMEOUT_CODE: u8 = 99;

/// Returns the description of a connect acknowledgment code.
#[must_use]
pub fn connection_reason(code: u8) -> &'static str {
    match code {
        0 => "Connection successful",
        1 => "Connection refused: incorrect protocol version",
        2 => "Connection refused: invalid client identifier",
        3 => "Connection refused: server unavailable",
        4 => "Connection refused: bad username or password",
        5 => "Connection refused: not authorised",
        CONNECT_TIMEOUT_CODE => "Connection refused: timeout",
        _ => "Connection refused: unknown reason",
    }
}

/// Returns the description of a disconnect reason code.
///
/// Unknown codes are reported as an unexpected error.
#[must_use]
pub fn disconnection_reason(code: u8) -> &'static str {
    match code {
        0 => "Disconnection successful",
        DISCONNECT_TIMEOUT_CODE => "Disconnection error: timeout",
        _ => "Disconnection error: unexpected error",
    }
}

/// Errors related to decoding device payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the payload.
    #[error("missing field in payload: {0}")]
    MissingField(String),

    /// Unexpected payload format.
    #[error("unexpected payload format: {0}")]
    UnexpectedFormat(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors related to device session operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The session is not connected.
    #[error("device is not connected")]
    NotConnected,

    /// `connect` was called on a session that is already up.
    #[error("device is already connected")]
    AlreadyConnected,

    /// A relative command needs a state snapshot that was never received.
    #[error("no state snapshot available")]
    StateUnavailable,

    /// A state change was published but no new state arrived.
    #[error("no state reply within {0} ms")]
    CommandTimeout(u64),
}

/// Errors related to loading device configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid YAML for a device.
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 1,
            max: 10,
            actual: 11,
        };
        assert_eq!(err.to_string(), "value 11 is out of range [1, 10]");
    }

    #[test]
    fn refused_carries_reason() {
        let err = ProtocolError::refused(4);
        assert_eq!(
            err.to_string(),
            "Connection refused: bad username or password (code 4)"
        );
    }

    #[test]
    fn unknown_disconnect_code_is_unexpected() {
        assert_eq!(
            disconnection_reason(7),
            disconnection_reason(UNEXPECTED_DISCONNECT_CODE)
        );
        assert_eq!(disconnection_reason(0), "Disconnection successful");
    }

    #[test]
    fn error_from_device_error() {
        let err: Error = DeviceError::CommandTimeout(5000).into();
        assert!(matches!(err, Error::Device(DeviceError::CommandTimeout(5000))));
        assert_eq!(err.to_string(), "device error: no state reply within 5000 ms");
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("product-state".to_string());
        assert_eq!(err.to_string(), "missing field in payload: product-state");
    }
}
