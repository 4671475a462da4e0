// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Classification and decoding of messages published by the device.
//!
//! Everything the device sends on `<type>/<serial>/status/current` is a JSON
//! object with a `msg` field naming its shape:
//!
//! - `CURRENT-STATE` / `STATE-CHANGE` - operating state ([`StateSnapshot`])
//! - `ENVIRONMENTAL-CURRENT-SENSOR-DATA` - sensor readings ([`SensorSnapshot`])
//!
//! Any other `msg` value is unrecognized and carries no snapshot.
//!
//! # Examples
//!
//! ```
//! use purelink::telemetry::{DeviceMessage, parse_message};
//!
//! let payload = br#"{"msg":"ENVIRONMENTAL-CURRENT-SENSOR-DATA",
//!     "data":{"hact":"0045","tact":"OFF","vact":"0001","pact":"0002"}}"#;
//!
//! match parse_message(payload).unwrap() {
//!     DeviceMessage::Sensor(sensors) => assert_eq!(sensors.humidity(), Some(45)),
//!     other => panic!("unexpected message: {other:?}"),
//! }
//! ```

mod sensor_parser;
mod state_parser;

pub use sensor_parser::{
    SensorSnapshot, decode_humidity, decode_level, decode_temperature, kelvin_to_fahrenheit,
};
pub use state_parser::StateSnapshot;

use serde_json::Value;

use crate::error::ParseError;

/// `msg` value of a full state report.
pub const CURRENT_STATE: &str = "CURRENT-STATE";

/// `msg` value of a state report following a change.
pub const STATE_CHANGE: &str = "STATE-CHANGE";

/// `msg` value of a sensor report.
pub const SENSOR_DATA: &str = "ENVIRONMENTAL-CURRENT-SENSOR-DATA";

/// Shape of a device message, decided by its `msg` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// A state snapshot.
    State,
    /// A sensor snapshot.
    Sensor,
    /// Anything else, including payloads without a `msg` string.
    Unrecognized,
}

/// A decoded device message.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceMessage {
    /// Operating state.
    State(StateSnapshot),
    /// Sensor readings.
    Sensor(SensorSnapshot),
    /// A message this library does not track, with its `msg` value if any.
    Unrecognized(Option<String>),
}

/// Classifies a decoded JSON payload.
///
/// # Examples
///
/// ```
/// use purelink::telemetry::{MessageKind, classify};
/// use serde_json::json;
///
/// assert_eq!(classify(&json!({"msg": "STATE-CHANGE"})), MessageKind::State);
/// assert_eq!(classify(&json!({"msg": "HELLO"})), MessageKind::Unrecognized);
/// ```
#[must_use]
pub fn classify(message: &Value) -> MessageKind {
    match message.get("msg").and_then(Value::as_str) {
        Some(CURRENT_STATE | STATE_CHANGE) => MessageKind::State,
        Some(SENSOR_DATA) => MessageKind::Sensor,
        _ => MessageKind::Unrecognized,
    }
}

/// Decodes and classifies a raw payload.
///
/// # Errors
///
/// Returns `ParseError` if the payload is not JSON, or if a recognized
/// message is missing required fields. Unrecognized messages are not an
/// error.
pub fn parse_message(payload: &[u8]) -> Result<DeviceMessage, ParseError> {
    let message: Value = serde_json::from_slice(payload)?;
    decode(&message)
}

/// Decodes an already parsed JSON payload.
///
/// # Errors
///
/// Returns `ParseError` if a recognized message is missing required fields.
pub fn decode(message: &Value) -> Result<DeviceMessage, ParseError> {
    match classify(message) {
        MessageKind::State => StateSnapshot::from_message(message).map(DeviceMessage::State),
        MessageKind::Sensor => SensorSnapshot::from_message(message).map(DeviceMessage::Sensor),
        MessageKind::Unrecognized => Ok(DeviceMessage::Unrecognized(
            message
                .get("msg")
                .and_then(Value::as_str)
                .map(str::to_string),
        )),
    }
}

/// Returns the object stored under `key`.
fn section<'a>(message: &'a Value, key: &str) -> Result<&'a Value, ParseError> {
    match message.get(key) {
        Some(value @ Value::Object(_)) => Ok(value),
        Some(_) => Err(ParseError::UnexpectedFormat(format!("{key} is not an object"))),
        None => Err(ParseError::MissingField(key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_state_messages() {
        assert_eq!(classify(&json!({"msg": "CURRENT-STATE"})), MessageKind::State);
        assert_eq!(classify(&json!({"msg": "STATE-CHANGE"})), MessageKind::State);
    }

    #[test]
    fn classify_sensor_message() {
        assert_eq!(
            classify(&json!({"msg": "ENVIRONMENTAL-CURRENT-SENSOR-DATA"})),
            MessageKind::Sensor
        );
    }

    #[test]
    fn classify_everything_else_as_unrecognized() {
        for message in [
            json!({"msg": "CURRENT-FAULTS"}),
            json!({"msg": "current-state"}),
            json!({"msg": 3}),
            json!({"time": "2024-01-01T00:00:00Z"}),
            json!(["CURRENT-STATE"]),
        ] {
            assert_eq!(classify(&message), MessageKind::Unrecognized, "{message}");
        }
    }

    #[test]
    fn unrecognized_message_has_no_snapshot() {
        let msg = parse_message(br#"{"msg":"CURRENT-FAULTS","product-errors":{}}"#).unwrap();
        assert_eq!(msg, DeviceMessage::Unrecognized(Some("CURRENT-FAULTS".to_string())));
    }

    #[test]
    fn parse_state_payload() {
        let payload = br#"{"msg":"CURRENT-STATE","time":"2024-01-01T00:00:00.000Z",
            "product-state":{"fmod":"AUTO","fnst":"FAN","nmod":"OFF","fnsp":"AUTO",
            "oson":"ON","filf":"1500","qtar":"0004","rhtm":"OFF"}}"#;
        match parse_message(payload).unwrap() {
            DeviceMessage::State(state) => {
                assert_eq!(state.fan_mode(), "AUTO");
                assert_eq!(state.fan_speed(), "AUTO");
            }
            other => panic!("expected state, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_fails() {
        assert!(matches!(parse_message(b"{not json"), Err(ParseError::Json(_))));
    }

    #[test]
    fn recognized_but_incomplete_fails() {
        assert!(parse_message(br#"{"msg":"STATE-CHANGE"}"#).is_err());
    }
}
