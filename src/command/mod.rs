// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Commands published to the device.
//!
//! Every command is a JSON object on `<type>/<serial>/command` with a `msg`
//! type and a UTC `time` stamp formatted `YYYY-MM-DDTHH:MM:SSZ`.
//!
//! | Command | `msg` | Delivery |
//! |---------|-------|----------|
//! | [`RequestCurrentState`] | `REQUEST-CURRENT-STATE` | best effort |
//! | [`SetState`] | `STATE-SET` | at least once |
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use purelink::command::{Command, SetState, StateChange};
//! use purelink::types::SwitchState;
//!
//! let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
//! let cmd = SetState::new(StateChange::new().oscillation(SwitchState::On));
//! let json = cmd.to_json(at);
//!
//! assert_eq!(json["msg"], "STATE-SET");
//! assert_eq!(json["time"], "2024-03-01T08:30:00Z");
//! assert_eq!(json["mode-reason"], "LAPP");
//! assert_eq!(json["data"]["oson"], "ON");
//! ```

mod state;

pub use state::StateChange;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::protocol::Delivery;

/// `msg` value of a state request.
pub const REQUEST_CURRENT_STATE: &str = "REQUEST-CURRENT-STATE";

/// `msg` value of a state change.
pub const STATE_SET: &str = "STATE-SET";

/// `mode-reason` sent with every state change.
pub const MODE_REASON: &str = "LAPP";

/// Formats a timestamp the way the device expects it.
#[must_use]
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// A command that can be published to the device.
pub trait Command {
    /// Returns the `msg` type.
    fn message_type(&self) -> &'static str;

    /// Returns the delivery guarantee to publish with.
    fn delivery(&self) -> Delivery {
        Delivery::AtMostOnce
    }

    /// Builds the JSON message stamped with `at`.
    fn to_json(&self, at: DateTime<Utc>) -> Value;

    /// Returns the payload stamped with the current time.
    fn payload(&self) -> String {
        self.to_json(Utc::now()).to_string()
    }
}

/// Asks the device to publish its current state and sensor readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestCurrentState;

impl Command for RequestCurrentState {
    fn message_type(&self) -> &'static str {
        REQUEST_CURRENT_STATE
    }

    fn to_json(&self, at: DateTime<Utc>) -> Value {
        json!({
            "msg": REQUEST_CURRENT_STATE,
            "time": timestamp(at),
        })
    }
}

/// Changes one or more device settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetState {
    change: StateChange,
}

impl SetState {
    /// Creates a state change command.
    #[must_use]
    pub fn new(change: StateChange) -> Self {
        Self { change }
    }

    /// Returns the fields being changed.
    #[must_use]
    pub fn change(&self) -> &StateChange {
        &self.change
    }
}

impl Command for SetState {
    fn message_type(&self) -> &'static str {
        STATE_SET
    }

    fn delivery(&self) -> Delivery {
        Delivery::AtLeastOnce
    }

    fn to_json(&self, at: DateTime<Utc>) -> Value {
        json!({
            "msg": STATE_SET,
            "time": timestamp(at),
            "mode-reason": MODE_REASON,
            "data": self.change.fields(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FanMode, FanSpeed};
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 58).unwrap()
    }

    #[test]
    fn timestamp_has_no_fractional_seconds() {
        let with_millis = at() + chrono::Duration::milliseconds(750);
        assert_eq!(timestamp(with_millis), "2024-12-31T23:59:58Z");
    }

    #[test]
    fn request_message_shape() {
        let json = RequestCurrentState.to_json(at());
        assert_eq!(
            json,
            json!({"msg": "REQUEST-CURRENT-STATE", "time": "2024-12-31T23:59:58Z"})
        );
        assert_eq!(RequestCurrentState.delivery(), Delivery::AtMostOnce);
    }

    #[test]
    fn state_set_message_shape() {
        let change = StateChange::new()
            .fan_speed(FanSpeed::new(5).unwrap())
            .fan_mode(FanMode::Fan);
        let cmd = SetState::new(change);

        assert_eq!(cmd.message_type(), "STATE-SET");
        assert_eq!(cmd.delivery(), Delivery::AtLeastOnce);
        assert_eq!(
            cmd.to_json(at()),
            json!({
                "msg": "STATE-SET",
                "time": "2024-12-31T23:59:58Z",
                "mode-reason": "LAPP",
                "data": {"fnsp": 5, "fmod": "FAN"}
            })
        );
    }

    #[test]
    fn payload_is_json_text() {
        let payload = RequestCurrentState.payload();
        let parsed: Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(parsed["msg"], "REQUEST-CURRENT-STATE");
        assert!(parsed["time"].as_str().unwrap().ends_with('Z'));
    }
}
