// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Latest known snapshots of a device session.

use crate::telemetry::{SensorSnapshot, StateSnapshot};

/// Latest state and sensor snapshots received from the device.
///
/// Both are `None` until the first matching message arrives. Each is
/// replaced as a whole, never patched field by field.
///
/// # Examples
///
/// ```
/// use purelink::state::SessionState;
///
/// let state = SessionState::new();
/// assert!(state.state().is_none());
/// assert!(state.data().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    state: Option<StateSnapshot>,
    sensors: Option<SensorSnapshot>,
}

impl SessionState {
    /// Creates an empty session state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the latest state snapshot.
    #[must_use]
    pub fn state(&self) -> Option<&StateSnapshot> {
        self.state.as_ref()
    }

    /// Returns the latest sensor snapshot.
    #[must_use]
    pub fn sensors(&self) -> Option<&SensorSnapshot> {
        self.sensors.as_ref()
    }

    /// Replaces the state snapshot.
    pub fn set_state(&mut self, state: StateSnapshot) {
        self.state = Some(state);
    }

    /// Replaces the sensor snapshot.
    pub fn set_sensors(&mut self, sensors: SensorSnapshot) {
        self.sensors = Some(sensors);
    }

    /// Returns true if the sensors reported temperature or humidity.
    #[must_use]
    pub fn has_valid_data(&self) -> bool {
        self.sensors.as_ref().is_some_and(SensorSnapshot::has_data)
    }

    /// Returns both snapshots when a state is known and the sensors hold
    /// readings.
    #[must_use]
    pub fn data(&self) -> Option<(StateSnapshot, SensorSnapshot)> {
        if !self.has_valid_data() {
            return None;
        }
        Some((self.state.clone()?, self.sensors.clone()?))
    }

    /// Forgets both snapshots.
    pub fn clear(&mut self) {
        self.state = None;
        self.sensors = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(speed: &str) -> StateSnapshot {
        StateSnapshot::from_message(&json!({
            "msg": "CURRENT-STATE",
            "product-state": {
                "fmod": "FAN", "fnst": "FAN", "nmod": "OFF", "fnsp": speed,
                "oson": "OFF", "filf": "2087", "qtar": "0003", "rhtm": "ON"
            }
        }))
        .unwrap()
    }

    fn sensors(hact: &str, tact: &str) -> SensorSnapshot {
        SensorSnapshot::from_message(&json!({
            "msg": "ENVIRONMENTAL-CURRENT-SENSOR-DATA",
            "data": { "hact": hact, "tact": tact, "vact": "0001", "pact": "0002" }
        }))
        .unwrap()
    }

    #[test]
    fn snapshots_are_replaced_whole() {
        let mut session = SessionState::new();
        session.set_state(state("0004"));
        session.set_state(state("0006"));
        assert_eq!(session.state().unwrap().fan_speed(), "0006");
    }

    #[test]
    fn data_needs_both_snapshots() {
        let mut session = SessionState::new();
        session.set_sensors(sensors("0045", "2950"));
        assert!(session.has_valid_data());
        assert!(session.data().is_none());

        session.set_state(state("0004"));
        let (s, e) = session.data().unwrap();
        assert_eq!(s.fan_speed(), "0004");
        assert_eq!(e.humidity(), Some(45));
    }

    #[test]
    fn data_needs_sensor_readings() {
        let mut session = SessionState::new();
        session.set_state(state("0004"));
        session.set_sensors(sensors("OFF", "OFF"));
        assert!(!session.has_valid_data());
        assert!(session.data().is_none());
    }

    #[test]
    fn clear_forgets_everything() {
        let mut session = SessionState::new();
        session.set_state(state("0004"));
        session.set_sensors(sensors("0045", "2950"));
        session.clear();
        assert_eq!(session, SessionState::new());
    }
}
