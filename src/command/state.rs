// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Field deltas carried by a `STATE-SET` command.

use serde_json::{Map, Value};

use crate::types::{FanMode, FanSpeed, SwitchState};

/// Device settings to change, keyed by their wire field names.
///
/// # Examples
///
/// ```
/// use purelink::command::StateChange;
/// use purelink::types::{FanMode, SwitchState};
///
/// let change = StateChange::new()
///     .fan_mode(FanMode::Auto)
///     .standby_monitoring(SwitchState::On);
///
/// assert_eq!(change.get("fmod").unwrap(), "AUTO");
/// assert_eq!(change.get("rhtm").unwrap(), "ON");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateChange {
    fields: Map<String, Value>,
}

impl StateChange {
    /// Creates an empty change.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fan speed (`fnsp`).
    #[must_use]
    pub fn fan_speed(self, speed: FanSpeed) -> Self {
        self.with_field("fnsp", speed.value())
    }

    /// Sets oscillation (`oson`).
    #[must_use]
    pub fn oscillation(self, state: SwitchState) -> Self {
        self.with_field("oson", state.as_str())
    }

    /// Sets the fan mode (`fmod`).
    #[must_use]
    pub fn fan_mode(self, mode: FanMode) -> Self {
        self.with_field("fmod", mode.as_str())
    }

    /// Sets standby monitoring (`rhtm`).
    #[must_use]
    pub fn standby_monitoring(self, state: SwitchState) -> Self {
        self.with_field("rhtm", state.as_str())
    }

    /// Sets an arbitrary field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns the value of a field, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns all fields.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns true if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for StateChange {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_setters_use_wire_names() {
        let change = StateChange::new()
            .fan_speed(FanSpeed::new(3).unwrap())
            .oscillation(SwitchState::Off)
            .fan_mode(FanMode::Off)
            .standby_monitoring(SwitchState::On);

        assert_eq!(
            Value::Object(change.fields().clone()),
            json!({"fnsp": 3, "oson": "OFF", "fmod": "OFF", "rhtm": "ON"})
        );
    }

    #[test]
    fn later_value_wins() {
        let change = StateChange::new()
            .oscillation(SwitchState::Off)
            .oscillation(SwitchState::On);
        assert_eq!(change.get("oson").unwrap(), "ON");
        assert_eq!(change.fields().len(), 1);
    }

    #[test]
    fn raw_fields_pass_through() {
        let change = StateChange::new().with_field("nmod", "ON");
        assert!(!change.is_empty());
        assert_eq!(change.get("nmod"), Some(&json!("ON")));
        assert!(StateChange::new().is_empty());
    }
}
