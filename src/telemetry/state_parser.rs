// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for `CURRENT-STATE` and `STATE-CHANGE` messages.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;

/// Operating state of the device at one point in time.
///
/// Every field is kept as the text the device reported. State change
/// messages report `[previous, current]` pairs; only the current value is
/// kept.
///
/// # Examples
///
/// ```
/// use purelink::telemetry::StateSnapshot;
///
/// let message = serde_json::json!({
///     "msg": "STATE-CHANGE",
///     "product-state": {
///         "fmod": ["AUTO", "FAN"], "fnst": "FAN", "nmod": "OFF", "fnsp": ["0004", "0005"],
///         "oson": "ON", "filf": "2087", "qtar": "0003", "rhtm": "ON"
///     }
/// });
/// let state = StateSnapshot::from_message(&message).unwrap();
/// assert_eq!(state.fan_mode(), "FAN");
/// assert_eq!(state.fan_speed(), "0005");
/// assert_eq!(state.fan_speed_level(), Some(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    fan_mode: String,
    fan_state: String,
    night_mode: String,
    fan_speed: String,
    oscillation: String,
    filter_life: String,
    quality_target: String,
    standby_monitoring: String,
}

#[derive(Deserialize)]
struct RawProductState {
    fmod: Value,
    fnst: Value,
    nmod: Value,
    fnsp: Value,
    oson: Value,
    filf: Value,
    qtar: Value,
    rhtm: Value,
}

impl StateSnapshot {
    /// Decodes the `product-state` object of a state message.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` if `product-state` is absent,
    /// `ParseError::UnexpectedFormat` if it is not an object, and
    /// `ParseError::InvalidValue` if a field holds something other than a
    /// scalar or a non-empty list. A missing tracked field is a
    /// `ParseError::Json`.
    pub fn from_message(message: &Value) -> Result<Self, ParseError> {
        let raw = RawProductState::deserialize(super::section(message, "product-state")?)?;

        Ok(Self {
            fan_mode: current_value("fmod", &raw.fmod)?,
            fan_state: current_value("fnst", &raw.fnst)?,
            night_mode: current_value("nmod", &raw.nmod)?,
            fan_speed: current_value("fnsp", &raw.fnsp)?,
            oscillation: current_value("oson", &raw.oson)?,
            filter_life: current_value("filf", &raw.filf)?,
            quality_target: current_value("qtar", &raw.qtar)?,
            standby_monitoring: current_value("rhtm", &raw.rhtm)?,
        })
    }

    /// Fan mode (`fmod`): `OFF`, `FAN` or `AUTO`.
    #[must_use]
    pub fn fan_mode(&self) -> &str {
        &self.fan_mode
    }

    /// Whether the fan is actually running (`fnst`).
    #[must_use]
    pub fn fan_state(&self) -> &str {
        &self.fan_state
    }

    /// Night mode (`nmod`).
    #[must_use]
    pub fn night_mode(&self) -> &str {
        &self.night_mode
    }

    /// Fan speed (`fnsp`): digits, or `AUTO`.
    #[must_use]
    pub fn fan_speed(&self) -> &str {
        &self.fan_speed
    }

    /// Fan speed as a number, if the device reported one.
    #[must_use]
    pub fn fan_speed_level(&self) -> Option<u8> {
        self.fan_speed.trim().parse().ok()
    }

    /// Oscillation (`oson`).
    #[must_use]
    pub fn oscillation(&self) -> &str {
        &self.oscillation
    }

    /// Remaining filter life (`filf`).
    #[must_use]
    pub fn filter_life(&self) -> &str {
        &self.filter_life
    }

    /// Air quality target (`qtar`).
    #[must_use]
    pub fn quality_target(&self) -> &str {
        &self.quality_target
    }

    /// Standby monitoring (`rhtm`).
    #[must_use]
    pub fn standby_monitoring(&self) -> &str {
        &self.standby_monitoring
    }
}

impl fmt::Display for StateSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Fan mode: {}, Oscillation: {}, Filter life: {}, Standby monitoring: {}, Fan speed: {}",
            self.fan_mode, self.oscillation, self.filter_life, self.standby_monitoring, self.fan_speed
        )
    }
}

/// Returns the current value of a product-state field as text.
///
/// A list is a `[previous, current]` history and yields its last element.
fn current_value(field: &str, raw: &Value) -> Result<String, ParseError> {
    let value = match raw {
        Value::Array(history) => history.last().ok_or_else(|| ParseError::InvalidValue {
            field: field.to_string(),
            message: "empty value history".to_string(),
        })?,
        other => other,
    };

    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ParseError::InvalidValue {
            field: field.to_string(),
            message: format!("expected a scalar, got {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state_message(product_state: Value) -> Value {
        json!({ "msg": "CURRENT-STATE", "product-state": product_state })
    }

    fn full_state() -> Value {
        json!({
            "fmod": "FAN", "fnst": "FAN", "nmod": "OFF", "fnsp": "0004",
            "oson": "OFF", "filf": "2087", "qtar": "0003", "rhtm": "ON"
        })
    }

    #[test]
    fn scalar_fields_are_kept() {
        let state = StateSnapshot::from_message(&state_message(full_state())).unwrap();
        assert_eq!(state.fan_mode(), "FAN");
        assert_eq!(state.fan_state(), "FAN");
        assert_eq!(state.night_mode(), "OFF");
        assert_eq!(state.fan_speed(), "0004");
        assert_eq!(state.oscillation(), "OFF");
        assert_eq!(state.filter_life(), "2087");
        assert_eq!(state.quality_target(), "0003");
        assert_eq!(state.standby_monitoring(), "ON");
    }

    #[test]
    fn pair_fields_take_current_value() {
        let mut product = full_state();
        product["oson"] = json!(["OFF", "ON"]);
        product["fnsp"] = json!(["0004", "AUTO"]);

        let state = StateSnapshot::from_message(&state_message(product)).unwrap();
        assert_eq!(state.oscillation(), "ON");
        assert_eq!(state.fan_speed(), "AUTO");
        assert_eq!(state.fan_speed_level(), None);
    }

    #[test]
    fn numeric_scalar_becomes_text() {
        let mut product = full_state();
        product["fnsp"] = json!(7);

        let state = StateSnapshot::from_message(&state_message(product)).unwrap();
        assert_eq!(state.fan_speed(), "7");
        assert_eq!(state.fan_speed_level(), Some(7));
    }

    #[test]
    fn missing_product_state_fails() {
        let result = StateSnapshot::from_message(&json!({ "msg": "CURRENT-STATE" }));
        assert!(matches!(result, Err(ParseError::MissingField(ref key)) if key == "product-state"));
    }

    #[test]
    fn non_object_product_state_fails() {
        let result = StateSnapshot::from_message(&state_message(json!(["FAN"])));
        assert!(matches!(result, Err(ParseError::UnexpectedFormat(_))));
    }

    #[test]
    fn missing_field_fails() {
        let mut product = full_state();
        product.as_object_mut().unwrap().remove("rhtm");
        assert!(StateSnapshot::from_message(&state_message(product)).is_err());
    }

    #[test]
    fn empty_history_fails() {
        let mut product = full_state();
        product["nmod"] = json!([]);

        let err = StateSnapshot::from_message(&state_message(product)).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { ref field, .. } if field == "nmod"));
    }

    #[test]
    fn display_lists_main_fields() {
        let state = StateSnapshot::from_message(&state_message(full_state())).unwrap();
        assert_eq!(
            state.to_string(),
            "Fan mode: FAN, Oscillation: OFF, Filter life: 2087, Standby monitoring: ON, Fan speed: 0004"
        );
    }
}
