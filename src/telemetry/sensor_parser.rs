// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for `ENVIRONMENTAL-CURRENT-SENSOR-DATA` messages.

use std::borrow::Cow;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;

/// Token the device reports for a sensor that is switched off.
const OFF: &str = "OFF";

/// Token the device reports while a sensor warms up.
const INIT: &str = "INIT";

/// Environmental readings at one point in time.
///
/// # Examples
///
/// ```
/// use purelink::telemetry::SensorSnapshot;
///
/// let message = serde_json::json!({
///     "msg": "ENVIRONMENTAL-CURRENT-SENSOR-DATA",
///     "data": { "hact": "0045", "tact": "2950", "vact": "INIT", "pact": "0003" }
/// });
/// let sensors = SensorSnapshot::from_message(&message).unwrap();
/// assert_eq!(sensors.humidity(), Some(45));
/// assert_eq!(sensors.volatile_compounds(), 0);
/// assert_eq!(sensors.particulates(), 3);
/// assert!(sensors.has_data());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSnapshot {
    humidity: Option<u32>,
    temperature: Option<f64>,
    volatile_compounds: u32,
    particulates: u32,
}

#[derive(Deserialize)]
struct RawSensorData {
    hact: Value,
    tact: Value,
    vact: Value,
    pact: Value,
}

impl SensorSnapshot {
    /// Decodes the `data` object of a sensor message.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if `data` or one of its readings is missing or
    /// not a number.
    pub fn from_message(message: &Value) -> Result<Self, ParseError> {
        let raw = RawSensorData::deserialize(super::section(message, "data")?)?;

        Ok(Self {
            humidity: decode_humidity(&raw.hact)?,
            temperature: decode_temperature(&raw.tact)?,
            volatile_compounds: decode_level("vact", &raw.vact)?,
            particulates: decode_level("pact", &raw.pact)?,
        })
    }

    /// Relative humidity in percent, `None` when the sensor is off.
    #[must_use]
    pub fn humidity(&self) -> Option<u32> {
        self.humidity
    }

    /// Temperature in degrees Fahrenheit, `None` when the sensor is off.
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    /// Volatile organic compounds level.
    #[must_use]
    pub fn volatile_compounds(&self) -> u32 {
        self.volatile_compounds
    }

    /// Particulate matter level.
    #[must_use]
    pub fn particulates(&self) -> u32 {
        self.particulates
    }

    /// Returns true if temperature or humidity was reported.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.temperature.is_some() || self.humidity.is_some()
    }
}

impl fmt::Display for SensorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.temperature {
            Some(t) => write!(f, "Temperature: {t:.2} F, ")?,
            None => write!(f, "Temperature: - F, ")?,
        }
        match self.humidity {
            Some(h) => write!(f, "Humidity: {h} %, ")?,
            None => write!(f, "Humidity: - %, ")?,
        }
        write!(
            f,
            "Volatile Compounds: {}, Particles: {}",
            self.volatile_compounds, self.particulates
        )
    }
}

/// Converts kelvin to degrees Fahrenheit.
#[must_use]
pub fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    kelvin * 9.0 / 5.0 - 459.67
}

/// Decodes a `hact` reading.
///
/// # Errors
///
/// Returns `ParseError::InvalidValue` if the reading is not an integer.
pub fn decode_humidity(raw: &Value) -> Result<Option<u32>, ParseError> {
    let text = raw_text("hact", raw)?;
    if text == OFF {
        return Ok(None);
    }
    parse_number("hact", &text).map(Some)
}

/// Decodes a `tact` reading (tenths of kelvin) into degrees Fahrenheit.
///
/// # Errors
///
/// Returns `ParseError::InvalidValue` if the reading is not a number.
///
/// # Examples
///
/// ```
/// use purelink::telemetry::decode_temperature;
/// use serde_json::json;
///
/// assert_eq!(decode_temperature(&json!("OFF")).unwrap(), None);
/// let f = decode_temperature(&json!("2950")).unwrap().unwrap();
/// assert!((f - 71.33).abs() < 1e-9);
/// ```
pub fn decode_temperature(raw: &Value) -> Result<Option<f64>, ParseError> {
    let text = raw_text("tact", raw)?;
    if text == OFF {
        return Ok(None);
    }
    let tenths: f64 = parse_number("tact", &text)?;
    Ok(Some(kelvin_to_fahrenheit(tenths / 10.0)))
}

/// Decodes a `vact` or `pact` level, where `OFF` and `INIT` read as 0.
///
/// # Errors
///
/// Returns `ParseError::InvalidValue` if the reading is not an integer.
pub fn decode_level(field: &str, raw: &Value) -> Result<u32, ParseError> {
    let text = raw_text(field, raw)?;
    if text == OFF || text == INIT {
        return Ok(0);
    }
    parse_number(field, &text)
}

fn raw_text<'a>(field: &str, raw: &'a Value) -> Result<Cow<'a, str>, ParseError> {
    match raw {
        Value::String(s) => Ok(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Ok(Cow::Owned(n.to_string())),
        other => Err(ParseError::InvalidValue {
            field: field.to_string(),
            message: format!("expected a string or number, got {other}"),
        }),
    }
}

fn parse_number<T>(field: &str, text: &str) -> Result<T, ParseError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    text.trim().parse().map_err(|e: T::Err| ParseError::InvalidValue {
        field: field.to_string(),
        message: format!("{text:?}: {e}"),
    })
}
