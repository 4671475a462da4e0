// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed types.
//!
//! Use [`FanSpeedSetting`] with
//! [`DeviceSession::set_fan_speed()`](crate::DeviceSession::set_fan_speed).

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Absolute fan speed (1-10).
///
/// # Examples
///
/// ```
/// use purelink::types::FanSpeed;
///
/// let speed = FanSpeed::new(7).unwrap();
/// assert_eq!(speed.value(), 7);
///
/// assert!(FanSpeed::new(0).is_err());
/// assert!(FanSpeed::new(11).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FanSpeed(u8);

impl FanSpeed {
    /// Lowest speed.
    pub const MIN: u8 = 1;

    /// Highest speed.
    pub const MAX: u8 = 10;

    /// Creates a new fan speed.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [1, 10].
    pub fn new(value: u8) -> Result<Self, ValueError> {
        Self::from_level(i32::from(value))
    }

    /// Creates a fan speed from a possibly out of range level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if level is outside [1, 10].
    pub fn from_level(level: i32) -> Result<Self, ValueError> {
        let min = i32::from(Self::MIN);
        let max = i32::from(Self::MAX);
        if !(min..=max).contains(&level) {
            return Err(ValueError::OutOfRange {
                min,
                max,
                actual: level,
            });
        }
        // Range checked above.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(Self(level as u8))
    }

    /// Returns the speed value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fan speed request: relative to the current speed, or absolute.
///
/// Parsing accepts `up` and `down` in any case, or a number.
///
/// # Examples
///
/// ```
/// use purelink::types::{FanSpeed, FanSpeedSetting};
///
/// assert_eq!("UP".parse::<FanSpeedSetting>().unwrap(), FanSpeedSetting::Up);
/// assert_eq!(
///     "7".parse::<FanSpeedSetting>().unwrap(),
///     FanSpeedSetting::Absolute(FanSpeed::new(7).unwrap())
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FanSpeedSetting {
    /// One step faster than the current speed.
    Up,
    /// One step slower than the current speed.
    Down,
    /// A fixed speed.
    Absolute(FanSpeed),
}

impl FanSpeedSetting {
    /// Resolves the request against the currently reported speed.
    ///
    /// `current` is only consulted for relative requests.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidFanSpeed` if a relative request is made
    /// while the reported speed is not numeric (for example `AUTO`), and
    /// `ValueError::OutOfRange` if the result leaves [1, 10].
    pub fn resolve(self, current: &str) -> Result<FanSpeed, ValueError> {
        let step = match self {
            Self::Absolute(speed) => return Ok(speed),
            Self::Up => 1,
            Self::Down => -1,
        };
        let level: i32 = current
            .trim()
            .parse()
            .map_err(|_| ValueError::InvalidFanSpeed(current.to_string()))?;
        let target = level.checked_add(step).ok_or(ValueError::OutOfRange {
            min: i32::from(FanSpeed::MIN),
            max: i32::from(FanSpeed::MAX),
            actual: level,
        })?;
        FanSpeed::from_level(target)
    }
}

impl FromStr for FanSpeedSetting {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.eq_ignore_ascii_case("up") {
            return Ok(Self::Up);
        }
        if token.eq_ignore_ascii_case("down") {
            return Ok(Self::Down);
        }
        let level: i32 = token
            .parse()
            .map_err(|_| ValueError::InvalidFanSpeed(s.to_string()))?;
        FanSpeed::from_level(level).map(Self::Absolute)
    }
}

impl From<FanSpeed> for FanSpeedSetting {
    fn from(speed: FanSpeed) -> Self {
        Self::Absolute(speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_bounds() {
        assert!(FanSpeed::new(1).is_ok());
        assert!(FanSpeed::new(10).is_ok());
        assert_eq!(
            FanSpeed::new(11),
            Err(ValueError::OutOfRange {
                min: 1,
                max: 10,
                actual: 11
            })
        );
    }

    #[test]
    fn parse_relative_case_insensitive() {
        assert_eq!("up".parse(), Ok(FanSpeedSetting::Up));
        assert_eq!("Down".parse(), Ok(FanSpeedSetting::Down));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            "fast".parse::<FanSpeedSetting>(),
            Err(ValueError::InvalidFanSpeed(_))
        ));
        assert!(matches!(
            "0".parse::<FanSpeedSetting>(),
            Err(ValueError::OutOfRange { .. })
        ));
    }

    #[test]
    fn resolve_relative_moves() {
        assert_eq!(FanSpeedSetting::Up.resolve("4").unwrap().value(), 5);
        assert_eq!(FanSpeedSetting::Down.resolve("4").unwrap().value(), 3);
        assert_eq!(FanSpeedSetting::Up.resolve("0004").unwrap().value(), 5);
    }

    #[test]
    fn resolve_absolute_ignores_current() {
        let setting: FanSpeedSetting = "7".parse().unwrap();
        assert_eq!(setting.resolve("AUTO").unwrap().value(), 7);
    }

    #[test]
    fn resolve_relative_needs_numeric_speed() {
        assert!(matches!(
            FanSpeedSetting::Up.resolve("AUTO"),
            Err(ValueError::InvalidFanSpeed(_))
        ));
        assert!(matches!(
            FanSpeedSetting::Up.resolve("10"),
            Err(ValueError::OutOfRange { actual: 11, .. })
        ));
    }

    #[test]
    fn resolve_extreme_reported_speed_is_out_of_range() {
        assert!(matches!(
            FanSpeedSetting::Up.resolve("2147483647"),
            Err(ValueError::OutOfRange {
                actual: i32::MAX,
                ..
            })
        ));
        assert!(matches!(
            FanSpeedSetting::Down.resolve("-2147483648"),
            Err(ValueError::OutOfRange {
                actual: i32::MIN,
                ..
            })
        ));
    }
}
