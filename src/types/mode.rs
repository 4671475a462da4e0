// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan mode and on/off switch types.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Operating mode of the fan.
///
/// # Examples
///
/// ```
/// use purelink::types::FanMode;
///
/// assert_eq!(FanMode::Fan.as_str(), "FAN");
/// assert_eq!("auto".parse::<FanMode>().unwrap(), FanMode::Auto);
/// // `on` is accepted as an alias for the fan mode
/// assert_eq!("on".parse::<FanMode>().unwrap(), FanMode::Fan);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FanMode {
    /// Fan is off.
    Off,
    /// Fan runs at the configured speed.
    Fan,
    /// Device picks the speed from air quality.
    Auto,
}

impl FanMode {
    /// Returns the wire token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Fan => "FAN",
            Self::Auto => "AUTO",
        }
    }
}

impl fmt::Display for FanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FanMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OFF" => Ok(Self::Off),
            "FAN" | "ON" => Ok(Self::Fan),
            "AUTO" => Ok(Self::Auto),
            _ => Err(ValueError::InvalidFanMode(s.to_string())),
        }
    }
}

/// A plain on/off setting, used for oscillation and standby monitoring.
///
/// # Examples
///
/// ```
/// use purelink::types::SwitchState;
///
/// assert_eq!("on".parse::<SwitchState>().unwrap(), SwitchState::On);
/// assert_eq!(SwitchState::Off.as_str(), "OFF");
/// assert!("maybe".parse::<SwitchState>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchState {
    /// Enabled.
    On,
    /// Disabled.
    Off,
}

impl SwitchState {
    /// Returns the wire token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwitchState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ON" => Ok(Self::On),
            "OFF" => Ok(Self::Off),
            _ => Err(ValueError::InvalidSwitchState(s.to_string())),
        }
    }
}

impl From<bool> for SwitchState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}
