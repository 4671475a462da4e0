// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level controls built on [`DeviceSession::change_state`].
//!
//! Every control returns `Ok(())` without publishing anything when the
//! session is not connected.

use crate::command::StateChange;
use crate::error::{DeviceError, Result};
use crate::protocol::Transport;
use crate::types::{FanMode, FanSpeedSetting, SwitchState};

use super::DeviceSession;

impl<T: Transport> DeviceSession<T> {
    /// Sets the fan speed, relative to the current speed or absolute.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `DeviceError::StateUnavailable` for a relative move before any
    ///   state was received
    /// - `ValueError::InvalidFanSpeed` for a relative move while the device
    ///   reports a non-numeric speed
    /// - `ValueError::OutOfRange` if the target leaves [1, 10]
    /// - any error from [`change_state`](Self::change_state)
    pub async fn set_fan_speed(&mut self, setting: FanSpeedSetting) -> Result<()> {
        if !self.is_connected() {
            tracing::debug!("Not connected, ignoring fan speed change");
            return Ok(());
        }

        let speed = match setting {
            FanSpeedSetting::Absolute(speed) => speed,
            relative => {
                let current = self
                    .state()
                    .map(|s| s.fan_speed().to_string())
                    .ok_or(DeviceError::StateUnavailable)?;
                relative.resolve(&current)?
            }
        };

        tracing::debug!(speed = speed.value(), "Setting fan speed");
        self.change_state(StateChange::new().fan_speed(speed))
            .await
            .map(drop)
    }

    /// Turns oscillation on or off.
    ///
    /// # Errors
    ///
    /// Returns any error from [`change_state`](Self::change_state).
    pub async fn set_oscillation(&mut self, state: SwitchState) -> Result<()> {
        self.apply(StateChange::new().oscillation(state)).await
    }

    /// Sets the fan mode.
    ///
    /// # Errors
    ///
    /// Returns any error from [`change_state`](Self::change_state).
    pub async fn set_fan_mode(&mut self, mode: FanMode) -> Result<()> {
        self.apply(StateChange::new().fan_mode(mode)).await
    }

    /// Turns standby monitoring on or off.
    ///
    /// # Errors
    ///
    /// Returns any error from [`change_state`](Self::change_state).
    pub async fn set_standby_monitoring(&mut self, state: SwitchState) -> Result<()> {
        self.apply(StateChange::new().standby_monitoring(state)).await
    }

    async fn apply(&mut self, change: StateChange) -> Result<()> {
        if !self.is_connected() {
            tracing::debug!(fields = ?change.fields(), "Not connected, ignoring state change");
            return Ok(());
        }
        self.change_state(change).await.map(drop)
    }
}
