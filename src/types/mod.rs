// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for device commands.
//!
//! Every setting the device accepts is a closed set of tokens or a bounded
//! number. These types validate inputs before anything is published.

mod mode;
mod speed;

pub use mode::{FanMode, SwitchState};
pub use speed::{FanSpeed, FanSpeedSetting};
