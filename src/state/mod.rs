// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session state tracking.
//!
//! [`SessionState`] holds the most recent [`StateSnapshot`](crate::telemetry::StateSnapshot)
//! and [`SensorSnapshot`](crate::telemetry::SensorSnapshot) a session has
//! received. [`SessionStatus`] is the connection lifecycle of a session.

mod session_state;
mod status;

pub use session_state::SessionState;
pub use status::SessionStatus;
