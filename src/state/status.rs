// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection lifecycle of a device session.

use std::fmt;

/// Where a session is in its connection lifecycle.
///
/// ```text
/// Idle -> Connecting -> Connected -> Disconnecting -> Disconnected
///            |              |
///            +--> Failed <--+ (unexpected disconnect)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionStatus {
    /// Never connected.
    #[default]
    Idle,
    /// Waiting for the connect acknowledgment and first snapshots.
    Connecting,
    /// Ready for commands.
    Connected,
    /// Teardown in progress.
    Disconnecting,
    /// Released after a disconnect.
    Disconnected,
    /// Connect failed, or the link dropped unexpectedly.
    Failed,
}

impl SessionStatus {
    /// Returns true if commands can be published.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Returns true if `connect` may be called from this status.
    #[must_use]
    pub const fn can_connect(&self) -> bool {
        matches!(self, Self::Idle | Self::Disconnected | Self::Failed)
    }

    /// Returns a short lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnecting => "disconnecting",
            Self::Disconnected => "disconnected",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_connected_is_connected() {
        assert!(SessionStatus::Connected.is_connected());
        for status in [
            SessionStatus::Idle,
            SessionStatus::Connecting,
            SessionStatus::Disconnecting,
            SessionStatus::Disconnected,
            SessionStatus::Failed,
        ] {
            assert!(!status.is_connected(), "{status}");
        }
    }

    #[test]
    fn connect_allowed_from_rest_states() {
        assert!(SessionStatus::default().can_connect());
        assert!(SessionStatus::Failed.can_connect());
        assert!(SessionStatus::Disconnected.can_connect());
        assert!(!SessionStatus::Connected.can_connect());
        assert!(!SessionStatus::Connecting.can_connect());
    }
}
