// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wait bounds of a device session.

use std::time::Duration;

/// How long a session waits for each kind of reply.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use purelink::SessionTimeouts;
///
/// let timeouts = SessionTimeouts::default().with_response(Duration::from_secs(2));
/// assert_eq!(timeouts.connect(), Duration::from_secs(10));
/// assert_eq!(timeouts.response(), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimeouts {
    connect: Duration,
    response: Duration,
    disconnect: Duration,
    keep_alive: Duration,
}

impl Default for SessionTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            response: Duration::from_secs(5),
            disconnect: Duration::from_secs(5),
            keep_alive: Duration::from_secs(30),
        }
    }
}

impl SessionTimeouts {
    /// Sets the wait for the connect acknowledgment (default: 10 seconds).
    #[must_use]
    pub fn with_connect(mut self, duration: Duration) -> Self {
        self.connect = duration;
        self
    }

    /// Sets the wait for each state or sensor reply (default: 5 seconds).
    #[must_use]
    pub fn with_response(mut self, duration: Duration) -> Self {
        self.response = duration;
        self
    }

    /// Sets the wait for the disconnect acknowledgment (default: 5 seconds).
    #[must_use]
    pub fn with_disconnect(mut self, duration: Duration) -> Self {
        self.disconnect = duration;
        self
    }

    /// Sets the transport keep-alive interval (default: 30 seconds).
    #[must_use]
    pub fn with_keep_alive(mut self, duration: Duration) -> Self {
        self.keep_alive = duration;
        self
    }

    /// Wait for the connect acknowledgment.
    #[must_use]
    pub fn connect(&self) -> Duration {
        self.connect
    }

    /// Wait for each state or sensor reply.
    #[must_use]
    pub fn response(&self) -> Duration {
        self.response
    }

    /// Wait for the disconnect acknowledgment.
    #[must_use]
    pub fn disconnect(&self) -> Duration {
        self.disconnect
    }

    /// Transport keep-alive interval.
    #[must_use]
    pub fn keep_alive(&self) -> Duration {
        self.keep_alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let timeouts = SessionTimeouts::default();
        assert_eq!(timeouts.connect(), Duration::from_secs(10));
        assert_eq!(timeouts.response(), Duration::from_secs(5));
        assert_eq!(timeouts.disconnect(), Duration::from_secs(5));
        assert_eq!(timeouts.keep_alive(), Duration::from_secs(30));
    }

    #[test]
    fn builder_chain() {
        let timeouts = SessionTimeouts::default()
            .with_connect(Duration::from_millis(100))
            .with_response(Duration::from_millis(200))
            .with_disconnect(Duration::from_millis(300))
            .with_keep_alive(Duration::from_secs(60));
        assert_eq!(timeouts.connect(), Duration::from_millis(100));
        assert_eq!(timeouts.response(), Duration::from_millis(200));
        assert_eq!(timeouts.disconnect(), Duration::from_millis(300));
        assert_eq!(timeouts.keep_alive(), Duration::from_secs(60));
    }
}
