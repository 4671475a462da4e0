// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device credentials and password hashing.
//!
//! A Pure Link device authenticates MQTT clients with its serial number as the
//! username and a hashed form of the password printed in the manual as the
//! secret. The hash is the standard base64 encoding of the SHA-512 digest.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha512};

/// Derives the MQTT secret from a plaintext device password.
///
/// # Examples
///
/// ```
/// use purelink::credentials::hash_password;
///
/// let secret = hash_password("abc");
/// assert_eq!(secret.len(), 88);
/// ```
#[must_use]
pub fn hash_password(password: &str) -> String {
    let digest = Sha512::digest(password.as_bytes());
    STANDARD.encode(digest)
}

/// Everything needed to open a session with one device.
///
/// Credentials are immutable once built. The plaintext password is only
/// used to derive the hashed secret when connecting.
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceCredentials {
    serial_number: String,
    device_type: String,
    password: String,
    address: String,
    port: u16,
}

impl DeviceCredentials {
    /// Default MQTT port exposed by Pure Link devices.
    pub const DEFAULT_PORT: u16 = 1883;

    /// Creates credentials for a device on the default port.
    #[must_use]
    pub fn new(
        serial_number: impl Into<String>,
        device_type: impl Into<String>,
        password: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            serial_number: serial_number.into(),
            device_type: device_type.into(),
            password: password.into(),
            address: address.into(),
            port: Self::DEFAULT_PORT,
        }
    }

    /// Sets the network port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Returns the serial number, also used as the MQTT username.
    #[must_use]
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    /// Returns the device type code that namespaces the topics.
    #[must_use]
    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    /// Returns the device network address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the device network port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the hashed secret for this device's password.
    #[must_use]
    pub fn hashed_secret(&self) -> String {
        hash_password(&self.password)
    }

    /// Topic the application publishes commands on.
    #[must_use]
    pub fn command_topic(&self) -> String {
        format!("{}/{}/command", self.device_type, self.serial_number)
    }

    /// Topic the device publishes its current status on.
    #[must_use]
    pub fn status_topic(&self) -> String {
        format!("{}/{}/status/current", self.device_type, self.serial_number)
    }
}

impl fmt::Debug for DeviceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceCredentials")
            .field("serial_number", &self.serial_number)
            .field("device_type", &self.device_type)
            .field("password", &"<redacted>")
            .field("address", &self.address)
            .field("port", &self.port)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_matches_known_vector() {
        assert_eq!(
            hash_password("abc"),
            "3a81oZNherrMQXNJriBBMRLm+k6JqX6iCp7u5ktV05ohkpkqJ0/BqDa6PCOj/uu9RU1EI2Q86A4qmslPpUyknw=="
        );
    }

    #[test]
    fn hashed_secret_uses_password() {
        let creds = DeviceCredentials::new("NN2-EU-KJA1234A", "475", "password", "192.168.1.20");
        assert_eq!(
            creds.hashed_secret(),
            "sQnzu7wkTrgkQZF+0G1hi5AI3Qmzvv0bXgc5THBqi7mAsdd4Xll27ASbRt9fEyavWi6m0QP9B8lThf+rDKy8hg=="
        );
    }

    #[test]
    fn topics_are_namespaced_by_type_and_serial() {
        let creds = DeviceCredentials::new("NN2-EU-KJA1234A", "475", "pw", "192.168.1.20");
        assert_eq!(creds.command_topic(), "475/NN2-EU-KJA1234A/command");
        assert_eq!(creds.status_topic(), "475/NN2-EU-KJA1234A/status/current");
    }

    #[test]
    fn default_and_custom_port() {
        let creds = DeviceCredentials::new("S", "475", "pw", "10.0.0.2");
        assert_eq!(creds.port(), 1883);
        assert_eq!(creds.with_port(8883).port(), 8883);
    }

    #[test]
    fn debug_redacts_password() {
        let creds = DeviceCredentials::new("S", "475", "hunter2", "10.0.0.2");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
