// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device configuration loading.
//!
//! The session itself only takes [`DeviceCredentials`]. This module is a
//! convenience for drivers that keep the device settings in a YAML file:
//!
//! ```yaml
//! DYSON_SERIAL: NN2-EU-KJA1234A
//! DYSON_TYPE: "475"
//! DYSON_PASSWORD: abcdefgh
//! DYSON_IP: 192.168.1.20
//! DYSON_PORT: 1883
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::credentials::DeviceCredentials;
use crate::error::ConfigError;

/// Device settings as stored in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceConfig {
    /// Password printed in the device manual.
    #[serde(rename = "DYSON_PASSWORD")]
    pub password: String,

    /// Device serial number.
    #[serde(rename = "DYSON_SERIAL")]
    pub serial_number: String,

    /// Device type code (e.g. `475`).
    #[serde(rename = "DYSON_TYPE", deserialize_with = "scalar_as_string")]
    pub device_type: String,

    /// Device IP address.
    #[serde(rename = "DYSON_IP")]
    pub ip_address: String,

    /// Device MQTT port.
    #[serde(rename = "DYSON_PORT", default = "default_port")]
    pub port_number: u16,
}

fn default_port() -> u16 {
    DeviceCredentials::DEFAULT_PORT
}

// Type codes are digits, so an unquoted YAML value arrives as a number.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Number(u64),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Number(n) => n.to_string(),
    })
}

impl DeviceConfig {
    /// Parses a configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Yaml` if the text is not a valid device config.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Reads and parses a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, or
    /// `ConfigError::Yaml` if its content is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loaded device config");
        Self::from_yaml_str(&text)
    }

    /// Converts the configuration into session credentials.
    #[must_use]
    pub fn credentials(&self) -> DeviceCredentials {
        DeviceCredentials::new(
            &self.serial_number,
            &self.device_type,
            &self.password,
            &self.ip_address,
        )
        .with_port(self.port_number)
    }
}

impl From<DeviceConfig> for DeviceCredentials {
    fn from(config: DeviceConfig) -> Self {
        config.credentials()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
DYSON_PASSWORD: secret
DYSON_SERIAL: NN2-EU-KJA1234A
DYSON_TYPE: 475
DYSON_IP: 192.168.1.20
DYSON_PORT: 1884
";

    #[test]
    fn parses_original_keys() {
        let config = DeviceConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.password, "secret");
        assert_eq!(config.serial_number, "NN2-EU-KJA1234A");
        assert_eq!(config.device_type, "475");
        assert_eq!(config.ip_address, "192.168.1.20");
        assert_eq!(config.port_number, 1884);
    }

    #[test]
    fn port_defaults_when_absent() {
        let config = DeviceConfig::from_yaml_str(
            "DYSON_PASSWORD: a\nDYSON_SERIAL: b\nDYSON_TYPE: \"455\"\nDYSON_IP: 10.0.0.1\n",
        )
        .unwrap();
        assert_eq!(config.port_number, 1883);
        assert_eq!(config.device_type, "455");
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = DeviceConfig::from_yaml_str("DYSON_PASSWORD: a\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DeviceConfig::from_file("/nonexistent/purelink.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn converts_to_credentials() {
        let creds: DeviceCredentials = DeviceConfig::from_yaml_str(SAMPLE).unwrap().into();
        assert_eq!(creds.serial_number(), "NN2-EU-KJA1234A");
        assert_eq!(creds.port(), 1884);
        assert_eq!(creds.status_topic(), "475/NN2-EU-KJA1234A/status/current");
    }
}
