// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `PureLink` - A Rust library to control Dyson Pure Link air purifiers.
//!
//! The devices expose an MQTT broker on the local network. A
//! [`DeviceSession`] logs in with the device serial number and a hashed
//! password, subscribes to the device status topic, and keeps the latest
//! state and environmental sensor readings.
//!
//! # Supported Features
//!
//! - **State**: fan mode, speed, oscillation, filter life, standby monitoring
//! - **Sensors**: temperature, humidity, volatile compounds, particulates
//! - **Control**: fan mode, fan speed (absolute or relative), oscillation,
//!   standby monitoring
//!
//! # Quick Start
//!
//! ```no_run
//! use purelink::{DeviceConfig, DeviceSession};
//! use purelink::types::SwitchState;
//!
//! #[tokio::main]
//! async fn main() -> purelink::Result<()> {
//!     let config = DeviceConfig::from_file("purelink.yaml")?;
//!     let mut session = DeviceSession::mqtt(config.credentials());
//!
//!     session.connect().await?;
//!     if let Some((state, sensors)) = session.data() {
//!         println!("{state}");
//!         println!("{sensors}");
//!     }
//!
//!     session.set_oscillation(SwitchState::On).await?;
//!     session.disconnect().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Custom Transports
//!
//! The session is generic over [`Transport`]. Tests and alternative network
//! stacks implement it and report events through an [`EventHandler`].

pub mod command;
pub mod config;
pub mod credentials;
pub mod error;
pub mod protocol;
mod session;
pub mod state;
pub mod telemetry;
pub mod types;

pub use command::{Command, RequestCurrentState, SetState, StateChange};
pub use config::DeviceConfig;
pub use credentials::{DeviceCredentials, hash_password};
pub use error::{ConfigError, DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
#[cfg(feature = "mqtt")]
pub use protocol::MqttTransport;
pub use protocol::{ConnectOptions, ConnectionOutcome, Delivery, EventHandler, Transport};
pub use session::{DeviceSession, SessionTimeouts};
pub use state::{SessionState, SessionStatus};
pub use telemetry::{DeviceMessage, SensorSnapshot, StateSnapshot};
pub use types::{FanMode, FanSpeed, FanSpeedSetting, SwitchState};
