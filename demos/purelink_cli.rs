// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Demo driver: connect to a purifier, print its data, apply commands.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example purelink_cli -- <config.yaml> [-fan MODE] [-speed SPEED] [-osc ON|OFF] [-standby ON|OFF]
//! ```
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=purelink=debug cargo run --example purelink_cli -- purelink.yaml -fan auto -osc on
//! ```
//!
//! The config file uses the keys `DYSON_PASSWORD`, `DYSON_SERIAL`,
//! `DYSON_TYPE`, `DYSON_IP` and optionally `DYSON_PORT`.

use std::env;

use purelink::types::{FanMode, FanSpeedSetting, SwitchState};
use purelink::{DeviceConfig, DeviceSession, MqttTransport};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Commands {
    fan: Option<FanMode>,
    speed: Option<FanSpeedSetting>,
    oscillation: Option<SwitchState>,
    standby: Option<SwitchState>,
}

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {program} <config.yaml> [-fan OFF|FAN|AUTO] [-speed up|down|1-10] \
         [-osc ON|OFF] [-standby ON|OFF]"
    );
    std::process::exit(1);
}

fn parse_commands(program: &str, args: &[String]) -> Result<Commands, Box<dyn std::error::Error>> {
    let mut commands = Commands::default();
    let mut iter = args.iter();

    while let Some(flag) = iter.next() {
        let Some(value) = iter.next() else {
            usage(program);
        };
        match flag.as_str() {
            "-fan" => commands.fan = Some(value.parse()?),
            "-speed" => commands.speed = Some(value.parse()?),
            "-osc" => commands.oscillation = Some(value.parse()?),
            "-standby" => commands.standby = Some(value.parse()?),
            _ => usage(program),
        }
    }
    Ok(commands)
}

async fn apply(
    session: &mut DeviceSession<MqttTransport>,
    commands: &Commands,
) -> purelink::Result<()> {
    if let Some(mode) = commands.fan {
        println!("Setting fan mode to {mode}...");
        session.set_fan_mode(mode).await?;
    }
    if let Some(speed) = commands.speed {
        println!("Setting fan speed ({speed:?})...");
        session.set_fan_speed(speed).await?;
    }
    if let Some(state) = commands.oscillation {
        println!("Setting oscillation to {state}...");
        session.set_oscillation(state).await?;
    }
    if let Some(state) = commands.standby {
        println!("Setting standby monitoring to {state}...");
        session.set_standby_monitoring(state).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage(&args[0]);
    }

    let config = DeviceConfig::from_file(&args[1])?;
    let commands = parse_commands(&args[0], &args[2..])?;

    let mut session = DeviceSession::mqtt(config.credentials());

    println!("Connecting to {}...", config.ip_address);
    session.connect().await?;

    if let Some((state, sensors)) = session.data() {
        println!("{state}");
        println!("{sensors}");
    }

    let applied = apply(&mut session, &commands).await;
    if let Err(e) = &applied {
        eprintln!("Command failed: {e}");
    }

    if let Some(state) = session.state() {
        println!("{state}");
    }

    // Always release the device, even after a failed command.
    println!("Disconnecting...");
    let released = session.disconnect().await;

    applied?;
    released?;
    println!("Done!");
    Ok(())
}
