// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Runs a single garage door from a JSON configuration file.
//!
//! Polls the door until interrupted and logs every position change.
//!
//! # Usage
//!
//! ```bash
//! relay-garage <config.json>
//!
//! # More detail, including every relay request
//! RUST_LOG=relay_garage=debug relay-garage garage.json
//! ```

use std::env;
use std::sync::Arc;

use relay_garage::{DoorConfig, DoorController, Subscribable};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        print_usage(args.first().map_or("relay-garage", String::as_str));
        std::process::exit(2);
    };

    let door = match DoorConfig::from_file(path)
        .map_err(relay_garage::Error::from)
        .and_then(|config| DoorController::from_config(&config))
    {
        Ok(door) => Arc::new(door),
        Err(e) => {
            tracing::error!(config = %path, error = %e, "Cannot start door");
            std::process::exit(1);
        }
    };

    door.on_state_changed(|change| {
        tracing::info!(
            position = %change.current,
            target = ?change.target,
            "State changed"
        );
    });
    door.start_polling();
    tracing::info!(door = door.name(), "Running, press Ctrl+C to stop");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Cannot listen for shutdown signal");
    }

    door.stop_polling();
    tracing::info!(door = door.name(), "Stopped");
}

fn print_usage(program: &str) {
    eprintln!("Usage:");
    eprintln!("  {program} <config.json>");
    eprintln!();
    eprintln!("The configuration names the trigger relay and either both limit");
    eprintln!("switches or a travel_duration_ms for dead reckoning.");
}
