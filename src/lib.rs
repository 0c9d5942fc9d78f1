// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relay Garage - control a garage door through networked relay boards.
//!
//! A garage door opener with a single push-button input is wired to a relay
//! output on a small HTTP-controlled relay board. Pulsing the output starts
//! or reverses the door. The library exposes the door as a smart-home
//! accessory with a current and a target position.
//!
//! There is no position sensor, so the position is inferred:
//!
//! - **Limit switches**: two inputs on the relay board report when the door
//!   is fully open or fully closed. Between them the direction of travel is
//!   derived from where the door last rested.
//! - **Travel timer**: without switches, every command is assumed to move
//!   the door to its target in a fixed travel duration.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use relay_garage::{DoorConfig, DoorController, DoorPosition, Subscribable};
//!
//! #[tokio::main]
//! async fn main() -> relay_garage::Result<()> {
//!     let config = DoorConfig::from_json_str(r#"{
//!         "trigger": { "host": "192.168.0.91", "secret": "sec", "channel": "4" },
//!         "open_switch": { "host": "192.168.0.91", "secret": "sec", "channel": "5" },
//!         "closed_switch": { "host": "192.168.0.91", "secret": "sec", "channel": "6" }
//!     }"#)?;
//!
//!     let door = Arc::new(DoorController::from_config(&config)?);
//!     door.on_position_changed(|position| println!("Door is {position}"));
//!     door.start_polling();
//!
//!     door.set_target(DoorPosition::Open).await;
//!     Ok(())
//! }
//! ```
//!
//! # Relay boards
//!
//! Any board implementing [`protocol::Relay`] can drive a door. The bundled
//! [`protocol::HttpRelay`] speaks the plain GET protocol described in the
//! [`protocol`] module.

pub mod config;
pub mod controller;
pub mod error;
pub mod estimator;
pub mod protocol;
pub mod scheduler;
pub mod sensor;
pub mod state;
pub mod subscription;
pub mod types;

pub use config::{DoorConfig, PositionSource, RelayConfig};
pub use controller::DoorController;
pub use error::{ConfigError, Error, ParseError, ProtocolError, Result};
pub use estimator::PositionEstimator;
pub use protocol::{HttpRelay, Relay, RelayEndpoint};
pub use scheduler::PollScheduler;
pub use sensor::SwitchSensor;
pub use state::{DoorState, StateChange};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{Channel, DoorPosition, RelayState, TargetPosition};
