// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for door and relay state.
//!
//! # Types
//!
//! - [`DoorPosition`] - Open/Closed/Opening/Closing/Stopped
//! - [`TargetPosition`] - Open/Closed, the positions a command can request
//! - [`RelayState`] - On/Off as reported by a relay output
//! - [`Channel`] - Output identifier on a relay board

mod position;
mod power;

pub use position::{DoorPosition, TargetPosition};
pub use power::{Channel, RelayState};
