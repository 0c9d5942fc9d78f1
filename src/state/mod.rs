// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door state management types.
//!
//! [`DoorState`] is the mutable record a controller keeps about its door;
//! [`StateChange`] is what it announces when the reported position moves.
//!
//! # Examples
//!
//! ```
//! use relay_garage::state::{DoorState, StateChange};
//! use relay_garage::types::{DoorPosition, TargetPosition};
//!
//! let mut state = DoorState::new(TargetPosition::Open);
//!
//! let change = state.apply(DoorPosition::Closed);
//! assert_eq!(change, Some(StateChange::from_position(DoorPosition::Closed)));
//! assert_eq!(state.last_stable(), TargetPosition::Closed);
//! ```

mod door_state;
mod state_change;

pub use door_state::DoorState;
pub use state_change::StateChange;
