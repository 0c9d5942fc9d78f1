// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! A [`StateChange`] is what observers of a door receive whenever a refresh
//! moves the reported position.
//!
//! # Examples
//!
//! ```
//! use relay_garage::state::StateChange;
//! use relay_garage::types::{DoorPosition, TargetPosition};
//!
//! let change = StateChange::from_position(DoorPosition::Closed);
//! assert_eq!(change.target, Some(TargetPosition::Closed));
//!
//! let change = StateChange::from_position(DoorPosition::Opening);
//! assert_eq!(change.target, None);
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{DoorPosition, TargetPosition};

/// A change in the reported door position.
///
/// When the door comes to rest the target is reported alongside the
/// position, so consumers showing a current/target pair stay consistent
/// even if the door was moved by a wall button rather than by us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    /// The new current position.
    pub current: DoorPosition,
    /// The target to report with it; `Some` exactly when `current` is a
    /// resting position.
    pub target: Option<TargetPosition>,
}

impl StateChange {
    /// Builds the change announcing `current`.
    #[must_use]
    pub fn from_position(current: DoorPosition) -> Self {
        Self {
            current,
            target: TargetPosition::try_from(current).ok(),
        }
    }

    /// Returns true if the door came to rest with this change.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.target.is_some()
    }
}
