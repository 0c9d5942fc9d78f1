// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door state tracking.

use crate::estimator::{IssuedCommand, Snapshot};
use crate::types::{DoorPosition, TargetPosition};

use super::StateChange;

/// Tracked state of a door.
///
/// `last_stable` only ever holds a resting position, and is updated every
/// time an estimate reports one, so it always names the end of travel the
/// door most recently left from (or is sitting at).
///
/// # Examples
///
/// ```
/// use relay_garage::state::DoorState;
/// use relay_garage::types::{DoorPosition, TargetPosition};
///
/// let mut state = DoorState::new(TargetPosition::Open);
/// assert_eq!(state.current(), DoorPosition::Open);
///
/// let change = state.apply(DoorPosition::Closing).unwrap();
/// assert_eq!(change.current, DoorPosition::Closing);
/// assert_eq!(state.last_stable(), TargetPosition::Open);
///
/// // Re-applying the same position is not a change.
/// assert!(state.apply(DoorPosition::Closing).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorState {
    /// Position reported outward.
    current: DoorPosition,
    /// Position last requested, or last confirmed at rest.
    target: TargetPosition,
    /// Last position confirmed as open or closed.
    last_stable: TargetPosition,
    /// Most recent open or close command.
    last_command: Option<IssuedCommand>,
}

impl DoorState {
    /// Creates the state of a door assumed to be resting at `initial`.
    #[must_use]
    pub fn new(initial: TargetPosition) -> Self {
        Self {
            current: initial.into(),
            target: initial,
            last_stable: initial,
            last_command: None,
        }
    }

    /// Returns the position currently reported.
    #[must_use]
    pub fn current(&self) -> DoorPosition {
        self.current
    }

    /// Returns the target position.
    #[must_use]
    pub fn target(&self) -> TargetPosition {
        self.target
    }

    /// Returns the last confirmed resting position.
    #[must_use]
    pub fn last_stable(&self) -> TargetPosition {
        self.last_stable
    }

    /// Returns the most recent command, if any was issued.
    #[must_use]
    pub fn last_command(&self) -> Option<IssuedCommand> {
        self.last_command
    }

    /// Captures what an estimator needs to know.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            last_stable: self.last_stable,
            last_command: self.last_command,
        }
    }

    /// Records a command that was just issued.
    pub fn record_command(&mut self, command: IssuedCommand) {
        self.target = command.target;
        self.last_command = Some(command);
    }

    /// Applies an estimated position.
    ///
    /// Returns the change to announce, or `None` if the reported position
    /// did not move.
    pub fn apply(&mut self, position: DoorPosition) -> Option<StateChange> {
        if let Ok(stable) = TargetPosition::try_from(position) {
            self.last_stable = stable;
            self.target = stable;
        }

        if position == self.current {
            return None;
        }

        self.current = position;
        Some(StateChange::from_position(position))
    }
}
