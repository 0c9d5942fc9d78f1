// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door position inference.
//!
//! There is no position sensor on the door. Its position is inferred once
//! per poll tick by one of two strategies, picked when the door is built:
//!
//! - [`PositionEstimator::Switches`] reads a limit switch at each end of
//!   travel. Right after a command the switches may still report where the
//!   door *was*, so their readings are ignored for a debounce window and the
//!   direction of travel is derived from the last resting position instead.
//! - [`PositionEstimator::Timer`] has no feedback at all. It assumes every
//!   command moves the door to its target in a fixed travel duration.
//!
//! Estimators hold no mutable state; everything they need about the door's
//! history arrives in a [`Snapshot`].

use std::time::Duration;

use tokio::time::Instant;

use crate::protocol::Relay;
use crate::sensor::SwitchSensor;
use crate::types::{DoorPosition, TargetPosition};

/// A command issued to the door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuedCommand {
    /// Where the command was meant to take the door.
    pub target: TargetPosition,
    /// When the command was issued.
    pub at: Instant,
}

impl IssuedCommand {
    /// Creates a command record stamped with the current time.
    #[must_use]
    pub fn now(target: TargetPosition) -> Self {
        Self {
            target,
            at: Instant::now(),
        }
    }

    /// Time elapsed between issuing the command and `now`.
    #[must_use]
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.at)
    }
}

/// The part of the door's history an estimate depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Last position the door was confirmed to be resting in.
    pub last_stable: TargetPosition,
    /// Most recent open or close command.
    pub last_command: Option<IssuedCommand>,
}

impl Snapshot {
    /// The direction the door must be travelling in if it has left its last
    /// resting position.
    #[must_use]
    pub fn departing_direction(&self) -> DoorPosition {
        self.last_stable.opposite().moving_towards()
    }
}

/// Strategy used to infer the door position.
#[derive(Debug, Clone)]
pub enum PositionEstimator<R> {
    /// Limit switches at both ends of travel.
    Switches {
        /// Active while the door is fully open.
        open: SwitchSensor<R>,
        /// Active while the door is fully closed.
        closed: SwitchSensor<R>,
        /// How long switch readings are distrusted after a command.
        delay_after_command: Duration,
    },
    /// Dead reckoning from the last command and a fixed travel time.
    Timer {
        /// Time for a full open or close traverse.
        travel_duration: Duration,
    },
}

impl<R: Relay> PositionEstimator<R> {
    /// Creates a switch-based estimator.
    #[must_use]
    pub fn switches(
        open: SwitchSensor<R>,
        closed: SwitchSensor<R>,
        delay_after_command: Duration,
    ) -> Self {
        Self::Switches {
            open,
            closed,
            delay_after_command,
        }
    }

    /// Creates a timer-based estimator.
    #[must_use]
    pub fn timer(travel_duration: Duration) -> Self {
        Self::Timer { travel_duration }
    }

    /// Short name of the strategy, for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Switches { .. } => "switches",
            Self::Timer { .. } => "timer",
        }
    }

    /// Returns true while readings are settled enough to report a resting
    /// position.
    ///
    /// For switches this means the debounce window since the last command
    /// has elapsed; for the timer it means the last traverse has completed.
    #[must_use]
    pub fn is_stable_now(&self, snapshot: &Snapshot, now: Instant) -> bool {
        match self {
            Self::Switches {
                delay_after_command,
                ..
            } => !within(snapshot.last_command, *delay_after_command, now),
            Self::Timer { travel_duration } => {
                !within(snapshot.last_command, *travel_duration, now)
            }
        }
    }

    /// Infers the door position at `now`.
    ///
    /// Returns `None` when this tick carries no new information, in which
    /// case the caller keeps its previous position.
    pub async fn estimate(&self, snapshot: &Snapshot, now: Instant) -> Option<DoorPosition> {
        match self {
            Self::Switches { open, closed, .. } => {
                if !self.is_stable_now(snapshot, now) {
                    return Some(snapshot.departing_direction());
                }
                if open.is_active().await? {
                    return Some(DoorPosition::Open);
                }
                if closed.is_active().await? {
                    return Some(DoorPosition::Closed);
                }
                Some(snapshot.departing_direction())
            }
            Self::Timer { .. } => match snapshot.last_command {
                None => Some(snapshot.last_stable.into()),
                Some(command) if self.is_stable_now(snapshot, now) => {
                    Some(command.target.into())
                }
                Some(command) => Some(command.target.moving_towards()),
            },
        }
    }
}

/// True if `command` was issued less than `window` before `now`.
fn within(command: Option<IssuedCommand>, window: Duration, now: Instant) -> bool {
    command.is_some_and(|command| command.elapsed_at(now) < window)
}
