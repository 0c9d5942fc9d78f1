// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door position types.
//!
//! [`DoorPosition`] is what the door is believed to be doing right now;
//! [`TargetPosition`] is where it can be told to go, and doubles as the
//! last position the door was confirmed to be resting in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The believed physical position of the door.
///
/// The numeric values match the accessory framework's current door state
/// codes.
///
/// # Examples
///
/// ```
/// use relay_garage::types::DoorPosition;
///
/// assert_eq!(DoorPosition::Closing.as_num(), 3);
/// assert!(DoorPosition::Open.is_stable());
/// assert!(DoorPosition::Opening.is_moving());
/// assert_eq!("closed".parse::<DoorPosition>().unwrap(), DoorPosition::Closed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorPosition {
    /// Fully open and at rest.
    Open,
    /// Fully closed and at rest.
    Closed,
    /// Travelling towards open.
    Opening,
    /// Travelling towards closed.
    Closing,
    /// Halted part-way.
    ///
    /// Nothing can detect a manual stop, so the estimators never produce
    /// this value.
    Stopped,
}

impl DoorPosition {
    /// Returns the numeric state code.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Closed => 1,
            Self::Opening => 2,
            Self::Closing => 3,
            Self::Stopped => 4,
        }
    }

    /// Returns the lowercase name of the position.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Opening => "opening",
            Self::Closing => "closing",
            Self::Stopped => "stopped",
        }
    }

    /// Returns true for the resting positions `Open` and `Closed`.
    #[must_use]
    pub const fn is_stable(&self) -> bool {
        matches!(self, Self::Open | Self::Closed)
    }

    /// Returns true while the door is travelling.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }

    /// Coerces the position to the single bit some consumers ask for.
    ///
    /// This is the truthiness of the numeric code: only `Open` is false.
    #[must_use]
    pub const fn as_binary(&self) -> bool {
        self.as_num() != 0
    }
}

impl fmt::Display for DoorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for DoorPosition {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Open),
            1 => Ok(Self::Closed),
            2 => Ok(Self::Opening),
            3 => Ok(Self::Closing),
            4 => Ok(Self::Stopped),
            other => Err(other),
        }
    }
}

impl FromStr for DoorPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "opening" => Ok(Self::Opening),
            "closing" => Ok(Self::Closing),
            "stopped" => Ok(Self::Stopped),
            _ => Err(s.to_string()),
        }
    }
}

/// A position the door can be commanded to, or has been seen resting in.
///
/// # Examples
///
/// ```
/// use relay_garage::types::{DoorPosition, TargetPosition};
///
/// assert_eq!(TargetPosition::Open.moving_towards(), DoorPosition::Opening);
/// assert_eq!(TargetPosition::try_from(DoorPosition::Closed), Ok(TargetPosition::Closed));
/// assert!(TargetPosition::try_from(DoorPosition::Closing).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPosition {
    /// Fully open.
    Open,
    /// Fully closed.
    Closed,
}

impl TargetPosition {
    /// Returns the numeric target state code.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Closed => 1,
        }
    }

    /// The transient position of a door travelling to this target.
    #[must_use]
    pub const fn moving_towards(&self) -> DoorPosition {
        match self {
            Self::Open => DoorPosition::Opening,
            Self::Closed => DoorPosition::Closing,
        }
    }

    /// The other end of travel.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }
}

impl fmt::Display for TargetPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        DoorPosition::from(*self).fmt(f)
    }
}

impl From<TargetPosition> for DoorPosition {
    fn from(target: TargetPosition) -> Self {
        match target {
            TargetPosition::Open => Self::Open,
            TargetPosition::Closed => Self::Closed,
        }
    }
}

impl TryFrom<DoorPosition> for TargetPosition {
    type Error = DoorPosition;

    fn try_from(position: DoorPosition) -> Result<Self, Self::Error> {
        match position {
            DoorPosition::Open => Ok(Self::Open),
            DoorPosition::Closed => Ok(Self::Closed),
            other => Err(other),
        }
    }
}
