// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relay output types.
//!
//! This module provides the power state reported by a relay output and the
//! identifier used to address a single output on a multi-channel relay.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Delimiter separating the fields of a relay status payload.
const STATUS_DELIMITER: char = '/';

/// Represents the power state of a relay output.
///
/// # Examples
///
/// ```
/// use relay_garage::types::RelayState;
///
/// assert_eq!(RelayState::from_status_body("ON/12/0").unwrap(), RelayState::On);
/// assert_eq!(RelayState::from_status_body("OFF/extra").unwrap(), RelayState::Off);
/// assert!(RelayState::from_status_body("FOO").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayState {
    /// Output is de-energised.
    Off,
    /// Output is energised.
    On,
}

impl RelayState {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }

    /// Returns true if the output is energised.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Parses a status payload.
    ///
    /// Only the leading token, up to the first `/`, carries the state.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnrecognizedState` if the token is not exactly
    /// `ON` or `OFF`.
    pub fn from_status_body(body: &str) -> Result<Self, ParseError> {
        let token = body.split(STATUS_DELIMITER).next().unwrap_or_default();
        token
            .parse()
            .map_err(|_| ParseError::UnrecognizedState(body.to_string()))
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RelayState {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OFF" => Ok(Self::Off),
            "ON" => Ok(Self::On),
            _ => Err(ParseError::UnrecognizedState(s.to_string())),
        }
    }
}

impl From<bool> for RelayState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

/// Identifier of one output on a relay board.
///
/// Relay boards number their outputs, but the identifier is carried as text
/// because it is interpolated verbatim into request URLs.
///
/// # Examples
///
/// ```
/// use relay_garage::types::Channel;
///
/// let channel = Channel::new("4");
/// assert_eq!(channel.as_str(), "4");
/// assert_eq!(Channel::from(7).to_string(), "7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Channel(String);

impl Channel {
    /// Creates a channel identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u8> for Channel {
    fn from(value: u8) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Channel {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Channel {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
