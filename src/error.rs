// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `relay_garage` library.
//!
//! Only [`ConfigError`] is ever fatal. Transport and parse failures are
//! produced by the relay layer and then swallowed by the sensor and
//! controller, which log them and treat the tick as carrying no information.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred while talking to a relay.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A relay answered with something we could not interpret.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The door configuration cannot describe a usable door model.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Transport failures talking to a relay.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The relay answered with a non-success status.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors interpreting relay status payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The leading status token was neither `ON` nor `OFF`.
    #[error("unrecognized relay state: {0:?}")]
    UnrecognizedState(String),
}

/// Errors raised while building a door from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither limit switches nor a travel duration were configured.
    #[error("no position source: configure both limit switches or a travel duration")]
    NoPositionSource,

    /// Only one of the two limit switches was configured.
    #[error("limit switches must be configured in pairs (missing {missing})")]
    IncompleteSwitches {
        /// Which switch is absent.
        missing: &'static str,
    },

    /// A duration that must be positive was zero.
    #[error("{field} must be greater than zero")]
    InvalidInterval {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The configuration file is not valid JSON for a door.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
