// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol implementation for talking to relay outputs.
//!
//! A relay exposes two requests, both plain HTTP `GET`s with the shared
//! secret embedded in the path:
//!
//! - command: `http://{host}/{secret}/?cmd={channel}:{code}`
//! - status: `http://{host}/{secret}/?pt={channel}&cmd=get`
//!
//! The status body is a `/`-delimited string whose first token is `ON` or
//! `OFF`.

mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::{HttpRelay, RelayEndpoint};

use std::future::Future;

use crate::error::{Error, ParseError, ProtocolError};
use crate::types::{Channel, RelayState};

/// Command code that pulses the trigger output.
///
/// The door opener decides the direction of travel itself, so opening and
/// closing send the same code.
pub const TRIGGER_CODE: u32 = 1;

/// Response body returned by a relay.
#[derive(Debug, Clone)]
pub struct RelayResponse {
    body: String,
}

impl RelayResponse {
    /// Creates a new response with the given body.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Returns the raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Interprets the body as a status payload.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnrecognizedState` if the leading token is not
    /// `ON` or `OFF`.
    pub fn relay_state(&self) -> Result<RelayState, ParseError> {
        RelayState::from_status_body(&self.body)
    }
}

/// A single addressable relay output.
///
/// Implementations only move bytes; they never swallow errors. Deciding that
/// a failure means "no reading this tick" is left to the callers.
pub trait Relay: Send + Sync {
    /// Returns the output this relay addresses.
    fn channel(&self) -> &Channel;

    /// Sends a state-change command to the output.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails or the relay rejects it.
    fn send_command(
        &self,
        code: u32,
    ) -> impl Future<Output = Result<RelayResponse, ProtocolError>> + Send;

    /// Queries the current state of the output.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails or the relay rejects it.
    fn query_state(&self) -> impl Future<Output = Result<RelayResponse, ProtocolError>> + Send;

    /// Queries the output and reports whether it is energised.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` on transport failure and `Error::Parse` when
    /// the status token is neither `ON` nor `OFF`.
    fn is_power_on(&self) -> impl Future<Output = Result<bool, Error>> + Send {
        async move {
            let response = self.query_state().await?;
            Ok(response.relay_state()?.is_on())
        }
    }
}
