// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Limit switches read through relay outputs.

use crate::protocol::Relay;

/// A physical limit switch wired to a relay output.
///
/// The switch is active while its relay output reports `ON`. Nothing is
/// cached: every read is a fresh status request.
#[derive(Debug, Clone)]
pub struct SwitchSensor<R> {
    relay: R,
}

impl<R: Relay> SwitchSensor<R> {
    /// Wraps the relay output the switch is wired to.
    #[must_use]
    pub fn new(relay: R) -> Self {
        Self { relay }
    }

    /// Returns the underlying relay.
    #[must_use]
    pub fn relay(&self) -> &R {
        &self.relay
    }

    /// Reads the switch.
    ///
    /// Returns `None` when the relay could not be reached or answered with
    /// an unrecognized state. The failure is logged; the next poll retries.
    pub async fn is_active(&self) -> Option<bool> {
        match self.relay.is_power_on().await {
            Ok(active) => Some(active),
            Err(e) => {
                tracing::warn!(
                    channel = %self.relay.channel(),
                    error = %e,
                    "Limit switch reading unavailable"
                );
                None
            }
        }
    }
}
