// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory relay used by unit tests.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::ProtocolError;
use crate::protocol::{Relay, RelayResponse};
use crate::types::Channel;

#[derive(Debug, Default)]
struct MockState {
    body: String,
    unreachable: bool,
    commands: Vec<u32>,
    queries: usize,
    gate: Option<Arc<Notify>>,
}

/// A relay whose status body and reachability are set by the test.
///
/// Clones share state, so a test can keep a handle after moving a clone into
/// a sensor or controller.
#[derive(Debug, Clone)]
pub(crate) struct MockRelay {
    channel: Channel,
    state: Arc<Mutex<MockState>>,
}

impl MockRelay {
    pub(crate) fn new(channel: &str) -> Self {
        Self {
            channel: Channel::new(channel),
            state: Arc::new(Mutex::new(MockState {
                body: "OFF".to_string(),
                ..MockState::default()
            })),
        }
    }

    pub(crate) fn set_body(&self, body: &str) {
        self.state.lock().body = body.to_string();
    }

    pub(crate) fn set_active(&self, active: bool) {
        self.set_body(if active { "ON/0" } else { "OFF/0" });
    }

    pub(crate) fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unreachable = unreachable;
    }

    /// Holds every status query until `gate` is notified.
    pub(crate) fn set_gate(&self, gate: Option<Arc<Notify>>) {
        self.state.lock().gate = gate;
    }

    pub(crate) fn commands(&self) -> Vec<u32> {
        self.state.lock().commands.clone()
    }

    pub(crate) fn queries(&self) -> usize {
        self.state.lock().queries
    }
}

impl Relay for MockRelay {
    fn channel(&self) -> &Channel {
        &self.channel
    }

    async fn send_command(&self, code: u32) -> Result<RelayResponse, ProtocolError> {
        let mut state = self.state.lock();
        // A command that fails in transit may still have reached the relay.
        state.commands.push(code);
        if state.unreachable {
            return Err(ProtocolError::ConnectionFailed("unreachable".to_string()));
        }
        Ok(RelayResponse::new("OK"))
    }

    async fn query_state(&self) -> Result<RelayResponse, ProtocolError> {
        let gate = {
            let mut state = self.state.lock();
            state.queries += 1;
            state.gate.clone()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let state = self.state.lock();
        if state.unreachable {
            return Err(ProtocolError::ConnectionFailed("unreachable".to_string()));
        }
        Ok(RelayResponse::new(state.body.clone()))
    }
}
