// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door controller.
//!
//! The controller is the face the accessory host talks to. It owns the
//! trigger relay, the position estimator and the door's tracked state.
//!
//! # Commands
//!
//! The opener has a single push-button input, so [`DoorController::open`]
//! and [`DoorController::close`] pulse the same relay; the opener decides
//! the direction itself. Command failures are logged and never returned:
//! the next refresh reports whatever the door actually did.
//!
//! # Refresh
//!
//! [`DoorController::refresh`] asks the estimator for the current position
//! and announces it to subscribers if it moved. It is normally driven by a
//! [`PollScheduler`] started with [`DoorController::start_polling`].
//!
//! # Concurrency
//!
//! Commands and refreshes may interleave freely. State is only touched
//! under a short lock that is never held across relay I/O. A refresh whose
//! readings started before a command landed is discarded, and the command
//! shows up on the next tick.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::time::Instant;

use crate::config::{DoorConfig, PositionSource};
use crate::error::Error;
use crate::estimator::{IssuedCommand, PositionEstimator};
use crate::protocol::{HttpRelay, Relay, TRIGGER_CODE};
use crate::scheduler::PollScheduler;
use crate::sensor::SwitchSensor;
use crate::state::{DoorState, StateChange};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::types::{DoorPosition, TargetPosition};

/// A garage door inferred and driven through relays.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use relay_garage::config::DoorConfig;
/// use relay_garage::controller::DoorController;
/// use relay_garage::types::DoorPosition;
///
/// # async fn example() -> relay_garage::Result<()> {
/// let config = DoorConfig::from_file("garage.json")?;
/// let door = Arc::new(DoorController::from_config(&config)?);
/// door.start_polling();
///
/// door.set_target(DoorPosition::Closed).await;
/// println!("door is {}", door.current_position());
/// # Ok(())
/// # }
/// ```
pub struct DoorController<R: Relay> {
    name: String,
    trigger: R,
    estimator: PositionEstimator<R>,
    state: RwLock<DoorState>,
    callbacks: CallbackRegistry,
    poll_interval: Duration,
    poller: Mutex<Option<PollScheduler>>,
}

impl<R: Relay> DoorController<R> {
    /// Default interval between refreshes.
    pub const DEFAULT_POLL_INTERVAL: Duration =
        Duration::from_millis(DoorConfig::DEFAULT_POLL_INTERVAL_MS);

    /// Creates a controller for a door assumed to be resting at `initial`.
    #[must_use]
    pub fn new(trigger: R, estimator: PositionEstimator<R>, initial: TargetPosition) -> Self {
        Self {
            name: DoorConfig::DEFAULT_NAME.to_string(),
            trigger,
            estimator,
            state: RwLock::new(DoorState::new(initial)),
            callbacks: CallbackRegistry::new(),
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            poller: Mutex::new(None),
        }
    }

    /// Sets the display name used in logs.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the interval used by [`start_polling`](Self::start_polling).
    ///
    /// The interval must be non-zero; see [`start_polling`](Self::start_polling).
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the estimator in use.
    #[must_use]
    pub fn estimator(&self) -> &PositionEstimator<R> {
        &self.estimator
    }

    /// Returns the position currently reported.
    #[must_use]
    pub fn current_position(&self) -> DoorPosition {
        self.state.read().current()
    }

    /// Returns the target position.
    #[must_use]
    pub fn target_position(&self) -> TargetPosition {
        self.state.read().target()
    }

    /// Returns the last position the door was confirmed resting in.
    #[must_use]
    pub fn last_known_stable(&self) -> TargetPosition {
        self.state.read().last_stable()
    }

    /// Returns a copy of the tracked state.
    #[must_use]
    pub fn state(&self) -> DoorState {
        *self.state.read()
    }

    /// Always false: there is no obstruction sensor.
    #[must_use]
    pub fn obstruction_detected(&self) -> bool {
        false
    }

    /// Returns true if the current estimate can be trusted as a resting
    /// position.
    #[must_use]
    pub fn is_stable_now(&self) -> bool {
        let snapshot = self.state.read().snapshot();
        self.estimator.is_stable_now(&snapshot, Instant::now())
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Pulses the trigger to open the door.
    pub async fn open(&self) {
        self.issue(TargetPosition::Open).await;
    }

    /// Pulses the trigger to close the door.
    pub async fn close(&self) {
        self.issue(TargetPosition::Closed).await;
    }

    /// Moves the door towards `requested`.
    ///
    /// Does nothing if the door already reports `requested`, or if
    /// `requested` is not a resting position. Returns `true` if a command
    /// was sent.
    pub async fn set_target(&self, requested: DoorPosition) -> bool {
        let current = self.current_position();
        if requested == current {
            tracing::debug!(
                door = %self.name,
                position = %current,
                "Door already at requested position"
            );
            return false;
        }

        match TargetPosition::try_from(requested) {
            Ok(TargetPosition::Open) => self.open().await,
            Ok(TargetPosition::Closed) => self.close().await,
            Err(other) => {
                tracing::debug!(
                    door = %self.name,
                    requested = %other,
                    "Ignoring non-resting target"
                );
                return false;
            }
        }
        true
    }

    /// Records the command before sending it: the relay may act on a request
    /// whose response is lost.
    async fn issue(&self, target: TargetPosition) {
        self.state.write().record_command(IssuedCommand::now(target));
        tracing::info!(door = %self.name, target = %target, "Triggering door");

        if let Err(e) = self.trigger.send_command(TRIGGER_CODE).await {
            tracing::warn!(
                door = %self.name,
                channel = %self.trigger.channel(),
                error = %e,
                "Trigger command failed"
            );
        }
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    /// Re-evaluates the door position and notifies subscribers if it moved.
    ///
    /// Returns the change that was announced, if any. A tick whose readings
    /// could not be taken leaves the state untouched.
    pub async fn refresh(&self) -> Option<StateChange> {
        let snapshot = self.state.read().snapshot();

        let Some(position) = self.estimator.estimate(&snapshot, Instant::now()).await else {
            tracing::debug!(door = %self.name, "No position information this tick");
            return None;
        };

        let change = {
            let mut state = self.state.write();
            if state.last_command() != snapshot.last_command {
                tracing::debug!(
                    door = %self.name,
                    "Command issued during refresh, discarding estimate"
                );
                return None;
            }
            state.apply(position)
        }?;

        tracing::info!(
            door = %self.name,
            position = %change.current,
            estimator = self.estimator.kind(),
            "Door position changed"
        );
        self.callbacks.dispatch(&change);
        Some(change)
    }

    // =========================================================================
    // Polling
    // =========================================================================

    /// Stops the poll task, if one is running.
    ///
    /// Returns `true` if a task was stopped.
    pub fn stop_polling(&self) -> bool {
        match self.poller.lock().take() {
            Some(poller) => {
                poller.stop();
                true
            }
            None => false,
        }
    }

    /// Returns true while a poll task is running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.poller
            .lock()
            .as_ref()
            .is_some_and(|poller| !poller.is_finished())
    }
}

impl<R: Relay + 'static> DoorController<R> {
    /// Starts refreshing the door in the background.
    ///
    /// The task lives until [`stop_polling`](Self::stop_polling) is called
    /// or the controller is dropped. Calling this again restarts it.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, or if the poll interval is
    /// zero. Doors built with [`from_config`](DoorController::from_config)
    /// always have a non-zero interval.
    pub fn start_polling(self: &Arc<Self>) {
        let poller = PollScheduler::spawn(Arc::downgrade(self), self.poll_interval);
        tracing::debug!(door = %self.name, interval = ?self.poll_interval, "Polling started");
        if let Some(previous) = self.poller.lock().replace(poller) {
            previous.stop();
        }
    }
}

impl DoorController<HttpRelay> {
    /// Builds a door from its configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration selects no usable
    /// position source, and `Error::Protocol` if a relay client cannot be
    /// created.
    pub fn from_config(config: &DoorConfig) -> Result<Self, Error> {
        let timeout = config.request_timeout();
        let estimator = match config.position_source()? {
            PositionSource::Switches {
                open,
                closed,
                delay_after_command,
            } => PositionEstimator::switches(
                SwitchSensor::new(open.endpoint(timeout).into_client()?),
                SwitchSensor::new(closed.endpoint(timeout).into_client()?),
                delay_after_command,
            ),
            PositionSource::Timer { travel_duration } => {
                PositionEstimator::timer(travel_duration)
            }
        };
        let trigger = config.trigger.endpoint(timeout).into_client()?;

        tracing::info!(
            door = %config.name,
            estimator = estimator.kind(),
            "Door configured"
        );

        Ok(Self::new(trigger, estimator, config.initial_position)
            .with_name(&config.name)
            .with_poll_interval(config.poll_interval()))
    }
}

impl<R: Relay> Subscribable for DoorController<R> {
    fn on_position_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(DoorPosition) + Send + Sync + 'static,
    {
        self.callbacks.on_position_changed(callback)
    }

    fn on_target_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(TargetPosition) + Send + Sync + 'static,
    {
        self.callbacks.on_target_changed(callback)
    }

    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.callbacks.on_state_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }
}

impl<R: Relay> std::fmt::Debug for DoorController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoorController")
            .field("name", &self.name)
            .field("estimator", &self.estimator.kind())
            .field("state", &*self.state.read())
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}
