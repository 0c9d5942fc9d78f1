// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for doors that announce position changes.

use crate::state::StateChange;
use crate::subscription::SubscriptionId;
use crate::types::{DoorPosition, TargetPosition};

/// Trait for types that support event subscriptions.
///
/// # Examples
///
/// ```no_run
/// use relay_garage::config::DoorConfig;
/// use relay_garage::controller::DoorController;
/// use relay_garage::subscription::Subscribable;
///
/// # fn example() -> relay_garage::Result<()> {
/// let config = DoorConfig::from_json_str(r#"{
///     "trigger": { "host": "192.168.0.91", "secret": "sec", "channel": "4" },
///     "travel_duration_ms": 15000
/// }"#)?;
/// let door = DoorController::from_config(&config)?;
///
/// let sub_id = door.on_position_changed(|position| {
///     println!("Door is now {position}");
/// });
///
/// door.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to current position changes.
    fn on_position_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(DoorPosition) + Send + Sync + 'static;

    /// Subscribes to target position updates.
    ///
    /// The callback fires whenever the door comes to rest, with the
    /// position it came to rest in.
    fn on_target_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(TargetPosition) + Send + Sync + 'static;

    /// Subscribes to all state changes.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
