// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for door state subscriptions.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::StateChange;
use crate::types::{DoorPosition, TargetPosition};

/// Unique identifier for a subscription.
///
/// IDs are unique within a registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for current position callbacks.
type PositionCallback = Arc<dyn Fn(DoorPosition) + Send + Sync>;

/// Type alias for target position callbacks.
type TargetCallback = Arc<dyn Fn(TargetPosition) + Send + Sync>;

/// Type alias for generic state change callbacks.
type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// Registry for managing door subscription callbacks.
///
/// # Thread Safety
///
/// The registry can be shared between the poll task and command callers.
/// Dispatch clones the callback list before invoking it, so a callback may
/// subscribe or unsubscribe without deadlocking.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// Current position callbacks.
    position_callbacks: RwLock<HashMap<SubscriptionId, PositionCallback>>,
    /// Target position callbacks (only fired when the door comes to rest).
    target_callbacks: RwLock<HashMap<SubscriptionId, TargetCallback>>,
    /// Generic state change callbacks.
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            position_callbacks: RwLock::new(HashMap::new()),
            target_callbacks: RwLock::new(HashMap::new()),
            state_changed_callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Generates a new unique subscription ID.
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for current position changes.
    pub fn on_position_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(DoorPosition) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.position_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for target position updates.
    pub fn on_target_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(TargetPosition) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.target_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for all state changes.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if self.position_callbacks.write().remove(&id).is_some() {
            return true;
        }
        if self.target_callbacks.write().remove(&id).is_some() {
            return true;
        }
        self.state_changed_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.position_callbacks.write().clear();
        self.target_callbacks.write().clear();
        self.state_changed_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Dispatches a state change to every relevant callback.
    ///
    /// Callbacks are called synchronously in an arbitrary order.
    pub fn dispatch(&self, change: &StateChange) {
        let callbacks: Vec<_> = self.state_changed_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(change);
        }

        let callbacks: Vec<_> = self.position_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(change.current);
        }

        if let Some(target) = change.target {
            let callbacks: Vec<_> = self.target_callbacks.read().values().cloned().collect();
            for callback in callbacks {
                callback(target);
            }
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.position_callbacks.read().len()
            + self.target_callbacks.read().len()
            + self.state_changed_callbacks.read().len()
    }

    /// Returns `true` if no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callbacks", &self.len())
            .finish_non_exhaustive()
    }
}
