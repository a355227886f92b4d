// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for state subscriptions.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::{FailureRecord, StateTransition};

/// Unique identifier for a subscription.
///
/// Returned when registering a callback; pass it to
/// [`CallbackRegistry::unsubscribe`] to remove the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
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

type StateChangedCallback = Arc<dyn Fn(&StateTransition) + Send + Sync>;

type SyncErrorCallback = Arc<dyn Fn(&FailureRecord) + Send + Sync>;

/// Registry for state change and sync error callbacks.
///
/// Thread-safe via `parking_lot::RwLock`. Callbacks are cloned out of the
/// lock before they run, so a callback may subscribe or unsubscribe.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
    sync_error_callbacks: RwLock<HashMap<SubscriptionId, SyncErrorCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            state_changed_callbacks: RwLock::new(HashMap::new()),
            sync_error_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback for cached value transitions.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateTransition) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for failed device calls.
    pub fn on_sync_error<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&FailureRecord) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.sync_error_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state_changed_callbacks.write().remove(&id).is_some()
            || self.sync_error_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.state_changed_callbacks.write().clear();
        self.sync_error_callbacks.write().clear();
    }

    /// Dispatches a state transition to all state change callbacks.
    pub fn dispatch_state_changed(&self, transition: &StateTransition) {
        let callbacks: Vec<_> = self
            .state_changed_callbacks
            .read()
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback(transition);
        }
    }

    /// Dispatches a failure to all sync error callbacks.
    pub fn dispatch_sync_error(&self, failure: &FailureRecord) {
        let callbacks: Vec<_> = self
            .sync_error_callbacks
            .read()
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback(failure);
        }
    }

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.state_changed_callbacks.read().len() + self.sync_error_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
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
            .field("callback_count", &self.callback_count())
            .finish()
    }
}
