// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State synchronization between the platform and the device.
//!
//! [`StateSyncAdapter`] sits between the platform's characteristic handlers
//! and a [`DeviceClient`]. It never fails towards the platform:
//!
//! - a failed write is logged and otherwise ignored,
//! - a failed read returns the last known value, or
//!   [`Reading::Unavailable`] if nothing was ever observed.
//!
//! ```no_run
//! use accessory_sync::adapter::StateSyncAdapter;
//! use accessory_sync::protocol::DeviceEndpointConfig;
//!
//! # async fn example() -> accessory_sync::Result<()> {
//! let client = DeviceEndpointConfig::led("http://device.local:8080").into_client()?;
//! let adapter = StateSyncAdapter::new("Desk Lamp", client);
//!
//! adapter.handle_set(true).await;
//! let reading = adapter.handle_get().await;
//! println!("lamp is {:?}", reading.value());
//! # Ok(())
//! # }
//! ```

mod policy;

pub use policy::SyncPolicy;

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::error::DeviceError;
use crate::protocol::DeviceClient;
use crate::state::{
    CachedState, DeviceState, FailureKind, FailureRecord, Freshness, Operation, Reading,
    StateTransition,
};
use crate::subscription::{CallbackRegistry, SubscriptionId};
use crate::types::{AccessoryKind, StateField};

type InflightSlot = Mutex<Option<broadcast::Sender<Reading>>>;

/// Mediates platform set/get calls and the device.
///
/// The cached state sits behind a mutex that is only held for the state
/// transition itself; device I/O runs outside of it, so concurrent calls
/// never wait on each other's network round trips (except coalesced reads,
/// which deliberately share one).
pub struct StateSyncAdapter<C> {
    name: String,
    kind: AccessoryKind,
    set_field: StateField,
    get_field: StateField,
    client: Arc<C>,
    policy: SyncPolicy,
    cache: Mutex<CachedState>,
    inflight: InflightSlot,
    callbacks: CallbackRegistry,
    shutdown: CancellationToken,
}

impl<C: DeviceClient> StateSyncAdapter<C> {
    /// Creates an adapter for a lightbulb whose endpoints report `on`.
    #[must_use]
    pub fn new(name: impl Into<String>, client: C) -> Self {
        Self::with_shared_client(name, Arc::new(client))
    }

    /// Creates an adapter around a client shared with other owners.
    #[must_use]
    pub fn with_shared_client(name: impl Into<String>, client: Arc<C>) -> Self {
        Self {
            name: name.into(),
            kind: AccessoryKind::default(),
            set_field: StateField::On,
            get_field: StateField::On,
            client,
            policy: SyncPolicy::default(),
            cache: Mutex::new(CachedState::new()),
            inflight: Mutex::new(None),
            callbacks: CallbackRegistry::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Sets the accessory kind used in log lines.
    #[must_use]
    pub fn with_kind(mut self, kind: AccessoryKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the fields the set and get endpoints report in, for log labels.
    #[must_use]
    pub fn with_fields(mut self, set_field: StateField, get_field: StateField) -> Self {
        self.set_field = set_field;
        self.get_field = get_field;
        self
    }

    /// Sets the caching policy.
    #[must_use]
    pub fn with_policy(mut self, policy: SyncPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Ties the adapter to an external cancellation token, e.g. the
    /// platform's shutdown signal.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Returns the accessory display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the accessory kind.
    #[must_use]
    pub fn kind(&self) -> AccessoryKind {
        self.kind
    }

    /// Returns the caching policy.
    #[must_use]
    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    /// Returns the device client.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns a snapshot of the cached state.
    #[must_use]
    pub fn cached(&self) -> CachedState {
        self.cache.lock().clone()
    }

    /// Returns the freshness of the cached value.
    #[must_use]
    pub fn freshness(&self) -> Freshness {
        self.cache.lock().freshness()
    }

    /// Returns the most recent failure, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<FailureRecord> {
        self.cache.lock().last_error().cloned()
    }

    /// Registers a callback fired when the cached value changes.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateTransition) + Send + Sync + 'static,
    {
        self.callbacks.on_state_changed(callback)
    }

    /// Registers a callback fired when a device call fails.
    pub fn on_sync_error<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&FailureRecord) + Send + Sync + 'static,
    {
        self.callbacks.on_sync_error(callback)
    }

    /// Removes a callback registered on this adapter.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }

    /// Aborts in-flight device calls and short-circuits later ones.
    ///
    /// Aborted and later calls degrade exactly like device failures.
    pub fn shutdown(&self) {
        tracing::debug!(accessory = %self.name, "Shutting down state sync");
        self.shutdown.cancel();
    }

    /// Returns `true` once [`shutdown`](Self::shutdown) was called.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Handles a platform write.
    ///
    /// The cache takes the value the device echoes back, which may differ
    /// from `desired` if the device clamped or rejected the request. On
    /// failure the cached value is left as is.
    pub async fn handle_set(&self, desired: bool) {
        tracing::debug!(accessory = %self.name, desired, "Set characteristic On");

        match self.call(Operation::Set, self.client.set_state(desired)).await {
            Ok(state) => {
                let transition = self.cache.lock().record_success(state.on, Operation::Set);
                tracing::info!(
                    accessory = %self.name,
                    "Set {} state to: {}",
                    self.kind.noun(),
                    self.set_field.label(state.on)
                );
                if let Some(transition) = transition {
                    self.callbacks.dispatch_state_changed(&transition);
                }
            }
            Err(failure) => {
                self.record_failure(failure);
            }
        }
    }

    /// Handles a platform read.
    ///
    /// Returns [`Reading::Fresh`] on success. On failure returns the last
    /// known value as [`Reading::Stale`], or [`Reading::Unavailable`] if no
    /// value was ever observed (or it is older than the policy allows).
    pub async fn handle_get(&self) -> Reading {
        if !self.policy.coalesce_reads() {
            return self.refresh().await;
        }

        let follower = {
            let mut slot = self.inflight.lock();
            if let Some(sender) = slot.as_ref() {
                Some(sender.subscribe())
            } else {
                let (sender, _) = broadcast::channel(1);
                *slot = Some(sender);
                None
            }
        };

        if let Some(mut receiver) = follower {
            tracing::trace!(accessory = %self.name, "Joining in-flight read");
            return match receiver.recv().await {
                Ok(reading) => reading,
                // Leader was dropped before it finished
                Err(_) => self.cache.lock().fallback(self.policy.max_stale_age()),
            };
        }

        let leader = InflightGuard {
            slot: &self.inflight,
        };
        let reading = self.refresh().await;
        leader.publish(reading);
        reading
    }

    async fn refresh(&self) -> Reading {
        match self.call(Operation::Get, self.client.get_state()).await {
            Ok(state) => {
                let transition = self.cache.lock().record_success(state.on, Operation::Get);
                if let Some(transition) = transition {
                    tracing::info!(
                        accessory = %self.name,
                        "{} state changed to: {}",
                        self.kind.noun(),
                        self.get_field.label(state.on)
                    );
                    self.callbacks.dispatch_state_changed(&transition);
                }
                tracing::debug!(accessory = %self.name, value = state.on, "Get characteristic On");
                Reading::Fresh(state.on)
            }
            Err(failure) => self.record_failure(failure),
        }
    }

    async fn call<F>(&self, operation: Operation, request: F) -> Result<DeviceState, FailureRecord>
    where
        F: Future<Output = Result<DeviceState, DeviceError>>,
    {
        tokio::select! {
            biased;
            () = self.shutdown.cancelled() => Err(FailureRecord::new(
                operation,
                FailureKind::Cancelled,
                "aborted by shutdown",
            )),
            result = request => {
                result.map_err(|e| FailureRecord::new(operation, e.kind(), e.to_string()))
            }
        }
    }

    fn record_failure(&self, failure: FailureRecord) -> Reading {
        let action = match failure.operation {
            Operation::Set => "setting",
            Operation::Get => "getting",
        };
        if failure.kind == FailureKind::Cancelled {
            tracing::warn!(
                accessory = %self.name,
                "Stopped {action} {} state: {}",
                self.kind.noun(),
                failure.message
            );
        } else {
            tracing::error!(
                accessory = %self.name,
                kind = %failure.kind,
                "Error {action} {} state: {}",
                self.kind.noun(),
                failure.message
            );
        }

        let reading = {
            let mut cache = self.cache.lock();
            cache.record_failure(failure.clone());
            cache.fallback(self.policy.max_stale_age())
        };
        self.callbacks.dispatch_sync_error(&failure);
        reading
    }
}

impl<C> std::fmt::Debug for StateSyncAdapter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateSyncAdapter")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("policy", &self.policy)
            .field("cache", &*self.cache.lock())
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

/// Clears the in-flight read slot when the leading read ends, including
/// when its future is dropped mid-flight.
struct InflightGuard<'a> {
    slot: &'a InflightSlot,
}

impl InflightGuard<'_> {
    fn publish(self, reading: Reading) {
        if let Some(sender) = self.slot.lock().take() {
            // No followers is fine
            let _ = sender.send(reading);
        }
    }
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        self.slot.lock().take();
    }
}
