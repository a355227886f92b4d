// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State sync adapter behaviour against a simulated device.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use accessory_sync::error::{DeviceError, ParseError};
use accessory_sync::state::Operation;
use accessory_sync::{
    DeviceClient, DeviceState, FailureKind, Freshness, Reading, StateSyncAdapter, SyncPolicy,
};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use common::CapturedLogs;

// ============================================================================
// Simulated device
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Failure {
    Transport,
    Status(u16),
    Decode,
}

impl Failure {
    const ALL: [Failure; 3] = [Failure::Transport, Failure::Status(500), Failure::Decode];

    fn to_error(self) -> DeviceError {
        match self {
            Failure::Transport => DeviceError::Transport("connection refused".into()),
            Failure::Status(code) => DeviceError::HttpStatus(code),
            Failure::Decode => ParseError::MissingField("on".into()).into(),
        }
    }

    fn kind(self) -> FailureKind {
        match self {
            Failure::Transport => FailureKind::Transport,
            Failure::Status(code) => FailureKind::HttpStatus(code),
            Failure::Decode => FailureKind::Decode,
        }
    }
}

/// A device that stores its state, optionally clamps writes, and can be
/// told to fail or to answer slowly.
#[derive(Default)]
struct FakeDevice {
    state: Mutex<bool>,
    clamp: Mutex<Option<bool>>,
    failure: Mutex<Option<Failure>>,
    latency: Mutex<Duration>,
    set_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl FakeDevice {
    fn with_state(on: bool) -> Self {
        let device = Self::default();
        *device.state.lock() = on;
        device
    }

    fn set_device_state(&self, on: bool) {
        *self.state.lock() = on;
    }

    fn fail_with(&self, failure: Failure) {
        *self.failure.lock() = Some(failure);
    }

    fn recover(&self) {
        *self.failure.lock() = None;
    }

    fn clamp_to(&self, value: bool) {
        *self.clamp.lock() = Some(value);
    }

    fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = latency;
    }

    async fn respond(&self, write: Option<bool>) -> Result<DeviceState, DeviceError> {
        let latency = *self.latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if let Some(failure) = *self.failure.lock() {
            return Err(failure.to_error());
        }
        let mut state = self.state.lock();
        if let Some(desired) = write {
            *state = self.clamp.lock().unwrap_or(desired);
        }
        Ok(DeviceState::new(*state))
    }
}

impl DeviceClient for FakeDevice {
    async fn set_state(&self, desired: bool) -> Result<DeviceState, DeviceError> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        self.respond(Some(desired)).await
    }

    async fn get_state(&self) -> Result<DeviceState, DeviceError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.respond(None).await
    }
}

fn adapter(device: FakeDevice) -> StateSyncAdapter<FakeDevice> {
    StateSyncAdapter::new("Test Lamp", device)
}

// ============================================================================
// Failure isolation
// ============================================================================

mod failures {
    use super::*;

    #[tokio::test]
    async fn failed_set_leaves_cached_value_untouched() {
        for failure in Failure::ALL {
            let adapter = adapter(FakeDevice::with_state(true));
            assert_eq!(adapter.handle_get().await, Reading::Fresh(true));

            adapter.client().fail_with(failure);
            let before = adapter.cached();
            adapter.handle_set(false).await;
            let after = adapter.cached();

            assert_eq!(after.value(), before.value(), "{failure:?}");
            assert_eq!(after.freshness(), before.freshness(), "{failure:?}");
            let error = after.last_error().unwrap();
            assert_eq!(error.operation, Operation::Set);
            assert_eq!(error.kind, failure.kind());
        }
    }

    #[tokio::test]
    async fn failed_get_returns_prior_value() {
        for failure in Failure::ALL {
            let adapter = adapter(FakeDevice::with_state(false));
            assert_eq!(adapter.handle_get().await, Reading::Fresh(false));

            adapter.client().fail_with(failure);
            assert_eq!(adapter.handle_get().await, Reading::Stale(false), "{failure:?}");
            assert_eq!(adapter.freshness(), Freshness::StaleOnError);
            assert_eq!(adapter.cached().value(), Some(false));
        }
    }

    #[tokio::test]
    async fn stale_value_survives_repeated_failures() {
        let adapter = adapter(FakeDevice::with_state(true));
        adapter.handle_get().await;

        adapter.client().fail_with(Failure::Transport);
        for _ in 0..3 {
            assert_eq!(adapter.handle_get().await, Reading::Stale(true));
        }
    }

    #[tokio::test]
    async fn recovery_returns_to_fresh() {
        let adapter = adapter(FakeDevice::with_state(true));
        adapter.handle_get().await;
        adapter.client().fail_with(Failure::Status(503));
        adapter.handle_get().await;
        assert_eq!(adapter.freshness(), Freshness::StaleOnError);

        adapter.client().recover();
        adapter.client().set_device_state(false);
        assert_eq!(adapter.handle_get().await, Reading::Fresh(false));
        assert_eq!(adapter.freshness(), Freshness::Fresh);
    }

    #[tokio::test]
    async fn first_failed_read_is_unavailable_not_false() {
        let device = FakeDevice::default();
        device.fail_with(Failure::Transport);
        let adapter = adapter(device);

        let reading = adapter.handle_get().await;
        assert_eq!(reading, Reading::Unavailable);
        assert_eq!(reading.value(), None);
        assert_eq!(adapter.freshness(), Freshness::Unknown);
    }

    #[tokio::test]
    async fn failed_set_before_first_success_stays_unknown() {
        let device = FakeDevice::default();
        device.fail_with(Failure::Decode);
        let adapter = adapter(device);

        adapter.handle_set(true).await;
        assert_eq!(adapter.cached().value(), None);
        assert_eq!(adapter.handle_get().await, Reading::Unavailable);
    }

    #[tokio::test]
    async fn sync_error_callbacks_receive_failures() {
        let adapter = adapter(FakeDevice::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        adapter.on_sync_error(move |failure| {
            seen_clone.lock().push((failure.operation, failure.kind));
        });

        adapter.client().fail_with(Failure::Status(404));
        adapter.handle_set(true).await;
        adapter.handle_get().await;

        assert_eq!(
            *seen.lock(),
            vec![
                (Operation::Set, FailureKind::HttpStatus(404)),
                (Operation::Get, FailureKind::HttpStatus(404)),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn max_stale_age_expires_fallback() {
        let adapter = adapter(FakeDevice::with_state(true))
            .with_policy(SyncPolicy::new().with_max_stale_age(Duration::from_secs(60)));
        adapter.handle_get().await;
        adapter.client().fail_with(Failure::Transport);

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(adapter.handle_get().await, Reading::Stale(true));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(adapter.handle_get().await, Reading::Unavailable);
        // The value itself is still cached
        assert_eq!(adapter.cached().value(), Some(true));
    }
}

// ============================================================================
// Writes
// ============================================================================

mod writes {
    use super::*;

    #[tokio::test]
    async fn set_caches_device_echo_not_request() {
        let device = FakeDevice::default();
        device.clamp_to(false);
        let adapter = adapter(device);

        adapter.handle_set(true).await;

        assert_eq!(adapter.cached().value(), Some(false));
        assert_eq!(adapter.freshness(), Freshness::Fresh);
    }

    #[tokio::test]
    async fn set_logs_confirmed_state() {
        let (logs, _guard) = CapturedLogs::install();
        let adapter = adapter(FakeDevice::default());

        adapter.handle_set(true).await;
        adapter.handle_set(false).await;

        assert_eq!(logs.count("Set LED state to: ON"), 1);
        assert_eq!(logs.count("Set LED state to: OFF"), 1);
    }

    #[tokio::test]
    async fn repeated_set_is_confirmed_every_time() {
        let (logs, _guard) = CapturedLogs::install();
        let adapter = adapter(FakeDevice::default());
        let changes = Arc::new(AtomicUsize::new(0));
        let changes_clone = changes.clone();
        adapter.on_state_changed(move |_| {
            changes_clone.fetch_add(1, Ordering::SeqCst);
        });

        adapter.handle_set(true).await;
        adapter.handle_set(true).await;

        assert_eq!(logs.count("Set LED state to: ON"), 2);
        assert_eq!(changes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn set_notifies_only_on_change() {
        let adapter = adapter(FakeDevice::default());
        let changes = Arc::new(AtomicUsize::new(0));
        let changes_clone = changes.clone();
        adapter.on_state_changed(move |_| {
            changes_clone.fetch_add(1, Ordering::SeqCst);
        });

        adapter.handle_set(true).await;
        adapter.handle_set(true).await;
        adapter.handle_set(false).await;

        assert_eq!(changes.load(Ordering::SeqCst), 2);
        assert_eq!(adapter.client().set_calls.load(Ordering::SeqCst), 3);
    }
}

// ============================================================================
// Reads and change detection
// ============================================================================

mod reads {
    use super::*;

    #[tokio::test]
    async fn change_is_logged_once_per_transition() {
        let (logs, _guard) = CapturedLogs::install();
        let adapter = adapter(FakeDevice::with_state(true));

        for _ in 0..3 {
            assert_eq!(adapter.handle_get().await, Reading::Fresh(true));
        }
        assert_eq!(logs.count("state changed to:"), 1);
        assert_eq!(logs.count("LED state changed to: ON"), 1);

        adapter.client().set_device_state(false);
        adapter.handle_get().await;
        adapter.handle_get().await;
        assert_eq!(logs.count("state changed to:"), 2);
        assert_eq!(logs.count("LED state changed to: OFF"), 1);
    }

    #[tokio::test]
    async fn transitions_carry_previous_value() {
        let adapter = adapter(FakeDevice::with_state(false));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        adapter.on_state_changed(move |t| seen_clone.lock().push((t.previous, t.current)));

        adapter.handle_get().await;
        adapter.client().set_device_state(true);
        adapter.handle_get().await;

        assert_eq!(*seen.lock(), vec![(None, false), (Some(false), true)]);
    }

    #[tokio::test]
    async fn unsubscribed_callback_is_not_called() {
        let adapter = adapter(FakeDevice::with_state(true));
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let id = adapter.on_state_changed(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(adapter.unsubscribe(id));
        adapter.handle_get().await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn every_sequential_read_queries_the_device() {
        let adapter = adapter(FakeDevice::with_state(true));
        adapter.handle_get().await;
        adapter.handle_get().await;
        assert_eq!(adapter.client().get_calls.load(Ordering::SeqCst), 2);
    }
}

// ============================================================================
// Concurrency and cancellation
// ============================================================================

mod concurrency {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn concurrent_reads_share_one_request() {
        let device = FakeDevice::with_state(true);
        device.set_latency(Duration::from_millis(200));
        let adapter = adapter(device);

        let (a, b, c) = tokio::join!(
            adapter.handle_get(),
            adapter.handle_get(),
            adapter.handle_get()
        );

        assert_eq!([a, b, c], [Reading::Fresh(true); 3]);
        assert_eq!(adapter.client().get_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn coalescing_can_be_disabled() {
        let device = FakeDevice::with_state(true);
        device.set_latency(Duration::from_millis(200));
        let adapter =
            adapter(device).with_policy(SyncPolicy::new().with_coalesced_reads(false));

        tokio::join!(adapter.handle_get(), adapter.handle_get());
        assert_eq!(adapter.client().get_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_set_and_get_keep_cache_consistent() {
        let device = FakeDevice::with_state(false);
        device.set_latency(Duration::from_millis(50));
        let adapter = adapter(device);

        tokio::join!(
            adapter.handle_set(true),
            adapter.handle_get(),
            adapter.handle_set(false),
            adapter.handle_get(),
        );

        let cached = adapter.cached();
        assert_eq!(cached.freshness(), Freshness::Fresh);
        assert!(cached.value().is_some());
        // The next read reconciles with the device
        let device_state = *adapter.client().state.lock();
        assert_eq!(adapter.handle_get().await, Reading::Fresh(device_state));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_read_does_not_block_later_reads() {
        let device = FakeDevice::with_state(true);
        device.set_latency(Duration::from_secs(60));
        let adapter = adapter(device);

        let timed_out = tokio::time::timeout(Duration::from_millis(10), adapter.handle_get()).await;
        assert!(timed_out.is_err());

        adapter.client().set_latency(Duration::ZERO);
        assert_eq!(adapter.handle_get().await, Reading::Fresh(true));
        assert_eq!(adapter.client().get_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_aborts_inflight_calls_promptly() {
        let device = FakeDevice::with_state(true);
        device.set_latency(Duration::from_secs(60));
        let adapter = adapter(device);
        let started = tokio::time::Instant::now();

        let (reading, ()) = tokio::join!(adapter.handle_get(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            adapter.shutdown();
        });

        assert_eq!(reading, Reading::Unavailable);
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(
            adapter.last_error().map(|e| e.kind),
            Some(FailureKind::Cancelled)
        );
    }

    #[tokio::test]
    async fn external_token_cancels_adapter() {
        let token = CancellationToken::new();
        let adapter = adapter(FakeDevice::with_state(true)).with_cancellation(token.clone());
        adapter.handle_get().await;

        token.cancel();
        assert!(adapter.is_shut_down());
        assert_eq!(adapter.handle_get().await, Reading::Stale(true));
        assert_eq!(adapter.client().get_calls.load(Ordering::SeqCst), 1);
    }
}
