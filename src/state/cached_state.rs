// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last-known device state with freshness tracking.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::{Operation, StateTransition};

/// Freshness of the cached value.
///
/// ```text
/// Unknown --success--> Fresh --failed read--> StaleOnError --success--> Fresh
/// ```
///
/// A failed read while `Unknown` stays `Unknown`. Failed writes never change
/// freshness: a write that did not take effect says nothing about whether the
/// last observed value is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Freshness {
    /// No device call has succeeded yet.
    #[default]
    Unknown,
    /// The last device call succeeded.
    Fresh,
    /// A read failed after the value was last observed.
    StaleOnError,
}

/// Coarse classification of a failed device call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// Connection, DNS or timeout failure.
    Transport,
    /// The device answered with a non-2xx status.
    HttpStatus(u16),
    /// The response body could not be decoded.
    Decode,
    /// The call was aborted by shutdown.
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => f.write_str("transport"),
            Self::HttpStatus(code) => write!(f, "HTTP {code}"),
            Self::Decode => f.write_str("decode"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// A recorded device call failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// The operation that failed.
    pub operation: Operation,
    /// Classification of the failure.
    pub kind: FailureKind,
    /// Error message for diagnostics.
    pub message: String,
    /// When the failure was observed.
    pub at: DateTime<Utc>,
}

impl FailureRecord {
    /// Creates a failure record timestamped now.
    #[must_use]
    pub fn new(operation: Operation, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// The value handed back to the platform for a read.
///
/// `Unavailable` is distinct from `false`: the platform should show an
/// honest unknown instead of a wrong "off".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reading {
    /// The device just reported this value.
    Fresh(bool),
    /// The device could not be reached; this is the last known value.
    Stale(bool),
    /// No value has ever been observed.
    Unavailable,
}

impl Reading {
    /// Returns the value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<bool> {
        match self {
            Self::Fresh(v) | Self::Stale(v) => Some(*v),
            Self::Unavailable => None,
        }
    }

    /// Returns `true` if the value was observed by this read.
    #[must_use]
    pub const fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }

    /// Returns `true` unless this is [`Reading::Unavailable`].
    #[must_use]
    pub const fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

/// The adapter's cached copy of the device state.
///
/// `value` always holds the most recent successfully observed device value.
/// Failed calls only touch the failure metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedState {
    value: Option<bool>,
    freshness: Freshness,
    last_updated_at: Option<DateTime<Utc>>,
    last_success_at: Option<DateTime<Utc>>,
    last_error: Option<FailureRecord>,
    // Monotonic twin of `last_success_at`, used for stale-age checks
    #[serde(skip)]
    last_success_instant: Option<Instant>,
}

impl CachedState {
    /// Creates an empty cache in the `Unknown` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last successfully observed value.
    #[must_use]
    pub fn value(&self) -> Option<bool> {
        self.value
    }

    /// Returns the freshness of the cached value.
    #[must_use]
    pub fn freshness(&self) -> Freshness {
        self.freshness
    }

    /// Returns when any device call last completed.
    #[must_use]
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_updated_at
    }

    /// Returns when a device call last succeeded.
    #[must_use]
    pub fn last_success_at(&self) -> Option<DateTime<Utc>> {
        self.last_success_at
    }

    /// Returns the most recent failure, if any call has failed.
    ///
    /// Not cleared by later successes; compare timestamps or check
    /// [`freshness`](Self::freshness) to tell whether it still applies.
    #[must_use]
    pub fn last_error(&self) -> Option<&FailureRecord> {
        self.last_error.as_ref()
    }

    /// Records a value observed by a successful device call.
    ///
    /// Returns the transition if the value differs from the cached one.
    pub fn record_success(&mut self, value: bool, source: Operation) -> Option<StateTransition> {
        let now = Utc::now();
        let previous = self.value.replace(value);
        self.freshness = Freshness::Fresh;
        self.last_updated_at = Some(now);
        self.last_success_at = Some(now);
        self.last_success_instant = Some(Instant::now());

        (previous != Some(value)).then_some(StateTransition {
            previous,
            current: value,
            source,
            at: now,
        })
    }

    /// Records a failed device call.
    ///
    /// The cached value is left untouched.
    pub fn record_failure(&mut self, failure: FailureRecord) {
        if failure.operation == Operation::Get && self.value.is_some() {
            self.freshness = Freshness::StaleOnError;
        }
        self.last_updated_at = Some(failure.at);
        self.last_error = Some(failure);
    }

    /// Returns the reading to hand out when the device cannot answer.
    ///
    /// With `max_stale_age`, values observed longer ago than that are
    /// reported as [`Reading::Unavailable`].
    #[must_use]
    pub fn fallback(&self, max_stale_age: Option<Duration>) -> Reading {
        let Some(value) = self.value else {
            return Reading::Unavailable;
        };

        if let (Some(max_age), Some(at)) = (max_stale_age, self.last_success_instant) {
            if at.elapsed() > max_age {
                return Reading::Unavailable;
            }
        }

        match self.freshness {
            Freshness::Fresh => Reading::Fresh(value),
            Freshness::StaleOnError | Freshness::Unknown => Reading::Stale(value),
        }
    }
}
