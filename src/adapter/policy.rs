// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Caching policy for the state sync adapter.

use std::time::Duration;

/// How the adapter trades freshness against device load.
///
/// Every platform call costs at most one device request; there is no
/// background polling and no automatic retry. The policy only decides how
/// concurrent reads are merged and how old a fallback value may be.
///
/// # Examples
///
/// ```
/// use accessory_sync::adapter::SyncPolicy;
/// use std::time::Duration;
///
/// let policy = SyncPolicy::default();
/// assert!(policy.coalesce_reads());
/// assert_eq!(policy.max_stale_age(), None);
///
/// let strict = SyncPolicy::new()
///     .with_coalesced_reads(false)
///     .with_max_stale_age(Duration::from_secs(300));
/// assert_eq!(strict.max_stale_age(), Some(Duration::from_secs(300)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    coalesce_reads: bool,
    max_stale_age: Option<Duration>,
}

impl SyncPolicy {
    /// Creates the default policy: coalesced reads, stale values never expire.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            coalesce_reads: true,
            max_stale_age: None,
        }
    }

    /// Enables or disables read coalescing.
    ///
    /// When enabled, a read issued while another read is in flight waits for
    /// that read's result instead of sending its own request.
    #[must_use]
    pub const fn with_coalesced_reads(mut self, enabled: bool) -> Self {
        self.coalesce_reads = enabled;
        self
    }

    /// Limits how old the fallback value of a failed read may be.
    ///
    /// Past this age a failed read reports `Reading::Unavailable`.
    #[must_use]
    pub const fn with_max_stale_age(mut self, max_age: Duration) -> Self {
        self.max_stale_age = Some(max_age);
        self
    }

    /// Returns whether concurrent reads are coalesced.
    #[must_use]
    pub const fn coalesce_reads(&self) -> bool {
        self.coalesce_reads
    }

    /// Returns the maximum fallback age, if limited.
    #[must_use]
    pub const fn max_stale_age(&self) -> Option<Duration> {
        self.max_stale_age
    }
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self::new()
    }
}
