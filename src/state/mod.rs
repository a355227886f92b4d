// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state and cache tracking types.
//!
//! [`DeviceState`] is what a single device round trip observed.
//! [`CachedState`] is the adapter's last-known copy of it, with freshness
//! and failure metadata. [`StateTransition`] describes a change of the
//! cached value and [`Reading`] is what the platform gets back from a read.
//!
//! # Examples
//!
//! ```
//! use accessory_sync::state::{CachedState, Freshness, Operation, Reading};
//!
//! let mut cache = CachedState::new();
//! assert_eq!(cache.freshness(), Freshness::Unknown);
//! assert_eq!(cache.fallback(None), Reading::Unavailable);
//!
//! let transition = cache.record_success(true, Operation::Get);
//! assert!(transition.is_some());
//! assert_eq!(cache.value(), Some(true));
//!
//! // Same value again is not a transition
//! assert!(cache.record_success(true, Operation::Get).is_none());
//! ```

mod cached_state;
mod device_state;
mod transition;

pub use cached_state::{CachedState, FailureKind, FailureRecord, Freshness, Reading};
pub use device_state::DeviceState;
pub use transition::{Operation, StateTransition};
