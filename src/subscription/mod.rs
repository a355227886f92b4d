// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for cached state changes.
//!
//! The platform uses these hooks to push characteristic updates only when
//! the cached value actually changes, and to surface device failures.
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`CallbackRegistry`] - Registry that stores callbacks and dispatches events
//!
//! # Usage
//!
//! ```
//! use accessory_sync::subscription::CallbackRegistry;
//!
//! let registry = CallbackRegistry::new();
//! let id = registry.on_state_changed(|transition| {
//!     println!("now {}", transition.current);
//! });
//! assert!(registry.unsubscribe(id));
//! ```

mod callback;

pub use callback::{CallbackRegistry, SubscriptionId};
