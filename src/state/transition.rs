// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cached value transitions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The platform operation that triggered a device call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// A platform write (`handle_set`).
    Set,
    /// A platform read (`handle_get`).
    Get,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set => f.write_str("set"),
            Self::Get => f.write_str("get"),
        }
    }
}

/// A change of the cached value.
///
/// Emitted only when a successful device call observes a value different
/// from the previously cached one. `previous` is `None` for the first
/// observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    /// The cached value before the call.
    pub previous: Option<bool>,
    /// The value the device reported.
    pub current: bool,
    /// Which operation observed the new value.
    pub source: Operation,
    /// When the new value was observed.
    pub at: DateTime<Utc>,
}

impl StateTransition {
    /// Returns `true` if this is the first value ever observed.
    #[must_use]
    pub fn is_initial(&self) -> bool {
        self.previous.is_none()
    }
}
