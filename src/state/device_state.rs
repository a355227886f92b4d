// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observed device state.

use serde::{Deserialize, Serialize};

/// The binary condition reported by the device in one response.
///
/// For contact-sensor endpoints `on` carries the `is_open` value.
///
/// # Examples
///
/// ```
/// use accessory_sync::state::DeviceState;
///
/// let state = DeviceState::new(true);
/// assert!(state.is_on());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DeviceState {
    /// Whether the device reports the "on" (or "open") condition.
    pub on: bool,
}

impl DeviceState {
    /// Creates a device state.
    #[must_use]
    pub const fn new(on: bool) -> Self {
        Self { on }
    }

    /// Returns the reported value.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.on
    }
}

impl From<bool> for DeviceState {
    fn from(on: bool) -> Self {
        Self { on }
    }
}
