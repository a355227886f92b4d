// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device protocol: the client seam and its HTTP implementation.
//!
//! - [`DeviceClient`]: one network attempt per call, no retry
//! - [`DeviceEndpointConfig`]: base URL, per-operation endpoints, timeout
//! - [`HttpDeviceClient`]: `reqwest` implementation (feature `http`)
//!
//! The [`StateSyncAdapter`](crate::StateSyncAdapter) is generic over
//! [`DeviceClient`] so tests can substitute a double for the HTTP client.

mod config;
#[cfg(feature = "http")]
mod http;

use std::future::Future;

pub use config::{DeviceEndpointConfig, Endpoint};
#[cfg(feature = "http")]
pub use http::HttpDeviceClient;

use crate::error::DeviceError;
use crate::state::DeviceState;

/// Outbound calls to the remote device.
///
/// Implementations perform exactly one attempt per call and report the
/// outcome; retry and caching decisions belong to the adapter.
pub trait DeviceClient: Send + Sync {
    /// Asks the device to switch to `desired` and returns the state it
    /// reports back.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::HttpStatus` for non-2xx responses,
    /// `DeviceError::Transport` for connection failures and timeouts, and
    /// `DeviceError::Decode` for bodies without a boolean state field.
    fn set_state(
        &self,
        desired: bool,
    ) -> impl Future<Output = Result<DeviceState, DeviceError>> + Send;

    /// Queries the device for its current state.
    ///
    /// # Errors
    ///
    /// Same contract as [`set_state`](Self::set_state).
    fn get_state(&self) -> impl Future<Output = Result<DeviceState, DeviceError>> + Send;
}
