// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device command definitions.
//!
//! The device understands exactly two requests, both sent as HTTP POST:
//!
//! | Command | Endpoint | Body | Response |
//! |---------|----------|------|----------|
//! | [`StateCommand::Set`] | set endpoint (`/led`, `/api`) | `{"on": bool}` | `{"on": bool}` |
//! | [`StateCommand::Query`] | get endpoint (`/led`, `/is_open`) | none | `{"on": bool}` or `{"is_open": bool}` |
//!
//! # Examples
//!
//! ```
//! use accessory_sync::command::{SetStateBody, StateCommand};
//! use accessory_sync::protocol::DeviceEndpointConfig;
//!
//! let config = DeviceEndpointConfig::door_sensor("http://device.local:8080");
//!
//! let set = StateCommand::Set(true);
//! assert_eq!(set.endpoint(&config).path(), "/api");
//! assert_eq!(set.body(), Some(SetStateBody { on: true }));
//!
//! let query = StateCommand::Query;
//! assert_eq!(query.endpoint(&config).path(), "/is_open");
//! assert_eq!(query.body(), None);
//! ```

use serde::Serialize;

use crate::protocol::{DeviceEndpointConfig, Endpoint};

/// JSON body of a set request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetStateBody {
    /// The desired state.
    pub on: bool,
}

/// A request to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateCommand {
    /// Ask the device to switch to the given state.
    Set(bool),
    /// Ask the device for its current state.
    Query,
}

impl StateCommand {
    /// Returns the endpoint this command is sent to.
    #[must_use]
    pub fn endpoint<'a>(&self, config: &'a DeviceEndpointConfig) -> &'a Endpoint {
        match self {
            Self::Set(_) => config.set_endpoint(),
            Self::Query => config.get_endpoint(),
        }
    }

    /// Returns the JSON body, if the command carries one.
    #[must_use]
    pub fn body(&self) -> Option<SetStateBody> {
        match self {
            Self::Set(on) => Some(SetStateBody { on: *on }),
            Self::Query => None,
        }
    }

    /// Returns a short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Set(_) => "set",
            Self::Query => "query",
        }
    }
}
