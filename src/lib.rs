// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `accessory_sync` - keep a home-automation accessory in step with a small
//! HTTP-controlled device.
//!
//! The device (typically a microcontroller running a tiny web server)
//! exposes two JSON endpoints: one that switches it and one that reports its
//! state. The platform expects a characteristic it can read and write at any
//! time. This crate sits in between.
//!
//! # Components
//!
//! - [`protocol::DeviceClient`]: one HTTP round trip per call, typed errors
//! - [`StateSyncAdapter`]: cached last-known state, change detection,
//!   failure isolation and read coalescing
//! - [`accessory::Accessory`]: registers the adapter's handlers with the
//!   platform through [`accessory::CharacteristicRegistry`]
//!
//! # Failure behaviour
//!
//! Device failures never reach the platform as errors. A failed write is
//! logged; a failed read returns the last known value, or
//! [`Reading::Unavailable`] if the device has never answered.
//!
//! # Quick Start
//!
//! ```no_run
//! use accessory_sync::{DeviceEndpointConfig, Reading, StateSyncAdapter};
//!
//! #[tokio::main]
//! async fn main() -> accessory_sync::Result<()> {
//!     let client = DeviceEndpointConfig::led("http://device.local:8080").into_client()?;
//!     let adapter = StateSyncAdapter::new("Desk Lamp", client);
//!
//!     adapter.handle_set(true).await;
//!
//!     match adapter.handle_get().await {
//!         Reading::Fresh(on) => println!("lamp reports {on}"),
//!         Reading::Stale(on) => println!("device unreachable, last seen {on}"),
//!         Reading::Unavailable => println!("device has never answered"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! The crate logs through [`tracing`]; install any subscriber to collect the
//! output. State changes and confirmed writes are logged at `info`, device
//! failures at `error`, request and response bodies at `debug`.

pub mod accessory;
pub mod adapter;
pub mod command;
pub mod error;
pub mod protocol;
pub mod response;
pub mod state;
pub mod subscription;
pub mod types;

pub use accessory::{Accessory, AccessoryConfig, AccessoryInfo, CharacteristicRegistry};
pub use adapter::{StateSyncAdapter, SyncPolicy};
pub use error::{ConfigError, DeviceError, Error, ParseError, Result};
#[cfg(feature = "http")]
pub use protocol::HttpDeviceClient;
pub use protocol::{DeviceClient, DeviceEndpointConfig, Endpoint};
pub use state::{CachedState, DeviceState, FailureKind, FailureRecord, Freshness, Reading};
pub use subscription::{CallbackRegistry, SubscriptionId};
pub use types::{AccessoryKind, StateField};
