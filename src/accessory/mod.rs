// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binding between a [`StateSyncAdapter`] and the home-automation platform.
//!
//! The platform side is reduced to one narrow contract,
//! [`CharacteristicRegistry`]: it receives the accessory information and a
//! pair of handlers for the On characteristic. How the platform stores them
//! is its own business.
//!
//! ```no_run
//! use accessory_sync::accessory::{
//!     Accessory, AccessoryConfig, AccessoryInfo, CharacteristicRegistry, GetHandler, SetHandler,
//! };
//!
//! struct Platform {
//!     handlers: Vec<(String, SetHandler, GetHandler)>,
//! }
//!
//! impl CharacteristicRegistry for Platform {
//!     fn register_on_characteristic(
//!         &mut self,
//!         info: &AccessoryInfo,
//!         on_set: SetHandler,
//!         on_get: GetHandler,
//!     ) {
//!         self.handlers.push((info.name.clone(), on_set, on_get));
//!     }
//! }
//!
//! # fn example() -> accessory_sync::Result<()> {
//! let config = AccessoryConfig::from_json(
//!     r#"{"name": "Desk Lamp", "apiBaseUrl": "http://192.168.7.166:8080"}"#,
//! )?;
//! let accessory = Accessory::from_config(&config)?;
//!
//! let mut platform = Platform { handlers: Vec::new() };
//! accessory.register(&mut platform);
//! # Ok(())
//! # }
//! ```

mod config;

pub use config::AccessoryConfig;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapter::StateSyncAdapter;
use crate::protocol::DeviceClient;
use crate::state::Reading;
use crate::types::AccessoryKind;

/// A boxed, sendable future as handed to the platform.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Handler for platform writes of the On characteristic.
pub type SetHandler = Arc<dyn Fn(bool) -> BoxFuture<()> + Send + Sync>;

/// Handler for platform reads of the On characteristic.
pub type GetHandler = Arc<dyn Fn() -> BoxFuture<Reading> + Send + Sync>;

/// Accessory information service values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryInfo {
    /// Display name.
    pub name: String,
    /// Manufacturer.
    pub manufacturer: String,
    /// Model.
    pub model: String,
    /// Serial number.
    pub serial_number: String,
    /// Service type.
    pub kind: AccessoryKind,
}

/// The platform's characteristic registration mechanism.
pub trait CharacteristicRegistry {
    /// Registers the handlers of an accessory's On characteristic.
    fn register_on_characteristic(
        &mut self,
        info: &AccessoryInfo,
        on_set: SetHandler,
        on_get: GetHandler,
    );
}

/// An accessory: its information record plus the adapter serving it.
#[derive(Debug)]
pub struct Accessory<C> {
    info: AccessoryInfo,
    adapter: Arc<StateSyncAdapter<C>>,
}

impl<C: DeviceClient + 'static> Accessory<C> {
    /// Creates an accessory from an adapter.
    #[must_use]
    pub fn new(info: AccessoryInfo, adapter: StateSyncAdapter<C>) -> Self {
        Self {
            info,
            adapter: Arc::new(adapter),
        }
    }

    /// Returns the accessory information.
    #[must_use]
    pub fn info(&self) -> &AccessoryInfo {
        &self.info
    }

    /// Returns the adapter.
    #[must_use]
    pub fn adapter(&self) -> &Arc<StateSyncAdapter<C>> {
        &self.adapter
    }

    /// Returns the write handler.
    #[must_use]
    pub fn set_handler(&self) -> SetHandler {
        let adapter = Arc::clone(&self.adapter);
        Arc::new(move |value: bool| -> BoxFuture<()> {
            let adapter = Arc::clone(&adapter);
            Box::pin(async move { adapter.handle_set(value).await })
        })
    }

    /// Returns the read handler.
    #[must_use]
    pub fn get_handler(&self) -> GetHandler {
        let adapter = Arc::clone(&self.adapter);
        Arc::new(move || -> BoxFuture<Reading> {
            let adapter = Arc::clone(&adapter);
            Box::pin(async move { adapter.handle_get().await })
        })
    }

    /// Registers both handlers with the platform.
    pub fn register<R: CharacteristicRegistry + ?Sized>(&self, registry: &mut R) {
        tracing::debug!(accessory = %self.info.name, kind = %self.info.kind, "Registering On characteristic");
        registry.register_on_characteristic(&self.info, self.set_handler(), self.get_handler());
    }
}

#[cfg(feature = "http")]
impl Accessory<crate::protocol::HttpDeviceClient> {
    /// Builds an HTTP-backed accessory from its configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn from_config(config: &AccessoryConfig) -> crate::Result<Self> {
        config.validate()?;

        let endpoints = config.endpoint_config();
        let set_field = endpoints.set_endpoint().field();
        let get_field = endpoints.get_endpoint().field();

        tracing::info!(
            accessory = %config.name,
            kind = %config.kind,
            url = %endpoints.base_url(),
            "Configured accessory"
        );

        let client = endpoints.into_client()?;
        let adapter = StateSyncAdapter::new(config.name.clone(), client)
            .with_kind(config.kind)
            .with_fields(set_field, get_field)
            .with_policy(config.sync_policy());

        Ok(Self::new(config.accessory_info(), adapter))
    }
}
