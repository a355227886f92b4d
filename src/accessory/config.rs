// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory configuration as supplied by the platform.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::adapter::SyncPolicy;
use crate::error::ConfigError;
use crate::protocol::DeviceEndpointConfig;
use crate::types::{AccessoryKind, StateField};

use super::AccessoryInfo;

/// The accessory's JSON configuration block.
///
/// Keys are camelCase as in the platform's config file; unknown keys (such
/// as the platform's own `accessory` identifier) are ignored.
///
/// # Examples
///
/// ```
/// use accessory_sync::accessory::AccessoryConfig;
///
/// let config = AccessoryConfig::from_json(r#"{
///     "accessory": "MicroPythonLED",
///     "name": "Desk Lamp",
///     "apiBaseUrl": "http://192.168.7.166:8080"
/// }"#).unwrap();
///
/// let endpoints = config.endpoint_config();
/// assert_eq!(endpoints.url_for(endpoints.set_endpoint()), "http://192.168.7.166:8080/led");
/// assert_eq!(config.accessory_info().model, "MicroPython LED");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryConfig {
    /// Display name shown by the platform.
    pub name: String,
    /// Device base URL, e.g. `http://192.168.7.166:8080`.
    pub api_base_url: String,
    /// Service type exposed to the platform.
    #[serde(default)]
    pub kind: AccessoryKind,
    /// Overrides the write endpoint path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_path: Option<String>,
    /// Overrides the read endpoint path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_path: Option<String>,
    /// Overrides the field the read endpoint reports in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_field: Option<StateField>,
    /// Per-request timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Whether concurrent reads share one device request.
    #[serde(default = "default_true")]
    pub coalesce_reads: bool,
    /// Seconds after which a stale fallback value is reported as unavailable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_stale_secs: Option<u64>,
    /// Accessory information: manufacturer.
    #[serde(default = "default_manufacturer")]
    pub manufacturer: String,
    /// Accessory information: model.
    #[serde(default = "default_model")]
    pub model: String,
    /// Accessory information: serial number.
    #[serde(default = "default_serial_number")]
    pub serial_number: String,
}

fn default_true() -> bool {
    true
}

fn default_manufacturer() -> String {
    "Custom".to_string()
}

fn default_model() -> String {
    "MicroPython LED".to_string()
}

fn default_serial_number() -> String {
    "001".to_string()
}

impl AccessoryConfig {
    /// Creates a configuration with default endpoints for `kind`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        api_base_url: impl Into<String>,
        kind: AccessoryKind,
    ) -> Self {
        Self {
            name: name.into(),
            api_base_url: api_base_url.into(),
            kind,
            set_path: None,
            get_path: None,
            get_field: None,
            timeout_ms: None,
            coalesce_reads: true,
            max_stale_secs: None,
            manufacturer: default_manufacturer(),
            model: default_model(),
            serial_number: default_serial_number(),
        }
    }

    /// Parses and validates a JSON configuration block.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` for malformed JSON or missing required
    /// keys, and the errors of [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks required values, the base URL and endpoint paths.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingValue` for an empty name or base URL,
    /// otherwise the errors of [`DeviceEndpointConfig::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingValue("name"));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("apiBaseUrl"));
        }
        self.endpoint_config().validate()
    }

    /// Builds the device endpoint configuration.
    ///
    /// Lightbulbs default to `/led` for both operations; contact sensors
    /// default to writing `/api` and reading `is_open` from `/is_open`.
    #[must_use]
    pub fn endpoint_config(&self) -> DeviceEndpointConfig {
        let base_url = self.api_base_url.trim();
        let mut config = match self.kind {
            AccessoryKind::Lightbulb => DeviceEndpointConfig::led(base_url),
            AccessoryKind::ContactSensor => DeviceEndpointConfig::door_sensor(base_url),
        };

        if let Some(path) = &self.set_path {
            config = config.with_set_endpoint(path.clone(), StateField::On);
        }

        let get_path = self
            .get_path
            .clone()
            .unwrap_or_else(|| config.get_endpoint().path().to_string());
        let get_field = self.get_field.unwrap_or(self.kind.default_get_field());
        config = config.with_get_endpoint(get_path, get_field);

        if let Some(ms) = self.timeout_ms {
            config = config.with_timeout(Duration::from_millis(ms));
        }
        config
    }

    /// Builds the adapter's caching policy.
    #[must_use]
    pub fn sync_policy(&self) -> SyncPolicy {
        let policy = SyncPolicy::new().with_coalesced_reads(self.coalesce_reads);
        match self.max_stale_secs {
            Some(secs) => policy.with_max_stale_age(Duration::from_secs(secs)),
            None => policy,
        }
    }

    /// Builds the accessory information record.
    #[must_use]
    pub fn accessory_info(&self) -> AccessoryInfo {
        AccessoryInfo {
            name: self.name.clone(),
            manufacturer: self.manufacturer.clone(),
            model: self.model.clone(),
            serial_number: self.serial_number.clone(),
            kind: self.kind,
        }
    }
}
