// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device endpoint configuration.

use std::time::Duration;

use crate::error::ConfigError;
use crate::types::StateField;

/// A device endpoint: a path below the base URL and the response field
/// that carries the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    path: String,
    field: StateField,
}

impl Endpoint {
    /// Creates an endpoint.
    #[must_use]
    pub fn new(path: impl Into<String>, field: StateField) -> Self {
        Self {
            path: path.into(),
            field,
        }
    }

    /// Returns the path, e.g. `/led`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the response field read from this endpoint.
    #[must_use]
    pub fn field(&self) -> StateField {
        self.field
    }
}

/// Where and how to reach the device.
///
/// Set and get targets are configured independently: a single accessory may
/// write an LED through `/api` while reading a door contact from `/is_open`.
///
/// # Examples
///
/// ```
/// use accessory_sync::protocol::DeviceEndpointConfig;
/// use accessory_sync::types::StateField;
/// use std::time::Duration;
///
/// let config = DeviceEndpointConfig::new("http://device.local:8080/")
///     .with_set_endpoint("/api", StateField::On)
///     .with_get_endpoint("/is_open", StateField::IsOpen)
///     .with_timeout(Duration::from_secs(2));
///
/// assert_eq!(config.base_url(), "http://device.local:8080");
/// assert_eq!(
///     config.url_for(config.get_endpoint()),
///     "http://device.local:8080/is_open"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEndpointConfig {
    base_url: String,
    set: Endpoint,
    get: Endpoint,
    timeout: Duration,
}

impl DeviceEndpointConfig {
    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
    /// Default path of the LED endpoint.
    pub const LED_PATH: &'static str = "/led";

    /// Creates a configuration with both operations on the LED endpoint.
    ///
    /// A trailing `/` on the base URL is dropped.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            set: Endpoint::new(Self::LED_PATH, StateField::On),
            get: Endpoint::new(Self::LED_PATH, StateField::On),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// LED device: `POST /led` for both writes and reads.
    #[must_use]
    pub fn led(base_url: impl Into<String>) -> Self {
        Self::new(base_url)
    }

    /// Door controller: writes go to `/api`, reads come from `/is_open`.
    #[must_use]
    pub fn door_sensor(base_url: impl Into<String>) -> Self {
        Self::new(base_url)
            .with_set_endpoint("/api", StateField::On)
            .with_get_endpoint("/is_open", StateField::IsOpen)
    }

    /// Sets the endpoint used by `set_state`.
    #[must_use]
    pub fn with_set_endpoint(mut self, path: impl Into<String>, field: StateField) -> Self {
        self.set = Endpoint::new(path, field);
        self
    }

    /// Sets the endpoint used by `get_state`.
    #[must_use]
    pub fn with_get_endpoint(mut self, path: impl Into<String>, field: StateField) -> Self {
        self.get = Endpoint::new(path, field);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the endpoint used for writes.
    #[must_use]
    pub fn set_endpoint(&self) -> &Endpoint {
        &self.set
    }

    /// Returns the endpoint used for reads.
    #[must_use]
    pub fn get_endpoint(&self) -> &Endpoint {
        &self.get
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the full URL of an endpoint.
    #[must_use]
    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Checks the base URL scheme and endpoint paths.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the base URL is not
    /// `http://` or `https://` with a host, and `ConfigError::InvalidPath`
    /// if an endpoint path does not start with `/`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let host = self
            .base_url
            .strip_prefix("http://")
            .or_else(|| self.base_url.strip_prefix("https://"));
        if host.is_none_or(str::is_empty) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }

        for endpoint in [&self.set, &self.get] {
            if !endpoint.path.starts_with('/') {
                return Err(ConfigError::InvalidPath(endpoint.path.clone()));
            }
        }
        Ok(())
    }

    /// Creates an `HttpDeviceClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be created.
    #[cfg(feature = "http")]
    pub fn into_client(self) -> Result<super::HttpDeviceClient, ConfigError> {
        super::HttpDeviceClient::new(self)
    }
}
