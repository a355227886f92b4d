// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP implementation of the device client.

use reqwest::Client;

use crate::command::StateCommand;
use crate::error::{ConfigError, DeviceError};
use crate::protocol::{DeviceClient, DeviceEndpointConfig};
use crate::response::parse_state;
use crate::state::DeviceState;

/// HTTP client for the device's JSON API.
///
/// Every call is a single `POST`; the configured timeout bounds the whole
/// request including reading the body.
///
/// # Examples
///
/// ```no_run
/// use accessory_sync::protocol::{DeviceClient, DeviceEndpointConfig, HttpDeviceClient};
///
/// # async fn example() -> accessory_sync::Result<()> {
/// let client = HttpDeviceClient::new(DeviceEndpointConfig::led("http://device.local:8080"))?;
/// let state = client.set_state(true).await?;
/// println!("LED is {}", if state.on { "on" } else { "off" });
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpDeviceClient {
    config: DeviceEndpointConfig,
    client: Client,
}

impl HttpDeviceClient {
    /// Creates a client for the configured device.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration does not validate or the
    /// underlying HTTP client cannot be created.
    pub fn new(config: DeviceEndpointConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Returns the endpoint configuration.
    #[must_use]
    pub fn config(&self) -> &DeviceEndpointConfig {
        &self.config
    }

    async fn send(&self, command: StateCommand) -> Result<DeviceState, DeviceError> {
        let endpoint = command.endpoint(&self.config);
        let url = self.config.url_for(endpoint);

        tracing::debug!(url = %url, command = command.name(), "Sending device request");

        let request = self.client.post(&url);
        let request = match command.body() {
            Some(body) => request.json(&body),
            None => request,
        };

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(
                url = %url,
                status = status.as_u16(),
                reason = status.canonical_reason().unwrap_or("Unknown"),
                "Device rejected request"
            );
            return Err(DeviceError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;

        tracing::debug!(body = %body, "Received device response");

        Ok(parse_state(&body, endpoint.field())?)
    }
}

impl DeviceClient for HttpDeviceClient {
    async fn set_state(&self, desired: bool) -> Result<DeviceState, DeviceError> {
        self.send(StateCommand::Set(desired)).await
    }

    async fn get_state(&self) -> Result<DeviceState, DeviceError> {
        self.send(StateCommand::Query).await
    }
}
