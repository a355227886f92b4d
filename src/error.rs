// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `accessory_sync` library.
//!
//! Device-facing failures are split into three recoverable kinds:
//! transport problems, HTTP status rejections and undecodable bodies.
//! None of them is fatal to a [`StateSyncAdapter`](crate::StateSyncAdapter);
//! the adapter degrades to its cached value and keeps going.

use thiserror::Error;

use crate::state::FailureKind;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A device call failed.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// The accessory configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors returned by a single device round trip.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Connection refused, DNS failure, timeout or a broken body stream.
    #[error("transport error: {0}")]
    Transport(String),

    /// The device answered with a non-2xx status code.
    #[error("device responded with HTTP {0}")]
    HttpStatus(u16),

    /// The response body could not be decoded into a device state.
    #[error("decode error: {0}")]
    Decode(#[from] ParseError),
}

impl DeviceError {
    /// Returns the coarse classification of this error.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) => FailureKind::Transport,
            Self::HttpStatus(code) => FailureKind::HttpStatus(*code),
            Self::Decode(_) => FailureKind::Decode,
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for DeviceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::Transport(format!("connection failed: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Errors related to parsing device responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Errors raised while validating accessory configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration block is not valid JSON for this accessory.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required value is empty.
    #[error("missing configuration value: {0}")]
    MissingValue(&'static str),

    /// The device base URL is not an `http://` or `https://` URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// An endpoint path does not start with `/`.
    #[error("invalid endpoint path: {0}")]
    InvalidPath(String),

    /// The HTTP client could not be created.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
