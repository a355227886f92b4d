// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response parsing for device JSON bodies.

use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::state::DeviceState;
use crate::types::StateField;

/// Body returned by the device's set and get endpoints.
///
/// The device answers `{"on": bool}` from light endpoints and
/// `{"is_open": bool}` from the door endpoint. Only the endpoint's own key
/// is inspected; anything else in the object is ignored.
///
/// # Examples
///
/// ```
/// use accessory_sync::response::StateResponse;
/// use accessory_sync::types::StateField;
///
/// let response = StateResponse::parse(r#"{"is_open": true}"#).unwrap();
/// assert!(response.state(StateField::IsOpen).unwrap().on);
/// assert!(response.state(StateField::On).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct StateResponse {
    fields: Map<String, Value>,
}

impl StateResponse {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if the body is not JSON, and
    /// `ParseError::UnexpectedFormat` for an empty body or a JSON value that
    /// is not an object.
    pub fn parse(body: &str) -> Result<Self, ParseError> {
        if body.trim().is_empty() {
            return Err(ParseError::UnexpectedFormat("empty body".to_string()));
        }
        match serde_json::from_str(body)? {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ParseError::UnexpectedFormat(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// Extracts the device state from the given field.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` if the field is absent or `null`,
    /// and `ParseError::UnexpectedFormat` if it is not a boolean.
    pub fn state(&self, field: StateField) -> Result<DeviceState, ParseError> {
        match self.fields.get(field.key()) {
            None | Some(Value::Null) => Err(ParseError::MissingField(field.key().to_string())),
            Some(Value::Bool(on)) => Ok(DeviceState::new(*on)),
            Some(other) => Err(ParseError::UnexpectedFormat(format!(
                "'{}' is not a boolean: {other}",
                field.key()
            ))),
        }
    }
}

/// Parses a body and extracts the state from `field` in one step.
///
/// # Errors
///
/// Returns `ParseError` if the body cannot be decoded or lacks the field.
pub fn parse_state(body: &str, field: StateField) -> Result<DeviceState, ParseError> {
    StateResponse::parse(body)?.state(field)
}
