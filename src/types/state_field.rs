// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON field carrying the binary state in device responses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// The response field an endpoint reports its state in.
///
/// Light endpoints answer `{"on": bool}`, door/contact endpoints answer
/// `{"is_open": bool}`.
///
/// # Examples
///
/// ```
/// use accessory_sync::types::StateField;
///
/// assert_eq!(StateField::On.key(), "on");
/// assert_eq!(StateField::IsOpen.label(true), "OPEN");
/// assert_eq!("is_open".parse::<StateField>().unwrap(), StateField::IsOpen);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateField {
    /// `{"on": bool}`
    #[default]
    On,
    /// `{"is_open": bool}`
    IsOpen,
}

impl StateField {
    /// Returns the JSON key.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::IsOpen => "is_open",
        }
    }

    /// Returns the human-readable label for a value of this field.
    #[must_use]
    pub const fn label(&self, value: bool) -> &'static str {
        match (self, value) {
            (Self::On, true) => "ON",
            (Self::On, false) => "OFF",
            (Self::IsOpen, true) => "OPEN",
            (Self::IsOpen, false) => "CLOSED",
        }
    }
}

impl fmt::Display for StateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StateField {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(Self::On),
            "is_open" => Ok(Self::IsOpen),
            other => Err(ParseError::UnexpectedFormat(format!(
                "unknown state field '{other}'"
            ))),
        }
    }
}
