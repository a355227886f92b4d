// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kind of accessory exposed to the platform.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::StateField;

/// The platform service an accessory is exposed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessoryKind {
    /// A lightbulb with an On characteristic.
    #[default]
    Lightbulb,
    /// A door/contact sensor reporting open or closed.
    ContactSensor,
}

impl AccessoryKind {
    /// Noun used in log lines ("Set LED state to: ON").
    ///
    /// Contact sensors log "contact state changed to: OPEN", not
    /// "LED state changed to: OPEN"; log filters written for the LED wording
    /// need to match both.
    #[must_use]
    pub const fn noun(&self) -> &'static str {
        match self {
            Self::Lightbulb => "LED",
            Self::ContactSensor => "contact",
        }
    }

    /// The field read endpoints of this kind report in when not configured.
    #[must_use]
    pub const fn default_get_field(&self) -> StateField {
        match self {
            Self::Lightbulb => StateField::On,
            Self::ContactSensor => StateField::IsOpen,
        }
    }
}

impl fmt::Display for AccessoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lightbulb => f.write_str("lightbulb"),
            Self::ContactSensor => f.write_str("contact sensor"),
        }
    }
}
