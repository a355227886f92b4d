// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the client, adapter and accessory layers.
//!
//! - [`StateField`] - Which JSON key (`on` / `is_open`) carries the state
//! - [`AccessoryKind`] - Lightbulb or contact sensor

mod accessory_kind;
mod state_field;

pub use accessory_kind::AccessoryKind;
pub use state_field::StateField;
