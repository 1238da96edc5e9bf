/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]

pub mod bits;
pub mod codes;
pub mod container;
pub mod error;
pub mod graph;
pub mod number;
pub mod schema;
mod util;
pub mod value;

/// Prelude module to import everything from this crate.
pub mod prelude {
    pub use crate::bits::*;
    pub use crate::codes::*;
    pub use crate::container::{decode, encode};
    pub use crate::error::{Error, Result};
    pub use crate::schema::{Schema, NULL};
    pub use crate::value::{AstNode, Value};
}
