/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The crate-wide error type.
//!
//! Every fallible operation in [`crate::bits`], [`crate::codes`],
//! [`crate::schema`], [`crate::graph`] and [`crate::container`] returns
//! [`Error`]. Misuse of an API's own parameters (e.g. asking to write a
//! value that does not fit in the requested bit width) remains a panic,
//! since such a call is a programming error internal to the crate rather
//! than a property of external input.

use thiserror::Error;

/// All ways a decode, encode, or validation step in this crate can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// The outer container framing was malformed: bad magic, a truncated
    /// section, or a length field inconsistent with the bytes consumed.
    #[error("format error: {0}")]
    Format(String),

    /// A bitstream or string-table read failed to decode a well-formed
    /// value: an incomplete canonical code, an out-of-range enum index,
    /// an out-of-range back-reference rank, or an unexpected end of
    /// stream.
    #[error("decode error: {0}")]
    Decode(String),

    /// A node's declared type, or one of its field values, does not
    /// conform to the active schema.
    #[error("schema violation: {0}")]
    SchemaViolation(String),

    /// The encoder attempted something the schema forbids: a reference
    /// target whose concrete type is not admitted by its context, or a
    /// malformed canonical-code construction request.
    #[error("encoder invariant violated: {0}")]
    Invariant(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
