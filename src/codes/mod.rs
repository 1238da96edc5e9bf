/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Instantaneous codes built on top of [`crate::bits`].
//!
//! [`huffman`] provides a canonical Huffman coder whose codebook can be
//! serialized against a known, shrinking alphabet. [`vardecimal`]
//! exposes the one fixed canonical code the graph codec needs: a
//! terminated stream of decimal digits.

pub mod huffman;
pub mod vardecimal;

pub use huffman::CanonicalCode;
