/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Per-reference-field-position type-frequency counters (§4.4, point 3),
//! the seed data for the encoder's per-field Huffman codebooks (§4.5).

use std::collections::HashMap;

/// Counts, for every `(owner_type, field_name)` reference position,
/// how many times each concrete type (or `Null`) actually occurred.
#[derive(Debug, Clone, Default)]
pub struct RefStats {
    counts: HashMap<(&'static str, &'static str), HashMap<&'static str, u64>>,
}

impl RefStats {
    pub fn record(&mut self, owner: &'static str, field: &'static str, concrete_type: &'static str) {
        *self
            .counts
            .entry((owner, field))
            .or_default()
            .entry(concrete_type)
            .or_insert(0) += 1;
    }

    /// The recorded `(type, count)` pairs for a field position, sorted
    /// by type name for determinism, or empty if it was never
    /// populated (e.g. a list field that happened to be empty at every
    /// occurrence).
    pub fn for_field(&self, owner: &'static str, field: &'static str) -> Vec<(&'static str, u64)> {
        let mut out: Vec<(&'static str, u64)> = self
            .counts
            .get(&(owner, field))
            .map(|m| m.iter().map(|(&t, &c)| (t, c)).collect())
            .unwrap_or_default();
        out.sort_by_key(|&(t, _)| t);
        out
    }
}
