/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Per-field-position reference contexts: the header §4.5/§4.6 build
//! and consult while walking the node bodies.

use std::collections::HashMap;

use crate::bits::{BitRead, BitWrite};
use crate::codes::CanonicalCode;
use crate::error::Result;
use crate::schema::{Schema, NULL};
use crate::util::bit_width;

use super::stats::RefStats;

/// How a reference field position resolves a concrete type.
#[derive(Debug, Clone)]
pub enum FieldContext {
    /// Exactly one used type is admissible; no bits are ever spent
    /// choosing it.
    Single(&'static str),
    /// Two or more used types occur; a canonical code distinguishes
    /// them.
    Coded(CanonicalCode<&'static str>),
}

impl FieldContext {
    /// The admissible types, in the order the context's codebook (if
    /// any) would list them.
    pub fn valid_types(&self) -> Vec<&'static str> {
        match self {
            FieldContext::Single(t) => vec![*t],
            FieldContext::Coded(code) => code.symbols().to_vec(),
        }
    }
}

/// The set of reference contexts active for one encode/decode call,
/// keyed by `(owner_type, field_name)`.
///
/// A field position with no entry here means its recorded occurrences
/// are empty: the field is a `List(NodeRef(...))` that happened to be
/// empty at every point it occurs in this particular document, even
/// though its declared destination types are used elsewhere in the
/// pool. When its context alphabet has fewer than two admissible
/// types this carries no header bits at all (there is nothing to
/// choose between); when the alphabet has two or more, a leading
/// "populated" bit records the fact so the decoder does not have to
/// guess it from information it doesn't have. Either way, such a
/// position decodes to an empty list at body time — the
/// generalization of "emit nothing" that keeps a universally-empty
/// reference list from requiring a codebook seeded by zero
/// observations.
pub type Contexts = HashMap<(&'static str, &'static str), FieldContext>;

/// Builds the header's reference contexts from the encoder side: reads
/// `stats`, writes the per-field codebook bits, and returns the
/// resulting [`Contexts`] map.
pub fn write_header<W: BitWrite>(
    schema: &Schema,
    used_types: &[&'static str],
    stats: &RefStats,
    writer: &mut W,
) -> Result<Contexts> {
    // `Null` is always an admissible reference destination, regardless
    // of whether any concrete node actually used it: position 0 of the
    // used-types enumeration, implicitly present rather than written.
    let mut used_set: std::collections::HashSet<&'static str> = used_types.iter().copied().collect();
    used_set.insert(NULL);
    let mut contexts = Contexts::new();

    for t in schema.types {
        writer.write_bool(used_set.contains(&t.name));
    }

    for (owner, field, dest) in schema.reference_field_positions() {
        if !used_set.contains(&owner) {
            continue;
        }
        let alphabet: Vec<&'static str> = schema
            .concrete_subtypes(dest)
            .into_iter()
            .filter(|t| used_set.contains(t))
            .collect();

        if alphabet.len() >= 2 {
            let counts = stats.for_field(owner, field);
            // An explicit "this position actually occurred" bit: the
            // decoder has no stats of its own to infer this from, so
            // the encoder's silence (an empty `counts`) must still be
            // marked on the wire rather than left for the decoder to
            // guess.
            writer.write_bool(!counts.is_empty());
            if counts.len() >= 2 {
                writer.write_bool(true);
                let code = CanonicalCode::from_counts(&counts)?;
                code.write_codebook(&alphabet, writer);
                contexts.insert((owner, field), FieldContext::Coded(code));
            } else if counts.len() == 1 {
                writer.write_bool(false);
                let (only, _) = counts[0];
                let index = alphabet.iter().position(|&t| t == only).expect("recorded type must be in its own context alphabet");
                writer.write_uint(index as u64, bit_width(alphabet.len()));
                contexts.insert((owner, field), FieldContext::Single(only));
            }
            // counts.len() == 0: field never occurred; no context
            // entry, and no further bits past the "populated" marker.
        } else if alphabet.len() == 1 {
            contexts.insert((owner, field), FieldContext::Single(alphabet[0]));
        }
    }

    Ok(contexts)
}

/// Mirrors [`write_header`] on the decoder side.
pub fn read_header<R: BitRead>(schema: &Schema, reader: &mut R) -> Result<(Vec<&'static str>, Contexts)> {
    let mut used_types = Vec::new();
    for t in schema.types {
        if reader.read_bool()? {
            used_types.push(t.name);
        }
    }
    let mut used_set: std::collections::HashSet<&'static str> = used_types.iter().copied().collect();
    used_set.insert(NULL);
    let mut contexts = Contexts::new();

    for (owner, field, dest) in schema.reference_field_positions() {
        if !used_set.contains(&owner) {
            continue;
        }
        let alphabet: Vec<&'static str> = schema
            .concrete_subtypes(dest)
            .into_iter()
            .filter(|t| used_set.contains(t))
            .collect();

        if alphabet.len() >= 2 {
            if !reader.read_bool()? {
                // Mirrors `write_header`'s "field never occurred" case:
                // no codebook bit, no alphabet-index bit, no context
                // entry.
                continue;
            }
            if reader.read_bool()? {
                let code = CanonicalCode::read_from_codebook(reader, &alphabet)?;
                contexts.insert((owner, field), FieldContext::Coded(code));
            } else {
                let index = reader.read_uint(bit_width(alphabet.len()))? as usize;
                if index >= alphabet.len() {
                    return Err(crate::error::Error::Decode(
                        "context alphabet index out of range".into(),
                    ));
                }
                contexts.insert((owner, field), FieldContext::Single(alphabet[index]));
            }
        } else if alphabet.len() == 1 {
            contexts.insert((owner, field), FieldContext::Single(alphabet[0]));
        }
    }

    Ok((used_types, contexts))
}
