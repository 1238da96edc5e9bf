/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The graph encoder (§4.5): header production followed by a single
//! inline, recursive encoding of the root node.

use std::collections::HashSet;

use crate::bits::{BitWrite, BitWriter};
use crate::codes::vardecimal;
use crate::error::{Error, Result};
use crate::schema::{FieldKind, Schema, NULL};
use crate::util::bit_width;

use super::context::{write_header, Contexts, FieldContext};
use super::pool::{Pool, PoolValue};
use super::recent::RecentList;
use super::stats::RefStats;

/// Encodes `pool`'s root node into a flushed bitstream, plus the
/// string table in the order `String` fields were visited.
pub fn encode(schema: &Schema, pool: &Pool, stats: &RefStats) -> Result<(Vec<u8>, Vec<String>)> {
    let used_types: Vec<&'static str> = schema
        .types
        .iter()
        .map(|t| t.name)
        .filter(|&name| pool.nodes.iter().any(|n| n.type_name == name))
        .collect();

    let mut writer = BitWriter::new();
    let contexts = write_header(schema, &used_types, stats, &mut writer)?;
    log::debug!("graph encoder: header is {} bits", writer.tell());

    let root = pool
        .root_index()
        .ok_or_else(|| Error::SchemaViolation("empty node pool".into()))?;

    let mut encoder = Encoder {
        schema,
        pool,
        contexts,
        writer,
        strings: Vec::new(),
        recent: RecentList::default(),
        ever_seen: HashSet::new(),
    };
    encoder.encode_node(root)?;
    encoder.writer.flush();

    Ok((encoder.writer.into_bytes(), encoder.strings))
}

struct Encoder<'a> {
    schema: &'a Schema,
    pool: &'a Pool,
    contexts: Contexts,
    writer: BitWriter,
    strings: Vec<String>,
    recent: RecentList,
    ever_seen: HashSet<usize>,
}

impl<'a> Encoder<'a> {
    fn encode_node(&mut self, index: usize) -> Result<()> {
        let node = &self.pool.nodes[index];
        let fields = self.schema.fields(node.type_name);
        if fields.len() != node.values.len() {
            return Err(Error::Invariant(format!(
                "{}: field/value count mismatch",
                node.type_name
            )));
        }
        for (field, value) in fields.iter().zip(node.values.iter()) {
            self.encode_field(node.type_name, field.name, &field.kind, value)?;
        }
        Ok(())
    }

    fn encode_field(
        &mut self,
        owner: &'static str,
        field: &'static str,
        kind: &FieldKind,
        value: &PoolValue,
    ) -> Result<()> {
        match (kind, value) {
            (FieldKind::Boolean, PoolValue::Bool(b)) => {
                self.writer.write_bool(*b);
                Ok(())
            }
            (FieldKind::String, PoolValue::String(s)) => {
                self.strings.push(s.clone());
                Ok(())
            }
            (FieldKind::Number, PoolValue::Number(n)) => {
                self.encode_number(n);
                Ok(())
            }
            (FieldKind::Enum(variants), PoolValue::Enum(idx)) => {
                if *idx >= variants.len() {
                    return Err(Error::Invariant(format!("{owner}.{field}: enum index out of range")));
                }
                self.writer.write_uint(*idx as u64, bit_width(variants.len()));
                Ok(())
            }
            (FieldKind::List(inner, nonempty), PoolValue::List(items)) => {
                self.encode_list(owner, field, inner, *nonempty, items)
            }
            (FieldKind::NodeRef(_), PoolValue::Ref(_)) => self.encode_ref(owner, field, value),
            _ => Err(Error::Invariant(format!(
                "{owner}.{field}: value does not match its declared field kind"
            ))),
        }
    }

    fn encode_number(&mut self, n: &crate::number::Number) {
        // A bare zero collapses to an empty digit sequence; no digits
        // means no sign bit either, matching the loss of `-0`'s sign
        // that the reference implementation's own zero shortcut has.
        let digits: &[u8] = if n.digits == [0] { &[] } else { &n.digits };
        vardecimal::write_digits(digits, &mut self.writer);
        if !digits.is_empty() {
            self.writer.write_bool(n.negative);
        }
        self.writer.write_se(n.exponent);
    }

    fn encode_list(
        &mut self,
        owner: &'static str,
        field: &'static str,
        inner: &FieldKind,
        nonempty: bool,
        items: &[PoolValue],
    ) -> Result<()> {
        if matches!(inner, FieldKind::NodeRef(_)) && !self.contexts.contains_key(&(owner, field)) {
            // This field's reference context was never populated: it
            // is empty at every occurrence in this document. Nothing
            // to write; the decoder infers the same thing statically.
            return Ok(());
        }
        for (i, item) in items.iter().enumerate() {
            if !(nonempty && i == 0) {
                self.writer.write_bool(true);
            }
            self.encode_field(owner, field, inner, item)?;
        }
        self.writer.write_bool(false);
        Ok(())
    }

    fn encode_ref(&mut self, owner: &'static str, field: &'static str, value: &PoolValue) -> Result<()> {
        let target = match value {
            PoolValue::Ref(r) => *r,
            _ => return Err(Error::Invariant(format!("{owner}.{field}: not a reference value"))),
        };
        let context = self
            .contexts
            .get(&(owner, field))
            .ok_or_else(|| Error::Invariant(format!("{owner}.{field}: missing reference context")))?
            .clone();
        let valid_types = context.valid_types();

        if let Some(idx) = target {
            if self.ever_seen.contains(&idx) {
                self.writer.write_bool(true);
                let rank = self
                    .recent
                    .valid_rank(idx, &valid_types)
                    .ok_or_else(|| Error::Invariant(format!("{owner}.{field}: back-reference target not in recent list")))?;
                self.writer.write_ue(rank, 4);
                self.recent.remove_value(idx);
                self.recent.push_front(idx, self.pool.nodes[idx].type_name);
                return Ok(());
            }
        }

        self.writer.write_bool(false);
        let actual_type = match target {
            Some(idx) => self.pool.nodes[idx].type_name,
            None => NULL,
        };
        if !valid_types.contains(&actual_type) {
            return Err(Error::Invariant(format!(
                "{owner}.{field}: {actual_type} is not admitted by its reference context"
            )));
        }
        if valid_types.len() >= 2 {
            match &context {
                FieldContext::Coded(code) => code.write_symbol(&actual_type, &mut self.writer),
                FieldContext::Single(_) => {
                    return Err(Error::Invariant(format!(
                        "{owner}.{field}: multi-type context missing its codebook"
                    )))
                }
            }
        }

        if let Some(idx) = target {
            self.encode_node(idx)?;
            self.ever_seen.insert(idx);
            self.recent.push_front(idx, actual_type);
        }
        Ok(())
    }
}
