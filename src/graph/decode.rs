/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The graph decoder (§4.6): the mirror image of [`super::encode`].

use std::collections::VecDeque;

use crate::bits::{BitRead, BitReader};
use crate::codes::vardecimal;
use crate::error::{Error, Result};
use crate::number::Number;
use crate::schema::{FieldKind, Schema, NULL};
use crate::util::bit_width;

use super::context::{read_header, Contexts, FieldContext};
use super::pool::{Pool, PoolNode, PoolValue};
use super::recent::RecentList;

/// Decodes a graph bitstream against `schema`, given the string table
/// in production order. Returns the reconstructed pool; its root is
/// the final entry.
pub fn decode(schema: &Schema, bitstream: &[u8], strings: Vec<String>) -> Result<Pool> {
    let mut reader = BitReader::new(bitstream);
    let (_used_types, contexts) = read_header(schema, &mut reader)?;

    let mut decoder = Decoder {
        schema,
        contexts,
        reader,
        strings: strings.into(),
        pool: Pool::default(),
        recent: RecentList::default(),
    };
    decoder.decode_node(schema.root)?;
    Ok(decoder.pool)
}

struct Decoder<'a> {
    schema: &'a Schema,
    contexts: Contexts,
    reader: BitReader<'a>,
    strings: VecDeque<String>,
    pool: Pool,
    recent: RecentList,
}

impl<'a> Decoder<'a> {
    fn decode_node(&mut self, type_name: &'static str) -> Result<usize> {
        let fields = self.schema.fields(type_name);
        let mut values = Vec::with_capacity(fields.len());
        for field in fields {
            let v = self.decode_field(type_name, field.name, &field.kind)?;
            values.push(v);
        }
        let index = self.pool.nodes.len();
        self.pool.nodes.push(PoolNode { type_name, values });
        Ok(index)
    }

    fn decode_field(&mut self, owner: &'static str, field: &'static str, kind: &FieldKind) -> Result<PoolValue> {
        match kind {
            FieldKind::Boolean => Ok(PoolValue::Bool(self.reader.read_bool()?)),
            FieldKind::String => {
                let s = self
                    .strings
                    .pop_front()
                    .ok_or_else(|| Error::Decode("string table exhausted".into()))?;
                Ok(PoolValue::String(s))
            }
            FieldKind::Number => Ok(PoolValue::Number(self.decode_number()?)),
            FieldKind::Enum(variants) => {
                let index = self.reader.read_uint(bit_width(variants.len()))? as usize;
                if index >= variants.len() {
                    return Err(Error::Decode(format!("{owner}.{field}: enum index out of range")));
                }
                Ok(PoolValue::Enum(index))
            }
            FieldKind::List(inner, nonempty) => {
                Ok(PoolValue::List(self.decode_list(owner, field, inner, *nonempty)?))
            }
            FieldKind::NodeRef(_) => self.decode_ref(owner, field),
        }
    }

    fn decode_number(&mut self) -> Result<Number> {
        let digits = vardecimal::read_digits(&mut self.reader)?;
        let negative = if digits.is_empty() { false } else { self.reader.read_bool()? };
        let exponent = self.reader.read_se()?;
        let digits = if digits.is_empty() { vec![0] } else { digits };
        Ok(Number { negative, digits, exponent })
    }

    fn decode_list(
        &mut self,
        owner: &'static str,
        field: &'static str,
        inner: &FieldKind,
        nonempty: bool,
    ) -> Result<Vec<PoolValue>> {
        if matches!(inner, FieldKind::NodeRef(_)) && !self.contexts.contains_key(&(owner, field)) {
            return Ok(Vec::new());
        }
        let mut items = Vec::new();
        if nonempty {
            items.push(self.decode_field(owner, field, inner)?);
        }
        while self.reader.read_bool()? {
            items.push(self.decode_field(owner, field, inner)?);
        }
        Ok(items)
    }

    fn decode_ref(&mut self, owner: &'static str, field: &'static str) -> Result<PoolValue> {
        let context = self
            .contexts
            .get(&(owner, field))
            .ok_or_else(|| Error::Decode(format!("{owner}.{field}: missing reference context")))?
            .clone();
        let valid_types = context.valid_types();

        if self.reader.read_bool()? {
            let rank = self.reader.read_ue(4)?;
            let idx = self
                .recent
                .nth_valid(rank, &valid_types)
                .ok_or_else(|| Error::Decode(format!("{owner}.{field}: back-reference rank out of range")))?;
            self.recent.remove_value(idx);
            self.recent.push_front(idx, self.pool.nodes[idx].type_name);
            return Ok(PoolValue::Ref(Some(idx)));
        }

        let actual_type = if valid_types.len() >= 2 {
            match &context {
                FieldContext::Coded(code) => code.read_symbol(&mut self.reader)?,
                FieldContext::Single(_) => {
                    return Err(Error::Decode(format!("{owner}.{field}: multi-type context missing its codebook")))
                }
            }
        } else {
            valid_types[0]
        };

        if actual_type == NULL {
            return Ok(PoolValue::Ref(None));
        }

        let idx = self.decode_node(actual_type)?;
        self.recent.push_front(idx, actual_type);
        Ok(PoolValue::Ref(Some(idx)))
    }
}
