/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Rebuilds a [`Value`] tree from a decoded [`Pool`] by substituting
//! each reference inline (§4.6: "the decoder may return either the
//! root node as a materialised tree... or the flat node pool"). Shared
//! pool entries are duplicated into independent `Value::Node`s, since
//! the tree shape has no notion of sharing.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::schema::{FieldKind, Schema};
use crate::value::{AstNode, Value};

use super::pool::{Pool, PoolValue};

/// Materializes `pool`'s root entry as a standalone [`Value`] tree.
pub fn to_tree(schema: &Schema, pool: &Pool) -> Result<Value> {
    let root = match pool.root_index() {
        Some(i) => i,
        None => return Ok(Value::Null),
    };
    node_to_value(schema, pool, root)
}

fn node_to_value(schema: &Schema, pool: &Pool, index: usize) -> Result<Value> {
    let node = &pool.nodes[index];
    let fields = schema.fields(node.type_name);
    if fields.len() != node.values.len() {
        return Err(Error::Invariant(format!(
            "{}: field/value count mismatch while materializing",
            node.type_name
        )));
    }
    let mut map = HashMap::with_capacity(fields.len());
    for (field, value) in fields.iter().zip(node.values.iter()) {
        map.insert(field.name.to_string(), field_value_to_value(schema, pool, &field.kind, value)?);
    }
    Ok(Value::Node(AstNode {
        type_name: node.type_name.to_string(),
        fields: map,
    }))
}

fn field_value_to_value(schema: &Schema, pool: &Pool, kind: &FieldKind, value: &PoolValue) -> Result<Value> {
    Ok(match (kind, value) {
        (FieldKind::Boolean, PoolValue::Bool(b)) => Value::Bool(*b),
        (FieldKind::String, PoolValue::String(s)) => Value::String(s.clone()),
        (FieldKind::Number, PoolValue::Number(n)) => Value::Number(n.clone()),
        (FieldKind::Enum(variants), PoolValue::Enum(idx)) => {
            let variant = variants
                .get(*idx)
                .ok_or_else(|| Error::Invariant("enum index out of range while materializing".into()))?;
            Value::String(variant.to_string())
        }
        (FieldKind::List(inner, _), PoolValue::List(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(field_value_to_value(schema, pool, inner, item)?);
            }
            Value::List(out)
        }
        (FieldKind::NodeRef(_), PoolValue::Ref(None)) => Value::Null,
        (FieldKind::NodeRef(_), PoolValue::Ref(Some(idx))) => node_to_value(schema, pool, *idx)?,
        _ => return Err(Error::Invariant("pool value does not match its field kind".into())),
    })
}
