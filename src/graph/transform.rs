/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Tree → graph: post-order flattening of a [`crate::value::Value`]
//! tree into a deduplicated [`Pool`] plus the reference-field type
//! stats that seed the encoder's codebooks (§4.4).

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::schema::{FieldKind, Schema, NULL};
use crate::value::Value;

use super::pool::{Pool, PoolValue};
use super::stats::RefStats;

/// Flattens `tree` (expected to be a node of `schema.root`'s type) into
/// a deduplicated pool, recording reference type stats along the way.
pub fn transform(schema: &Schema, tree: &Value) -> Result<(Pool, RefStats)> {
    let mut pool = Pool::default();
    let mut stats = RefStats::default();
    let mut dedup: HashMap<(&'static str, Vec<PoolValue>), usize> = HashMap::new();
    transform_node(schema, tree, &mut pool, &mut stats, &mut dedup)?;
    Ok((pool, stats))
}

fn transform_node(
    schema: &Schema,
    value: &Value,
    pool: &mut Pool,
    stats: &mut RefStats,
    dedup: &mut HashMap<(&'static str, Vec<PoolValue>), usize>,
) -> Result<usize> {
    let node = value
        .as_node()
        .ok_or_else(|| Error::SchemaViolation("expected an AST node".into()))?;
    let node_type = schema
        .node(&node.type_name)
        .ok_or_else(|| Error::SchemaViolation(format!("unknown node type {:?}", node.type_name)))?;
    let type_name = node_type.name;

    let mut values = Vec::with_capacity(node_type.fields.len());
    for field in node_type.fields {
        let raw = node
            .field(field.name)
            .ok_or_else(|| Error::SchemaViolation(format!("{type_name}.{} is missing", field.name)))?;
        let pv = transform_field(schema, &field.kind, raw, pool, stats, dedup, type_name, field.name)?;
        values.push(pv);
    }

    let key = (type_name, values.clone());
    if let Some(&existing) = dedup.get(&key) {
        return Ok(existing);
    }
    let index = pool.nodes.len();
    pool.nodes.push(super::pool::PoolNode { type_name, values });
    dedup.insert(key, index);
    Ok(index)
}

#[allow(clippy::too_many_arguments)]
fn transform_field(
    schema: &Schema,
    kind: &FieldKind,
    value: &Value,
    pool: &mut Pool,
    stats: &mut RefStats,
    dedup: &mut HashMap<(&'static str, Vec<PoolValue>), usize>,
    owner: &'static str,
    field: &'static str,
) -> Result<PoolValue> {
    match kind {
        FieldKind::Boolean => {
            let b = value
                .as_bool()
                .ok_or_else(|| Error::SchemaViolation(format!("{owner}.{field} expected a boolean")))?;
            Ok(PoolValue::Bool(b))
        }
        FieldKind::String => {
            let s = value
                .as_str()
                .ok_or_else(|| Error::SchemaViolation(format!("{owner}.{field} expected a string")))?;
            Ok(PoolValue::String(s.to_string()))
        }
        FieldKind::Number => {
            let n = value
                .as_number()
                .ok_or_else(|| Error::SchemaViolation(format!("{owner}.{field} expected a number")))?;
            Ok(PoolValue::Number(n.clone()))
        }
        FieldKind::Enum(variants) => {
            let s = value
                .as_str()
                .ok_or_else(|| Error::SchemaViolation(format!("{owner}.{field} expected an enum variant")))?;
            let index = variants
                .iter()
                .position(|&v| v == s)
                .ok_or_else(|| Error::SchemaViolation(format!("{owner}.{field}: unknown variant {s:?}")))?;
            Ok(PoolValue::Enum(index))
        }
        FieldKind::List(inner, _nonempty) => {
            let items = value
                .as_list()
                .ok_or_else(|| Error::SchemaViolation(format!("{owner}.{field} expected a list")))?;
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(transform_field(schema, inner, item, pool, stats, dedup, owner, field)?);
            }
            Ok(PoolValue::List(out))
        }
        FieldKind::NodeRef(dest) => {
            if matches!(value, Value::Null) {
                if !dest.contains(&NULL) {
                    return Err(Error::SchemaViolation(format!(
                        "{owner}.{field}: null is not admitted by this reference's destinations"
                    )));
                }
                stats.record(owner, field, NULL);
                return Ok(PoolValue::Ref(None));
            }
            let index = transform_node(schema, value, pool, stats, dedup)?;
            let concrete_type = pool.nodes[index].type_name;
            if !schema.concrete_subtypes(dest).contains(&concrete_type) {
                return Err(Error::SchemaViolation(format!(
                    "{owner}.{field}: {concrete_type} is not a valid destination"
                )));
            }
            stats.record(owner, field, concrete_type);
            Ok(PoolValue::Ref(Some(index)))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::shift_es5;
    use crate::value;

    #[test]
    fn null_is_rejected_where_the_destination_set_does_not_admit_it() {
        // `Script.body` is `NodeRef(&["FunctionBody"])`, with no `Null`
        // sugar: a null there is a schema violation, not an absent ref.
        let schema = shift_es5::schema();
        let tree = value::from_json(r#"{"type":"Script","body":null}"#).unwrap();
        let err = transform(schema, &tree).unwrap_err();
        assert!(matches!(err, Error::SchemaViolation(_)));
    }
}
