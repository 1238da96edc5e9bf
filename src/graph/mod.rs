/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The schema-guided node-pool codec: §4.4 (tree → graph), §4.5 (graph
//! encoder) and §4.6 (graph decoder).
//!
//! [`encode_tree`]/[`decode_tree`] are the entry points most callers
//! want: they take and return [`crate::value::Value`] trees. The
//! lower-level [`Pool`] representation and its [`transform::transform`]
//! step are exposed for callers that want to inspect or reuse the
//! deduplicated graph directly.

mod context;
mod decode;
mod encode;
mod materialize;
mod pool;
mod recent;
mod stats;
mod transform;

pub use pool::{Pool, PoolNode, PoolValue};
pub use stats::RefStats;

use crate::error::Result;
use crate::schema::Schema;
use crate::value::Value;

/// Flattens `tree` and encodes it, returning the graph bitstream and
/// the string table in production order.
pub fn encode_tree(schema: &Schema, tree: &Value) -> Result<(Vec<u8>, Vec<String>)> {
    let (pool, stats) = transform::transform(schema, tree)?;
    log::debug!("graph: transformed tree into {} pool nodes", pool.nodes.len());
    encode::encode(schema, &pool, &stats)
}

/// Decodes a graph bitstream and string table back into a [`Value`]
/// tree.
pub fn decode_tree(schema: &Schema, bitstream: &[u8], strings: Vec<String>) -> Result<Value> {
    let pool = decode::decode(schema, bitstream, strings)?;
    log::debug!("graph: decoded {} pool nodes", pool.nodes.len());
    materialize::to_tree(schema, &pool)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::shift_es5;
    use crate::value;

    fn roundtrip(schema: &Schema, json: &str) -> Value {
        let tree = value::from_json(json).unwrap();
        let (bits, strings) = encode_tree(schema, &tree).unwrap();
        decode_tree(schema, &bits, strings).unwrap()
    }

    #[test]
    fn roundtrips_an_empty_script() {
        let schema = shift_es5::schema();
        let json = r#"{"type":"Script","body":{"type":"FunctionBody","directives":[],"statements":[]}}"#;
        let out = roundtrip(schema, json);
        assert_eq!(out, value::from_json(json).unwrap());
    }

    #[test]
    fn roundtrips_a_numeric_literal_statement() {
        let schema = shift_es5::schema();
        let json = r#"{"type":"Script","body":{"type":"FunctionBody","directives":[],"statements":[{"type":"ExpressionStatement","expression":{"type":"LiteralNumericExpression","value":"3.14"}}]}}"#;
        let out = roundtrip(schema, json);
        let body = out.as_node().unwrap().field("body").unwrap().as_node().unwrap();
        let statements = body.field("statements").unwrap().as_list().unwrap();
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn dedups_repeated_identical_subtrees_into_back_references() {
        // Two occurrences of the exact same identifier name: the second
        // one must round-trip as a back-reference to the first.
        let schema = shift_es5::schema();
        let json = r#"{"type":"Script","body":{"type":"FunctionBody","directives":[],"statements":[
            {"type":"ExpressionStatement","expression":{"type":"IdentifierExpression","identifier":{"type":"Identifier","name":"x"}}},
            {"type":"ExpressionStatement","expression":{"type":"IdentifierExpression","identifier":{"type":"Identifier","name":"x"}}}
        ]}}"#;
        let tree = value::from_json(json).unwrap();
        let (pool, stats) = transform::transform(schema, &tree).unwrap();
        // Both IdentifierExpressions should have deduplicated to the
        // same pool entry.
        let ident_count = pool
            .nodes
            .iter()
            .filter(|n| n.type_name == "IdentifierExpression")
            .count();
        assert_eq!(ident_count, 1);

        let (bits, strings) = encode::encode(schema, &pool, &stats).unwrap();
        let decoded = decode::decode(schema, &bits, strings).unwrap();
        assert_eq!(decoded.nodes.len(), pool.nodes.len());
    }

    #[test]
    fn roundtrips_a_null_reference() {
        let schema = shift_es5::schema();
        let json = r#"{"type":"Script","body":{"type":"FunctionBody","directives":[],"statements":[
            {"type":"IfStatement","test":{"type":"LiteralBooleanExpression","value":true},"consequent":{"type":"EmptyStatement"},"alternate":null}
        ]}}"#;
        let out = roundtrip(schema, json);
        assert_eq!(out, value::from_json(json).unwrap());
    }
}
