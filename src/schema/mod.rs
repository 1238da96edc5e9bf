/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The schema meta-model.
//!
//! A [`Schema`] is a closed, statically declared set of node types: a
//! table of [`NodeType`] descriptors, each with an ordered list of
//! named [`Field`]s, plus a single-parent hierarchy used to resolve
//! [`FieldKind::NodeRef`] destinations to their concrete subtypes.
//! There is no runtime reflection here — schemas are plain data, and
//! dispatch on a field's kind is a `match` on [`FieldKind`]'s tag.
//!
//! [`Null`] is the distinguished "absent reference" type: it carries no
//! fields and never appears in [`Schema::types`], but can appear as a
//! destination in a [`FieldKind::NodeRef`] list (the `Optional(T)`
//! sugar is exactly `NodeRef` with `Null` prepended to `T`'s
//! destinations).

pub mod shift_es5;

/// The name reserved for the "absent reference" placeholder type.
pub const NULL: &str = "Null";

/// The kind of a single field on a node type.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// A `true`/`false` leaf.
    Boolean,
    /// A UTF-8 text leaf, stored in the container's string table.
    String,
    /// A leaf carrying a lossless decimal number (see [`crate::number`]).
    Number,
    /// One of a fixed, ordered list of variant names.
    Enum(&'static [&'static str]),
    /// An ordered sequence of values of `of`. `nonempty` means the
    /// encoder/decoder may skip the leading continuation bit, since
    /// the list is statically known to hold at least one element.
    List(&'static FieldKind, bool),
    /// A reference to a child node whose concrete type lies in the
    /// transitive subtype closure of `destinations`. `Null` appearing
    /// in `destinations` makes the reference optional.
    NodeRef(&'static [&'static str]),
}

/// One named field of a node type, in schema declaration order.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// A single concrete node type: its optional parent (for subtype
/// queries) and its full, flattened field list.
///
/// Multiple-inheritance field composition in the source schema (e.g. a
/// `Function` mixin contributing `params` to more than one concrete
/// type) is resolved once, here, into a plain ordered list — there is
/// no mixin concept at this layer.
#[derive(Debug, Clone, Copy)]
pub struct NodeType {
    pub name: &'static str,
    pub parent: Option<&'static str>,
    pub fields: &'static [Field],
}

/// A closed set of node types plus a designated root type.
pub struct Schema {
    pub root: &'static str,
    pub types: &'static [NodeType],
}

impl Schema {
    /// Looks up a node type by name.
    pub fn node(&self, name: &str) -> Option<&'static NodeType> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Whether `name` is `ancestor` or a transitive subtype of it.
    /// `Null` is never a subtype of anything but itself.
    pub fn is_subtype(&self, name: &str, ancestor: &str) -> bool {
        if name == ancestor {
            return true;
        }
        if name == NULL || ancestor == NULL {
            return false;
        }
        let mut cur = name;
        while let Some(node) = self.node(cur) {
            match node.parent {
                Some(parent) if parent == ancestor => return true,
                Some(parent) => cur = parent,
                None => return false,
            }
        }
        false
    }

    /// The transitive closure of concrete subtypes of every type named
    /// in `destinations`, in schema declaration order. `Null` passes
    /// through unchanged (it has no subtypes of its own).
    pub fn concrete_subtypes(&self, destinations: &[&str]) -> Vec<&'static str> {
        let mut out = Vec::new();
        if destinations.contains(&NULL) {
            out.push(NULL);
        }
        for t in self.types {
            if destinations
                .iter()
                .any(|&dest| dest != NULL && self.is_subtype(t.name, dest))
            {
                out.push(t.name);
            }
        }
        out
    }

    /// The ordered field list for a concrete type. Empty for `Null`.
    pub fn fields(&self, type_name: &str) -> &'static [Field] {
        if type_name == NULL {
            return &[];
        }
        self.node(type_name).map(|t| t.fields).unwrap_or(&[])
    }

    /// Every `(owner_type, field_name, destinations)` position in the
    /// schema whose field kind is a `NodeRef`, or a `List` thereof,
    /// where `destinations` is the schema-declared (not yet
    /// used-type-filtered) destination list.
    pub fn reference_field_positions(
        &self,
    ) -> Vec<(&'static str, &'static str, &'static [&'static str])> {
        let mut out = Vec::new();
        for t in self.types {
            for f in t.fields {
                match f.kind {
                    FieldKind::NodeRef(dest) => out.push((t.name, f.name, dest)),
                    FieldKind::List(inner, _) => {
                        if let FieldKind::NodeRef(dest) = inner {
                            out.push((t.name, f.name, dest));
                        }
                    }
                    _ => {}
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn subtype_chain_resolves() {
        let schema = shift_es5::schema();
        assert!(schema.is_subtype("FunctionDeclaration", "Statement"));
        assert!(schema.is_subtype("FunctionDeclaration", "Node"));
        assert!(!schema.is_subtype("FunctionDeclaration", "Expression"));
    }

    #[test]
    fn concrete_subtypes_include_null_sugar() {
        let schema = shift_es5::schema();
        let subtypes = schema.concrete_subtypes(&[NULL, "Expression"]);
        assert!(subtypes.contains(&NULL));
        assert!(subtypes.contains(&"IdentifierExpression"));
    }
}
