/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The `shift_es5` example schema: an ECMAScript 5 AST, modeled after
//! the Shift AST format.
//!
//! Field composition that the source schema expresses through multiple
//! inheritance (the `Function` mixin contributing `parameters` to both
//! `FunctionDeclaration` and `FunctionExpression`; the `ObjectProperty`
//! base contributing `name` to `AccessorProperty`/`Getter`/`Setter`/
//! `DataProperty`) is flattened here into each concrete type's final
//! ordered field list, matching Python's base-to-derived
//! `get_type_hints` merge order. `SwitchStatementWithDefault` is kept
//! exactly as in the source schema, irregular shape included.

use super::{Field, FieldKind, NodeType, Schema};
use std::sync::OnceLock;

const VARIABLE_DECLARATION_KIND: &[&str] = &["var", "let", "const"];
const PROPERTY_NAME_KIND: &[&str] = &["identifier", "string", "number"];
const ASSIGNMENT_OPERATOR: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "<<=", ">>=", ">>>=", "|=", "^=", "&=",
];
const BINARY_OPERATOR: &[&str] = &[
    "==", "!=", "===", "!==", "<", "<=", ">", ">=", "in", "instanceof", "<<", ">>", ">>>", "+",
    "-", "*", "/", "%", ",", "||", "&&", "|", "^", "&",
];
const PREFIX_OPERATOR: &[&str] = &["+", "-", "!", "~", "typeof", "void", "delete", "++", "--"];
const POSTFIX_OPERATOR: &[&str] = &["++", "--"];

static REF_DIRECTIVE: FieldKind = FieldKind::NodeRef(&["Directive"]);
static REF_STATEMENT: FieldKind = FieldKind::NodeRef(&["Statement"]);
static REF_EXPRESSION: FieldKind = FieldKind::NodeRef(&["Expression"]);
static REF_SWITCH_CASE: FieldKind = FieldKind::NodeRef(&["SwitchCase"]);
static REF_OBJECT_PROPERTY: FieldKind = FieldKind::NodeRef(&["ObjectProperty"]);
static REF_VARIABLE_DECLARATOR: FieldKind = FieldKind::NodeRef(&["VariableDeclarator"]);
static REF_IDENTIFIER: FieldKind = FieldKind::NodeRef(&["Identifier"]);
static OPT_REF_EXPRESSION: FieldKind = FieldKind::NodeRef(&["Null", "Expression"]);

const NODE_TYPES: &[NodeType] = &[
    // Abstract category markers. They carry no fields of their own but
    // participate in the subtype hierarchy used by NodeRef resolution.
    NodeType {
        name: "Directive",
        parent: None,
        fields: &[],
    },
    NodeType {
        name: "Statement",
        parent: None,
        fields: &[],
    },
    NodeType {
        name: "Expression",
        parent: None,
        fields: &[],
    },
    NodeType {
        name: "PrimaryExpression",
        parent: Some("Expression"),
        fields: &[],
    },
    NodeType {
        name: "LiteralExpression",
        parent: Some("PrimaryExpression"),
        fields: &[],
    },
    NodeType {
        name: "ObjectProperty",
        parent: None,
        fields: &[Field {
            name: "name",
            kind: FieldKind::NodeRef(&["PropertyName"]),
        }],
    },
    NodeType {
        name: "AccessorProperty",
        parent: Some("ObjectProperty"),
        fields: &[
            Field {
                name: "name",
                kind: FieldKind::NodeRef(&["PropertyName"]),
            },
            Field {
                name: "body",
                kind: FieldKind::NodeRef(&["FunctionBody"]),
            },
        ],
    },
    NodeType {
        name: "FunctionBody",
        parent: None,
        fields: &[
            Field {
                name: "directives",
                kind: FieldKind::List(&REF_DIRECTIVE, false),
            },
            Field {
                name: "statements",
                kind: FieldKind::List(&REF_STATEMENT, false),
            },
        ],
    },
    NodeType {
        name: "PropertyName",
        parent: None,
        fields: &[
            Field {
                name: "kind",
                kind: FieldKind::Enum(PROPERTY_NAME_KIND),
            },
            Field {
                name: "value",
                kind: FieldKind::String,
            },
        ],
    },
    NodeType {
        name: "Identifier",
        parent: None,
        fields: &[Field {
            name: "name",
            kind: FieldKind::String,
        }],
    },
    NodeType {
        name: "Block",
        parent: None,
        fields: &[Field {
            name: "statements",
            kind: FieldKind::List(&REF_STATEMENT, false),
        }],
    },
    NodeType {
        name: "CatchClause",
        parent: None,
        fields: &[
            Field {
                name: "binding",
                kind: FieldKind::NodeRef(&["Identifier"]),
            },
            Field {
                name: "body",
                kind: FieldKind::NodeRef(&["Block"]),
            },
        ],
    },
    NodeType {
        name: "Script",
        parent: None,
        fields: &[Field {
            name: "body",
            kind: FieldKind::NodeRef(&["FunctionBody"]),
        }],
    },
    NodeType {
        name: "SwitchCase",
        parent: None,
        fields: &[
            Field {
                name: "test",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
            Field {
                name: "consequent",
                kind: FieldKind::List(&REF_STATEMENT, false),
            },
        ],
    },
    NodeType {
        name: "SwitchDefault",
        parent: None,
        fields: &[Field {
            name: "consequent",
            kind: FieldKind::List(&REF_STATEMENT, false),
        }],
    },
    NodeType {
        name: "VariableDeclarator",
        parent: None,
        fields: &[
            Field {
                name: "binding",
                kind: FieldKind::NodeRef(&["Identifier"]),
            },
            Field {
                name: "init",
                kind: FieldKind::NodeRef(&["Null", "Expression"]),
            },
        ],
    },
    NodeType {
        name: "VariableDeclaration",
        parent: None,
        fields: &[
            Field {
                name: "kind",
                kind: FieldKind::Enum(VARIABLE_DECLARATION_KIND),
            },
            Field {
                name: "declarators",
                kind: FieldKind::List(&REF_VARIABLE_DECLARATOR, true),
            },
        ],
    },
    // Functions: the `Function` mixin's `parameters` field is merged
    // in ahead of each concrete type's own fields.
    NodeType {
        name: "FunctionDeclaration",
        parent: Some("Statement"),
        fields: &[
            Field {
                name: "parameters",
                kind: FieldKind::List(&REF_IDENTIFIER, false),
            },
            Field {
                name: "name",
                kind: FieldKind::NodeRef(&["Identifier"]),
            },
            Field {
                name: "body",
                kind: FieldKind::NodeRef(&["FunctionBody"]),
            },
        ],
    },
    NodeType {
        name: "FunctionExpression",
        parent: Some("PrimaryExpression"),
        fields: &[
            Field {
                name: "parameters",
                kind: FieldKind::List(&REF_IDENTIFIER, false),
            },
            Field {
                name: "name",
                kind: FieldKind::NodeRef(&["Null", "Identifier"]),
            },
            Field {
                name: "body",
                kind: FieldKind::NodeRef(&["FunctionBody"]),
            },
        ],
    },
    // Object expressions
    NodeType {
        name: "ObjectExpression",
        parent: Some("PrimaryExpression"),
        fields: &[Field {
            name: "properties",
            kind: FieldKind::List(&REF_OBJECT_PROPERTY, false),
        }],
    },
    NodeType {
        name: "Getter",
        parent: Some("AccessorProperty"),
        fields: &[
            Field {
                name: "name",
                kind: FieldKind::NodeRef(&["PropertyName"]),
            },
            Field {
                name: "body",
                kind: FieldKind::NodeRef(&["FunctionBody"]),
            },
        ],
    },
    NodeType {
        name: "Setter",
        parent: Some("AccessorProperty"),
        fields: &[
            Field {
                name: "name",
                kind: FieldKind::NodeRef(&["PropertyName"]),
            },
            Field {
                name: "body",
                kind: FieldKind::NodeRef(&["FunctionBody"]),
            },
            Field {
                name: "parameter",
                kind: FieldKind::NodeRef(&["Identifier"]),
            },
        ],
    },
    NodeType {
        name: "DataProperty",
        parent: Some("ObjectProperty"),
        fields: &[
            Field {
                name: "name",
                kind: FieldKind::NodeRef(&["PropertyName"]),
            },
            Field {
                name: "expression",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
        ],
    },
    // Literals
    NodeType {
        name: "LiteralBooleanExpression",
        parent: Some("LiteralExpression"),
        fields: &[Field {
            name: "value",
            kind: FieldKind::Boolean,
        }],
    },
    NodeType {
        name: "LiteralInfinityExpression",
        parent: Some("LiteralExpression"),
        fields: &[],
    },
    NodeType {
        name: "LiteralNullExpression",
        parent: Some("LiteralExpression"),
        fields: &[],
    },
    NodeType {
        name: "LiteralNumericExpression",
        parent: Some("LiteralExpression"),
        fields: &[Field {
            name: "value",
            kind: FieldKind::Number,
        }],
    },
    NodeType {
        name: "LiteralRegExpExpression",
        parent: Some("LiteralExpression"),
        fields: &[Field {
            name: "value",
            kind: FieldKind::String,
        }],
    },
    NodeType {
        name: "LiteralStringExpression",
        parent: Some("LiteralExpression"),
        fields: &[Field {
            name: "value",
            kind: FieldKind::String,
        }],
    },
    // Other expressions
    NodeType {
        name: "ArrayExpression",
        parent: Some("PrimaryExpression"),
        fields: &[Field {
            name: "elements",
            kind: FieldKind::List(&OPT_REF_EXPRESSION, false),
        }],
    },
    NodeType {
        name: "AssignmentExpression",
        parent: Some("Expression"),
        fields: &[
            Field {
                name: "operator",
                kind: FieldKind::Enum(ASSIGNMENT_OPERATOR),
            },
            Field {
                name: "binding",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
            Field {
                name: "expression",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
        ],
    },
    NodeType {
        name: "BinaryExpression",
        parent: Some("Expression"),
        fields: &[
            Field {
                name: "operator",
                kind: FieldKind::Enum(BINARY_OPERATOR),
            },
            Field {
                name: "left",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
            Field {
                name: "right",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
        ],
    },
    NodeType {
        name: "CallExpression",
        parent: Some("Expression"),
        fields: &[
            Field {
                name: "callee",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
            Field {
                name: "arguments",
                kind: FieldKind::List(&REF_EXPRESSION, false),
            },
        ],
    },
    NodeType {
        name: "ComputedMemberExpression",
        parent: Some("Expression"),
        fields: &[
            Field {
                name: "object",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
            Field {
                name: "expression",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
        ],
    },
    NodeType {
        name: "ConditionalExpression",
        parent: Some("Expression"),
        fields: &[
            Field {
                name: "test",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
            Field {
                name: "consequent",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
            Field {
                name: "alternate",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
        ],
    },
    NodeType {
        name: "IdentifierExpression",
        parent: Some("PrimaryExpression"),
        fields: &[Field {
            name: "identifier",
            kind: FieldKind::NodeRef(&["Identifier"]),
        }],
    },
    NodeType {
        name: "NewExpression",
        parent: Some("Expression"),
        fields: &[
            Field {
                name: "callee",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
            Field {
                name: "arguments",
                kind: FieldKind::List(&REF_EXPRESSION, false),
            },
        ],
    },
    NodeType {
        name: "PostfixExpression",
        parent: Some("Expression"),
        fields: &[
            Field {
                name: "operator",
                kind: FieldKind::Enum(POSTFIX_OPERATOR),
            },
            Field {
                name: "operand",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
        ],
    },
    NodeType {
        name: "PrefixExpression",
        parent: Some("Expression"),
        fields: &[
            Field {
                name: "operator",
                kind: FieldKind::Enum(PREFIX_OPERATOR),
            },
            Field {
                name: "operand",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
        ],
    },
    NodeType {
        name: "StaticMemberExpression",
        parent: Some("Expression"),
        fields: &[
            Field {
                name: "object",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
            Field {
                name: "property",
                kind: FieldKind::NodeRef(&["Identifier"]),
            },
        ],
    },
    NodeType {
        name: "ThisExpression",
        parent: Some("PrimaryExpression"),
        fields: &[],
    },
    // Other statements
    NodeType {
        name: "BlockStatement",
        parent: Some("Statement"),
        fields: &[Field {
            name: "block",
            kind: FieldKind::NodeRef(&["Block"]),
        }],
    },
    NodeType {
        name: "BreakStatement",
        parent: Some("Statement"),
        fields: &[Field {
            name: "label",
            kind: FieldKind::NodeRef(&["Null", "Identifier"]),
        }],
    },
    NodeType {
        name: "ContinueStatement",
        parent: Some("Statement"),
        fields: &[Field {
            name: "label",
            kind: FieldKind::NodeRef(&["Null", "Identifier"]),
        }],
    },
    NodeType {
        name: "DebuggerStatement",
        parent: Some("Statement"),
        fields: &[],
    },
    NodeType {
        name: "DoWhileStatement",
        parent: Some("Statement"),
        fields: &[
            Field {
                name: "body",
                kind: FieldKind::NodeRef(&["Statement"]),
            },
            Field {
                name: "test",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
        ],
    },
    NodeType {
        name: "EmptyStatement",
        parent: Some("Statement"),
        fields: &[],
    },
    NodeType {
        name: "ExpressionStatement",
        parent: Some("Statement"),
        fields: &[Field {
            name: "expression",
            kind: FieldKind::NodeRef(&["Expression"]),
        }],
    },
    NodeType {
        name: "ForInStatement",
        parent: Some("Statement"),
        fields: &[
            Field {
                name: "left",
                kind: FieldKind::NodeRef(&["VariableDeclaration", "Expression"]),
            },
            Field {
                name: "right",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
            Field {
                name: "body",
                kind: FieldKind::NodeRef(&["Statement"]),
            },
        ],
    },
    NodeType {
        name: "ForStatement",
        parent: Some("Statement"),
        fields: &[
            Field {
                name: "init",
                kind: FieldKind::NodeRef(&["Null", "VariableDeclaration", "Expression"]),
            },
            Field {
                name: "test",
                kind: FieldKind::NodeRef(&["Null", "Expression"]),
            },
            Field {
                name: "update",
                kind: FieldKind::NodeRef(&["Null", "Expression"]),
            },
            Field {
                name: "body",
                kind: FieldKind::NodeRef(&["Statement"]),
            },
        ],
    },
    NodeType {
        name: "IfStatement",
        parent: Some("Statement"),
        fields: &[
            Field {
                name: "test",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
            Field {
                name: "consequent",
                kind: FieldKind::NodeRef(&["Statement"]),
            },
            Field {
                name: "alternate",
                kind: FieldKind::NodeRef(&["Null", "Statement"]),
            },
        ],
    },
    NodeType {
        name: "LabeledStatement",
        parent: Some("Statement"),
        fields: &[
            Field {
                name: "label",
                kind: FieldKind::NodeRef(&["Identifier"]),
            },
            Field {
                name: "body",
                kind: FieldKind::NodeRef(&["Statement"]),
            },
        ],
    },
    NodeType {
        name: "ReturnStatement",
        parent: Some("Statement"),
        fields: &[Field {
            name: "expression",
            kind: FieldKind::NodeRef(&["Null", "Expression"]),
        }],
    },
    NodeType {
        name: "SwitchStatement",
        parent: Some("Statement"),
        fields: &[
            Field {
                name: "discriminant",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
            Field {
                name: "cases",
                kind: FieldKind::List(&REF_SWITCH_CASE, false),
            },
        ],
    },
    NodeType {
        name: "SwitchStatementWithDefault",
        parent: Some("Statement"),
        fields: &[
            Field {
                name: "discriminant",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
            Field {
                name: "preDefaultCases",
                kind: FieldKind::List(&REF_SWITCH_CASE, false),
            },
            Field {
                name: "defaultCase",
                kind: FieldKind::NodeRef(&["SwitchDefault"]),
            },
            Field {
                name: "postDefaultCases",
                kind: FieldKind::List(&REF_SWITCH_CASE, false),
            },
        ],
    },
    NodeType {
        name: "ThrowStatement",
        parent: Some("Statement"),
        fields: &[Field {
            name: "expression",
            kind: FieldKind::NodeRef(&["Expression"]),
        }],
    },
    NodeType {
        name: "TryCatchStatement",
        parent: Some("Statement"),
        fields: &[
            Field {
                name: "body",
                kind: FieldKind::NodeRef(&["Block"]),
            },
            Field {
                name: "catchClause",
                kind: FieldKind::NodeRef(&["CatchClause"]),
            },
        ],
    },
    NodeType {
        name: "TryFinallyStatement",
        parent: Some("Statement"),
        fields: &[
            Field {
                name: "body",
                kind: FieldKind::NodeRef(&["Block"]),
            },
            Field {
                name: "catchClause",
                kind: FieldKind::NodeRef(&["Null", "CatchClause"]),
            },
            Field {
                name: "finalizer",
                kind: FieldKind::NodeRef(&["Block"]),
            },
        ],
    },
    NodeType {
        name: "VariableDeclarationStatement",
        parent: Some("Statement"),
        fields: &[Field {
            name: "declaration",
            kind: FieldKind::NodeRef(&["VariableDeclaration"]),
        }],
    },
    NodeType {
        name: "WhileStatement",
        parent: Some("Statement"),
        fields: &[
            Field {
                name: "test",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
            Field {
                name: "body",
                kind: FieldKind::NodeRef(&["Statement"]),
            },
        ],
    },
    NodeType {
        name: "WithStatement",
        parent: Some("Statement"),
        fields: &[
            Field {
                name: "object",
                kind: FieldKind::NodeRef(&["Expression"]),
            },
            Field {
                name: "body",
                kind: FieldKind::NodeRef(&["Statement"]),
            },
        ],
    },
    // Directives
    NodeType {
        name: "UnknownDirective",
        parent: Some("Directive"),
        fields: &[Field {
            name: "value",
            kind: FieldKind::String,
        }],
    },
    NodeType {
        name: "UseStrictDirective",
        parent: Some("Directive"),
        fields: &[],
    },
];

/// Returns the `shift_es5` schema singleton.
pub fn schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| Schema {
        root: "Script",
        types: NODE_TYPES,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_type_is_reachable_by_name() {
        let schema = schema();
        for t in NODE_TYPES {
            assert!(schema.node(t.name).is_some());
        }
    }

    #[test]
    fn function_mixin_is_flattened_in_declaration_order() {
        let schema = schema();
        let fields: Vec<&str> = schema.fields("FunctionDeclaration").iter().map(|f| f.name).collect();
        assert_eq!(fields, vec!["parameters", "name", "body"]);
    }

    #[test]
    fn switch_statement_with_default_keeps_its_odd_shape() {
        let schema = schema();
        let fields: Vec<&str> = schema
            .fields("SwitchStatementWithDefault")
            .iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(
            fields,
            vec!["discriminant", "preDefaultCases", "defaultCase", "postDefaultCases"]
        );
    }
}
