//! Expressions and statements.
//!
//! TO2 does not distinguish statements from expressions: a block is a list
//! of expressions and evaluates to its last one. Declarations and loops
//! evaluate to `Unit`.

use serde::{Deserialize, Serialize};
use to2_common::InputRange;

use super::{Ident, TypeSpec};
use crate::operator::Operator;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    #[serde(flatten)]
    pub kind: ExprKind,
    pub range: InputRange,
}

/// Target of a `let`/`const` or a `for` loop variable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Binding {
    Single { name: Ident },
    /// `let (a, b) = ...`: positional for tuples, by field name for records.
    Tuple { names: Vec<Ident> },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaParameter {
    pub name: Ident,
    #[serde(default)]
    pub type_spec: Option<TypeSpec>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordItem {
    pub name: Ident,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum ExprKind {
    Int {
        value: i64,
    },
    Float {
        value: f64,
    },
    Bool {
        value: bool,
    },
    String {
        value: String,
    },
    /// `name` or `module::name`.
    Variable {
        #[serde(default)]
        namespace: Option<Ident>,
        name: Ident,
    },
    /// `name(args)`, `module::name(args)` or `name<T>(args)`.
    Call {
        #[serde(default)]
        namespace: Option<Ident>,
        name: Ident,
        #[serde(default)]
        type_args: Vec<TypeSpec>,
        args: Vec<Expr>,
    },
    MethodCall {
        target: Box<Expr>,
        name: Ident,
        args: Vec<Expr>,
    },
    Field {
        target: Box<Expr>,
        name: Ident,
    },
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Unary {
        op: Operator,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: Operator,
        right: Box<Expr>,
    },
    Block {
        expressions: Vec<Expr>,
    },
    /// `let`/`const` declaration.
    Let {
        #[serde(default)]
        is_const: bool,
        binding: Binding,
        #[serde(default)]
        type_spec: Option<TypeSpec>,
        value: Box<Expr>,
    },
    /// `name = value` or compound `name += value`.
    Assign {
        name: Ident,
        #[serde(default)]
        op: Option<Operator>,
        value: Box<Expr>,
    },
    /// `target.name = value` or compound `target.name += value`.
    FieldAssign {
        target: Box<Expr>,
        name: Ident,
        #[serde(default)]
        op: Option<Operator>,
        value: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        #[serde(default)]
        else_branch: Option<Box<Expr>>,
    },
    While {
        condition: Box<Expr>,
        body: Box<Expr>,
    },
    For {
        binding: Binding,
        source: Box<Expr>,
        body: Box<Expr>,
    },
    Break,
    Continue,
    Return {
        #[serde(default)]
        value: Option<Box<Expr>>,
    },
    Lambda {
        parameters: Vec<LambdaParameter>,
        body: Box<Expr>,
    },
    Array {
        elements: Vec<Expr>,
    },
    Tuple {
        items: Vec<Expr>,
    },
    Record {
        items: Vec<RecordItem>,
    },
    /// `from..to` (exclusive) or `from...to` (inclusive).
    Range {
        from: Box<Expr>,
        to: Box<Expr>,
        #[serde(default)]
        inclusive: bool,
    },
    Bracket {
        inner: Box<Expr>,
    },
}

impl Expr {
    pub fn new(kind: ExprKind, range: InputRange) -> Self {
        Expr { kind, range }
    }

    pub fn is_lambda(&self) -> bool {
        match &self.kind {
            ExprKind::Lambda { .. } => true,
            ExprKind::Bracket { inner } => inner.is_lambda(),
            _ => false,
        }
    }

    /// Whether the node evaluates to `Unit` regardless of its children.
    pub fn is_statement(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Let { .. }
                | ExprKind::Assign { .. }
                | ExprKind::FieldAssign { .. }
                | ExprKind::While { .. }
                | ExprKind::For { .. }
        )
    }
}
