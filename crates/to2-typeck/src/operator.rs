//! Operator vocabulary shared by the AST, the registry operator tables and
//! the `impl operators` installer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An operator as it appears in source and in registry operator tables.
///
/// The serialized form is the operator symbol, which is also the key used
/// by `prefixOperators`/`suffixOperators` in type descriptors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Mod,
    #[serde(rename = "**")]
    Pow,
    #[serde(rename = "&")]
    BitAnd,
    #[serde(rename = "|")]
    BitOr,
    #[serde(rename = "^")]
    BitXor,
    #[serde(rename = "~")]
    BitNot,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "&&")]
    BoolAnd,
    #[serde(rename = "||")]
    BoolOr,
    #[serde(rename = "!")]
    Not,
}

impl Operator {
    pub const ALL: [Operator; 19] = [
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::Div,
        Operator::Mod,
        Operator::Pow,
        Operator::BitAnd,
        Operator::BitOr,
        Operator::BitXor,
        Operator::BitNot,
        Operator::Eq,
        Operator::NotEq,
        Operator::Lt,
        Operator::Le,
        Operator::Gt,
        Operator::Ge,
        Operator::BoolAnd,
        Operator::BoolOr,
        Operator::Not,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::Pow => "**",
            Operator::BitAnd => "&",
            Operator::BitOr => "|",
            Operator::BitXor => "^",
            Operator::BitNot => "~",
            Operator::Eq => "==",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::BoolAnd => "&&",
            Operator::BoolOr => "||",
            Operator::Not => "!",
        }
    }

    /// `&&` and `||` are checked directly against `bool` and never go
    /// through the operator tables.
    pub fn is_logical(self) -> bool {
        matches!(self, Operator::BoolAnd | Operator::BoolOr)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| format!("unknown operator `{}`", s))
    }
}

/// Arity class of an overloadable operator function in `impl operators`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OperatorArity {
    Unary,
    Binary,
}

impl OperatorArity {
    pub fn parameter_count(self) -> usize {
        match self {
            OperatorArity::Unary => 1,
            OperatorArity::Binary => 2,
        }
    }
}

/// Map an `impl operators` function name to the operator it overloads.
///
/// This is the complete vocabulary; any other name is an invalid operator
/// declaration.
pub fn operator_for_function(name: &str) -> Option<(Operator, OperatorArity)> {
    match name {
        "unary_minus" => Some((Operator::Sub, OperatorArity::Unary)),
        "add" => Some((Operator::Add, OperatorArity::Binary)),
        "sub" => Some((Operator::Sub, OperatorArity::Binary)),
        "mul" => Some((Operator::Mul, OperatorArity::Binary)),
        "div" => Some((Operator::Div, OperatorArity::Binary)),
        "mod" => Some((Operator::Mod, OperatorArity::Binary)),
        _ => None,
    }
}

/// Names accepted by [`operator_for_function`], for error messages.
pub const OPERATOR_FUNCTION_NAMES: &[&str] = &["unary_minus", "add", "sub", "mul", "div", "mod"];
