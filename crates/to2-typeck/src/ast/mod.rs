//! The TO2 syntax tree consumed by the validator.
//!
//! Nodes are plain immutable data. They are produced by an external parser
//! (deserialized from JSON) or built directly in code. Every node carries
//! the source range it was parsed from; the validator keys all of its
//! output on those ranges.

pub mod expr;
pub mod item;
pub mod types;

use serde::{Deserialize, Serialize};
use to2_common::InputRange;

pub use expr::{Binding, Expr, ExprKind, LambdaParameter, RecordItem};
pub use item::{
    ConstDeclaration, FunctionDeclaration, FunctionParameterDeclaration, ImplDeclaration,
    ImplOperatorsDeclaration, ModuleItem, StructDeclaration, StructField, TO2Module,
    TypeAliasDeclaration, UseDeclaration, UseKind,
};
pub use types::{RecordSpecItem, TypeSpec, TypeSpecKind};

/// A name together with the range it occupies in source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    pub range: InputRange,
}

impl Ident {
    pub fn new(name: impl Into<String>, range: InputRange) -> Self {
        Ident {
            name: name.into(),
            range,
        }
    }
}
