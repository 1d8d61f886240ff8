//! Module-level items.

use serde::{Deserialize, Serialize};
use to2_common::InputRange;

use super::{Expr, Ident, TypeSpec};

/// A parsed TO2 module: a name and its items in file order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TO2Module {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub items: Vec<ModuleItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ModuleItem {
    Use(UseDeclaration),
    Const(ConstDeclaration),
    Function(FunctionDeclaration),
    Struct(StructDeclaration),
    TypeAlias(TypeAliasDeclaration),
    Impl(ImplDeclaration),
    ImplOperators(ImplOperatorsDeclaration),
}

impl ModuleItem {
    pub fn range(&self) -> InputRange {
        match self {
            ModuleItem::Use(u) => u.range,
            ModuleItem::Const(c) => c.range,
            ModuleItem::Function(f) => f.range,
            ModuleItem::Struct(s) => s.range,
            ModuleItem::TypeAlias(t) => t.range,
            ModuleItem::Impl(i) => i.range,
            ModuleItem::ImplOperators(i) => i.range,
        }
    }
}

/// `use ksp::vessel`, `use ksp::vessel as v`, `use { a, b } from m`,
/// `use * from m`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UseDeclaration {
    pub module: Ident,
    pub import: UseKind,
    pub range: InputRange,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum UseKind {
    Module {
        #[serde(default)]
        alias: Option<Ident>,
    },
    Names {
        names: Vec<Ident>,
    },
    All,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstDeclaration {
    pub name: Ident,
    #[serde(default)]
    pub is_pub: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub type_spec: Option<TypeSpec>,
    pub value: Expr,
    pub range: InputRange,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionParameterDeclaration {
    pub name: Ident,
    /// Only the `self` receiver of a method may omit its type.
    #[serde(default)]
    pub type_spec: Option<TypeSpec>,
    #[serde(default)]
    pub default_value: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDeclaration {
    pub name: Ident,
    #[serde(default)]
    pub is_pub: bool,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub description: String,
    pub parameters: Vec<FunctionParameterDeclaration>,
    pub return_type: TypeSpec,
    pub body: Expr,
    pub range: InputRange,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructField {
    pub name: Ident,
    pub type_spec: TypeSpec,
    #[serde(default)]
    pub description: String,
    /// A field with a default is an optional constructor argument.
    #[serde(default)]
    pub default_value: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructDeclaration {
    pub name: Ident,
    #[serde(default)]
    pub is_pub: bool,
    #[serde(default)]
    pub description: String,
    pub fields: Vec<StructField>,
    pub range: InputRange,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeAliasDeclaration {
    pub name: Ident,
    #[serde(default)]
    pub is_pub: bool,
    #[serde(default)]
    pub description: String,
    pub type_spec: TypeSpec,
    pub range: InputRange,
}

/// `impl StructName { fn method(self, ...) ... }`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImplDeclaration {
    pub name: Ident,
    pub methods: Vec<FunctionDeclaration>,
    pub range: InputRange,
}

/// `impl operators StructName { fn add(a, b) ... }`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImplOperatorsDeclaration {
    pub name: Ident,
    pub functions: Vec<FunctionDeclaration>,
    pub range: InputRange,
}
