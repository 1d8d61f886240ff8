//! Realized types: the fully resolved form every assignability, member and
//! operator query runs against.
//!
//! `RealizedType` is a closed enum. Instances coming from the registry are
//! plain qualified names pointing at shared descriptors; instances built
//! during validation (arrays, tuples, filled generics) are cheap values
//! compared structurally.
//!
//! Generic operations live in `generics.rs`, member and operator lookup in
//! `members.rs`.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::context::{ModuleContext, ModuleScope};
use crate::registry::TypeDescriptor;
use crate::typeref::resolve_type_ref;

/// Substitution map from generic placeholder name to realized type.
pub type GenericMap = FxHashMap<String, RealizedType>;

/// A type name qualified by its module. Builtin and prelude types have an
/// empty module.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QualifiedName {
    pub module: String,
    pub name: String,
}

impl QualifiedName {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        QualifiedName {
            module: module.into(),
            name: name.into(),
        }
    }

    pub fn builtin(name: impl Into<String>) -> Self {
        QualifiedName::new(String::new(), name)
    }

    pub fn is_builtin(&self) -> bool {
        self.module.is_empty()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}::{}", self.module, self.name)
        }
    }
}

/// A registry generic type with positional type arguments: `Cell<int>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoundType {
    pub base: QualifiedName,
    pub arguments: Vec<RealizedType>,
}

/// An anonymous record, or a module-local struct when `struct_name` is set.
///
/// Item order is declaration order and drives display and constructor
/// argument order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordType {
    pub struct_name: Option<QualifiedName>,
    pub items: Vec<(String, RealizedType)>,
}

impl RecordType {
    pub fn item(&self, name: &str) -> Option<&RealizedType> {
        self.items.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionParameter {
    pub name: String,
    pub ty: RealizedType,
    pub has_default: bool,
}

impl FunctionParameter {
    pub fn new(name: impl Into<String>, ty: RealizedType) -> Self {
        FunctionParameter {
            name: name.into(),
            ty,
            has_default: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub is_async: bool,
    /// Generic placeholders still open on this signature.
    pub generic_parameters: Vec<String>,
    pub parameters: Vec<FunctionParameter>,
    pub return_type: Box<RealizedType>,
}

impl FunctionType {
    pub fn new(parameters: Vec<FunctionParameter>, return_type: RealizedType) -> Self {
        FunctionType {
            is_async: false,
            generic_parameters: Vec::new(),
            parameters,
            return_type: Box::new(return_type),
        }
    }

    /// Number of parameters without a default value.
    pub fn required_parameters(&self) -> usize {
        self.parameters.iter().filter(|p| !p.has_default).count()
    }
}

/// A fully resolved TO2 type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RealizedType {
    /// Resolution failed. Never produces further diagnostics.
    Unknown,
    /// A registry type by qualified name, possibly generic and unbound.
    Standard(QualifiedName),
    /// A registry generic type with its arguments bound.
    Bound(BoundType),
    Array(Box<RealizedType>),
    Tuple(Vec<RealizedType>),
    Record(RecordType),
    Option(Box<RealizedType>),
    Result(Box<RealizedType>, Box<RealizedType>),
    Function(FunctionType),
    /// An open generic placeholder such as `T`.
    Generic(String),
}

impl RealizedType {
    pub fn int() -> RealizedType {
        RealizedType::Standard(QualifiedName::builtin("int"))
    }

    pub fn float() -> RealizedType {
        RealizedType::Standard(QualifiedName::builtin("float"))
    }

    pub fn bool() -> RealizedType {
        RealizedType::Standard(QualifiedName::builtin("bool"))
    }

    pub fn string() -> RealizedType {
        RealizedType::Standard(QualifiedName::builtin("string"))
    }

    pub fn unit() -> RealizedType {
        RealizedType::Standard(QualifiedName::builtin("Unit"))
    }

    pub fn range() -> RealizedType {
        RealizedType::Standard(QualifiedName::builtin("Range"))
    }

    pub fn standard(module: &str, name: &str) -> RealizedType {
        RealizedType::Standard(QualifiedName::new(module, name))
    }

    pub fn bound(base: QualifiedName, arguments: Vec<RealizedType>) -> RealizedType {
        RealizedType::Bound(BoundType { base, arguments })
    }

    pub fn generic(name: &str) -> RealizedType {
        RealizedType::Generic(name.to_string())
    }

    pub fn array(element: RealizedType) -> RealizedType {
        RealizedType::Array(Box::new(element))
    }

    pub fn option(inner: RealizedType) -> RealizedType {
        RealizedType::Option(Box::new(inner))
    }

    pub fn result(ok: RealizedType, err: RealizedType) -> RealizedType {
        RealizedType::Result(Box::new(ok), Box::new(err))
    }

    /// A function type with positional parameters named `arg0`, `arg1`, ...
    pub fn function(parameters: Vec<RealizedType>, return_type: RealizedType) -> RealizedType {
        RealizedType::Function(FunctionType::new(
            parameters
                .into_iter()
                .enumerate()
                .map(|(i, ty)| FunctionParameter::new(format!("arg{}", i), ty))
                .collect(),
            return_type,
        ))
    }

    /// An anonymous record.
    pub fn record(items: Vec<(&str, RealizedType)>) -> RealizedType {
        RealizedType::Record(RecordType {
            struct_name: None,
            items: items
                .into_iter()
                .map(|(name, ty)| (name.to_string(), ty))
                .collect(),
        })
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, RealizedType::Unknown)
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, RealizedType::Standard(q) if q.is_builtin() && q.name == "Unit")
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, RealizedType::Standard(q) if q.is_builtin() && q.name == "bool")
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            RealizedType::Function(f) => Some(f),
            _ => None,
        }
    }

    /// The registry descriptor behind a `Standard` or `Bound` type.
    pub fn descriptor<'r>(&self, ctx: &'r ModuleContext) -> Option<&'r TypeDescriptor> {
        match self {
            RealizedType::Standard(q) => ctx.registry.find_type(&q.module, &q.name),
            RealizedType::Bound(b) => ctx.registry.find_type(&b.base.module, &b.base.name),
            _ => None,
        }
    }

    /// Human readable description, used for hover text.
    pub fn description(&self, ctx: &ModuleContext) -> String {
        match self.descriptor(ctx) {
            Some(desc) if !desc.description.is_empty() => {
                format!("{}\n\n{}", self, desc.description)
            }
            _ => self.to_string(),
        }
    }

    /// Whether a value of type `other` may be stored where `self` is
    /// expected.
    ///
    /// `Unknown` and open generics are compatible with everything, so an
    /// already reported failure never causes a second mismatch.
    pub fn is_assignable_from(&self, ctx: &ModuleContext, other: &RealizedType) -> bool {
        use RealizedType::*;

        match (self, other) {
            (Unknown, _) | (_, Unknown) | (Generic(_), _) | (_, Generic(_)) => true,
            (Standard(_) | Bound(_), _) if self.descriptor_accepts(ctx, other) => true,
            (Standard(a), Standard(b)) => a == b,
            (Standard(a), Bound(b)) => *a == b.base,
            (Bound(a), Standard(b)) => a.base == *b,
            (Bound(a), Bound(b)) => {
                a.base == b.base
                    && a.arguments.len() == b.arguments.len()
                    && a.arguments
                        .iter()
                        .zip(&b.arguments)
                        .all(|(x, y)| x.is_assignable_from(ctx, y))
            }
            (Array(a), Array(b)) => a.is_assignable_from(ctx, b),
            (Option(a), Option(b)) => a.is_assignable_from(ctx, b),
            (Result(a_ok, a_err), Result(b_ok, b_err)) => {
                a_ok.is_assignable_from(ctx, b_ok) && a_err.is_assignable_from(ctx, b_err)
            }
            (Tuple(a), Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.is_assignable_from(ctx, y))
            }
            (Record(a), Record(b)) => match (&a.struct_name, &b.struct_name) {
                (Some(x), Some(y)) => x == y,
                // A named struct accepts an anonymous record with compatible
                // fields. Local structs use their canonical field list;
                // `a.items` may be a snapshot taken before it was filled.
                (Some(name), None) => {
                    let fields = ctx
                        .struct_impl(name)
                        .map(|imp| imp.fields.as_slice())
                        .unwrap_or(a.items.as_slice());
                    record_covers(ctx, fields, b)
                }
                (None, _) => record_covers(ctx, &a.items, b),
            },
            (Function(a), Function(b)) => {
                a.parameters.len() == b.parameters.len()
                    && a.parameters
                        .iter()
                        .zip(&b.parameters)
                        .all(|(x, y)| y.ty.is_assignable_from(ctx, &x.ty))
                    && (a.return_type.is_unit()
                        || a.return_type.is_assignable_from(ctx, &b.return_type))
            }
            _ => false,
        }
    }

    /// Coercions declared on the target descriptor: `assignableFromAny` or
    /// an explicit `assignableFrom` source list.
    fn descriptor_accepts(&self, ctx: &ModuleContext, other: &RealizedType) -> bool {
        let Some(desc) = self.descriptor(ctx) else {
            return false;
        };
        desc.assignable_from_any
            || desc
                .assignable_from
                .iter()
                .any(|source| resolve_type_ref(&ctx.registry, source, None) == *other)
    }

    /// Display name without the module prefix.
    pub fn local_name(&self) -> String {
        match self {
            RealizedType::Standard(q) => q.name.clone(),
            RealizedType::Bound(b) => format!("{}<{}>", b.base.name, join(&b.arguments)),
            RealizedType::Record(RecordType {
                struct_name: Some(q),
                ..
            }) => q.name.clone(),
            other => other.to_string(),
        }
    }
}

/// Whether `record` has every field of `fields` with an assignable type.
fn record_covers(
    ctx: &ModuleContext,
    fields: &[(String, RealizedType)],
    record: &RecordType,
) -> bool {
    fields.iter().all(|(name, ty)| {
        record
            .item(name)
            .map(|actual| ty.is_assignable_from(ctx, actual))
            .unwrap_or(false)
    })
}

fn join(types: &[RealizedType]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_async {
            write!(f, "async ")?;
        }
        write!(f, "fn")?;
        if !self.generic_parameters.is_empty() {
            write!(f, "<{}>", self.generic_parameters.join(", "))?;
        }
        write!(f, "(")?;
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p.ty)?;
        }
        write!(f, ") -> {}", self.return_type)
    }
}

impl fmt::Display for RealizedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RealizedType::Unknown => write!(f, "<unknown>"),
            RealizedType::Standard(q) => write!(f, "{}", q),
            RealizedType::Bound(b) => write!(f, "{}<{}>", b.base, join(&b.arguments)),
            RealizedType::Array(element) => match element.as_ref() {
                RealizedType::Function(_) => write!(f, "({})[]", element),
                _ => write!(f, "{}[]", element),
            },
            RealizedType::Tuple(items) => write!(f, "({})", join(items)),
            RealizedType::Record(record) => match &record.struct_name {
                Some(q) => write!(f, "{}", q),
                None => {
                    write!(f, "(")?;
                    for (i, (name, ty)) in record.items.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{} : {}", name, ty)?;
                    }
                    write!(f, ")")
                }
            },
            RealizedType::Option(inner) => write!(f, "Option<{}>", inner),
            RealizedType::Result(ok, err) => write!(f, "Result<{}, {}>", ok, err),
            RealizedType::Function(func) => write!(f, "{}", func),
            RealizedType::Generic(name) => write!(f, "{}", name),
        }
    }
}

impl Serialize for RealizedType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Anything that names a TO2 type and can be resolved to a realized type.
///
/// Implemented by realized types themselves (resolution is the identity)
/// and by type annotations in the AST.
pub trait To2Type {
    fn name(&self) -> String;

    fn local_name(&self) -> String;

    fn realized_type(&self, scope: &ModuleScope<'_>) -> RealizedType;
}

impl To2Type for RealizedType {
    fn name(&self) -> String {
        self.to_string()
    }

    fn local_name(&self) -> String {
        RealizedType::local_name(self)
    }

    fn realized_type(&self, _scope: &ModuleScope<'_>) -> RealizedType {
        self.clone()
    }
}
