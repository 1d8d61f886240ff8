//! Type annotations as written in source.

use std::fmt;

use serde::{Deserialize, Serialize};
use to2_common::InputRange;

use crate::context::ModuleScope;
use crate::ty::{FunctionParameter, FunctionType, RealizedType, RecordType, To2Type};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    #[serde(flatten)]
    pub kind: TypeSpecKind,
    pub range: InputRange,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSpecItem {
    pub name: String,
    pub type_spec: TypeSpec,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum TypeSpecKind {
    /// `name`, `module::Name` or `Name<A, B>`.
    Named {
        #[serde(default)]
        namespace: Option<String>,
        name: String,
        #[serde(default)]
        generic_args: Vec<TypeSpec>,
    },
    Array {
        element: Box<TypeSpec>,
    },
    Option {
        inner: Box<TypeSpec>,
    },
    Result {
        ok: Box<TypeSpec>,
        err: Box<TypeSpec>,
    },
    Tuple {
        items: Vec<TypeSpec>,
    },
    Record {
        items: Vec<RecordSpecItem>,
    },
    Function {
        #[serde(default)]
        is_async: bool,
        parameters: Vec<TypeSpec>,
        return_type: Box<TypeSpec>,
    },
}

impl TypeSpec {
    pub fn new(kind: TypeSpecKind, range: InputRange) -> Self {
        TypeSpec { kind, range }
    }

    pub fn named(name: &str, range: InputRange) -> Self {
        TypeSpec::new(
            TypeSpecKind::Named {
                namespace: None,
                name: name.to_string(),
                generic_args: Vec::new(),
            },
            range,
        )
    }

    /// Resolve without reporting anything. Unresolvable names and wrong
    /// generic argument counts become `Unknown`.
    pub fn resolve(&self, scope: &ModuleScope<'_>) -> RealizedType {
        let ctx = scope.root();
        match &self.kind {
            TypeSpecKind::Named {
                namespace,
                name,
                generic_args,
            } => {
                let Some(base) = scope.find_type(namespace.as_deref(), name) else {
                    return RealizedType::Unknown;
                };
                if generic_args.is_empty() {
                    return base;
                }
                if base.generic_parameter_names(ctx).len() != generic_args.len() {
                    return RealizedType::Unknown;
                }
                let args: Vec<RealizedType> =
                    generic_args.iter().map(|a| a.resolve(scope)).collect();
                base.fill_generic_arguments(ctx, &args)
            }
            TypeSpecKind::Array { element } => RealizedType::array(element.resolve(scope)),
            TypeSpecKind::Option { inner } => RealizedType::option(inner.resolve(scope)),
            TypeSpecKind::Result { ok, err } => {
                RealizedType::result(ok.resolve(scope), err.resolve(scope))
            }
            TypeSpecKind::Tuple { items } => {
                RealizedType::Tuple(items.iter().map(|t| t.resolve(scope)).collect())
            }
            TypeSpecKind::Record { items } => RealizedType::Record(RecordType {
                struct_name: None,
                items: items
                    .iter()
                    .map(|item| (item.name.clone(), item.type_spec.resolve(scope)))
                    .collect(),
            }),
            TypeSpecKind::Function {
                is_async,
                parameters,
                return_type,
            } => RealizedType::Function(FunctionType {
                is_async: *is_async,
                generic_parameters: Vec::new(),
                parameters: parameters
                    .iter()
                    .enumerate()
                    .map(|(i, p)| FunctionParameter::new(format!("arg{}", i), p.resolve(scope)))
                    .collect(),
                return_type: Box::new(return_type.resolve(scope)),
            }),
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, items: &[TypeSpec]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", item)?;
            }
            Ok(())
        }

        match &self.kind {
            TypeSpecKind::Named {
                namespace,
                name,
                generic_args,
            } => {
                if let Some(namespace) = namespace {
                    write!(f, "{}::", namespace)?;
                }
                write!(f, "{}", name)?;
                if !generic_args.is_empty() {
                    write!(f, "<")?;
                    list(f, generic_args)?;
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeSpecKind::Array { element } => write!(f, "{}[]", element),
            TypeSpecKind::Option { inner } => write!(f, "Option<{}>", inner),
            TypeSpecKind::Result { ok, err } => write!(f, "Result<{}, {}>", ok, err),
            TypeSpecKind::Tuple { items } => {
                write!(f, "(")?;
                list(f, items)?;
                write!(f, ")")
            }
            TypeSpecKind::Record { items } => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} : {}", item.name, item.type_spec)?;
                }
                write!(f, ")")
            }
            TypeSpecKind::Function {
                is_async,
                parameters,
                return_type,
            } => {
                if *is_async {
                    write!(f, "async ")?;
                }
                write!(f, "fn(")?;
                list(f, parameters)?;
                write!(f, ") -> {}", return_type)
            }
        }
    }
}

impl To2Type for TypeSpec {
    fn name(&self) -> String {
        self.to_string()
    }

    fn local_name(&self) -> String {
        match &self.kind {
            TypeSpecKind::Named { name, .. } => name.clone(),
            _ => self.to_string(),
        }
    }

    fn realized_type(&self, scope: &ModuleScope<'_>) -> RealizedType {
        self.resolve(scope)
    }
}
