//! Serialized type descriptors and their resolution into realized types.
//!
//! A [`TypeRef`] is the form in which the registry (and anything else that
//! serializes types) refers to a type. [`resolve_type_ref`] turns it into a
//! [`RealizedType`] against a registry and an optional generic substitution
//! map. Resolution never fails loudly: unknown modules or type names become
//! [`RealizedType::Unknown`], as does a generic placeholder missing from the
//! substitution map, which is expected while inference is still in flight.

use serde::{Deserialize, Serialize};

use crate::registry::Registry;
use crate::ty::{
    BoundType, FunctionParameter, FunctionType, GenericMap, QualifiedName, RealizedType,
    RecordType,
};

/// A serialized type reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TypeRef {
    /// One of the builtin types (`int`, `float`, `bool`, `string`, `Unit`)
    /// or a prelude type (`Cell`, `ArrayBuilder`, `Range`).
    Builtin { name: String },
    /// A generic placeholder such as `T`.
    Generic { name: String },
    /// A type exported by a registry module, optionally with type arguments.
    #[serde(rename_all = "camelCase")]
    Standard {
        module: String,
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        generic_args: Vec<TypeRef>,
    },
    Array { param: Box<TypeRef> },
    Option { param: Box<TypeRef> },
    Result {
        param1: Box<TypeRef>,
        param2: Box<TypeRef>,
    },
    Tuple { params: Vec<TypeRef> },
    Record {
        names: Vec<String>,
        params: Vec<TypeRef>,
    },
    #[serde(rename_all = "camelCase")]
    Function {
        #[serde(default)]
        is_async: bool,
        params: Vec<TypeRef>,
        return_type: Box<TypeRef>,
    },
}

impl TypeRef {
    pub fn builtin(name: &str) -> TypeRef {
        TypeRef::Builtin {
            name: name.to_string(),
        }
    }

    pub fn generic(name: &str) -> TypeRef {
        TypeRef::Generic {
            name: name.to_string(),
        }
    }

    pub fn standard(module: &str, name: &str) -> TypeRef {
        TypeRef::Standard {
            module: module.to_string(),
            name: name.to_string(),
            generic_args: Vec::new(),
        }
    }

    /// A builtin or prelude type applied to type arguments, e.g. `Cell<T>`.
    pub fn builtin_with(name: &str, args: Vec<TypeRef>) -> TypeRef {
        TypeRef::Standard {
            module: String::new(),
            name: name.to_string(),
            generic_args: args,
        }
    }

    pub fn array(param: TypeRef) -> TypeRef {
        TypeRef::Array {
            param: Box::new(param),
        }
    }

    pub fn option(param: TypeRef) -> TypeRef {
        TypeRef::Option {
            param: Box::new(param),
        }
    }

    pub fn result(ok: TypeRef, err: TypeRef) -> TypeRef {
        TypeRef::Result {
            param1: Box::new(ok),
            param2: Box::new(err),
        }
    }

    pub fn function(params: Vec<TypeRef>, return_type: TypeRef) -> TypeRef {
        TypeRef::Function {
            is_async: false,
            params,
            return_type: Box::new(return_type),
        }
    }
}

/// Resolve a serialized type reference into a realized type.
pub fn resolve_type_ref(
    registry: &Registry,
    type_ref: &TypeRef,
    generic_map: Option<&GenericMap>,
) -> RealizedType {
    let resolve = |inner: &TypeRef| resolve_type_ref(registry, inner, generic_map);

    match type_ref {
        TypeRef::Builtin { name } => match registry.builtin_type(name) {
            Some(_) => RealizedType::Standard(QualifiedName::builtin(name)),
            None => RealizedType::Unknown,
        },
        TypeRef::Generic { name } => generic_map
            .and_then(|map| map.get(name))
            .cloned()
            .unwrap_or(RealizedType::Unknown),
        TypeRef::Standard {
            module,
            name,
            generic_args,
        } => {
            if registry.find_type(module, name).is_none() {
                return RealizedType::Unknown;
            }
            let base = QualifiedName::new(module, name);
            if generic_args.is_empty() {
                RealizedType::Standard(base)
            } else {
                RealizedType::Bound(BoundType {
                    base,
                    arguments: generic_args.iter().map(resolve).collect(),
                })
            }
        }
        TypeRef::Array { param } => RealizedType::Array(Box::new(resolve(param))),
        TypeRef::Option { param } => RealizedType::Option(Box::new(resolve(param))),
        TypeRef::Result { param1, param2 } => {
            RealizedType::Result(Box::new(resolve(param1)), Box::new(resolve(param2)))
        }
        TypeRef::Tuple { params } => RealizedType::Tuple(params.iter().map(resolve).collect()),
        TypeRef::Record { names, params } => RealizedType::Record(RecordType {
            struct_name: None,
            items: names
                .iter()
                .cloned()
                .zip(params.iter().map(resolve))
                .collect(),
        }),
        TypeRef::Function {
            is_async,
            params,
            return_type,
        } => RealizedType::Function(FunctionType {
            is_async: *is_async,
            generic_parameters: Vec::new(),
            parameters: params
                .iter()
                .enumerate()
                .map(|(i, p)| FunctionParameter::new(format!("arg{}", i), resolve(p)))
                .collect(),
            return_type: Box::new(resolve(return_type)),
        }),
    }
}
