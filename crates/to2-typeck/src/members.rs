//! Field, method and operator lookup on realized types.
//!
//! Registry types answer from their descriptor, resolved against the
//! type's current generic arguments at lookup time, so `Cell<int>` and
//! `Cell<string>` share one descriptor. Arrays, options, results and tuples
//! have fixed member tables. Module-local structs answer from the impl
//! tables in the [`ModuleContext`].

use crate::context::{ModuleContext, OperatorEntry, StructImpl};
use crate::operator::Operator;
use crate::registry::{MethodDescriptor, OperatorDescriptor};
use crate::side_table::DefinitionRef;
use crate::ty::{FunctionParameter, FunctionType, GenericMap, RealizedType};
use crate::typeref::resolve_type_ref;

#[derive(Clone, Debug, PartialEq)]
pub struct FieldInfo {
    pub ty: RealizedType,
    pub read_only: bool,
    pub description: String,
    pub definition: Option<DefinitionRef>,
}

impl FieldInfo {
    fn plain(ty: RealizedType, read_only: bool, description: &str) -> Self {
        FieldInfo {
            ty,
            read_only,
            description: description.to_string(),
            definition: None,
        }
    }
}

/// A method signature, without the receiver.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodInfo {
    pub signature: FunctionType,
    pub description: String,
    pub definition: Option<DefinitionRef>,
}

impl MethodInfo {
    fn plain(signature: FunctionType, description: &str) -> Self {
        MethodInfo {
            signature,
            description: description.to_string(),
            definition: None,
        }
    }
}

/// The overload an operator lookup settled on.
#[derive(Clone, Debug, PartialEq)]
pub struct OperatorMatch {
    pub other_type: RealizedType,
    pub result_type: RealizedType,
    pub definition: Option<DefinitionRef>,
}

const ARRAY_FIELDS: &[&str] = &["is_empty", "length"];
const ARRAY_METHODS: &[&str] = &[
    "exists",
    "filter",
    "find",
    "map",
    "reverse",
    "slice",
    "to_string",
];
const OPTION_FIELDS: &[&str] = &["defined", "value"];
const OPTION_METHODS: &[&str] = &["map", "ok_or", "value_or"];
const RESULT_FIELDS: &[&str] = &["error", "success", "value"];
const RESULT_METHODS: &[&str] = &["map", "map_err"];

fn param(name: &str, ty: RealizedType) -> FunctionParameter {
    FunctionParameter::new(name, ty)
}

fn signature(generics: &[&str], parameters: Vec<FunctionParameter>, ret: RealizedType) -> FunctionType {
    FunctionType {
        is_async: false,
        generic_parameters: generics.iter().map(|g| g.to_string()).collect(),
        parameters,
        return_type: Box::new(ret),
    }
}

fn predicate(element: &RealizedType) -> RealizedType {
    RealizedType::function(vec![element.clone()], RealizedType::bool())
}

fn mapper(from: &RealizedType, to: &str) -> RealizedType {
    RealizedType::function(vec![from.clone()], RealizedType::generic(to))
}

impl RealizedType {
    /// Generic bindings of a bound registry type, by parameter name.
    pub fn type_generic_map(&self, ctx: &ModuleContext) -> GenericMap {
        match (self, self.descriptor(ctx)) {
            (RealizedType::Bound(b), Some(desc)) => desc
                .generic_parameters
                .iter()
                .cloned()
                .zip(b.arguments.iter().cloned())
                .collect(),
            _ => GenericMap::default(),
        }
    }

    fn local_struct<'c>(&self, ctx: &'c ModuleContext) -> Option<&'c StructImpl> {
        match self {
            RealizedType::Record(record) => ctx.struct_impl(record.struct_name.as_ref()?),
            _ => None,
        }
    }

    pub fn find_field(&self, ctx: &ModuleContext, name: &str) -> Option<FieldInfo> {
        match self {
            RealizedType::Array(_) => match name {
                "length" => Some(FieldInfo::plain(RealizedType::int(), true, "Length of the array")),
                "is_empty" => Some(FieldInfo::plain(RealizedType::bool(), true, "Check if the array is empty")),
                _ => None,
            },
            RealizedType::Option(inner) => match name {
                "defined" => Some(FieldInfo::plain(RealizedType::bool(), true, "Check if the option has a value")),
                "value" => Some(FieldInfo::plain((**inner).clone(), true, "Value of the option")),
                _ => None,
            },
            RealizedType::Result(ok, err) => match name {
                "success" => Some(FieldInfo::plain(RealizedType::bool(), true, "Check if the result is successful")),
                "value" => Some(FieldInfo::plain((**ok).clone(), true, "Successful value")),
                "error" => Some(FieldInfo::plain((**err).clone(), true, "Error value")),
                _ => None,
            },
            RealizedType::Tuple(items) => {
                let index: usize = name.strip_prefix('_')?.parse().ok()?;
                let ty = items.get(index.checked_sub(1)?)?;
                Some(FieldInfo::plain(ty.clone(), false, ""))
            }
            RealizedType::Record(record) => match self.local_struct(ctx) {
                Some(imp) => {
                    let (_, ty) = imp.fields.iter().find(|(n, _)| n == name)?;
                    Some(FieldInfo {
                        ty: ty.clone(),
                        read_only: false,
                        description: imp.field_descriptions.get(name).cloned().unwrap_or_default(),
                        definition: imp.field_definitions.get(name).cloned(),
                    })
                }
                None => record
                    .item(name)
                    .map(|ty| FieldInfo::plain(ty.clone(), false, "")),
            },
            RealizedType::Standard(_) | RealizedType::Bound(_) => {
                let desc = self.descriptor(ctx)?;
                let field = desc.fields.get(name)?;
                let map = self.type_generic_map(ctx);
                Some(FieldInfo::plain(
                    resolve_type_ref(&ctx.registry, &field.field_type, Some(&map)),
                    field.read_only,
                    &field.description,
                ))
            }
            RealizedType::Unknown | RealizedType::Function(_) | RealizedType::Generic(_) => None,
        }
    }

    /// All field names, sorted.
    pub fn all_field_names(&self, ctx: &ModuleContext) -> Vec<String> {
        let mut names: Vec<String> = match self {
            RealizedType::Array(_) => ARRAY_FIELDS.iter().map(|s| s.to_string()).collect(),
            RealizedType::Option(_) => OPTION_FIELDS.iter().map(|s| s.to_string()).collect(),
            RealizedType::Result(..) => RESULT_FIELDS.iter().map(|s| s.to_string()).collect(),
            RealizedType::Tuple(items) => (1..=items.len()).map(|i| format!("_{}", i)).collect(),
            RealizedType::Record(record) => match self.local_struct(ctx) {
                Some(imp) => imp.fields.iter().map(|(n, _)| n.clone()).collect(),
                None => record.items.iter().map(|(n, _)| n.clone()).collect(),
            },
            RealizedType::Standard(_) | RealizedType::Bound(_) => self
                .descriptor(ctx)
                .map(|desc| desc.fields.keys().cloned().collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        names.sort();
        names
    }

    pub fn find_method(&self, ctx: &ModuleContext, name: &str) -> Option<MethodInfo> {
        match self {
            RealizedType::Array(element) => array_method(element, name),
            RealizedType::Option(inner) => {
                let inner = inner.as_ref();
                let sig = match name {
                    "map" => signature(
                        &["U"],
                        vec![param("mapper", mapper(inner, "U"))],
                        RealizedType::option(RealizedType::generic("U")),
                    ),
                    "value_or" => signature(&[], vec![param("default", inner.clone())], inner.clone()),
                    "ok_or" => signature(
                        &["E"],
                        vec![param("error", RealizedType::generic("E"))],
                        RealizedType::result(inner.clone(), RealizedType::generic("E")),
                    ),
                    _ => return None,
                };
                Some(MethodInfo::plain(sig, ""))
            }
            RealizedType::Result(ok, err) => {
                let sig = match name {
                    "map" => signature(
                        &["U"],
                        vec![param("mapper", mapper(ok, "U"))],
                        RealizedType::result(RealizedType::generic("U"), (**err).clone()),
                    ),
                    "map_err" => signature(
                        &["F"],
                        vec![param("mapper", mapper(err, "F"))],
                        RealizedType::result((**ok).clone(), RealizedType::generic("F")),
                    ),
                    _ => return None,
                };
                Some(MethodInfo::plain(sig, ""))
            }
            RealizedType::Record(_) => {
                let method = self.local_struct(ctx)?.methods.get(name)?;
                let signature = method.ty.as_function()?.clone();
                Some(MethodInfo {
                    signature,
                    description: method.description.clone(),
                    definition: method.definition.clone(),
                })
            }
            RealizedType::Standard(_) | RealizedType::Bound(_) => {
                let desc = self.descriptor(ctx)?;
                let method = desc.methods.get(name)?;
                Some(MethodInfo::plain(
                    self.realize_method(ctx, method),
                    &method.description,
                ))
            }
            _ => None,
        }
    }

    /// Resolve a descriptor method against this type's generic bindings,
    /// leaving the method's own generic parameters open.
    fn realize_method(&self, ctx: &ModuleContext, method: &MethodDescriptor) -> FunctionType {
        let mut map = self.type_generic_map(ctx);
        for g in &method.generic_parameters {
            map.insert(g.clone(), RealizedType::Generic(g.clone()));
        }
        FunctionType {
            is_async: method.is_async,
            generic_parameters: method.generic_parameters.clone(),
            parameters: method
                .parameters
                .iter()
                .map(|p| FunctionParameter {
                    name: p.name.clone(),
                    ty: resolve_type_ref(&ctx.registry, &p.param_type, Some(&map)),
                    has_default: p.has_default,
                })
                .collect(),
            return_type: Box::new(resolve_type_ref(&ctx.registry, &method.return_type, Some(&map))),
        }
    }

    /// All method names, sorted.
    pub fn all_method_names(&self, ctx: &ModuleContext) -> Vec<String> {
        let names: &[&str] = match self {
            RealizedType::Array(_) => ARRAY_METHODS,
            RealizedType::Option(_) => OPTION_METHODS,
            RealizedType::Result(..) => RESULT_METHODS,
            RealizedType::Record(_) => {
                return self
                    .local_struct(ctx)
                    .map(|imp| imp.methods.keys().cloned().collect())
                    .unwrap_or_default()
            }
            RealizedType::Standard(_) | RealizedType::Bound(_) => {
                return self
                    .descriptor(ctx)
                    .map(|desc| desc.methods.keys().cloned().collect())
                    .unwrap_or_default()
            }
            _ => &[],
        };
        names.iter().map(|s| s.to_string()).collect()
    }

    /// Operator with `self` on the left: `self op rhs`.
    pub fn find_suffix_operator(
        &self,
        ctx: &ModuleContext,
        op: Operator,
        rhs: &RealizedType,
    ) -> Option<OperatorMatch> {
        if let Some(imp) = self.local_struct(ctx) {
            return match_entries(ctx, imp.suffix_operators.get(&op)?, rhs);
        }
        let desc = self.descriptor(ctx)?;
        self.match_descriptors(ctx, desc.suffix_operators.get(op.symbol())?, rhs)
    }

    /// Operator with `self` on the right: `lhs op self`. A unary operator is
    /// looked up here with `lhs` = `Unit`.
    pub fn find_prefix_operator(
        &self,
        ctx: &ModuleContext,
        op: Operator,
        lhs: &RealizedType,
    ) -> Option<OperatorMatch> {
        if let Some(imp) = self.local_struct(ctx) {
            return match_entries(ctx, imp.prefix_operators.get(&op)?, lhs);
        }
        let desc = self.descriptor(ctx)?;
        self.match_descriptors(ctx, desc.prefix_operators.get(op.symbol())?, lhs)
    }

    fn match_descriptors(
        &self,
        ctx: &ModuleContext,
        overloads: &[OperatorDescriptor],
        other: &RealizedType,
    ) -> Option<OperatorMatch> {
        let map = self.type_generic_map(ctx);
        let entries: Vec<OperatorEntry> = overloads
            .iter()
            .map(|o| OperatorEntry {
                other_type: resolve_type_ref(&ctx.registry, &o.other_type, Some(&map)),
                result_type: resolve_type_ref(&ctx.registry, &o.result_type, Some(&map)),
                definition: None,
            })
            .collect();
        match_entries(ctx, &entries, other)
    }

    /// Element type produced when used as a `for` loop source.
    pub fn for_in_source(&self, ctx: &ModuleContext) -> Option<RealizedType> {
        match self {
            RealizedType::Array(element) => Some((**element).clone()),
            RealizedType::Standard(_) | RealizedType::Bound(_) => {
                let desc = self.descriptor(ctx)?;
                let source = desc.for_in_source.as_ref()?;
                Some(resolve_type_ref(&ctx.registry, source, Some(&self.type_generic_map(ctx))))
            }
            _ => None,
        }
    }

    /// Element type produced by `self[int]`, if indexing is supported.
    pub fn support_index_access(&self, ctx: &ModuleContext) -> Option<RealizedType> {
        match self {
            RealizedType::Array(element) => Some((**element).clone()),
            RealizedType::Standard(_) | RealizedType::Bound(_) => {
                let desc = self.descriptor(ctx)?;
                let access = desc.index_access.as_ref()?;
                Some(resolve_type_ref(&ctx.registry, access, Some(&self.type_generic_map(ctx))))
            }
            _ => None,
        }
    }
}

/// First entry whose other operand accepts `other`, in declaration order.
/// Entries taking `Unit` are unary and only match a `Unit` operand.
fn match_entries(
    ctx: &ModuleContext,
    entries: &[OperatorEntry],
    other: &RealizedType,
) -> Option<OperatorMatch> {
    entries
        .iter()
        .filter(|e| e.other_type.is_unit() == other.is_unit())
        .find(|e| e.other_type.is_assignable_from(ctx, other))
        .map(|e| OperatorMatch {
            other_type: e.other_type.clone(),
            result_type: e.result_type.clone(),
            definition: e.definition.clone(),
        })
}

fn array_method(element: &RealizedType, name: &str) -> Option<MethodInfo> {
    let array = || RealizedType::array(element.clone());
    let (sig, description) = match name {
        "map" => (
            signature(
                &["U"],
                vec![param("mapper", mapper(element, "U"))],
                RealizedType::array(RealizedType::generic("U")),
            ),
            "Map the content of the array",
        ),
        "filter" => (
            signature(&[], vec![param("predicate", predicate(element))], array()),
            "Filter the content of the array by a predicate",
        ),
        "exists" => (
            signature(&[], vec![param("predicate", predicate(element))], RealizedType::bool()),
            "Check if an item of the array matches a predicate",
        ),
        "find" => (
            signature(
                &[],
                vec![param("predicate", predicate(element))],
                RealizedType::option(element.clone()),
            ),
            "Find the first item of the array matching a predicate",
        ),
        "reverse" => (signature(&[], Vec::new(), array()), "Reversed copy of the array"),
        "slice" => (
            signature(
                &[],
                vec![
                    param("start", RealizedType::int()),
                    FunctionParameter {
                        has_default: true,
                        ..param("end", RealizedType::int())
                    },
                ],
                array(),
            ),
            "Get a slice of the array",
        ),
        "to_string" => (
            signature(&[], Vec::new(), RealizedType::string()),
            "Get string representation of the array",
        ),
        _ => return None,
    };
    Some(MethodInfo::plain(sig, description))
}
