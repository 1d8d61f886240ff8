//! Generic placeholders on realized types: detection, substitution and
//! guessing.
//!
//! Substitution comes in two flavors. [`RealizedType::fill_generics`] binds
//! by placeholder name and propagates through nested structures.
//! [`RealizedType::fill_generic_arguments`] binds positionally, the way an
//! explicit `ArrayBuilder<int>` or `foo<string>(...)` instantiates a type.
//!
//! [`RealizedType::guess_generic`] is a one-level structural unification:
//! containers are walked component by component, nominal registry types are
//! never unified.

use crate::context::ModuleContext;
use crate::ty::{BoundType, FunctionParameter, FunctionType, GenericMap, RealizedType, RecordType};

impl RealizedType {
    /// Whether the type still contains open generic placeholders.
    pub fn has_generics(&self, ctx: &ModuleContext) -> bool {
        match self {
            RealizedType::Unknown => false,
            RealizedType::Generic(_) => true,
            RealizedType::Standard(_) => self
                .descriptor(ctx)
                .map(|desc| !desc.generic_parameters.is_empty())
                .unwrap_or(false),
            RealizedType::Bound(b) => b.arguments.iter().any(|a| a.has_generics(ctx)),
            RealizedType::Array(element) | RealizedType::Option(element) => {
                element.has_generics(ctx)
            }
            RealizedType::Result(ok, err) => ok.has_generics(ctx) || err.has_generics(ctx),
            RealizedType::Tuple(items) => items.iter().any(|t| t.has_generics(ctx)),
            RealizedType::Record(record) => record.items.iter().any(|(_, t)| t.has_generics(ctx)),
            RealizedType::Function(f) => {
                !f.generic_parameters.is_empty()
                    || f.parameters.iter().any(|p| p.ty.has_generics(ctx))
                    || f.return_type.has_generics(ctx)
            }
        }
    }

    /// Names of the generic parameters that positional arguments bind.
    pub fn generic_parameter_names(&self, ctx: &ModuleContext) -> Vec<String> {
        match self {
            RealizedType::Standard(_) => self
                .descriptor(ctx)
                .map(|desc| desc.generic_parameters.clone())
                .unwrap_or_default(),
            RealizedType::Function(f) => f.generic_parameters.clone(),
            _ => Vec::new(),
        }
    }

    /// Substitute generic placeholders by name.
    ///
    /// Placeholders missing from `map` are left open, so a map that names
    /// none of the placeholders returns a structurally equal type.
    pub fn fill_generics(&self, ctx: &ModuleContext, map: &GenericMap) -> RealizedType {
        let fill = |t: &RealizedType| t.fill_generics(ctx, map);

        match self {
            RealizedType::Unknown => RealizedType::Unknown,
            RealizedType::Generic(name) => map.get(name).cloned().unwrap_or_else(|| self.clone()),
            RealizedType::Standard(q) => {
                let params = self.generic_parameter_names(ctx);
                if !params.iter().any(|p| map.contains_key(p)) {
                    return self.clone();
                }
                RealizedType::Bound(BoundType {
                    base: q.clone(),
                    arguments: params
                        .iter()
                        .map(|p| map.get(p).cloned().unwrap_or_else(|| RealizedType::Generic(p.clone())))
                        .collect(),
                })
            }
            RealizedType::Bound(b) => RealizedType::Bound(BoundType {
                base: b.base.clone(),
                arguments: b.arguments.iter().map(fill).collect(),
            }),
            RealizedType::Array(element) => RealizedType::Array(Box::new(fill(element))),
            RealizedType::Option(inner) => RealizedType::Option(Box::new(fill(inner))),
            RealizedType::Result(ok, err) => {
                RealizedType::Result(Box::new(fill(ok)), Box::new(fill(err)))
            }
            RealizedType::Tuple(items) => RealizedType::Tuple(items.iter().map(fill).collect()),
            RealizedType::Record(record) => RealizedType::Record(RecordType {
                struct_name: record.struct_name.clone(),
                items: record
                    .items
                    .iter()
                    .map(|(name, t)| (name.clone(), fill(t)))
                    .collect(),
            }),
            RealizedType::Function(f) => RealizedType::Function(FunctionType {
                is_async: f.is_async,
                generic_parameters: f
                    .generic_parameters
                    .iter()
                    .filter(|p| !map.contains_key(*p))
                    .cloned()
                    .collect(),
                parameters: f
                    .parameters
                    .iter()
                    .map(|p| FunctionParameter {
                        name: p.name.clone(),
                        ty: fill(&p.ty),
                        has_default: p.has_default,
                    })
                    .collect(),
                return_type: Box::new(fill(&f.return_type)),
            }),
        }
    }

    /// Bind generic parameters positionally.
    ///
    /// The caller checks the argument count against
    /// [`generic_parameter_names`](Self::generic_parameter_names); extra
    /// arguments are ignored and missing ones stay open.
    pub fn fill_generic_arguments(&self, ctx: &ModuleContext, arguments: &[RealizedType]) -> RealizedType {
        let names = self.generic_parameter_names(ctx);
        if names.is_empty() {
            return self.clone();
        }
        let map: GenericMap = names.into_iter().zip(arguments.iter().cloned()).collect();
        self.fill_generics(ctx, &map)
    }

    /// Unify the placeholders in `self` against an observed type, recording
    /// new bindings in `map`. Existing bindings are never overwritten and
    /// mismatched shapes are silently skipped; the caller reports them.
    pub fn guess_generic(&self, ctx: &ModuleContext, map: &mut GenericMap, actual: &RealizedType) {
        match (self, actual) {
            (_, RealizedType::Unknown) | (_, RealizedType::Generic(_)) => {}
            (RealizedType::Generic(name), _) => {
                if !map.contains_key(name) {
                    map.insert(name.clone(), actual.clone());
                }
            }
            (RealizedType::Array(a), RealizedType::Array(b))
            | (RealizedType::Option(a), RealizedType::Option(b)) => a.guess_generic(ctx, map, b),
            (RealizedType::Result(a_ok, a_err), RealizedType::Result(b_ok, b_err)) => {
                a_ok.guess_generic(ctx, map, b_ok);
                a_err.guess_generic(ctx, map, b_err);
            }
            (RealizedType::Tuple(a), RealizedType::Tuple(b)) => {
                for (x, y) in a.iter().zip(b) {
                    x.guess_generic(ctx, map, y);
                }
            }
            (RealizedType::Record(a), RealizedType::Record(b)) => {
                for ((_, x), (_, y)) in a.items.iter().zip(&b.items) {
                    x.guess_generic(ctx, map, y);
                }
            }
            (RealizedType::Function(a), RealizedType::Function(b)) => {
                for (x, y) in a.parameters.iter().zip(&b.parameters) {
                    x.ty.guess_generic(ctx, map, &y.ty);
                }
                a.return_type.guess_generic(ctx, map, &b.return_type);
            }
            _ => {}
        }
    }

    /// No `Unknown` and no open placeholder anywhere in the structure.
    pub fn is_concrete(&self) -> bool {
        match self {
            RealizedType::Unknown | RealizedType::Generic(_) => false,
            RealizedType::Standard(_) => true,
            RealizedType::Bound(b) => b.arguments.iter().all(RealizedType::is_concrete),
            RealizedType::Array(inner) | RealizedType::Option(inner) => inner.is_concrete(),
            RealizedType::Result(ok, err) => ok.is_concrete() && err.is_concrete(),
            RealizedType::Tuple(items) => items.iter().all(RealizedType::is_concrete),
            RealizedType::Record(record) => record.items.iter().all(|(_, t)| t.is_concrete()),
            RealizedType::Function(f) => {
                f.generic_parameters.is_empty()
                    && f.parameters.iter().all(|p| p.ty.is_concrete())
                    && f.return_type.is_concrete()
            }
        }
    }

    /// Replace any placeholder still open with `Unknown`.
    pub fn erase_generics(&self) -> RealizedType {
        match self {
            RealizedType::Generic(_) => RealizedType::Unknown,
            RealizedType::Unknown | RealizedType::Standard(_) => self.clone(),
            RealizedType::Bound(b) => RealizedType::Bound(BoundType {
                base: b.base.clone(),
                arguments: b.arguments.iter().map(RealizedType::erase_generics).collect(),
            }),
            RealizedType::Array(element) => RealizedType::Array(Box::new(element.erase_generics())),
            RealizedType::Option(inner) => RealizedType::Option(Box::new(inner.erase_generics())),
            RealizedType::Result(ok, err) => RealizedType::Result(
                Box::new(ok.erase_generics()),
                Box::new(err.erase_generics()),
            ),
            RealizedType::Tuple(items) => {
                RealizedType::Tuple(items.iter().map(RealizedType::erase_generics).collect())
            }
            RealizedType::Record(record) => RealizedType::Record(RecordType {
                struct_name: record.struct_name.clone(),
                items: record
                    .items
                    .iter()
                    .map(|(name, t)| (name.clone(), t.erase_generics()))
                    .collect(),
            }),
            RealizedType::Function(f) => RealizedType::Function(FunctionType {
                is_async: f.is_async,
                generic_parameters: Vec::new(),
                parameters: f
                    .parameters
                    .iter()
                    .map(|p| FunctionParameter {
                        name: p.name.clone(),
                        ty: p.ty.erase_generics(),
                        has_default: p.has_default,
                    })
                    .collect(),
                return_type: Box::new(f.return_type.erase_generics()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::registry::Registry;
    use crate::ty::QualifiedName;

    fn ctx() -> ModuleContext {
        ModuleContext::new(Arc::new(Registry::empty()), "test")
    }

    #[test]
    fn empty_map_is_a_no_op() {
        let ctx = ctx();
        let empty = GenericMap::default();
        let samples = [
            RealizedType::array(RealizedType::generic("T")),
            RealizedType::Tuple(vec![RealizedType::int(), RealizedType::generic("U")]),
            RealizedType::record(vec![("a", RealizedType::string()), ("b", RealizedType::generic("T"))]),
            RealizedType::standard("", "Cell"),
        ];
        for ty in samples {
            assert_eq!(ty.fill_generics(&ctx, &empty), ty);
        }
    }

    #[test]
    fn fill_by_name_propagates() {
        let ctx = ctx();
        let mut map = GenericMap::default();
        map.insert("T".into(), RealizedType::int());
        let ty = RealizedType::option(RealizedType::array(RealizedType::generic("T")));
        assert_eq!(ty.fill_generics(&ctx, &map).to_string(), "Option<int[]>");
        assert!(!ty.fill_generics(&ctx, &map).has_generics(&ctx));
    }

    #[test]
    fn fill_positionally_binds_registry_generics() {
        let ctx = ctx();
        let builder = RealizedType::Standard(QualifiedName::builtin("ArrayBuilder"));
        assert!(builder.has_generics(&ctx));
        let bound = builder.fill_generic_arguments(&ctx, &[RealizedType::string()]);
        assert_eq!(bound.to_string(), "ArrayBuilder<string>");
        assert!(!bound.has_generics(&ctx));
        assert!(!RealizedType::int().has_generics(&ctx));
    }

    #[test]
    fn guess_walks_structural_containers() {
        let ctx = ctx();
        let mut map = GenericMap::default();
        let param = RealizedType::Tuple(vec![
            RealizedType::array(RealizedType::generic("T")),
            RealizedType::generic("U"),
            RealizedType::generic("V"),
        ]);
        // Shorter actual tuple: V stays unbound, no panic.
        let actual = RealizedType::Tuple(vec![
            RealizedType::array(RealizedType::float()),
            RealizedType::bool(),
        ]);
        param.guess_generic(&ctx, &mut map, &actual);
        assert_eq!(map.get("T"), Some(&RealizedType::float()));
        assert_eq!(map.get("U"), Some(&RealizedType::bool()));
        assert!(!map.contains_key("V"));
    }

    #[test]
    fn guess_ignores_nominal_types_and_keeps_first_binding() {
        let ctx = ctx();
        let mut map = GenericMap::default();
        let cell_of_t =
            RealizedType::bound(QualifiedName::builtin("Cell"), vec![RealizedType::generic("T")]);
        let cell_of_int =
            RealizedType::bound(QualifiedName::builtin("Cell"), vec![RealizedType::int()]);
        cell_of_t.guess_generic(&ctx, &mut map, &cell_of_int);
        assert!(map.is_empty());

        RealizedType::generic("T").guess_generic(&ctx, &mut map, &RealizedType::int());
        RealizedType::generic("T").guess_generic(&ctx, &mut map, &RealizedType::string());
        assert_eq!(map.get("T"), Some(&RealizedType::int()));
    }

    #[test]
    fn guess_through_function_return() {
        let ctx = ctx();
        let mut map = GenericMap::default();
        let mapper = RealizedType::function(vec![RealizedType::int()], RealizedType::generic("U"));
        let lambda = RealizedType::function(vec![RealizedType::int()], RealizedType::string());
        mapper.guess_generic(&ctx, &mut map, &lambda);
        assert_eq!(map.get("U"), Some(&RealizedType::string()));
    }

    #[test]
    fn concrete_means_no_unknown_and_no_placeholder() {
        assert!(RealizedType::option(RealizedType::int()).is_concrete());
        assert!(!RealizedType::option(RealizedType::Unknown).is_concrete());
        assert!(!RealizedType::function(vec![RealizedType::int()], RealizedType::generic("U")).is_concrete());
        assert!(RealizedType::record(vec![("x", RealizedType::float())]).is_concrete());
    }
}
