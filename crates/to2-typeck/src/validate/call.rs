//! Function and method calls, including generic inference at call sites.

use crate::ast::{Expr, Ident, TypeSpec};
use crate::error::{SemanticError, SymbolKind};
use crate::scope::ScopeId;
use crate::side_table::{SemanticTokenModifier as Mod, SemanticTokenType as Token};
use crate::ty::{FunctionType, GenericMap, RealizedType};

use super::{library, Checker};

impl<'a> Checker<'a> {
    pub(super) fn check_call(
        &mut self,
        namespace: Option<&Ident>,
        name: &Ident,
        type_args: &[TypeSpec],
        args: &[Expr],
        scope: ScopeId,
        hint: Option<&RealizedType>,
    ) -> RealizedType {
        let ctx = self.ctx();
        // Pseudo-constructors pick their signature from the expected result.
        let callee_hint = result_hint(hint).map(|h| RealizedType::function(Vec::new(), h.clone()));

        let callee = match namespace {
            Some(namespace) => {
                if !self.check_namespace(namespace) {
                    self.check_unguided(args, scope);
                    return RealizedType::Unknown;
                }
                let function = ctx.find_function(Some(&namespace.name), &name.name, None);
                if let Some(function) = &function {
                    self.token(name.range, Token::Function, &[Mod::DefaultLibrary]);
                    self.hover(name.range, &name.name, &function.ty, &function.description);
                }
                function.map(|f| f.ty)
            }
            None => {
                let variable =
                    self.scopes
                        .find_variable(ctx, scope, &name.name, callee_hint.as_ref());
                if let Some(variable) = &variable {
                    self.mark_variable(name, variable);
                }
                variable.map(|v| v.ty)
            }
        };

        let function = match callee {
            Some(RealizedType::Function(function)) => function,
            Some(RealizedType::Unknown) => {
                self.check_unguided(args, scope);
                return RealizedType::Unknown;
            }
            Some(other) => {
                self.error(SemanticError::NotCallable {
                    name: name.name.clone(),
                    ty: other,
                    range: name.range,
                });
                self.check_unguided(args, scope);
                return RealizedType::Unknown;
            }
            None => {
                self.error(SemanticError::UndefinedSymbol {
                    kind: SymbolKind::Function,
                    name: name.name.clone(),
                    owner: namespace.map(|n| n.name.clone()),
                    range: name.range,
                });
                self.check_unguided(args, scope);
                return RealizedType::Unknown;
            }
        };
        self.check_call_arguments(&function, type_args, args, name, scope, hint)
    }

    pub(super) fn check_method_call(
        &mut self,
        target: &Expr,
        name: &Ident,
        args: &[Expr],
        scope: ScopeId,
        hint: Option<&RealizedType>,
    ) -> RealizedType {
        let target_type = self.check_expr(target, scope, None);
        if target_type.is_unknown() {
            self.check_unguided(args, scope);
            return RealizedType::Unknown;
        }
        let ctx = self.ctx();

        if let Some(method) = target_type.find_method(ctx, &name.name) {
            let signature = RealizedType::Function(method.signature.clone());
            self.token(name.range, Token::Method, library(&method.definition));
            self.definition(name.range, method.definition.clone());
            self.hover(name.range, &name.name, &signature, &method.description);
            return self.check_call_arguments(&method.signature, &[], args, name, scope, hint);
        }

        // A field holding a function is called like a method.
        if let Some(field) = target_type.find_field(ctx, &name.name) {
            if let RealizedType::Function(function) = &field.ty {
                self.token(name.range, Token::Property, library(&field.definition));
                self.definition(name.range, field.definition.clone());
                self.hover(name.range, &name.name, &field.ty, &field.description);
                return self.check_call_arguments(function, &[], args, name, scope, hint);
            }
        }

        self.error(SemanticError::UndefinedSymbol {
            kind: SymbolKind::Method,
            name: name.name.clone(),
            owner: Some(target_type.local_name()),
            range: name.range,
        });
        self.check_unguided(args, scope);
        RealizedType::Unknown
    }

    /// Check `args` against `function` and compute the call's result type.
    ///
    /// Generic placeholders are bound in order: explicit type arguments,
    /// the expected result, non-lambda arguments, then lambda arguments,
    /// which are checked last so their parameters can be inferred from the
    /// bindings made so far. Placeholders still open afterwards become
    /// `Unknown` in the result.
    pub(super) fn check_call_arguments(
        &mut self,
        function: &FunctionType,
        type_args: &[TypeSpec],
        args: &[Expr],
        name: &Ident,
        scope: ScopeId,
        hint: Option<&RealizedType>,
    ) -> RealizedType {
        let ctx = self.ctx();
        let total = function.parameters.len();
        let required = function.required_parameters();
        if args.len() < required || args.len() > total {
            self.error(SemanticError::ArityMismatch {
                what: format!("arguments for `{}`", name.name),
                expected: if args.len() < required { required } else { total },
                found: args.len(),
                range: name.range,
            });
        }

        let mut map = GenericMap::default();
        if !type_args.is_empty() {
            let explicit: Vec<_> = type_args.iter().map(|spec| self.validate_type_spec(spec)).collect();
            if explicit.len() != function.generic_parameters.len() {
                self.error(SemanticError::ArityMismatch {
                    what: format!("type arguments for `{}`", name.name),
                    expected: function.generic_parameters.len(),
                    found: explicit.len(),
                    range: name.range,
                });
            }
            for (param, ty) in function.generic_parameters.iter().zip(explicit) {
                map.insert(param.clone(), ty);
            }
        }
        if let Some(hint) = result_hint(hint) {
            function.return_type.guess_generic(ctx, &mut map, hint);
        }

        let mut actuals: Vec<Option<RealizedType>> = vec![None; args.len()];
        for lambdas in [false, true] {
            for (i, (arg, param)) in args.iter().zip(&function.parameters).enumerate() {
                if arg.is_lambda() != lambdas {
                    continue;
                }
                let expected = param.ty.fill_generics(ctx, &map);
                let actual = self.check_expr(arg, scope, Some(&expected));
                param.ty.guess_generic(ctx, &mut map, &actual);
                actuals[i] = Some(actual);
            }
        }
        self.check_unguided(args.get(total..).unwrap_or_default(), scope);

        for ((arg, param), actual) in args.iter().zip(&function.parameters).zip(actuals) {
            let Some(actual) = actual else {
                continue;
            };
            let expected = param.ty.fill_generics(ctx, &map);
            if !expected.is_assignable_from(ctx, &actual) {
                self.error(SemanticError::TypeMismatch {
                    expected,
                    found: actual,
                    range: arg.range,
                });
            }
        }

        let result = function.return_type.fill_generics(ctx, &map).erase_generics();
        tracing::trace!(callee = %name.name, %result, "call");
        result
    }

    /// Arguments of a call that could not be resolved. Lambdas are only
    /// inferred, since nothing tells them their parameter types.
    fn check_unguided(&mut self, args: &[Expr], scope: ScopeId) {
        for arg in args {
            if arg.is_lambda() {
                self.result_type(arg, scope, None);
            } else {
                self.check_expr(arg, scope, None);
            }
        }
    }
}

/// An expected result type worth inferring from.
fn result_hint(hint: Option<&RealizedType>) -> Option<&RealizedType> {
    hint.filter(|h| h.is_concrete() && !h.is_unit())
}
