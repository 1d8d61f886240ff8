//! Expression and statement inference.
//!
//! Every node reports its own problems and returns its type. A node that
//! cannot be resolved reports one error and returns `Unknown`; nodes that
//! consume an `Unknown` stay silent.

use rustc_hash::FxHashSet;
use to2_common::InputRange;

use crate::ast::{Binding, Expr, ExprKind, Ident, LambdaParameter, RecordItem};
use crate::error::{SemanticError, SymbolKind};
use crate::operator::Operator;
use crate::scope::{LocalVariable, ResolvedVariable, ScopeId, ScopeKind, VariableSource};
use crate::side_table::{SemanticTokenModifier as Mod, SemanticTokenType as Token};
use crate::ty::{FunctionParameter, FunctionType, RealizedType, RecordType};

use super::{library, Checker};

impl<'a> Checker<'a> {
    /// Infer the type of `expr`, validating it on the way.
    ///
    /// `hint` is the type the surrounding context expects. It only steers
    /// inference (lambda parameters, empty arrays, pseudo-constructors);
    /// the caller checks assignability against it.
    pub(super) fn check_expr(
        &mut self,
        expr: &Expr,
        scope: ScopeId,
        hint: Option<&RealizedType>,
    ) -> RealizedType {
        let ty = match &expr.kind {
            ExprKind::Int { .. } => RealizedType::int(),
            ExprKind::Float { .. } => RealizedType::float(),
            ExprKind::Bool { .. } => RealizedType::bool(),
            ExprKind::String { .. } => RealizedType::string(),
            ExprKind::Variable { namespace, name } => {
                self.check_variable(namespace.as_ref(), name, scope)
            }
            ExprKind::Call {
                namespace,
                name,
                type_args,
                args,
            } => self.check_call(namespace.as_ref(), name, type_args, args, scope, hint),
            ExprKind::MethodCall { target, name, args } => {
                self.check_method_call(target, name, args, scope, hint)
            }
            ExprKind::Field { target, name } => self.check_field(target, name, scope),
            ExprKind::Index { target, index } => self.check_index(target, index, scope),
            ExprKind::Unary { op, operand } => self.check_unary(expr.range, *op, operand, scope),
            ExprKind::Binary { left, op, right } => {
                self.check_binary(expr.range, left, *op, right, scope)
            }
            ExprKind::Block { expressions } => self.check_block(expressions, scope, hint),
            ExprKind::Let {
                is_const,
                binding,
                type_spec,
                value,
            } => {
                let declared = type_spec.as_ref().map(|spec| self.validate_type_spec(spec));
                self.check_let(expr.range, *is_const, binding, declared, value, scope);
                RealizedType::unit()
            }
            ExprKind::Assign { name, op, value } => {
                self.check_assign(name, *op, value, scope);
                RealizedType::unit()
            }
            ExprKind::FieldAssign {
                target,
                name,
                op,
                value,
            } => {
                self.check_field_assign(target, name, *op, value, scope);
                RealizedType::unit()
            }
            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.check_if(condition, then_branch, else_branch.as_deref(), scope, hint),
            ExprKind::While { condition, body } => {
                self.check_condition(condition, scope);
                let body_scope = self.scopes.push(Some(scope), ScopeKind::Loop);
                self.check_expr(body, body_scope, None);
                RealizedType::unit()
            }
            ExprKind::For {
                binding,
                source,
                body,
            } => {
                self.check_for(binding, source, body, scope);
                RealizedType::unit()
            }
            ExprKind::Break => self.check_loop_control("break", expr.range, scope),
            ExprKind::Continue => self.check_loop_control("continue", expr.range, scope),
            ExprKind::Return { value } => self.check_return(expr.range, value.as_deref(), scope),
            ExprKind::Lambda { parameters, body } => {
                self.check_lambda(expr.range, parameters, body, scope, hint)
            }
            ExprKind::Array { elements } => self.check_array(expr.range, elements, scope, hint),
            ExprKind::Tuple { items } => {
                let hints = match hint {
                    Some(RealizedType::Tuple(hints)) => hints.as_slice(),
                    _ => &[],
                };
                RealizedType::Tuple(
                    items
                        .iter()
                        .enumerate()
                        .map(|(i, item)| self.check_expr(item, scope, hints.get(i)))
                        .collect(),
                )
            }
            ExprKind::Record { items } => self.check_record(items, scope, hint),
            ExprKind::Range { from, to, .. } => {
                let ctx = self.ctx();
                let int = RealizedType::int();
                for bound in [from, to] {
                    let ty = self.check_expr(bound, scope, Some(&int));
                    if !int.is_assignable_from(ctx, &ty) {
                        self.error(SemanticError::TypeMismatch {
                            expected: int.clone(),
                            found: ty,
                            range: bound.range,
                        });
                    }
                }
                RealizedType::range()
            }
            ExprKind::Bracket { inner } => self.check_expr(inner, scope, hint),
        };
        self.record_type(expr.range, &ty);
        ty
    }

    // ── Names ──────────────────────────────────────────────────────────

    fn check_variable(&mut self, namespace: Option<&Ident>, name: &Ident, scope: ScopeId) -> RealizedType {
        let ctx = self.ctx();
        if let Some(namespace) = namespace {
            if !self.check_namespace(namespace) {
                return RealizedType::Unknown;
            }
            if let Some(constant) = ctx.find_constant(Some(&namespace.name), &name.name) {
                self.token(name.range, Token::Variable, &[Mod::Readonly, Mod::DefaultLibrary]);
                self.hover(name.range, &name.name, &constant.ty, &constant.description);
                return constant.ty;
            }
            if let Some(function) = ctx.find_function(Some(&namespace.name), &name.name, None) {
                self.token(name.range, Token::Function, &[Mod::DefaultLibrary]);
                self.hover(name.range, &name.name, &function.ty, &function.description);
                return function.ty;
            }
            self.error(SemanticError::UndefinedSymbol {
                kind: SymbolKind::Variable,
                name: name.name.clone(),
                owner: Some(namespace.name.clone()),
                range: name.range,
            });
            return RealizedType::Unknown;
        }

        match self.scopes.find_variable(ctx, scope, &name.name, None) {
            Some(variable) => {
                self.mark_variable(name, &variable);
                variable.ty
            }
            None => {
                self.error(SemanticError::UndefinedSymbol {
                    kind: SymbolKind::Variable,
                    name: name.name.clone(),
                    owner: None,
                    range: name.range,
                });
                RealizedType::Unknown
            }
        }
    }

    /// Report an unknown module prefix. Returns whether it resolved.
    pub(super) fn check_namespace(&mut self, namespace: &Ident) -> bool {
        if self.ctx().find_module(&namespace.name).is_none() {
            self.error(SemanticError::UndefinedSymbol {
                kind: SymbolKind::Module,
                name: namespace.name.clone(),
                owner: None,
                range: namespace.range,
            });
            return false;
        }
        self.token(namespace.range, Token::Namespace, &[]);
        true
    }

    /// Token, definition and hover for a resolved plain name.
    pub(super) fn mark_variable(&mut self, name: &Ident, variable: &ResolvedVariable) {
        match variable.source {
            VariableSource::Local {
                is_parameter: true, ..
            } => self.token(name.range, Token::Parameter, &[]),
            VariableSource::Local { is_const: true, .. } => {
                self.token(name.range, Token::Variable, &[Mod::Readonly])
            }
            VariableSource::Local { .. } => self.token(name.range, Token::Variable, &[]),
            VariableSource::Constant if variable.definition.is_none() => {
                self.token(name.range, Token::Variable, &[Mod::Readonly, Mod::DefaultLibrary])
            }
            VariableSource::Constant => self.token(name.range, Token::Variable, &[Mod::Readonly]),
            VariableSource::Function => {
                self.token(name.range, Token::Function, library(&variable.definition))
            }
        }
        self.definition(name.range, variable.definition.clone());
        self.hover(name.range, &name.name, &variable.ty, &variable.description);
    }

    fn check_field(&mut self, target: &Expr, name: &Ident, scope: ScopeId) -> RealizedType {
        let target_type = self.check_expr(target, scope, None);
        if target_type.is_unknown() {
            return RealizedType::Unknown;
        }
        let ctx = self.ctx();
        match target_type.find_field(ctx, &name.name) {
            Some(field) => {
                let modifiers: &[Mod] = match (field.read_only, field.definition.is_none()) {
                    (true, true) => &[Mod::Readonly, Mod::DefaultLibrary],
                    (true, false) => &[Mod::Readonly],
                    (false, true) => &[Mod::DefaultLibrary],
                    (false, false) => &[],
                };
                self.token(name.range, Token::Property, modifiers);
                self.definition(name.range, field.definition.clone());
                self.hover(name.range, &name.name, &field.ty, &field.description);
                field.ty
            }
            None => {
                self.error(SemanticError::UndefinedSymbol {
                    kind: SymbolKind::Field,
                    name: name.name.clone(),
                    owner: Some(target_type.local_name()),
                    range: name.range,
                });
                RealizedType::Unknown
            }
        }
    }

    fn check_index(&mut self, target: &Expr, index: &Expr, scope: ScopeId) -> RealizedType {
        let ctx = self.ctx();
        let target_type = self.check_expr(target, scope, None);
        let int = RealizedType::int();
        let index_type = self.check_expr(index, scope, Some(&int));
        if !int.is_assignable_from(ctx, &index_type) {
            self.error(SemanticError::TypeMismatch {
                expected: int,
                found: index_type,
                range: index.range,
            });
        }
        if target_type.is_unknown() {
            return RealizedType::Unknown;
        }
        match target_type.support_index_access(ctx) {
            Some(element) => element,
            None => {
                self.error(SemanticError::UnsupportedOperation {
                    message: format!("`{}` does not support index access", target_type),
                    range: target.range,
                });
                RealizedType::Unknown
            }
        }
    }

    // ── Blocks and bindings ────────────────────────────────────────────

    fn check_block(
        &mut self,
        expressions: &[Expr],
        scope: ScopeId,
        hint: Option<&RealizedType>,
    ) -> RealizedType {
        let block = self.scopes.push(Some(scope), ScopeKind::Block);
        let last = expressions.len().saturating_sub(1);
        let mut ty = RealizedType::unit();
        for (i, expr) in expressions.iter().enumerate() {
            ty = self.check_expr(expr, block, if i == last { hint } else { None });
        }
        ty
    }

    fn check_let(
        &mut self,
        range: InputRange,
        is_const: bool,
        binding: &Binding,
        declared: Option<RealizedType>,
        value: &Expr,
        scope: ScopeId,
    ) {
        let ctx = self.ctx();
        let actual = self.check_expr(value, scope, declared.as_ref());
        let inferred = declared.is_none();
        let ty = match declared {
            Some(declared) => {
                if !declared.is_assignable_from(ctx, &actual) {
                    self.error(SemanticError::TypeMismatch {
                        expected: declared.clone(),
                        found: actual,
                        range: value.range,
                    });
                }
                declared
            }
            None => actual,
        };

        match binding {
            Binding::Single { name } => {
                if inferred {
                    if ty.is_unknown() {
                        self.warn(SemanticError::InferenceFailure {
                            message: format!("type of `{}` could not be inferred", name.name),
                            range: name.range,
                        });
                    } else {
                        self.inlay_hint(name.range, &ty);
                    }
                }
                self.declare_local(scope, name, ty, is_const);
            }
            Binding::Tuple { names } => {
                self.declare_destructured(scope, names, &ty, is_const, inferred, range)
            }
        }
    }

    pub(super) fn declare_local(&mut self, scope: ScopeId, name: &Ident, ty: RealizedType, is_const: bool) {
        let definition = self.ctx().definition(name.range);
        let modifiers: &[Mod] = if is_const {
            &[Mod::Declaration, Mod::Readonly]
        } else {
            &[Mod::Declaration]
        };
        self.token(name.range, Token::Variable, modifiers);
        self.hover(name.range, &name.name, &ty, "");
        let variable = LocalVariable {
            ty,
            definition: Some(definition),
            is_const,
            is_parameter: false,
        };
        if self.scopes.declare(scope, &name.name, variable).is_some() {
            self.error(SemanticError::DuplicateSymbol {
                kind: SymbolKind::Variable,
                name: name.name.clone(),
                range: name.range,
            });
        }
    }

    /// `let (a, b) = value`: positional for tuples, by field name for
    /// records and structs.
    fn declare_destructured(
        &mut self,
        scope: ScopeId,
        names: &[Ident],
        ty: &RealizedType,
        is_const: bool,
        inferred: bool,
        range: InputRange,
    ) {
        let ctx = self.ctx();
        let mut types = Vec::with_capacity(names.len());
        match ty {
            RealizedType::Unknown => types.resize(names.len(), RealizedType::Unknown),
            RealizedType::Tuple(items) => {
                if items.len() != names.len() {
                    self.error(SemanticError::ArityMismatch {
                        what: "tuple destructuring".to_string(),
                        expected: items.len(),
                        found: names.len(),
                        range,
                    });
                }
                for i in 0..names.len() {
                    types.push(items.get(i).cloned().unwrap_or(RealizedType::Unknown));
                }
            }
            RealizedType::Record(_) => {
                for name in names {
                    match ty.find_field(ctx, &name.name) {
                        Some(field) => types.push(field.ty),
                        None => {
                            self.error(SemanticError::UndefinedSymbol {
                                kind: SymbolKind::Field,
                                name: name.name.clone(),
                                owner: Some(ty.local_name()),
                                range: name.range,
                            });
                            types.push(RealizedType::Unknown);
                        }
                    }
                }
            }
            other => {
                self.error(SemanticError::UnsupportedOperation {
                    message: format!("cannot destructure `{}`", other),
                    range,
                });
                types.resize(names.len(), RealizedType::Unknown);
            }
        }

        for (name, ty) in names.iter().zip(types) {
            if inferred && !ty.is_unknown() {
                self.inlay_hint(name.range, &ty);
            }
            self.declare_local(scope, name, ty, is_const);
        }
    }

    fn check_assign(&mut self, name: &Ident, op: Option<Operator>, value: &Expr, scope: ScopeId) {
        let ctx = self.ctx();
        let local = self.scopes.lookup_local(scope, &name.name).cloned();
        let Some(local) = local else {
            let message = if ctx.find_constant(None, &name.name).is_some() {
                Some(format!("cannot assign to constant `{}`", name.name))
            } else if ctx.find_function(None, &name.name, None).is_some() {
                Some(format!("cannot assign to function `{}`", name.name))
            } else {
                None
            };
            match message {
                Some(message) => self.error(SemanticError::UnsupportedOperation {
                    message,
                    range: name.range,
                }),
                None => self.error(SemanticError::UndefinedSymbol {
                    kind: SymbolKind::Variable,
                    name: name.name.clone(),
                    owner: None,
                    range: name.range,
                }),
            }
            self.check_expr(value, scope, None);
            return;
        };

        let resolved = ResolvedVariable {
            ty: local.ty.clone(),
            definition: local.definition.clone(),
            description: String::new(),
            source: VariableSource::Local {
                is_const: local.is_const,
                is_parameter: local.is_parameter,
            },
        };
        self.mark_variable(name, &resolved);

        let readonly = if local.is_const {
            Some("constant")
        } else if local.is_parameter {
            Some("parameter")
        } else {
            None
        };
        if let Some(what) = readonly {
            self.error(SemanticError::UnsupportedOperation {
                message: format!("cannot assign to {} `{}`", what, name.name),
                range: name.range,
            });
            self.check_expr(value, scope, None);
            return;
        }
        self.check_assigned_value(&local.ty, op, value, scope);
    }

    fn check_field_assign(
        &mut self,
        target: &Expr,
        name: &Ident,
        op: Option<Operator>,
        value: &Expr,
        scope: ScopeId,
    ) {
        let ctx = self.ctx();
        let target_type = self.check_expr(target, scope, None);
        if target_type.is_unknown() {
            self.check_expr(value, scope, None);
            return;
        }
        let Some(field) = target_type.find_field(ctx, &name.name) else {
            self.error(SemanticError::UndefinedSymbol {
                kind: SymbolKind::Field,
                name: name.name.clone(),
                owner: Some(target_type.local_name()),
                range: name.range,
            });
            self.check_expr(value, scope, None);
            return;
        };

        self.token(name.range, Token::Property, &[]);
        self.definition(name.range, field.definition.clone());
        self.hover(name.range, &name.name, &field.ty, &field.description);
        if field.read_only {
            self.error(SemanticError::UnsupportedOperation {
                message: format!(
                    "field `{}` of `{}` is read-only",
                    name.name,
                    target_type.local_name()
                ),
                range: name.range,
            });
            self.check_expr(value, scope, None);
            return;
        }
        self.check_assigned_value(&field.ty, op, value, scope);
    }

    /// The right side of `target = value` or `target op= value`.
    fn check_assigned_value(
        &mut self,
        target: &RealizedType,
        op: Option<Operator>,
        value: &Expr,
        scope: ScopeId,
    ) {
        let ctx = self.ctx();
        let assigned = match op {
            None => self.check_expr(value, scope, Some(target)),
            Some(op) => {
                let actual = self.check_expr(value, scope, None);
                self.apply_binary(value.range, target, op, &actual)
            }
        };
        if !target.is_assignable_from(ctx, &assigned) {
            self.error(SemanticError::TypeMismatch {
                expected: target.clone(),
                found: assigned,
                range: value.range,
            });
        }
    }

    // ── Control flow ───────────────────────────────────────────────────

    fn check_condition(&mut self, condition: &Expr, scope: ScopeId) {
        let ctx = self.ctx();
        let bool_type = RealizedType::bool();
        let ty = self.check_expr(condition, scope, Some(&bool_type));
        if !bool_type.is_assignable_from(ctx, &ty) {
            self.error(SemanticError::TypeMismatch {
                expected: bool_type,
                found: ty,
                range: condition.range,
            });
        }
    }

    fn check_if(
        &mut self,
        condition: &Expr,
        then_branch: &Expr,
        else_branch: Option<&Expr>,
        scope: ScopeId,
        hint: Option<&RealizedType>,
    ) -> RealizedType {
        let ctx = self.ctx();
        self.check_condition(condition, scope);
        let then_scope = self.scopes.push(Some(scope), ScopeKind::Block);
        let Some(else_branch) = else_branch else {
            self.check_expr(then_branch, then_scope, None);
            return RealizedType::unit();
        };
        let then_type = self.check_expr(then_branch, then_scope, hint);
        let else_scope = self.scopes.push(Some(scope), ScopeKind::Block);
        let else_type = self.check_expr(else_branch, else_scope, hint);

        if then_type.is_unknown() {
            else_type
        } else if else_type.is_unknown() || then_type.is_assignable_from(ctx, &else_type) {
            then_type
        } else if else_type.is_assignable_from(ctx, &then_type) {
            else_type
        } else {
            RealizedType::unit()
        }
    }

    fn check_for(&mut self, binding: &Binding, source: &Expr, body: &Expr, scope: ScopeId) {
        let ctx = self.ctx();
        let source_type = self.check_expr(source, scope, None);
        let element = if source_type.is_unknown() {
            RealizedType::Unknown
        } else {
            match source_type.for_in_source(ctx) {
                Some(element) => element,
                None => {
                    self.error(SemanticError::UnsupportedOperation {
                        message: format!("`{}` cannot be iterated", source_type),
                        range: source.range,
                    });
                    RealizedType::Unknown
                }
            }
        };

        let loop_scope = self.scopes.push(Some(scope), ScopeKind::Loop);
        match binding {
            Binding::Single { name } => {
                if !element.is_unknown() {
                    self.inlay_hint(name.range, &element);
                }
                self.declare_local(loop_scope, name, element, false);
            }
            Binding::Tuple { names } => {
                self.declare_destructured(loop_scope, names, &element, false, true, source.range)
            }
        }
        self.check_expr(body, loop_scope, None);
    }

    fn check_loop_control(&mut self, keyword: &str, range: InputRange, scope: ScopeId) -> RealizedType {
        if !self.scopes.in_loop(scope) {
            self.error(SemanticError::InvalidControlFlow {
                keyword: keyword.to_string(),
                range,
            });
        }
        RealizedType::Unknown
    }

    fn check_return(&mut self, range: InputRange, value: Option<&Expr>, scope: ScopeId) -> RealizedType {
        let ctx = self.ctx();
        let Some(expected) = self.scopes.return_type(scope).cloned() else {
            self.error(SemanticError::InvalidControlFlow {
                keyword: "return".to_string(),
                range,
            });
            if let Some(value) = value {
                self.check_expr(value, scope, None);
            }
            return RealizedType::Unknown;
        };
        let (actual, value_range) = match value {
            Some(value) => (self.check_expr(value, scope, Some(&expected)), value.range),
            None => (RealizedType::unit(), range),
        };
        if !expected.is_assignable_from(ctx, &actual) {
            self.error(SemanticError::TypeMismatch {
                expected,
                found: actual,
                range: value_range,
            });
        }
        RealizedType::Unknown
    }

    // ── Literals ───────────────────────────────────────────────────────

    /// Lambda parameters without annotation take their types from the
    /// expected function type.
    fn check_lambda(
        &mut self,
        range: InputRange,
        parameters: &[LambdaParameter],
        body: &Expr,
        scope: ScopeId,
        hint: Option<&RealizedType>,
    ) -> RealizedType {
        let expected = hint.and_then(RealizedType::as_function);
        if let Some(expected) = expected {
            if expected.parameters.len() != parameters.len() {
                self.error(SemanticError::ArityMismatch {
                    what: "lambda parameters".to_string(),
                    expected: expected.parameters.len(),
                    found: parameters.len(),
                    range,
                });
            }
        }

        let mut signature = Vec::with_capacity(parameters.len());
        for (i, param) in parameters.iter().enumerate() {
            let ty = match &param.type_spec {
                Some(spec) => self.validate_type_spec(spec),
                None => {
                    let from_hint = expected
                        .and_then(|f| f.parameters.get(i))
                        .map(|p| p.ty.clone())
                        .filter(RealizedType::is_concrete);
                    match from_hint {
                        Some(ty) => {
                            self.inlay_hint(param.name.range, &ty);
                            ty
                        }
                        None => {
                            self.error(SemanticError::InferenceFailure {
                                message: format!(
                                    "type of lambda parameter `{}` could not be inferred",
                                    param.name.name
                                ),
                                range: param.name.range,
                            });
                            RealizedType::Unknown
                        }
                    }
                }
            };
            signature.push(FunctionParameter::new(param.name.name.clone(), ty));
        }

        let return_hint = expected
            .map(|f| (*f.return_type).clone())
            .filter(RealizedType::is_concrete);
        let lambda_scope = self.scopes.push(
            Some(scope),
            ScopeKind::Function {
                return_type: return_hint.clone().unwrap_or(RealizedType::Unknown),
            },
        );
        let ctx = self.ctx();
        let mut seen = FxHashSet::default();
        for (param, p) in parameters.iter().zip(&signature) {
            if !seen.insert(param.name.name.as_str()) {
                self.error(SemanticError::DuplicateSymbol {
                    kind: SymbolKind::Parameter,
                    name: param.name.name.clone(),
                    range: param.name.range,
                });
                continue;
            }
            self.token(param.name.range, Token::Parameter, &[Mod::Declaration]);
            self.hover(param.name.range, &param.name.name, &p.ty, "");
            self.scopes.declare(
                lambda_scope,
                &param.name.name,
                LocalVariable {
                    ty: p.ty.clone(),
                    definition: Some(ctx.definition(param.name.range)),
                    is_const: false,
                    is_parameter: true,
                },
            );
        }

        let body_type = self.check_expr(body, lambda_scope, return_hint.as_ref());
        RealizedType::Function(FunctionType::new(signature, body_type))
    }

    fn check_array(
        &mut self,
        range: InputRange,
        elements: &[Expr],
        scope: ScopeId,
        hint: Option<&RealizedType>,
    ) -> RealizedType {
        let ctx = self.ctx();
        let mut element = match hint {
            Some(RealizedType::Array(element)) if element.is_concrete() => Some((**element).clone()),
            _ => None,
        };
        if elements.is_empty() {
            return match element {
                Some(element) => RealizedType::array(element),
                None => {
                    self.error(SemanticError::InferenceFailure {
                        message: "type of empty array could not be inferred".to_string(),
                        range,
                    });
                    RealizedType::Unknown
                }
            };
        }

        for expr in elements {
            let ty = self.check_expr(expr, scope, element.as_ref());
            match &element {
                None => {
                    if !ty.is_unknown() {
                        element = Some(ty);
                    }
                }
                Some(expected) => {
                    if !expected.is_assignable_from(ctx, &ty) {
                        self.error(SemanticError::TypeMismatch {
                            expected: expected.clone(),
                            found: ty,
                            range: expr.range,
                        });
                    }
                }
            }
        }
        RealizedType::array(element.unwrap_or(RealizedType::Unknown))
    }

    fn check_record(
        &mut self,
        items: &[RecordItem],
        scope: ScopeId,
        hint: Option<&RealizedType>,
    ) -> RealizedType {
        let ctx = self.ctx();
        let mut seen = FxHashSet::default();
        let mut fields = Vec::with_capacity(items.len());
        for item in items {
            let item_hint = hint
                .and_then(|h| h.find_field(ctx, &item.name.name))
                .map(|f| f.ty);
            let ty = self.check_expr(&item.value, scope, item_hint.as_ref());
            if !seen.insert(item.name.name.as_str()) {
                self.error(SemanticError::DuplicateSymbol {
                    kind: SymbolKind::Field,
                    name: item.name.name.clone(),
                    range: item.name.range,
                });
                continue;
            }
            self.token(item.name.range, Token::Property, &[Mod::Declaration]);
            fields.push((item.name.name.clone(), ty));
        }
        RealizedType::Record(RecordType {
            struct_name: None,
            items: fields,
        })
    }
}
