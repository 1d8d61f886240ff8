//! Pass 2: validate module items against the complete symbol tables.

use rustc_hash::FxHashSet;
use to2_common::InputRange;

use crate::ast::{
    ConstDeclaration, Expr, ExprKind, FunctionDeclaration, Ident, ImplDeclaration,
    ImplOperatorsDeclaration, ModuleItem, StructDeclaration, TypeAliasDeclaration, UseDeclaration,
    UseKind,
};
use crate::context::ModuleScope;
use crate::error::{SemanticError, SymbolKind};
use crate::scope::{LocalVariable, ScopeKind};
use crate::side_table::{SemanticTokenModifier as Mod, SemanticTokenType as Token};
use crate::ty::RealizedType;

use super::Checker;

/// How a function body is bound while it is validated.
#[derive(Clone, Copy, PartialEq, Eq)]
enum FunctionKind {
    Function,
    Method,
    Operator,
}

impl<'a> Checker<'a> {
    pub(crate) fn validate_item(&mut self, item: &ModuleItem) {
        match item {
            ModuleItem::Use(u) => self.validate_use(u),
            ModuleItem::Const(c) => self.validate_const(c),
            ModuleItem::Function(f) => self.validate_function(f, FunctionKind::Function),
            ModuleItem::Struct(s) => self.validate_struct(s),
            ModuleItem::TypeAlias(t) => self.validate_type_alias(t),
            ModuleItem::Impl(i) => self.validate_impl(i),
            ModuleItem::ImplOperators(i) => self.validate_impl_operators(i),
        }
        self.scopes.truncate(0);
    }

    fn validate_use(&mut self, decl: &UseDeclaration) {
        let ctx = self.ctx();
        let Some(module) = ctx.registry.module(&decl.module.name) else {
            return;
        };
        self.token(decl.module.range, Token::Namespace, &[]);
        if !module.description().is_empty() {
            self.hover_doc(decl.module.range, module.description().to_string());
        }
        match &decl.import {
            UseKind::Module { alias: Some(alias) } => {
                self.token(alias.range, Token::Namespace, &[Mod::Declaration]);
            }
            UseKind::Module { alias: None } | UseKind::All => {}
            UseKind::Names { names } => {
                for name in names {
                    if let Some(constant) = ctx.mapped_constants.get(&name.name) {
                        self.token(name.range, Token::Variable, &[Mod::Readonly, Mod::DefaultLibrary]);
                        self.hover(name.range, &name.name, &constant.ty, &constant.description);
                    } else if let Some(function) = ctx.mapped_functions.get(&name.name) {
                        self.token(name.range, Token::Function, &[Mod::DefaultLibrary]);
                        self.hover(name.range, &name.name, &function.ty, &function.description);
                    } else if ctx.type_aliases.contains_key(&name.name) {
                        self.token(name.range, Token::Type, &[Mod::DefaultLibrary]);
                    }
                }
            }
        }
    }

    fn validate_const(&mut self, decl: &ConstDeclaration) {
        let ctx = self.ctx();
        let declared = decl.type_spec.as_ref().map(|spec| self.validate_type_spec(spec));
        let scope = self.scopes.push(None, ScopeKind::Block);
        let value = self.check_expr(&decl.value, scope, declared.as_ref());

        let ty = match declared {
            Some(declared) => {
                if !declared.is_assignable_from(ctx, &value) {
                    self.error(SemanticError::TypeMismatch {
                        expected: declared.clone(),
                        found: value,
                        range: decl.value.range,
                    });
                }
                declared
            }
            None => {
                if value.is_unknown() {
                    self.warn(SemanticError::InferenceFailure {
                        message: format!("type of `{}` could not be inferred", decl.name.name),
                        range: decl.name.range,
                    });
                } else {
                    self.inlay_hint(decl.name.range, &value);
                }
                value
            }
        };

        self.token(decl.name.range, Token::Variable, &[Mod::Declaration, Mod::Readonly]);
        self.hover(decl.name.range, &decl.name.name, &ty, &decl.description);
    }

    fn validate_struct(&mut self, decl: &StructDeclaration) {
        let ctx = self.ctx();
        self.token(decl.name.range, Token::Struct, &[Mod::Declaration]);
        if let Some(alias) = ctx.type_aliases.get(&decl.name.name) {
            self.hover(decl.name.range, &decl.name.name, &alias.ty, &decl.description);
        }

        for field in &decl.fields {
            let ty = self.validate_type_spec(&field.type_spec);
            self.token(field.name.range, Token::Property, &[Mod::Declaration]);
            self.hover(field.name.range, &field.name.name, &ty, &field.description);
            if let Some(default) = &field.default_value {
                let scope = self.scopes.push(None, ScopeKind::Block);
                let actual = self.check_expr(default, scope, Some(&ty));
                if !ty.is_assignable_from(ctx, &actual) {
                    self.error(SemanticError::TypeMismatch {
                        expected: ty,
                        found: actual,
                        range: default.range,
                    });
                }
            }
        }
    }

    fn validate_type_alias(&mut self, decl: &TypeAliasDeclaration) {
        let ty = self.validate_type_spec(&decl.type_spec);
        self.token(decl.name.range, Token::Type, &[Mod::Declaration]);
        self.hover(decl.name.range, &decl.name.name, &ty, &decl.description);
    }

    fn validate_impl(&mut self, decl: &ImplDeclaration) {
        self.enter_impl(&decl.name.name);
        self.token(decl.name.range, Token::Struct, &[]);
        self.link_struct(&decl.name);
        for method in &decl.methods {
            self.validate_function(method, FunctionKind::Method);
            self.scopes.truncate(0);
        }
        self.module = ModuleScope::Root(self.ctx());
    }

    fn validate_impl_operators(&mut self, decl: &ImplOperatorsDeclaration) {
        self.enter_impl(&decl.name.name);
        self.token(decl.name.range, Token::Struct, &[]);
        self.link_struct(&decl.name);
        for function in &decl.functions {
            self.validate_function(function, FunctionKind::Operator);
            self.scopes.truncate(0);
        }
        self.module = ModuleScope::Root(self.ctx());
    }

    fn link_struct(&mut self, name: &Ident) {
        if let Some(alias) = self.ctx().type_aliases.get(&name.name) {
            self.definition(name.range, alias.definition.clone());
        }
    }

    /// Switch to the view inside `impl name`, where `Self` is bound. An
    /// unknown struct was reported in pass 1; the bodies are still walked.
    fn enter_impl(&mut self, name: &str) {
        let ctx = self.ctx();
        self.module = match ctx.type_aliases.get_key_value(name) {
            Some((key, alias)) if alias.is_struct => ModuleScope::Impl {
                root: ctx,
                struct_name: key.as_str(),
                struct_type: &alias.ty,
            },
            _ => ModuleScope::Root(ctx),
        };
    }

    // ── Functions ──────────────────────────────────────────────────────

    fn validate_function(&mut self, decl: &FunctionDeclaration, kind: FunctionKind) {
        let ctx = self.ctx();
        let return_type = self.validate_type_spec(&decl.return_type);

        let (token, signature) = match kind {
            FunctionKind::Method => (
                Token::Method,
                self.module
                    .struct_name()
                    .and_then(|s| ctx.find_struct(s))
                    .and_then(|imp| imp.methods.get(&decl.name.name))
                    .map(|m| m.ty.clone()),
            ),
            FunctionKind::Function => (
                Token::Function,
                ctx.mapped_functions
                    .get(&decl.name.name)
                    .filter(|f| f.definition.as_ref().map(|d| d.range) == Some(decl.name.range))
                    .map(|f| f.ty.clone()),
            ),
            FunctionKind::Operator => (Token::Function, None),
        };
        self.token(decl.name.range, token, &[Mod::Declaration]);
        if let Some(signature) = &signature {
            self.hover(decl.name.range, &decl.name.name, signature, &decl.description);
        }

        let function_scope = self.scopes.push(
            None,
            ScopeKind::Function {
                return_type: return_type.clone(),
            },
        );
        let defaults_scope = self.scopes.push(None, ScopeKind::Block);
        let mut seen = FxHashSet::default();

        for (index, param) in decl.parameters.iter().enumerate() {
            let is_receiver = kind == FunctionKind::Method && index == 0 && param.name.name == "self";
            let ty = match (&param.type_spec, is_receiver) {
                (Some(spec), _) => self.validate_type_spec(spec),
                (None, true) => self.module.self_type().cloned().unwrap_or(RealizedType::Unknown),
                (None, false) => {
                    self.error(SemanticError::InvalidDeclaration {
                        message: format!("parameter `{}` requires a type", param.name.name),
                        range: param.name.range,
                    });
                    RealizedType::Unknown
                }
            };

            if let Some(default) = &param.default_value {
                let actual = self.check_expr(default, defaults_scope, Some(&ty));
                if !ty.is_assignable_from(ctx, &actual) {
                    self.error(SemanticError::TypeMismatch {
                        expected: ty.clone(),
                        found: actual,
                        range: default.range,
                    });
                }
            }

            if !seen.insert(param.name.name.as_str()) {
                self.error(SemanticError::DuplicateSymbol {
                    kind: SymbolKind::Parameter,
                    name: param.name.name.clone(),
                    range: param.name.range,
                });
                continue;
            }
            self.token(param.name.range, Token::Parameter, &[Mod::Declaration]);
            self.hover(param.name.range, &param.name.name, &ty, "");
            let definition = ctx.definition(param.name.range);
            self.scopes.declare(
                function_scope,
                &param.name.name,
                LocalVariable {
                    ty,
                    definition: Some(definition),
                    is_const: false,
                    is_parameter: true,
                },
            );
        }

        let body = self.check_expr(&decl.body, function_scope, Some(&return_type));
        if !return_type.is_assignable_from(ctx, &body) {
            self.error(SemanticError::TypeMismatch {
                expected: return_type,
                found: body,
                range: result_range(&decl.body),
            });
        }
        tracing::trace!(function = %decl.name.name, "validated function body");
    }
}

/// Where a body's value comes from: the last expression of a block.
fn result_range(body: &Expr) -> InputRange {
    match &body.kind {
        ExprKind::Block { expressions } => expressions
            .last()
            .map(result_range)
            .unwrap_or(body.range),
        _ => body.range,
    }
}
