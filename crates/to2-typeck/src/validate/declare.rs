//! Pass 1: register module-level names.
//!
//! Registration only resolves signatures and annotations; bodies are not
//! walked here, except to infer the type of a constant without annotation.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use to2_common::InputRange;

use crate::ast::{
    ConstDeclaration, FunctionDeclaration, Ident, ModuleItem, StructDeclaration,
    TypeAliasDeclaration, UseDeclaration, UseKind,
};
use crate::context::{ModuleContext, ModuleScope, ReferencedValue, StructImpl, TypeAlias};
use crate::error::{SemanticError, SymbolKind, ValidationError};
use crate::registry::RegistryModule;
use crate::scope::ScopeKind;
use crate::side_table::{DefinitionRef, SideTable};
use crate::ty::{FunctionParameter, FunctionType, QualifiedName, RealizedType, RecordType};
use crate::typeref::resolve_type_ref;

use super::Checker;

/// Signature of a declared function. Methods drop their `self` receiver.
/// A parameter without a type is `Unknown`; pass 2 reports it.
pub(super) fn function_signature(
    scope: &ModuleScope<'_>,
    function: &FunctionDeclaration,
    skip_receiver: bool,
) -> FunctionType {
    FunctionType {
        is_async: function.is_async,
        generic_parameters: Vec::new(),
        parameters: function
            .parameters
            .iter()
            .skip(usize::from(skip_receiver))
            .map(|p| FunctionParameter {
                name: p.name.name.clone(),
                ty: p
                    .type_spec
                    .as_ref()
                    .map(|t| t.resolve(scope))
                    .unwrap_or(RealizedType::Unknown),
                has_default: p.default_value.is_some(),
            })
            .collect(),
        return_type: Box::new(function.return_type.resolve(scope)),
    }
}

pub(super) struct Declarer<'m> {
    pub(super) ctx: &'m mut ModuleContext,
    table: &'m mut SideTable,
}

impl<'m> Declarer<'m> {
    pub(super) fn new(ctx: &'m mut ModuleContext, table: &'m mut SideTable) -> Self {
        Declarer { ctx, table }
    }

    pub(super) fn error(&mut self, error: SemanticError) {
        self.table.push_diagnostic(ValidationError::error(error));
    }

    /// Pass 1a: `use`, `struct` and `type`.
    ///
    /// All struct names are registered before any field is resolved, so
    /// struct fields and type aliases may refer to any struct in the file.
    pub(super) fn declare_types(&mut self, items: &[ModuleItem]) {
        for item in items {
            if let ModuleItem::Use(u) = item {
                self.declare_use(u);
            }
        }
        for item in items {
            if let ModuleItem::Struct(s) = item {
                self.register_struct(s);
            }
        }
        for item in items {
            match item {
                ModuleItem::Struct(s) => self.declare_struct_fields(s),
                ModuleItem::TypeAlias(t) => self.declare_type_alias(t),
                _ => {}
            }
        }
    }

    /// Pass 1b: `fn`, `impl` and `impl operators`, then `const`.
    ///
    /// Constants without annotation are inferred from their value, which
    /// may call any function or use any operator of the module.
    pub(super) fn declare_values(&mut self, items: &[ModuleItem]) {
        for item in items {
            match item {
                ModuleItem::Function(f) => self.declare_function(f),
                ModuleItem::Impl(i) => self.declare_impl(i),
                ModuleItem::ImplOperators(i) => self.declare_impl_operators(i),
                _ => {}
            }
        }
        for item in items {
            if let ModuleItem::Const(c) = item {
                self.declare_const(c);
            }
        }
    }

    // ── Imports ────────────────────────────────────────────────────────

    fn declare_use(&mut self, decl: &UseDeclaration) {
        let registry = Arc::clone(&self.ctx.registry);
        let Some(module) = registry.module(&decl.module.name) else {
            self.error(SemanticError::UndefinedSymbol {
                kind: SymbolKind::Module,
                name: decl.module.name.clone(),
                owner: None,
                range: decl.module.range,
            });
            return;
        };

        match &decl.import {
            UseKind::Module { alias } => {
                let (key, range) = match alias {
                    Some(alias) => (alias.name.clone(), alias.range),
                    None => (module.name().to_string(), decl.module.range),
                };
                if self.ctx.module_aliases.contains_key(&key) {
                    self.error(SemanticError::DuplicateSymbol {
                        kind: SymbolKind::Module,
                        name: key,
                        range,
                    });
                } else {
                    tracing::trace!(alias = %key, module = %module.name(), "module alias");
                    self.ctx
                        .module_aliases
                        .insert(key, module.name().to_string());
                }
            }
            UseKind::Names { names } => {
                for name in names {
                    if !self.import(module, &name.name, Some(name.range)) {
                        self.error(SemanticError::UndefinedSymbol {
                            kind: SymbolKind::Symbol,
                            name: name.name.clone(),
                            owner: Some(module.name().to_string()),
                            range: name.range,
                        });
                    }
                }
            }
            UseKind::All => {
                let desc = &module.descriptor;
                let names = desc
                    .constants
                    .iter()
                    .map(|c| &c.name)
                    .chain(desc.functions.iter().map(|f| &f.name))
                    .chain(desc.types.iter().map(|t| &t.name));
                for name in names {
                    self.import(module, name, None);
                }
            }
        }
    }

    /// Import every export of `module` called `name`. Collisions with names
    /// already in scope are reported at `range`, or skipped without one.
    /// Returns whether the module exports the name at all.
    fn import(&mut self, module: &RegistryModule, name: &str, range: Option<InputRange>) -> bool {
        let mut found = false;

        if let Some(constant) = module.find_constant(name) {
            found = true;
            if self.ctx.mapped_constants.contains_key(name) {
                self.report_import_duplicate(SymbolKind::Constant, name, range);
            } else {
                let value = ReferencedValue {
                    ty: resolve_type_ref(&self.ctx.registry, &constant.value_type, None),
                    definition: None,
                    description: constant.description.clone(),
                };
                self.ctx.mapped_constants.insert(name.to_string(), value);
            }
        }

        if let Some(function) = module.find_function(name) {
            found = true;
            if self.ctx.mapped_functions.contains_key(name) {
                self.report_import_duplicate(SymbolKind::Function, name, range);
            } else {
                let value = ReferencedValue {
                    ty: self.ctx.library_function_type(function),
                    definition: None,
                    description: function.description.clone(),
                };
                self.ctx.mapped_functions.insert(name.to_string(), value);
            }
        }

        if module.find_type(name).is_some() {
            found = true;
            if self.ctx.type_aliases.contains_key(name) {
                self.report_import_duplicate(SymbolKind::Type, name, range);
            } else {
                self.ctx.type_aliases.insert(
                    name.to_string(),
                    TypeAlias {
                        ty: RealizedType::Standard(QualifiedName::new(module.name(), name)),
                        definition: None,
                        is_struct: false,
                    },
                );
            }
        }

        found
    }

    fn report_import_duplicate(&mut self, kind: SymbolKind, name: &str, range: Option<InputRange>) {
        if let Some(range) = range {
            self.error(SemanticError::DuplicateSymbol {
                kind,
                name: name.to_string(),
                range,
            });
        }
    }

    // ── Types ──────────────────────────────────────────────────────────

    fn register_struct(&mut self, decl: &StructDeclaration) {
        let name = &decl.name.name;
        if self.ctx.type_aliases.contains_key(name) {
            self.error(SemanticError::DuplicateSymbol {
                kind: SymbolKind::Struct,
                name: name.clone(),
                range: decl.name.range,
            });
            return;
        }
        let placeholder = RealizedType::Record(RecordType {
            struct_name: Some(self.ctx.qualified(name)),
            items: Vec::new(),
        });
        let definition = self.ctx.definition(decl.name.range);
        self.ctx.type_aliases.insert(
            name.clone(),
            TypeAlias {
                ty: placeholder,
                definition: Some(definition),
                is_struct: true,
            },
        );
        self.ctx.structs.insert(name.clone(), StructImpl::default());
    }

    /// Whether the type registered under `name` is the one declared there.
    fn owns_type(&self, name: &Ident) -> bool {
        self.ctx
            .type_aliases
            .get(&name.name)
            .and_then(|alias| alias.definition.as_ref())
            .map(|definition| definition.range == name.range)
            .unwrap_or(false)
    }

    fn declare_struct_fields(&mut self, decl: &StructDeclaration) {
        if !self.owns_type(&decl.name) {
            return;
        }

        let mut seen = FxHashSet::default();
        let mut duplicates = Vec::new();
        let mut fields = Vec::with_capacity(decl.fields.len());
        {
            let scope = ModuleScope::Root(&*self.ctx);
            for field in &decl.fields {
                if !seen.insert(field.name.name.as_str()) {
                    duplicates.push(&field.name);
                    continue;
                }
                fields.push((field.name.name.clone(), field.type_spec.resolve(&scope)));
            }
        }
        for name in duplicates {
            self.error(SemanticError::DuplicateSymbol {
                kind: SymbolKind::Field,
                name: name.name.clone(),
                range: name.range,
            });
        }

        let name = decl.name.name.clone();
        let struct_type = RealizedType::Record(RecordType {
            struct_name: Some(self.ctx.qualified(&name)),
            items: fields.clone(),
        });
        let parameters = fields
            .iter()
            .map(|(field_name, ty)| FunctionParameter {
                name: field_name.clone(),
                ty: ty.clone(),
                has_default: decl
                    .fields
                    .iter()
                    .any(|f| &f.name.name == field_name && f.default_value.is_some()),
            })
            .collect();

        let module_name = self.ctx.module_name.clone();
        let imp = self.ctx.structs.entry(name.clone()).or_default();
        imp.fields = fields;
        for field in &decl.fields {
            imp.field_definitions
                .entry(field.name.name.clone())
                .or_insert_with(|| DefinitionRef {
                    module_name: module_name.clone(),
                    range: field.name.range,
                });
            if !field.description.is_empty() {
                imp.field_descriptions
                    .entry(field.name.name.clone())
                    .or_insert_with(|| field.description.clone());
            }
        }
        if let Some(alias) = self.ctx.type_aliases.get_mut(&name) {
            alias.ty = struct_type.clone();
        }

        if self.ctx.mapped_functions.contains_key(&name) {
            self.error(SemanticError::DuplicateSymbol {
                kind: SymbolKind::Function,
                name,
                range: decl.name.range,
            });
            return;
        }
        let constructor = ReferencedValue {
            ty: RealizedType::Function(FunctionType::new(parameters, struct_type)),
            definition: Some(self.ctx.definition(decl.name.range)),
            description: decl.description.clone(),
        };
        self.ctx.mapped_functions.insert(name, constructor);
    }

    fn declare_type_alias(&mut self, decl: &TypeAliasDeclaration) {
        if self.ctx.type_aliases.contains_key(&decl.name.name) {
            self.error(SemanticError::DuplicateSymbol {
                kind: SymbolKind::Type,
                name: decl.name.name.clone(),
                range: decl.name.range,
            });
            return;
        }
        let ty = decl.type_spec.resolve(&ModuleScope::Root(&*self.ctx));
        let definition = self.ctx.definition(decl.name.range);
        self.ctx.type_aliases.insert(
            decl.name.name.clone(),
            TypeAlias {
                ty,
                definition: Some(definition),
                is_struct: false,
            },
        );
    }

    // ── Values ─────────────────────────────────────────────────────────

    fn declare_const(&mut self, decl: &ConstDeclaration) {
        if self.ctx.mapped_constants.contains_key(&decl.name.name) {
            self.error(SemanticError::DuplicateSymbol {
                kind: SymbolKind::Constant,
                name: decl.name.name.clone(),
                range: decl.name.range,
            });
            return;
        }
        let ty = match &decl.type_spec {
            Some(spec) => spec.resolve(&ModuleScope::Root(&*self.ctx)),
            None => {
                let mut checker = Checker::new(ModuleScope::Root(&*self.ctx), SideTable::default());
                let scope = checker.scopes.push(None, ScopeKind::Block);
                checker.result_type(&decl.value, scope, None)
            }
        };
        let value = ReferencedValue {
            ty,
            definition: Some(self.ctx.definition(decl.name.range)),
            description: decl.description.clone(),
        };
        self.ctx
            .mapped_constants
            .insert(decl.name.name.clone(), value);
    }

    fn declare_function(&mut self, decl: &FunctionDeclaration) {
        if self.ctx.mapped_functions.contains_key(&decl.name.name) {
            self.error(SemanticError::DuplicateSymbol {
                kind: SymbolKind::Function,
                name: decl.name.name.clone(),
                range: decl.name.range,
            });
            return;
        }
        let signature = function_signature(&ModuleScope::Root(&*self.ctx), decl, false);
        let value = ReferencedValue {
            ty: RealizedType::Function(signature),
            definition: Some(self.ctx.definition(decl.name.range)),
            description: decl.description.clone(),
        };
        self.ctx
            .mapped_functions
            .insert(decl.name.name.clone(), value);
    }
}
