//! Validation of type annotations.

use crate::ast::{TypeSpec, TypeSpecKind};
use crate::error::{SemanticError, SymbolKind};
use crate::side_table::{SemanticTokenModifier as Mod, SemanticTokenType as Token};
use crate::ty::RealizedType;

use super::Checker;

impl<'a> Checker<'a> {
    /// Resolve an annotation, reporting unknown names and wrong generic
    /// argument counts. Anything unresolvable becomes `Unknown`.
    pub(super) fn validate_type_spec(&mut self, spec: &TypeSpec) -> RealizedType {
        match &spec.kind {
            TypeSpecKind::Named {
                namespace,
                name,
                generic_args,
            } => {
                for arg in generic_args {
                    self.validate_type_spec(arg);
                }
                let ctx = self.ctx();
                let Some(base) = self.module.find_type(namespace.as_deref(), name) else {
                    let error = match namespace {
                        Some(namespace) if ctx.find_module(namespace).is_none() => {
                            SemanticError::UndefinedSymbol {
                                kind: SymbolKind::Module,
                                name: namespace.clone(),
                                owner: None,
                                range: spec.range,
                            }
                        }
                        _ => SemanticError::UndefinedSymbol {
                            kind: SymbolKind::Type,
                            name: name.clone(),
                            owner: namespace.clone(),
                            range: spec.range,
                        },
                    };
                    self.error(error);
                    return RealizedType::Unknown;
                };

                let name_range = match namespace {
                    None if !generic_args.is_empty() => spec.range.prefix(name.len() as u32),
                    _ => spec.range,
                };
                let local = match namespace {
                    None if name != "Self" => ctx.type_aliases.get(name),
                    _ => None,
                };
                match local {
                    Some(alias) if alias.is_struct => {
                        self.token(name_range, Token::Struct, &[]);
                        self.definition(name_range, alias.definition.clone());
                    }
                    Some(alias) if alias.definition.is_some() => {
                        self.token(name_range, Token::Type, &[]);
                        self.definition(name_range, alias.definition.clone());
                    }
                    _ => self.token(name_range, Token::Type, &[Mod::DefaultLibrary]),
                }

                if !generic_args.is_empty() {
                    let expected = base.generic_parameter_names(ctx).len();
                    if expected != generic_args.len() {
                        self.error(SemanticError::ArityMismatch {
                            what: format!("type arguments for `{}`", name),
                            expected,
                            found: generic_args.len(),
                            range: spec.range,
                        });
                        return RealizedType::Unknown;
                    }
                }
                let ty = spec.resolve(&self.module);
                self.hover_doc(name_range, ty.description(ctx));
                ty
            }
            TypeSpecKind::Array { element } => {
                self.validate_type_spec(element);
                spec.resolve(&self.module)
            }
            TypeSpecKind::Option { inner } => {
                self.validate_type_spec(inner);
                spec.resolve(&self.module)
            }
            TypeSpecKind::Result { ok, err } => {
                self.validate_type_spec(ok);
                self.validate_type_spec(err);
                spec.resolve(&self.module)
            }
            TypeSpecKind::Tuple { items } => {
                for item in items {
                    self.validate_type_spec(item);
                }
                spec.resolve(&self.module)
            }
            TypeSpecKind::Record { items } => {
                for item in items {
                    self.validate_type_spec(&item.type_spec);
                }
                spec.resolve(&self.module)
            }
            TypeSpecKind::Function {
                parameters,
                return_type,
                ..
            } => {
                for param in parameters {
                    self.validate_type_spec(param);
                }
                self.validate_type_spec(return_type);
                spec.resolve(&self.module)
            }
        }
    }
}
