//! Attaching methods and operator overloads to module-local structs.
//!
//! Runs in pass 1b, after every struct is registered, so an impl block may
//! precede the struct it extends. Bodies are validated in pass 2.

use crate::ast::{FunctionDeclaration, Ident, ImplDeclaration, ImplOperatorsDeclaration};
use crate::context::{ModuleScope, OperatorEntry, ReferencedValue};
use crate::error::{OperatorProblem, SemanticError, SymbolKind};
use crate::operator::{operator_for_function, Operator, OperatorArity};
use crate::ty::RealizedType;

use super::declare::{function_signature, Declarer};

/// Which operator table of the struct an overload lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    /// Struct on the right: `other op self`, or unary `op self`.
    Prefix,
    /// Struct on the left: `self op other`.
    Suffix,
}

impl Declarer<'_> {
    /// The struct type an impl block extends. Reports an undefined struct.
    fn impl_target(&mut self, name: &Ident) -> Option<RealizedType> {
        match self.ctx.type_aliases.get(&name.name) {
            Some(alias) if alias.is_struct => Some(alias.ty.clone()),
            _ => {
                self.error(SemanticError::UndefinedSymbol {
                    kind: SymbolKind::Struct,
                    name: name.name.clone(),
                    owner: None,
                    range: name.range,
                });
                None
            }
        }
    }

    pub(super) fn declare_impl(&mut self, decl: &ImplDeclaration) {
        let Some(struct_type) = self.impl_target(&decl.name) else {
            return;
        };

        let signatures: Vec<_> = {
            let scope = ModuleScope::Impl {
                root: &*self.ctx,
                struct_name: &decl.name.name,
                struct_type: &struct_type,
            };
            decl.methods
                .iter()
                .map(|method| function_signature(&scope, method, true))
                .collect()
        };

        for (method, signature) in decl.methods.iter().zip(signatures) {
            let has_receiver = method
                .parameters
                .first()
                .map(|p| p.name.name == "self")
                .unwrap_or(false);
            if !has_receiver {
                self.error(SemanticError::InvalidDeclaration {
                    message: format!(
                        "method `{}` of `{}` must take `self` as its first parameter",
                        method.name.name, decl.name.name
                    ),
                    range: method.name.range,
                });
                continue;
            }

            let value = ReferencedValue {
                ty: RealizedType::Function(signature),
                definition: Some(self.ctx.definition(method.name.range)),
                description: method.description.clone(),
            };
            let imp = self.ctx.structs.entry(decl.name.name.clone()).or_default();
            let duplicate = imp.methods.contains_key(&method.name.name);
            if !duplicate {
                imp.methods.insert(method.name.name.clone(), value);
            } else {
                self.error(SemanticError::DuplicateSymbol {
                    kind: SymbolKind::Method,
                    name: method.name.name.clone(),
                    range: method.name.range,
                });
            }
        }
    }

    pub(super) fn declare_impl_operators(&mut self, decl: &ImplOperatorsDeclaration) {
        let Some(struct_type) = self.impl_target(&decl.name) else {
            return;
        };

        for function in &decl.functions {
            let classified = {
                let scope = ModuleScope::Impl {
                    root: &*self.ctx,
                    struct_name: &decl.name.name,
                    struct_type: &struct_type,
                };
                classify_operator(&scope, &struct_type, function)
            };
            match classified {
                Ok((op, side, entry)) => {
                    tracing::trace!(
                        target_struct = %decl.name.name,
                        operator = %op,
                        ?side,
                        other = %entry.other_type,
                        "operator overload"
                    );
                    let imp = self.ctx.structs.entry(decl.name.name.clone()).or_default();
                    let table = match side {
                        Side::Prefix => &mut imp.prefix_operators,
                        Side::Suffix => &mut imp.suffix_operators,
                    };
                    table.entry(op).or_default().push(entry);
                }
                Err(problem) => self.error(SemanticError::InvalidOperatorDeclaration {
                    name: function.name.name.clone(),
                    struct_name: decl.name.name.clone(),
                    problem,
                    range: function.name.range,
                }),
            }
        }
    }
}

/// Decide which operator an `impl operators` function overloads and which
/// side of it the struct is on.
fn classify_operator(
    scope: &ModuleScope<'_>,
    struct_type: &RealizedType,
    function: &FunctionDeclaration,
) -> Result<(Operator, Side, OperatorEntry), OperatorProblem> {
    let ctx = scope.root();
    let (op, arity) =
        operator_for_function(&function.name.name).ok_or(OperatorProblem::UnknownName)?;
    let signature = function_signature(scope, function, false);
    let found = signature.parameters.len();
    let entry = |other_type: RealizedType| OperatorEntry {
        other_type,
        result_type: (*signature.return_type).clone(),
        definition: Some(ctx.definition(function.name.range)),
    };

    if found != arity.parameter_count() {
        return Err(match arity {
            OperatorArity::Unary => OperatorProblem::UnaryArity { found },
            OperatorArity::Binary => OperatorProblem::BinaryArity { found },
        });
    }

    match signature.parameters.as_slice() {
        [operand] => {
            if operand.ty.is_assignable_from(ctx, struct_type) {
                Ok((op, Side::Prefix, entry(RealizedType::unit())))
            } else {
                Err(OperatorProblem::UnaryOperand)
            }
        }
        [left, right] => {
            if left.ty.is_assignable_from(ctx, struct_type) {
                Ok((op, Side::Suffix, entry(right.ty.clone())))
            } else if right.ty.is_assignable_from(ctx, struct_type) {
                Ok((op, Side::Prefix, entry(left.ty.clone())))
            } else {
                Err(OperatorProblem::NoStructOperand)
            }
        }
        _ => Err(OperatorProblem::BinaryArity { found }),
    }
}
