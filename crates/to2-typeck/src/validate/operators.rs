//! Unary and binary operator resolution.

use to2_common::InputRange;

use crate::ast::Expr;
use crate::error::SemanticError;
use crate::operator::Operator;
use crate::scope::ScopeId;
use crate::ty::RealizedType;

use super::Checker;

impl<'a> Checker<'a> {
    /// `op operand`, looked up in the operand's prefix table with `Unit` on
    /// the other side.
    pub(super) fn check_unary(
        &mut self,
        range: InputRange,
        op: Operator,
        operand: &Expr,
        scope: ScopeId,
    ) -> RealizedType {
        let ctx = self.ctx();
        let ty = self.check_expr(operand, scope, None);
        if ty.is_unknown() {
            return RealizedType::Unknown;
        }
        match ty.find_prefix_operator(ctx, op, &RealizedType::unit()) {
            Some(found) => found.result_type,
            None => {
                self.error(SemanticError::UnsupportedOperation {
                    message: format!("no prefix operator `{}` for `{}`", op, ty),
                    range,
                });
                RealizedType::Unknown
            }
        }
    }

    pub(super) fn check_binary(
        &mut self,
        range: InputRange,
        left: &Expr,
        op: Operator,
        right: &Expr,
        scope: ScopeId,
    ) -> RealizedType {
        if op.is_logical() {
            let ctx = self.ctx();
            let bool_type = RealizedType::bool();
            for side in [left, right] {
                let ty = self.check_expr(side, scope, Some(&bool_type));
                if !bool_type.is_assignable_from(ctx, &ty) {
                    self.error(SemanticError::TypeMismatch {
                        expected: bool_type.clone(),
                        found: ty,
                        range: side.range,
                    });
                }
            }
            return bool_type;
        }

        let lhs = self.check_expr(left, scope, None);
        let rhs = self.check_expr(right, scope, None);
        self.apply_binary(range, &lhs, op, &rhs)
    }

    /// Result of `lhs op rhs`: the left operand's suffix table first, then
    /// the right operand's prefix table.
    pub(super) fn apply_binary(
        &mut self,
        range: InputRange,
        lhs: &RealizedType,
        op: Operator,
        rhs: &RealizedType,
    ) -> RealizedType {
        if lhs.is_unknown() || rhs.is_unknown() {
            return RealizedType::Unknown;
        }
        let ctx = self.ctx();
        if let Some(found) = lhs.find_suffix_operator(ctx, op, rhs) {
            return found.result_type;
        }
        if let Some(found) = rhs.find_prefix_operator(ctx, op, lhs) {
            return found.result_type;
        }
        self.error(SemanticError::UnsupportedOperation {
            message: format!("no operator `{}` for `{}` and `{}`", op, lhs, rhs),
            range,
        });
        RealizedType::Unknown
    }
}
