//! The two-pass module validator.
//!
//! Pass 1 registers every module-level name: first the items that
//! introduce types (`use`, `struct`, `type`), then the items that attach to
//! types (`fn`, `impl`, `impl operators`), and constants last. Declaration
//! order inside a file therefore does not matter for lookups, except between
//! constants inferred from each other.
//!
//! Pass 2 walks every item against the complete symbol tables. The walk is
//! done by a [`Checker`] that borrows the finished [`ModuleContext`] and
//! writes everything it learns into a [`SideTable`].

mod call;
mod declare;
mod expr;
mod impls;
mod items;
mod operators;
mod types;

use std::sync::Arc;

use to2_common::InputRange;

use crate::ast::{Expr, TO2Module};
use crate::context::{ModuleContext, ModuleScope};
use crate::error::{SemanticError, ValidationError};
use crate::registry::Registry;
use crate::scope::{ScopeArena, ScopeId, ScopeKind};
use crate::side_table::{DefinitionRef, InlayHint, SemanticTokenModifier, SemanticTokenType, SideTable};
use crate::ty::RealizedType;
use crate::ValidationResult;

use self::declare::Declarer;

/// Validate a parsed module against a registry.
///
/// Never fails: every problem is reported as a diagnostic in the result,
/// next to whatever type information could still be inferred.
#[tracing::instrument(level = "debug", skip_all, fields(module = %module.name))]
pub fn validate_module(registry: &Arc<Registry>, module: &TO2Module) -> ValidationResult {
    let mut ctx = ModuleContext::new(Arc::clone(registry), &module.name);
    let mut table = SideTable::default();

    {
        let mut declarer = Declarer::new(&mut ctx, &mut table);
        declarer.declare_types(&module.items);
        declarer.declare_values(&module.items);
    }
    tracing::debug!(
        constants = ctx.mapped_constants.len(),
        functions = ctx.mapped_functions.len(),
        types = ctx.type_aliases.len(),
        structs = ctx.structs.len(),
        "declared module symbols"
    );

    let mut checker = Checker::new(ModuleScope::Root(&ctx), table);
    for item in &module.items {
        checker.validate_item(item);
    }
    let mut table = checker.into_table();
    table.finish();

    let errors = table.diagnostics.iter().filter(|d| d.is_error()).count();
    tracing::debug!(
        errors,
        warnings = table.diagnostics.len() - errors,
        tokens = table.semantic_tokens.len(),
        "validated module"
    );

    ValidationResult {
        diagnostics: table.diagnostics,
        semantic_tokens: table.semantic_tokens,
        inlay_hints: table.inlay_hints,
        definitions: table.definitions,
        hover: table.hover,
        types: table.types,
        context: ctx,
    }
}

// ── Checker ────────────────────────────────────────────────────────────

/// Expression walker shared by validation and pure type inference.
///
/// While `muted` is non-zero nothing is written to the side table, which
/// turns [`check_expr`](Checker::check_expr) into `result_type`.
pub(crate) struct Checker<'a> {
    module: ModuleScope<'a>,
    scopes: ScopeArena,
    table: SideTable,
    muted: u32,
}

impl<'a> Checker<'a> {
    pub(crate) fn new(module: ModuleScope<'a>, table: SideTable) -> Self {
        Checker {
            module,
            scopes: ScopeArena::new(),
            table,
            muted: 0,
        }
    }

    pub(crate) fn into_table(self) -> SideTable {
        self.table
    }

    fn ctx(&self) -> &'a ModuleContext {
        self.module.root()
    }

    /// Infer the type of `expr` without reporting anything.
    pub(crate) fn result_type(
        &mut self,
        expr: &Expr,
        scope: ScopeId,
        hint: Option<&RealizedType>,
    ) -> RealizedType {
        let mark = self.scopes.len();
        self.muted += 1;
        let child = self.scopes.push(Some(scope), ScopeKind::Block);
        let ty = self.check_expr(expr, child, hint);
        self.muted -= 1;
        self.scopes.truncate(mark);
        ty
    }

    // ── Side channels ──────────────────────────────────────────────────

    fn error(&mut self, error: SemanticError) {
        if self.muted == 0 {
            self.table.push_diagnostic(ValidationError::error(error));
        }
    }

    fn warn(&mut self, error: SemanticError) {
        if self.muted == 0 {
            self.table.push_diagnostic(ValidationError::warn(error));
        }
    }

    fn token(
        &mut self,
        range: InputRange,
        token_type: SemanticTokenType,
        modifiers: &[SemanticTokenModifier],
    ) {
        if self.muted == 0 {
            self.table.token(range, token_type, modifiers);
        }
    }

    fn definition(&mut self, range: InputRange, definition: Option<DefinitionRef>) {
        if let (0, Some(definition)) = (self.muted, definition) {
            self.table.definitions.insert(range, definition);
        }
    }

    fn hover(&mut self, range: InputRange, name: &str, ty: &RealizedType, description: &str) {
        self.hover_doc(range, hover_text(name, ty, description));
    }

    fn hover_doc(&mut self, range: InputRange, text: String) {
        if self.muted == 0 {
            self.table.hover.insert(range, text);
        }
    }

    /// `: type` after a name whose type was inferred.
    fn inlay_hint(&mut self, range: InputRange, ty: &RealizedType) {
        if self.muted == 0 {
            self.table.inlay_hints.push(InlayHint {
                position: range.end,
                label: format!(": {}", ty),
            });
        }
    }

    fn record_type(&mut self, range: InputRange, ty: &RealizedType) {
        if self.muted == 0 {
            self.table.types.insert(range, ty.clone());
        }
    }
}

fn hover_text(name: &str, ty: &RealizedType, description: &str) -> String {
    if description.is_empty() {
        format!("{}: {}", name, ty)
    } else {
        format!("{}: {}\n\n{}", name, ty, description)
    }
}

/// Token modifiers for a symbol that was not declared in this module.
fn library(definition: &Option<DefinitionRef>) -> &'static [SemanticTokenModifier] {
    if definition.is_none() {
        &[SemanticTokenModifier::DefaultLibrary]
    } else {
        &[]
    }
}
