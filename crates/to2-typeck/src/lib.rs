//! TO2 static semantic analysis.
//!
//! This crate validates a parsed TO2 module against a registry of host and
//! library modules. It infers the type of every expression, resolves names
//! through nested scopes and module imports, binds generic type parameters,
//! looks up operator overloads and reports problems as diagnostics. Next to
//! the diagnostics it produces the data an editor needs: semantic tokens,
//! inlay hints, hover text and go-to-definition targets.
//!
//! # Architecture
//!
//! - [`registry`]: immutable catalogue of module descriptors, shared as `Arc`
//! - [`builtins`]: builtin and prelude type descriptors
//! - [`typeref`]: resolving serialized type references to realized types
//! - [`ty`]: the closed [`RealizedType`] model and assignability
//! - [`generics`]: placeholder binding, inference and erasure
//! - [`members`]: field, method and operator lookup on realized types
//! - [`operator`]: operator vocabulary and `impl operators` function names
//! - [`context`]: module-level symbol tables
//! - [`scope`]: arena of block, loop and function scopes
//! - [`ast`]: the immutable AST contract produced by the parser
//! - [`validate`]: the two-pass validator and the operator installer
//! - [`side_table`], [`error`], [`diagnostics`]: everything a run reports

pub mod ast;
pub mod builtins;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod generics;
pub mod members;
pub mod operator;
pub mod registry;
pub mod scope;
pub mod side_table;
pub mod ty;
pub mod typeref;
pub mod validate;

use rustc_hash::FxHashMap;
use to2_common::InputRange;

use crate::context::ModuleContext;
use crate::diagnostics::{render_diagnostic, DiagnosticOptions};
use crate::error::ValidationError;
use crate::side_table::{DefinitionRef, InlayHint, SemanticToken};

pub use crate::registry::{Registry, RegistryError};
pub use crate::ty::RealizedType;
pub use crate::validate::validate_module;

/// Everything learned while validating one module.
///
/// Tokens and inlay hints are in document order. Maps are keyed by the
/// source range of the node they describe.
#[derive(Debug)]
pub struct ValidationResult {
    pub diagnostics: Vec<ValidationError>,
    pub semantic_tokens: Vec<SemanticToken>,
    pub inlay_hints: Vec<InlayHint>,
    pub definitions: FxHashMap<InputRange, DefinitionRef>,
    pub hover: FxHashMap<InputRange, String>,
    /// Inferred type of every expression node.
    pub types: FxHashMap<InputRange, RealizedType>,
    /// The module's symbol tables after pass 1.
    pub context: ModuleContext,
}

impl ValidationResult {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationError> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(ValidationError::is_error)
    }

    /// Render every diagnostic, in report order.
    pub fn render_diagnostics(
        &self,
        source: &str,
        filename: &str,
        options: &DiagnosticOptions,
    ) -> Vec<String> {
        self.diagnostics
            .iter()
            .map(|d| render_diagnostic(d, source, filename, options))
            .collect()
    }

    /// Type of the innermost expression covering `offset`.
    pub fn type_at(&self, offset: u32) -> Option<&RealizedType> {
        innermost(&self.types, offset)
    }

    pub fn hover_at(&self, offset: u32) -> Option<&str> {
        innermost(&self.hover, offset).map(String::as_str)
    }

    pub fn definition_at(&self, offset: u32) -> Option<&DefinitionRef> {
        innermost(&self.definitions, offset)
    }
}

fn innermost<T>(map: &FxHashMap<InputRange, T>, offset: u32) -> Option<&T> {
    map.iter()
        .filter(|(range, _)| range.contains(offset))
        .min_by_key(|(range, _)| (range.len(), range.start.offset))
        .map(|(_, value)| value)
}
