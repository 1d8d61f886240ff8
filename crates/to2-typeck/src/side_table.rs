//! Side-channel output of a validation run.
//!
//! The AST stays immutable; everything the validator learns about it is
//! written here, keyed by source range.

use rustc_hash::FxHashMap;
use serde::Serialize;
use to2_common::{InputPosition, InputRange};

use crate::error::ValidationError;
use crate::ty::RealizedType;

/// Where a symbol was declared, for go-to-definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionRef {
    pub module_name: String,
    pub range: InputRange,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SemanticTokenType {
    Namespace,
    Type,
    Struct,
    Parameter,
    Variable,
    Property,
    Function,
    Method,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SemanticTokenModifier {
    Declaration,
    Readonly,
    DefaultLibrary,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SemanticToken {
    #[serde(rename = "type")]
    pub token_type: SemanticTokenType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<SemanticTokenModifier>,
    pub range: InputRange,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InlayHint {
    pub position: InputPosition,
    pub label: String,
}

/// Everything collected during one walk.
#[derive(Debug, Default)]
pub struct SideTable {
    pub diagnostics: Vec<ValidationError>,
    pub semantic_tokens: Vec<SemanticToken>,
    pub inlay_hints: Vec<InlayHint>,
    pub definitions: FxHashMap<InputRange, DefinitionRef>,
    pub hover: FxHashMap<InputRange, String>,
    pub types: FxHashMap<InputRange, RealizedType>,
}

impl SideTable {
    pub fn push_diagnostic(&mut self, diagnostic: ValidationError) {
        self.diagnostics.push(diagnostic);
    }

    pub fn token(
        &mut self,
        range: InputRange,
        token_type: SemanticTokenType,
        modifiers: &[SemanticTokenModifier],
    ) {
        self.semantic_tokens.push(SemanticToken {
            token_type,
            modifiers: modifiers.to_vec(),
            range,
        });
    }

    /// Sort tokens and hints into document order, the order editors expect.
    pub fn finish(&mut self) {
        self.semantic_tokens
            .sort_by_key(|t| (t.range.start.offset, t.range.end.offset));
        self.semantic_tokens
            .dedup_by(|a, b| a.range == b.range && a.token_type == b.token_type);
        self.inlay_hints.sort_by_key(|h| h.position.offset);
    }
}
