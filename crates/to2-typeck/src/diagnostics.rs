//! Ariadne-based rendering of validation diagnostics.
//!
//! A diagnostic is rendered either as a labeled source excerpt or, in JSON
//! mode, as a single JSON object per line for tooling.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use to2_common::InputRange;

use crate::error::{SemanticError, Severity, ValidationError};
use crate::ty::RealizedType;

/// How diagnostics are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticOptions {
    pub color: bool,
    /// One JSON object per diagnostic instead of a source excerpt.
    pub json: bool,
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        DiagnosticOptions {
            color: true,
            json: false,
        }
    }
}

impl DiagnosticOptions {
    /// Plain text output, for snapshots and pipes.
    pub fn colorless() -> Self {
        DiagnosticOptions {
            color: false,
            json: false,
        }
    }

    pub fn json_mode() -> Self {
        DiagnosticOptions {
            color: false,
            json: true,
        }
    }
}

// ── Labels ─────────────────────────────────────────────────────────────

fn label(error: &SemanticError) -> String {
    match error {
        SemanticError::DuplicateSymbol { kind, .. } => format!("{} already declared", kind),
        SemanticError::UndefinedSymbol { owner: Some(owner), .. } => {
            format!("not found in `{}`", owner)
        }
        SemanticError::UndefinedSymbol { .. } => "not found in this scope".to_string(),
        SemanticError::NotCallable { ty, .. } => format!("`{}` is not a function", ty),
        SemanticError::TypeMismatch {
            expected, found, ..
        } => format!("expected `{}`, found `{}`", expected, found),
        SemanticError::InvalidOperatorDeclaration { .. } => "invalid operator overload".to_string(),
        SemanticError::ArityMismatch { expected, .. } => format!("expected {}", expected),
        SemanticError::InvalidControlFlow { keyword, .. } => format!("`{}` not allowed here", keyword),
        SemanticError::UnsupportedOperation { .. }
        | SemanticError::InvalidDeclaration { .. }
        | SemanticError::InferenceFailure { .. } => "here".to_string(),
    }
}

fn help(error: &SemanticError) -> Option<String> {
    match error {
        SemanticError::TypeMismatch {
            expected, found, ..
        } => fix_suggestion(expected, found),
        SemanticError::ArityMismatch {
            expected, found, ..
        } => Some(if expected > found {
            format!("missing {}", expected - found)
        } else {
            format!("{} too many", found - expected)
        }),
        SemanticError::InferenceFailure { .. } => Some("add a type annotation".to_string()),
        _ => None,
    }
}

/// A plausible fix for a type mismatch.
fn fix_suggestion(expected: &RealizedType, found: &RealizedType) -> Option<String> {
    match expected {
        RealizedType::Option(inner) if **inner == *found => Some("wrap in Some(...)".to_string()),
        RealizedType::Result(ok, _) if **ok == *found => Some("wrap in Ok(...)".to_string()),
        _ if *expected == RealizedType::string() && *found != RealizedType::Unknown => {
            Some("use to_string()".to_string())
        }
        _ => None,
    }
}

// ── Rendering ──────────────────────────────────────────────────────────

/// Byte span of `range`, clamped to the source and at least one character
/// wide when the source allows it.
fn span(range: InputRange, source_len: usize) -> Range<usize> {
    let r = range.to_byte_range();
    let start = r.start.min(source_len);
    let end = r.end.min(source_len).max(start);
    if start == end {
        start..(end + 1).min(source_len)
    } else {
        start..end
    }
}

/// Render one diagnostic against the source it was reported for.
pub fn render_diagnostic(
    diagnostic: &ValidationError,
    source: &str,
    filename: &str,
    options: &DiagnosticOptions,
) -> String {
    let category = diagnostic.category();
    let range = diagnostic.range();
    let span = span(range, source.len());

    if options.json {
        return serde_json::json!({
            "code": category.code(),
            "severity": diagnostic.status,
            "category": category,
            "message": diagnostic.message(),
            "file": filename,
            "spans": [{
                "start": span.start,
                "end": span.end,
                "line": range.start.line + 1,
                "column": range.start.character + 1,
                "label": label(&diagnostic.error),
            }],
            "fix": help(&diagnostic.error),
        })
        .to_string();
    }

    let (kind, color) = match diagnostic.status {
        Severity::Error => (ReportKind::Error, Color::Red),
        Severity::Warn => (ReportKind::Warning, Color::Yellow),
    };
    let mut builder = Report::build(kind, span.clone())
        .with_code(category.code())
        .with_message(diagnostic.message())
        .with_config(Config::default().with_color(options.color))
        .with_label(
            Label::new(span)
                .with_message(label(&diagnostic.error))
                .with_color(color),
        );
    if let Some(help) = help(&diagnostic.error) {
        builder.set_help(help);
    }

    let mut buf = Vec::new();
    match builder.finish().write(Source::from(source), &mut buf) {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(err) => {
            tracing::debug!(%err, "falling back to plain diagnostic");
            format!("{}: {}\n", filename, diagnostic)
        }
    }
}
