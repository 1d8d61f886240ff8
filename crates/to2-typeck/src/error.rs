//! Semantic errors reported by the validator.
//!
//! Every error carries the source range it is reported at. Errors are
//! accumulated, never thrown: lookups return `Option`, and only the node
//! that has enough context to build a message turns a miss into a
//! [`SemanticError`].

use std::fmt;

use serde::ser::SerializeStruct;
use serde::Serialize;
use to2_common::InputRange;

use crate::ty::RealizedType;

/// Severity of a reported problem.
///
/// `Warn` is reserved for consequences of an already reported `Unknown`
/// type; the original fault is always an `Error`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warn,
    Error,
}

/// Coarse error taxonomy, stable across message wording changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCategory {
    DuplicateSymbol,
    UndefinedSymbol,
    NotCallable,
    TypeMismatch,
    InvalidOperatorDeclaration,
    ArityMismatch,
    UnsupportedOperation,
    InvalidControlFlow,
    InvalidDeclaration,
    InferenceFailure,
}

impl ErrorCategory {
    pub fn code(self) -> &'static str {
        match self {
            ErrorCategory::DuplicateSymbol => "E0001",
            ErrorCategory::UndefinedSymbol => "E0002",
            ErrorCategory::NotCallable => "E0003",
            ErrorCategory::TypeMismatch => "E0004",
            ErrorCategory::InvalidOperatorDeclaration => "E0005",
            ErrorCategory::ArityMismatch => "E0006",
            ErrorCategory::UnsupportedOperation => "E0007",
            ErrorCategory::InvalidControlFlow => "E0008",
            ErrorCategory::InvalidDeclaration => "E0009",
            ErrorCategory::InferenceFailure => "E0010",
        }
    }
}

/// What kind of symbol a duplicate/undefined error is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Constant,
    Function,
    Type,
    Struct,
    Field,
    Method,
    Module,
    Parameter,
    /// Any export of a registry module, in `use { name } from module`.
    Symbol,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Constant => "constant",
            SymbolKind::Function => "function",
            SymbolKind::Type => "type",
            SymbolKind::Struct => "struct",
            SymbolKind::Field => "field",
            SymbolKind::Method => "method",
            SymbolKind::Module => "module",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Symbol => "symbol",
        };
        f.write_str(s)
    }
}

/// Why an `impl operators` function was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperatorProblem {
    UnknownName,
    UnaryArity { found: usize },
    BinaryArity { found: usize },
    UnaryOperand,
    NoStructOperand,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SemanticError {
    DuplicateSymbol {
        kind: SymbolKind,
        name: String,
        range: InputRange,
    },
    /// `owner` names the type or module the symbol was looked up in.
    UndefinedSymbol {
        kind: SymbolKind,
        name: String,
        owner: Option<String>,
        range: InputRange,
    },
    NotCallable {
        name: String,
        ty: RealizedType,
        range: InputRange,
    },
    TypeMismatch {
        expected: RealizedType,
        found: RealizedType,
        range: InputRange,
    },
    InvalidOperatorDeclaration {
        name: String,
        struct_name: String,
        problem: OperatorProblem,
        range: InputRange,
    },
    ArityMismatch {
        what: String,
        expected: usize,
        found: usize,
        range: InputRange,
    },
    UnsupportedOperation {
        message: String,
        range: InputRange,
    },
    InvalidControlFlow {
        keyword: String,
        range: InputRange,
    },
    InvalidDeclaration {
        message: String,
        range: InputRange,
    },
    InferenceFailure {
        message: String,
        range: InputRange,
    },
}

impl SemanticError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SemanticError::DuplicateSymbol { .. } => ErrorCategory::DuplicateSymbol,
            SemanticError::UndefinedSymbol { .. } => ErrorCategory::UndefinedSymbol,
            SemanticError::NotCallable { .. } => ErrorCategory::NotCallable,
            SemanticError::TypeMismatch { .. } => ErrorCategory::TypeMismatch,
            SemanticError::InvalidOperatorDeclaration { .. } => {
                ErrorCategory::InvalidOperatorDeclaration
            }
            SemanticError::ArityMismatch { .. } => ErrorCategory::ArityMismatch,
            SemanticError::UnsupportedOperation { .. } => ErrorCategory::UnsupportedOperation,
            SemanticError::InvalidControlFlow { .. } => ErrorCategory::InvalidControlFlow,
            SemanticError::InvalidDeclaration { .. } => ErrorCategory::InvalidDeclaration,
            SemanticError::InferenceFailure { .. } => ErrorCategory::InferenceFailure,
        }
    }

    pub fn range(&self) -> InputRange {
        match self {
            SemanticError::DuplicateSymbol { range, .. }
            | SemanticError::UndefinedSymbol { range, .. }
            | SemanticError::NotCallable { range, .. }
            | SemanticError::TypeMismatch { range, .. }
            | SemanticError::InvalidOperatorDeclaration { range, .. }
            | SemanticError::ArityMismatch { range, .. }
            | SemanticError::UnsupportedOperation { range, .. }
            | SemanticError::InvalidControlFlow { range, .. }
            | SemanticError::InvalidDeclaration { range, .. }
            | SemanticError::InferenceFailure { range, .. } => *range,
        }
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticError::DuplicateSymbol { kind, name, .. } => {
                write!(f, "duplicate {} `{}`", kind, name)
            }
            SemanticError::UndefinedSymbol {
                kind, name, owner, ..
            } => match owner {
                Some(owner) => write!(f, "undefined {} `{}` in `{}`", kind, name, owner),
                None => write!(f, "undefined {} `{}`", kind, name),
            },
            SemanticError::NotCallable { name, ty, .. } => {
                write!(f, "`{}` of type `{}` is not callable", name, ty)
            }
            SemanticError::TypeMismatch {
                expected, found, ..
            } => write!(f, "type mismatch: expected `{}`, found `{}`", expected, found),
            SemanticError::InvalidOperatorDeclaration {
                name,
                struct_name,
                problem,
                ..
            } => match problem {
                OperatorProblem::UnknownName => write!(
                    f,
                    "`{}` is not an operator; expected one of {}",
                    name,
                    crate::operator::OPERATOR_FUNCTION_NAMES.join(", ")
                ),
                OperatorProblem::UnaryArity { found } => write!(
                    f,
                    "unary operator `{}` takes exactly 1 parameter, found {}",
                    name, found
                ),
                OperatorProblem::BinaryArity { found } => write!(
                    f,
                    "binary operator `{}` takes exactly 2 parameters, found {}",
                    name, found
                ),
                OperatorProblem::UnaryOperand => write!(
                    f,
                    "parameter of unary operator `{}` must accept `{}`",
                    name, struct_name
                ),
                OperatorProblem::NoStructOperand => write!(
                    f,
                    "one parameter of operator `{}` must accept `{}`",
                    name, struct_name
                ),
            },
            SemanticError::ArityMismatch {
                what,
                expected,
                found,
                ..
            } => write!(f, "{}: expected {}, found {}", what, expected, found),
            SemanticError::UnsupportedOperation { message, .. }
            | SemanticError::InvalidDeclaration { message, .. }
            | SemanticError::InferenceFailure { message, .. } => write!(f, "{}", message),
            SemanticError::InvalidControlFlow { keyword, .. } => match keyword.as_str() {
                "return" => write!(f, "`return` outside of a function"),
                _ => write!(f, "`{}` outside of a loop", keyword),
            },
        }
    }
}

/// A reported problem together with its severity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    pub status: Severity,
    pub error: SemanticError,
}

impl ValidationError {
    pub fn error(error: SemanticError) -> Self {
        ValidationError {
            status: Severity::Error,
            error,
        }
    }

    pub fn warn(error: SemanticError) -> Self {
        ValidationError {
            status: Severity::Warn,
            error,
        }
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub fn range(&self) -> InputRange {
        self.error.range()
    }

    pub fn category(&self) -> ErrorCategory {
        self.error.category()
    }

    pub fn is_error(&self) -> bool {
        self.status == Severity::Error
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.range();
        write!(
            f,
            "{}:{}: {}",
            range.start.line + 1,
            range.start.character + 1,
            self.error
        )
    }
}

impl Serialize for ValidationError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let category = self.category();
        let mut state = serializer.serialize_struct("ValidationError", 5)?;
        state.serialize_field("status", &self.status)?;
        state.serialize_field("category", &category)?;
        state.serialize_field("code", category.code())?;
        state.serialize_field("message", &self.message())?;
        state.serialize_field("range", &self.range())?;
        state.end()
    }
}
