//! # Error Handling
//!
//! Provides the unified `AppError` enum and the `Diagnostic` record reported
//! while parsing a description file.

use derive_more::{Display, From};
use serde::Serialize;

/// A located message produced while scanning or parsing a description.
///
/// Renders as `file:line: error: message`, the layout compilers use so that
/// editors can jump to the offending line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display)]
#[display("{file}:{line}: error: {message}")]
pub struct Diagnostic {
    /// Display name of the description file.
    pub file: String,
    /// 1-based line number.
    pub line: usize,
    /// Human readable message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic for `file` at `line`.
    pub fn new(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            message: message.into(),
        }
    }
}

/// The Global Error Enum.
///
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Lexical, grammar or field-value errors collected during one parse.
    #[from(ignore)]
    #[display("{}", render_diagnostics(_0))]
    Parse(Vec<Diagnostic>),

    /// Semantic errors aggregated by the validation pass.
    #[from(ignore)]
    #[display("{}", _0.join("\n"))]
    Validation(Vec<String>),

    /// Generation was requested before the description validated.
    #[from(ignore)]
    #[display("Emit Error: {_0}")]
    Emit(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
