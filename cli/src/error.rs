#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use cdg_core::AppError;
use derive_more::{Display, From};

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// Compilation failure reported by the core library.
    #[display("{}", _0)]
    Core(AppError),

    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Model dump as JSON failed.
    #[display("JSON Error: {}", _0)]
    Json(serde_json::Error),

    /// Model dump as YAML failed.
    #[display("YAML Error: {}", _0)]
    Yaml(serde_yaml::Error),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_display_unchanged() {
        let err: CliError = AppError::Validation(vec!["a".into(), "b".into()]).into();
        assert_eq!(err.to_string(), "a\nb");
    }

    #[test]
    fn test_general_error_display() {
        let err: CliError = "no stem".to_string().into();
        assert_eq!(err.to_string(), "Operation failed: no stem");
    }
}
