//! # Compiler
//!
//! Stateful front door of the library. A [`Compiler`] runs one description
//! through the four steps of a compilation:
//!
//! 1. [`Compiler::parse_file`] reads and parses the whole input,
//! 2. [`Compiler::validate`] fills in defaults and checks the tree,
//! 3. [`Compiler::emit_declaration`] and [`Compiler::emit_definition`]
//!    write the generated artifacts, as often as needed.
//!
//! Each step reports success as a boolean and keeps its diagnostics so the
//! caller decides how to present them. [`compile`] chains all of them for
//! callers that only want the two texts or an [`AppError`].

use crate::codegen::{generate_declaration, generate_definition, GeneratorConfig};
use crate::error::{AppError, AppResult, Diagnostic};
use crate::model::Unit;
use crate::parser::Parser;
use crate::schema::SchemaRegistry;
use crate::scope::Scope;
use crate::validator;
use std::io::{Read, Write};
use tracing::{debug, error};

/// One compilation: parsed tree, diagnostics and validated model.
#[derive(Debug)]
pub struct Compiler {
    registry: &'static SchemaRegistry,
    file: String,
    root: Option<Scope>,
    diagnostics: Vec<Diagnostic>,
    validation_errors: Vec<String>,
    unit: Option<Unit>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    /// Creates a compiler using the built-in grammar.
    pub fn new() -> Self {
        Self::with_registry(SchemaRegistry::global())
    }

    /// Creates a compiler using another grammar.
    pub fn with_registry(registry: &'static SchemaRegistry) -> Self {
        Self {
            registry,
            file: String::new(),
            root: None,
            diagnostics: Vec::new(),
            validation_errors: Vec::new(),
            unit: None,
        }
    }

    /// Parses the whole `input`, shown as `display_name` in diagnostics.
    ///
    /// Any previous state is discarded. Returns true when no diagnostic was
    /// reported; the diagnostics are available from [`Compiler::diagnostics`].
    pub fn parse_file<R: Read>(&mut self, input: R, display_name: &str) -> bool {
        self.file = display_name.to_string();
        self.root = None;
        self.diagnostics.clear();
        self.validation_errors.clear();
        self.unit = None;

        match Parser::parse_reader(self.registry, display_name, input) {
            Ok(outcome) => {
                debug!(
                    file = display_name,
                    scopes = outcome.root.count(),
                    diagnostics = outcome.diagnostics.len(),
                    "parse finished"
                );
                self.diagnostics = outcome.diagnostics;
                self.root = Some(outcome.root);
            }
            Err(err) => {
                let diagnostic =
                    Diagnostic::new(display_name, 0, format!("unable to read input: {}", err));
                error!("{}", diagnostic);
                self.diagnostics.push(diagnostic);
            }
        }
        self.diagnostics.is_empty()
    }

    /// Defaults and validates the parsed tree, then builds the model.
    ///
    /// Fails without touching the tree when the parse failed; the message
    /// then lists the parse diagnostics.
    pub fn validate(&mut self) -> bool {
        self.unit = None;
        self.validation_errors.clear();

        if !self.diagnostics.is_empty() {
            self.validation_errors = self.diagnostics.iter().map(ToString::to_string).collect();
            return false;
        }
        let Some(root) = self.root.as_mut() else {
            self.validation_errors
                .push("no description parsed, nothing to validate".to_string());
            return false;
        };

        match validator::validate(root, &self.file) {
            Ok(unit) => {
                self.unit = Some(unit);
                true
            }
            Err(errors) => {
                for message in &errors {
                    error!("{}", message);
                }
                self.validation_errors = errors;
                false
            }
        }
    }

    /// Aggregated message of the last failed validation, empty otherwise.
    pub fn validation_message(&self) -> String {
        self.validation_errors.join("\n")
    }

    /// Individual problems of the last failed validation.
    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    /// Parse diagnostics in input order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The parsed tree, present even when the parse reported errors.
    pub fn tree(&self) -> Option<&Scope> {
        self.root.as_ref()
    }

    /// The validated model, present only after a successful validation.
    pub fn model(&self) -> Option<&Unit> {
        self.unit.as_ref()
    }

    /// Writes the declaration artifact.
    pub fn emit_declaration<W: Write>(&self, out: &mut W, config: &GeneratorConfig) -> AppResult<()> {
        let unit = self.validated()?;
        out.write_all(generate_declaration(unit, config).as_bytes())?;
        Ok(())
    }

    /// Writes the definition artifact.
    pub fn emit_definition<W: Write>(&self, out: &mut W, config: &GeneratorConfig) -> AppResult<()> {
        let unit = self.validated()?;
        out.write_all(generate_definition(unit, config).as_bytes())?;
        Ok(())
    }

    fn validated(&self) -> AppResult<&Unit> {
        self.unit.as_ref().ok_or_else(|| {
            AppError::Emit(format!(
                "\"{}\" has not been successfully validated",
                self.file
            ))
        })
    }
}

/// Both generated texts of one description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// Declaration artifact (header).
    pub declaration: String,
    /// Definition artifact (source).
    pub definition: String,
}

/// Parses, validates and generates `text` in one call.
pub fn compile(text: &str, config: &GeneratorConfig) -> AppResult<Artifacts> {
    let mut compiler = Compiler::new();
    if !compiler.parse_file(text.as_bytes(), &config.source_name) {
        return Err(AppError::Parse(compiler.diagnostics));
    }
    if !compiler.validate() {
        return Err(AppError::Validation(compiler.validation_errors));
    }
    let mut declaration = Vec::new();
    let mut definition = Vec::new();
    compiler.emit_declaration(&mut declaration, config)?;
    compiler.emit_definition(&mut definition, config)?;
    Ok(Artifacts {
        declaration: String::from_utf8_lossy(&declaration).into_owned(),
        definition: String::from_utf8_lossy(&definition).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINT: &str = "class {\n  name Point;\n  member {\n    name X;\n    type double;\n  }\n}\n";

    fn config() -> GeneratorConfig {
        GeneratorConfig::new("point.cdg", "point.h")
    }

    #[test]
    fn test_steps_in_order() {
        let mut compiler = Compiler::new();
        assert!(compiler.parse_file(POINT.as_bytes(), "point.cdg"));
        assert!(compiler.model().is_none());
        assert!(compiler.validate());
        assert_eq!(compiler.validation_message(), "");
        assert_eq!(compiler.model().unwrap().classes().count(), 1);

        let mut header = Vec::new();
        compiler.emit_declaration(&mut header, &config()).unwrap();
        let header = String::from_utf8(header).unwrap();
        assert!(header.contains("class Point\n{\n"));
    }

    #[test]
    fn test_emit_requires_validation() {
        let mut compiler = Compiler::new();
        assert!(compiler.parse_file(POINT.as_bytes(), "point.cdg"));
        let mut out = Vec::new();
        let err = compiler.emit_definition(&mut out, &config()).unwrap_err();
        assert!(matches!(err, AppError::Emit(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_validate_after_failed_parse_lists_diagnostics() {
        let mut compiler = Compiler::new();
        assert!(!compiler.parse_file("class { name A;".as_bytes(), "broken.cdg"));
        assert!(!compiler.diagnostics().is_empty());
        assert!(!compiler.validate());
        assert!(compiler.validation_message().contains("broken.cdg:"));
        assert!(compiler.model().is_none());
    }

    #[test]
    fn test_validate_without_parse() {
        let mut compiler = Compiler::new();
        assert!(!compiler.validate());
        assert!(compiler.validation_message().contains("nothing to validate"));
    }

    #[test]
    fn test_parse_resets_previous_run() {
        let mut compiler = Compiler::new();
        assert!(!compiler.parse_file("}".as_bytes(), "a.cdg"));
        assert!(compiler.parse_file(POINT.as_bytes(), "b.cdg"));
        assert!(compiler.diagnostics().is_empty());
    }

    #[test]
    fn test_compile_errors() {
        let err = compile("class { name A; member { name X; } }", &config()).unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
        assert!(err.to_string().contains("\"type\""));

        let err = compile(
            "class { name A; member { name X; type double[3; } }",
            &config(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
