#![deny(missing_docs)]

//! # CDG Core
//!
//! Compiler for data type descriptions. A description declares classes with
//! their base classes, members, typedefs and enums; the compiler turns it
//! into a C++ declaration artifact and a definition artifact carrying all
//! the copy, serialization and introspection boilerplate the runtime data
//! library expects.

/// Shared error types.
pub mod error;

/// Field declarations and values.
pub mod field;

/// Grammar of the description language.
pub mod schema;

/// Parsed scope tree.
pub mod scope;

/// Character scanner.
pub mod scanner;

/// Scope-stack parser.
pub mod parser;

/// Typed model of a validated description.
pub mod model;

/// Defaulting and semantic checks.
pub mod validator;

/// Artifact generation.
pub mod codegen;

/// Parse, validate and emit in sequence.
pub mod compiler;

pub use codegen::{generate_declaration, generate_definition, Generate, GeneratorConfig};
pub use compiler::{compile, Artifacts, Compiler};
pub use error::{AppError, AppResult, Diagnostic};
pub use field::{Field, FieldSpec};
pub use model::Unit;
pub use parser::{ParseOutcome, Parser};
pub use schema::{SchemaRegistry, ScopeKind};
pub use scope::Scope;
pub use validator::validate;
