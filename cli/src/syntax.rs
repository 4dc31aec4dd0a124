#![deny(missing_docs)]

//! # Syntax Command
//!
//! Prints the grammar of the description language.

use crate::error::{CliError, CliResult};
use cdg_core::{SchemaRegistry, ScopeKind};

/// Arguments for the syntax command.
#[derive(clap::Args, Debug, Clone)]
pub struct SyntaxArgs {
    /// Only describe this scope keyword, e.g. `member`.
    #[clap(long)]
    pub scope: Option<String>,
}

/// Executes the syntax command.
pub fn execute(args: &SyntaxArgs) -> CliResult<()> {
    print!("{}", render(args)?);
    Ok(())
}

/// Renders the whole grammar, or one scope and its children.
pub fn render(args: &SyntaxArgs) -> CliResult<String> {
    let kind = match &args.scope {
        None => ScopeKind::Global,
        Some(keyword) => ScopeKind::from_keyword(keyword).ok_or_else(|| {
            let known: Vec<&str> = ScopeKind::ALL.iter().map(|kind| kind.keyword()).collect();
            CliError::General(format!(
                "unknown scope \"{}\", expected one of: {}",
                keyword,
                known.join(", ")
            ))
        })?,
    };
    Ok(SchemaRegistry::global().describe(kind, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_grammar() {
        let text = render(&SyntaxArgs { scope: None }).unwrap();
        assert!(text.contains("class {"));
        assert!(text.contains("enum-value {"));
        assert!(text.contains("\"mts-proxy\""));
    }

    #[test]
    fn test_single_scope() {
        let text = render(&SyntaxArgs {
            scope: Some("enum".to_string()),
        })
        .unwrap();
        assert!(text.contains("enum-value {"));
        assert!(!text.contains("\"mts-proxy\""));
    }

    #[test]
    fn test_unknown_scope() {
        let err = render(&SyntaxArgs {
            scope: Some("struct".to_string()),
        })
        .unwrap_err();
        assert!(err.to_string().contains("expected one of: global, class"));
    }
}
