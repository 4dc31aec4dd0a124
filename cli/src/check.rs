#![deny(missing_docs)]

//! # Check Command
//!
//! Parses and validates a description, optionally printing the validated
//! model for inspection.

use crate::error::{CliError, CliResult};
use cdg_core::{AppError, Compiler};
use std::fs;
use std::io::BufReader;
use std::path::PathBuf;

/// Output format of the model dump.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    /// Pretty printed JSON.
    Json,
    /// YAML.
    Yaml,
}

/// Arguments for the check command.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Description file.
    #[clap(long, env = "CDG_INPUT")]
    pub input: PathBuf,

    /// Print the validated model in this format.
    #[clap(long, value_enum)]
    pub dump: Option<DumpFormat>,
}

/// Executes the check command.
pub fn execute(args: &CheckArgs) -> CliResult<()> {
    let output = render(args)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

/// Checks the description and renders the requested dump, empty without one.
pub fn render(args: &CheckArgs) -> CliResult<String> {
    let display_name = args.input.to_string_lossy().into_owned();
    let input = fs::File::open(&args.input)?;

    let mut compiler = Compiler::new();
    if !compiler.parse_file(BufReader::new(input), &display_name) {
        return Err(AppError::Parse(compiler.diagnostics().to_vec()).into());
    }
    if !compiler.validate() {
        return Err(AppError::Validation(compiler.validation_errors().to_vec()).into());
    }
    let model = compiler
        .model()
        .ok_or_else(|| CliError::General("validated model missing".to_string()))?;

    let output = match args.dump {
        None => String::new(),
        Some(DumpFormat::Json) => serde_json::to_string_pretty(model)?,
        Some(DumpFormat::Yaml) => serde_yaml::to_string(model)?,
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn check(text: &str, dump: Option<DumpFormat>) -> CliResult<String> {
        let dir = tempdir().unwrap();
        let input = dir.path().join("a.cdg");
        fs::write(&input, text).unwrap();
        render(&CheckArgs { input, dump })
    }

    #[test]
    fn test_check_without_dump() {
        let output = check("class { name A; }", None).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_check_dump_json() {
        let output = check(
            "class { name A; member { name x; type int; visibility public; } }",
            Some(DumpFormat::Json),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let member = &value["items"][0]["items"][0];
        assert_eq!(member["kind"], "member");
        assert_eq!(member["accessors"], "none");
        assert_eq!(member["storage_name"], "x");
    }

    #[test]
    fn test_check_dump_yaml() {
        let output = check("class { name A; mts-proxy false; }", Some(DumpFormat::Yaml)).unwrap();
        assert!(output.contains("mts_proxy: 'false'") || output.contains("mts_proxy: \"false\""));
    }

    #[test]
    fn test_check_reports_validation_errors() {
        let err = check(
            "class { name A; member { name v; type int[2; } }",
            Some(DumpFormat::Json),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Core(AppError::Validation(_))));
        assert!(err.to_string().contains("a.cdg:1: error:"));
    }
}
