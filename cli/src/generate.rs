#![deny(missing_docs)]

//! # Generate Command
//!
//! Compiles one description into its two artifacts.
//!
//! 1. **Parse**: reports every grammar error of the file.
//! 2. **Validate**: reports every semantic error of the tree.
//! 3. **Emit**: both artifacts are generated in memory first, files are
//!    only written once both succeeded.

use crate::error::{CliError, CliResult};
use cdg_core::{AppError, Compiler, GeneratorConfig};
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Description file.
    #[clap(long, env = "CDG_INPUT")]
    pub input: PathBuf,

    /// Output directory of the declaration file.
    #[clap(long, env = "CDG_HEADER_DIR")]
    pub header_dir: PathBuf,

    /// Output directory of the definition file.
    #[clap(long, env = "CDG_CODE_DIR")]
    pub code_dir: PathBuf,

    /// Declaration file name, defaults to `<input stem>.h`.
    #[clap(long, env = "CDG_HEADER")]
    pub header: Option<String>,

    /// Definition file name, defaults to `<input stem>.cpp`.
    #[clap(long, env = "CDG_CODE")]
    pub code: Option<String>,

    /// Directory prepended to the declaration file name in the `#include`
    /// of the definition file, e.g. `robot` for `#include <robot/state.h>`.
    #[clap(long, env = "CDG_INCLUDE_PREFIX", default_value = "")]
    pub include_prefix: String,
}

impl GenerateArgs {
    fn stem(&self) -> CliResult<String> {
        self.input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| CliError::General(format!("no file name in {:?}", self.input)))
    }

    fn header_name(&self) -> CliResult<String> {
        match &self.header {
            Some(name) => Ok(name.clone()),
            None => Ok(format!("{}.h", self.stem()?)),
        }
    }

    fn code_name(&self) -> CliResult<String> {
        match &self.code {
            Some(name) => Ok(name.clone()),
            None => Ok(format!("{}.cpp", self.stem()?)),
        }
    }

    fn header_include(&self, header_name: &str) -> String {
        let prefix = self.include_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            header_name.to_string()
        } else {
            format!("{}/{}", prefix, header_name)
        }
    }
}

/// Executes the generate command.
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    let header_name = args.header_name()?;
    let code_name = args.code_name()?;
    let display_name = args.input.to_string_lossy().into_owned();
    let config = GeneratorConfig::new(display_name.clone(), args.header_include(&header_name));

    let input = fs::File::open(&args.input)?;
    let mut compiler = Compiler::new();
    if !compiler.parse_file(BufReader::new(input), &display_name) {
        return Err(AppError::Parse(compiler.diagnostics().to_vec()).into());
    }
    if !compiler.validate() {
        return Err(AppError::Validation(compiler.validation_errors().to_vec()).into());
    }

    let mut declaration = Vec::new();
    let mut definition = Vec::new();
    compiler.emit_declaration(&mut declaration, &config)?;
    compiler.emit_definition(&mut definition, &config)?;

    let header_path = write_artifact(&args.header_dir, &header_name, &declaration)?;
    let code_path = write_artifact(&args.code_dir, &code_name, &definition)?;

    info!(header = ?header_path, code = ?code_path, "artifacts written");
    println!("Generated {:?} and {:?}", header_path, code_path);
    Ok(())
}

fn write_artifact(dir: &Path, name: &str, content: &[u8]) -> CliResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, content)?;
    Ok(path)
}
