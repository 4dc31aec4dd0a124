//! # Code Generation
//!
//! Emits the two artifacts of a compilation from a validated [`Unit`]:
//! - the declaration artifact (header): banner, include guard, runtime
//!   library includes, class declarations and top-level `inline-header`
//!   blocks;
//! - the definition artifact (source): banner, include of the header,
//!   method and function bodies and top-level `inline-code` blocks.
//!
//! Each model type implements [`Generate`] and writes its own part of both
//! artifacts. Generation is a pure function of the model and the
//! configuration: running it twice yields identical text.

use crate::model::{InlineDef, InlineTarget, ProxyMode, Unit, UnitItem};
use regex::Regex;
use std::sync::OnceLock;
use tracing::info;

mod class;
mod enums;
mod member;

/// Options of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Description file name written in the provenance comment.
    pub source_name: String,
    /// Path used to include the declaration artifact, e.g. `geo/point.h`.
    pub header_include: String,
    /// Generator version written in the banner.
    pub version: String,
}

impl GeneratorConfig {
    /// Creates a configuration using the crate version.
    pub fn new(source_name: impl Into<String>, header_include: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            header_include: header_include.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Include guard macro derived from the header include path.
    pub fn header_guard(&self) -> String {
        static NON_IDENT: OnceLock<Regex> = OnceLock::new();
        let non_ident =
            NON_IDENT.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]").expect("Invalid regex"));
        format!("_{}", non_ident.replace_all(&self.header_include, "_"))
    }
}

/// Generation of both artifacts for one model element.
pub trait Generate {
    /// Appends the declaration artifact text.
    fn declaration(&self, out: &mut String);

    /// Appends the definition artifact text.
    fn definition(&self, out: &mut String);
}

/// Writes the trace comment pointing back to the description line.
pub(crate) fn line_comment(out: &mut String, line: usize, kind: &str) {
    out.push_str(&format!("/* source line {}: {} */\n", line, kind));
}

/// Escapes text for use inside a C++ string literal.
pub(crate) fn escape_literal(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn banner(out: &mut String, config: &GeneratorConfig) {
    out.push_str("// file automatically generated, do not modify\n");
    out.push_str(&format!("// generator version: {}\n", config.version));
    out.push_str(&format!("// source file: {}\n\n", config.source_name));
}

/// Generates the declaration artifact.
pub fn generate_declaration(unit: &Unit, config: &GeneratorConfig) -> String {
    let mut out = String::new();
    let guard = config.header_guard();
    banner(&mut out, config);

    out.push_str("#pragma once\n");
    out.push_str(&format!("#ifndef {}\n", guard));
    out.push_str(&format!("#define {}\n\n", guard));

    out.push_str("#include <cisstCommon/cmnDataFunctions.h>\n");
    out.push_str("#include <cisstCommon/cmnDataFunctionsEnumMacros.h>\n");
    out.push_str("#if CISST_HAS_JSON\n");
    out.push_str("#include <cisstCommon/cmnDataFunctionsJSON.h>\n");
    out.push_str("#endif // CISST_HAS_JSON\n\n");

    if unit
        .classes()
        .any(|class| class.mts_proxy != ProxyMode::Disabled)
    {
        out.push_str("#include <cisstMultiTask/mtsGenericObjectProxy.h>\n\n");
    }

    for item in &unit.items {
        item.declaration(&mut out);
    }

    out.push_str(&format!("\n#endif // {}\n", guard));
    info!(bytes = out.len(), "declaration generated");
    out
}

/// Generates the definition artifact.
pub fn generate_definition(unit: &Unit, config: &GeneratorConfig) -> String {
    let mut out = String::new();
    banner(&mut out, config);

    out.push_str(&format!("#include <{}>\n", config.header_include));
    out.push_str("#include <cisstCommon/cmnDataFunctionsMacros.h>\n");
    out.push_str("#include <cisstCommon/cmnDataFunctionsEnumMacros.h>\n");
    out.push_str("#include <cisstCommon/cmnDataFunctionsString.h>\n");
    out.push_str("#include <cisstCommon/cmnDataFunctionsVector.h>\n");
    out.push_str("#include <cisstCommon/cmnDataFunctionsList.h>\n\n");

    for item in &unit.items {
        item.definition(&mut out);
    }
    info!(bytes = out.len(), "definition generated");
    out
}

impl Generate for UnitItem {
    fn declaration(&self, out: &mut String) {
        match self {
            UnitItem::Class(class) => class.declaration(out),
            UnitItem::Inline(inline) => inline.declaration(out),
        }
    }

    fn definition(&self, out: &mut String) {
        match self {
            UnitItem::Class(class) => class.definition(out),
            UnitItem::Inline(inline) => inline.definition(out),
        }
    }
}

impl InlineDef {
    fn emit(&self, out: &mut String, target: InlineTarget) {
        if self.target != target {
            return;
        }
        let kind = match self.target {
            InlineTarget::Declaration => "inline-header",
            InlineTarget::Definition => "inline-code",
        };
        line_comment(out, self.line, kind);
        out.push_str(&self.code);
        if !self.code.ends_with('\n') {
            out.push('\n');
        }
    }
}

impl Generate for InlineDef {
    fn declaration(&self, out: &mut String) {
        self.emit(out, InlineTarget::Declaration);
    }

    fn definition(&self, out: &mut String) {
        self.emit(out, InlineTarget::Definition);
    }
}
