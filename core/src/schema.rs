//! # Schema Registry
//!
//! The grammar of the description language: for every scope kind, the set
//! of fields it accepts and the set of scope kinds legal as its direct
//! children.
//!
//! The registry is built in two phases, first every kind with its field set,
//! then every parent/child pair, and is read-only afterwards. The shared
//! instance returned by [`SchemaRegistry::global`] is built on first use.

use crate::field::FieldSpec;
use crate::scope::Scope;
use derive_more::Display;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::sync::OnceLock;

/// The kinds of scopes a description can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeKind {
    /// The implicit root scope, i.e. the whole file.
    #[display("global")]
    Global,
    /// A generated class.
    #[display("class")]
    Class,
    /// A base class of the enclosing class.
    #[display("base-class")]
    BaseClass,
    /// A typedef declared in the class body.
    #[display("typedef")]
    Typedef,
    /// A data member.
    #[display("member")]
    Member,
    /// An enumeration declared in the class body.
    #[display("enum")]
    Enum,
    /// One value of an enumeration.
    #[display("enum-value")]
    EnumValue,
    /// Literal code copied into the declaration artifact.
    #[display("inline-header")]
    InlineHeader,
    /// Literal code copied into the definition artifact.
    #[display("inline-code")]
    InlineCode,
}

impl ScopeKind {
    /// Every kind, in registration order.
    pub const ALL: [ScopeKind; 9] = [
        ScopeKind::Global,
        ScopeKind::Class,
        ScopeKind::BaseClass,
        ScopeKind::Typedef,
        ScopeKind::Member,
        ScopeKind::Enum,
        ScopeKind::EnumValue,
        ScopeKind::InlineHeader,
        ScopeKind::InlineCode,
    ];

    /// The keyword opening a scope of this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            ScopeKind::Global => "global",
            ScopeKind::Class => "class",
            ScopeKind::BaseClass => "base-class",
            ScopeKind::Typedef => "typedef",
            ScopeKind::Member => "member",
            ScopeKind::Enum => "enum",
            ScopeKind::EnumValue => "enum-value",
            ScopeKind::InlineHeader => "inline-header",
            ScopeKind::InlineCode => "inline-code",
        }
    }

    /// Looks a kind up by keyword.
    pub fn from_keyword(word: &str) -> Option<ScopeKind> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == word)
    }

    /// Literal code scopes are captured verbatim instead of being parsed.
    pub fn is_literal(self) -> bool {
        matches!(self, ScopeKind::InlineHeader | ScopeKind::InlineCode)
    }
}

const BOOLEAN: &[&str] = &["true", "false"];
const VISIBILITY: &[&str] = &["public", "protected", "private"];

/// Accessor modes accepted by `member`.
pub const ACCESSORS: &[&str] = &["none", "references", "set-get", "all"];

static GLOBAL_FIELDS: [FieldSpec; 0] = [];

static CLASS_FIELDS: [FieldSpec; 7] = [
    FieldSpec::required("name", "name of the generated class"),
    FieldSpec::optional(
        "attribute",
        "string placed between 'class' and the class name (e.g. an export macro)",
    ),
    FieldSpec::optional("namespace", "namespace for the class"),
    FieldSpec::optional(
        "ctor-all-members",
        "adds a constructor requiring an initial value for each member",
    )
    .with_default("false")
    .one_of(BOOLEAN),
    FieldSpec::optional("virtual-dtor", "make the destructor virtual")
        .with_default("false")
        .one_of(BOOLEAN),
    FieldSpec::optional(
        "generate-human-readable",
        "generate HumanReadable(), set this to false to provide your own implementation",
    )
    .with_default("true")
    .one_of(BOOLEAN),
    FieldSpec::optional(
        "mts-proxy",
        "generate the multi-task proxy, \"declaration-only\" leaves the instantiation to another source file",
    )
    .with_default("true")
    .one_of(&["true", "declaration-only", "false"]),
];

static BASE_CLASS_FIELDS: [FieldSpec; 3] = [
    FieldSpec::required("type", "base class type"),
    FieldSpec::optional("visibility", "inheritance visibility")
        .with_default("public")
        .one_of(VISIBILITY),
    FieldSpec::optional(
        "is-data",
        "whether the base class takes part in copy, serialization and human readable output",
    )
    .with_default("true")
    .one_of(BOOLEAN),
];

static TYPEDEF_FIELDS: [FieldSpec; 2] = [
    FieldSpec::required("name", "name of the new type"),
    FieldSpec::required("type", "aliased type"),
];

static MEMBER_FIELDS: [FieldSpec; 8] = [
    FieldSpec::required("name", "name of the data member, also used for accessors"),
    FieldSpec::required("type", "C++ type of the data member, brackets denote a C array"),
    FieldSpec::optional("description", "user provided description of the data member"),
    FieldSpec::optional("default", "default value used by the default constructor"),
    FieldSpec::optional("visibility", "member visibility")
        .with_default("protected")
        .one_of(VISIBILITY),
    FieldSpec::derived(
        "accessors",
        "accessor methods to generate, \"none\" for public members and \"all\" otherwise",
    )
    .one_of(ACCESSORS),
    FieldSpec::optional(
        "is-data",
        "whether the member takes part in copy, serialization and human readable output",
    )
    .with_default("true")
    .one_of(BOOLEAN),
    FieldSpec::optional("is-size_t", "use the size_t specific serialization functions")
        .with_default("false")
        .one_of(BOOLEAN),
];

static ENUM_FIELDS: [FieldSpec; 3] = [
    FieldSpec::required("name", "name of the enum, used as C++ type name"),
    FieldSpec::derived("description", "user provided description, defaults to the name"),
    FieldSpec::optional(
        "human-readable",
        "use value descriptions instead of names when converting to strings",
    )
    .with_default("true")
    .one_of(BOOLEAN),
];

static ENUM_VALUE_FIELDS: [FieldSpec; 3] = [
    FieldSpec::required("name", "name of the value, used as C++ enumerator"),
    FieldSpec::derived("description", "user provided description, defaults to the name"),
    FieldSpec::optional("value", "explicit initializer"),
];

static INLINE_HEADER_FIELDS: [FieldSpec; 1] = [FieldSpec::optional(
    "",
    "code copied verbatim into the declaration file",
)];

static INLINE_CODE_FIELDS: [FieldSpec; 1] = [FieldSpec::optional(
    "",
    "code copied verbatim into the definition file",
)];

/// Grammar entry for one scope kind.
#[derive(Debug, Default)]
struct KindEntry {
    fields: &'static [FieldSpec],
    children: IndexSet<ScopeKind>,
}

/// Static table of scope kinds, their fields and their legal children.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    kinds: IndexMap<ScopeKind, KindEntry>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry holding the description grammar.
    pub fn global() -> &'static SchemaRegistry {
        static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();
        REGISTRY.get_or_init(SchemaRegistry::build)
    }

    /// Builds the description grammar.
    pub fn build() -> Self {
        let mut registry = Self::new();

        registry.register(ScopeKind::Global, &GLOBAL_FIELDS);
        registry.register(ScopeKind::Class, &CLASS_FIELDS);
        registry.register(ScopeKind::BaseClass, &BASE_CLASS_FIELDS);
        registry.register(ScopeKind::Typedef, &TYPEDEF_FIELDS);
        registry.register(ScopeKind::Member, &MEMBER_FIELDS);
        registry.register(ScopeKind::Enum, &ENUM_FIELDS);
        registry.register(ScopeKind::EnumValue, &ENUM_VALUE_FIELDS);
        registry.register(ScopeKind::InlineHeader, &INLINE_HEADER_FIELDS);
        registry.register(ScopeKind::InlineCode, &INLINE_CODE_FIELDS);

        for (parent, child) in [
            (ScopeKind::Global, ScopeKind::Class),
            (ScopeKind::Global, ScopeKind::InlineHeader),
            (ScopeKind::Global, ScopeKind::InlineCode),
            (ScopeKind::Class, ScopeKind::BaseClass),
            (ScopeKind::Class, ScopeKind::Typedef),
            (ScopeKind::Class, ScopeKind::Member),
            (ScopeKind::Class, ScopeKind::Enum),
            (ScopeKind::Class, ScopeKind::InlineHeader),
            (ScopeKind::Class, ScopeKind::InlineCode),
            (ScopeKind::Enum, ScopeKind::EnumValue),
        ] {
            registry.register_child(parent, child);
        }

        registry
    }

    /// Registers `kind` with its field set. Registering a kind twice replaces
    /// its fields but keeps the children already declared.
    pub fn register(&mut self, kind: ScopeKind, fields: &'static [FieldSpec]) {
        self.kinds.entry(kind).or_default().fields = fields;
    }

    /// Declares `child` legal inside `parent`. Duplicates are ignored.
    pub fn register_child(&mut self, parent: ScopeKind, child: ScopeKind) {
        self.kinds.entry(parent).or_default().children.insert(child);
    }

    /// Field set of `kind`.
    pub fn fields(&self, kind: ScopeKind) -> &'static [FieldSpec] {
        self.kinds.get(&kind).map(|entry| entry.fields).unwrap_or(&[])
    }

    /// Kinds legal as direct children of `kind`, in registration order.
    pub fn children(&self, kind: ScopeKind) -> impl Iterator<Item = ScopeKind> + '_ {
        self.kinds
            .get(&kind)
            .into_iter()
            .flat_map(|entry| entry.children.iter().copied())
    }

    /// Whether `word` names a field of `kind`.
    pub fn has_field(&self, kind: ScopeKind, word: &str) -> bool {
        !word.is_empty() && self.fields(kind).iter().any(|spec| spec.keyword == word)
    }

    /// Returns the child kind named by `word` if it is legal inside `parent`.
    pub fn legal_child(&self, parent: ScopeKind, word: &str) -> Option<ScopeKind> {
        let child = ScopeKind::from_keyword(word)?;
        self.kinds
            .get(&parent)
            .filter(|entry| entry.children.contains(&child))
            .map(|_| child)
    }

    /// Whether `word` names a scope kind legal inside `parent`.
    pub fn is_legal_child(&self, parent: ScopeKind, word: &str) -> bool {
        self.legal_child(parent, word).is_some()
    }

    /// Instantiates the child scope named by `word` inside `parent`.
    pub fn create_child(&self, parent: ScopeKind, word: &str, line: usize) -> Option<Scope> {
        self.legal_child(parent, word)
            .map(|kind| self.create(kind, line))
    }

    /// Instantiates an empty scope of `kind` carrying its field set.
    pub fn create(&self, kind: ScopeKind, line: usize) -> Scope {
        Scope::new(kind, line, self.fields(kind))
    }

    /// Renders the grammar of `kind`: its fields and legal children,
    /// optionally descending into the children.
    pub fn describe(&self, kind: ScopeKind, recursive: bool) -> String {
        let mut out = String::new();
        self.describe_into(&mut out, kind, 0, recursive, &mut Vec::new());
        out
    }

    fn describe_into(
        &self,
        out: &mut String,
        kind: ScopeKind,
        depth: usize,
        recursive: bool,
        visiting: &mut Vec<ScopeKind>,
    ) {
        let indent = "  ".repeat(depth);
        out.push_str(&format!("{}{} {{\n", indent, kind));
        for spec in self.fields(kind) {
            out.push_str(&format!("{}  {}\n", indent, spec.describe()));
        }
        visiting.push(kind);
        for child in self.children(kind) {
            if recursive && !visiting.contains(&child) {
                self.describe_into(out, child, depth + 1, recursive, visiting);
            } else {
                out.push_str(&format!("{}  {} {{ ... }}\n", indent, child));
            }
        }
        visiting.pop();
        out.push_str(&format!("{}}}\n", indent));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_round_trip() {
        for kind in ScopeKind::ALL {
            assert_eq!(ScopeKind::from_keyword(kind.keyword()), Some(kind));
            assert_eq!(kind.to_string(), kind.keyword());
        }
        assert_eq!(ScopeKind::from_keyword("struct"), None);
    }

    #[test]
    fn test_legal_children() {
        let registry = SchemaRegistry::global();
        assert!(registry.is_legal_child(ScopeKind::Global, "class"));
        assert!(registry.is_legal_child(ScopeKind::Class, "member"));
        assert!(registry.is_legal_child(ScopeKind::Enum, "enum-value"));
        assert!(!registry.is_legal_child(ScopeKind::Global, "member"));
        assert!(!registry.is_legal_child(ScopeKind::Class, "class"));
        assert!(!registry.is_legal_child(ScopeKind::Member, "enum-value"));
    }

    #[test]
    fn test_register_child_is_idempotent() {
        let mut registry = SchemaRegistry::build();
        let before: Vec<_> = registry.children(ScopeKind::Class).collect();
        registry.register_child(ScopeKind::Class, ScopeKind::Member);
        let after: Vec<_> = registry.children(ScopeKind::Class).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_fields_lookup() {
        let registry = SchemaRegistry::global();
        assert!(registry.has_field(ScopeKind::Member, "accessors"));
        assert!(registry.has_field(ScopeKind::Class, "ctor-all-members"));
        assert!(!registry.has_field(ScopeKind::Class, "accessors"));
        assert!(!registry.has_field(ScopeKind::InlineCode, ""));
    }

    #[test]
    fn test_create_child_uses_field_set() {
        let registry = SchemaRegistry::global();
        let member = registry
            .create_child(ScopeKind::Class, "member", 7)
            .unwrap();
        assert_eq!(member.kind(), ScopeKind::Member);
        assert_eq!(member.line(), 7);
        assert!(member.field("visibility").is_some());
        assert!(registry.create_child(ScopeKind::Global, "member", 1).is_none());
    }

    #[test]
    fn test_describe_lists_fields_and_children() {
        let text = SchemaRegistry::global().describe(ScopeKind::Global, true);
        assert!(text.starts_with("global {"));
        assert!(text.contains("  class {"));
        assert!(text.contains("\"ctor-all-members\" [default: \"false\"] {true, false}"));
        assert!(text.contains("      enum-value {"));
        assert!(text.contains("<code>"));
    }
}
