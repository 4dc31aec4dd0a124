//! # Resolved Model
//!
//! Typed view of a validated description. The validator builds it from the
//! parsed scope tree; the generator only ever reads it.

use derive_more::Display;
use serde::Serialize;

/// Visibility of a member or of an inheritance relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    /// `public`
    #[display("public")]
    Public,
    /// `protected`
    #[display("protected")]
    Protected,
    /// `private`
    #[display("private")]
    Private,
}

impl Visibility {
    /// Parses a keyword already checked against the allowed values.
    pub fn from_keyword(value: &str) -> Option<Self> {
        match value {
            "public" => Some(Self::Public),
            "protected" => Some(Self::Protected),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

/// Accessor methods generated for a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Accessors {
    /// No accessor.
    #[display("none")]
    None,
    /// `const T & Name(void) const` and `T & Name(void)`.
    #[display("references")]
    References,
    /// `void GetName(T &) const` and `void SetName(const T &)`.
    #[display("set-get")]
    SetGet,
    /// References and set/get.
    #[display("all")]
    All,
}

impl Accessors {
    /// Parses a keyword already checked against the allowed values.
    pub fn from_keyword(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "references" => Some(Self::References),
            "set-get" => Some(Self::SetGet),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Whether reference accessors are generated.
    pub fn references(self) -> bool {
        matches!(self, Self::References | Self::All)
    }

    /// Whether `Get`/`Set` accessors are generated.
    pub fn set_get(self) -> bool {
        matches!(self, Self::SetGet | Self::All)
    }
}

/// How the multi-task proxy of a class is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProxyMode {
    /// Declared and instantiated.
    #[display("true")]
    Full,
    /// Declared only, instantiated by hand elsewhere.
    #[display("declaration-only")]
    DeclarationOnly,
    /// Not generated.
    #[display("false")]
    Disabled,
}

impl ProxyMode {
    /// Parses a keyword already checked against the allowed values.
    pub fn from_keyword(value: &str) -> Option<Self> {
        match value {
            "true" => Some(Self::Full),
            "declaration-only" => Some(Self::DeclarationOnly),
            "false" => Some(Self::Disabled),
            _ => None,
        }
    }
}

/// Which artifact literal code is copied into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InlineTarget {
    /// `inline-header`
    Declaration,
    /// `inline-code`
    Definition,
}

/// Literal code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineDef {
    /// Source line.
    pub line: usize,
    /// Destination artifact.
    pub target: InlineTarget,
    /// Captured text.
    pub code: String,
}

/// A validated description file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Unit {
    /// Top-level items in parse order.
    pub items: Vec<UnitItem>,
}

impl Unit {
    /// Classes in parse order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.items.iter().filter_map(|item| match item {
            UnitItem::Class(class) => Some(class),
            UnitItem::Inline(_) => None,
        })
    }
}

/// Top-level item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum UnitItem {
    /// `class { ... }`
    Class(ClassDef),
    /// `inline-header { ... }` or `inline-code { ... }`
    Inline(InlineDef),
}

/// A validated class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDef {
    /// Source line.
    pub line: usize,
    /// Class name.
    pub name: String,
    /// Text between `class` and the name, e.g. an export macro.
    pub attribute: String,
    /// Enclosing namespace, empty for none.
    pub namespace: String,
    /// Generate a constructor taking every member.
    pub ctor_all_members: bool,
    /// Make the destructor virtual.
    pub virtual_dtor: bool,
    /// Generate `HumanReadable`.
    pub generate_human_readable: bool,
    /// Multi-task proxy generation.
    pub mts_proxy: ProxyMode,
    /// Children in parse order.
    pub items: Vec<ClassItem>,
    /// Indices into `items`, one list per semantic role.
    pub layout: ClassLayout,
}

/// Positions of the class children grouped by role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassLayout {
    /// `base-class` children.
    pub base_classes: Vec<usize>,
    /// `typedef` children.
    pub typedefs: Vec<usize>,
    /// `member` children.
    pub members: Vec<usize>,
    /// `enum` children.
    pub enums: Vec<usize>,
}

impl ClassDef {
    /// `namespace::name`, or `name` without namespace.
    pub fn qualified_name(&self) -> String {
        qualify(&self.namespace, &self.name)
    }

    /// Base classes in declaration order.
    pub fn base_classes(&self) -> impl Iterator<Item = &BaseClassDef> {
        self.layout
            .base_classes
            .iter()
            .filter_map(|&index| match self.items.get(index) {
                Some(ClassItem::BaseClass(base)) => Some(base),
                _ => None,
            })
    }

    /// Typedefs in declaration order.
    pub fn typedefs(&self) -> impl Iterator<Item = &TypedefDef> {
        self.layout
            .typedefs
            .iter()
            .filter_map(|&index| match self.items.get(index) {
                Some(ClassItem::Typedef(typedef)) => Some(typedef),
                _ => None,
            })
    }

    /// Members in declaration order.
    pub fn members(&self) -> impl Iterator<Item = &MemberDef> {
        self.layout
            .members
            .iter()
            .filter_map(|&index| match self.items.get(index) {
                Some(ClassItem::Member(member)) => Some(member),
                _ => None,
            })
    }

    /// Enums in declaration order.
    pub fn enums(&self) -> impl Iterator<Item = &EnumDef> {
        self.layout
            .enums
            .iter()
            .filter_map(|&index| match self.items.get(index) {
                Some(ClassItem::Enum(enumeration)) => Some(enumeration),
                _ => None,
            })
    }

    /// Base classes taking part in the data chains.
    pub fn data_base_classes(&self) -> impl Iterator<Item = &BaseClassDef> {
        self.base_classes().filter(|base| base.is_data)
    }

    /// Members taking part in the data chains.
    pub fn data_members(&self) -> impl Iterator<Item = &MemberDef> {
        self.members().filter(|member| member.is_data)
    }

    /// Whether the class has any base class or member at all.
    pub fn has_content(&self) -> bool {
        !self.layout.base_classes.is_empty() || !self.layout.members.is_empty()
    }

    /// Whether constructors have a non-empty initializer list. C-array
    /// members are never initialized there.
    pub fn has_initializers(&self) -> bool {
        !self.layout.base_classes.is_empty() || self.members().any(|member| !member.is_c_array)
    }
}

/// Child of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ClassItem {
    /// `base-class { ... }`
    BaseClass(BaseClassDef),
    /// `typedef { ... }`
    Typedef(TypedefDef),
    /// `member { ... }`
    Member(MemberDef),
    /// `enum { ... }`
    Enum(EnumDef),
    /// `inline-header { ... }` or `inline-code { ... }`
    Inline(InlineDef),
}

/// A base class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseClassDef {
    /// Source line.
    pub line: usize,
    /// Base type.
    pub type_name: String,
    /// Inheritance visibility.
    pub visibility: Visibility,
    /// Included in the data chains.
    pub is_data: bool,
}

/// A typedef.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypedefDef {
    /// Source line.
    pub line: usize,
    /// New type name.
    pub name: String,
    /// Aliased type.
    pub type_name: String,
}

/// A data member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberDef {
    /// Source line.
    pub line: usize,
    /// Declared name, used for accessors and descriptions.
    pub name: String,
    /// Declared type, brackets included for C arrays.
    pub type_name: String,
    /// User description.
    pub description: String,
    /// Default value, empty for none.
    pub default: String,
    /// Member visibility.
    pub visibility: Visibility,
    /// Resolved accessor mode.
    pub accessors: Accessors,
    /// Included in the data chains.
    pub is_data: bool,
    /// Uses the size_t serialization functions.
    pub is_size_t: bool,
    /// Declared type is a C array.
    pub is_c_array: bool,
    /// Name of the C++ data member.
    pub storage_name: String,
    /// Qualified name of the owning class.
    pub class_name: String,
}

impl MemberDef {
    /// Element type and bracket suffix of the declared type, e.g.
    /// `("double", "[3]")` for `double[3]`.
    pub fn split_array(&self) -> (&str, &str) {
        match self.type_name.find('[') {
            Some(index) => (
                self.type_name[..index].trim_end(),
                &self.type_name[index..],
            ),
            None => (self.type_name.as_str(), ""),
        }
    }
}

/// An enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDef {
    /// Source line.
    pub line: usize,
    /// Enum type name.
    pub name: String,
    /// Description, the name unless provided.
    pub description: String,
    /// Convert to descriptions rather than names.
    pub human_readable: bool,
    /// Values in declaration order.
    pub values: Vec<EnumValueDef>,
    /// Qualified name of the owning class.
    pub class_name: String,
}

impl EnumDef {
    /// `Class::Enum`.
    pub fn qualified_name(&self) -> String {
        qualify(&self.class_name, &self.name)
    }
}

/// One enumerator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValueDef {
    /// Source line.
    pub line: usize,
    /// Enumerator name.
    pub name: String,
    /// Description, the name unless provided.
    pub description: String,
    /// Explicit initializer, empty for implicit.
    pub value: String,
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}::{}", scope, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(type_name: &str) -> MemberDef {
        MemberDef {
            line: 1,
            name: "Data".into(),
            type_name: type_name.into(),
            description: String::new(),
            default: String::new(),
            visibility: Visibility::Protected,
            accessors: Accessors::None,
            is_data: true,
            is_size_t: false,
            is_c_array: type_name.contains('['),
            storage_name: "mData".into(),
            class_name: "A".into(),
        }
    }

    #[test]
    fn test_split_array() {
        assert_eq!(member("double[3]").split_array(), ("double", "[3]"));
        assert_eq!(member("int [2][4]").split_array(), ("int", "[2][4]"));
        assert_eq!(member("double").split_array(), ("double", ""));
    }

    #[test]
    fn test_accessor_sets() {
        assert!(Accessors::All.references() && Accessors::All.set_get());
        assert!(Accessors::References.references() && !Accessors::References.set_get());
        assert!(!Accessors::None.references() && !Accessors::None.set_get());
        assert_eq!(Accessors::from_keyword("set-get"), Some(Accessors::SetGet));
        assert_eq!(Accessors::SetGet.to_string(), "set-get");
    }

    #[test]
    fn test_layout_accessors_follow_indices() {
        let class = ClassDef {
            line: 1,
            name: "A".into(),
            attribute: String::new(),
            namespace: "ns".into(),
            ctor_all_members: false,
            virtual_dtor: false,
            generate_human_readable: true,
            mts_proxy: ProxyMode::Disabled,
            items: vec![
                ClassItem::Typedef(TypedefDef {
                    line: 2,
                    name: "T".into(),
                    type_name: "int".into(),
                }),
                ClassItem::Member(member("double")),
            ],
            layout: ClassLayout {
                typedefs: vec![0],
                members: vec![1],
                ..ClassLayout::default()
            },
        };
        assert_eq!(class.qualified_name(), "ns::A");
        assert_eq!(class.members().count(), 1);
        assert_eq!(class.typedefs().next().unwrap().name, "T");
        assert_eq!(class.base_classes().count(), 0);
        assert!(class.has_content());
    }
}
