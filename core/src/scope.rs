//! # Scopes
//!
//! The parsed tree. Each scope knows its kind, the line it started on, its
//! fields (per the schema registry) and its children in parse order.

use crate::field::{Field, FieldSpec};
use crate::schema::ScopeKind;
use indexmap::IndexMap;

/// One parsed block of a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    kind: ScopeKind,
    line: usize,
    fields: IndexMap<&'static str, Field>,
    children: Vec<Scope>,
}

impl Scope {
    /// Creates an empty scope carrying one unset field per spec.
    pub fn new(kind: ScopeKind, line: usize, specs: &'static [FieldSpec]) -> Self {
        let fields = specs
            .iter()
            .map(|spec| (spec.keyword, Field::new(spec)))
            .collect();
        Self {
            kind,
            line,
            fields,
            children: Vec::new(),
        }
    }

    /// Kind of this scope.
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// Line of the description where the scope started.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Looks a field up by keyword.
    pub fn field(&self, keyword: &str) -> Option<&Field> {
        self.fields.get(keyword)
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Value of a field, empty if unknown or unset.
    pub fn value(&self, keyword: &str) -> &str {
        self.field(keyword).map(Field::value).unwrap_or("")
    }

    /// Whether the field is known and holds `"true"`.
    pub fn flag(&self, keyword: &str) -> bool {
        self.value(keyword) == "true"
    }

    /// Assigns a field value, see [`Field::set_value`].
    pub fn set_value(&mut self, keyword: &str, value: &str, overwrite: bool) -> Result<(), String> {
        match self.fields.get_mut(keyword) {
            Some(field) => field.set_value(value, overwrite),
            None => Err(format!("unknown field \"{}\" in scope \"{}\"", keyword, self.kind)),
        }
    }

    /// Literal code captured for an `inline-header` or `inline-code` scope.
    pub fn code(&self) -> &str {
        self.value("")
    }

    /// Children in parse order.
    pub fn children(&self) -> &[Scope] {
        &self.children
    }

    /// Mutable children, used by validation to derive field values.
    pub fn children_mut(&mut self) -> &mut [Scope] {
        &mut self.children
    }

    /// Appends a child.
    pub fn push_child(&mut self, child: Scope) {
        self.children.push(child);
    }

    /// Checks that every required field holds a value.
    pub fn is_valid(&self) -> Result<(), Vec<String>> {
        let errors: Vec<String> = self
            .fields
            .values()
            .filter_map(|field| field.is_valid().err())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Assigns declared defaults to unset fields of this scope and all its
    /// descendants.
    pub fn fill_defaults(&mut self) {
        for field in self.fields.values_mut() {
            field.fill_default();
        }
        for child in &mut self.children {
            child.fill_defaults();
        }
    }

    /// Total number of scopes in this subtree, this one included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Scope::count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaRegistry;

    fn member(line: usize) -> Scope {
        SchemaRegistry::global().create(ScopeKind::Member, line)
    }

    #[test]
    fn test_values_and_flags() {
        let mut scope = member(3);
        scope.set_value("name", "Position", false).unwrap();
        assert_eq!(scope.value("name"), "Position");
        assert_eq!(scope.value("unknown"), "");
        assert!(!scope.flag("is-data"));
        scope.fill_defaults();
        assert!(scope.flag("is-data"));
        assert_eq!(scope.value("visibility"), "protected");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut scope = member(3);
        let err = scope.set_value("size", "3", false).unwrap_err();
        assert!(err.contains("unknown field \"size\""));
    }

    #[test]
    fn test_is_valid_reports_all_missing_fields() {
        let scope = member(3);
        let errors = scope.is_valid().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("\"name\""));
        assert!(errors[1].contains("\"type\""));
    }

    #[test]
    fn test_fill_defaults_recurses() {
        let registry = SchemaRegistry::global();
        let mut class = registry.create(ScopeKind::Class, 1);
        class.push_child(member(2));
        class.fill_defaults();
        assert_eq!(class.value("mts-proxy"), "true");
        assert_eq!(class.children()[0].value("is-size_t"), "false");
        assert!(!class.children()[0].field("accessors").unwrap().is_set());
        assert_eq!(class.count(), 2);
    }

    #[test]
    fn test_literal_code_field() {
        let mut scope = SchemaRegistry::global().create(ScopeKind::InlineCode, 9);
        scope.set_value("", "int x;", false).unwrap();
        assert_eq!(scope.code(), "int x;");
    }
}
