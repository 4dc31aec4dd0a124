//! # Fields
//!
//! A field is a single `keyword value;` setting recognized within a scope.
//! The static part (keyword, default, allowed values, description) lives in
//! a `FieldSpec` owned by the schema registry; a `Field` pairs that spec with
//! the value read from one description file.

/// Static definition of a field, shared by every scope of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Keyword introducing the field. Empty for literal code fields.
    pub keyword: &'static str,
    /// Value assigned by the defaulting pass. `None` leaves the field empty
    /// so that validation can derive it from other fields.
    pub default: Option<&'static str>,
    /// Whether the field must be non-empty after defaulting.
    pub required: bool,
    /// Closed set of legal values, empty when unconstrained.
    pub allowed: &'static [&'static str],
    /// Description shown in diagnostics and grammar listings.
    pub description: &'static str,
}

impl FieldSpec {
    /// A required field without default.
    pub const fn required(keyword: &'static str, description: &'static str) -> Self {
        Self {
            keyword,
            default: None,
            required: true,
            allowed: &[],
            description,
        }
    }

    /// An optional field, empty unless set.
    pub const fn optional(keyword: &'static str, description: &'static str) -> Self {
        Self {
            keyword,
            default: Some(""),
            required: false,
            allowed: &[],
            description,
        }
    }

    /// An optional field whose empty value is filled in by validation.
    pub const fn derived(keyword: &'static str, description: &'static str) -> Self {
        Self {
            keyword,
            default: None,
            required: false,
            allowed: &[],
            description,
        }
    }

    /// Sets the default value.
    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    /// Restricts the legal values.
    pub const fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = allowed;
        self
    }

    /// True for the unnamed field holding literal code.
    pub fn is_literal(&self) -> bool {
        self.keyword.is_empty()
    }

    /// One line summary used by diagnostics: keyword, default, allowed values
    /// and description.
    pub fn describe(&self) -> String {
        let mut text = if self.is_literal() {
            "<code>".to_string()
        } else {
            format!("\"{}\"", self.keyword)
        };
        if self.required {
            text.push_str(" (required)");
        }
        if let Some(default) = self.default.filter(|d| !d.is_empty()) {
            text.push_str(&format!(" [default: \"{}\"]", default));
        }
        if !self.allowed.is_empty() {
            text.push_str(&format!(" {{{}}}", self.allowed.join(", ")));
        }
        if !self.description.is_empty() {
            text.push_str(": ");
            text.push_str(self.description);
        }
        text
    }
}

/// A field instance attached to one parsed scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    spec: &'static FieldSpec,
    value: Option<String>,
}

impl Field {
    /// Creates an unset field for `spec`.
    pub fn new(spec: &'static FieldSpec) -> Self {
        Self { spec, value: None }
    }

    /// Static definition of this field.
    pub fn spec(&self) -> &'static FieldSpec {
        self.spec
    }

    /// Keyword of this field.
    pub fn keyword(&self) -> &'static str {
        self.spec.keyword
    }

    /// Current value, empty if never set.
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// Whether a value (possibly the default) was assigned.
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Assigns `value`.
    ///
    /// A field can only be assigned once unless `overwrite` is set, and the
    /// value must belong to the allowed set when one is declared.
    pub fn set_value(&mut self, value: &str, overwrite: bool) -> Result<(), String> {
        if self.value.is_some() && !overwrite {
            return Err(format!(
                "field {} already set to \"{}\"",
                self.spec.describe(),
                self.value()
            ));
        }
        if !self.spec.allowed.is_empty() && !self.spec.allowed.contains(&value) {
            return Err(format!(
                "invalid value \"{}\" for field {}",
                value,
                self.spec.describe()
            ));
        }
        self.value = Some(value.to_string());
        Ok(())
    }

    /// Assigns the declared default if the field was never set.
    pub fn fill_default(&mut self) {
        if self.value.is_none() {
            if let Some(default) = self.spec.default {
                self.value = Some(default.to_string());
            }
        }
    }

    /// Checks the required constraint.
    pub fn is_valid(&self) -> Result<(), String> {
        if self.spec.required && self.value().is_empty() {
            return Err(format!("missing required field {}", self.spec.describe()));
        }
        Ok(())
    }
}
