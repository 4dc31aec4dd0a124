//! Enumerations declared inside a class and their string conversions.
//!
//! Each enum gets four static helpers on the owning class: `ToString`,
//! `FromString`, `VectorInt` and `VectorString`. `ToString` and
//! `FromString` use the value descriptions when the enum is human readable
//! and the value names otherwise, so both directions agree.

use super::{escape_literal, line_comment, Generate};
use crate::model::{EnumDef, EnumValueDef};

impl EnumDef {
    /// Text a value converts to and from, as a C++ string literal body.
    fn text(&self, value: &EnumValueDef) -> String {
        if self.human_readable {
            escape_literal(&value.description)
        } else {
            value.name.clone()
        }
    }

    /// Data trait specialization, emitted after the owning class is closed.
    pub(crate) fn trait_declaration(&self, out: &mut String, attribute: &str) {
        let qualified = self.qualified_name();
        let helper = |suffix: &str| format!("{}::{}{}", self.class_name, self.name, suffix);
        if attribute.is_empty() {
            out.push_str(&format!(
                "CMN_DATA_SPECIALIZATION_FOR_ENUM({}, int, {}, {});\n",
                qualified,
                helper("ToString"),
                helper("FromString")
            ));
        } else {
            out.push_str(&format!(
                "CMN_DATA_SPECIALIZATION_FOR_ENUM_WITH_ATTRIBUTE({}, int, {}, {}, {});\n",
                qualified,
                helper("ToString"),
                helper("FromString"),
                attribute
            ));
        }
    }
}

impl Generate for EnumDef {
    fn declaration(&self, out: &mut String) {
        line_comment(out, self.line, "enum");
        let name = &self.name;
        out.push_str(" public:\n");
        if self.description != self.name {
            out.push_str(&format!("    /*! {} */\n", self.description));
        }
        out.push_str(&format!("    enum {} {{\n", name));
        for (index, value) in self.values.iter().enumerate() {
            if index > 0 {
                out.push_str(",\n");
            }
            value.declaration(out);
        }
        if !self.values.is_empty() {
            out.push('\n');
        }
        out.push_str("    };\n");
        out.push_str(&format!(
            "    static std::string {}ToString(const {} & value) CISST_THROW(std::runtime_error);\n",
            name, name
        ));
        out.push_str(&format!(
            "    static {} {}FromString(const std::string & value) CISST_THROW(std::runtime_error);\n",
            name, name
        ));
        out.push_str(&format!(
            "    static const std::vector<int> & {}VectorInt(void);\n",
            name
        ));
        out.push_str(&format!(
            "    static const std::vector<std::string> & {}VectorString(void);\n\n",
            name
        ));
    }

    fn definition(&self, out: &mut String) {
        line_comment(out, self.line, "enum");
        let name = &self.name;
        let owner = &self.class_name;
        let qualified = self.qualified_name();

        out.push_str(&format!(
            "std::string {}::{}ToString(const {} & value) CISST_THROW(std::runtime_error)\n{{\n",
            owner, name, qualified
        ));
        out.push_str("    switch (value) {\n");
        for value in &self.values {
            out.push_str(&format!("    case {}:\n", value.name));
            out.push_str(&format!("        return \"{}\";\n", self.text(value)));
            out.push_str("        break;\n");
        }
        out.push_str("    default:\n        break;\n    }\n");
        out.push_str(&format!(
            "    cmnThrow(\"{}::{}ToString called with invalid enum\");\n",
            owner, name
        ));
        out.push_str("    return \"\";\n}\n\n");

        out.push_str(&format!(
            "{} {}::{}FromString(const std::string & value) CISST_THROW(std::runtime_error)\n{{\n",
            qualified, owner, name
        ));
        for value in &self.values {
            out.push_str(&format!("    if (value == \"{}\") {{\n", self.text(value)));
            out.push_str(&format!("        return {};\n", value.name));
            out.push_str("    };\n");
        }
        out.push_str(&format!(
            "    std::string message = \"{}::{}FromString can't find matching enum for \" + value + \".  Options are: \";\n",
            owner, name
        ));
        out.push_str(&format!(
            "    std::vector<std::string> options = {}VectorString();\n",
            name
        ));
        out.push_str("    for (std::vector<std::string>::const_iterator i = options.begin(); i != options.end(); ++i) {\n");
        out.push_str("        message += *i + \" \";\n");
        out.push_str("    }\n");
        out.push_str("    cmnThrow(message);\n");
        out.push_str(&format!("    return static_cast<{}>(0);\n}}\n\n", qualified));

        out.push_str(&format!(
            "const std::vector<int> & {}::{}VectorInt(void)\n{{\n",
            owner, name
        ));
        out.push_str("    static std::vector<int> vectorInt;\n");
        out.push_str("    if (vectorInt.empty()) {\n");
        for value in &self.values {
            out.push_str(&format!("        vectorInt.push_back({});\n", value.name));
        }
        out.push_str("    }\n    return vectorInt;\n}\n\n");

        out.push_str(&format!(
            "const std::vector<std::string> & {}::{}VectorString(void)\n{{\n",
            owner, name
        ));
        out.push_str("    static std::vector<std::string> vectorString;\n");
        out.push_str("    if (vectorString.empty()) {\n");
        for value in &self.values {
            out.push_str(&format!(
                "        vectorString.push_back(\"{}\");\n",
                self.text(value)
            ));
        }
        out.push_str("    }\n    return vectorString;\n}\n\n");
    }
}

/// Enumerator inside the `enum` body, without its separator.
impl Generate for EnumValueDef {
    fn declaration(&self, out: &mut String) {
        line_comment(out, self.line, "enum-value");
        out.push_str("        ");
        out.push_str(&self.name);
        if !self.value.is_empty() {
            out.push_str(" = ");
            out.push_str(&self.value);
        }
    }

    fn definition(&self, _out: &mut String) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(name: &str, description: &str, value: &str) -> EnumValueDef {
        EnumValueDef {
            line: 3,
            name: name.into(),
            description: description.into(),
            value: value.into(),
        }
    }

    fn kind(human_readable: bool) -> EnumDef {
        EnumDef {
            line: 2,
            name: "Kind".into(),
            description: "Kind".into(),
            human_readable,
            values: vec![
                value("A", "first", ""),
                value("B", "B", "5"),
                value("C", "C", ""),
            ],
            class_name: "geo::Point".into(),
        }
    }

    #[test]
    fn test_declaration_keeps_order_and_initializers() {
        let mut out = String::new();
        kind(true).declaration(&mut out);
        assert!(out.contains(
            "    enum Kind {\n/* source line 3: enum-value */\n        A,\n/* source line 3: enum-value */\n        B = 5,\n/* source line 3: enum-value */\n        C\n    };\n"
        ));
        assert!(out.contains("static Kind KindFromString(const std::string & value)"));
        assert!(out.contains("static const std::vector<std::string> & KindVectorString(void);"));
        assert!(!out.contains("/*!"));
    }

    #[test]
    fn test_human_readable_uses_descriptions() {
        let mut out = String::new();
        kind(true).definition(&mut out);
        assert!(out.contains("    case A:\n        return \"first\";\n"));
        assert!(out.contains("    if (value == \"first\") {\n        return A;\n"));
        assert!(out.contains("std::string geo::Point::KindToString(const geo::Point::Kind & value)"));
        assert!(out.contains("geo::Point::Kind geo::Point::KindFromString(const std::string & value)"));
        assert!(out.contains("cmnThrow(message);"));
    }

    #[test]
    fn test_names_without_human_readable() {
        let mut out = String::new();
        kind(false).definition(&mut out);
        assert!(out.contains("    case A:\n        return \"A\";\n"));
        assert!(!out.contains("first"));
        assert!(out.contains("vectorInt.push_back(A);\n        vectorInt.push_back(B);\n        vectorInt.push_back(C);\n"));
    }

    #[test]
    fn test_descriptions_are_escaped() {
        let mut running = kind(true);
        running.values[0].description = r#""Running" \ idle"#.into();
        let mut out = String::new();
        running.definition(&mut out);
        assert!(out.contains(r#"        return "\"Running\" \\ idle";"#));
        assert!(out.contains(r#"    if (value == "\"Running\" \\ idle") {"#));
        assert!(out.contains(r#"vectorString.push_back("\"Running\" \\ idle");"#));
    }

    #[test]
    fn test_trait_declaration() {
        let mut out = String::new();
        kind(true).trait_declaration(&mut out, "");
        assert_eq!(
            out,
            "CMN_DATA_SPECIALIZATION_FOR_ENUM(geo::Point::Kind, int, geo::Point::KindToString, geo::Point::KindFromString);\n"
        );
        let mut out = String::new();
        kind(true).trait_declaration(&mut out, "GEO_EXPORT");
        assert!(out.ends_with(", GEO_EXPORT);\n"));
    }
}
