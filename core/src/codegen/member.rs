use super::{line_comment, Generate};
use crate::model::MemberDef;

impl Generate for MemberDef {
    fn declaration(&self, out: &mut String) {
        line_comment(out, self.line, "member");
        out.push_str(&format!(" {}:\n", self.visibility));
        if !self.description.is_empty() {
            out.push_str(&format!("    /*! {} */\n", self.description));
        }
        let (element, dimensions) = self.split_array();
        out.push_str(&format!(
            "    {} {}{};\n",
            element, self.storage_name, dimensions
        ));

        if self.accessors.references() || self.accessors.set_get() {
            out.push_str(&format!(" public:\n    /* accessors is set to: {} */\n", self.accessors));
        }
        if self.accessors.references() {
            out.push_str(&format!(
                "    const {} & {}(void) const;\n",
                self.type_name, self.name
            ));
            out.push_str(&format!("    {} & {}(void);\n", self.type_name, self.name));
        }
        if self.accessors.set_get() {
            out.push_str(&format!(
                "    void Get{}({} & placeHolder) const;\n",
                self.name, self.type_name
            ));
            out.push_str(&format!(
                "    void Set{}(const {} & newValue);\n",
                self.name, self.type_name
            ));
        }
        out.push('\n');
    }

    fn definition(&self, out: &mut String) {
        if !self.accessors.references() && !self.accessors.set_get() {
            return;
        }
        line_comment(out, self.line, "member");
        let owner = &self.class_name;
        let storage = &self.storage_name;
        if self.accessors.references() {
            out.push_str(&format!(
                "const {} & {}::{}(void) const\n{{\n    return this->{};\n}}\n\n",
                self.type_name, owner, self.name, storage
            ));
            out.push_str(&format!(
                "{} & {}::{}(void)\n{{\n    return this->{};\n}}\n\n",
                self.type_name, owner, self.name, storage
            ));
        }
        if self.accessors.set_get() {
            out.push_str(&format!(
                "void {}::Get{}({} & placeHolder) const\n{{\n    placeHolder = this->{};\n}}\n\n",
                owner, self.name, self.type_name, storage
            ));
            out.push_str(&format!(
                "void {}::Set{}(const {} & newValue)\n{{\n    this->{} = newValue;\n}}\n\n",
                owner, self.name, self.type_name, storage
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Accessors, Visibility};

    fn member(type_name: &str, visibility: Visibility, accessors: Accessors) -> MemberDef {
        let storage_name = match visibility {
            Visibility::Public => "Position".to_string(),
            _ => "mPosition".to_string(),
        };
        MemberDef {
            line: 7,
            name: "Position".into(),
            type_name: type_name.into(),
            description: String::new(),
            default: String::new(),
            visibility,
            accessors,
            is_data: true,
            is_size_t: false,
            is_c_array: type_name.contains('['),
            storage_name,
            class_name: "geo::Point".into(),
        }
    }

    fn both(member: &MemberDef) -> (String, String) {
        let mut declaration = String::new();
        let mut definition = String::new();
        member.declaration(&mut declaration);
        member.definition(&mut definition);
        (declaration, definition)
    }

    #[test]
    fn test_public_member_without_accessors() {
        let (declaration, definition) =
            both(&member("double", Visibility::Public, Accessors::None));
        assert_eq!(
            declaration,
            "/* source line 7: member */\n public:\n    double Position;\n\n"
        );
        assert!(definition.is_empty());
    }

    #[test]
    fn test_c_array_declaration() {
        let (declaration, _) = both(&member("double[3]", Visibility::Protected, Accessors::None));
        assert!(declaration.contains("    double mPosition[3];\n"));
    }

    #[test]
    fn test_all_accessors() {
        let (declaration, definition) =
            both(&member("double", Visibility::Protected, Accessors::All));
        assert!(declaration.contains(" protected:\n    double mPosition;\n"));
        assert!(declaration.contains("    const double & Position(void) const;\n"));
        assert!(declaration.contains("    double & Position(void);\n"));
        assert!(declaration.contains("    void GetPosition(double & placeHolder) const;\n"));
        assert!(declaration.contains("    void SetPosition(const double & newValue);\n"));
        assert!(definition.contains(
            "const double & geo::Point::Position(void) const\n{\n    return this->mPosition;\n}\n"
        ));
        assert!(definition.contains(
            "void geo::Point::SetPosition(const double & newValue)\n{\n    this->mPosition = newValue;\n}\n"
        ));
    }

    #[test]
    fn test_set_get_only() {
        let (declaration, definition) =
            both(&member("int", Visibility::Private, Accessors::SetGet));
        assert!(declaration.contains(" private:\n"));
        assert!(!declaration.contains("int & Position(void)"));
        assert!(definition.contains("void geo::Point::GetPosition(int & placeHolder) const"));
    }
}
