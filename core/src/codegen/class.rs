//! Class declaration and definition.
//!
//! Every data chain (copy, serialization, description, human readable
//! output, scalar introspection, JSON) walks the base classes first and the
//! members second, both in declaration order, and skips entries whose
//! `is-data` is false.

use super::{line_comment, Generate};
use crate::model::{BaseClassDef, ClassDef, ClassItem, MemberDef, ProxyMode, TypedefDef};

impl Generate for ClassDef {
    fn declaration(&self, out: &mut String) {
        line_comment(out, self.line, "class");
        let name = &self.name;

        if !self.namespace.is_empty() {
            out.push_str(&format!("namespace {} {{\n", self.namespace));
        }
        let mut head = String::from("class ");
        if !self.attribute.is_empty() {
            head.push_str(&self.attribute);
            head.push(' ');
        }
        head.push_str(name);
        let bases: Vec<String> = self.base_classes().map(BaseClassDef::inheritance).collect();
        if !bases.is_empty() {
            head.push_str(": ");
            head.push_str(&bases.join(", "));
        }
        out.push_str(&head);
        out.push_str("\n{\n");

        out.push_str(" /* default constructors and destructors. */\n");
        out.push_str(" public:\n");
        out.push_str(&format!("    {}(void);\n", name));
        out.push_str(&format!("    {}(const {} & other);\n", name, name));
        out.push_str(&format!("    {} & operator = (const {} & other);\n", name, name));
        let virtual_kw = if self.virtual_dtor { "virtual " } else { "" };
        out.push_str(&format!("    {}~{}();\n\n", virtual_kw, name));

        for item in &self.items {
            item.declaration(out);
        }

        // Declared after every child since the parameter types may be enums
        // or typedefs of this class.
        if self.ctor_all_members && !self.layout.members.is_empty() {
            out.push_str("\n public:\n");
            out.push_str("    /* ctor-all-member is set to: true */\n");
            out.push_str(&format!("    {}({});\n", name, self.all_members_parameters()));
        }

        self.standard_methods_declaration(out);
        self.data_methods_declaration(out);

        out.push_str(&format!("}}; // {}\n", name));
        if !self.namespace.is_empty() {
            out.push_str(&format!("}} // end of namespace {}\n", self.namespace));
        }

        if self.mts_proxy != ProxyMode::Disabled {
            let proxy = self.proxy_name();
            out.push_str(&format!("\n// mts-proxy set to {}\n", self.mts_proxy));
            out.push_str(&format!(
                "typedef mtsGenericObjectProxy<{} > {};\n",
                self.qualified_name(),
                proxy
            ));
            out.push_str(&format!("CMN_DECLARE_SERVICES_INSTANTIATION({});\n\n", proxy));
        }

        self.standard_functions_declaration(out);
        self.data_functions_declaration(out);
        for enumeration in self.enums() {
            enumeration.trait_declaration(out, &self.attribute);
        }
    }

    fn definition(&self, out: &mut String) {
        line_comment(out, self.line, "class");

        if self.mts_proxy == ProxyMode::Full {
            out.push_str(&format!("\n// mts-proxy set to {}\n", self.mts_proxy));
            out.push_str(&format!(
                "CMN_IMPLEMENT_SERVICES_TEMPLATED({});\n\n",
                self.proxy_name()
            ));
        }

        self.constructors_definition(out);
        self.raw_methods_definition(out);
        self.stream_methods_definition(out);

        for item in &self.items {
            item.definition(out);
        }

        self.standard_functions_definition(out);
        self.data_functions_definition(out);
    }
}

impl Generate for ClassItem {
    fn declaration(&self, out: &mut String) {
        match self {
            ClassItem::BaseClass(base) => base.declaration(out),
            ClassItem::Typedef(typedef) => typedef.declaration(out),
            ClassItem::Member(member) => member.declaration(out),
            ClassItem::Enum(enumeration) => enumeration.declaration(out),
            ClassItem::Inline(inline) => inline.declaration(out),
        }
    }

    fn definition(&self, out: &mut String) {
        match self {
            ClassItem::BaseClass(base) => base.definition(out),
            ClassItem::Typedef(typedef) => typedef.definition(out),
            ClassItem::Member(member) => member.definition(out),
            // enum helpers follow the data functions, see `ClassDef::definition`
            ClassItem::Enum(_) => {}
            ClassItem::Inline(inline) => inline.definition(out),
        }
    }
}

impl BaseClassDef {
    /// Entry of the class inheritance list, e.g. `public mtsGenericObject`.
    pub fn inheritance(&self) -> String {
        format!("{} {}", self.visibility, self.type_name)
    }
}

impl Generate for BaseClassDef {
    fn declaration(&self, out: &mut String) {
        line_comment(out, self.line, "base-class");
    }

    fn definition(&self, _out: &mut String) {}
}

impl Generate for TypedefDef {
    fn declaration(&self, out: &mut String) {
        line_comment(out, self.line, "typedef");
        out.push_str(" public:\n");
        out.push_str(&format!("    typedef {} {};\n", self.type_name, self.name));
    }

    fn definition(&self, _out: &mut String) {}
}

impl ClassDef {
    fn proxy_name(&self) -> String {
        if self.namespace.is_empty() {
            format!("{}Proxy", self.name)
        } else {
            format!("{}_{}Proxy", self.namespace, self.name)
        }
    }

    fn all_members_parameters(&self) -> String {
        self.members()
            .map(|member| {
                if member.is_c_array {
                    let (element, extents) = member.split_array();
                    format!("const {} (&new{}){}", element, member.name, extents)
                } else {
                    format!("const {} & new{}", member.type_name, member.name)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Wraps a copy source that only the initializer list reads.
    fn unused_by_initializers(&self, parameter: &str) -> String {
        if self.has_initializers() {
            parameter.to_string()
        } else {
            format!("CMN_UNUSED({})", parameter)
        }
    }

    /// Emits `code` only for classes with at least one base class or member,
    /// avoiding unused variables in empty bodies.
    fn skip_if_empty<'a>(&self, code: &'a str) -> &'a str {
        if self.has_content() {
            code
        } else {
            ""
        }
    }

    /// Wraps a parameter unused by empty bodies.
    fn unused(&self, parameter: &str) -> String {
        if self.has_content() {
            parameter.to_string()
        } else {
            format!("CMN_UNUSED({})", parameter)
        }
    }

    fn standard_methods_declaration(&self, out: &mut String) {
        out.push_str("    /* default methods */\n");
        out.push_str(" public:\n");
        out.push_str("    void SerializeRaw(std::ostream & outputStream) const;\n");
        out.push_str("    void DeSerializeRaw(std::istream & inputStream);\n");
        out.push_str("    void ToStream(std::ostream & outputStream) const;\n");
        out.push_str("    void ToStreamRaw(std::ostream & outputStream, const char delimiter = ' ',\n");
        out.push_str("                     bool headerOnly = false, const std::string & headerPrefix = \"\") const;\n");
    }

    fn data_methods_declaration(&self, out: &mut String) {
        out.push_str("    /* default data methods */\n");
        out.push_str(" public:\n");
        out.push_str(&format!("    void Copy(const {} & source);\n", self.name));
        out.push_str("    void SerializeBinary(std::ostream & outputStream) const CISST_THROW(std::runtime_error);\n");
        out.push_str("    void DeSerializeBinary(std::istream & inputStream, const cmnDataFormat & localFormat, const cmnDataFormat & remoteFormat) CISST_THROW(std::runtime_error);\n");
        out.push_str("    void SerializeText(std::ostream & outputStream, const char delimiter = ',') const CISST_THROW(std::runtime_error);\n");
        out.push_str("    std::string SerializeDescription(const char delimiter = ',', const std::string & userDescription = \"\") const;\n");
        out.push_str("    void DeSerializeText(std::istream & inputStream, const char delimiter = ',') CISST_THROW(std::runtime_error);\n");
        out.push_str("    std::string HumanReadable(void) const;\n");
        out.push_str("    bool ScalarNumberIsFixed(void) const;\n");
        out.push_str("    size_t ScalarNumber(void) const;\n");
        out.push_str("    double Scalar(const size_t index) const CISST_THROW(std::out_of_range);\n");
        out.push_str("    std::string ScalarDescription(const size_t index, const std::string & userDescription = \"\") const CISST_THROW(std::out_of_range);\n");
        out.push_str("#if CISST_HAS_JSON\n");
        out.push_str("    void SerializeTextJSON(Json::Value & jsonValue) const;\n");
        out.push_str("    void DeSerializeTextJSON(const Json::Value & jsonValue) CISST_THROW(std::runtime_error);\n");
        out.push_str("#endif // CISST_HAS_JSON\n\n");
    }

    fn standard_functions_declaration(&self, out: &mut String) {
        let name = self.qualified_name();
        let attribute = with_space(&self.attribute);
        out.push_str("/* default functions */\n");
        out.push_str(&format!(
            "void {}cmnSerializeRaw(std::ostream & outputStream, const {} & object);\n",
            attribute, name
        ));
        out.push_str(&format!(
            "void {}cmnDeSerializeRaw(std::istream & inputStream, {} & placeHolder);\n",
            attribute, name
        ));
    }

    fn data_functions_declaration(&self, out: &mut String) {
        let name = self.qualified_name();
        let attribute = with_space(&self.attribute);
        out.push_str("/* data functions */\n");
        out.push_str(&format!("template <> class cmnData<{} > {{\n", name));
        out.push_str("public:\n");
        out.push_str("    enum {IS_SPECIALIZED = 1};\n");
        out.push_str(&format!("    typedef {} DataType;\n", name));
        for (signature, call) in [
            ("static void Copy(DataType & data, const DataType & source)", "data.Copy(source);"),
            (
                "static std::string SerializeDescription(const DataType & data, const char delimiter, const std::string & userDescription)",
                "return data.SerializeDescription(delimiter, userDescription);",
            ),
            (
                "static void SerializeBinary(const DataType & data, std::ostream & outputStream) CISST_THROW(std::runtime_error)",
                "data.SerializeBinary(outputStream);",
            ),
            (
                "static void DeSerializeBinary(DataType & data, std::istream & inputStream, const cmnDataFormat & localFormat, const cmnDataFormat & remoteFormat) CISST_THROW(std::runtime_error)",
                "data.DeSerializeBinary(inputStream, localFormat, remoteFormat);",
            ),
            (
                "static void SerializeText(const DataType & data, std::ostream & outputStream, const char delimiter = ',') CISST_THROW(std::runtime_error)",
                "data.SerializeText(outputStream, delimiter);",
            ),
            (
                "static void DeSerializeText(DataType & data, std::istream & inputStream, const char delimiter = ',') CISST_THROW(std::runtime_error)",
                "data.DeSerializeText(inputStream, delimiter);",
            ),
            (
                "static std::string HumanReadable(const DataType & data)",
                "return data.HumanReadable();",
            ),
            (
                "static bool ScalarNumberIsFixed(const DataType & data)",
                "return data.ScalarNumberIsFixed();",
            ),
            (
                "static size_t ScalarNumber(const DataType & data)",
                "return data.ScalarNumber();",
            ),
            (
                "static std::string ScalarDescription(const DataType & data, const size_t index, const std::string & userDescription = \"\") CISST_THROW(std::out_of_range)",
                "return data.ScalarDescription(index, userDescription);",
            ),
            (
                "static double Scalar(const DataType & data, const size_t index) CISST_THROW(std::out_of_range)",
                "return data.Scalar(index);",
            ),
        ] {
            out.push_str(&format!("    {} {{\n        {}\n    }}\n", signature, call));
        }
        out.push_str("};\n");
        out.push_str(&format!(
            "inline std::ostream & operator << (std::ostream & outputStream, const {} & data) {{\n",
            name
        ));
        out.push_str(&format!(
            "    outputStream << cmnData<{} >::HumanReadable(data);\n",
            name
        ));
        out.push_str("    return outputStream;\n}\n");
        out.push_str("#if CISST_HAS_JSON\n");
        out.push_str(&format!(
            "template <> void {}cmnDataJSON<{} >::SerializeText(const {} & data, Json::Value & jsonValue);\n",
            attribute, name, name
        ));
        out.push_str(&format!(
            "template <> void {}cmnDataJSON<{} >::DeSerializeText({} & data, const Json::Value & jsonValue) CISST_THROW(std::runtime_error);\n",
            attribute, name, name
        ));
        out.push_str("#endif // CISST_HAS_JSON\n");
    }

    fn constructors_definition(&self, out: &mut String) {
        let name = &self.name;
        let class = self.qualified_name();

        let mut default_ctor = format!("{}::{}(void)", class, name);
        let mut copy_ctor = format!(
            "{}::{}(const {} & {})",
            class,
            name,
            name,
            self.unused_by_initializers("other")
        );
        let mut assign = format!(
            "{} & {}::operator = (const {} & {})\n{{\n",
            class,
            class,
            name,
            self.unused_by_initializers("other")
        );
        let mut members_ctor = format!("{}::{}({})", class, name, self.all_members_parameters());

        if self.has_initializers() {
            default_ctor.push(':');
            copy_ctor.push(':');
            members_ctor.push(':');
        }
        default_ctor.push('\n');
        copy_ctor.push('\n');
        members_ctor.push('\n');

        let mut separator = "    ";
        for base in self.base_classes() {
            default_ctor.push_str(&format!("{}{}()\n", separator, base.type_name));
            copy_ctor.push_str(&format!("{}{}(other)\n", separator, base.type_name));
            assign.push_str(&format!("    {}::operator = (other);\n", base.type_name));
            members_ctor.push_str(&format!("{}{}()\n", separator, base.type_name));
            separator = "    , ";
        }
        // C arrays cannot be initialized in the initializer list.
        for member in self.members().filter(|member| !member.is_c_array) {
            let storage = &member.storage_name;
            default_ctor.push_str(&format!("{}{}({})\n", separator, storage, member.default));
            copy_ctor.push_str(&format!("{}{}(other.{})\n", separator, storage, storage));
            assign.push_str(&format!("    {} = other.{};\n", storage, storage));
            members_ctor.push_str(&format!("{}{}(new{})\n", separator, storage, member.name));
            separator = "    , ";
        }

        default_ctor.push_str("{}\n\n");
        copy_ctor.push_str("{}\n\n");
        assign.push_str("    return *this;\n}\n\n");

        let arrays: Vec<&MemberDef> = self.members().filter(|member| member.is_c_array).collect();
        if arrays.is_empty() {
            members_ctor.push_str("{}\n\n");
        } else {
            members_ctor.push_str("{\n");
            for member in arrays {
                members_ctor.push_str(&format!(
                    "    cmnData<{} >::Copy(this->{}, new{});\n",
                    member.type_name, member.storage_name, member.name
                ));
            }
            members_ctor.push_str("}\n\n");
        }

        out.push_str(&default_ctor);
        out.push_str(&copy_ctor);
        out.push_str(&assign);
        if self.ctor_all_members && !self.layout.members.is_empty() {
            out.push_str(&members_ctor);
        }
        out.push_str(&format!("{}::~{}(void)\n{{}}\n\n", class, name));
    }

    fn raw_methods_definition(&self, out: &mut String) {
        let class = self.qualified_name();

        out.push_str(&format!(
            "\nvoid {}::SerializeRaw(std::ostream & {}) const\n{{\n",
            class,
            self.unused("outputStream__cdg")
        ));
        for base in self.data_base_classes() {
            out.push_str(&format!(
                "    {}::SerializeRaw(outputStream__cdg);\n",
                base.type_name
            ));
        }
        for member in self.data_members() {
            let function = if member.is_size_t {
                "cmnSerializeSizeRaw"
            } else {
                "cmnSerializeRaw"
            };
            out.push_str(&format!(
                "    {}(outputStream__cdg, this->{});\n",
                function, member.storage_name
            ));
        }
        out.push_str("}\n\n");

        out.push_str(&format!(
            "\nvoid {}::DeSerializeRaw(std::istream & {})\n{{\n",
            class,
            self.unused("inputStream__cdg")
        ));
        for base in self.data_base_classes() {
            out.push_str(&format!(
                "    {}::DeSerializeRaw(inputStream__cdg);\n",
                base.type_name
            ));
        }
        for member in self.data_members() {
            let function = if member.is_size_t {
                "cmnDeSerializeSizeRaw"
            } else {
                "cmnDeSerializeRaw"
            };
            out.push_str(&format!(
                "    {}(inputStream__cdg, this->{});\n",
                function, member.storage_name
            ));
        }
        out.push_str("}\n\n");
    }

    fn stream_methods_definition(&self, out: &mut String) {
        let class = self.qualified_name();
        out.push_str(&format!(
            "\nvoid {}::ToStream(std::ostream & outputStream__cdg) const\n{{\n",
            class
        ));
        out.push_str("    outputStream__cdg << this->HumanReadable();\n}\n");

        out.push_str(&format!(
            "\nvoid {}::ToStreamRaw(std::ostream & outputStream__cdg, const char delimiter__cdg, bool headerOnly__cdg, const std::string & headerPrefix__cdg) const\n{{\n",
            class
        ));
        out.push_str("    if (headerOnly__cdg) {\n");
        out.push_str(&format!(
            "        outputStream__cdg << cmnData<{} >::SerializeDescription(*this, delimiter__cdg, headerPrefix__cdg);\n",
            class
        ));
        out.push_str("    } else {\n");
        out.push_str(&format!(
            "        cmnData<{} >::SerializeText(*this, outputStream__cdg, delimiter__cdg);\n",
            class
        ));
        out.push_str("    }\n}\n");
    }

    fn standard_functions_definition(&self, out: &mut String) {
        let class = self.qualified_name();
        out.push_str("/* default functions */\n");
        out.push_str(&format!(
            "void cmnSerializeRaw(std::ostream & outputStream, const {} & object)\n{{\n",
            class
        ));
        out.push_str("    object.SerializeRaw(outputStream);\n}\n");
        out.push_str(&format!(
            "void cmnDeSerializeRaw(std::istream & inputStream, {} & placeHolder)\n{{\n",
            class
        ));
        out.push_str("    placeHolder.DeSerializeRaw(inputStream);\n}\n");
    }

    fn data_functions_definition(&self, out: &mut String) {
        out.push_str("/* data functions */\n");
        self.copy_definition(out);
        self.binary_definition(out);
        self.text_definition(out);
        self.description_definition(out);
        if self.generate_human_readable {
            self.human_readable_definition(out);
        }
        self.scalar_definition(out);
        self.json_definition(out);
        for enumeration in self.enums() {
            enumeration.definition(out);
        }
    }

    fn copy_definition(&self, out: &mut String) {
        let class = self.qualified_name();
        out.push_str(&format!(
            "void {}::Copy(const {} & {}) {{\n",
            class,
            class,
            self.unused("source__cdg")
        ));
        for base in self.data_base_classes() {
            out.push_str(&format!(
                "    cmnData<{} >::Copy(*this, source__cdg);\n",
                base.type_name
            ));
        }
        for member in self.data_members() {
            out.push_str(&format!(
                "    cmnData<{} >::Copy(this->{}, source__cdg.{});\n",
                member.type_name, member.storage_name, member.storage_name
            ));
        }
        out.push_str("}\n");
    }

    fn binary_definition(&self, out: &mut String) {
        let class = self.qualified_name();
        out.push_str(&format!(
            "void {}::SerializeBinary(std::ostream & {}) const CISST_THROW(std::runtime_error) {{\n",
            class,
            self.unused("outputStream__cdg")
        ));
        for base in self.data_base_classes() {
            out.push_str(&format!(
                "    cmnData<{} >::SerializeBinary(*this, outputStream__cdg);\n",
                base.type_name
            ));
        }
        for member in self.data_members() {
            out.push_str(&format!(
                "    cmnData<{} >::SerializeBinary(this->{}, outputStream__cdg);\n",
                member.type_name, member.storage_name
            ));
        }
        out.push_str("}\n");

        out.push_str(&format!(
            "void {}::DeSerializeBinary(std::istream & {},\n",
            class,
            self.unused("inputStream__cdg")
        ));
        out.push_str(&format!(
            "                                            const cmnDataFormat & {},\n",
            self.unused("localFormat")
        ));
        out.push_str(&format!(
            "                                            const cmnDataFormat & {}) CISST_THROW(std::runtime_error) {{\n",
            self.unused("remoteFormat")
        ));
        for base in self.data_base_classes() {
            out.push_str(&format!(
                "    cmnData<{} >::DeSerializeBinary(*this, inputStream__cdg, localFormat, remoteFormat);\n",
                base.type_name
            ));
        }
        for member in self.data_members() {
            if member.is_size_t {
                out.push_str(&format!(
                    "    cmnDataDeSerializeBinary_size_t(this->{}, inputStream__cdg, localFormat, remoteFormat);\n",
                    member.storage_name
                ));
            } else {
                out.push_str(&format!(
                    "    cmnData<{} >::DeSerializeBinary(this->{}, inputStream__cdg, localFormat, remoteFormat);\n",
                    member.type_name, member.storage_name
                ));
            }
        }
        out.push_str("}\n");
    }

    fn text_definition(&self, out: &mut String) {
        let class = self.qualified_name();
        out.push_str(&format!(
            "void {}::SerializeText(std::ostream & {}, const char {}) const CISST_THROW(std::runtime_error) {{\n",
            class,
            self.unused("outputStream__cdg"),
            self.unused("delimiter__cdg")
        ));
        out.push_str(self.skip_if_empty("    bool someData__cdg = false;\n"));
        let separator = "    if (someData__cdg) {\n        outputStream__cdg << delimiter__cdg;\n    }\n    someData__cdg = true;\n";
        for base in self.data_base_classes() {
            out.push_str(separator);
            out.push_str(&format!(
                "    cmnData<{} >::SerializeText(*this, outputStream__cdg, delimiter__cdg);\n",
                base.type_name
            ));
        }
        for member in self.data_members() {
            out.push_str(separator);
            out.push_str(&format!(
                "    cmnData<{} >::SerializeText(this->{}, outputStream__cdg, delimiter__cdg);\n",
                member.type_name, member.storage_name
            ));
        }
        out.push_str("}\n");

        out.push_str(&format!(
            "void {}::DeSerializeText(std::istream & {},\n",
            class,
            self.unused("inputStream__cdg")
        ));
        out.push_str(&format!(
            "                                          const char {}) CISST_THROW(std::runtime_error) {{\n",
            self.unused("delimiter__cdg")
        ));
        out.push_str(self.skip_if_empty("    bool someData__cdg = false;\n"));
        let separator = format!(
            "    if (someData__cdg) {{\n        cmnDataDeSerializeTextDelimiter(inputStream__cdg, delimiter__cdg, \"{}\");\n    }}\n    someData__cdg = true;\n",
            class
        );
        for base in self.data_base_classes() {
            out.push_str(&separator);
            out.push_str(&format!(
                "    cmnData<{} >::DeSerializeText(*this, inputStream__cdg, delimiter__cdg);\n",
                base.type_name
            ));
        }
        for member in self.data_members() {
            out.push_str(&separator);
            out.push_str(&format!(
                "    cmnData<{} >::DeSerializeText(this->{}, inputStream__cdg, delimiter__cdg);\n",
                member.type_name, member.storage_name
            ));
        }
        out.push_str("}\n");
    }

    fn description_definition(&self, out: &mut String) {
        let class = self.qualified_name();
        out.push_str(&format!(
            "std::string {}::SerializeDescription(const char {}, const std::string & {}) const {{\n",
            class,
            self.unused("delimiter__cdg"),
            self.unused("userDescription__cdg")
        ));
        out.push_str(self.skip_if_empty("    bool someData__cdg = false;\n"));
        out.push_str(self.skip_if_empty(
            "    const std::string prefix__cdg = (userDescription__cdg == \"\") ? \"\" : (userDescription__cdg + \".\");\n",
        ));
        out.push_str("    std::stringstream description__cdg;\n");
        let separator = "    if (someData__cdg) {\n        description__cdg << delimiter__cdg;\n    }\n    someData__cdg = true;\n";
        for base in self.data_base_classes() {
            out.push_str(separator);
            out.push_str(&format!(
                "    description__cdg << cmnData<{} >::SerializeDescription(*this, delimiter__cdg, userDescription__cdg);\n",
                base.type_name
            ));
        }
        for member in self.data_members() {
            out.push_str(separator);
            out.push_str(&format!(
                "    description__cdg << cmnData<{} >::SerializeDescription(this->{}, delimiter__cdg, prefix__cdg + \"{}\");\n",
                member.type_name, member.storage_name, member.name
            ));
        }
        out.push_str("    return description__cdg.str();\n}\n");
    }

    fn human_readable_definition(&self, out: &mut String) {
        let class = self.qualified_name();
        out.push_str(&format!("std::string {}::HumanReadable(void) const {{\n", class));
        out.push_str("    std::stringstream description__cdg;\n");
        out.push_str(&format!("    description__cdg << \"{}\" << std::endl;\n", class));
        for base in self.data_base_classes() {
            out.push_str(&format!(
                "    description__cdg << cmnData<{} >::HumanReadable(*this) << std::endl;\n",
                base.type_name
            ));
        }
        for member in self.data_members() {
            out.push_str(&format!(
                "    description__cdg << \"  {}:\" << cmnData<{} >::HumanReadable(this->{});\n",
                member.name, member.type_name, member.storage_name
            ));
        }
        out.push_str("    return description__cdg.str();\n}\n");
    }

    fn scalar_definition(&self, out: &mut String) {
        let class = self.qualified_name();

        out.push_str(&format!("bool {}::ScalarNumberIsFixed(void) const {{\n", class));
        out.push_str("    return true\n");
        for base in self.data_base_classes() {
            out.push_str(&format!(
                "           && cmnData<{} >::ScalarNumberIsFixed(*this)\n",
                base.type_name
            ));
        }
        for member in self.data_members() {
            out.push_str(&format!(
                "           && cmnData<{} >::ScalarNumberIsFixed(this->{})\n",
                member.type_name, member.storage_name
            ));
        }
        out.push_str("    ;\n}\n");

        out.push_str(&format!("size_t {}::ScalarNumber(void) const {{\n", class));
        out.push_str("    return 0\n");
        for base in self.data_base_classes() {
            out.push_str(&format!(
                "           + cmnData<{} >::ScalarNumber(*this)\n",
                base.type_name
            ));
        }
        for member in self.data_members() {
            out.push_str(&format!(
                "           + cmnData<{} >::ScalarNumber(this->{})\n",
                member.type_name, member.storage_name
            ));
        }
        out.push_str("    ;\n}\n");

        out.push_str(&format!(
            "std::string {}::ScalarDescription(const size_t {}, const std::string & userDescription__cdg) const CISST_THROW(std::out_of_range) {{\n",
            class,
            self.unused("index__cdg")
        ));
        out.push_str("    std::string prefix__cdg = (userDescription__cdg == \"\") ? \"\" : (userDescription__cdg + \".\");\n");
        out.push_str(self.skip_if_empty("    size_t baseIndex__cdg = 0;\n"));
        out.push_str(self.skip_if_empty("    size_t currentMaxIndex__cdg = 0;\n"));
        for base in self.data_base_classes() {
            self.scalar_step(
                out,
                &base.type_name,
                "*this",
                &format!(
                    "cmnData<{} >::ScalarDescription(*this, index__cdg - baseIndex__cdg, prefix__cdg)",
                    base.type_name
                ),
            );
        }
        for member in self.data_members() {
            self.scalar_step(
                out,
                &member.type_name,
                &format!("this->{}", member.storage_name),
                &format!(
                    "cmnData<{} >::ScalarDescription(this->{}, index__cdg - baseIndex__cdg, prefix__cdg + \"{}\")",
                    member.type_name, member.storage_name, member.name
                ),
            );
        }
        out.push_str(&format!(
            "    cmnThrow(std::out_of_range(\"cmnDataScalarDescription: {} index out of range\"));\n",
            class
        ));
        out.push_str("    return \"\";\n}\n");

        out.push_str(&format!(
            "double {}::Scalar(const size_t {}) const CISST_THROW(std::out_of_range) {{\n",
            class,
            self.unused("index__cdg")
        ));
        out.push_str(self.skip_if_empty("    size_t baseIndex__cdg = 0;\n"));
        out.push_str(self.skip_if_empty("    size_t currentMaxIndex__cdg = 0;\n"));
        for base in self.data_base_classes() {
            self.scalar_step(
                out,
                &base.type_name,
                "*this",
                &format!(
                    "cmnData<{} >::Scalar(*this, index__cdg - baseIndex__cdg)",
                    base.type_name
                ),
            );
        }
        for member in self.data_members() {
            self.scalar_step(
                out,
                &member.type_name,
                &format!("this->{}", member.storage_name),
                &format!(
                    "cmnData<{} >::Scalar(this->{}, index__cdg - baseIndex__cdg)",
                    member.type_name, member.storage_name
                ),
            );
        }
        out.push_str(&format!(
            "    cmnThrow(std::out_of_range(\"cmnDataScalar: {} index out of range\"));\n",
            class
        ));
        out.push_str("    return 1.2345;\n}\n");
    }

    /// One range check of the scalar index dispatch.
    fn scalar_step(&self, out: &mut String, type_name: &str, target: &str, result: &str) {
        out.push_str(&format!(
            "    currentMaxIndex__cdg += cmnData<{} >::ScalarNumber({});\n",
            type_name, target
        ));
        out.push_str("    if (index__cdg < currentMaxIndex__cdg) {\n");
        out.push_str(&format!("        return {};\n", result));
        out.push_str("    }\n");
        out.push_str("    baseIndex__cdg = currentMaxIndex__cdg;\n");
    }

    fn json_definition(&self, out: &mut String) {
        let class = self.qualified_name();
        out.push_str("#if CISST_HAS_JSON\n");
        out.push_str("template <>\n");
        out.push_str(&format!(
            "void cmnDataJSON<{} >::SerializeText(const {} & data, Json::Value & jsonValue) {{\n",
            class, class
        ));
        out.push_str("    data.SerializeTextJSON(jsonValue);\n}\n");
        out.push_str(&format!(
            "void {}::SerializeTextJSON(Json::Value & {}) const {{\n",
            class,
            self.unused("jsonValue")
        ));
        for base in self.data_base_classes() {
            out.push_str(&format!(
                "    cmnDataJSON<{} >::SerializeText(*(dynamic_cast<const {}*>(this)), jsonValue);\n",
                base.type_name, base.type_name
            ));
        }
        for member in self.data_members() {
            out.push_str(&format!(
                "    cmnDataJSON<{} >::SerializeText(this->{}, jsonValue[\"{}\"]);\n",
                member.type_name, member.storage_name, member.name
            ));
        }
        out.push_str("}\n");

        out.push_str("template <>\n");
        out.push_str(&format!(
            "void cmnDataJSON<{} >::DeSerializeText({} & data, const Json::Value & jsonValue) CISST_THROW(std::runtime_error) {{\n",
            class, class
        ));
        out.push_str("    data.DeSerializeTextJSON(jsonValue);\n}\n");
        out.push_str(&format!(
            "void {}::DeSerializeTextJSON(const Json::Value & {}) CISST_THROW(std::runtime_error) {{\n",
            class,
            self.unused("jsonValue")
        ));
        for base in self.data_base_classes() {
            out.push_str(&format!(
                "    cmnDataJSON<{} >::DeSerializeText(*(dynamic_cast<{}*>(this)), jsonValue);\n",
                base.type_name, base.type_name
            ));
        }
        out.push_str(self.skip_if_empty("    Json::Value field__cdg;\n"));
        for member in self.data_members() {
            json_member_read(out, member);
        }
        out.push_str("}\n");
        out.push_str("#endif // CISST_HAS_JSON\n");
    }
}

/// Reads one member from its JSON entry. Members without a default value
/// cannot be left untouched and throw on a missing entry.
fn json_member_read(out: &mut String, member: &MemberDef) {
    out.push_str(&format!("    field__cdg = jsonValue[\"{}\"];\n", member.name));
    out.push_str("    if (!field__cdg.empty()) {\n");
    out.push_str(&format!(
        "        cmnDataJSON<{} >::DeSerializeText(this->{}, field__cdg);\n",
        member.type_name, member.storage_name
    ));
    if member.default.is_empty() {
        out.push_str("    } else {\n");
        out.push_str(&format!(
            "        cmnThrow(\"cmnDataJSON<{}>::DeSerializeText: empty JSON value for: {}\");\n",
            member.type_name, member.name
        ));
    }
    out.push_str("    }\n");
}

fn with_space(attribute: &str) -> String {
    if attribute.is_empty() {
        String::new()
    } else {
        format!("{} ", attribute)
    }
}
