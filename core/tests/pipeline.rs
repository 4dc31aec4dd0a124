use cdg_core::{compile, AppError, Artifacts, Compiler, GeneratorConfig};
use pretty_assertions::assert_eq;

fn config() -> GeneratorConfig {
    GeneratorConfig {
        source_name: "robot/state.cdg".into(),
        header_include: "robot/state.h".into(),
        version: "1.0.0".into(),
    }
}

fn generate(text: &str) -> Artifacts {
    match compile(text, &config()) {
        Ok(artifacts) => artifacts,
        Err(err) => panic!("compilation failed:\n{}", err),
    }
}

const STATE: &str = r#"
// joint state of a robot arm
inline-header {
#include <vector>
}

class {
    name JointState;
    namespace robot;
    attribute ROBOT_EXPORT;
    ctor-all-members true;
    mts-proxy declaration-only;

    base-class {
        type mtsGenericObject;
        is-data true;
    }
    base-class {
        type cmnGenericObject;
        is-data false;
    }
    enum {
        name Mode;
        enum-value { name IDLE; description not moving; }
        enum-value { name ACTIVE; value 5; }
        enum-value { name FAULT; }
    }
    member {
        name Positions;
        type std::vector<double>;
        description measured positions;
    }
    member {
        name Velocity;
        type double;
        default 0.0;
        visibility public;
    }
    member {
        name Offsets;
        type double[6];
        accessors none;
    }
    inline-code {
        static int counter = 0; { counter++; }
    }
}
"#;

#[test]
fn test_emission_is_idempotent() {
    let mut compiler = Compiler::new();
    assert!(compiler.parse_file(STATE.as_bytes(), "robot/state.cdg"));
    assert!(compiler.validate(), "{}", compiler.validation_message());

    let mut first = (Vec::new(), Vec::new());
    let mut second = (Vec::new(), Vec::new());
    compiler.emit_declaration(&mut first.0, &config()).unwrap();
    compiler.emit_definition(&mut first.1, &config()).unwrap();
    compiler.emit_declaration(&mut second.0, &config()).unwrap();
    compiler.emit_definition(&mut second.1, &config()).unwrap();
    assert_eq!(first, second);
    assert!(!first.0.is_empty() && !first.1.is_empty());
}

#[test]
fn test_full_class_declaration() {
    let artifacts = generate(STATE);
    let header = &artifacts.declaration;

    assert!(header.starts_with("// file automatically generated, do not modify\n"));
    assert!(header.contains("#ifndef _robot_state_h\n"));
    assert!(header.contains("#include <cisstMultiTask/mtsGenericObjectProxy.h>\n"));
    assert!(header.contains("/* source line 3: inline-header */\n\n#include <vector>\n"));
    assert!(header.contains("namespace robot {\n"));
    assert!(header.contains(
        "class ROBOT_EXPORT JointState: public mtsGenericObject, public cmnGenericObject\n{\n"
    ));
    assert!(header.contains(
        "    enum Mode {\n/* source line 24: enum-value */\n        IDLE,\n/* source line 25: enum-value */\n        ACTIVE = 5,\n/* source line 26: enum-value */\n        FAULT\n    };\n"
    ));
    assert!(header.contains("    /*! measured positions */\n    std::vector<double> mPositions;\n"));
    assert!(header.contains("    double Velocity;\n"));
    assert!(header.contains("    double mOffsets[6];\n"));
    assert!(header.contains("    const std::vector<double> & Positions(void) const;\n"));
    assert!(!header.contains("Velocity(void)"));
    assert!(!header.contains("Offsets(void)"));
    assert!(header.contains("typedef mtsGenericObjectProxy<robot::JointState > robot_JointStateProxy;\n"));
    assert!(header.contains("CMN_DATA_SPECIALIZATION_FOR_ENUM_WITH_ATTRIBUTE(robot::JointState::Mode, int,"));
    assert!(header.trim_end().ends_with("#endif // _robot_state_h"));
}

#[test]
fn test_all_members_constructor_follows_children() {
    let header = generate(STATE).declaration;
    let enum_position = header.find("enum Mode {").unwrap();
    let last_member = header.find("double mOffsets[6];").unwrap();
    let constructor = header
        .find("JointState(const std::vector<double> & newPositions, const double & newVelocity, const double (&newOffsets)[6]);")
        .unwrap();
    assert!(enum_position < constructor);
    assert!(last_member < constructor);
}

#[test]
fn test_full_class_definition() {
    let code = generate(STATE).definition;

    assert!(code.contains("#include <robot/state.h>\n"));
    assert!(!code.contains("CMN_IMPLEMENT_SERVICES_TEMPLATED"));
    assert!(code.contains("robot::JointState::JointState(void):\n    mtsGenericObject()\n    , cmnGenericObject()\n    , mPositions()\n    , Velocity(0.0)\n{}\n"));
    assert!(code.contains(
        "robot::JointState::JointState(const std::vector<double> & newPositions, const double & newVelocity, const double (&newOffsets)[6]):\n    mtsGenericObject()\n    , cmnGenericObject()\n    , mPositions(newPositions)\n    , Velocity(newVelocity)\n{\n    cmnData<double[6] >::Copy(this->mOffsets, newOffsets);\n}\n"
    ));
    assert!(code.contains("static int counter = 0; { counter++; }"));
    assert!(code.contains("    case IDLE:\n        return \"not moving\";\n"));
    assert!(code.contains("    if (value == \"ACTIVE\") {\n        return ACTIVE;\n"));
}

#[test]
fn test_excluded_base_never_in_data_chains() {
    let code = generate(STATE).definition;
    assert!(code.contains("cmnData<mtsGenericObject >::Copy(*this, source__cdg);"));
    assert!(!code.contains("cmnData<cmnGenericObject >"));
    assert!(!code.contains("cmnDataJSON<cmnGenericObject >"));
    assert!(!code.contains("cmnGenericObject::SerializeRaw"));
}

#[test]
fn test_minimal_public_member() {
    let artifacts = generate("class { name A; member { name x; type int; visibility public; } }");
    assert_eq!(artifacts.declaration.matches("    int x;\n").count(), 1);
    assert!(!artifacts.declaration.contains("int & x(void)"));
    assert!(!artifacts.declaration.contains("Getx"));
    assert!(artifacts.definition.contains("cmnData<int >::SerializeText(this->x, outputStream__cdg, delimiter__cdg);"));
}

#[test]
fn test_protected_member_without_accessors() {
    let artifacts = generate("class { name A; member { name x; type int; accessors none; } }");
    assert!(artifacts.declaration.contains(" protected:\n    int mx;\n"));
    assert!(!artifacts.declaration.contains("accessors is set to"));
    assert!(!artifacts.declaration.contains("x(void)"));
    assert!(!artifacts.definition.contains("/* source line 1: member */"));
    assert!(!artifacts.definition.contains("A::x(void)"));
    assert!(!artifacts.definition.contains("A::Getx"));
    assert!(!artifacts.definition.contains("A::Setx"));
    assert!(artifacts.definition.contains("cmnData<int >::Copy(this->mx, source__cdg.mx);"));
}

#[test]
fn test_array_only_class_constructors() {
    let code = generate("class { name A; member { name v; type double[3]; accessors none; } }").definition;
    assert!(code.contains("A::A(void)\n{}\n"));
    assert!(code.contains("A::A(const A & CMN_UNUSED(other))\n{}\n"));
    assert!(!code.contains("A::A(void):"));
}

#[test]
fn test_bracket_mismatch_stops_generation() {
    let mut compiler = Compiler::new();
    assert!(compiler.parse_file(
        "class { name A; member { name v; type double[3][2; } }".as_bytes(),
        "a.cdg"
    ));
    assert!(!compiler.validate());
    assert!(compiler.validation_message().contains("has 2 \"[\" but 1 \"]\""));

    let mut out = Vec::new();
    assert!(compiler.emit_declaration(&mut out, &config()).is_err());
    assert!(out.is_empty());
}

#[test]
fn test_missing_required_field_is_named() {
    for (input, keyword) in [
        ("class { member { name x; type int; } }", "\"name\""),
        ("class { name A; member { name x; } }", "\"type\""),
        ("class { name A; base-class { is-data false; } }", "\"type\""),
        ("class { name A; typedef { type int; } }", "\"name\""),
    ] {
        let mut compiler = Compiler::new();
        compiler.parse_file(input.as_bytes(), "a.cdg");
        assert!(!compiler.validate(), "{} should not validate", input);
        let message = compiler.validation_message();
        assert!(message.contains(keyword), "{} not in {}", keyword, message);
    }
}

#[test]
fn test_grammar_errors_list_legal_keywords() {
    let err = compile("class { name A; colour blue; }", &config()).unwrap_err();
    let AppError::Parse(diagnostics) = err else {
        panic!("expected a parse error");
    };
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].line, 1);
    assert!(diagnostics[0].message.contains("unexpected keyword \"colour\""));
    assert!(diagnostics[0].message.contains("member"));
}

#[test]
fn test_several_errors_reported_in_one_run() {
    let text = "class {\n  name A;\n  colour blue;\n  member { name x; type int; visibility hidden; }\n}\n}\n";
    let err = compile(text, &config()).unwrap_err();
    let AppError::Parse(diagnostics) = err else {
        panic!("expected a parse error");
    };
    let lines: Vec<usize> = diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![3, 4, 6]);
    assert!(diagnostics[2].message.contains("one too many"));
}

#[test]
fn test_model_serializes() {
    let mut compiler = Compiler::new();
    assert!(compiler.parse_file(STATE.as_bytes(), "robot/state.cdg"));
    assert!(compiler.validate());
    let model = compiler.model().unwrap();

    let json = serde_json::to_value(model).unwrap();
    assert_eq!(json["items"][1]["kind"], "class");
    assert_eq!(json["items"][1]["name"], "JointState");
    assert_eq!(json["items"][1]["mts_proxy"], "declaration-only");

    let yaml = serde_yaml::to_string(model).unwrap();
    assert!(yaml.contains("storage_name: mPositions"));
}
