//! # Validation
//!
//! Second pass over a successfully parsed tree. It fills in declared
//! defaults, derives the values that depend on other fields (accessor modes,
//! descriptions), runs the cross-field checks of each scope kind and builds
//! the typed [`Unit`] consumed by the generator.
//!
//! Every problem found is collected; the pass never stops at the first one.

use crate::error::Diagnostic;
use crate::model::{
    Accessors, BaseClassDef, ClassDef, ClassItem, ClassLayout, EnumDef, EnumValueDef, InlineDef,
    InlineTarget, MemberDef, ProxyMode, TypedefDef, Unit, UnitItem, Visibility,
};
use crate::schema::ScopeKind;
use crate::scope::Scope;
use tracing::info;

/// Validates the tree rooted at `root` and builds the typed model.
///
/// On failure, returns one rendered diagnostic per problem.
pub fn validate(root: &mut Scope, file: &str) -> Result<Unit, Vec<String>> {
    root.fill_defaults();
    let mut validator = Validator {
        file,
        errors: Vec::new(),
    };
    let unit = validator.unit(root);
    if validator.errors.is_empty() {
        info!(
            file,
            classes = unit.classes().count(),
            "description validated"
        );
        Ok(unit)
    } else {
        Err(validator.errors)
    }
}

struct Validator<'f> {
    file: &'f str,
    errors: Vec<String>,
}

impl Validator<'_> {
    fn error(&mut self, line: usize, message: String) {
        self.errors
            .push(Diagnostic::new(self.file, line, message).to_string());
    }

    /// Generic check shared by every kind: required fields are non-empty.
    fn required(&mut self, scope: &Scope) {
        if let Err(messages) = scope.is_valid() {
            for message in messages {
                self.error(scope.line(), format!("{} in scope \"{}\"", message, scope.kind()));
            }
        }
    }

    fn unit(&mut self, root: &mut Scope) -> Unit {
        self.required(root);
        let mut items = Vec::new();
        for child in root.children_mut() {
            match child.kind() {
                ScopeKind::Class => items.push(UnitItem::Class(self.class(child))),
                ScopeKind::InlineHeader | ScopeKind::InlineCode => {
                    items.push(UnitItem::Inline(inline(child)))
                }
                other => self.unexpected(child.line(), ScopeKind::Global, other),
            }
        }
        Unit { items }
    }

    fn unexpected(&mut self, line: usize, parent: ScopeKind, child: ScopeKind) {
        self.error(
            line,
            format!("scope \"{}\" is not allowed in \"{}\"", child, parent),
        );
    }

    fn class(&mut self, scope: &mut Scope) -> ClassDef {
        self.required(scope);
        let mut class = ClassDef {
            line: scope.line(),
            name: scope.value("name").to_string(),
            attribute: scope.value("attribute").to_string(),
            namespace: scope.value("namespace").to_string(),
            ctor_all_members: scope.flag("ctor-all-members"),
            virtual_dtor: scope.flag("virtual-dtor"),
            generate_human_readable: scope.flag("generate-human-readable"),
            mts_proxy: ProxyMode::from_keyword(scope.value("mts-proxy"))
                .unwrap_or(ProxyMode::Full),
            items: Vec::new(),
            layout: ClassLayout::default(),
        };
        let class_name = class.qualified_name();

        for child in scope.children_mut() {
            let index = class.items.len();
            let item = match child.kind() {
                ScopeKind::BaseClass => {
                    class.layout.base_classes.push(index);
                    ClassItem::BaseClass(self.base_class(child))
                }
                ScopeKind::Typedef => {
                    class.layout.typedefs.push(index);
                    ClassItem::Typedef(self.typedef(child))
                }
                ScopeKind::Member => {
                    class.layout.members.push(index);
                    ClassItem::Member(self.member(child, &class_name))
                }
                ScopeKind::Enum => {
                    class.layout.enums.push(index);
                    ClassItem::Enum(self.enumeration(child, &class_name))
                }
                ScopeKind::InlineHeader | ScopeKind::InlineCode => ClassItem::Inline(inline(child)),
                other => {
                    self.unexpected(child.line(), ScopeKind::Class, other);
                    continue;
                }
            };
            class.items.push(item);
        }
        class
    }

    fn base_class(&mut self, scope: &Scope) -> BaseClassDef {
        self.required(scope);
        BaseClassDef {
            line: scope.line(),
            type_name: scope.value("type").to_string(),
            visibility: Visibility::from_keyword(scope.value("visibility"))
                .unwrap_or(Visibility::Public),
            is_data: scope.flag("is-data"),
        }
    }

    fn typedef(&mut self, scope: &Scope) -> TypedefDef {
        self.required(scope);
        TypedefDef {
            line: scope.line(),
            name: scope.value("name").to_string(),
            type_name: scope.value("type").to_string(),
        }
    }

    fn member(&mut self, scope: &mut Scope, class_name: &str) -> MemberDef {
        self.required(scope);
        let line = scope.line();
        let name = scope.value("name").to_string();
        let type_name = scope.value("type").to_string();
        let visibility = Visibility::from_keyword(scope.value("visibility"))
            .unwrap_or(Visibility::Protected);

        let opening = type_name.matches('[').count();
        let closing = type_name.matches(']').count();
        if opening != closing {
            self.error(
                line,
                format!(
                    "member \"{}\": type \"{}\" has {} \"[\" but {} \"]\"",
                    name, type_name, opening, closing
                ),
            );
        }
        let is_c_array = opening > 0 && opening == closing;

        let explicit = scope
            .field("accessors")
            .map_or(false, |field| field.is_set() && !field.value().is_empty());
        if !explicit {
            let derived = if visibility == Visibility::Public {
                "none"
            } else {
                "all"
            };
            if let Err(message) = scope.set_value("accessors", derived, true) {
                self.error(line, message);
            }
        }
        let accessors = Accessors::from_keyword(scope.value("accessors")).unwrap_or(Accessors::None);

        if visibility == Visibility::Public && accessors != Accessors::None {
            self.error(
                line,
                format!(
                    "member \"{}\": accessors \"{}\" are redundant with visibility \"public\", use \"none\"",
                    name, accessors
                ),
            );
        }
        if is_c_array && accessors != Accessors::None {
            self.error(
                line,
                format!(
                    "member \"{}\": C array type \"{}\" only supports accessors \"none\", not \"{}\"",
                    name, type_name, accessors
                ),
            );
        }

        let storage_name = match visibility {
            Visibility::Public => name.clone(),
            Visibility::Protected | Visibility::Private => format!("m{}", name),
        };

        MemberDef {
            line,
            description: scope.value("description").to_string(),
            default: scope.value("default").to_string(),
            visibility,
            accessors,
            is_data: scope.flag("is-data"),
            is_size_t: scope.flag("is-size_t"),
            is_c_array,
            storage_name,
            class_name: class_name.to_string(),
            name,
            type_name,
        }
    }

    fn enumeration(&mut self, scope: &mut Scope, class_name: &str) -> EnumDef {
        self.required(scope);
        self.default_description(scope);
        let mut values = Vec::new();
        for child in scope.children_mut() {
            match child.kind() {
                ScopeKind::EnumValue => values.push(self.enum_value(child)),
                other => self.unexpected(child.line(), ScopeKind::Enum, other),
            }
        }
        EnumDef {
            line: scope.line(),
            name: scope.value("name").to_string(),
            description: scope.value("description").to_string(),
            human_readable: scope.flag("human-readable"),
            values,
            class_name: class_name.to_string(),
        }
    }

    fn enum_value(&mut self, scope: &mut Scope) -> EnumValueDef {
        self.required(scope);
        self.default_description(scope);
        EnumValueDef {
            line: scope.line(),
            name: scope.value("name").to_string(),
            description: scope.value("description").to_string(),
            value: scope.value("value").to_string(),
        }
    }

    /// An empty `description` takes the value of `name`.
    fn default_description(&mut self, scope: &mut Scope) {
        if scope.value("description").is_empty() {
            let name = scope.value("name").to_string();
            if let Err(message) = scope.set_value("description", &name, true) {
                self.error(scope.line(), message);
            }
        }
    }
}

fn inline(scope: &Scope) -> InlineDef {
    InlineDef {
        line: scope.line(),
        target: if scope.kind() == ScopeKind::InlineHeader {
            InlineTarget::Declaration
        } else {
            InlineTarget::Definition
        },
        code: scope.code().to_string(),
    }
}
