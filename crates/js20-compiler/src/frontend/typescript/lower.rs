//! Lowering of parsed TypeScript files into a [`Compilation`].

use tracing::warn;

use crate::ir::{
    Compilation, DeclaredEnum, DeclaredInterface, EnumContent, InterfaceReference, LiteralValue, ModelReference,
    PropertyDef, SchemaBinding, TypeAlias,
};
use super::ast::{EnumDecl, EnumInitializer, InterfaceDecl, ParsedFile, TypeNode};

/// Builds a compilation from files in visit order.
pub fn lower(files: &[ParsedFile]) -> Compilation {
    let mut compilation = Compilation::default();

    for file in files {
        compilation.files.push(file.path.clone());

        for interface in &file.interfaces {
            compilation.interfaces.push(lower_interface(interface));
        }

        for declared in &file.enums {
            compilation.enums.push(lower_enum(declared));
        }

        for alias in &file.type_aliases {
            let children = match &alias.type_node {
                TypeNode::Intersection(members) => members
                    .iter()
                    .filter_map(|member| match member {
                        TypeNode::Reference { name, .. } => Some(name.clone()),
                        _ => None,
                    })
                    .collect(),
                _ => Vec::new(),
            };
            compilation.type_aliases.push(TypeAlias {
                name: alias.name.clone(),
                children,
                span: alias.span.clone(),
            });
        }

        for binding in &file.bindings {
            if !is_schema_name(&binding.name) {
                continue;
            }
            if let Some(TypeNode::Reference { name, .. }) = &binding.annotation {
                compilation.schemas.push(SchemaBinding {
                    name: binding.name.clone(),
                    interface_name: name.clone(),
                    span: binding.span.clone(),
                });
            }
        }
    }

    compilation
}

/// Schema bindings are named `s` followed by an uppercase letter.
fn is_schema_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('s') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}

fn lower_interface(interface: &InterfaceDecl) -> DeclaredInterface {
    let mut properties = Vec::with_capacity(interface.members.len());
    let mut model_references = Vec::new();
    let mut interface_references = Vec::new();

    for member in &interface.members {
        properties.push(PropertyDef {
            name: member.name.clone(),
            optional: member.optional,
            type_text: member.type_text.clone(),
        });

        if let Some(model_name) = member.type_node.model_target() {
            model_references.push(ModelReference {
                property_name: member.name.clone(),
                model_name: model_name.to_string(),
            });
        }

        let mut names = Vec::new();
        member.type_node.collect_references(&mut names);
        for name in names {
            interface_references.push(InterfaceReference {
                property_name: member.name.clone(),
                interface_name: name,
            });
        }
    }

    DeclaredInterface {
        name: interface.name.clone(),
        type_parameters: interface.type_parameters.clone(),
        properties,
        model_references,
        interface_references,
        extends: interface.extends.clone(),
        heritage: interface.heritage.clone(),
        span: interface.span.clone(),
    }
}

fn lower_enum(declared: &EnumDecl) -> DeclaredEnum {
    let mut members = Vec::with_capacity(declared.members.len());
    let mut next_number: Option<f64> = Some(0.0);

    for member in &declared.members {
        let value = match &member.initializer {
            Some(EnumInitializer::String(s)) => {
                next_number = None;
                LiteralValue::String(s.clone())
            }
            Some(EnumInitializer::Number(n)) => {
                next_number = Some(n + 1.0);
                LiteralValue::Number(*n)
            }
            Some(EnumInitializer::Expression(raw)) => {
                next_number = None;
                LiteralValue::Expression(raw.clone())
            }
            None => match next_number {
                Some(n) => {
                    next_number = Some(n + 1.0);
                    LiteralValue::Number(n)
                }
                None => {
                    warn!(
                        location = %declared.span,
                        member = %member.name,
                        "enum member needs an initializer after a non-numeric member, skipping it"
                    );
                    continue;
                }
            },
        };
        members.push((member.name.clone(), value));
    }

    DeclaredEnum {
        name: declared.name.clone(),
        content: EnumContent(members),
        span: declared.span.clone(),
    }
}
