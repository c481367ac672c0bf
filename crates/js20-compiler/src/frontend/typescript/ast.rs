//! TypeScript-specific AST types.

use std::path::PathBuf;
use crate::diagnostic::Span;

/// Generic wrappers and global types that never name a user declaration.
const BUILTIN_TYPES: &[&str] = &[
    "Array", "ReadonlyArray", "Date", "Record", "Partial", "Required", "Readonly", "Pick", "Omit",
    "Promise", "Map", "Set",
];

/// A parsed TypeScript file.
#[derive(Debug)]
pub struct ParsedFile {
    pub path: PathBuf,
    /// Module specifiers of `import ... from` and `export ... from` statements.
    pub module_refs: Vec<ModuleRef>,
    pub interfaces: Vec<InterfaceDecl>,
    pub enums: Vec<EnumDecl>,
    pub type_aliases: Vec<TypeAliasDecl>,
    pub bindings: Vec<BindingDecl>,
}

/// A module specifier found in an import or re-export.
#[derive(Debug, Clone)]
pub struct ModuleRef {
    pub source: String,
    pub span: Span,
}

impl ModuleRef {
    /// Relative specifiers point at files of the same project.
    pub fn is_relative(&self) -> bool {
        self.source.starts_with("./") || self.source.starts_with("../")
    }
}

/// An interface declaration.
#[derive(Debug, Clone)]
pub struct InterfaceDecl {
    pub name: String,
    /// Type parameter list including the angle brackets, e.g. `<T>`.
    pub type_parameters: Option<String>,
    pub extends: Vec<String>,
    /// Source text of each `extends` entry, type arguments included.
    pub heritage: Vec<String>,
    pub members: Vec<MemberDecl>,
    pub exported: bool,
    pub span: Span,
}

/// A property signature of an interface or object type.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDecl {
    pub name: String,
    pub optional: bool,
    pub type_node: TypeNode,
    /// Source text of the annotation with whitespace compacted.
    pub type_text: String,
}

/// An enum declaration.
#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub name: String,
    pub members: Vec<EnumMemberDecl>,
    pub is_const: bool,
    pub exported: bool,
    pub span: Span,
}

/// An enum member and its initializer, if any.
#[derive(Debug, Clone)]
pub struct EnumMemberDecl {
    pub name: String,
    pub initializer: Option<EnumInitializer>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnumInitializer {
    String(String),
    Number(f64),
    Expression(String),
}

/// A type alias declaration.
#[derive(Debug, Clone)]
pub struct TypeAliasDecl {
    pub name: String,
    pub type_node: TypeNode,
    pub exported: bool,
    pub span: Span,
}

/// A top-level `const`/`let`/`var` declarator.
#[derive(Debug, Clone)]
pub struct BindingDecl {
    pub name: String,
    pub annotation: Option<TypeNode>,
    pub span: Span,
}

/// Type AST nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    /// string, number, boolean, etc.
    Primitive(String),

    /// A named type with optional type arguments, e.g. `Car` or `Model<Car>`.
    Reference { name: String, args: Vec<TypeNode> },

    /// T[]
    Array(Box<TypeNode>),

    /// T | U
    Union(Vec<TypeNode>),

    /// T & U
    Intersection(Vec<TypeNode>),

    /// { field: T }
    ObjectLiteral(Vec<MemberDecl>),

    /// 'text', 42, true
    Literal(String),

    /// Anything else, kept as source text.
    Other(String),
}

impl TypeNode {
    /// The model name when this is `Model<T>`.
    pub fn model_target(&self) -> Option<&str> {
        match self {
            TypeNode::Reference { name, args } if name == "Model" => match args.first() {
                Some(TypeNode::Reference { name, .. }) => Some(name),
                _ => None,
            },
            _ => None,
        }
    }

    /// Collects the names of user types this node mentions. `Model<T>` and
    /// builtin generics are looked through but not reported.
    pub fn collect_references(&self, out: &mut Vec<String>) {
        match self {
            TypeNode::Reference { name, args } => {
                if name == "Model" {
                    return;
                }
                if !BUILTIN_TYPES.contains(&name.as_str()) && !out.contains(name) {
                    out.push(name.clone());
                }
                for arg in args {
                    arg.collect_references(out);
                }
            }
            TypeNode::Array(inner) => inner.collect_references(out),
            TypeNode::Union(members) | TypeNode::Intersection(members) => {
                for member in members {
                    member.collect_references(out);
                }
            }
            TypeNode::ObjectLiteral(members) => {
                for member in members {
                    member.type_node.collect_references(out);
                }
            }
            TypeNode::Primitive(_) | TypeNode::Literal(_) | TypeNode::Other(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(name: &str, args: Vec<TypeNode>) -> TypeNode {
        TypeNode::Reference { name: name.to_string(), args }
    }

    #[test]
    fn test_model_target() {
        let node = reference("Model", vec![reference("Car", vec![])]);
        assert_eq!(node.model_target(), Some("Car"));
        assert_eq!(reference("Car", vec![]).model_target(), None);
    }

    #[test]
    fn test_object_literals_compare_by_members() {
        let member = |optional| MemberDecl {
            name: "owner".to_string(),
            optional,
            type_node: reference("Person", vec![]),
            type_text: "Person".to_string(),
        };

        assert_eq!(TypeNode::ObjectLiteral(vec![member(false)]), TypeNode::ObjectLiteral(vec![member(false)]));
        assert_ne!(TypeNode::ObjectLiteral(vec![member(false)]), TypeNode::ObjectLiteral(vec![member(true)]));
    }

    #[test]
    fn test_collect_references_skips_builtins_and_models() {
        let node = TypeNode::Union(vec![
            TypeNode::Array(Box::new(reference("Wheel", vec![]))),
            reference("Array", vec![reference("Person", vec![])]),
            reference("Model", vec![reference("Garage", vec![])]),
            reference("Date", vec![]),
            TypeNode::Primitive("null".to_string()),
        ]);

        let mut names = Vec::new();
        node.collect_references(&mut names);
        assert_eq!(names, vec!["Wheel", "Person"]);
    }
}
