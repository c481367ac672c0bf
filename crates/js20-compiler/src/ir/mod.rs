//! Language-agnostic intermediate representation.
//!
//! The frontend produces a [`Compilation`] from the backend's declaration
//! files. Code generators consume it together with the list of
//! [`ComputedEndpoint`]s to synthesize the client module.

mod compare;
mod endpoint;
mod schema;

pub use compare::{contains_all, records_equal};
pub use endpoint::{validate_path, ComputedEndpoint, HttpMethod};
pub use schema::{
    format_number, quote_single, shared, EnumContent, FieldKind, FieldSchema, LiteralValue, SchemaNode,
};

use std::path::PathBuf;

use crate::diagnostic::Span;

/// A property of a declared interface.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    pub name: String,
    pub optional: bool,
    /// The annotation as written, with whitespace compacted.
    pub type_text: String,
}

/// A property whose type is `Model<T>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReference {
    pub property_name: String,
    pub model_name: String,
}

/// A property whose type mentions another named type.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceReference {
    pub property_name: String,
    pub interface_name: String,
}

/// A top-level `interface` declaration.
#[derive(Debug, Clone)]
pub struct DeclaredInterface {
    pub name: String,
    /// `<T, U>` for generic interfaces.
    pub type_parameters: Option<String>,
    pub properties: Vec<PropertyDef>,
    pub model_references: Vec<ModelReference>,
    pub interface_references: Vec<InterfaceReference>,
    /// Names from the `extends` clause.
    pub extends: Vec<String>,
    /// The `extends` entries as written, type arguments included.
    pub heritage: Vec<String>,
    pub span: Span,
}

impl DeclaredInterface {
    /// Names this interface depends on, without duplicates.
    pub fn referenced_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let candidates = self
            .extends
            .iter()
            .map(String::as_str)
            .chain(self.interface_references.iter().map(|r| r.interface_name.as_str()));
        for name in candidates {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// A top-level `enum` declaration.
#[derive(Debug, Clone)]
pub struct DeclaredEnum {
    pub name: String,
    pub content: EnumContent,
    pub span: Span,
}

/// A `type X = A & B` alias. Other alias bodies have no children.
#[derive(Debug, Clone)]
pub struct TypeAlias {
    pub name: String,
    pub children: Vec<String>,
    pub span: Span,
}

/// A `const sXxx: Xxx = ...` value whose annotation names an interface.
#[derive(Debug, Clone)]
pub struct SchemaBinding {
    pub name: String,
    pub interface_name: String,
    pub span: Span,
}

/// Everything the frontend extracted from the declaration sources.
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    pub interfaces: Vec<DeclaredInterface>,
    pub enums: Vec<DeclaredEnum>,
    pub type_aliases: Vec<TypeAlias>,
    pub schemas: Vec<SchemaBinding>,
    /// Files that were parsed, in visit order.
    pub files: Vec<PathBuf>,
}

impl Compilation {
    pub fn interface(&self, name: &str) -> Option<&DeclaredInterface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    pub fn enum_named(&self, name: &str) -> Option<&DeclaredEnum> {
        self.enums.iter().find(|e| e.name == name)
    }

    pub fn type_alias(&self, name: &str) -> Option<&TypeAlias> {
        self.type_aliases.iter().find(|a| a.name == name)
    }

    pub fn schema(&self, name: &str) -> Option<&SchemaBinding> {
        self.schemas.iter().find(|s| s.name == name)
    }

    /// The first schema binding annotated with the given interface.
    pub fn schema_for_interface(&self, interface_name: &str) -> Option<&SchemaBinding> {
        self.schemas.iter().find(|s| s.interface_name == interface_name)
    }

    /// The first enum whose content is structurally equal to `content`.
    pub fn enum_matching(&self, content: &EnumContent) -> Option<&DeclaredEnum> {
        self.enums.iter().find(|e| e.content.structurally_equals(content))
    }

    /// Adds the declarations of `other` whose names are not declared yet.
    pub fn merge_missing(&mut self, other: Compilation) {
        for interface in other.interfaces {
            if self.interface(&interface.name).is_none() {
                self.interfaces.push(interface);
            }
        }
        for declared in other.enums {
            if self.enum_named(&declared.name).is_none() {
                self.enums.push(declared);
            }
        }
        for alias in other.type_aliases {
            if self.type_alias(&alias.name).is_none() {
                self.type_aliases.push(alias);
            }
        }
        for schema in other.schemas {
            if self.schema(&schema.name).is_none() {
                self.schemas.push(schema);
            }
        }
    }
}

/// Model key to interface name, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelMap {
    entries: Vec<(String, String)>,
}

impl ModelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a mapping. A repeated key keeps its position and takes the new
    /// interface name.
    pub fn insert(&mut self, key: impl Into<String>, interface_name: impl Into<String>) {
        let key = key.into();
        let interface_name = interface_name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = interface_name,
            None => self.entries.push((key, interface_name)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, name)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What kind of declaration a resolved name is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Interface,
    Enum,
    Schema,
}

/// A named reference from one resolved declaration to another.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub name: String,
    pub kind: ReferenceKind,
}

/// A resolved declaration with its outgoing references.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedItem {
    pub name: String,
    pub references: Vec<Reference>,
}
