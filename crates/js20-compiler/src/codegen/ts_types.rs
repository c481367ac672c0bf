//! TypeScript type text from schema descriptions.
//!
//! Object descriptions are matched against the known interfaces: the largest
//! interface whose fields are all present is used by name, and this repeats
//! until none fits. Whatever is left becomes one inline literal.

use std::collections::HashSet;

use crate::ir::{contains_all, Compilation, FieldKind, SchemaNode};
use crate::resolve::ReferenceBuilder;

/// A `(name, type)` pair. Optional names carry a `?` suffix.
pub type FlatField = (String, String);

/// An interface flattened to the field pairs the optimizer compares against.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltInterface {
    pub name: String,
    pub properties: Vec<FlatField>,
}

/// Flattens every interface of the compilation, in declaration order.
/// Properties inherited through `extends` come first.
pub fn built_interfaces(compilation: &Compilation) -> Vec<BuiltInterface> {
    compilation
        .interfaces
        .iter()
        .map(|interface| BuiltInterface {
            name: interface.name.clone(),
            properties: flatten_properties(compilation, &interface.name, &mut HashSet::new()),
        })
        .collect()
}

fn flatten_properties(compilation: &Compilation, name: &str, visiting: &mut HashSet<String>) -> Vec<FlatField> {
    let Some(interface) = compilation.interface(name) else { return Vec::new() };
    if !visiting.insert(name.to_string()) {
        return Vec::new();
    }

    let mut properties: Vec<FlatField> = Vec::new();
    for parent in &interface.extends {
        for field in flatten_properties(compilation, parent, visiting) {
            push_field(&mut properties, field);
        }
    }
    for property in &interface.properties {
        let key = if property.optional { format!("{}?", property.name) } else { property.name.clone() };
        push_field(&mut properties, (key, property.type_text.clone()));
    }

    visiting.remove(name);
    properties
}

/// Adds a field, replacing an inherited one with the same base name.
fn push_field(properties: &mut Vec<FlatField>, field: FlatField) {
    let base = field.0.trim_end_matches('?').to_string();
    match properties.iter_mut().find(|(name, _)| name.trim_end_matches('?') == base) {
        Some(existing) => *existing = field,
        None => properties.push(field),
    }
}

/// Renders schema descriptions as TypeScript types.
pub struct TypeRenderer<'a> {
    compilation: &'a Compilation,
    interfaces: &'a [BuiltInterface],
}

impl<'a> TypeRenderer<'a> {
    pub fn new(compilation: &'a Compilation, interfaces: &'a [BuiltInterface]) -> Self {
        Self { compilation, interfaces }
    }

    /// Renders `schema`. Interfaces used to cover object fields are
    /// registered with `builder` so their declarations are emitted.
    pub fn render(&self, schema: &SchemaNode, builder: &mut ReferenceBuilder) -> String {
        match schema {
            SchemaNode::Field(field) => self.render_kind(&field.kind),
            SchemaNode::Optional(inner) => self.render(inner, builder),
            SchemaNode::Array(element) => {
                let element = self.render(element, builder);
                if is_compound(&element) {
                    format!("({})[]", element)
                } else {
                    format!("{}[]", element)
                }
            }
            SchemaNode::Object(fields) => {
                if fields.is_empty() {
                    return "Record<string, never>".to_string();
                }
                let flat: Vec<FlatField> = fields
                    .iter()
                    .map(|(name, node)| {
                        let key = if node.is_optional() { format!("{}?", name) } else { name.clone() };
                        (key, self.render(node, builder))
                    })
                    .collect();
                self.cover(flat, builder)
            }
        }
    }

    fn render_kind(&self, kind: &FieldKind) -> String {
        match kind {
            FieldKind::String => "string".to_string(),
            FieldKind::Boolean => "boolean".to_string(),
            FieldKind::Number { .. } => "number".to_string(),
            FieldKind::Date => "Date".to_string(),
            FieldKind::Any => "any".to_string(),
            FieldKind::Enum(content) => match self.compilation.enum_matching(content) {
                Some(declared) => declared.name.clone(),
                None => "unknown".to_string(),
            },
        }
    }

    /// Greedy covering of `fields` with known interfaces.
    fn cover(&self, fields: Vec<FlatField>, builder: &mut ReferenceBuilder) -> String {
        let mut remaining = fields;
        let mut used: Vec<&str> = Vec::new();

        while let Some(best) = self.best_cover(&remaining, &used) {
            remaining.retain(|field| !best.properties.contains(field));
            used.push(&best.name);
        }

        let mut parts: Vec<String> = used.iter().map(|name| name.to_string()).collect();
        if !remaining.is_empty() {
            parts.push(inline_literal(&remaining));
        }

        for name in &used {
            builder.add_interface(*name);
        }

        parts.join(" & ")
    }

    /// The interface with the most properties that fits in `remaining`.
    /// Ties go to the first interface declared.
    fn best_cover(&self, remaining: &[FlatField], used: &[&str]) -> Option<&'a BuiltInterface> {
        let mut best: Option<&'a BuiltInterface> = None;

        for candidate in self.interfaces {
            if candidate.properties.is_empty() || used.contains(&candidate.name.as_str()) {
                continue;
            }
            if !contains_all(remaining, &candidate.properties) {
                continue;
            }

            best = match best {
                None => Some(candidate),
                Some(current) if candidate.properties.len() > current.properties.len() => Some(candidate),
                keep => keep,
            };
        }

        best
    }
}

fn inline_literal(fields: &[FlatField]) -> String {
    let body: Vec<String> = fields
        .iter()
        .map(|(name, type_text)| format!("{}: {}", property_key(name), type_text))
        .collect();
    format!("{{ {} }}", body.join("; "))
}

/// Quotes property names that are not plain identifiers. A trailing `?`
/// stays outside the quotes.
pub fn property_key(name: &str) -> String {
    let (base, optional) = match name.strip_suffix('?') {
        Some(base) => (base, "?"),
        None => (name, ""),
    };
    if is_identifier(base) {
        format!("{}{}", base, optional)
    } else {
        format!("{}{}", crate::ir::quote_single(base), optional)
    }
}

pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// True for type text with a top-level `&` or `|`.
fn is_compound(type_text: &str) -> bool {
    let mut depth = 0i32;
    for c in type_text.chars() {
        match c {
            '{' | '(' | '[' | '<' => depth += 1,
            '}' | ')' | ']' | '>' => depth -= 1,
            '&' | '|' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

/// Capitalizes each space-separated word and joins them.
pub fn to_pascal_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Lowercases and joins words with dashes, as used in URL paths.
pub fn to_uri_case(s: &str) -> String {
    s.to_lowercase().replace(' ', "-")
}

/// English plural of the last word.
pub fn pluralize(word: &str) -> String {
    if word.ends_with('s') {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix('y') {
        let before = stem.chars().last();
        if before.is_some_and(|c| c.is_ascii_alphabetic() && !"aeiouAEIOU".contains(c)) {
            return format!("{}ies", stem);
        }
    }
    format!("{}s", word)
}
