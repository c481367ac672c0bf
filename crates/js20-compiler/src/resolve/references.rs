//! Expansion of requested names into their closure, and dependency sorting.

use std::collections::HashMap;

use tracing::debug;

use crate::diagnostic::CompilerError;
use crate::ir::{Compilation, Reference, ReferenceKind, ResolvedItem};
use super::builder::References;
use super::order::order;

/// The closure of a [`References`] snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedReferences {
    pub interfaces: Vec<ResolvedItem>,
    pub enums: Vec<ResolvedItem>,
    pub schemas: Vec<ResolvedItem>,
}

impl ResolvedReferences {
    pub fn interface_names(&self) -> impl Iterator<Item = &str> {
        self.interfaces.iter().map(|item| item.name.as_str())
    }

    pub fn enum_names(&self) -> impl Iterator<Item = &str> {
        self.enums.iter().map(|item| item.name.as_str())
    }

    pub fn schema_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(|item| item.name.as_str())
    }
}

/// Expands requested interfaces and schemas into everything they reference.
///
/// Names that are not declared in the compilation are dropped. Enums used by
/// a resolved interface's properties are appended after the requested enums.
pub fn resolve(requested: &References, compilation: &Compilation) -> ResolvedReferences {
    let interfaces = resolve_interfaces(&requested.interfaces, compilation);
    let schemas = resolve_schemas(&requested.schemas, compilation);

    let mut enum_names: Vec<String> = requested
        .enums
        .iter()
        .filter(|name| compilation.enum_named(name).is_some())
        .cloned()
        .collect();

    for item in &interfaces {
        let Some(interface) = compilation.interface(&item.name) else { continue };
        for name in interface.referenced_names() {
            if compilation.enum_named(name).is_some() && !enum_names.iter().any(|e| e == name) {
                enum_names.push(name.to_string());
            }
        }
    }

    let enums = enum_names
        .into_iter()
        .map(|name| ResolvedItem { name, references: Vec::new() })
        .collect();

    ResolvedReferences { interfaces, enums, schemas }
}

fn resolve_interfaces(requested: &[String], compilation: &Compilation) -> Vec<ResolvedItem> {
    let mut result: Vec<ResolvedItem> = Vec::new();
    let mut pending: Vec<String> = requested.to_vec();
    pending.reverse();

    while let Some(name) = pending.pop() {
        if result.iter().any(|item| item.name == name) {
            continue;
        }

        let Some(interface) = compilation.interface(&name) else {
            debug!(name = %name, "requested interface is not declared, skipping");
            continue;
        };

        let references: Vec<Reference> = interface
            .referenced_names()
            .into_iter()
            .filter(|target| compilation.interface(target).is_some())
            .map(|target| Reference { name: target.to_string(), kind: ReferenceKind::Interface })
            .collect();

        // Depth first, in declaration order.
        for reference in references.iter().rev() {
            pending.push(reference.name.clone());
        }

        result.push(ResolvedItem { name, references });
    }

    result
}

fn resolve_schemas(requested: &[String], compilation: &Compilation) -> Vec<ResolvedItem> {
    let mut result: Vec<ResolvedItem> = Vec::new();
    let mut pending: Vec<String> = requested.to_vec();
    pending.reverse();

    while let Some(name) = pending.pop() {
        if result.iter().any(|item| item.name == name) {
            continue;
        }

        let Some(binding) = compilation.schema(&name) else {
            debug!(name = %name, "requested schema is not declared, skipping");
            continue;
        };
        let Some(interface) = compilation.interface(&binding.interface_name) else {
            debug!(name = %name, interface = %binding.interface_name, "schema interface is not declared, skipping");
            continue;
        };

        let mut references: Vec<Reference> = Vec::new();
        for target in interface.referenced_names() {
            if let Some(schema) = compilation.schema_for_interface(target) {
                if !references.iter().any(|r| r.name == schema.name) {
                    references.push(Reference { name: schema.name.clone(), kind: ReferenceKind::Schema });
                }
            }
        }

        for reference in references.iter().rev() {
            pending.push(reference.name.clone());
        }

        result.push(ResolvedItem { name, references });
    }

    result
}

/// Sorts resolved interfaces and schemas so that referenced declarations
/// come before the declarations referencing them. Enums keep their order.
pub fn sort(resolved: ResolvedReferences) -> Result<ResolvedReferences, CompilerError> {
    Ok(ResolvedReferences {
        interfaces: sort_items(resolved.interfaces)?,
        enums: resolved.enums,
        schemas: sort_items(resolved.schemas)?,
    })
}

fn sort_items(items: Vec<ResolvedItem>) -> Result<Vec<ResolvedItem>, CompilerError> {
    let graph: HashMap<String, Vec<String>> = items
        .iter()
        .map(|item| {
            let targets = item.references.iter().map(|r| r.name.clone()).collect();
            (item.name.clone(), targets)
        })
        .collect();
    let seeds: Vec<String> = items.iter().map(|item| item.name.clone()).collect();

    let mut ordered = order(&seeds, &graph)?;
    ordered.reverse();

    let mut by_name: HashMap<String, ResolvedItem> =
        items.into_iter().map(|item| (item.name.clone(), item)).collect();

    Ok(ordered.into_iter().filter_map(|name| by_name.remove(&name)).collect())
}
