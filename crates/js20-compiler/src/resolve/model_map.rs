//! Flattening of the root `Models` declaration into a model map.

use std::collections::HashSet;

use tracing::debug;

use crate::ir::{Compilation, ModelMap};

/// Builds the model map from the interface or intersection alias named
/// `models_name`. Returns `None` when neither exists.
pub fn model_map(compilation: &Compilation, models_name: &str) -> Option<ModelMap> {
    if let Some(interface) = compilation.interface(models_name) {
        let mut map = ModelMap::new();
        for reference in &interface.model_references {
            map.insert(&reference.property_name, &reference.model_name);
        }
        return Some(map);
    }

    if compilation.type_alias(models_name).is_some() {
        let mut map = ModelMap::new();
        let mut visited = HashSet::new();
        collect_alias(compilation, models_name, &mut map, &mut visited);
        return Some(map);
    }

    debug!(models_name, "no models declaration found");
    None
}

fn collect_alias<'a>(compilation: &'a Compilation, name: &'a str, map: &mut ModelMap, visited: &mut HashSet<&'a str>) {
    if !visited.insert(name) {
        return;
    }
    let Some(alias) = compilation.type_alias(name) else { return };

    for child in &alias.children {
        if let Some(interface) = compilation.interface(child) {
            for reference in &interface.model_references {
                map.insert(&reference.property_name, &reference.model_name);
            }
        } else if compilation.type_alias(child).is_some() {
            collect_alias(compilation, child, map, visited);
        }
    }
}
