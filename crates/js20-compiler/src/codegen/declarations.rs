//! Emitted enum and interface declarations.
//!
//! Declarations are written fresh from the parsed model, always exported,
//! regardless of how they were declared in the source.

use crate::ir::{DeclaredEnum, DeclaredInterface};
use super::ts_types::{is_identifier, property_key};

/// Renders `export enum Name { ... }`.
pub fn render_enum(declared: &DeclaredEnum) -> String {
    let mut output = format!("export enum {} {{\n", declared.name);

    let members: Vec<String> = declared
        .content
        .0
        .iter()
        .map(|(name, value)| {
            let key = if is_identifier(name) { name.clone() } else { crate::ir::quote_single(name) };
            format!("{} = {}", key, value.to_ts())
        })
        .collect();

    if !members.is_empty() {
        output.push_str(&members.join(",\n"));
        output.push('\n');
    }
    output.push('}');
    output
}

/// Renders `export interface Name extends ... { ... }`.
pub fn render_interface(interface: &DeclaredInterface) -> String {
    let mut output = format!(
        "export interface {}{}",
        interface.name,
        interface.type_parameters.as_deref().unwrap_or("")
    );
    if !interface.heritage.is_empty() {
        output.push_str(&format!(" extends {}", interface.heritage.join(", ")));
    }
    output.push_str(" {\n");

    for property in &interface.properties {
        let name = if property.optional { format!("{}?", property.name) } else { property.name.clone() };
        output.push_str(&format!("{}: {};\n", property_key(&name), property.type_text));
    }

    output.push('}');
    output
}
