//! Validation code for endpoint inputs and outputs.
//!
//! Every field is passed through the matching helper of the `Validation`
//! section, so a value that does not have the declared shape throws before
//! it reaches the caller.

use crate::ir::{Compilation, FieldKind, FieldSchema, SchemaNode};
use super::ts_types::property_key;

/// Renders `const {parameter}Validated: {type_text} = ...;`.
pub fn validation_block(compilation: &Compilation, schema: &SchemaNode, parameter: &str, type_text: &str) -> String {
    let expression = match schema {
        // Top-level objects are validated field by field, without a wrapper.
        SchemaNode::Object(fields) => object_literal(compilation, fields, parameter, 0),
        other => validation_expression(compilation, other, parameter, 0, false),
    };
    format!("const {}Validated: {} = {};", parameter, type_text, expression)
}

/// The validation expression for `schema` applied to `accessor`.
///
/// `depth` picks the lambda parameter name for nested objects and arrays.
pub fn validation_expression(
    compilation: &Compilation,
    schema: &SchemaNode,
    accessor: &str,
    depth: usize,
    optional: bool,
) -> String {
    match schema {
        SchemaNode::Field(field) => field_expression(compilation, field, accessor, optional || field.is_optional),
        SchemaNode::Optional(inner) => validation_expression(compilation, inner, accessor, depth, true),
        SchemaNode::Object(fields) => {
            let item = lambda_parameter(depth);
            let helper = if optional { "sObjectOptional" } else { "sObject" };
            if fields.is_empty() {
                return format!("{}({}, () => ({{}}))", helper, accessor);
            }
            format!(
                "{}({}, ({}: any) => ({}))",
                helper,
                accessor,
                item,
                object_literal(compilation, fields, &item, depth + 1)
            )
        }
        SchemaNode::Array(element) => {
            let item = lambda_parameter(depth);
            let (helper, map) = if optional { ("sArrayOptional", "?.map") } else { ("sArray", ".map") };
            format!(
                "{}({}){}(({}: any) => {})",
                helper,
                accessor,
                map,
                item,
                validation_expression(compilation, element, &item, depth + 1, false)
            )
        }
    }
}

fn object_literal(compilation: &Compilation, fields: &[(String, SchemaNode)], parameter: &str, depth: usize) -> String {
    if fields.is_empty() {
        return "{}".to_string();
    }

    let lines: Vec<String> = fields
        .iter()
        .map(|(name, node)| {
            let accessor = format!("{}[{}]", parameter, crate::ir::quote_single(name));
            format!(
                "{}: {}",
                property_key(name),
                validation_expression(compilation, node, &accessor, depth, false)
            )
        })
        .collect();

    format!("{{\n{}\n}}", lines.join(",\n"))
}

fn field_expression(compilation: &Compilation, field: &FieldSchema, accessor: &str, optional: bool) -> String {
    let suffix = if optional { "Optional" } else { "" };

    match &field.kind {
        FieldKind::String => format!("sString{}({})", suffix, accessor),
        FieldKind::Boolean => format!("sBoolean{}({})", suffix, accessor),
        FieldKind::Date => format!("sDate{}({})", suffix, accessor),
        FieldKind::Number { decimals: true } => format!("sNumber{}({})", suffix, accessor),
        FieldKind::Number { decimals: false } => format!("sInteger{}({})", suffix, accessor),
        FieldKind::Any => accessor.to_string(),
        FieldKind::Enum(content) => match compilation.enum_matching(content) {
            Some(declared) => format!(
                "sEnum{}<{}>({}, Object.values({}))",
                suffix, declared.name, accessor, declared.name
            ),
            None => {
                let allowed: Vec<String> = content.values().map(|value| value.to_ts()).collect();
                format!("sEnum{}({}, [{}])", suffix, accessor, allowed.join(", "))
            }
        },
    }
}

/// `item`, `item1`, `item2`, ... by nesting depth.
fn lambda_parameter(depth: usize) -> String {
    if depth == 0 {
        "item".to_string()
    } else {
        format!("item{}", depth)
    }
}
