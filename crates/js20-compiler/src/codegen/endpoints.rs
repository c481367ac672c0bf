//! One typed client function per endpoint.

use crate::ir::{quote_single, Compilation, ComputedEndpoint, SchemaNode};
use crate::resolve::ReferenceBuilder;
use super::ts_types::{pluralize, to_pascal_case, TypeRenderer};
use super::validators::validation_block;

/// A generated client function, as reported to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedFunction {
    pub name: String,
    pub input_type: Option<String>,
    /// `None` when the function resolves to `void`.
    pub output_type: Option<String>,
    pub method: String,
    pub path: String,
}

/// Derives the client function name of an endpoint.
///
/// `GET /cars` with an array output becomes `getCars`, `PUT /cars/:id`
/// becomes `updateCars`, and `/` becomes `Root`. An explicit function name
/// is used verbatim.
pub fn function_name(endpoint: &ComputedEndpoint) -> String {
    if let Some(name) = endpoint.function_name.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }

    let prefix = endpoint.method.function_prefix();
    let Some(segment) = endpoint.literal_segments().last() else {
        return format!("{}Root", prefix);
    };

    let words = segment.replace('-', " ");
    let is_array_output = matches!(endpoint.output_schema, Some(SchemaNode::Array(_)));
    let words = if is_array_output { pluralize(&words) } else { words };

    format!("{}{}", prefix, to_pascal_case(&words))
}

/// Schemas that produce a typed parameter or return value.
fn meaningful(schema: Option<&SchemaNode>) -> Option<&SchemaNode> {
    schema.filter(|s| !s.is_empty_object())
}

/// Renders the function for `endpoint`, registering every interface its
/// types use.
pub fn render_endpoint(
    endpoint: &ComputedEndpoint,
    compilation: &Compilation,
    renderer: &TypeRenderer<'_>,
    builder: &mut ReferenceBuilder,
) -> (String, EmittedFunction) {
    let name = function_name(endpoint);
    let input = meaningful(endpoint.input_schema.as_ref());
    let output = meaningful(endpoint.output_schema.as_ref());

    let input_type = input.map(|schema| renderer.render(schema, builder));
    let output_type = output.map(|schema| renderer.render(schema, builder));

    let parameter = match &input_type {
        Some(t) => format!("input: {}", t),
        None => String::new(),
    };
    let returns = match &output_type {
        Some(t) => format!("Promise<{}>", t),
        None => "Promise<void>".to_string(),
    };

    let mut code = format!("export const {} = async ({}): {} => {{\n", name, parameter, returns);

    if let (Some(schema), Some(t)) = (input, &input_type) {
        code.push_str(&validation_block(compilation, schema, "input", t));
        code.push('\n');
    }

    let mut request = vec![
        format!("method: {}", quote_single(endpoint.method.as_str())),
        format!("path: {}", quote_single(&endpoint.path)),
        format!("shouldPassToken: {}", endpoint.requires_auth),
    ];
    if input.is_some() {
        request.push("input: inputValidated".to_string());
    }
    let call = format!("await makeHttpRequest({{\n{}\n}});", request.join(",\n"));

    match (output, &output_type) {
        (Some(schema), Some(t)) => {
            code.push_str(&format!("const output = {}\n", call));
            code.push_str(&validation_block(compilation, schema, "output", t));
            code.push_str("\n\nreturn outputValidated;\n");
        }
        _ => {
            code.push_str(&call);
            code.push('\n');
        }
    }
    code.push_str("};");

    let emitted = EmittedFunction {
        name,
        input_type,
        output_type,
        method: endpoint.method.as_str().to_string(),
        path: endpoint.path.clone(),
    };

    (code, emitted)
}
