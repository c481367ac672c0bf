//! TypeScript client generation from a [`Compilation`] and computed endpoints.
//!
//! The generated module has a fixed layout:
//! - a header comment
//! - `App`: enums, interfaces and one typed function per endpoint
//! - `Validation`: the `sXxx` helpers the functions validate with
//! - `Settings`: the base URL
//! - `HTTP`: `makeHttpRequest`
//!
//! Only the declarations the endpoints and models actually reach are emitted,
//! ordered so that every declaration follows the ones it references.

mod declarations;
mod endpoints;
mod format;
mod runtime;
mod sections;
mod ts_types;
mod validators;

pub use endpoints::{function_name, EmittedFunction};
pub use format::format;
pub use runtime::{CORE_INTERFACES, PRELUDE_TS};
pub use ts_types::{built_interfaces, pluralize, to_pascal_case, to_uri_case, BuiltInterface, TypeRenderer};

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::config::GenerateConfig;
use crate::diagnostic::CompilerError;
use crate::ir::{Compilation, ComputedEndpoint, ModelMap};
use crate::resolve::{discover, resolve, sort, ReferenceBuilder};

/// The generated module and what went into it.
#[derive(Debug, Clone)]
pub struct GeneratedClient {
    /// Formatted module text.
    pub code: String,
    pub functions: Vec<EmittedFunction>,
    /// Emitted interface names, in output order.
    pub interfaces: Vec<String>,
    /// Emitted enum names, in output order.
    pub enums: Vec<String>,
    /// Schema bindings reachable from the models and endpoints.
    pub schemas: Vec<String>,
}

/// Generates the client module.
pub fn generate_client(
    compilation: &Compilation,
    model_map: Option<&ModelMap>,
    endpoints: &[ComputedEndpoint],
    config: &GenerateConfig,
) -> Result<GeneratedClient, CompilerError> {
    let mut builder = ReferenceBuilder::with_interfaces(CORE_INTERFACES);

    if let Some(models) = model_map {
        register_models(compilation, models, &mut builder);
    }

    for endpoint in endpoints {
        for schema in [&endpoint.input_schema, &endpoint.output_schema].into_iter().flatten() {
            discover(schema, compilation, &mut builder);
        }
    }

    let interfaces = built_interfaces(compilation);
    let renderer = TypeRenderer::new(compilation, &interfaces);

    let mut functions = Vec::with_capacity(endpoints.len());
    let mut function_code = Vec::with_capacity(endpoints.len());
    let mut seen = HashSet::new();
    for endpoint in endpoints {
        let (code, emitted) = endpoints::render_endpoint(endpoint, compilation, &renderer, &mut builder);
        if !seen.insert(emitted.name.clone()) {
            warn!(name = %emitted.name, path = %endpoint.path, "duplicate client function name");
        }
        function_code.push(code);
        functions.push(emitted);
    }

    let resolved = sort(resolve(&builder.references(), compilation))?;
    debug!(
        interfaces = resolved.interfaces.len(),
        enums = resolved.enums.len(),
        schemas = resolved.schemas.len(),
        "resolved references"
    );

    let mut blocks: Vec<String> = Vec::new();
    for name in resolved.enum_names() {
        if let Some(declared) = compilation.enum_named(name) {
            blocks.push(declarations::render_enum(declared));
        }
    }
    for name in resolved.interface_names() {
        if let Some(interface) = compilation.interface(name) {
            blocks.push(declarations::render_interface(interface));
        }
    }
    blocks.extend(function_code);

    let content = [
        sections::header_comment(config),
        sections::section("App", &blocks.join("\n\n")),
        sections::section("Validation", runtime::VALIDATION),
        sections::section("Settings", &sections::settings(&config.base_url)),
        sections::section("HTTP", runtime::HTTP),
    ]
    .join("\n\n");

    let code = format(&content, &config.format)?;

    Ok(GeneratedClient {
        code,
        functions,
        interfaces: resolved.interface_names().map(str::to_string).collect(),
        enums: resolved.enum_names().map(str::to_string).collect(),
        schemas: resolved.schema_names().map(str::to_string).collect(),
    })
}

/// Registers the interface and schema binding of every model that has one.
fn register_models(compilation: &Compilation, models: &ModelMap, builder: &mut ReferenceBuilder) {
    for (key, interface_name) in models.iter() {
        match compilation.schema_for_interface(interface_name) {
            Some(schema) => {
                builder.add_interface(interface_name);
                builder.add_schema(&schema.name);
            }
            None => debug!(model = key, interface = interface_name, "model has no schema binding"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::typescript::parse_source;
    use crate::ir::{shared, EnumContent, FieldKind, HttpMethod, LiteralValue, SchemaNode};
    use crate::resolve::model_map;

    const SOURCE: &str = r#"
        export interface Model<T> { value: T; }
        export enum Fuel { Petrol = 'petrol', Electric = 'electric' }
        export interface Owner { name: string; }
        export interface Car { name: string; owner: Owner; }
        export interface Garage { address: string; }
        export interface Models { car: Model<Car>; garage: Model<Garage>; }
        export const sCar: Car = {} as any;
        export const sOwner: Owner = {} as any;
    "#;

    fn compile(source: &str) -> Compilation {
        let mut compilation = parse_source(source, "models.ts").unwrap();
        compilation.merge_missing(parse_source(PRELUDE_TS, "prelude.ts").unwrap());
        compilation
    }

    fn fuel() -> SchemaNode {
        SchemaNode::field(FieldKind::Enum(EnumContent(vec![
            ("Electric".to_string(), LiteralValue::String("electric".to_string())),
            ("Petrol".to_string(), LiteralValue::String("petrol".to_string())),
        ])))
    }

    #[test]
    fn test_sections_in_order() {
        let compilation = compile(SOURCE);
        let mut config = GenerateConfig::new("models.ts");
        config.base_url = "http://localhost:3000/".to_string();

        let client = generate_client(&compilation, None, &[], &config).unwrap();
        let code = &client.code;

        let positions: Vec<usize> = ["AUTO-GENERATED", "-- App --", "-- Validation --", "-- Settings --", "-- HTTP --"]
            .iter()
            .map(|needle| code.find(needle).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(code.contains("const baseUrl = 'http://localhost:3000';"));
        assert!(code.ends_with("}\n"));
    }

    #[test]
    fn test_core_interfaces_always_emitted() {
        let compilation = compile(SOURCE);
        let client = generate_client(&compilation, None, &[], &GenerateConfig::new("models.ts")).unwrap();

        for name in CORE_INTERFACES {
            assert!(client.interfaces.iter().any(|i| i == name));
            assert!(client.code.contains(&format!("export interface {} {{", name)));
        }
        assert!(!client.code.contains("interface Car"));
    }

    #[test]
    fn test_models_with_schema_are_emitted_with_dependencies() {
        let compilation = compile(SOURCE);
        let models = model_map(&compilation, "Models").unwrap();
        let client = generate_client(&compilation, Some(&models), &[], &GenerateConfig::new("models.ts")).unwrap();

        assert!(client.interfaces.iter().any(|i| i == "Car"));
        assert!(!client.interfaces.iter().any(|i| i == "Garage"));

        let owner = client.code.find("export interface Owner {").unwrap();
        let car = client.code.find("export interface Car {").unwrap();
        assert!(owner < car);
        assert!(client.schemas.contains(&"sCar".to_string()));
        assert!(client.schemas.contains(&"sOwner".to_string()));
    }

    #[test]
    fn test_endpoint_enums_are_emitted_before_interfaces() {
        let compilation = compile(SOURCE);
        let endpoint = ComputedEndpoint::new(HttpMethod::Get, "/fuel", false)
            .unwrap()
            .with_output(SchemaNode::Object(vec![("fuel".to_string(), fuel())]));

        let client =
            generate_client(&compilation, None, &[endpoint], &GenerateConfig::new("models.ts")).unwrap();

        assert_eq!(client.enums, vec!["Fuel"]);
        assert_eq!(client.functions[0].output_type.as_deref(), Some("{ fuel: Fuel }"));
        let declaration = client.code.find("export enum Fuel {\n    Petrol = 'petrol',").unwrap();
        let interface = client.code.find("export interface").unwrap();
        assert!(declaration < interface);
        assert!(client.code.contains("fuel: sEnum<Fuel>(output['fuel'], Object.values(Fuel))"));
    }

    #[test]
    fn test_covered_interfaces_are_registered() {
        let compilation = compile(SOURCE);
        let endpoint = ComputedEndpoint::new(HttpMethod::Get, "/garage", true)
            .unwrap()
            .with_output(SchemaNode::Object(vec![(
                "address".to_string(),
                SchemaNode::field(FieldKind::String),
            )]));

        let client =
            generate_client(&compilation, None, &[endpoint], &GenerateConfig::new("models.ts")).unwrap();

        assert_eq!(client.functions[0].output_type.as_deref(), Some("Garage"));
        assert!(client.code.contains("export interface Garage {\n    address: string;\n}"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let compilation = compile(SOURCE);
        let models = model_map(&compilation, "Models").unwrap();
        let endpoints = vec![
            ComputedEndpoint::new(HttpMethod::Delete, "/car/:id", true)
                .unwrap()
                .with_input(shared::id_input())
                .with_output(shared::message()),
        ];
        let config = GenerateConfig::new("models.ts");

        let first = generate_client(&compilation, Some(&models), &endpoints, &config).unwrap();
        let second = generate_client(&compilation, Some(&models), &endpoints, &config).unwrap();
        assert_eq!(first.code, second.code);
        assert!(first.code.contains("export const deleteCar = async (input: IdInput): Promise<Message> => {"));
    }
}
