//! The JSON generation manifest.
//!
//! A manifest carries the generator configuration next to everything the
//! generator needs to know about the backend's API:
//!
//! ```json
//! {
//!   "entryPath": "src/models.ts",
//!   "outputs": ["../web/src/api.ts"],
//!   "baseUrl": "http://localhost:3000",
//!   "models": { "car": { "name": "Car", "schema": { "name": { "isSchemaField": true, "type": "string" } } } },
//!   "endpoints": [{ "method": "GET", "path": "/health", "outputSchema": { ... } }],
//!   "crud": [{ "model": "Car", "types": ["list", "get"] }]
//! }
//! ```
//!
//! Schemas are parsed and validated when the manifest is loaded, so a bad
//! schema or method fails before any source is read.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::codegen::to_uri_case;
use crate::config::GenerateConfig;
use crate::diagnostic::CompilerError;
use crate::ir::{shared, ComputedEndpoint, HttpMethod, SchemaNode};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifest {
    #[serde(flatten)]
    config: GenerateConfig,
    #[serde(default)]
    models: serde_json::Map<String, Value>,
    #[serde(default)]
    endpoints: Vec<RawEndpoint>,
    #[serde(default)]
    crud: Vec<RawCrud>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEndpoint {
    method: String,
    path: String,
    #[serde(default, alias = "requiresAuth")]
    is_logged_in: bool,
    #[serde(default)]
    input_schema: Option<Value>,
    #[serde(default)]
    output_schema: Option<Value>,
    #[serde(default)]
    function_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawModel {
    name: String,
    schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCrud {
    model: String,
    #[serde(default = "CrudType::all")]
    types: Vec<CrudType>,
    #[serde(default = "default_logged_in")]
    is_logged_in: bool,
}

fn default_logged_in() -> bool {
    true
}

/// One of the endpoints a CRUD entry expands into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudType {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl CrudType {
    pub fn all() -> Vec<CrudType> {
        vec![CrudType::List, CrudType::Get, CrudType::Create, CrudType::Update, CrudType::Delete]
    }
}

/// A model registered with the backend: its display name and field schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDef {
    pub key: String,
    pub name: String,
    pub schema: SchemaNode,
}

/// A loaded manifest with every endpoint computed, CRUD ones included.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub config: GenerateConfig,
    pub models: Vec<ModelDef>,
    pub endpoints: Vec<ComputedEndpoint>,
    /// The manifest file, when loaded from disk.
    pub path: Option<PathBuf>,
}

impl Manifest {
    /// Loads a manifest file. Relative paths inside it resolve against the
    /// directory containing the manifest.
    pub fn load(path: &Path) -> Result<Manifest, CompilerError> {
        let text = std::fs::read_to_string(path).map_err(|e| CompilerError::io(path, e.to_string()))?;
        let mut manifest = Self::parse(&text, path)?;

        let base = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        manifest.config.resolve_paths(base);
        manifest.path = Some(path.to_path_buf());

        debug!(
            path = %path.display(),
            endpoints = manifest.endpoints.len(),
            models = manifest.models.len(),
            "loaded manifest"
        );
        Ok(manifest)
    }

    /// Parses manifest text. `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Manifest, CompilerError> {
        let raw: RawManifest = serde_json::from_str(text).map_err(|e| CompilerError::InvalidManifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut models = Vec::with_capacity(raw.models.len());
        for (key, value) in raw.models {
            let model: RawModel = serde_json::from_value(value).map_err(|e| CompilerError::InvalidManifest {
                path: path.to_path_buf(),
                message: format!("models.{}: {}", key, e),
            })?;
            let schema = SchemaNode::from_json(&model.schema, &format!("models.{}.schema", key))?;
            models.push(ModelDef { key, name: model.name, schema });
        }

        let mut endpoints = Vec::with_capacity(raw.endpoints.len());
        for (index, endpoint) in raw.endpoints.into_iter().enumerate() {
            endpoints.push(compute_endpoint(endpoint, index)?);
        }

        for entry in &raw.crud {
            let model = models
                .iter()
                .find(|m| m.name == entry.model)
                .or_else(|| models.iter().find(|m| m.key == entry.model))
                .ok_or_else(|| CompilerError::UnknownModel { model: entry.model.clone() })?;
            for crud_type in &entry.types {
                endpoints.push(crud_endpoint(*crud_type, model, entry.is_logged_in)?);
            }
        }

        Ok(Manifest {
            config: raw.config,
            models,
            endpoints,
            path: None,
        })
    }
}

fn compute_endpoint(raw: RawEndpoint, index: usize) -> Result<ComputedEndpoint, CompilerError> {
    let method = HttpMethod::parse(&raw.method, &raw.path)?;
    let mut endpoint = ComputedEndpoint::new(method, raw.path, raw.is_logged_in)?;

    if let Some(value) = &raw.input_schema {
        endpoint = endpoint.with_input(SchemaNode::from_json(value, &format!("endpoints[{}].inputSchema", index))?);
    }
    if let Some(value) = &raw.output_schema {
        endpoint = endpoint.with_output(SchemaNode::from_json(value, &format!("endpoints[{}].outputSchema", index))?);
    }
    if let Some(name) = raw.function_name {
        endpoint = endpoint.with_function_name(name);
    }

    Ok(endpoint)
}

/// The schema with the shared instance fields added.
pub fn with_instance(schema: &SchemaNode) -> SchemaNode {
    schema.merged(&shared::instance())
}

/// Every field of the schema made optional, plus a required `id`.
pub fn with_id_partial(schema: &SchemaNode) -> SchemaNode {
    schema.partial().merged(&shared::id_input())
}

/// Expands one CRUD type of a model into its endpoint.
pub fn crud_endpoint(crud_type: CrudType, model: &ModelDef, is_logged_in: bool) -> Result<ComputedEndpoint, CompilerError> {
    let base = format!("/{}", to_uri_case(&model.name));
    let by_id = format!("{}/:id", base);
    let instance = with_instance(&model.schema);

    let endpoint = match crud_type {
        CrudType::List => ComputedEndpoint::new(HttpMethod::Get, base, is_logged_in)?
            .with_output(SchemaNode::Array(Box::new(instance))),
        CrudType::Get => ComputedEndpoint::new(HttpMethod::Get, by_id, is_logged_in)?
            .with_input(shared::id_input())
            .with_output(instance),
        CrudType::Create => ComputedEndpoint::new(HttpMethod::Post, base, is_logged_in)?
            .with_input(model.schema.clone())
            .with_output(instance),
        CrudType::Update => ComputedEndpoint::new(HttpMethod::Put, by_id, is_logged_in)?
            .with_input(with_id_partial(&model.schema))
            .with_output(instance),
        CrudType::Delete => ComputedEndpoint::new(HttpMethod::Delete, by_id, is_logged_in)?
            .with_input(shared::id_input())
            .with_output(instance),
    };

    Ok(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::FieldKind;

    const MANIFEST: &str = r#"{
        "entryPath": "src/models.ts",
        "outputs": ["out/api.ts"],
        "baseUrl": "http://localhost:3000/",
        "models": {
            "car": {
                "name": "Car",
                "schema": {
                    "name": { "isSchemaField": true, "type": "string" },
                    "year": { "isSchemaField": true, "type": "number" }
                }
            }
        },
        "endpoints": [
            {
                "method": "get",
                "path": "/health",
                "outputSchema": { "message": { "isSchemaField": true, "type": "string" } }
            },
            {
                "method": "POST",
                "path": "/login",
                "requiresAuth": false,
                "inputSchema": { "email": { "isSchemaField": true, "type": "string" } },
                "functionName": "login"
            }
        ],
        "crud": [{ "model": "Car", "types": ["list", "update"] }]
    }"#;

    fn parse(text: &str) -> Result<Manifest, CompilerError> {
        Manifest::parse(text, Path::new("js20.json"))
    }

    #[test]
    fn test_parse_manifest() {
        let manifest = parse(MANIFEST).unwrap();

        assert_eq!(manifest.config.entry_path, PathBuf::from("src/models.ts"));
        assert_eq!(manifest.models.len(), 1);
        assert_eq!(manifest.endpoints.len(), 4);

        let health = &manifest.endpoints[0];
        assert_eq!(health.method, HttpMethod::Get);
        assert!(!health.requires_auth);
        assert!(health.input_schema.is_none());

        assert_eq!(manifest.endpoints[1].function_name.as_deref(), Some("login"));
    }

    #[test]
    fn test_crud_expansion() {
        let manifest = parse(MANIFEST).unwrap();

        let list = &manifest.endpoints[2];
        assert_eq!(list.method, HttpMethod::Get);
        assert_eq!(list.path, "/car");
        assert!(list.requires_auth);
        let Some(SchemaNode::Array(element)) = &list.output_schema else { panic!("expected array output") };
        let SchemaNode::Object(fields) = element.as_ref() else { panic!("expected object element") };
        let names: Vec<&str> = fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["name", "year", "id", "createdAt", "updatedAt", "ownerId"]);

        let update = &manifest.endpoints[3];
        assert_eq!(update.method, HttpMethod::Put);
        assert_eq!(update.path, "/car/:id");
        let Some(SchemaNode::Object(fields)) = &update.input_schema else { panic!("expected object input") };
        assert!(fields[0].1.is_optional());
        assert!(fields[1].1.is_optional());
        assert_eq!(fields[2].0, "id");
        assert!(!fields[2].1.is_optional());
    }

    #[test]
    fn test_crud_uri_casing() {
        let model = ModelDef {
            key: "carPart".to_string(),
            name: "Car Part".to_string(),
            schema: SchemaNode::Object(vec![("name".to_string(), SchemaNode::field(FieldKind::String))]),
        };

        let endpoint = crud_endpoint(CrudType::Delete, &model, true).unwrap();
        assert_eq!(endpoint.path, "/car-part/:id");
        assert_eq!(endpoint.input_schema, Some(shared::id_input()));
    }

    #[test]
    fn test_unknown_crud_model() {
        let err = parse(r#"{ "entryPath": "m.ts", "crud": [{ "model": "Boat" }] }"#).unwrap_err();
        assert!(matches!(err, CompilerError::UnknownModel { ref model } if model == "Boat"));
    }

    #[test]
    fn test_fatal_manifest_errors() {
        let method = parse(r#"{ "entryPath": "m.ts", "endpoints": [{ "method": "PATCH", "path": "/a" }] }"#);
        assert!(matches!(method, Err(CompilerError::UnknownMethod { .. })));

        let path = parse(r#"{ "entryPath": "m.ts", "endpoints": [{ "method": "GET", "path": "/a/" }] }"#);
        assert!(matches!(path, Err(CompilerError::MalformedPath { .. })));

        let schema = parse(
            r#"{ "entryPath": "m.ts", "endpoints": [{ "method": "GET", "path": "/a", "outputSchema": { "x": { "isSchemaField": true, "type": "bigint" } } }] }"#,
        );
        assert!(matches!(schema, Err(CompilerError::UnsupportedSchema { ref location, .. }) if location == "endpoints[0].outputSchema.x"));

        let json = parse("{ not json");
        assert!(matches!(json, Err(CompilerError::InvalidManifest { .. })));

        let missing_entry = parse(r#"{ "outputs": [] }"#);
        assert!(matches!(missing_entry, Err(CompilerError::InvalidManifest { .. })));
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("js20.json");
        std::fs::write(&path, r#"{ "entryPath": "src/models.ts", "outputs": ["out/api.ts"] }"#).unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.config.entry_path, dir.path().join("src/models.ts"));
        assert_eq!(manifest.config.outputs, vec![dir.path().join("out/api.ts")]);
        assert_eq!(manifest.path.as_deref(), Some(path.as_path()));
    }
}
