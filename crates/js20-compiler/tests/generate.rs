//! End-to-end generation tests against TypeScript sources on disk.

use std::path::{Path, PathBuf};

use js20_compiler::ir::{shared, ComputedEndpoint, FieldKind, HttpMethod, SchemaNode};
use js20_compiler::manifest::{with_id_partial, with_instance};
use js20_compiler::{CompilerError, GenerateConfig, Generator, Manifest};
use tempfile::TempDir;

const MODELS: &str = r#"
import { Instance } from '@js20/core';
import { Fuel } from './enums';

export interface Model<T> {
    value: T;
}

export interface Car {
    name: string;
    year: number;
}

export interface PartialCar {
    name?: string;
    year?: number;
}

export interface CarInstance extends Car, Instance {}

export interface Engine {
    fuel: Fuel;
    horsepower: number;
}

export interface Models {
    car: Model<Car>;
}

export const sCar: Car = {
    name: sString().type(),
    year: sNumber().type(),
};
"#;

const ENUMS: &str = r#"
export enum Fuel {
    Petrol = 'petrol',
    Electric = 'electric',
}
"#;

fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("models.ts"), MODELS).unwrap();
    std::fs::write(dir.path().join("enums.ts"), ENUMS).unwrap();
    dir
}

fn config(dir: &Path) -> GenerateConfig {
    let mut config = GenerateConfig::new(dir.join("models.ts"));
    config.outputs = vec![dir.join("out/api.ts")];
    config.base_url = "https://api.example.com/".to_string();
    config.app_name = Some("cars".to_string());
    config
}

fn car() -> SchemaNode {
    SchemaNode::Object(vec![
        ("name".to_string(), SchemaNode::field(FieldKind::String)),
        ("year".to_string(), SchemaNode::field(FieldKind::Number { decimals: false })),
    ])
}

fn endpoints() -> Vec<ComputedEndpoint> {
    vec![
        ComputedEndpoint::new(HttpMethod::Get, "/cars", true)
            .unwrap()
            .with_output(SchemaNode::Array(Box::new(car()))),
        ComputedEndpoint::new(HttpMethod::Put, "/cars/:id", true)
            .unwrap()
            .with_input(with_id_partial(&car()))
            .with_output(with_instance(&car())),
        ComputedEndpoint::new(HttpMethod::Delete, "/cars/:id", true)
            .unwrap()
            .with_input(shared::id_input())
            .with_output(shared::message()),
    ]
}

fn read(path: PathBuf) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn test_generated_functions() {
    let dir = project();
    let report = Generator::new(config(dir.path()), endpoints()).generate().unwrap();
    let code = read(dir.path().join("out/api.ts"));

    assert!(code.contains("export const getCars = async (): Promise<Car[]> => {"));
    assert!(code.contains("export const updateCars = async (input: PartialCar & IdInput): Promise<CarInstance> => {"));
    assert!(code.contains("export const deleteCars = async (input: IdInput): Promise<Message> => {"));

    let get_cars = &report.functions[0];
    assert_eq!(get_cars.name, "getCars");
    assert_eq!(get_cars.input_type, None);
    assert_eq!(get_cars.output_type.as_deref(), Some("Car[]"));

    let get_cars_body = &code[code.find("export const getCars").unwrap()..code.find("export const updateCars").unwrap()];
    assert!(!get_cars_body.contains("inputValidated"));
    assert!(get_cars_body.contains("shouldPassToken: true\n"));
}

#[test]
fn test_function_name_override() {
    let dir = project();
    let mut endpoints = endpoints();
    endpoints[1] = endpoints[1].clone().with_function_name("saveCar");

    let report = Generator::new(config(dir.path()), endpoints).generate().unwrap();

    assert_eq!(report.functions[1].name, "saveCar");
    assert!(read(dir.path().join("out/api.ts")).contains("export const saveCar = async (input: PartialCar & IdInput)"));
}

#[test]
fn test_declarations_are_ordered_and_complete() {
    let dir = project();
    let report = Generator::new(config(dir.path()), endpoints()).generate().unwrap();
    let code = read(dir.path().join("out/api.ts"));

    for name in ["Car", "PartialCar", "CarInstance", "Instance", "IdInput", "Message"] {
        let declaration = format!("export interface {} ", name);
        assert_eq!(code.matches(&declaration).count(), 1, "{name} should be declared once");
    }
    assert!(!code.contains("export interface Engine"));

    let car = code.find("export interface Car {").unwrap();
    let instance = code.find("export interface Instance {").unwrap();
    let car_instance = code.find("export interface CarInstance extends Car, Instance {").unwrap();
    assert!(car < car_instance);
    assert!(instance < car_instance);

    assert!(report.schemas.contains(&"sCar".to_string()));
    assert_eq!(report.sources.len(), 2);
}

#[test]
fn test_enum_from_imported_file() {
    let dir = project();
    let engine = ComputedEndpoint::new(HttpMethod::Get, "/engine", false).unwrap().with_output(SchemaNode::Object(vec![
        (
            "fuel".to_string(),
            SchemaNode::field(FieldKind::Enum(js20_compiler::ir::EnumContent(vec![
                ("Petrol".to_string(), js20_compiler::ir::LiteralValue::String("petrol".to_string())),
                ("Electric".to_string(), js20_compiler::ir::LiteralValue::String("electric".to_string())),
            ]))),
        ),
        ("horsepower".to_string(), SchemaNode::field(FieldKind::Number { decimals: false })),
    ]));

    let report = Generator::new(config(dir.path()), vec![engine]).generate().unwrap();
    let code = read(dir.path().join("out/api.ts"));

    assert_eq!(report.functions[0].output_type.as_deref(), Some("Engine"));
    assert_eq!(report.enums, vec!["Fuel"]);
    assert!(code.contains("export enum Fuel {\n    Petrol = 'petrol',\n    Electric = 'electric'\n}"));
    assert!(code.find("export enum Fuel").unwrap() < code.find("export interface Engine").unwrap());
}

#[test]
fn test_header_and_sections() {
    let dir = project();
    Generator::new(config(dir.path()), endpoints()).generate().unwrap();
    let code = read(dir.path().join("out/api.ts"));

    assert!(code.starts_with("/**\n * AUTO-GENERATED FILE. DO NOT MODIFY.\n *\n * App Name: cars\n */\n"));
    assert!(code.contains("const baseUrl = 'https://api.example.com';"));

    let app = code.find("// ------------------ App ------------------").unwrap();
    let validation = code.find("// ------------------ Validation ------------------").unwrap();
    let settings = code.find("// ------------------ Settings ------------------").unwrap();
    let http = code.find("// ------------------ HTTP ------------------").unwrap();
    assert!(app < validation && validation < settings && settings < http);
}

#[test]
fn test_generation_is_deterministic() {
    let dir = project();
    let generator = Generator::new(config(dir.path()), endpoints());

    let (first, _) = generator.render().unwrap();
    let (second, _) = generator.render().unwrap();
    assert_eq!(first.code, second.code);
}

#[test]
fn test_nothing_written_on_error() {
    let dir = project();
    let mut config = config(dir.path());
    config.entry_path = dir.path().join("nope.ts");

    let err = Generator::new(config, endpoints()).generate().unwrap_err();
    assert!(matches!(err, CompilerError::EntryNotFound { .. }));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_cycle_in_declarations_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("models.ts"),
        "export interface Model<T> { value: T; }\n\
         export interface A { b: B; }\n\
         export interface B { a: A; }\n\
         export interface Models { a: Model<A>; }\n\
         export const sA: A = {} as any;\n",
    )
    .unwrap();

    let err = Generator::new(config(dir.path()), Vec::new()).generate().unwrap_err();
    assert!(matches!(err, CompilerError::CircularReference { .. }));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_manifest_with_crud() {
    let dir = project();
    let manifest_path = dir.path().join("js20.json");
    std::fs::write(
        &manifest_path,
        r#"{
            "entryPath": "models.ts",
            "outputs": ["web/api.ts"],
            "baseUrl": "http://localhost:3000",
            "models": {
                "car": {
                    "name": "Car",
                    "schema": {
                        "name": { "isSchemaField": true, "type": "string" },
                        "year": { "isSchemaField": true, "type": "number" }
                    }
                }
            },
            "crud": [{ "model": "Car" }]
        }"#,
    )
    .unwrap();

    let manifest = Manifest::load(&manifest_path).unwrap();
    let report = Generator::from_manifest(manifest).generate().unwrap();

    let names: Vec<&str> = report.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["getCars", "getCar", "createCar", "updateCar", "deleteCar"]);

    let code = read(dir.path().join("web/api.ts"));
    assert!(code.contains("export const getCars = async (): Promise<CarInstance[]> => {"));
    assert!(code.contains("export const createCar = async (input: Car): Promise<CarInstance> => {"));
    assert!(code.contains("path: '/car/:id',"));
}

#[test]
fn test_generic_interface_keeps_type_parameters() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("models.ts"),
        "export interface Model<T> { value: T; }\n\
         export interface Page<T> { items: T[]; total: number; }\n\
         export interface Car { page: Page<string>; }\n\
         export interface Models { car: Model<Car>; }\n\
         export const sCar: Car = {} as any;\n",
    )
    .unwrap();

    Generator::new(config(dir.path()), Vec::new()).generate().unwrap();
    let code = read(dir.path().join("out/api.ts"));

    assert!(code.contains("export interface Page<T> {\n    items: T[];\n    total: number;\n}"));
    assert!(code.contains("export interface Car {\n    page: Page<string>;\n}"));
    assert!(code.find("export interface Page<T>").unwrap() < code.find("export interface Car {").unwrap());
}
