//! Compiler error types.
#![allow(unused_assignments)]

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur during client generation.
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum CompilerError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Failed to access file '{}': {message}", path.display())]
    #[diagnostic(code(js20::io::access_failed))]
    IoError {
        path: PathBuf,
        message: String,
    },

    #[error("Entry path \"{}\" does not exist.", path.display())]
    #[diagnostic(
        code(js20::io::entry_not_found),
        help("Point `entryPath` at the TypeScript file that declares your models and schemas")
    )]
    EntryNotFound {
        path: PathBuf,
    },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("Failed to initialize parser")]
    #[diagnostic(code(js20::parse::init_failed))]
    ParserInitFailed,

    #[error("Failed to parse file: {}", path.display())]
    #[diagnostic(code(js20::parse::parse_failed))]
    ParseFailed {
        path: PathBuf,
    },

    // =========================================================================
    // Manifest Errors
    // =========================================================================
    #[error("Invalid generate manifest '{}': {message}", path.display())]
    #[diagnostic(code(js20::manifest::invalid))]
    InvalidManifest {
        path: PathBuf,
        message: String,
    },

    #[error("Unknown method \"{method}\" on endpoint '{path}'")]
    #[diagnostic(
        code(js20::manifest::unknown_method),
        help("Supported methods are GET, POST, PUT and DELETE")
    )]
    UnknownMethod {
        method: String,
        path: String,
    },

    #[error("Malformed endpoint path '{path}': {reason}")]
    #[diagnostic(
        code(js20::manifest::malformed_path),
        help("Paths start with '/' and have no trailing slash, e.g. /cars/:id")
    )]
    MalformedPath {
        path: String,
        reason: String,
    },

    #[error("Model \"{model}\" is not declared in the manifest's models")]
    #[diagnostic(code(js20::manifest::unknown_model))]
    UnknownModel {
        model: String,
    },

    // =========================================================================
    // Schema Errors
    // =========================================================================
    #[error("Unsupported schema at '{location}': {message}")]
    #[diagnostic(
        code(js20::schema::unsupported),
        help("Schema fields are objects with \"isSchemaField\": true and a type of string, boolean, number, date, enum, any or optionalObject")
    )]
    UnsupportedSchema {
        location: String,
        message: String,
    },

    // =========================================================================
    // Reference Graph Errors
    // =========================================================================
    #[error("Exceeded {limit} iterations. Possible circular dependencies in the references.")]
    #[diagnostic(code(js20::references::iteration_limit))]
    ReferenceLimitExceeded {
        limit: usize,
    },

    #[error("Circular reference detected: {}", cycle.join(" -> "))]
    #[diagnostic(
        code(js20::references::circular),
        help("Break the cycle by making one of the properties reference an id instead of the full type")
    )]
    CircularReference {
        cycle: Vec<String>,
    },

    // =========================================================================
    // Code Generation Errors
    // =========================================================================
    #[error("Failed to format generated code: {message}")]
    #[diagnostic(code(js20::codegen::format_failed))]
    FormatFailed {
        message: String,
    },

    // =========================================================================
    // Frontend Errors
    // =========================================================================
    #[error("Unsupported language: {language}")]
    #[diagnostic(code(js20::frontend::unsupported_language))]
    UnsupportedLanguage {
        language: String,
    },
}

impl CompilerError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an unsupported-schema error at the given location.
    pub fn schema(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnsupportedSchema {
            location: location.into(),
            message: message.into(),
        }
    }
}
