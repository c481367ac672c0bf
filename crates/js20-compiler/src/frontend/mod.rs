//! Language frontends for parsing declaration sources into a [`Compilation`].
//!
//! A frontend starts at an entry file, follows the project files it depends
//! on, and extracts the interfaces, enums, type aliases and schema bindings
//! the client generator works from.

pub mod typescript;

use std::path::Path;
use crate::diagnostic::CompilerError;
use crate::ir::Compilation;

/// Trait for language frontends.
pub trait Frontend {
    /// Returns the language name (e.g., "typescript").
    fn language(&self) -> &str;

    /// Returns file extensions this frontend handles (e.g., ["ts", "tsx"]).
    fn extensions(&self) -> &[&str];

    /// Parses the entry file and every project file it imports.
    fn parse_entry(&mut self, entry: &Path) -> Result<Compilation, CompilerError>;
}

/// Creates a frontend for the given language.
pub fn create_frontend(language: &str) -> Result<Box<dyn Frontend>, CompilerError> {
    match language {
        "typescript" | "ts" => Ok(Box::new(typescript::TypeScriptFrontend::new()?)),
        _ => Err(CompilerError::UnsupportedLanguage {
            language: language.to_string(),
        }),
    }
}
