//! # js20 Compiler
//!
//! Generates a typed TypeScript client module from a backend's own type
//! declarations and the list of endpoints it serves.
//!
//! ## Architecture
//!
//! ```text
//! Declaration sources (TS)        Manifest (JSON)
//!        │                               │
//!        ▼                               ▼
//! ┌──────────────┐               ┌──────────────┐
//! │   Frontend   │               │   Manifest   │  Config, models,
//! │ (TS → Comp.) │               │  (→ IR)      │  endpoints, CRUD
//! └──────┬───────┘               └──────┬───────┘
//!        │                              │
//!        ▼                              │
//! ┌──────────────┐                      │
//! │   Resolve    │  Model map,          │
//! │              │  reference closure   │
//! └──────┬───────┘                      │
//!        │                              │
//!        ▼                              ▼
//! ┌─────────────────────────────────────────┐
//! │                 Codegen                 │  Types, validation,
//! │        (Compilation + endpoints → TS)   │  client functions
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use js20_compiler::{Generator, Manifest};
//!
//! let manifest = Manifest::load("js20.json".as_ref())?;
//! let report = Generator::from_manifest(manifest).generate()?;
//! for function in &report.functions {
//!     println!("{}", function.name);
//! }
//! ```

pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod frontend;
pub mod ir;
pub mod manifest;
pub mod resolve;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use codegen::{EmittedFunction, GeneratedClient};
pub use config::{FormatOptions, GenerateConfig};
pub use diagnostic::CompilerError;
pub use manifest::Manifest;

use ir::{Compilation, ComputedEndpoint, ModelMap};

/// Runs the generation pipeline for one configuration and endpoint list.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GenerateConfig,
    endpoints: Vec<ComputedEndpoint>,
    language: String,
}

/// The parsed declarations a run works from.
#[derive(Debug, Clone)]
pub struct ParsedSources {
    pub compilation: Compilation,
    pub model_map: Option<ModelMap>,
}

/// Summary of a generation run.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub functions: Vec<EmittedFunction>,
    pub interfaces: Vec<String>,
    pub enums: Vec<String>,
    pub schemas: Vec<String>,
    /// Source files that were parsed.
    pub sources: Vec<PathBuf>,
    /// Output files that were written.
    pub written: Vec<PathBuf>,
}

impl Generator {
    pub fn new(config: GenerateConfig, endpoints: Vec<ComputedEndpoint>) -> Self {
        Self {
            config,
            endpoints,
            language: "typescript".to_string(),
        }
    }

    pub fn from_manifest(manifest: Manifest) -> Self {
        Self::new(manifest.config, manifest.endpoints)
    }

    pub fn config(&self) -> &GenerateConfig {
        &self.config
    }

    pub fn endpoints(&self) -> &[ComputedEndpoint] {
        &self.endpoints
    }

    /// Parses the entry file and the project files it imports, and builds
    /// the model map.
    #[tracing::instrument(skip(self), fields(entry = %self.config.entry_path.display()))]
    pub fn parse(&self) -> Result<ParsedSources, CompilerError> {
        let entry = &self.config.entry_path;
        if !entry.exists() {
            return Err(CompilerError::EntryNotFound { path: entry.clone() });
        }

        let mut frontend = frontend::create_frontend(&self.language)?;
        let compilation = frontend.parse_entry(entry)?;
        let model_map = resolve::model_map(&compilation, &self.config.models_name);

        debug!(
            files = compilation.files.len(),
            interfaces = compilation.interfaces.len(),
            enums = compilation.enums.len(),
            models = model_map.as_ref().map_or(0, ModelMap::len),
            "parsed declarations"
        );

        Ok(ParsedSources { compilation, model_map })
    }

    /// Generates the client module in memory.
    #[tracing::instrument(skip(self))]
    pub fn render(&self) -> Result<(GeneratedClient, Vec<PathBuf>), CompilerError> {
        let parsed = self.parse()?;
        let client = codegen::generate_client(
            &parsed.compilation,
            parsed.model_map.as_ref(),
            &self.endpoints,
            &self.config,
        )?;
        Ok((client, parsed.compilation.files))
    }

    /// Generates the client module and writes it to every output path.
    ///
    /// Nothing is written unless generation succeeds.
    #[tracing::instrument(skip(self))]
    pub fn generate(&self) -> Result<GenerateReport, CompilerError> {
        let (client, sources) = self.render()?;

        let mut written = Vec::with_capacity(self.config.outputs.len());
        for output in &self.config.outputs {
            write_output(output, &client.code)?;
            written.push(output.clone());
        }
        info!(outputs = written.len(), functions = client.functions.len(), "generated client");

        Ok(GenerateReport {
            functions: client.functions,
            interfaces: client.interfaces,
            enums: client.enums,
            schemas: client.schemas,
            sources,
            written,
        })
    }

    /// Regenerates in memory and returns the outputs whose contents differ
    /// from the generated module, missing ones included.
    #[tracing::instrument(skip(self))]
    pub fn stale_outputs(&self) -> Result<Vec<PathBuf>, CompilerError> {
        let (client, _) = self.render()?;

        let stale = self
            .config
            .outputs
            .iter()
            .filter(|output| match std::fs::read_to_string(output) {
                Ok(existing) => existing != client.code,
                Err(_) => true,
            })
            .cloned()
            .collect();
        Ok(stale)
    }
}

fn write_output(path: &Path, code: &str) -> Result<(), CompilerError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CompilerError::io(parent, e.to_string()))?;
    }
    std::fs::write(path, code).map_err(|e| CompilerError::io(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entry_fails_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = GenerateConfig::new(dir.path().join("missing.ts"));
        config.outputs = vec![dir.path().join("api.ts")];

        let err = Generator::new(config, Vec::new()).generate().unwrap_err();
        assert!(matches!(err, CompilerError::EntryNotFound { .. }));
        assert!(!dir.path().join("api.ts").exists());
    }

    #[test]
    fn test_writes_every_output() {
        let dir = tempfile::tempdir().unwrap();
        let entry = dir.path().join("models.ts");
        std::fs::write(&entry, "export interface Car { name: string; }").unwrap();

        let mut config = GenerateConfig::new(&entry);
        config.outputs = vec![dir.path().join("a/api.ts"), dir.path().join("b/nested/api.ts")];

        let generator = Generator::new(config, Vec::new());
        let report = generator.generate().unwrap();

        assert_eq!(report.written.len(), 2);
        let first = std::fs::read_to_string(dir.path().join("a/api.ts")).unwrap();
        let second = std::fs::read_to_string(dir.path().join("b/nested/api.ts")).unwrap();
        assert_eq!(first, second);
        assert!(generator.stale_outputs().unwrap().is_empty());

        std::fs::write(dir.path().join("a/api.ts"), "// edited\n").unwrap();
        assert_eq!(generator.stale_outputs().unwrap(), vec![dir.path().join("a/api.ts")]);
    }
}
