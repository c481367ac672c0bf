//! Generator configuration.
//!
//! Read from the `config` part of a generation manifest (camelCase keys) or
//! built directly by library callers.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for one client generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateConfig {
    /// TypeScript file declaring the models, enums and schemas.
    pub entry_path: PathBuf,

    /// Every path the generated module is written to.
    #[serde(default)]
    pub outputs: Vec<PathBuf>,

    /// Base URL the HTTP helper prefixes paths with.
    #[serde(default)]
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Free text added to the header comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Name of the root models declaration.
    #[serde(default = "default_models_name")]
    pub models_name: String,

    #[serde(default, alias = "formatOptions")]
    pub format: FormatOptions,

    /// Suppress the function listing after generation.
    #[serde(default)]
    pub quiet: bool,
}

fn default_models_name() -> String {
    "Models".to_string()
}

impl GenerateConfig {
    pub fn new(entry_path: impl Into<PathBuf>) -> Self {
        Self {
            entry_path: entry_path.into(),
            outputs: Vec::new(),
            base_url: String::new(),
            app_name: None,
            version: None,
            comment: None,
            models_name: default_models_name(),
            format: FormatOptions::default(),
            quiet: false,
        }
    }

    /// Resolves relative entry and output paths against `base`.
    pub fn resolve_paths(&mut self, base: &std::path::Path) {
        if self.entry_path.is_relative() {
            self.entry_path = base.join(&self.entry_path);
        }
        for output in &mut self.outputs {
            if output.is_relative() {
                *output = base.join(&*output);
            }
        }
    }
}

/// Options for the output formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatOptions {
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,
    #[serde(default)]
    pub use_tabs: bool,
}

fn default_tab_width() -> usize {
    4
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            tab_width: default_tab_width(),
            use_tabs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config: GenerateConfig = serde_json::from_str(r#"{ "entryPath": "src/models.ts" }"#).unwrap();

        assert_eq!(config.entry_path, PathBuf::from("src/models.ts"));
        assert_eq!(config.models_name, "Models");
        assert_eq!(config.format, FormatOptions { tab_width: 4, use_tabs: false });
        assert!(config.outputs.is_empty());
        assert!(!config.quiet);
    }

    #[test]
    fn test_full_json() {
        let config: GenerateConfig = serde_json::from_str(
            r#"{
                "entryPath": "models.ts",
                "outputs": ["../web/src/api.ts"],
                "baseUrl": "https://api.example.com/",
                "appName": "cars",
                "version": "1.2.0",
                "modelsName": "AppModels",
                "format": { "tabWidth": 2 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.app_name.as_deref(), Some("cars"));
        assert_eq!(config.models_name, "AppModels");
        assert_eq!(config.format.tab_width, 2);
        assert!(!config.format.use_tabs);
    }

    #[test]
    fn test_resolve_paths() {
        let mut config = GenerateConfig::new("models.ts");
        config.outputs = vec![PathBuf::from("out/api.ts"), PathBuf::from("/abs/api.ts")];
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.entry_path, PathBuf::from("/project/models.ts"));
        assert_eq!(config.outputs[0], PathBuf::from("/project/out/api.ts"));
        assert_eq!(config.outputs[1], PathBuf::from("/abs/api.ts"));
    }
}
