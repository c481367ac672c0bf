//! TypeScript frontend for the js20 compiler.

pub mod ast;
pub mod lower;
pub mod parser;

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::codegen::PRELUDE_TS;
use crate::diagnostic::CompilerError;
use crate::ir::Compilation;
use super::Frontend;
use parser::TypeScriptParser;

/// TypeScript frontend implementation.
pub struct TypeScriptFrontend {
    parser: TypeScriptParser,
}

impl TypeScriptFrontend {
    /// Creates a new TypeScript frontend.
    pub fn new() -> Result<Self, CompilerError> {
        Ok(Self {
            parser: TypeScriptParser::new()?,
        })
    }

    /// Parses the embedded shared declarations (`Instance`, `IdInput`,
    /// `Message` and their schemas).
    fn parse_prelude(&mut self) -> Result<Compilation, CompilerError> {
        let parsed = self.parser.parse(PRELUDE_TS, Path::new("<js20 prelude>"))?;
        let mut prelude = lower::lower(&[parsed]);
        prelude.files.clear();
        Ok(prelude)
    }
}

impl Frontend for TypeScriptFrontend {
    fn language(&self) -> &str {
        "typescript"
    }

    fn extensions(&self) -> &[&str] {
        &["ts", "tsx"]
    }

    fn parse_entry(&mut self, entry: &Path) -> Result<Compilation, CompilerError> {
        if !entry.is_file() {
            return Err(CompilerError::EntryNotFound { path: entry.to_path_buf() });
        }

        let mut parsed_files = Vec::new();
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut queue: VecDeque<PathBuf> = VecDeque::new();

        let entry = normalize(entry);
        seen.insert(entry.clone());
        queue.push_back(entry);

        // Breadth first: the entry, then the files it imports in order.
        while let Some(path) = queue.pop_front() {
            let source = std::fs::read_to_string(&path).map_err(|e| CompilerError::io(&path, e.to_string()))?;
            let parsed = self.parser.parse(&source, &path)?;
            debug!(
                path = %path.display(),
                interfaces = parsed.interfaces.len(),
                enums = parsed.enums.len(),
                "parsed source file"
            );

            let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            for module in parsed.module_refs.iter().filter(|m| m.is_relative()) {
                match resolve_module(&dir, &module.source) {
                    Some(target) => {
                        if seen.insert(target.clone()) {
                            queue.push_back(target);
                        }
                    }
                    None => warn!(location = %module.span, module = %module.source, "could not resolve relative import"),
                }
            }

            parsed_files.push(parsed);
        }

        let mut compilation = lower::lower(&parsed_files);
        compilation.merge_missing(self.parse_prelude()?);
        Ok(compilation)
    }
}

/// Parses a single in-memory source into a compilation, without following
/// imports or adding the shared prelude.
pub fn parse_source(source: &str, path: impl AsRef<Path>) -> Result<Compilation, CompilerError> {
    let mut parser = TypeScriptParser::new()?;
    let parsed = parser.parse(source, path.as_ref())?;
    Ok(lower::lower(&[parsed]))
}

/// Resolves a relative module specifier the way TypeScript does for
/// project files: exact file, added extensions, then a directory index.
fn resolve_module(dir: &Path, specifier: &str) -> Option<PathBuf> {
    let base = dir.join(specifier);
    let mut candidates = Vec::new();

    let has_ts_extension = [".ts", ".tsx"].iter().any(|ext| specifier.ends_with(ext));
    if has_ts_extension {
        candidates.push(base.clone());
    }
    for js_ext in [".js", ".mjs", ".jsx"] {
        if let Some(stem) = specifier.strip_suffix(js_ext) {
            let stem = dir.join(stem);
            candidates.push(with_suffix(&stem, ".ts"));
            candidates.push(with_suffix(&stem, ".tsx"));
        }
    }
    candidates.push(with_suffix(&base, ".ts"));
    candidates.push(with_suffix(&base, ".tsx"));
    candidates.push(with_suffix(&base, ".d.ts"));
    candidates.push(base.join("index.ts"));

    candidates.into_iter().find(|c| c.is_file()).map(|c| normalize(&c))
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}

fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
