//! js20 CLI.
//!
//! Generates the typed frontend client of a js20 backend from its
//! declaration sources and generation manifest.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use js20_compiler::ir::Compilation;
use js20_compiler::{GenerateConfig, GenerateReport, Generator, Manifest};

mod ui;

#[derive(Parser)]
#[command(name = "js20")]
#[command(about = "js20 client generator - typed TypeScript clients from backend declarations")]
#[command(version)]
struct Cli {
    /// Log pipeline steps (same as JS20_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the client and write it to every output
    Generate {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Fail when any output differs from a fresh generation
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the declarations and model map parsed from the entry file
    Inspect {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Regenerate whenever the sources or the manifest change
    Watch {
        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Where the generation input comes from. Flags override the manifest.
#[derive(Args, Debug, Clone)]
struct SourceArgs {
    /// Generation manifest
    #[arg(short, long, default_value = "js20.json")]
    manifest: PathBuf,

    /// Entry declaration file
    #[arg(short, long)]
    entry: Option<PathBuf>,

    /// Output file (repeatable)
    #[arg(short, long = "out")]
    outputs: Vec<PathBuf>,

    /// Base URL of the API
    #[arg(long)]
    base_url: Option<String>,

    /// Name of the root models declaration
    #[arg(long)]
    models_name: Option<String>,

    /// Do not list the generated functions
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate { source } => generate(&source).await,
        Commands::Check { source } => check(&source).await,
        Commands::Inspect { source } => inspect(&source),
        Commands::Watch { source } => watch(&source).await,
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("JS20_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Loads the manifest (when present) and applies flag overrides.
fn load_manifest(source: &SourceArgs) -> miette::Result<Manifest> {
    let mut manifest = if source.manifest.is_file() {
        Manifest::load(&source.manifest)?
    } else if let Some(entry) = &source.entry {
        Manifest {
            config: GenerateConfig::new(entry),
            models: Vec::new(),
            endpoints: Vec::new(),
            path: None,
        }
    } else {
        return Err(miette::miette!(
            help = "Pass --manifest <file>, or --entry <file> to generate without endpoints",
            "No generation manifest at {}",
            source.manifest.display()
        ));
    };

    let config = &mut manifest.config;
    if let Some(entry) = &source.entry {
        config.entry_path = entry.clone();
    }
    if !source.outputs.is_empty() {
        config.outputs = source.outputs.clone();
    }
    if let Some(base_url) = &source.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(models_name) = &source.models_name {
        config.models_name = models_name.clone();
    }
    config.quiet |= source.quiet;

    debug!(
        manifest = ?manifest.path,
        entry = %manifest.config.entry_path.display(),
        endpoints = manifest.endpoints.len(),
        "loaded generation input"
    );
    Ok(manifest)
}

async fn run_generate(generator: Generator) -> miette::Result<GenerateReport> {
    let report = tokio::task::spawn_blocking(move || generator.generate())
        .await
        .map_err(|e| miette::miette!("Generation task failed: {}", e))??;
    Ok(report)
}

async fn generate(source: &SourceArgs) -> miette::Result<()> {
    let start = Instant::now();
    let manifest = load_manifest(source)?;
    let quiet = manifest.config.quiet;

    if manifest.config.outputs.is_empty() {
        ui::info("No outputs configured, nothing will be written");
    }

    let spinner = ui::spinner("Generating client...");
    let result = run_generate(Generator::from_manifest(manifest)).await;
    spinner.finish_and_clear();
    let report = result?;

    if !quiet {
        print_report(&report);
    }
    ui::timing("Generated", start.elapsed().as_millis());

    Ok(())
}

fn print_report(report: &GenerateReport) {
    println!();
    ui::path_list("Generated code to", &report.written);
    println!();
    ui::box_header("FUNCTIONS");
    ui::box_footer();
    for function in &report.functions {
        ui::function_line(function);
    }
    println!();
    ui::dim(&format!(
        "{} interfaces, {} enums, {} schemas from {} files",
        report.interfaces.len(),
        report.enums.len(),
        report.schemas.len(),
        report.sources.len()
    ));
    println!();
}

async fn check(source: &SourceArgs) -> miette::Result<()> {
    let manifest = load_manifest(source)?;
    let generator = Generator::from_manifest(manifest);

    let spinner = ui::spinner("Checking generated client...");
    let stale = tokio::task::spawn_blocking(move || generator.stale_outputs())
        .await
        .map_err(|e| miette::miette!("Check task failed: {}", e))?;
    spinner.finish_and_clear();
    let stale = stale?;

    if stale.is_empty() {
        ui::looking_good();
        return Ok(());
    }

    ui::nope_header();
    ui::path_list("Out of date", &stale);
    println!();
    Err(miette::miette!(
        help = "Run `js20 generate` and commit the result",
        "{} generated file(s) are out of date",
        stale.len()
    ))
}

fn inspect(source: &SourceArgs) -> miette::Result<()> {
    let manifest = load_manifest(source)?;
    let generator = Generator::from_manifest(manifest);
    let parsed = generator.parse()?;

    print_compilation(&parsed.compilation);

    ui::box_header("MODELS");
    match &parsed.model_map {
        Some(models) if !models.is_empty() => {
            for (key, interface) in models.iter() {
                ui::box_line(&format!("{} {} {}", key, ui::symbols::ARROW, interface));
            }
        }
        Some(_) => ui::box_line("(empty)"),
        None => ui::box_line(&format!("no `{}` declaration", generator.config().models_name)),
    }
    ui::box_footer();

    ui::box_header("ENDPOINTS");
    for endpoint in generator.endpoints() {
        ui::box_line(&format!(
            "{:<7} {}{}",
            endpoint.method.as_str(),
            endpoint.path,
            if endpoint.requires_auth { "  (auth)" } else { "" }
        ));
    }
    ui::box_footer();
    println!();

    Ok(())
}

fn print_compilation(compilation: &Compilation) {
    ui::box_header("FILES");
    for file in &compilation.files {
        ui::box_line(&file.display().to_string());
    }
    ui::box_footer();

    ui::box_header("INTERFACES");
    for interface in &compilation.interfaces {
        let mut line = interface.name.clone();
        if !interface.extends.is_empty() {
            line.push_str(&format!(" extends {}", interface.extends.join(", ")));
        }
        line.push_str(&format!(" ({} properties)", interface.properties.len()));
        ui::box_line(&line);
    }
    ui::box_footer();

    ui::box_header("ENUMS");
    for declared in &compilation.enums {
        let members: Vec<&str> = declared.content.0.iter().map(|(name, _)| name.as_str()).collect();
        ui::box_line(&format!("{} {{ {} }}", declared.name, members.join(", ")));
    }
    ui::box_footer();

    ui::box_header("TYPE ALIASES");
    for alias in &compilation.type_aliases {
        ui::box_line(&format!("{} = {}", alias.name, alias.children.join(" & ")));
    }
    ui::box_footer();

    ui::box_header("SCHEMAS");
    for schema in &compilation.schemas {
        ui::box_line(&format!("{}: {}", schema.name, schema.interface_name));
    }
    ui::box_footer();
}

/// Directories to watch: the entry file's directory and the manifest's.
fn watch_roots(config: &GenerateConfig, manifest_path: Option<&Path>) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();
    let candidates = [Some(config.entry_path.as_path()), manifest_path];
    for path in candidates.into_iter().flatten() {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !roots.iter().any(|root| dir.starts_with(root)) {
            roots.retain(|root| !root.starts_with(&dir));
            roots.push(dir);
        }
    }
    roots
}

fn is_watched_change(path: &Path, outputs: &[PathBuf]) -> bool {
    let relevant = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ts") | Some("tsx") | Some("json")
    );
    if !relevant {
        return false;
    }
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    !outputs.iter().any(|output| *output == canonical)
}

async fn watch(source: &SourceArgs) -> miette::Result<()> {
    let manifest = load_manifest(source)?;
    ui::print_compact_header(env!("CARGO_PKG_VERSION"));
    let roots = watch_roots(&manifest.config, manifest.path.as_deref());

    // First generation up front so the outputs exist and can be ignored.
    match run_generate(Generator::from_manifest(manifest.clone())).await {
        Ok(report) => ui::success(&format!("Generated {} function(s)", report.functions.len())),
        Err(e) => ui::error(&format!("{:?}", e)),
    }

    let outputs: Vec<PathBuf> = manifest
        .config
        .outputs
        .iter()
        .map(|o| o.canonicalize().unwrap_or_else(|_| o.clone()))
        .collect();

    let (tx, mut rx) = tokio::sync::mpsc::channel::<()>(1);
    let mut debouncer = new_debouncer(Duration::from_millis(300), move |result: DebounceEventResult| {
        if let Ok(events) = result {
            if events.iter().any(|event| is_watched_change(&event.path, &outputs)) {
                let _ = tx.try_send(());
            }
        }
    })
    .map_err(|e| miette::miette!("Failed to create file watcher: {}", e))?;

    for root in &roots {
        debouncer
            .watcher()
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| miette::miette!("Failed to watch {}: {}", root.display(), e))?;
        ui::info(&format!("Watching for changes in {}", root.display()));
    }
    println!();
    ui::info("Ready! Waiting for changes...");

    loop {
        tokio::select! {
            _ = rx.recv() => {
                println!();
                let spinner = ui::spinner("Change detected, regenerating...");
                let start = Instant::now();

                let result = match load_manifest(source) {
                    Ok(manifest) => run_generate(Generator::from_manifest(manifest)).await,
                    Err(e) => Err(e),
                };
                spinner.finish_and_clear();

                match result {
                    Ok(report) => ui::success(&format!(
                        "Generated {} function(s) in {}ms",
                        report.functions.len(),
                        start.elapsed().as_millis()
                    )),
                    Err(e) => ui::error(&format!("{:?}", e)),
                }
                println!();
                ui::info("Ready! Waiting for changes...");
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                ui::dim("Stopping watch mode.");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(manifest: &Path) -> SourceArgs {
        SourceArgs {
            manifest: manifest.to_path_buf(),
            entry: None,
            outputs: Vec::new(),
            base_url: None,
            models_name: None,
            quiet: false,
        }
    }

    #[test]
    fn test_cli_parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "js20", "generate", "--entry", "models.ts", "-o", "a.ts", "-o", "b.ts", "--base-url", "http://x",
        ])
        .unwrap();

        let Commands::Generate { source } = cli.command else { panic!("expected generate") };
        assert_eq!(source.entry, Some(PathBuf::from("models.ts")));
        assert_eq!(source.outputs, vec![PathBuf::from("a.ts"), PathBuf::from("b.ts")]);
        assert_eq!(source.manifest, PathBuf::from("js20.json"));
    }

    #[test]
    fn test_flags_override_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("js20.json");
        std::fs::write(&path, r#"{ "entryPath": "models.ts", "baseUrl": "http://a" }"#).unwrap();

        let mut source = args(&path);
        source.base_url = Some("http://b".to_string());
        source.quiet = true;

        let manifest = load_manifest(&source).unwrap();
        assert_eq!(manifest.config.base_url, "http://b");
        assert_eq!(manifest.config.entry_path, dir.path().join("models.ts"));
        assert!(manifest.config.quiet);
    }

    #[test]
    fn test_missing_manifest_without_entry_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_manifest(&args(&dir.path().join("js20.json"))).is_err());

        let mut source = args(&dir.path().join("js20.json"));
        source.entry = Some(PathBuf::from("models.ts"));
        let manifest = load_manifest(&source).unwrap();
        assert!(manifest.endpoints.is_empty());
    }

    #[test]
    fn test_watch_roots_are_deduplicated() {
        let config = GenerateConfig::new("/p/src/models.ts");
        assert_eq!(watch_roots(&config, Some(Path::new("/p/js20.json"))), vec![PathBuf::from("/p")]);
        assert_eq!(watch_roots(&config, None), vec![PathBuf::from("/p/src")]);
    }

    #[test]
    fn test_outputs_are_not_watched_changes() {
        let outputs = vec![PathBuf::from("/p/web/api.ts")];
        assert!(!is_watched_change(Path::new("/p/web/api.ts"), &outputs));
        assert!(is_watched_change(Path::new("/p/src/models.ts"), &outputs));
        assert!(!is_watched_change(Path::new("/p/src/notes.md"), &outputs));
    }
}
