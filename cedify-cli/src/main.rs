use anyhow::{Context, Result};
use cedify::{
    convert, convert_files, discover_files, preview, ConvertConfig, CurrencyConverter,
    FilePreview, RewriteOptions, RewriteResult, RunSummary,
};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod diff_utils;

const SEPARATOR_WIDTH: usize = 50;

/// Convert dollar prices to cedi (₵) in every HTML file under the current directory.
#[derive(Parser, Debug)]
#[command(name = "cedify", author, version, about, long_about = None)]
struct Cli {
    /// Root directory to convert (default: current directory)
    #[arg(short = 'd', long)]
    root: Option<PathBuf>,

    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Currency symbol that replaces '$'
    #[arg(short, long)]
    symbol: Option<String>,

    /// File extensions to convert (e.g. html,xhtml)
    #[arg(short, long)]
    extensions: Option<String>,

    /// Patterns to skip, relative to the root (glob format)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Show what would change without writing anything
    #[arg(short, long)]
    preview: bool,

    /// With --preview, also print a unified diff per file
    #[arg(long, requires = "preview")]
    diff: bool,

    /// Copy each file here before rewriting it
    #[arg(long)]
    backup_dir: Option<PathBuf>,

    /// Overwrite files directly instead of writing a temp file and renaming
    #[arg(long)]
    no_atomic: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn to_config(&self) -> ConvertConfig {
        let defaults = ConvertConfig::default();
        ConvertConfig {
            root_path: self.root.clone().unwrap_or(defaults.root_path),
            extensions: self
                .extensions
                .as_ref()
                .map(|e| {
                    e.split(',')
                        .map(|s| s.trim().trim_start_matches('.').to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.extensions),
            symbol: self.symbol.clone().unwrap_or(defaults.symbol),
            ignore_patterns: self.ignore.clone(),
            atomic_write: !self.no_atomic,
            backup_dir: self.backup_dir.clone(),
            log_level: self.log_level.clone().unwrap_or(defaults.log_level),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_config = ConvertConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let mut config = file_config.merge_with_cli(cli.to_config());
    config.root_path = absolute_root(&config.root_path)?;

    init_tracing(&config.log_level);
    debug!("Effective configuration: {:?}", config);

    if cli.print_config {
        print!("{}", config.to_yaml()?);
        Ok(())
    } else if cli.preview {
        run_preview(&config, cli.diff, cli.json)
    } else if cli.json {
        let summary = convert(&config, |_| {})?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    } else {
        run_convert(&config)
    }
}

/// Resolves the root against the current directory so printed paths are absolute
fn absolute_root(root: &Path) -> Result<PathBuf> {
    if root.is_absolute() {
        return Ok(root.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Cannot determine current directory")?;
    if root == Path::new(".") {
        Ok(cwd)
    } else {
        Ok(cwd.join(root))
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_convert(config: &ConvertConfig) -> Result<()> {
    config.validate()?;

    println!("{}", "cedify - Currency Converter".bold());
    println!("Converting $ to {} in HTML files...\n", config.symbol);
    println!("Working directory: {}", config.root_path.display());

    let files = discover_files(config)?;
    if files.is_empty() {
        println!(
            "{}",
            format!("No HTML files found in {}", config.root_path.display()).yellow()
        );
        return Ok(());
    }

    println!("Found {} HTML file(s):", files.len());
    for file in &files {
        println!("  - {}", file.display());
    }
    print_separator();

    let converter = CurrencyConverter::new(config.symbol.clone());
    let summary = convert_files(
        &files,
        &converter,
        &RewriteOptions::from(config),
        print_rewrite_result,
    );

    print_separator();
    print_summary(&summary, &config.symbol);
    Ok(())
}

fn print_separator() {
    println!("\n{}", "=".repeat(SEPARATOR_WIDTH));
}

fn print_rewrite_result(result: &RewriteResult) {
    if result.success() {
        println!("{}", result.message().green());
    } else {
        println!("{}", result.message().red());
    }
}

fn print_summary(summary: &RunSummary, symbol: &str) {
    println!("{}", "Conversion completed!".bold());
    let tally = format!(
        "Successfully updated: {}/{} files",
        summary.succeeded, summary.total
    );
    if summary.failed() == 0 {
        println!("{}", tally.green());
        println!("All dollar signs have been converted to {}", symbol);
    } else {
        println!("{}", tally.yellow());
        println!("{} file(s) could not be converted:", summary.failed());
        for failure in summary.failures() {
            println!("  - {}", failure.path.display().to_string().red());
        }
    }
}

fn run_preview(config: &ConvertConfig, show_diff: bool, json: bool) -> Result<()> {
    let previews = preview(config)?;

    if json {
        let entries: Vec<serde_json::Value> = previews
            .iter()
            .map(|(path, result)| match result {
                Ok(file_preview) => serde_json::to_value(file_preview)
                    .unwrap_or_else(|e| serde_json::json!({ "path": path, "error": e.to_string() })),
                Err(e) => serde_json::json!({ "path": path, "error": e.to_string() }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Preview mode - showing changes without modifying files:");
    if previews.is_empty() {
        println!(
            "{}",
            format!("No HTML files found in {}", config.root_path.display()).yellow()
        );
        return Ok(());
    }

    for (path, result) in &previews {
        match result {
            Ok(file_preview) => print_file_preview(file_preview, show_diff),
            Err(e) => println!(
                "{}",
                format!("Error reading {}: {}", path.display(), e).red()
            ),
        }
    }
    Ok(())
}

fn print_file_preview(file_preview: &FilePreview, show_diff: bool) {
    let path = file_preview.path().display().to_string();
    if file_preview.amounts.is_empty() {
        println!("No dollar amounts found in {}", path.blue());
    } else {
        println!("Dollar amounts found in {}:", path.blue());
        for amount in &file_preview.amounts {
            println!(
                "  {} → {}",
                amount.original.red(),
                amount.converted.green()
            );
        }
    }

    if file_preview.dollar_count > 0 {
        println!("Total $ signs found: {}", file_preview.dollar_count);
    } else {
        println!("No $ signs found");
    }

    if show_diff && file_preview.has_changes() {
        println!(
            "{} line(s) would change:",
            diff_utils::changed_line_count(&file_preview.original, &file_preview.converted)
        );
        diff_utils::print_unified_diff(
            file_preview.path(),
            &file_preview.original,
            &file_preview.converted,
        );
    }
}
