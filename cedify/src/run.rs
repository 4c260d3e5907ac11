use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::ConvertConfig;
use crate::convert::CurrencyConverter;
use crate::discovery::discover_files;
use crate::errors::ConvertResult;
use crate::results::{FilePreview, RewriteResult, RunSummary};
use crate::rewrite::{preview_file, rewrite_file, RewriteOptions};

/// Rewrites `files` one after another.
///
/// `on_file` is called after each file completes, in order, so callers can
/// report progress while the run is still going. Logs the start and the final
/// tally at info level.
pub fn convert_files<F>(
    files: &[PathBuf],
    converter: &CurrencyConverter,
    options: &RewriteOptions,
    mut on_file: F,
) -> RunSummary
where
    F: FnMut(&RewriteResult),
{
    info!(
        "Converting '$' to '{}' in {} files",
        converter.symbol(),
        files.len()
    );

    let mut summary = RunSummary::new();
    for path in files {
        let result = rewrite_file(path, converter, options);
        on_file(&result);
        summary.add(result);
    }

    info!(
        "Conversion complete. Updated {}/{} files",
        summary.succeeded, summary.total
    );
    summary
}

/// Discovers and converts every matching file under `config.root_path`.
///
/// Fails only if the configuration is invalid or discovery fails. When nothing
/// is found, returns an empty summary without writing anything.
pub fn convert<F>(config: &ConvertConfig, on_file: F) -> ConvertResult<RunSummary>
where
    F: FnMut(&RewriteResult),
{
    config.validate()?;
    debug!("Starting conversion under {}", config.root_path.display());

    let files = discover_files(config)?;
    if files.is_empty() {
        debug!("No matching files, nothing to do");
        return Ok(RunSummary::new());
    }

    let converter = CurrencyConverter::new(config.symbol.clone());
    Ok(convert_files(
        &files,
        &converter,
        &RewriteOptions::from(config),
        on_file,
    ))
}

/// Read-only counterpart of [`convert`]: previews every matching file.
///
/// Per-file read or decode failures are kept alongside their path.
pub fn preview(config: &ConvertConfig) -> ConvertResult<Vec<(PathBuf, ConvertResult<FilePreview>)>> {
    config.validate()?;
    let converter = CurrencyConverter::new(config.symbol.clone());

    let previews = discover_files(config)?
        .into_iter()
        .map(|path| {
            let preview = preview_file(&path, &converter);
            (path, preview)
        })
        .collect();
    Ok(previews)
}
