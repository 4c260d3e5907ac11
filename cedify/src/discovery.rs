use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::config::ConvertConfig;
use crate::errors::{ConvertError, ConvertResult};
use crate::filters::should_include_file;

/// Recursively collects the files under `config.root_path` that should be converted.
///
/// Every directory is entered, hidden ones and VCS metadata included, and no
/// `.gitignore`-style files are consulted; only `config.ignore_patterns` can
/// exclude paths. Entries are sorted by file name within each directory so the
/// result is stable for a given tree.
///
/// Symlinked directories are not entered, but a symlink whose target is a
/// regular file is selected like the file itself.
///
/// Any error while walking aborts discovery.
pub fn discover_files(config: &ConvertConfig) -> ConvertResult<Vec<PathBuf>> {
    let root = config.root_path.as_path();
    debug!("Discovering files under {}", root.display());

    check_root(root)?;

    let mut walker = WalkBuilder::new(root);
    walker
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    let mut files = Vec::new();
    for entry in walker.build() {
        let entry = entry.map_err(|e| ConvertError::discovery(root, e.to_string()))?;
        if !is_file_entry(&entry) {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if should_include_file(relative, &config.extensions, &config.ignore_patterns) {
            trace!("Selected {}", entry.path().display());
            files.push(entry.into_path());
        }
    }

    debug!("Found {} files to convert", files.len());
    Ok(files)
}

fn is_file_entry(entry: &ignore::DirEntry) -> bool {
    match entry.file_type() {
        Some(ft) if ft.is_symlink() => entry.path().is_file(),
        Some(ft) => ft.is_file(),
        None => false,
    }
}

fn check_root(root: &Path) -> ConvertResult<()> {
    let metadata =
        std::fs::metadata(root).map_err(|e| ConvertError::discovery(root, e.to_string()))?;
    if !metadata.is_dir() {
        return Err(ConvertError::discovery(root, "not a directory"));
    }
    Ok(())
}
