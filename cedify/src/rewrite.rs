use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tempfile::NamedTempFile;
use tracing::{debug, trace, warn};

use crate::config::ConvertConfig;
use crate::convert::{Conversion, CurrencyConverter};
use crate::errors::{ConvertError, ConvertResult};
use crate::results::{FilePreview, RewriteResult};

/// How files are written back
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// Write to a sibling temp file and rename it over the original
    pub atomic_write: bool,
    /// Copy the original here before writing
    pub backup_dir: Option<PathBuf>,
    /// Discovery root, used to name backups after the relative path
    pub root: PathBuf,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            atomic_write: true,
            backup_dir: None,
            root: PathBuf::from("."),
        }
    }
}

impl From<&ConvertConfig> for RewriteOptions {
    fn from(config: &ConvertConfig) -> Self {
        Self {
            atomic_write: config.atomic_write,
            backup_dir: config.backup_dir.clone(),
            root: config.root_path.clone(),
        }
    }
}

/// Converts one file in place.
///
/// Never returns an error: any failure to read, decode, back up or write is
/// captured in the returned [`RewriteResult`] so the caller can keep going.
pub fn rewrite_file(
    path: &Path,
    converter: &CurrencyConverter,
    options: &RewriteOptions,
) -> RewriteResult {
    match try_rewrite_file(path, converter, options) {
        Ok(conversion) => {
            debug!(
                "Converted {} amounts and {} bare signs in {}",
                conversion.amounts,
                conversion.bare,
                path.display()
            );
            RewriteResult::updated(path, conversion.amounts, conversion.bare)
        }
        Err(e) => {
            warn!("Failed to convert {}: {}", path.display(), e);
            RewriteResult::failed(path, e.to_string())
        }
    }
}

/// Like [`rewrite_file`] but propagates the error
pub fn try_rewrite_file(
    path: &Path,
    converter: &CurrencyConverter,
    options: &RewriteOptions,
) -> ConvertResult<Conversion> {
    let content = read_text(path)?;
    let conversion = converter.convert(&content);

    ensure_writable(path)?;
    if let Some(backup_dir) = &options.backup_dir {
        create_backup(path, &options.root, backup_dir)?;
    }

    if options.atomic_write {
        write_atomic(path, &conversion.text)?;
    } else {
        fs::write(path, &conversion.text).map_err(|e| ConvertError::from_io(path, e))?;
    }

    Ok(conversion)
}

/// Computes the conversion for `path` without touching it
pub fn preview_file(path: &Path, converter: &CurrencyConverter) -> ConvertResult<FilePreview> {
    let original = read_text(path)?;
    let (amounts, dollar_count) = converter.preview(&original);
    let converted = converter.convert(&original).text;
    Ok(FilePreview {
        path: path.to_path_buf(),
        amounts,
        dollar_count,
        original,
        converted,
    })
}

/// Reads the whole file and decodes it as strict UTF-8
pub fn read_text(path: &Path) -> ConvertResult<String> {
    let bytes = fs::read(path).map_err(|e| ConvertError::from_io(path, e))?;
    String::from_utf8(bytes).map_err(|e| ConvertError::encoding_error(path, e))
}

/// Refuses read-only targets up front, whichever way the file is written.
///
/// Neither a rename nor a write by a privileged user would be stopped by the
/// permission bits alone.
fn ensure_writable(path: &Path) -> ConvertResult<()> {
    let metadata = fs::metadata(path).map_err(|e| ConvertError::from_io(path, e))?;
    if metadata.permissions().readonly() {
        return Err(ConvertError::permission_denied(path));
    }
    Ok(())
}

/// Replaces `path` by writing a temp file next to it and renaming it.
///
/// Symlinks are resolved first so the link keeps pointing at the rewritten file.
fn write_atomic(path: &Path, content: &str) -> ConvertResult<()> {
    let target = fs::canonicalize(path).map_err(|e| ConvertError::from_io(path, e))?;
    let metadata = fs::metadata(&target).map_err(|e| ConvertError::from_io(path, e))?;

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ConvertError::from_io(path, e))?;
    trace!("Writing {} via {}", path.display(), tmp.path().display());
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    fs::set_permissions(tmp.path(), metadata.permissions())?;

    tmp.persist(&target)
        .map_err(|e| ConvertError::from_io(path, e.error))?;
    Ok(())
}

/// Copies `path` into `backup_dir`, mirroring its path relative to `root` and
/// appending a timestamp, e.g. `shop/cart.html.1737267859`.
///
/// An existing backup is never overwritten: a numeric suffix is added instead.
pub fn create_backup(path: &Path, root: &Path, backup_dir: &Path) -> ConvertResult<PathBuf> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mirrored: PathBuf = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();
    let Some(file_name) = mirrored.file_name() else {
        return Err(ConvertError::IoError(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Cannot back up {}", path.display()),
        )));
    };

    let target_dir = match mirrored.parent() {
        Some(parent) => backup_dir.join(parent),
        None => backup_dir.to_path_buf(),
    };
    fs::create_dir_all(&target_dir)?;

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    let mut base = file_name.to_os_string();
    base.push(format!(".{}", timestamp));

    let mut source = File::open(path).map_err(|e| ConvertError::from_io(path, e))?;
    let mut attempt = 0;
    loop {
        let mut name = base.clone();
        if attempt > 0 {
            name.push(format!(".{}", attempt));
        }
        let backup_path = target_dir.join(name);

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&backup_path)
        {
            Ok(mut backup) => {
                io::copy(&mut source, &mut backup)?;
                backup.sync_all()?;
                debug!("Backed up {} to {}", path.display(), backup_path.display());
                return Ok(backup_path);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(ConvertError::from_io(&backup_path, e)),
        }
    }
}
