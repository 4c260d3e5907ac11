/// File selection rules used during discovery.
///
/// Selection is deliberately literal: a file qualifies when its name ends with
/// `.<ext>`, compared byte for byte on the raw file name, so names that are
/// not valid UTF-8 still qualify. `page.htm`, `page.html.bak` and `PAGE.HTML`
/// are all left alone with the default `html` extension.
use glob::Pattern;
use std::path::Path;

/// Checks if a file name ends with `.<ext>` for any of the given extensions
pub fn has_valid_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.as_encoded_bytes();
    extensions.iter().any(|ext| {
        name.strip_suffix(ext.as_bytes())
            .is_some_and(|stem| stem.ends_with(b"."))
    })
}

/// Checks if a path (relative to the discovery root) matches an ignore pattern
pub fn should_ignore(relative: &Path, ignore_patterns: &[String]) -> bool {
    if ignore_patterns.is_empty() {
        return false;
    }

    // Patterns are written with '/' separators on every platform
    let normalized_path = relative.to_string_lossy().replace('\\', "/");
    ignore_patterns.iter().any(|pattern| {
        Pattern::new(pattern)
            .map(|p| p.matches(&normalized_path))
            .unwrap_or(false)
    })
}

/// Determines if a discovered file should be converted
pub fn should_include_file(
    relative: &Path,
    extensions: &[String],
    ignore_patterns: &[String],
) -> bool {
    has_valid_extension(relative, extensions) && !should_ignore(relative, ignore_patterns)
}
