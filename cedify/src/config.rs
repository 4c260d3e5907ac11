use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{ConvertError, ConvertResult};

/// Symbol substituted for `$` unless configured otherwise (Ghanaian cedi).
pub const DEFAULT_SYMBOL: &str = "₵";

/// Configuration for a conversion run.
///
/// # Configuration Locations
///
/// Sources are layered, later ones overriding earlier ones:
/// 1. Global `$HOME/.config/cedify/config.yaml`
/// 2. Local `.cedify.yaml` in the current directory
/// 3. Custom config file specified via `--config`
///
/// # Configuration Format
///
/// ```yaml
/// # Directory to start the walk from
/// root_path: "site"
///
/// # File name suffixes to convert (without the dot)
/// extensions: ["html"]
///
/// # Replacement for `$`
/// symbol: "₵"
///
/// # Glob patterns, relative to root_path, that are skipped
/// ignore_patterns:
///   - ".git/**"
///
/// # Write through a temporary file and rename over the original
/// atomic_write: true
///
/// # Copy originals here before rewriting
/// backup_dir: ".cedify/backups"
///
/// log_level: "info"
/// ```
///
/// Command-line values take precedence, see [`ConvertConfig::merge_with_cli`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Root directory to start discovery from
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// File name suffixes (without the leading dot) selected for conversion
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Currency symbol that replaces `$`
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Patterns to skip (glob syntax, matched against the path relative to the root)
    /// Empty by default so every directory is visited, hidden ones included.
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Replace files via temp file + rename instead of overwriting in place
    #[serde(default = "default_atomic_write")]
    pub atomic_write: bool,

    /// Directory receiving a copy of each file before it is rewritten
    #[serde(default)]
    pub backup_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_extensions() -> Vec<String> {
    vec!["html".to_string()]
}

fn default_symbol() -> String {
    DEFAULT_SYMBOL.to_string()
}

fn default_atomic_write() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            extensions: default_extensions(),
            symbol: default_symbol(),
            ignore_patterns: Vec::new(),
            atomic_write: default_atomic_write(),
            backup_dir: None,
            log_level: default_log_level(),
        }
    }
}

impl ConvertConfig {
    /// Loads configuration, adding `config_path` as the highest-precedence file.
    ///
    /// An explicit path that does not exist is an error; the default locations
    /// are only read when present.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();
        let mut sources = 0;

        let defaults = [
            dirs::config_dir().map(|p| p.join("cedify/config.yaml")),
            Some(PathBuf::from(".cedify.yaml")),
        ];
        for path in defaults.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
                sources += 1;
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
            sources += 1;
        }

        if sources == 0 {
            return Ok(Self::default());
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: ConvertConfig) -> Self {
        if cli_config.root_path != default_root_path() {
            self.root_path = cli_config.root_path;
        }
        if cli_config.extensions != default_extensions() {
            self.extensions = cli_config.extensions;
        }
        if cli_config.symbol != default_symbol() {
            self.symbol = cli_config.symbol;
        }
        if !cli_config.ignore_patterns.is_empty() {
            self.ignore_patterns = cli_config.ignore_patterns;
        }
        if !cli_config.atomic_write {
            self.atomic_write = false;
        }
        if cli_config.backup_dir.is_some() {
            self.backup_dir = cli_config.backup_dir;
        }
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }

    /// Renders the effective configuration in the same YAML format it is loaded from
    pub fn to_yaml(&self) -> ConvertResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| ConvertError::config_error(format!("Failed to render config: {}", e)))
    }

    /// Rejects settings that would break the conversion invariants
    pub fn validate(&self) -> ConvertResult<()> {
        if self.symbol.is_empty() {
            return Err(ConvertError::config_error("Symbol cannot be empty"));
        }
        // A symbol containing '$' would be rewritten again on the next run.
        if self.symbol.contains('$') {
            return Err(ConvertError::config_error("Symbol cannot contain '$'"));
        }
        if self.extensions.is_empty() {
            return Err(ConvertError::config_error(
                "At least one file extension is required",
            ));
        }
        if let Some(bad) = self
            .extensions
            .iter()
            .find(|e| e.is_empty() || e.contains(['/', '\\']))
        {
            return Err(ConvertError::config_error(format!(
                "Invalid file extension: '{}'",
                bad
            )));
        }
        for pattern in &self.ignore_patterns {
            glob::Pattern::new(pattern).map_err(|e| {
                ConvertError::config_error(format!("Invalid ignore pattern '{}': {}", pattern, e))
            })?;
        }
        Ok(())
    }
}
