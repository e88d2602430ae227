//! Precedence resolution for configuration.
//!
//! ## Config Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. config.kdl (`$GB_CONFIG_DIR/config.kdl`, else `~/.config/graphbook/config.kdl`)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use kdl::KdlDocument;

use crate::archive::{ExportFormat, write_atomic};
use crate::config::{GraphbookConfig, OutputFormat};
use crate::models::{DEFAULT_PALETTE, DEFAULT_PROJECT_NAME};
use crate::toast::DEFAULT_DURATION_MS;
use crate::{Error, Result};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "GB_CONFIG_DIR";

/// File name of the config inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.kdl";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from config.kdl
    File,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::File => write!(f, "file"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }

    fn pick(flag: Option<T>, file: Option<T>, default: T) -> Self {
        match (flag, file) {
            (Some(v), _) => Self::new(v, ValueSource::CliFlag),
            (None, Some(v)) => Self::new(v, ValueSource::File),
            (None, None) => Self::new(default, ValueSource::Default),
        }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub output_format: Resolved<OutputFormat>,
    pub project_name: Resolved<String>,
    pub palette: Resolved<Vec<String>>,
    pub export_format: Resolved<ExportFormat>,
    pub toast_duration_ms: Resolved<u64>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve_config(&GraphbookConfig::default(), &ConfigOverrides::default())
    }
}

impl ResolvedConfig {
    pub fn output_format(&self) -> OutputFormat {
        self.output_format.value
    }

    pub fn project_name(&self) -> &str {
        &self.project_name.value
    }

    pub fn palette(&self) -> &[String] {
        &self.palette.value
    }

    pub fn export_format(&self) -> ExportFormat {
        self.export_format.value
    }

    pub fn toast_duration_ms(&self) -> u64 {
        self.toast_duration_ms.value
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Output format override from CLI flag
    pub output_format: Option<OutputFormat>,
    /// Export format override from CLI flag
    pub export_format: Option<ExportFormat>,
}

impl ConfigOverrides {
    /// Create empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set output format override.
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    /// Set export format override.
    pub fn with_export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = Some(format);
        self
    }
}

/// Resolve configuration from a loaded file and CLI overrides.
pub fn resolve_config(file: &GraphbookConfig, overrides: &ConfigOverrides) -> ResolvedConfig {
    ResolvedConfig {
        output_format: Resolved::pick(
            overrides.output_format,
            file.output_format,
            OutputFormat::default(),
        ),
        project_name: Resolved::pick(
            None,
            file.project_name.clone(),
            DEFAULT_PROJECT_NAME.to_string(),
        ),
        palette: Resolved::pick(
            None,
            file.palette.clone(),
            DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        ),
        export_format: Resolved::pick(
            overrides.export_format,
            file.export_format,
            ExportFormat::default(),
        ),
        toast_duration_ms: Resolved::pick(None, file.toast_duration_ms, DEFAULT_DURATION_MS),
    }
}

/// Directory holding config.kdl.
///
/// `$GB_CONFIG_DIR` wins; otherwise the platform config directory.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|d| d.join("graphbook"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Path of config.kdl inside `dir`.
pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Load config.kdl from `dir`. A missing file is an empty config.
pub fn load_config(dir: &Path) -> Result<GraphbookConfig> {
    let path = config_path(dir);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(GraphbookConfig::new()),
        Err(e) => return Err(e.into()),
    };

    let doc: KdlDocument = text
        .parse()
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    let config = GraphbookConfig::from_kdl(&doc);
    config
        .validate()
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Write `config` to config.kdl in `dir`, creating the directory.
pub fn save_config(dir: &Path, config: &GraphbookConfig) -> Result<()> {
    config.validate().map_err(Error::Config)?;
    std::fs::create_dir_all(dir)?;
    write_atomic(&config_path(dir), config.to_kdl().to_string().as_bytes())
}

/// Load config.kdl from `dir` and resolve it against `overrides`.
pub fn resolve_from_dir(dir: &Path, overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let file = load_config(dir)?;
    Ok(resolve_config(&file, overrides))
}
