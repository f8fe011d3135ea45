use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::default::Default;
use std::fs;
use std::path::Path;

use crate::errors::ConfigError;
use crate::language_utils;
use crate::scripture::canon;

/// Config file used when none is given
pub const DEFAULT_CONFIG_FILE: &str = "sfexport.json";

/// Top-level configuration: export settings, output files and log level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Export behaviour
    #[serde(default)]
    pub export: ExportConfig,

    /// Output file handling
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Target markup dialect
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    // @dialect: Toolbox record database (`\rcrd` / `\vref` records)
    #[default]
    Toolbox,
    // @dialect: Paratext continuous USFM
    Paratext,
}

impl Dialect {
    // @returns: Human readable dialect name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Toolbox => "Toolbox",
            Self::Paratext => "Paratext",
        }
    }

    // @returns: Lowercase dialect identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Toolbox => "toolbox".to_string(),
            Self::Paratext => "paratext".to_string(),
        }
    }

    // @returns: Extension of exported files
    pub fn output_extension(&self) -> &'static str {
        match self {
            Self::Toolbox => "db",
            Self::Paratext => "sfm",
        }
    }

    // @returns: Whether this dialect writes one record per chapter and verse
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Toolbox)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for Dialect {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "toolbox" | "db" => Ok(Self::Toolbox),
            "paratext" | "usfm" | "sfm" => Ok(Self::Paratext),
            _ => Err(ConfigError::UnknownDialect(s.to_string())),
        }
    }
}

/// How footnote callers are written
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FootnoteMarkerStyle {
    // @caller: `+`, numbered by the consuming tool
    #[default]
    Auto,
    // @caller: the note's own symbol, `*` when it has none
    Symbolic,
}

/// Export configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExportConfig {
    // @field: Target dialect
    #[serde(default)]
    pub dialect: Dialect,

    // @field: Write vernacular text
    #[serde(default = "default_true")]
    pub export_scripture_domain: bool,

    // @field: Write back translation lines
    #[serde(default)]
    pub export_back_translation_domain: bool,

    // @field: Write reviewer notes as `\rem` lines
    #[serde(default)]
    pub export_notes_domain: bool,

    // @field: Back translation writing systems, in output order
    #[serde(default)]
    pub requested_writing_systems: Vec<String>,

    // @field: Footnote caller style
    #[serde(default)]
    pub footnote_marker_style: FootnoteMarkerStyle,

    // @field: Write `\fr` / `\xo` reference fields
    #[serde(default = "default_true")]
    pub display_footnote_reference: bool,

    // @field: Transliterate native digits in chapter/verse tags
    #[serde(default)]
    pub convert_digits_to_western: bool,

    // @field: Book codes to export; empty means all
    #[serde(default)]
    pub book_filter: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            export_scripture_domain: default_true(),
            export_back_translation_domain: false,
            export_notes_domain: false,
            requested_writing_systems: Vec::new(),
            footnote_marker_style: FootnoteMarkerStyle::default(),
            display_footnote_reference: default_true(),
            convert_digits_to_western: false,
            book_filter: Vec::new(),
        }
    }
}

impl ExportConfig {
    /// Validate domain and writing system settings
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !self.export_scripture_domain
            && !self.export_back_translation_domain
            && !self.export_notes_domain
        {
            return Err(ConfigError::NoDomainSelected);
        }

        if self.export_back_translation_domain && self.requested_writing_systems.is_empty() {
            return Err(ConfigError::MissingWritingSystems);
        }

        let mut seen = HashSet::new();
        for ws in &self.requested_writing_systems {
            language_utils::validate_writing_system_id(ws)?;
            if !seen.insert(ws.as_str()) {
                return Err(ConfigError::DuplicateWritingSystem(ws.clone()));
            }
            if !language_utils::is_known_language(ws) {
                warn!("Writing system '{}' does not name a known language", ws);
            }
        }

        for code in &self.book_filter {
            if canon::book_number_from_code(code).is_none() {
                warn!("Book filter entry '{}' is not a known book code", code);
            }
        }

        Ok(())
    }

    /// Whether back translation tokens carry a `_<ws>` suffix
    pub fn uses_writing_system_suffix(&self) -> bool {
        self.requested_writing_systems.len() > 1
    }

    /// Whether a book passes the book filter
    pub fn includes_book(&self, code: &str) -> bool {
        self.book_filter.is_empty()
            || self
                .book_filter
                .iter()
                .any(|b| b.trim().eq_ignore_ascii_case(code))
    }
}

/// Output file configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct OutputConfig {
    /// Directory for exported files; next to the input when empty
    #[serde(default)]
    pub directory: Option<String>,

    /// Overwrite existing output files
    #[serde(default)]
    pub force_overwrite: bool,

    /// Extension override; the dialect default when empty
    #[serde(default)]
    pub extension: Option<String>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.export
            .validate()
            .context("Invalid export configuration")?;

        if let Some(ext) = &self.output.extension {
            if ext.trim().is_empty() || ext.contains(['/', '\\']) {
                return Err(anyhow!("Invalid output extension: '{}'", ext));
            }
        }

        Ok(())
    }

    /// Extension for exported files
    pub fn output_extension(&self) -> String {
        match &self.output.extension {
            Some(ext) if !ext.trim().is_empty() => ext.trim().trim_start_matches('.').to_string(),
            _ => self.export.dialect.output_extension().to_string(),
        }
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Load a configuration file, writing the default one first when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            let config = Config::default();
            config.save(path)?;
            return Ok(config);
        }
        Self::from_file(path)
    }
}
