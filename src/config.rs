//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\music-ledger\config.toml
//! - macOS: ~/Library/Application Support/music-ledger/config.toml
//! - Linux: ~/.config/music-ledger/config.toml
//!
//! The config file is human-readable and editable. Settings are defaults
//! only; every one of them can be overridden per invocation on the command
//! line.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::delimited::Delimiter;
use crate::scanner::DEFAULT_EXTENSIONS;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scan settings
    pub scan: ScanConfig,

    /// Report output settings
    pub report: ReportConfig,

    /// Export defaults
    pub export: ExportConfig,
}

/// Directory scan settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File extensions treated as audio (case-insensitive)
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Report output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Page title of the generated report
    pub title: String,

    /// Default output path for `report` and `import`
    pub output: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Audio Library".to_string(),
            output: PathBuf::from("library.html"),
        }
    }
}

/// Export defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Default field separator
    pub delimiter: Delimiter,

    /// Prepend a UTF-8 byte-order mark to exported files
    pub include_bom: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Comma,
            include_bom: true,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("music-ledger"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> crate::error::Result<()> {
    let dir = config_dir()
        .ok_or_else(|| crate::error::Error::config("could not determine config directory"))?;
    let path = dir.join("config.toml");

    std::fs::create_dir_all(&dir)?;

    let contents = toml::to_string_pretty(config)
        .map_err(|e| crate::error::Error::config(format!("failed to serialize config: {e}")))?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents)?;
    std::fs::rename(&temp_path, &path)?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
