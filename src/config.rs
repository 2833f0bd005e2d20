//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::CONFIG_DIR_NAME;

/// How the list of keyboards is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EnumeratorKind {
    /// Run `make list-keyboards` in the QMK checkout
    #[default]
    Make,
    /// Walk `keyboards/` for directories containing a rules.mk
    Scan,
}

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// QMK firmware directory path (e.g., "/`path/to/qmk_firmware`")
    pub qmk_firmware: Option<PathBuf>,
}

/// Where finished catalogs are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Output directory for published JSON files
    pub output_dir: PathBuf,
}

impl Default for PublishConfig {
    fn default() -> Self {
        let output_dir = Self::default_output_dir().unwrap_or_else(|_| PathBuf::from("catalog"));

        Self { output_dir }
    }
}

impl PublishConfig {
    /// Gets the default output directory path.
    ///
    /// - Linux: `~/.config/qmk-catalog/catalog/`
    /// - macOS: `~/Library/Application Support/qmk-catalog/catalog/`
    /// - Windows: `%APPDATA%\qmk-catalog\catalog\`
    fn default_output_dir() -> Result<PathBuf> {
        Ok(Config::config_dir()?.join("catalog"))
    }
}

/// Keyboard enumeration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScanConfig {
    /// Enumeration strategy
    #[serde(default)]
    pub enumerator: EnumeratorKind,
    /// Optional regex; only matching keyboards are processed
    #[serde(default)]
    pub filter: Option<String>,
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/qmk-catalog/config.toml`
/// - macOS: `~/Library/Application Support/qmk-catalog/config.toml`
/// - Windows: `%APPDATA%\qmk-catalog\config.toml`
///
/// # Validation
///
/// - `qmk_firmware` path must exist and contain a keyboards/ directory
/// - with the `make` enumerator it must also contain a Makefile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Publish settings
    #[serde(default)]
    pub publish: PublishConfig,
    /// Enumeration settings
    #[serde(default)]
    pub scan: ScanConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the configuration has a QMK firmware path.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.paths.qmk_firmware.is_some()
    }

    /// Gets the platform-specific config directory path.
    ///
    /// - Linux: `~/.config/qmk-catalog/`
    /// - macOS: `~/Library/Application Support/qmk-catalog/`
    /// - Windows: `%APPDATA%\qmk-catalog\`
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the default config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from `path`, returning defaults when it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Saves configuration to the default config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to `path` using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(config_dir) = path.parent() {
            fs::create_dir_all(config_dir).context(format!(
                "Failed to create config directory: {}",
                config_dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, path).context(format!(
            "Failed to rename temp config file to: {}",
            path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks that the QMK firmware path (if set) exists and looks like a QMK
    /// checkout for the configured enumerator.
    pub fn validate(&self) -> Result<()> {
        if let Some(qmk_path) = &self.paths.qmk_firmware {
            validate_qmk_path(qmk_path, self.scan.enumerator)?;
        }

        if let Some(filter) = &self.scan.filter {
            regex::Regex::new(filter).context(format!("Invalid keyboard filter: {filter}"))?;
        }

        Ok(())
    }
}

/// Checks that `qmk_path` is usable with the given enumerator.
pub fn validate_qmk_path(qmk_path: &Path, enumerator: EnumeratorKind) -> Result<()> {
    if !qmk_path.exists() {
        anyhow::bail!("QMK firmware path does not exist: {}", qmk_path.display());
    }

    let keyboards_dir = qmk_path.join("keyboards");
    if !keyboards_dir.is_dir() {
        anyhow::bail!(
            "QMK firmware path is invalid: keyboards/ directory not found at {}",
            keyboards_dir.display()
        );
    }

    if enumerator == EnumeratorKind::Make {
        let makefile_path = qmk_path.join("Makefile");
        if !makefile_path.exists() {
            anyhow::bail!(
                "QMK firmware path is invalid: Makefile not found at {}",
                makefile_path.display()
            );
        }
    }

    Ok(())
}
