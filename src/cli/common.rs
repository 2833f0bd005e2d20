//! Shared CLI error types and option resolution.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{validate_qmk_path, Config, EnumeratorKind};
use crate::services::{DirectoryScan, KeyboardEnumerator, MakeListKeyboards};

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Invalid input or nothing to do
    ValidationError = 1,
    /// Filesystem, enumeration, or serialization failure
    IoError = 2,
}

/// Error returned by CLI commands.
#[derive(Debug, Clone)]
pub struct CliError {
    /// Exit code to terminate with
    pub code: ExitCode,
    /// Human-readable message
    pub message: String,
}

impl CliError {
    /// Creates an I/O error.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::IoError,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::ValidationError,
            message: message.into(),
        }
    }

    /// Numeric exit code.
    pub fn exit_code(&self) -> i32 {
        self.code as i32
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Loads the config file given on the command line, or the default one.
pub fn load_config(path: Option<&Path>) -> CliResult<Config> {
    let result = match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    result.map_err(|e| CliError::validation(format!("Failed to load config: {e:#}")))
}

/// Picks the QMK path from the flag or the config and checks it.
pub fn resolve_qmk_path(
    flag: Option<&PathBuf>,
    config: &Config,
    enumerator: EnumeratorKind,
) -> CliResult<PathBuf> {
    let qmk_path = flag
        .or(config.paths.qmk_firmware.as_ref())
        .cloned()
        .ok_or_else(|| {
            CliError::validation("No QMK firmware path given; pass --qmk-path or set paths.qmk_firmware")
        })?;

    validate_qmk_path(&qmk_path, enumerator).map_err(|e| CliError::io(format!("{e:#}")))?;
    Ok(qmk_path)
}

/// Creates the enumerator for `kind`.
pub fn make_enumerator(kind: EnumeratorKind, qmk_path: &Path) -> Box<dyn KeyboardEnumerator> {
    match kind {
        EnumeratorKind::Make => Box::new(MakeListKeyboards::new(qmk_path)),
        EnumeratorKind::Scan => Box::new(DirectoryScan::new(qmk_path)),
    }
}

/// Lists keyboards with the given enumerator and optional regex filter.
///
/// An empty list is not an error; only enumeration itself can fail.
pub fn list_keyboards(
    enumerator: &dyn KeyboardEnumerator,
    filter: Option<&str>,
) -> CliResult<Vec<String>> {
    let keyboards = enumerator
        .list_keyboards()
        .map_err(|e| CliError::io(format!("Failed to enumerate keyboards: {e:#}")))?;

    let keyboards = match filter {
        Some(pattern) => crate::services::enumerator::filter_keyboards(keyboards, pattern)
            .map_err(|e| CliError::validation(format!("{e:#}")))?,
        None => keyboards,
    };

    Ok(keyboards)
}
