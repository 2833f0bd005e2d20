//! `inspect` command: build one keyboard's descriptor.

use clap::Args;
use std::path::PathBuf;

use crate::catalog::CatalogBuilder;
use crate::cli::common::{load_config, resolve_qmk_path, CliError, CliResult};
use crate::config::EnumeratorKind;
use crate::services::FsSourceTree;

/// Show the descriptor built for a single keyboard
#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// Path to QMK firmware repository
    #[arg(long, value_name = "PATH")]
    pub qmk_path: Option<PathBuf>,

    /// Keyboard name (e.g., "crkbd/rev1", "planck/rev6")
    #[arg(long, value_name = "NAME")]
    pub keyboard: String,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output the full descriptor as JSON
    #[arg(long)]
    pub json: bool,
}

impl InspectArgs {
    /// Execute the inspect command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config(self.config.as_deref())?;
        // Inspecting doesn't enumerate, so only the keyboards/ directory is required
        let qmk_path = resolve_qmk_path(self.qmk_path.as_ref(), &config, EnumeratorKind::Scan)?;

        let keyboard = self.keyboard.trim_matches('/');
        let source = FsSourceTree::new(&qmk_path);
        if !source.root().join("keyboards").join(keyboard).is_dir() {
            return Err(CliError::validation(format!(
                "Keyboard not found: {keyboard}"
            )));
        }

        let info = CatalogBuilder::new(&source).build_keyboard(keyboard);

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&info)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            println!("Keyboard: {} ({})", info.keyboard_name, info.keyboard_folder);
            for (key, value) in &info.metadata {
                println!("  {key}: {value}");
            }
            println!("\nLayouts ({}):", info.layouts.len());
            for name in info.layouts.keys() {
                let count = info.layout_keys(name).map_or(0, Vec::len);
                println!("  {} ({} keys)", name, count);
            }
        }

        Ok(())
    }
}
