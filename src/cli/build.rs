//! `build` command: generate and publish the full catalog.

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::catalog::CatalogBuilder;
use crate::cli::common::{
    list_keyboards, load_config, make_enumerator, resolve_qmk_path, CliError, CliResult,
};
use crate::config::EnumeratorKind;
use crate::services::{publish_catalog, FsSourceTree, JsonDirSink};

/// Build the layout catalog for every keyboard and write it as JSON files
#[derive(Debug, Clone, Args)]
pub struct BuildArgs {
    /// Path to QMK firmware repository
    #[arg(long, value_name = "PATH")]
    pub qmk_path: Option<PathBuf>,

    /// Directory the catalog JSON files are written to
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Only process keyboards matching this regex
    #[arg(long, value_name = "REGEX")]
    pub filter: Option<String>,

    /// How to enumerate keyboards
    #[arg(long, value_enum)]
    pub enumerator: Option<EnumeratorKind>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print a JSON summary instead of text
    #[arg(long)]
    pub json: bool,
}

/// JSON summary for the build command
#[derive(Debug, Clone, Serialize)]
struct BuildSummary {
    /// Number of keyboards in the catalog
    keyboards: usize,
    /// Keyboards without any layout
    keyboards_without_layouts: Vec<String>,
    /// Values written to the output directory
    published: usize,
    /// Output directory
    output_dir: String,
    /// Catalog generation time
    last_updated: String,
}

impl BuildArgs {
    /// Execute the build command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config(self.config.as_deref())?;
        let enumerator_kind = self.enumerator.unwrap_or(config.scan.enumerator);
        let qmk_path = resolve_qmk_path(self.qmk_path.as_ref(), &config, enumerator_kind)?;
        let output_dir = self
            .output
            .clone()
            .unwrap_or_else(|| config.publish.output_dir.clone());
        let filter = self.filter.as_deref().or(config.scan.filter.as_deref());

        // Enumeration failures abort before anything is written
        let enumerator = make_enumerator(enumerator_kind, &qmk_path);
        let keyboards = list_keyboards(enumerator.as_ref(), filter)?;
        if keyboards.is_empty() {
            warn!("No keyboards found in {}", qmk_path.display());
        }
        info!("Processing {} keyboards from {}", keyboards.len(), qmk_path.display());

        let source = FsSourceTree::new(&qmk_path);
        let catalog = CatalogBuilder::new(&source).build_keyboards(&keyboards);

        std::fs::create_dir_all(&output_dir).map_err(|e| {
            CliError::io(format!(
                "Failed to create output directory {}: {e}",
                output_dir.display()
            ))
        })?;
        let mut sink = JsonDirSink::new(&output_dir);
        let published = publish_catalog(&catalog, &mut sink);

        let keyboards_without_layouts: Vec<String> = catalog
            .keyboards
            .values()
            .filter(|info| info.layouts.is_empty())
            .map(|info| info.keyboard_folder.clone())
            .collect();

        if self.json {
            let summary = BuildSummary {
                keyboards: catalog.len(),
                keyboards_without_layouts,
                published,
                output_dir: output_dir.display().to_string(),
                last_updated: catalog.last_updated.clone(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&summary)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            println!(
                "Built catalog for {} keyboards ({} without layouts)",
                catalog.len(),
                keyboards_without_layouts.len()
            );
            println!("Wrote {} files to {}", published, output_dir.display());
        }

        Ok(())
    }
}
