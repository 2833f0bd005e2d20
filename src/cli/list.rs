//! `list-keyboards` command.

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::common::{
    list_keyboards, load_config, make_enumerator, resolve_qmk_path, CliError, CliResult,
};
use crate::config::EnumeratorKind;

/// List the keyboards a catalog build would process
#[derive(Debug, Clone, Args)]
pub struct ListKeyboardsArgs {
    /// Path to QMK firmware repository
    #[arg(long, value_name = "PATH")]
    pub qmk_path: Option<PathBuf>,

    /// Optional regex filter for keyboard names
    #[arg(long, value_name = "REGEX")]
    pub filter: Option<String>,

    /// How to enumerate keyboards
    #[arg(long, value_enum)]
    pub enumerator: Option<EnumeratorKind>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON response for list-keyboards command
#[derive(Debug, Clone, Serialize)]
struct ListKeyboardsResponse {
    /// List of keyboard paths
    keyboards: Vec<String>,
    /// Total count
    count: usize,
}

impl ListKeyboardsArgs {
    /// Execute the list-keyboards command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config(self.config.as_deref())?;
        let enumerator_kind = self.enumerator.unwrap_or(config.scan.enumerator);
        let qmk_path = resolve_qmk_path(self.qmk_path.as_ref(), &config, enumerator_kind)?;
        let filter = self.filter.as_deref().or(config.scan.filter.as_deref());

        let enumerator = make_enumerator(enumerator_kind, &qmk_path);
        let keyboards = list_keyboards(enumerator.as_ref(), filter)?;
        if keyboards.is_empty() {
            return Err(CliError::validation("No keyboards found"));
        }

        if self.json {
            let response = ListKeyboardsResponse {
                count: keyboards.len(),
                keyboards,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            println!("Found {} keyboards:", keyboards.len());
            for kb in &keyboards {
                println!("  {kb}");
            }
        }

        Ok(())
    }
}
