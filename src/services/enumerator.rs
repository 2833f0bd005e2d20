//! Keyboard enumeration.
//!
//! The catalog covers whatever list of keyboards an enumerator produces. The
//! canonical source is QMK's own `make list-keyboards`; a directory scan is
//! available for checkouts without a working build environment.

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Produces the ordered list of keyboards to process.
pub trait KeyboardEnumerator {
    /// Lists keyboard folders relative to `keyboards/` (e.g., "crkbd/rev1").
    ///
    /// A failure here aborts the whole run.
    fn list_keyboards(&self) -> Result<Vec<String>>;
}

impl KeyboardEnumerator for Vec<String> {
    fn list_keyboards(&self) -> Result<Vec<String>> {
        Ok(self.clone())
    }
}

/// Enumerates keyboards by running `make list-keyboards` in a QMK checkout.
#[derive(Debug, Clone)]
pub struct MakeListKeyboards {
    qmk_path: PathBuf,
}

impl MakeListKeyboards {
    /// Creates an enumerator for the checkout at `qmk_path`.
    pub fn new(qmk_path: impl Into<PathBuf>) -> Self {
        Self {
            qmk_path: qmk_path.into(),
        }
    }
}

impl KeyboardEnumerator for MakeListKeyboards {
    fn list_keyboards(&self) -> Result<Vec<String>> {
        let context = || {
            format!(
                "Failed to run make list-keyboards in {}",
                self.qmk_path.display()
            )
        };

        // stdout and stderr share one pipe so lines keep the order make wrote them
        let (mut reader, writer) = io::pipe().with_context(context)?;
        let mut child = {
            let mut cmd = Command::new("make");
            cmd.arg("list-keyboards")
                .current_dir(&self.qmk_path)
                .stdin(Stdio::null())
                .stdout(writer.try_clone().with_context(context)?)
                .stderr(writer);
            cmd.spawn().with_context(context)?
        };

        let mut output = String::new();
        let read = reader.read_to_string(&mut output);
        let status = child.wait().with_context(context)?;
        read.with_context(context)?;

        if !status.success() {
            anyhow::bail!(
                "make list-keyboards failed ({}): {}",
                status,
                output.trim()
            );
        }

        Ok(parse_list_keyboards_output(&output))
    }
}

/// Extracts keyboard names from `make list-keyboards` output.
///
/// Make may print banner lines or warnings first; the keyboard list is the
/// last non-empty line.
pub fn parse_list_keyboards_output(output: &str) -> Vec<String> {
    output
        .trim()
        .lines()
        .last()
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Enumerates keyboards by walking `keyboards/` for directories with a rules.mk.
#[derive(Debug, Clone)]
pub struct DirectoryScan {
    qmk_path: PathBuf,
}

impl DirectoryScan {
    /// Creates a scanner for the checkout at `qmk_path`.
    pub fn new(qmk_path: impl Into<PathBuf>) -> Self {
        Self {
            qmk_path: qmk_path.into(),
        }
    }
}

impl KeyboardEnumerator for DirectoryScan {
    fn list_keyboards(&self) -> Result<Vec<String>> {
        let keyboards_dir = self.qmk_path.join("keyboards");
        if !keyboards_dir.is_dir() {
            anyhow::bail!(
                "QMK keyboards directory not found: {}",
                keyboards_dir.display()
            );
        }

        let mut keyboards = BTreeSet::new();

        fn visit_directory(
            dir: &Path,
            keyboards_root: &Path,
            keyboards: &mut BTreeSet<String>,
        ) -> Result<()> {
            let entries = fs::read_dir(dir)
                .context(format!("Failed to read directory: {}", dir.display()))?;

            for entry in entries {
                let entry = entry?;
                let path = entry.path();

                if path.is_dir() {
                    // Skip hidden directories and keymap folders
                    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                        if name.starts_with('.') || name == "keymaps" {
                            continue;
                        }
                    }
                    visit_directory(&path, keyboards_root, keyboards)?;
                } else if path.file_name().and_then(|n| n.to_str()) == Some("rules.mk") {
                    if let Some(Ok(rel_path)) = path.parent().map(|p| p.strip_prefix(keyboards_root))
                    {
                        let keyboard_name = rel_path.to_string_lossy().replace('\\', "/");
                        if !keyboard_name.is_empty() {
                            keyboards.insert(keyboard_name);
                        }
                    }
                }
            }

            Ok(())
        }

        visit_directory(&keyboards_dir, &keyboards_dir, &mut keyboards)?;

        Ok(keyboards.into_iter().collect())
    }
}

/// Keeps only keyboards matching `pattern`, preserving order.
pub fn filter_keyboards(keyboards: Vec<String>, pattern: &str) -> Result<Vec<String>> {
    let regex = Regex::new(pattern).context(format!("Invalid regex pattern: {pattern}"))?;
    Ok(keyboards
        .into_iter()
        .filter(|keyboard| regex.is_match(keyboard))
        .collect())
}
