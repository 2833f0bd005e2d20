//! Publishing finished catalogs.
//!
//! A [`PublishSink`] stores named JSON values. Sinks are write-only from the
//! catalog's point of view: a failed write is logged and the remaining values
//! are still published.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::constants::{
    PUBLISH_CATALOG, PUBLISH_KEYBOARD_LIST, PUBLISH_KEYBOARD_PREFIX, PUBLISH_LAST_UPDATED,
};
use crate::models::Catalog;

/// Durable storage for named values.
pub trait PublishSink {
    /// Stores `value` under `key`, replacing any previous value.
    fn publish(&mut self, key: &str, value: &Value) -> Result<()>;
}

/// Publishes every keyboard descriptor, the keyboard list, the full catalog,
/// and the last-updated timestamp.
///
/// Returns the number of values that were written successfully.
pub fn publish_catalog(catalog: &Catalog, sink: &mut dyn PublishSink) -> usize {
    let mut entries: Vec<(String, Result<Value, serde_json::Error>)> = catalog
        .keyboard_list
        .iter()
        .filter_map(|keyboard| catalog.keyboards.get(keyboard))
        .map(|info| {
            (
                format!("{PUBLISH_KEYBOARD_PREFIX}{}", info.keyboard_folder),
                serde_json::to_value(info),
            )
        })
        .collect();

    entries.push((
        PUBLISH_KEYBOARD_LIST.to_string(),
        serde_json::to_value(&catalog.keyboard_list),
    ));
    entries.push((PUBLISH_CATALOG.to_string(), serde_json::to_value(catalog)));
    entries.push((
        PUBLISH_LAST_UPDATED.to_string(),
        Ok(Value::String(catalog.last_updated.clone())),
    ));

    let mut published = 0;
    for (key, value) in entries {
        let result = value
            .context(format!("Failed to serialize {key}"))
            .and_then(|value| sink.publish(&key, &value));
        match result {
            Ok(()) => {
                debug!("Published {}", key);
                published += 1;
            }
            Err(e) => error!("Failed to publish {}: {:#}", key, e),
        }
    }

    published
}

/// Sink that writes each value to `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirSink {
    dir: PathBuf,
}

impl JsonDirSink {
    /// Creates a sink writing below `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path a key is written to.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PublishSink for JsonDirSink {
    fn publish(&mut self, key: &str, value: &Value) -> Result<()> {
        let path = self.path_for(key);

        // Keyboard folders nest (e.g., "crkbd/rev1")
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, content)
            .context(format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path).context(format!("Failed to rename to {}", path.display()))?;

        Ok(())
    }
}

/// Sink that keeps values in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Published key → value
    pub values: BTreeMap<String, Value>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PublishSink for MemorySink {
    fn publish(&mut self, key: &str, value: &Value) -> Result<()> {
        self.values.insert(key.to_string(), value.clone());
        Ok(())
    }
}
