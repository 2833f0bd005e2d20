//! Per-keyboard descriptors and the aggregate catalog.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::LayoutSet;
use crate::constants::DEFAULT_MAINTAINER;

/// Final descriptor for one keyboard.
///
/// Serializes to the flat JSON object published per keyboard: identity fields,
/// whitelisted metadata fields (flattened), and the layout map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardInfo {
    /// Time this descriptor was generated
    pub last_updated: String,
    /// Display name; starts as the keyboard folder, overridable by info.json
    pub keyboard_name: String,
    /// Keyboard folder relative to `keyboards/`
    pub keyboard_folder: String,
    /// Layout name → key list, either naive positions or an info.json
    /// layout entry exactly as written
    pub layouts: BTreeMap<String, Value>,
    /// Whitelisted metadata (manufacturer, url, maintainer, width, ...)
    #[serde(flatten)]
    pub metadata: BTreeMap<String, Value>,
}

impl KeyboardInfo {
    /// Creates a descriptor shell with no layouts and default metadata.
    pub fn new(keyboard: &str, last_updated: impl Into<String>) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert(
            "maintainer".to_string(),
            Value::String(DEFAULT_MAINTAINER.to_string()),
        );

        Self {
            last_updated: last_updated.into(),
            keyboard_name: keyboard.to_string(),
            keyboard_folder: keyboard.to_string(),
            layouts: BTreeMap::new(),
            metadata,
        }
    }

    /// Adds discovered layouts, replacing any with the same names.
    pub fn add_layouts(&mut self, layouts: LayoutSet) {
        for (name, keys) in layouts.into_map() {
            let keys = keys.into_iter().map(|key| key.to_json()).collect();
            self.layouts.insert(name, Value::Array(keys));
        }
    }

    /// Returns the key list of a layout.
    ///
    /// Understands both a bare list and QMK's `{"layout": [...]}` entry.
    pub fn layout_keys(&self, name: &str) -> Option<&Vec<Value>> {
        match self.layouts.get(name)? {
            Value::Array(keys) => Some(keys),
            Value::Object(entry) => entry.get("layout").and_then(Value::as_array),
            _ => None,
        }
    }

    /// Returns a metadata value as a string, if present and a string.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}

/// Every keyboard processed in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Time the catalog was generated
    pub last_updated: String,
    /// Keyboard folder → descriptor
    pub keyboards: BTreeMap<String, KeyboardInfo>,
    /// Keyboard folders in processing order
    #[serde(skip)]
    pub keyboard_list: Vec<String>,
}

impl Catalog {
    /// Creates an empty catalog stamped with the given time.
    pub fn new(last_updated: impl Into<String>) -> Self {
        Self {
            last_updated: last_updated.into(),
            keyboards: BTreeMap::new(),
            keyboard_list: Vec::new(),
        }
    }

    /// Adds a finished descriptor under its keyboard folder.
    pub fn push(&mut self, info: KeyboardInfo) {
        self.keyboard_list.push(info.keyboard_folder.clone());
        self.keyboards.insert(info.keyboard_folder.clone(), info);
    }

    /// Number of keyboards in the catalog.
    pub fn len(&self) -> usize {
        self.keyboards.len()
    }

    /// Returns true when the catalog holds no keyboards.
    pub fn is_empty(&self) -> bool {
        self.keyboards.is_empty()
    }
}
