//! info.json overrides for keyboard descriptors.
//!
//! Layout macros only give naive key positions. A keyboard's info.json files
//! carry authoritative metadata and real coordinates; this module overlays them
//! onto a descriptor built from the macro scan.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::constants::METADATA_FIELDS;
use crate::models::KeyboardInfo;

/// Checks that an info.json layout entry holds a key list.
///
/// QMK nests key lists as `{"layout": [...]}`; older files and generated data
/// use a bare list. The entry itself is kept exactly as written.
fn is_layout_entry(layout: &Value) -> bool {
    match layout {
        Value::Array(_) => true,
        Value::Object(entry) => entry.get("layout").is_some_and(Value::is_array),
        _ => false,
    }
}

/// Decodes info.json text into its top-level object.
///
/// Fails when the text isn't JSON or isn't a JSON object.
pub fn decode_info_json(text: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(text).context("Invalid JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("Should be a JSON dict object"),
    }
}

/// Overlays one info.json document onto `info`.
///
/// `source` names the document in log messages. A document that can't be
/// decoded is logged and leaves `info` unchanged.
pub fn merge_info_json(mut info: KeyboardInfo, source: &str, text: &str) -> KeyboardInfo {
    match decode_info_json(text) {
        Ok(document) => {
            apply_overrides(&mut info, source, &document);
            debug!("{}: merged {}", info.keyboard_folder, source);
        }
        Err(e) => error!("{} is invalid! {:#}", source, e),
    }
    info
}

/// Overlays several documents in order; later documents win.
pub fn merge_all<'a, I>(info: KeyboardInfo, documents: I) -> KeyboardInfo
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    documents
        .into_iter()
        .fold(info, |info, (source, text)| merge_info_json(info, source, text))
}

fn apply_overrides(info: &mut KeyboardInfo, source: &str, document: &Map<String, Value>) {
    match document.get("keyboard_name") {
        Some(Value::String(name)) => info.keyboard_name.clone_from(name),
        Some(other) => warn!("{}: ignoring non-string keyboard_name {}", source, other),
        None => {}
    }

    for field in METADATA_FIELDS {
        if let Some(value) = document.get(field) {
            info.metadata.insert(field.to_string(), value.clone());
        }
    }

    let Some(layouts) = document.get("layouts") else {
        return;
    };
    let Some(layouts) = layouts.as_object() else {
        error!("{}: layouts should be a JSON dict object", source);
        return;
    };

    for (name, layout) in layouts {
        // Only layouts the macro scan found can be replaced
        let Some(existing) = info.layouts.get_mut(name) else {
            continue;
        };

        if is_layout_entry(layout) {
            existing.clone_from(layout);
        } else {
            error!("{}: invalid layout {}: expected a key list", source, name);
        }
    }
}
