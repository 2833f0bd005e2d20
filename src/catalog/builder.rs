//! Building the keyboard catalog.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::discovery::{find_all_layouts, find_info_json, HeaderCache, KeyboardRules};
use crate::constants::TIMESTAMP_FORMAT;
use crate::models::{Catalog, KeyboardInfo};
use crate::parser::merge_info_json;
use crate::services::{KeyboardEnumerator, SourceTree};

/// Builds keyboard descriptors and catalogs from a QMK source tree.
///
/// Each keyboard is processed independently; a malformed header or info.json
/// only affects that file's contribution.
pub struct CatalogBuilder<'a> {
    source: &'a dyn SourceTree,
    generated_at: DateTime<Utc>,
    headers: HeaderCache,
}

impl<'a> CatalogBuilder<'a> {
    /// Creates a builder reading from `source`, stamped with the current time.
    pub fn new(source: &'a dyn SourceTree) -> Self {
        Self {
            source,
            generated_at: Utc::now(),
            headers: HeaderCache::new(),
        }
    }

    /// Uses a fixed generation time instead of the current time.
    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Formatted generation time used for `last_updated` fields.
    pub fn timestamp(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Enumerates keyboards and builds the full catalog.
    ///
    /// Fails only when enumeration fails; no catalog is produced then.
    pub fn build(&mut self, enumerator: &dyn KeyboardEnumerator) -> Result<Catalog> {
        let keyboards = enumerator
            .list_keyboards()
            .context("Failed to enumerate keyboards")?;
        Ok(self.build_keyboards(&keyboards))
    }

    /// Builds a catalog covering `keyboards`, in order.
    pub fn build_keyboards(&mut self, keyboards: &[String]) -> Catalog {
        let mut catalog = Catalog::new(self.timestamp());

        for keyboard in keyboards {
            catalog.push(self.build_keyboard(keyboard));
        }

        info!(
            "Built catalog with {} keyboards ({} headers parsed)",
            catalog.len(),
            self.headers.len()
        );
        catalog
    }

    /// Builds the descriptor for one keyboard.
    pub fn build_keyboard(&mut self, keyboard: &str) -> KeyboardInfo {
        let mut keyboard_info = KeyboardInfo::new(keyboard, self.timestamp());

        let rules = KeyboardRules::load(self.source, keyboard);
        let discovery = find_all_layouts(self.source, &mut self.headers, keyboard, &rules);
        debug!(
            "{}: {} layouts{}",
            keyboard,
            discovery.layouts.len(),
            if discovery.used_fallback {
                " (fallback scan)"
            } else {
                ""
            }
        );
        keyboard_info.add_layouts(discovery.layouts);

        for info_json in find_info_json(self.source, keyboard, rules.default_folder.as_deref()) {
            // Vanished between the existence check and the read: nothing to merge
            let Some(text) = self.source.read(&info_json) else {
                continue;
            };
            keyboard_info = merge_info_json(keyboard_info, &info_json.display().to_string(), &text);
        }

        keyboard_info
    }
}

/// Builds a catalog for every keyboard `enumerator` lists.
pub fn build_catalog(
    enumerator: &dyn KeyboardEnumerator,
    source: &dyn SourceTree,
) -> Result<Catalog> {
    CatalogBuilder::new(source).build(enumerator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MemorySourceTree;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
    }

    fn sample_tree() -> MemorySourceTree {
        MemorySourceTree::new()
            .with_file("keyboards/kb/rules.mk", "LAYOUTS = 60_ansi\n")
            .with_file(
                "keyboards/kb/kb.h",
                "#define LAYOUT_all(a, b, c) { a, b, c }\n#define LAYOUT_60_ansi LAYOUT_all\n#define LAYOUT_bar(a) { a }\n",
            )
            .with_file(
                "keyboards/kb/info.json",
                r#"{"manufacturer": "Acme", "layouts": {"LAYOUT_60_ansi": {"layout": [{"x": 0, "y": 0, "w": 6.25}]}}}"#,
            )
    }

    #[test]
    fn test_timestamp_format() {
        let source = MemorySourceTree::new();
        let builder = CatalogBuilder::new(&source).with_generated_at(fixed_time());
        assert_eq!(builder.timestamp(), "2026-01-02 03:04:05 UTC");
    }

    #[test]
    fn test_build_keyboard_end_to_end() {
        let source = sample_tree();
        let mut builder = CatalogBuilder::new(&source).with_generated_at(fixed_time());

        let info = builder.build_keyboard("kb");

        assert_eq!(info.keyboard_name, "kb");
        assert_eq!(info.last_updated, "2026-01-02 03:04:05 UTC");
        assert_eq!(info.metadata_str("manufacturer"), Some("Acme"));
        assert_eq!(info.metadata_str("maintainer"), Some("qmk"));
        assert_eq!(
            info.layouts.keys().collect::<Vec<_>>(),
            vec!["LAYOUT_60_ansi", "LAYOUT_bar"]
        );
        assert_eq!(
            info.layouts["LAYOUT_60_ansi"],
            json!({"layout": [{"x": 0, "y": 0, "w": 6.25}]})
        );
        assert_eq!(info.layouts["LAYOUT_bar"], json!([{"x": 0, "y": 0, "w": 1}]));
    }

    #[test]
    fn test_build_keyboard_without_sources() {
        let source = MemorySourceTree::new();
        let mut builder = CatalogBuilder::new(&source);

        let info = builder.build_keyboard("ghost/rev1");

        assert_eq!(info.keyboard_folder, "ghost/rev1");
        assert!(info.layouts.is_empty());
    }

    #[test]
    fn test_build_collects_catalog() {
        let source = sample_tree().with_file("keyboards/other/other.h", "#define KEYMAP(a) {a}\n");
        let mut builder = CatalogBuilder::new(&source).with_generated_at(fixed_time());
        let keyboards = vec!["other".to_string(), "kb".to_string()];

        let catalog = builder.build(&keyboards).unwrap();

        assert_eq!(catalog.last_updated, "2026-01-02 03:04:05 UTC");
        assert_eq!(catalog.keyboard_list, vec!["other", "kb"]);
        assert!(catalog.keyboards["other"].layouts.contains_key("KEYMAP"));
    }

    #[test]
    fn test_enumeration_failure_is_fatal() {
        struct Broken;
        impl KeyboardEnumerator for Broken {
            fn list_keyboards(&self) -> Result<Vec<String>> {
                anyhow::bail!("make: not found")
            }
        }

        let source = MemorySourceTree::new();
        let result = build_catalog(&Broken, &source);

        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("make: not found"));
    }
}
