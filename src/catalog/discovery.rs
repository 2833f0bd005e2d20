//! Locating a keyboard's layout headers, rules.mk settings, and info.json files.
//!
//! QMK keyboards nest: `keyboards/crkbd/rev1` inherits from `keyboards/crkbd`.
//! Headers named after each path component (`crkbd/crkbd.h`,
//! `crkbd/rev1/rev1.h`) hold the layout macros, and info.json files at any
//! level may override metadata and key positions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::constants::{COMMUNITY_LAYOUT_PREFIXES, INFO_JSON_MAX_DEPTH};
use crate::models::LayoutSet;
use crate::parser::{find_layouts, RulesMk};
use crate::services::SourceTree;

/// Directory holding all keyboards, relative to the QMK root.
pub const KEYBOARDS_DIR: &str = "keyboards";

/// rules.mk key redirecting a keyboard to its default revision.
pub const DEFAULT_FOLDER_KEY: &str = "DEFAULT_FOLDER";

/// rules.mk key listing the community layouts a keyboard supports.
pub const LAYOUTS_KEY: &str = "LAYOUTS";

/// Returns `keyboards/<keyboard>`.
pub fn keyboard_dir(keyboard: &str) -> PathBuf {
    Path::new(KEYBOARDS_DIR).join(keyboard)
}

/// Build settings for one keyboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardRules {
    /// Values from the keyboard's rules.mk, layered with its default folder's
    pub rules: RulesMk,
    /// `DEFAULT_FOLDER` as set by the keyboard's own rules.mk
    pub default_folder: Option<String>,
}

impl KeyboardRules {
    /// Loads `keyboards/<keyboard>/rules.mk`.
    ///
    /// When it sets `DEFAULT_FOLDER`, that folder's rules.mk is parsed into the
    /// same settings so the keyboard sees its default revision's values.
    pub fn load(source: &dyn SourceTree, keyboard: &str) -> Self {
        let mut rules = RulesMk::load(source, &keyboard_dir(keyboard).join("rules.mk"));
        let default_folder = rules
            .get(DEFAULT_FOLDER_KEY)
            .filter(|folder| !folder.is_empty())
            .map(str::to_string);

        if let Some(folder) = default_folder.as_deref().filter(|folder| *folder != keyboard) {
            rules.load_into(source, &keyboard_dir(folder).join("rules.mk"));
        }

        Self {
            rules,
            default_folder,
        }
    }
}

/// Result of searching a keyboard's headers for layouts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutDiscovery {
    /// Layouts found, aliases applied
    pub layouts: LayoutSet,
    /// Whether the per-level headers had nothing and every header was scanned
    pub used_fallback: bool,
    /// `LAYOUTS` entries from rules.mk without a matching macro
    pub missing_layouts: Vec<String>,
}

/// Parses layout headers, caching results by path.
///
/// Parent headers are shared by every revision beneath them, so one run reads
/// each at most once.
#[derive(Debug, Default)]
pub struct HeaderCache {
    parsed: HashMap<PathBuf, LayoutSet>,
}

impl HeaderCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the layouts in the header at `path`; missing files have none.
    pub fn layouts(&mut self, source: &dyn SourceTree, path: &Path) -> LayoutSet {
        self.parsed
            .entry(path.to_path_buf())
            .or_insert_with(|| {
                source
                    .read(path)
                    .map(|text| find_layouts(&text))
                    .unwrap_or_default()
            })
            .clone()
    }

    /// Number of headers parsed so far.
    pub fn len(&self) -> usize {
        self.parsed.len()
    }

    /// Returns true when nothing has been parsed.
    pub fn is_empty(&self) -> bool {
        self.parsed.is_empty()
    }
}

/// Finds every layout macro associated with `keyboard`.
///
/// Standard headers are `<level>/<level>.h` at each level of the keyboard
/// path; layouts from deeper levels replace same-named ones from shallower
/// levels. When none of those define a layout, every header directly inside
/// the keyboard's directory (or its `DEFAULT_FOLDER`) is scanned instead.
pub fn find_all_layouts(
    source: &dyn SourceTree,
    cache: &mut HeaderCache,
    keyboard: &str,
    rules: &KeyboardRules,
) -> LayoutDiscovery {
    let mut layouts = LayoutSet::new();
    let mut current_path = PathBuf::from(KEYBOARDS_DIR);

    for directory in keyboard.split('/').filter(|d| !d.is_empty()) {
        current_path.push(directory);
        let header = current_path.join(format!("{directory}.h"));
        if source.exists(&header) {
            layouts.extend(cache.layouts(source, &header));
        }
    }

    let used_fallback = layouts.is_empty();
    if used_fallback {
        warn!("{}: Falling back to searching for KEYMAP/LAYOUT macros.", keyboard);

        let layout_dir = keyboard_dir(rules.default_folder.as_deref().unwrap_or(keyboard));
        for file in source.list_files(&layout_dir, "h") {
            let found = cache.layouts(source, &file);
            if !found.is_empty() {
                layouts.extend(found);
            }
        }
    }

    let missing_layouts = missing_layouts(&rules.rules, &layouts);
    if !missing_layouts.is_empty() {
        warn!(
            "*** {}: Missing layout pp macro for {:?}",
            keyboard, missing_layouts
        );
    }

    LayoutDiscovery {
        layouts,
        used_fallback,
        missing_layouts,
    }
}

/// Returns the `LAYOUTS` entries with no matching `LAYOUT_<name>` macro.
pub fn missing_layouts(rules: &RulesMk, layouts: &LayoutSet) -> Vec<String> {
    let mut supported: Vec<String> = rules
        .words(LAYOUTS_KEY)
        .into_iter()
        .map(str::to_string)
        .collect();

    for name in layouts.names() {
        let Some(community_name) = COMMUNITY_LAYOUT_PREFIXES
            .iter()
            .find_map(|prefix| name.strip_prefix(prefix))
        else {
            continue;
        };
        if let Some(idx) = supported.iter().position(|s| s == community_name) {
            supported.remove(idx);
        }
    }

    supported
}

/// Lists the info.json files that apply to `keyboard`, least specific first.
///
/// Up to five levels of the keyboard path are checked, ending with the
/// keyboard itself, followed by its `DEFAULT_FOLDER` directory.
pub fn find_info_json(
    source: &dyn SourceTree,
    keyboard: &str,
    default_folder: Option<&str>,
) -> Vec<PathBuf> {
    let components: Vec<&str> = keyboard.split('/').filter(|c| !c.is_empty()).collect();
    let first_level = components.len().saturating_sub(INFO_JSON_MAX_DEPTH - 1).max(1);

    let mut candidates: Vec<PathBuf> = (first_level..=components.len())
        .map(|depth| keyboard_dir(&components[..depth].join("/")).join("info.json"))
        .collect();

    // The default folder's own info.json; its ancestors are covered above
    if let Some(folder) = default_folder {
        candidates.push(keyboard_dir(folder).join("info.json"));
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for candidate in candidates {
        if source.exists(&candidate) && !files.contains(&candidate) {
            files.push(candidate);
        }
    }
    files
}
