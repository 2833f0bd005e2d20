//! Application-wide constants.
//!
//! This module defines the naming conventions used to recognize layout
//! macros and the keys under which results are published.

/// Directory name used under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "qmk-catalog";

/// Preprocessor directive that introduces a macro definition.
pub const DEFINE_MARKER: &str = "#define";

/// Prefixes a macro name must start with to be treated as a layout macro.
pub const LAYOUT_PREFIXES: [&str; 2] = ["LAYOUT", "KEYMAP"];

/// Prefixes stripped from layout names before matching against `LAYOUTS` in rules.mk.
pub const COMMUNITY_LAYOUT_PREFIXES: [&str; 2] = ["LAYOUT_", "KEYMAP_"];

/// Metadata fields an info.json may override, besides `keyboard_name`.
pub const METADATA_FIELDS: [&str; 8] = [
    "manufacturer",
    "identifier",
    "url",
    "maintainer",
    "processor",
    "bootloader",
    "width",
    "height",
];

/// Maintainer recorded for keyboards whose info.json doesn't name one.
pub const DEFAULT_MAINTAINER: &str = "qmk";

/// Maximum number of path levels searched for info.json files.
pub const INFO_JSON_MAX_DEPTH: usize = 5;

/// Timestamp format used for `last_updated` fields.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// Publish key prefix for per-keyboard descriptors.
pub const PUBLISH_KEYBOARD_PREFIX: &str = "qmk_api_kb_";

/// Publish key for the keyboard name list.
pub const PUBLISH_KEYBOARD_LIST: &str = "qmk_api_keyboards";

/// Publish key for the full catalog.
pub const PUBLISH_CATALOG: &str = "qmk_api_kb_all";

/// Publish key for the last-updated timestamp.
pub const PUBLISH_LAST_UPDATED: &str = "qmk_api_last_updated";
