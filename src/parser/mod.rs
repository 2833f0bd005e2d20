//! Parsers for QMK source artifacts.
//!
//! This module handles reading `rules.mk` build settings, extracting layout
//! macros and their aliases from keyboard headers, and overlaying info.json
//! overrides onto parsed descriptors.

pub mod aliases;
pub mod info_json;
pub mod layout_macro;
pub mod rules_mk;

// Re-export commonly used items
pub use aliases::AliasTable;
pub use info_json::{merge_all, merge_info_json};
pub use layout_macro::{find_layouts, parse_macro_body, scan_header, HeaderScan, LayoutScanner};
pub use rules_mk::RulesMk;
