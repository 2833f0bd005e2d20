//! Catalog construction.
//!
//! Ties the parsers together: for each keyboard, rules.mk settings decide
//! where to look, headers supply naive layouts, and info.json files override
//! metadata and geometry.

pub mod builder;
pub mod discovery;

pub use builder::{build_catalog, CatalogBuilder};
pub use discovery::{find_all_layouts, find_info_json, HeaderCache, KeyboardRules, LayoutDiscovery};
