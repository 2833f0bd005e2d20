//! QMK Catalog Library
//!
//! This library extracts physical layout metadata for QMK keyboards from
//! `rules.mk` files, layout macros in keyboard headers, and info.json
//! overrides, and reduces them to one descriptor per keyboard.

// Module declarations
pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod models;
pub mod parser;
pub mod services;
