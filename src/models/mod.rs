//! Data models for keyboard layouts and catalog output.

pub mod key_position;
pub mod keyboard_info;
pub mod layout_set;

pub use key_position::KeyPosition;
pub use keyboard_info::{Catalog, KeyboardInfo};
pub use layout_set::{LayoutMacro, LayoutSet};
