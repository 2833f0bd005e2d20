//! Naive key positions recovered from layout macros.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A single key's naive position within a layout macro.
///
/// `x` is the key's index in its source row and `y` the row index. Real
/// coordinates only come from info.json, which is carried through as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPosition {
    /// Column index within the row
    pub x: usize,
    /// Row index
    pub y: usize,
    /// Key width in keyboard units
    #[serde(default = "default_key_width")]
    pub w: u32,
}

fn default_key_width() -> u32 {
    1
}

impl KeyPosition {
    /// Creates a naive one-unit key at the given column and row.
    pub fn naive(col: usize, row: usize) -> Self {
        Self {
            x: col,
            y: row,
            w: default_key_width(),
        }
    }

    /// JSON form published in keyboard descriptors.
    pub fn to_json(self) -> Value {
        json!({ "x": self.x, "y": self.y, "w": self.w })
    }
}
