//! Layout macros and the per-keyboard set of layouts discovered for them.

use std::collections::BTreeMap;

use super::KeyPosition;

/// A layout macro parsed from a header: its name and naive key positions.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutMacro {
    /// Macro name (e.g., "LAYOUT_60_ansi")
    pub name: String,
    /// Key positions in source order
    pub keys: Vec<KeyPosition>,
}

impl LayoutMacro {
    /// Creates a layout macro.
    pub fn new(name: impl Into<String>, keys: Vec<KeyPosition>) -> Self {
        Self {
            name: name.into(),
            keys,
        }
    }
}

/// Layouts discovered for one keyboard, keyed by macro name.
///
/// A name maps to exactly one key list; inserting a macro under an existing
/// name replaces the earlier definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSet {
    layouts: BTreeMap<String, Vec<KeyPosition>>,
}

impl LayoutSet {
    /// Creates an empty layout set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a layout macro, returning the keys it replaced, if any.
    pub fn insert(&mut self, layout: LayoutMacro) -> Option<Vec<KeyPosition>> {
        self.layouts.insert(layout.name, layout.keys)
    }

    /// Removes a layout by name.
    pub fn remove(&mut self, name: &str) -> Option<Vec<KeyPosition>> {
        self.layouts.remove(name)
    }

    /// Returns the keys of a layout.
    pub fn get(&self, name: &str) -> Option<&Vec<KeyPosition>> {
        self.layouts.get(name)
    }

    /// Checks whether a layout with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    /// Layout names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(String::as_str)
    }

    /// Number of layouts.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Returns true when no layouts were found.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Merges another set into this one; layouts in `other` win on name clashes.
    pub fn extend(&mut self, other: LayoutSet) {
        self.layouts.extend(other.layouts);
    }

    /// Consumes the set, returning the underlying name → keys map.
    pub fn into_map(self) -> BTreeMap<String, Vec<KeyPosition>> {
        self.layouts
    }
}

impl FromIterator<LayoutMacro> for LayoutSet {
    fn from_iter<I: IntoIterator<Item = LayoutMacro>>(iter: I) -> Self {
        let mut set = Self::new();
        for layout in iter {
            set.insert(layout);
        }
        set
    }
}
