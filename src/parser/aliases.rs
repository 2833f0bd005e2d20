//! Non-parametrized `#define`s that rename layout macros.
//!
//! Headers commonly declare `#define LAYOUT_60_ansi LAYOUT` so a keyboard can
//! expose a community layout name for its own macro. After a header has been
//! scanned, each alias whose reference names a discovered layout takes over
//! that layout's keys and the referenced name is dropped.

use std::collections::{BTreeMap, BTreeSet};

use crate::constants::DEFINE_MARKER;
use crate::models::{LayoutMacro, LayoutSet};

/// Plain textual substitutions collected from one header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
}

impl AliasTable {
    /// Creates an empty alias table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` as referring to `reference`, replacing an earlier definition.
    pub fn insert(&mut self, name: impl Into<String>, reference: impl Into<String>) {
        self.aliases.insert(name.into(), reference.into());
    }

    /// Registers an alias from a `#define NAME TEXT` line.
    ///
    /// Returns false (and registers nothing) when the line isn't a definition
    /// with both a name and replacement text.
    pub fn register_line(&mut self, line: &str) -> bool {
        let mut tokens = line.trim().splitn(3, char::is_whitespace);
        let (Some(marker), Some(name), Some(text)) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return false;
        };

        let text = text.trim();
        if marker != DEFINE_MARKER || name.is_empty() || text.is_empty() {
            return false;
        }

        self.insert(name, text);
        true
    }

    /// Returns the reference text of an alias.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns true when no aliases were registered.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Renames layouts in `layouts` according to this table.
    ///
    /// Every alias whose reference (directly or through other aliases) names a
    /// layout in the set receives that layout's keys; every name referenced on
    /// the way is then removed. All lookups happen against the set as it was
    /// before the call, and removals are applied last, so declaration order
    /// doesn't matter and repeating the call changes nothing.
    pub fn resolve(&self, layouts: &mut LayoutSet) {
        let mut additions = Vec::new();
        let mut superseded = BTreeSet::new();

        for name in self.aliases.keys() {
            if let Some(chain) = self.reference_chain(name, layouts) {
                if let Some(keys) = chain.last().and_then(|root| layouts.get(root)) {
                    additions.push(LayoutMacro::new(name.clone(), keys.clone()));
                    superseded.extend(chain);
                }
            }
        }

        for layout in additions {
            layouts.insert(layout);
        }
        for name in superseded {
            layouts.remove(name);
        }
    }

    /// Follows `alias` until reaching a layout present in `layouts`.
    ///
    /// Returns the names visited after `alias` itself, ending with the layout.
    /// Aliases that never reach a layout, that loop before reaching one, or
    /// whose layout is itself an alias leading back along the walk, resolve
    /// to nothing.
    fn reference_chain<'a>(&'a self, alias: &'a str, layouts: &LayoutSet) -> Option<Vec<&'a str>> {
        let mut visited = BTreeSet::from([alias]);
        let mut chain = Vec::new();
        let mut current = self.get(alias)?;
        loop {
            if visited.contains(current) {
                return None;
            }
            if layouts.contains(current) {
                if self.loops_back(current, &visited) {
                    return None;
                }
                chain.push(current);
                return Some(chain);
            }
            visited.insert(current);
            chain.push(current);
            current = self.get(current)?;
        }
    }

    /// Checks whether the aliases starting at `layout` reach any of `earlier`.
    fn loops_back(&self, layout: &str, earlier: &BTreeSet<&str>) -> bool {
        let mut seen = BTreeSet::from([layout]);
        let mut current = layout;
        while let Some(next) = self.get(current) {
            if earlier.contains(next) {
                return true;
            }
            if !seen.insert(next) {
                return false;
            }
            current = next;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeyPosition;

    fn layout(name: &str, count: usize) -> LayoutMacro {
        LayoutMacro::new(name, (0..count).map(|x| KeyPosition::naive(x, 0)).collect())
    }

    #[test]
    fn test_register_line() {
        let mut aliases = AliasTable::new();
        assert!(aliases.register_line("#define LAYOUT_60_ansi LAYOUT\n"));
        assert!(aliases.register_line("#define\tKEYMAP LAYOUT_all"));
        assert_eq!(aliases.get("LAYOUT_60_ansi"), Some("LAYOUT"));
        assert_eq!(aliases.get("KEYMAP"), Some("LAYOUT_all"));
    }

    #[test]
    fn test_register_line_keeps_remainder_verbatim() {
        let mut aliases = AliasTable::new();
        assert!(aliases.register_line("#define XXX KC_NO // blank"));
        assert_eq!(aliases.get("XXX"), Some("KC_NO // blank"));
    }

    #[test]
    fn test_register_line_rejects_malformed() {
        let mut aliases = AliasTable::new();
        assert!(!aliases.register_line("#define RGBLIGHT_ENABLE"));
        assert!(!aliases.register_line("#define"));
        assert!(!aliases.register_line("#pragma once"));
        assert!(!aliases.register_line("// #define A B"));
        assert!(aliases.is_empty());
    }

    #[test]
    fn test_resolve_renames_layout() {
        let mut layouts: LayoutSet = [layout("LAYOUT_foo", 2), layout("LAYOUT_bar", 3)]
            .into_iter()
            .collect();
        let mut aliases = AliasTable::new();
        aliases.insert("LAYOUT2", "LAYOUT_foo");
        aliases.insert("MATRIX_ROWS", "4");

        aliases.resolve(&mut layouts);

        assert_eq!(layouts.names().collect::<Vec<_>>(), vec!["LAYOUT2", "LAYOUT_bar"]);
        assert_eq!(layouts.get("LAYOUT2").unwrap().len(), 2);
    }

    #[test]
    fn test_resolve_two_aliases_for_one_layout() {
        let mut layouts: LayoutSet = [layout("LAYOUT", 4)].into_iter().collect();
        let mut aliases = AliasTable::new();
        aliases.insert("LAYOUT_60_ansi", "LAYOUT");
        aliases.insert("KEYMAP", "LAYOUT");

        aliases.resolve(&mut layouts);

        assert_eq!(layouts.names().collect::<Vec<_>>(), vec!["KEYMAP", "LAYOUT_60_ansi"]);
        assert_eq!(layouts.get("KEYMAP"), layouts.get("LAYOUT_60_ansi"));
    }

    #[test]
    fn test_resolve_follows_chains() {
        let mut layouts: LayoutSet = [layout("LAYOUT_all", 5)].into_iter().collect();
        let mut aliases = AliasTable::new();
        aliases.insert("LAYOUT_60_ansi", "LAYOUT_all");
        aliases.insert("KEYMAP", "LAYOUT_60_ansi");

        aliases.resolve(&mut layouts);

        assert_eq!(layouts.names().collect::<Vec<_>>(), vec!["KEYMAP"]);
        assert_eq!(layouts.get("KEYMAP").unwrap().len(), 5);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut layouts: LayoutSet = [layout("LAYOUT_all", 5), layout("LAYOUT_iso", 6)]
            .into_iter()
            .collect();
        let mut aliases = AliasTable::new();
        aliases.insert("LAYOUT_60_ansi", "LAYOUT_all");
        aliases.insert("KEYMAP", "LAYOUT_60_ansi");
        aliases.insert("LAYOUT_60_iso", "LAYOUT_iso");

        aliases.resolve(&mut layouts);
        let once = layouts.clone();
        aliases.resolve(&mut layouts);

        assert_eq!(layouts, once);
        assert!(!layouts.contains("LAYOUT_all"));
        assert!(!layouts.contains("LAYOUT_iso"));
    }

    #[test]
    fn test_resolve_ignores_self_and_cyclic_aliases() {
        let mut layouts: LayoutSet = [layout("LAYOUT", 2), layout("LAYOUT_b", 3)]
            .into_iter()
            .collect();
        let mut aliases = AliasTable::new();
        aliases.insert("LAYOUT", "LAYOUT");
        aliases.insert("LAYOUT_b", "LAYOUT_c");
        aliases.insert("LAYOUT_c", "LAYOUT_b");

        aliases.resolve(&mut layouts);

        assert_eq!(layouts.len(), 2);
        assert_eq!(layouts.get("LAYOUT").unwrap().len(), 2);
        assert_eq!(layouts.get("LAYOUT_b").unwrap().len(), 3);
    }

    #[test]
    fn test_resolve_past_self_aliased_layout() {
        let mut layouts: LayoutSet = [layout("LAYOUT", 2)].into_iter().collect();
        let mut aliases = AliasTable::new();
        aliases.insert("X", "LAYOUT");
        aliases.insert("LAYOUT", "LAYOUT");

        aliases.resolve(&mut layouts);
        assert_eq!(layouts.names().collect::<Vec<_>>(), vec!["X"]);
        assert_eq!(layouts.get("X").unwrap().len(), 2);

        let once = layouts.clone();
        aliases.resolve(&mut layouts);
        assert_eq!(layouts, once);
    }

    #[test]
    fn test_resolve_ignores_loop_beyond_layout_elsewhere() {
        let mut layouts: LayoutSet = [layout("LAYOUT_all", 3)].into_iter().collect();
        let mut aliases = AliasTable::new();
        aliases.insert("LAYOUT_60_ansi", "LAYOUT_all");
        aliases.insert("LAYOUT_all", "LAYOUT_loop");
        aliases.insert("LAYOUT_loop", "LAYOUT_all");

        aliases.resolve(&mut layouts);

        assert_eq!(layouts.names().collect::<Vec<_>>(), vec!["LAYOUT_60_ansi"]);
    }

    #[test]
    fn test_resolve_without_matches_is_noop() {
        let mut layouts: LayoutSet = [layout("LAYOUT", 2)].into_iter().collect();
        let mut aliases = AliasTable::new();
        aliases.insert("MATRIX_COLS", "12");
        aliases.insert("LAYOUT_ortho", "LAYOUT_missing");

        aliases.resolve(&mut layouts);

        assert_eq!(layouts.names().collect::<Vec<_>>(), vec!["LAYOUT"]);
    }
}
