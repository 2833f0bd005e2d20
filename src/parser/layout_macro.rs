//! Layout macro extraction from keyboard headers.
//!
//! QMK keyboards describe their physical layouts as preprocessor macros:
//!
//! ```c
//! #define LAYOUT( \
//!     k00, k01, k02, \
//!     k10, k11, k12  \
//! ) { \
//!     { k00, k01, k02 }, \
//!     { k10, k11, k12 }  \
//! }
//! ```
//!
//! The scanner below recovers the macro's argument list and turns every
//! argument into a naive key position: `x` is its index within the source
//! line, `y` the line's index. This is not a preprocessor; conditionals,
//! nested macros, and token pasting are not evaluated.

use crate::constants::{DEFINE_MARKER, LAYOUT_PREFIXES};
use crate::models::{KeyPosition, LayoutMacro, LayoutSet};

use super::aliases::AliasTable;

/// Separator between rows in a cleaned macro body.
const ROW_DELIMITER: char = '\n';

/// Header scanning state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Looking for the start of a layout macro
    Scanning,
    /// Accumulating the lines of a layout macro up to its closing parenthesis
    Collecting,
}

/// Layouts and aliases found in one header, before alias resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderScan {
    /// Layout macros by name
    pub layouts: LayoutSet,
    /// Plain `#define NAME TEXT` substitutions
    pub aliases: AliasTable,
}

impl HeaderScan {
    /// Applies the aliases to the layouts and returns the final set.
    pub fn into_resolved(self) -> LayoutSet {
        let Self {
            mut layouts,
            aliases,
        } = self;
        aliases.resolve(&mut layouts);
        layouts
    }
}

/// Line-oriented scanner for layout macros.
///
/// Feed it a header one line at a time with [`LayoutScanner::feed_line`], then
/// call [`LayoutScanner::finish`]. An unterminated macro at end of input is
/// discarded.
#[derive(Debug)]
pub struct LayoutScanner {
    state: ScanState,
    current: String,
    scan: HeaderScan,
}

impl Default for LayoutScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutScanner {
    /// Creates a scanner in the scanning state.
    pub fn new() -> Self {
        Self {
            state: ScanState::Scanning,
            current: String::new(),
            scan: HeaderScan::default(),
        }
    }

    /// Processes one source line.
    pub fn feed_line(&mut self, line: &str) {
        if self.state == ScanState::Scanning {
            if starts_layout_macro(line) {
                self.state = ScanState::Collecting;
            } else if line.contains(DEFINE_MARKER) {
                // Malformed definitions are expected noise
                self.scan.aliases.register_line(line);
            }
        }

        if self.state == ScanState::Collecting {
            self.current.push_str(line.trim());
            self.current.push(ROW_DELIMITER);

            if line.contains(')') {
                let text = std::mem::take(&mut self.current);
                if let Some(layout) = finalize_macro(&text) {
                    self.scan.layouts.insert(layout);
                }
                self.state = ScanState::Scanning;
            }
        }
    }

    /// Returns everything found so far.
    pub fn finish(self) -> HeaderScan {
        self.scan
    }
}

/// Scans header text for layout macros and aliases without resolving them.
pub fn scan_header(text: &str) -> HeaderScan {
    let mut scanner = LayoutScanner::new();
    for line in text.lines() {
        scanner.feed_line(line);
    }
    scanner.finish()
}

/// Scans header text and returns its layouts with aliases applied.
pub fn find_layouts(text: &str) -> LayoutSet {
    scan_header(text).into_resolved()
}

/// Checks whether a line opens a layout macro definition.
fn starts_layout_macro(line: &str) -> bool {
    line.contains(DEFINE_MARKER)
        && line.contains('(')
        && LAYOUT_PREFIXES.iter().any(|prefix| line.contains(prefix))
}

/// Turns the collected text of one macro definition into a layout.
///
/// Returns `None` when the text has no parameter list or the macro name
/// doesn't start with a layout prefix.
fn finalize_macro(text: &str) -> Option<LayoutMacro> {
    let cleaned: String = text
        .replace('\\', "")
        .chars()
        .filter(|c| *c == ROW_DELIMITER || !c.is_whitespace())
        .collect::<String>()
        .replace(DEFINE_MARKER, "");

    let (name, rest) = cleaned.split_once('(')?;
    let name = name.trim_matches(ROW_DELIMITER);
    if !LAYOUT_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
        return None;
    }

    let body = rest.split(')').next().unwrap_or_default();
    Some(LayoutMacro::new(name, parse_macro_body(body)))
}

/// Converts a cleaned macro parameter list into naive key positions.
///
/// Rows are separated by newlines and entries within a row by commas. Every
/// entry produces a position, including the empty entry after a trailing
/// comma. Leading and trailing newlines are ignored.
pub fn parse_macro_body(body: &str) -> Vec<KeyPosition> {
    body.trim_matches(ROW_DELIMITER)
        .split(ROW_DELIMITER)
        .enumerate()
        .flat_map(|(row, line)| {
            line.split(',')
                .enumerate()
                .map(move |(col, _)| KeyPosition::naive(col, row))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(keys: &[KeyPosition]) -> Vec<(usize, usize)> {
        keys.iter().map(|k| (k.x, k.y)).collect()
    }

    #[test]
    fn test_parse_macro_body_trailing_comma() {
        let keys = parse_macro_body("k1,k2,\nk3");
        assert_eq!(
            coords(&keys),
            vec![(0, 0), (1, 0), (2, 0), (0, 1)]
        );
        assert!(keys.iter().all(|k| k.w == 1));
    }

    #[test]
    fn test_parse_macro_body_counts_entries() {
        let keys = parse_macro_body("a,b,c\nd,e\nf,g,h,i");
        assert_eq!(keys.len(), 9);

        let row_starts: Vec<_> = keys.iter().filter(|k| k.x == 0).map(|k| k.y).collect();
        assert_eq!(row_starts, vec![0, 1, 2]);
        assert_eq!(keys[8].x, 3);
        assert_eq!(keys[8].y, 2);
    }

    #[test]
    fn test_parse_macro_body_ignores_outer_newlines() {
        let keys = parse_macro_body("\na,b\nc\n");
        assert_eq!(coords(&keys), vec![(0, 0), (1, 0), (0, 1)]);
    }

    #[test]
    fn test_parse_macro_body_is_independent_per_call() {
        let first = parse_macro_body("a,b\nc,d");
        let second = parse_macro_body("e");
        assert_eq!(first.len(), 4);
        assert_eq!(coords(&second), vec![(0, 0)]);
    }

    #[test]
    fn test_single_line_macro_with_alias() {
        let layouts = find_layouts("#define LAYOUT_foo(a,b) {a,b}\n#define LAYOUT2 LAYOUT_foo\n");

        assert_eq!(layouts.names().collect::<Vec<_>>(), vec!["LAYOUT2"]);
        assert_eq!(
            coords(layouts.get("LAYOUT2").unwrap()),
            vec![(0, 0), (1, 0)]
        );
    }

    #[test]
    fn test_multi_line_macro() {
        let header = r"
#pragma once

#include QMK_KEYBOARD_H

#define LAYOUT( \
    k00, k01, k02, \
    k10, k11, k12  \
) { \
    { k00, k01, k02 }, \
    { k10, k11, k12 }  \
}
";
        let layouts = find_layouts(header);
        let keys = layouts.get("LAYOUT").unwrap();

        // Each row ends with a comma except the last
        assert_eq!(keys.len(), 7);
        assert_eq!(keys[3].x, 3);
        assert_eq!(keys[3].y, 0);
        assert_eq!(keys[4].x, 0);
        assert_eq!(keys[4].y, 1);
    }

    #[test]
    fn test_tabs_and_carriage_returns_stripped() {
        let header = "#define LAYOUT_ortho(\t\\\r\n\ta,\tb\t\\\r\n)\t{ }\r\n";
        let layouts = find_layouts(header);
        assert_eq!(
            coords(layouts.get("LAYOUT_ortho").unwrap()),
            vec![(0, 0), (1, 0)]
        );
    }

    #[test]
    fn test_keymap_prefix_accepted() {
        let layouts = find_layouts("#define KEYMAP(a, b, c) { a, b, c }\n");
        assert_eq!(layouts.get("KEYMAP").unwrap().len(), 3);
    }

    #[test]
    fn test_non_layout_function_macro_rejected() {
        // Mentions LAYOUT but the macro itself is named differently
        let layouts = find_layouts("#define MY_LAYOUT(a) { a }\n#define LAYOUT_a(x) {x}\n");
        assert_eq!(layouts.names().collect::<Vec<_>>(), vec!["LAYOUT_a"]);
    }

    #[test]
    fn test_redefinition_last_wins() {
        let layouts = find_layouts("#define LAYOUT(a) {a}\n#define LAYOUT(a, b, c) {a, b, c}\n");
        assert_eq!(layouts.len(), 1);
        assert_eq!(layouts.get("LAYOUT").unwrap().len(), 3);
    }

    #[test]
    fn test_unterminated_macro_discarded() {
        let layouts = find_layouts("#define LAYOUT( \\\n  a, b \\\n");
        assert!(layouts.is_empty());
    }

    #[test]
    fn test_collecting_swallows_defines_until_close() {
        let header = "#define LAYOUT( \\\n#define NOT_AN_ALIAS X \\\n a)\n#define LAYOUT_60 LAYOUT\n";
        let scan = scan_header(header);

        assert!(scan.aliases.get("NOT_AN_ALIAS").is_none());
        assert_eq!(scan.aliases.get("LAYOUT_60"), Some("LAYOUT"));
        assert!(scan.layouts.contains("LAYOUT"));
    }

    #[test]
    fn test_scanner_fed_line_by_line() {
        let mut scanner = LayoutScanner::new();
        scanner.feed_line("#define LAYOUT_split( \\");
        scanner.feed_line("  l0, l1, r0, r1 \\");
        scanner.feed_line(") { }");
        scanner.feed_line("#define MATRIX_ROWS 4");
        let scan = scanner.finish();

        assert_eq!(scan.layouts.get("LAYOUT_split").unwrap().len(), 4);
        assert_eq!(scan.aliases.get("MATRIX_ROWS"), Some("4"));
    }

    #[test]
    fn test_header_without_layouts() {
        let header = "#pragma once\n#define MATRIX_ROWS 5\n#define DIODE_DIRECTION COL2ROW\n";
        assert!(find_layouts(header).is_empty());
    }
}
