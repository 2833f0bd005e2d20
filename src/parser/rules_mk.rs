//! Parser for QMK `rules.mk` build configuration files.
//!
//! Only flat assignments are understood. `KEY = value` overwrites, `KEY += value`
//! appends with a space separator, `KEY ?= value` assigns only when the key is
//! unset, and `KEY := value` behaves like `=`. Comments, blank lines, and lines
//! without an assignment are skipped.

use std::collections::BTreeMap;
use std::path::Path;

use crate::services::SourceTree;

/// Key/value settings accumulated from one or more rules.mk files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulesMk {
    values: BTreeMap<String, String>,
}

impl RulesMk {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses rules.mk text into a fresh configuration.
    pub fn parse(text: &str) -> Self {
        let mut rules = Self::new();
        rules.parse_into(text);
        rules
    }

    /// Parses rules.mk text on top of the existing values.
    pub fn parse_into(&mut self, text: &str) {
        for line in text.lines() {
            if let Some((key, op, value)) = split_assignment(line) {
                self.apply(key, op, value);
            }
        }
    }

    /// Loads a rules.mk file from the source tree.
    ///
    /// A missing file yields an empty configuration.
    pub fn load(source: &dyn SourceTree, path: &Path) -> Self {
        let mut rules = Self::new();
        rules.load_into(source, path);
        rules
    }

    /// Loads a rules.mk file on top of the existing values.
    ///
    /// A missing file leaves the values untouched.
    pub fn load_into(&mut self, source: &dyn SourceTree, path: &Path) {
        if let Some(text) = source.read(path) {
            self.parse_into(&text);
        }
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Checks whether `key` is set.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the whitespace-separated words of `key`'s value.
    pub fn words(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .map(|value| value.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when nothing has been assigned.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn apply(&mut self, key: &str, op: AssignOp, value: &str) {
        match op {
            AssignOp::Set => {
                self.values.insert(key.to_string(), value.to_string());
            }
            AssignOp::Append => match self.values.get_mut(key) {
                Some(existing) => {
                    existing.push(' ');
                    existing.push_str(value);
                }
                None => {
                    self.values.insert(key.to_string(), value.to_string());
                }
            },
            AssignOp::SetIfAbsent => {
                self.values
                    .entry(key.to_string())
                    .or_insert_with(|| value.to_string());
            }
        }
    }
}

/// Assignment flavour of one rules.mk line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssignOp {
    /// `=` or `:=`
    Set,
    /// `+=`
    Append,
    /// `?=`
    SetIfAbsent,
}

/// Splits one line into key, operator, and value. Returns `None` for lines
/// that aren't assignments.
fn split_assignment(line: &str) -> Option<(&str, AssignOp, &str)> {
    let line = line.split('#').next().unwrap_or_default().trim();
    if line.is_empty() {
        return None;
    }

    let (key, op, value) = if let Some((key, value)) = line.split_once("+=") {
        (key, AssignOp::Append, value)
    } else {
        let (key, value) = line.split_once('=')?;
        if let Some(key) = key.strip_suffix('?') {
            (key, AssignOp::SetIfAbsent, value)
        } else {
            (key.strip_suffix(':').unwrap_or(key), AssignOp::Set, value)
        }
    };

    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    Some((key, op, value.trim()))
}
