//! Shared test fixtures for catalog and CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway QMK checkout laid out on disk.
pub struct MockQmk {
    dir: TempDir,
}

impl MockQmk {
    /// Creates an empty checkout with a Makefile and keyboards/ directory.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("keyboards")).unwrap();
        fs::write(dir.path().join("Makefile"), "list-keyboards:\n").unwrap();
        Self { dir }
    }

    /// Root of the checkout.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `keyboards/<relative>` with the given content.
    pub fn write(&self, relative: &str, content: &str) -> &Self {
        let path = self.path().join("keyboards").join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    /// Output directory inside the temp dir.
    pub fn output_dir(&self) -> PathBuf {
        self.path().join("out")
    }
}

/// Header using the per-level naming convention, with a community alias.
pub const PLANCK_HEADER: &str = r"#pragma once

#include QMK_KEYBOARD_H

#define LAYOUT_ortho_4x4( \
    k00, k01, k02, k03, \
    k10, k11, k12, k13, \
    k20, k21, k22, k23, \
    k30, k31, k32, k33  \
) { \
    { k00, k01, k02, k03 }, \
    { k10, k11, k12, k13 }, \
    { k20, k21, k22, k23 }, \
    { k30, k31, k32, k33 }  \
}

#define LAYOUT_planck_mit(a, b, c) { { a, b, c } }
#define KEYMAP LAYOUT_ortho_4x4
";

/// Builds a checkout with three keyboards:
///
/// - `planck/rev6`: layouts in `planck/planck.h`, metadata in both info.json levels
/// - `handwired/oddball`: no standard header, layouts only in `matrix.h`
/// - `broken`: info.json that isn't valid JSON
pub fn sample_qmk() -> MockQmk {
    let qmk = MockQmk::new();
    qmk.write("planck/rules.mk", "LAYOUTS = ortho_4x4 planck_mit\n")
        .write("planck/planck.h", PLANCK_HEADER)
        .write(
            "planck/info.json",
            r#"{"keyboard_name": "Planck", "manufacturer": "OLKB", "width": 4, "height": 4}"#,
        )
        .write("planck/rev6/rules.mk", "MCU = STM32F303\nLAYOUTS += ortho_5x4\n")
        .write(
            "planck/rev6/info.json",
            r#"{"processor": "STM32F303", "layouts": {
                "LAYOUT_planck_mit": {"layout": [
                    {"x": 0, "y": 0, "w": 2},
                    {"x": 2, "y": 0},
                    {"x": 3, "y": 0}
                ]},
                "LAYOUT_never_declared": [{"x": 0, "y": 0}]
            }}"#,
        )
        .write("handwired/oddball/rules.mk", "# nothing here\n")
        .write("handwired/oddball/config.h", "#define MATRIX_ROWS 2\n")
        .write("handwired/oddball/matrix.h", "#define KEYMAP(a, b, \\\n c) { a, b, c }\n")
        .write("broken/rules.mk", "")
        .write("broken/broken.h", "#define LAYOUT(a) { a }\n")
        .write("broken/info.json", "{ this is not json");
    qmk
}
