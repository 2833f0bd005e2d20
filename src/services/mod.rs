//! Collaborators the catalog builder depends on.
//!
//! Source-tree access, keyboard enumeration, and result publishing sit
//! behind traits so the builder can run against a real QMK checkout or
//! in-memory fixtures.

pub mod enumerator;
pub mod publish;
pub mod source;

pub use enumerator::{DirectoryScan, KeyboardEnumerator, MakeListKeyboards};
pub use publish::{publish_catalog, JsonDirSink, MemorySink, PublishSink};
pub use source::{FsSourceTree, MemorySourceTree, SourceTree};
