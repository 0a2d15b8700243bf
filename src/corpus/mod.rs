// file: src/corpus/mod.rs
// description: corpus and block page loading
// reference: internal module structure

pub mod loader;

pub use loader::{CorpusLoader, ScannedFile, SourceKind, load_blocks, parse_blocks};
