// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod block;
pub mod highlight;
pub mod search_result;

pub use block::{Annotations, Block, BlockContent, CodeBody, ListItemBody, RichText, TextBody};
pub use highlight::{Highlight, Searchable};
pub use search_result::{SearchOutcome, SearchResult};
