// file: src/similarity/mod.rs
// description: TF-IDF similarity engine and highlight search
// reference: internal module structure

pub mod ranker;
pub mod search;
pub mod tokenizer;
pub mod vector;

pub use ranker::{CorpusIndex, RankedDocument, SimilarityEngine, rank_corpus, similarity};
pub use search::{HighlightSearch, SearchMode};
pub use tokenizer::{Tokenizer, stem, tokenize};
pub use vector::{IdfTable, TermVector, cosine_similarity, term_frequency, tfidf};
