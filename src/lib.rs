// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod converter;
pub mod corpus;
pub mod error;
pub mod exporter;
pub mod models;
pub mod pipeline;
pub mod review;
pub mod similarity;
pub mod sync;
pub mod utils;

pub use config::{Config, CorpusConfig, ExportConfig, SearchConfig};
pub use converter::{
    blocks_to_markup, blocks_to_text, markup_to_blocks, markup_to_spans, spans_to_markup,
    strip_html,
};
pub use corpus::{CorpusLoader, ScannedFile, load_blocks, parse_blocks};
pub use error::{HighlightError, Result};
pub use exporter::json::{ExportManifest, JsonExporter};
pub use models::{Block, Highlight, RichText, SearchOutcome, SearchResult, Searchable};
pub use pipeline::{ImportPipeline, ImportRun, ImportStats, ProgressTracker};
pub use review::{Rating, RatingSummary, daily_selection, should_archive, summarize};
pub use similarity::{
    CorpusIndex, HighlightSearch, SearchMode, SimilarityEngine, rank_corpus, similarity,
};
pub use sync::{
    HighlightGroup, ImportedHighlight, ReconcileReport, Reconciler, UpdatePlan,
    blocks_for_append, extract_highlights, find_matching_group, plan_update,
};
pub use utils::{OperationTimer, Validator};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let config = Config::default_config();
        let _search = HighlightSearch::new(config.search.clone());
        let _pipeline = ImportPipeline::new(config.search);

        let blocks = markup_to_blocks("<p>exported</p>");
        assert_eq!(blocks_to_markup(&blocks), "<p>exported</p>");
    }
}
