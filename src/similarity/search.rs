// file: src/similarity/search.rs
// description: full-text and TF-IDF search over a highlight corpus
// reference: internal search endpoints

use crate::config::SearchConfig;
use crate::models::{Highlight, SearchOutcome, SearchResult};
use crate::similarity::ranker::SimilarityEngine;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Substring hits, plus TF-IDF related highlights.
    #[default]
    FullText,
    /// TF-IDF ranking only.
    Semantic,
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "fulltext" | "full-text" | "text" => Ok(SearchMode::FullText),
            "semantic" | "tfidf" => Ok(SearchMode::Semantic),
            other => Err(format!("unknown search mode: {}", other)),
        }
    }
}

pub struct HighlightSearch<'t> {
    config: SearchConfig,
    engine: SimilarityEngine<'t>,
}

impl HighlightSearch<'static> {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_engine(config, SimilarityEngine::default())
    }
}

impl<'t> HighlightSearch<'t> {
    pub fn with_engine(config: SearchConfig, engine: SimilarityEngine<'t>) -> Self {
        Self { config, engine }
    }

    pub fn search(&self, query: &str, corpus: &[Highlight], mode: SearchMode) -> SearchOutcome {
        info!("Searching {} highlights ({:?}): {}", corpus.len(), mode, query);

        match mode {
            SearchMode::FullText => self.full_text(query, corpus),
            SearchMode::Semantic => self.semantic(query, corpus),
        }
    }

    /// Highlights most like `highlight`, never including itself.
    pub fn find_similar(&self, highlight: &Highlight, corpus: &[Highlight]) -> Vec<SearchResult> {
        let candidates: Vec<Highlight> = self
            .candidates(corpus)
            .filter(|candidate| candidate.id != highlight.id)
            .cloned()
            .collect();

        self.engine
            .rank_corpus(
                highlight.markup_or_text(),
                &candidates,
                self.config.similar_threshold,
            )
            .into_iter()
            .take(self.config.similar_limit)
            .map(|ranked| SearchResult::scored(ranked.document, ranked.score))
            .collect()
    }

    fn full_text(&self, query: &str, corpus: &[Highlight]) -> SearchOutcome {
        let needle = query.to_lowercase();

        let mut hits: Vec<&Highlight> = corpus
            .iter()
            .filter(|highlight| !highlight.archived)
            .filter(|highlight| {
                highlight.text.to_lowercase().contains(&needle)
                    || highlight
                        .html_content
                        .as_deref()
                        .is_some_and(|html| html.to_lowercase().contains(&needle))
            })
            .collect();

        // newest first; undated records sort last
        hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        hits.truncate(self.config.fulltext_limit);

        let results: Vec<SearchResult> = hits.into_iter().map(SearchResult::matched).collect();
        let seen: HashSet<&str> = results.iter().map(|result| result.id.as_str()).collect();

        let candidates: Vec<Highlight> = self.candidates(corpus).cloned().collect();
        let similar: Vec<SearchResult> = self
            .engine
            .rank_corpus(query, &candidates, self.config.related_threshold)
            .into_iter()
            .take(self.config.similar_limit)
            .filter(|ranked| !seen.contains(ranked.document.id.as_str()))
            .map(|ranked| SearchResult::scored(ranked.document, ranked.score))
            .collect();

        debug!(
            "Full-text search: {} hits, {} related",
            results.len(),
            similar.len()
        );

        SearchOutcome { results, similar }
    }

    fn semantic(&self, query: &str, corpus: &[Highlight]) -> SearchOutcome {
        if self.engine.tokenize(query).is_empty() {
            return SearchOutcome::default();
        }

        let candidates: Vec<Highlight> = self.candidates(corpus).cloned().collect();
        let mut ranked: Vec<SearchResult> = self
            .engine
            .rank_corpus(query, &candidates, self.config.related_threshold)
            .into_iter()
            .take(self.config.result_limit + self.config.similar_limit)
            .map(|ranked| SearchResult::scored(ranked.document, ranked.score))
            .collect();

        let similar = if ranked.len() > self.config.result_limit {
            ranked.split_off(self.config.result_limit)
        } else {
            Vec::new()
        };

        SearchOutcome {
            results: ranked,
            similar,
        }
    }

    /// Non-archived highlights, bounded by the configured candidate cap.
    fn candidates<'c>(&self, corpus: &'c [Highlight]) -> impl Iterator<Item = &'c Highlight> {
        corpus
            .iter()
            .filter(|highlight| !highlight.archived)
            .take(self.config.candidate_cap)
    }
}
