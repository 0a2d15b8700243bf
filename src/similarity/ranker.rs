// file: src/similarity/ranker.rs
// description: TF-IDF scoring of a query against a candidate corpus
// reference: internal ranking pipeline

use crate::models::Searchable;
use crate::similarity::tokenizer::Tokenizer;
use crate::similarity::vector::{IdfTable, cosine_similarity, tfidf};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// A candidate that scored above the threshold.
#[derive(Debug, Clone, Copy)]
pub struct RankedDocument<'a, D> {
    pub document: &'a D,
    pub score: f64,
}

/// Scores text pairs and ranks corpora. Holds no state besides the
/// tokenizer tables, so one engine can serve concurrent callers.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityEngine<'t> {
    tokenizer: Tokenizer<'t>,
}

impl Default for SimilarityEngine<'static> {
    fn default() -> Self {
        Self::new(Tokenizer::default())
    }
}

impl<'t> SimilarityEngine<'t> {
    pub fn new(tokenizer: Tokenizer<'t>) -> Self {
        Self { tokenizer }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize(text)
    }

    /// Similarity of two texts. Without a shared table, IDF is built from the
    /// two texts alone, which zeroes every token they have in common; pass a
    /// corpus-wide table whenever one is available.
    pub fn similarity(&self, a: &str, b: &str, idf: Option<&IdfTable>) -> f64 {
        let tokens_a = self.tokenize(a);
        let tokens_b = self.tokenize(b);

        if tokens_a.is_empty() || tokens_b.is_empty() {
            return 0.0;
        }

        let pairwise;
        let idf = match idf {
            Some(idf) => idf,
            None => {
                pairwise = IdfTable::from_corpus(&[tokens_a.clone(), tokens_b.clone()]);
                &pairwise
            }
        };

        cosine_similarity(&tfidf(&tokens_a, idf), &tfidf(&tokens_b, idf))
    }

    pub fn index<'a, D: Searchable>(&self, documents: &'a [D]) -> CorpusIndex<'a, D>
    where
        't: 'a,
    {
        CorpusIndex::build(self.tokenizer, documents)
    }

    /// Ranks `documents` against `query`, keeping scores strictly above
    /// `threshold`, best first. Equal scores keep their input order.
    pub fn rank_corpus<'a, D: Searchable>(
        &self,
        query: &str,
        documents: &'a [D],
        threshold: f64,
    ) -> Vec<RankedDocument<'a, D>>
    where
        't: 'a,
    {
        self.index(documents).rank(query, threshold)
    }
}

/// Candidate token lists and document frequencies prepared once, for running
/// several queries against the same candidates. The IDF table is rebuilt per
/// query with the query counted as one more document.
#[derive(Debug, Clone)]
pub struct CorpusIndex<'a, D> {
    tokenizer: Tokenizer<'a>,
    documents: &'a [D],
    tokens: Vec<Vec<String>>,
    frequencies: BTreeMap<String, usize>,
}

impl<'a, D: Searchable> CorpusIndex<'a, D> {
    pub fn build(tokenizer: Tokenizer<'a>, documents: &'a [D]) -> Self {
        let tokens: Vec<Vec<String>> = documents
            .iter()
            .map(|document| tokenizer.tokenize(document.searchable_text()))
            .collect();

        let mut frequencies: BTreeMap<String, usize> = BTreeMap::new();
        for document_tokens in &tokens {
            let unique: BTreeSet<&str> = document_tokens.iter().map(|t| t.as_str()).collect();
            for token in unique {
                *frequencies.entry(token.to_string()).or_insert(0) += 1;
            }
        }

        Self {
            tokenizer,
            documents,
            tokens,
            frequencies,
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// IDF over the candidates plus the query as a pseudo-document.
    pub fn idf_table(&self, query_tokens: &[String]) -> IdfTable {
        self.idf_with(&[query_tokens])
    }

    /// IDF over the candidates plus each of `extra` as its own document.
    pub fn idf_with(&self, extra: &[&[String]]) -> IdfTable {
        let mut frequencies = self.frequencies.clone();
        for tokens in extra {
            let unique: BTreeSet<&str> = tokens.iter().map(|t| t.as_str()).collect();
            for token in unique {
                *frequencies.entry(token.to_string()).or_insert(0) += 1;
            }
        }

        IdfTable::from_document_frequencies(frequencies, self.documents.len() + extra.len())
    }

    /// Similarity of two texts weighted by this corpus, with both texts
    /// counted as documents.
    pub fn pair_similarity(&self, a: &str, b: &str) -> f64 {
        let tokens_a = self.tokenizer.tokenize(a);
        let tokens_b = self.tokenizer.tokenize(b);
        if tokens_a.is_empty() || tokens_b.is_empty() {
            return 0.0;
        }

        let idf = self.idf_with(&[tokens_a.as_slice(), tokens_b.as_slice()]);
        cosine_similarity(&tfidf(&tokens_a, &idf), &tfidf(&tokens_b, &idf))
    }

    /// Score of every candidate, in input order.
    pub fn scores(&self, query: &str) -> Vec<f64> {
        let query_tokens = self.tokenizer.tokenize(query);
        if query_tokens.is_empty() {
            return vec![0.0; self.documents.len()];
        }

        let idf = self.idf_table(&query_tokens);
        let query_vector = tfidf(&query_tokens, &idf);

        self.tokens
            .iter()
            .map(|document_tokens| {
                if document_tokens.is_empty() {
                    0.0
                } else {
                    cosine_similarity(&query_vector, &tfidf(document_tokens, &idf))
                }
            })
            .collect()
    }

    pub fn rank(&self, query: &str, threshold: f64) -> Vec<RankedDocument<'a, D>> {
        let mut ranked: Vec<RankedDocument<'a, D>> = self
            .scores(query)
            .into_iter()
            .zip(self.documents.iter())
            .filter(|(score, _)| *score > threshold)
            .map(|(score, document)| RankedDocument { document, score })
            .collect();

        // sort_by is stable, so ties stay in corpus order
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        debug!(
            "Ranked {} of {} candidates above {:.2}",
            ranked.len(),
            self.documents.len(),
            threshold
        );

        ranked
    }
}

/// Similarity with the default tokenizer tables.
pub fn similarity(a: &str, b: &str, idf: Option<&IdfTable>) -> f64 {
    SimilarityEngine::default().similarity(a, b, idf)
}

/// Ranking with the default tokenizer tables.
pub fn rank_corpus<'a, D: Searchable>(
    query: &str,
    documents: &'a [D],
    threshold: f64,
) -> Vec<RankedDocument<'a, D>> {
    SimilarityEngine::default().rank_corpus(query, documents, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Highlight;
    use crate::similarity::vector::IdfTable;

    fn corpus(texts: &[&str]) -> Vec<Highlight> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| Highlight::new(format!("h{}", i), *text))
            .collect()
    }

    fn machine_learning_corpus() -> Vec<Highlight> {
        corpus(&[
            "Cooking pasta requires salted boiling water",
            "The ocean tides follow the moon",
            "Machine learning is great",
            "Gardens need sunlight and patience",
            "Bread dough rises overnight in a warm kitchen",
            "Mountains erode slowly over millennia",
            "Jazz musicians improvise around a melody",
            "Old maps show forgotten trade routes",
            "Bees pollinate orchards each spring",
            "Chess openings reward careful study",
        ])
    }

    #[test]
    fn test_rank_finds_exact_phrase_first() {
        let docs = machine_learning_corpus();
        let ranked = rank_corpus("machine learning", &docs, 0.15);

        assert!(!ranked.is_empty());
        assert_eq!(ranked[0].document.id, "h2");
        assert!(ranked[0].score > 0.15);
    }

    #[test]
    fn test_rank_empty_corpus() {
        let docs: Vec<Highlight> = Vec::new();
        assert!(rank_corpus("machine learning", &docs, 0.15).is_empty());
    }

    #[test]
    fn test_rank_stopword_query() {
        let docs = machine_learning_corpus();
        assert!(rank_corpus("the and of", &docs, 0.0).is_empty());
    }

    #[test]
    fn test_rank_is_deterministic_with_stable_ties() {
        let docs = corpus(&[
            "unrelated gardening notes",
            "distributed consensus protocols",
            "distributed consensus protocols",
            "more gardening notes",
        ]);

        let first: Vec<(String, f64)> = rank_corpus("consensus protocols", &docs, 0.0)
            .iter()
            .map(|r| (r.document.id.clone(), r.score))
            .collect();
        let second: Vec<(String, f64)> = rank_corpus("consensus protocols", &docs, 0.0)
            .iter()
            .map(|r| (r.document.id.clone(), r.score))
            .collect();

        assert_eq!(first, second);
        assert_eq!(first[0].0, "h1");
        assert_eq!(first[1].0, "h2");
        assert_eq!(first[0].1, first[1].1);
    }

    #[test]
    fn test_rank_threshold_is_exclusive() {
        let docs = machine_learning_corpus();
        let scores = SimilarityEngine::default().index(&docs).scores("machine learning");
        let top = scores.iter().cloned().fold(0.0, f64::max);

        let ranked = rank_corpus("machine learning", &docs, top);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_rank_uses_markup_when_present() {
        let docs = vec![
            Highlight::new("a", "nothing relevant").with_html("<p><em>Volcanic</em> islands</p>"),
            Highlight::new("b", "volcanic islands"),
            Highlight::new("c", "quiet libraries"),
        ];

        let ranked = rank_corpus("volcanic islands", &docs, 0.1);
        let ids: Vec<&str> = ranked.iter().map(|r| r.document.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_index_scores_match_single_shot_ranking() {
        let docs = machine_learning_corpus();
        let index = SimilarityEngine::default().index(&docs);

        for query in ["machine learning", "warm bread", "moon tides"] {
            let from_index: Vec<f64> = index.rank(query, 0.0).iter().map(|r| r.score).collect();
            let single: Vec<f64> = rank_corpus(query, &docs, 0.0)
                .iter()
                .map(|r| r.score)
                .collect();
            assert_eq!(from_index, single);
        }
    }

    #[test]
    fn test_similarity_with_shared_table() {
        let docs = machine_learning_corpus();
        let index = SimilarityEngine::default().index(&docs);
        let engine = SimilarityEngine::default();
        let idf = index.idf_table(&engine.tokenize("machine learning"));

        let score = similarity("machine learning", "Machine learning is great", Some(&idf));
        assert!(score > 0.5);
    }

    #[test]
    fn test_pairwise_idf_discounts_shared_terms() {
        // every shared token has ln(2/2) = 0 weight against a two-document table
        assert_eq!(similarity("cats chase mice", "cats chase birds", None), 0.0);
    }

    #[test]
    fn test_similarity_empty_inputs() {
        let idf = IdfTable::default();
        assert_eq!(similarity("", "anything here", None), 0.0);
        assert_eq!(similarity("the of and", "anything here", Some(&idf)), 0.0);
    }

    #[test]
    fn test_pair_similarity_counts_each_text_as_a_document() {
        let docs = machine_learning_corpus();
        let engine = SimilarityEngine::default();
        let index = engine.index(&docs);

        let a = engine.tokenize("careful rust ownership");
        let b = engine.tokenize("rust borrowing rules");
        let idf = index.idf_with(&[a.as_slice(), b.as_slice()]);

        assert_eq!(idf.document_count(), docs.len() + 2);
        assert!((idf.weight("rust") - (12.0f64 / 2.0).ln()).abs() < 1e-12);

        let score = index.pair_similarity("careful rust ownership", "rust borrowing rules");
        assert!(score > 0.0 && score < 1.0);
        assert_eq!(index.pair_similarity("the and of", "rust"), 0.0);
    }
}
