// file: src/similarity/vector.rs
// description: term frequency, inverse document frequency and cosine similarity
// reference: https://en.wikipedia.org/wiki/Tf%E2%80%93idf

use std::collections::{BTreeMap, BTreeSet};

/// Sparse token → weight vector. Ordered so that floating-point sums are
/// accumulated in the same order on every run.
pub type TermVector = BTreeMap<String, f64>;

/// Occurrences of each token divided by the total token count.
pub fn term_frequency(tokens: &[String]) -> TermVector {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }

    let total = tokens.len() as f64;
    counts
        .into_iter()
        .map(|(token, count)| (token.to_string(), count as f64 / total))
        .collect()
}

/// `ln(N / df)` per token over one corpus snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdfTable {
    weights: BTreeMap<String, f64>,
    documents: usize,
}

impl IdfTable {
    /// Counts documents, not occurrences. Tokens absent from every document
    /// never enter the table.
    pub fn from_corpus(documents: &[Vec<String>]) -> Self {
        let mut frequencies: BTreeMap<String, usize> = BTreeMap::new();
        for tokens in documents {
            let unique: BTreeSet<&str> = tokens.iter().map(|token| token.as_str()).collect();
            for token in unique {
                *frequencies.entry(token.to_string()).or_insert(0) += 1;
            }
        }

        Self::from_document_frequencies(frequencies, documents.len())
    }

    pub fn from_document_frequencies(
        frequencies: BTreeMap<String, usize>,
        documents: usize,
    ) -> Self {
        let total = documents as f64;
        let weights = frequencies
            .into_iter()
            .filter(|(_, df)| *df > 0)
            .map(|(token, df)| (token, (total / df as f64).ln()))
            .collect();

        Self { weights, documents }
    }

    /// Zero for tokens outside the corpus.
    pub fn weight(&self, token: &str) -> f64 {
        self.weights.get(token).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.weights.contains_key(token)
    }

    pub fn document_count(&self) -> usize {
        self.documents
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

pub fn tfidf(tokens: &[String], idf: &IdfTable) -> TermVector {
    term_frequency(tokens)
        .into_iter()
        .map(|(token, tf)| {
            let weight = tf * idf.weight(&token);
            (token, weight)
        })
        .collect()
}

/// Cosine of the angle between two sparse vectors, in [0, 1].
///
/// Returns 0 when both vectors are empty or either has zero length.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .filter_map(|(token, x)| b.get(token).map(|y| x * y))
        .sum();
    let norm_a = a.values().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.values().map(|y| y * y).sum::<f64>().sqrt();

    let magnitude = norm_a * norm_b;
    if magnitude == 0.0 {
        return 0.0;
    }

    (dot / magnitude).clamp(0.0, 1.0)
}
