// file: src/models/search_result.rs
// description: Search result model with similarity scores
// reference: Used for full-text and TF-IDF search results

use crate::models::Highlight;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Highlight ID
    pub id: String,

    /// Plain text of the highlight
    pub text: String,

    /// Markup of the highlight, if any
    pub html_content: Option<String>,

    /// Cosine similarity in [0, 1]; absent for substring matches
    pub score: Option<f64>,
}

impl SearchResult {
    pub fn scored(highlight: &Highlight, score: f64) -> Self {
        Self {
            id: highlight.id.clone(),
            text: highlight.text.clone(),
            html_content: highlight.html_content.clone(),
            score: Some(score),
        }
    }

    pub fn matched(highlight: &Highlight) -> Self {
        Self {
            id: highlight.id.clone(),
            text: highlight.text.clone(),
            html_content: highlight.html_content.clone(),
            score: None,
        }
    }

    /// Format as a summary string for display
    pub fn format_summary(&self, max_content_len: usize) -> String {
        let content_preview = if self.text.chars().count() > max_content_len {
            let truncated: String = self.text.chars().take(max_content_len).collect();
            format!("{}...", truncated)
        } else {
            self.text.clone()
        };

        let score = match self.score {
            Some(score) => format!("{:.4}", score),
            None => "match".to_string(),
        };

        format!("Score: {} | {}\n{}\n", score, self.id, content_preview)
    }
}

/// Primary hits plus related highlights that were not already among them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub similar: Vec<SearchResult>,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.similar.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scored_result_creation() {
        let highlight = Highlight::new("abc123", "Test content");
        let result = SearchResult::scored(&highlight, 0.95);

        assert_eq!(result.score, Some(0.95));
        assert_eq!(result.id, "abc123");
    }

    #[test]
    fn test_format_summary() {
        let highlight = Highlight::new(
            "h-7",
            "This is a very long content that will be truncated",
        );
        let summary = SearchResult::scored(&highlight, 0.87).format_summary(20);

        assert!(summary.contains("0.8700"));
        assert!(summary.contains("h-7"));
        assert!(summary.contains("..."));
    }

    #[test]
    fn test_format_summary_for_substring_match() {
        let highlight = Highlight::new("h-8", "short");
        let summary = SearchResult::matched(&highlight).format_summary(20);

        assert!(summary.contains("Score: match"));
        assert!(!summary.contains("..."));
    }
}
