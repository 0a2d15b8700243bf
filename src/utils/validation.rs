// file: src/utils/validation.rs
// description: input validation for command-line arguments and loaded content
// reference: input validation patterns

use crate::error::{HighlightError, Result};
use std::fs;
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            HighlightError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(HighlightError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    /// A corpus may be a single file or a directory.
    pub fn validate_corpus_path(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(HighlightError::Validation(format!(
                "Corpus path does not exist: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn validate_content_not_empty(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(HighlightError::Validation("Content is empty".to_string()));
        }
        Ok(())
    }

    pub fn validate_threshold(threshold: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(HighlightError::Validation(format!(
                "Threshold must be between 0 and 1, got {}",
                threshold
            )));
        }
        Ok(())
    }

    /// Truncates on a character boundary and marks the cut with `...`.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &text[..cut]),
            None => text.to_string(),
        }
    }
}
