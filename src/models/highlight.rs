// file: src/models/highlight.rs
// description: highlight record as read from storage or imported from a remote page
// reference: internal data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Anything the ranking engine can score.
pub trait Searchable {
    fn id(&self) -> &str;

    /// Text that is tokenised for similarity. Markup is fine; tags are stripped.
    fn searchable_text(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub html_content: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Highlight {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            html_content: None,
            source: None,
            author: None,
            archived: false,
            created_at: None,
        }
    }

    /// Creates a highlight with a fresh random id.
    pub fn generate(text: impl Into<String>, html_content: Option<String>) -> Self {
        let mut highlight = Self::new(uuid::Uuid::new_v4().to_string(), text);
        highlight.html_content = html_content;
        highlight.created_at = Some(Utc::now());
        highlight
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html_content = Some(html.into());
        self
    }

    /// Markup when present and non-empty, plain text otherwise.
    pub fn markup_or_text(&self) -> &str {
        match self.html_content.as_deref() {
            Some(html) if !html.is_empty() => html,
            _ => &self.text,
        }
    }

    pub fn content_hash(&self) -> String {
        compute_hash(&self.text, self.html_content.as_deref().unwrap_or(""))
    }
}

impl Searchable for Highlight {
    fn id(&self) -> &str {
        &self.id
    }

    fn searchable_text(&self) -> &str {
        self.markup_or_text()
    }
}

/// SHA-256 over the trimmed text and markup of a highlight.
pub fn compute_hash(text: &str, html: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.trim().as_bytes());
    hasher.update([0u8]);
    hasher.update(html.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}
