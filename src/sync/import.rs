// file: src/sync/import.rs
// description: turning a remote page's blocks into highlight candidates
// reference: internal sync logic

use crate::converter::{blocks_to_markup, blocks_to_text};
use crate::models::highlight::compute_hash;
use crate::models::{Block, Highlight};
use crate::sync::groups::split_into_groups;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Text and markup of one highlight read from a remote page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedHighlight {
    pub text: String,
    pub html: String,
}

impl ImportedHighlight {
    pub fn from_blocks(blocks: &[Block]) -> Self {
        Self {
            text: blocks_to_text(blocks).trim().to_string(),
            html: blocks_to_markup(blocks).trim().to_string(),
        }
    }

    pub fn content_hash(&self) -> String {
        compute_hash(&self.text, &self.html)
    }

    /// A new highlight record carrying this content under a fresh id.
    pub fn into_highlight(self) -> Highlight {
        let html = if self.html.is_empty() { None } else { Some(self.html) };
        Highlight::generate(self.text, html)
    }
}

/// Highlights on a page, one per group. Toggle blocks are skipped. A page
/// with text but no qualifying group is imported as a single highlight.
pub fn extract_highlights(blocks: &[Block]) -> Vec<ImportedHighlight> {
    let visible: Vec<Block> = blocks
        .iter()
        .filter(|block| !block.is_toggle())
        .cloned()
        .collect();

    let mut highlights: Vec<ImportedHighlight> = split_into_groups(&visible)
        .iter()
        .map(|group| ImportedHighlight::from_blocks(group.blocks))
        .filter(|highlight| !highlight.text.is_empty())
        .collect();

    if highlights.is_empty() {
        let whole = ImportedHighlight::from_blocks(&visible);
        if !whole.text.is_empty() {
            debug!("No groups found; importing the page as one highlight");
            highlights.push(whole);
        }
    }

    info!(
        "Extracted {} highlights from {} blocks",
        highlights.len(),
        blocks.len()
    );
    highlights
}
