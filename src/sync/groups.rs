// file: src/sync/groups.rs
// description: splitting a block sequence into highlight groups and locating one again
// reference: internal sync logic

use crate::converter::scanner::markup_words;
use crate::converter::{blocks_to_text, strip_html};
use crate::models::Block;
use crate::sync::reconcile::normalize;
use tracing::{debug, info};

/// A contiguous run of blocks between blank-paragraph separators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightGroup<'a> {
    /// Position of the first block in the scanned sequence.
    pub start: usize,
    pub blocks: &'a [Block],
}

impl<'a> HighlightGroup<'a> {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Range of the group within the scanned sequence.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.blocks.len()
    }

    pub fn text(&self) -> String {
        blocks_to_text(self.blocks)
    }

    /// Lowercased text of the group with whitespace collapsed, so line
    /// breaks between blocks and spaces compare equal.
    pub fn match_text(&self) -> String {
        normalize(&self.text())
    }
}

/// Splits blocks on empty paragraphs. Separators are consumed, leading
/// separators never open a group, and groups without visible text are
/// dropped.
pub fn split_into_groups(blocks: &[Block]) -> Vec<HighlightGroup<'_>> {
    let mut groups = Vec::new();
    let mut start: Option<usize> = None;

    for (index, block) in blocks.iter().enumerate() {
        if block.is_blank_separator() {
            if let Some(open) = start.take() {
                push_group(&mut groups, blocks, open, index);
            }
            continue;
        }

        if start.is_none() {
            start = Some(index);
        }
    }

    if let Some(open) = start {
        push_group(&mut groups, blocks, open, blocks.len());
    }

    debug!("Split {} blocks into {} groups", blocks.len(), groups.len());
    groups
}

fn push_group<'a>(groups: &mut Vec<HighlightGroup<'a>>, blocks: &'a [Block], start: usize, end: usize) {
    let group = HighlightGroup {
        start,
        blocks: &blocks[start..end],
    };

    if !group.text().trim().is_empty() {
        groups.push(group);
    }
}

/// Finds the group of `remote` that holds a previously stored highlight.
///
/// A group matches when its text equals the highlight's plain text or the
/// visible text of its markup, or when either text contains the other. The
/// first match in document order wins. `None` means the highlight is no
/// longer on the remote page in a recognisable form.
pub fn find_matching_group<'a>(
    remote: &'a [Block],
    original_text: &str,
    original_markup: Option<&str>,
) -> Option<HighlightGroup<'a>> {
    let plain = normalize(original_text);
    let from_markup: Vec<String> = original_markup
        .filter(|markup| !markup.trim().is_empty())
        .map(|markup| vec![normalize(&strip_html(markup)), normalize(&markup_words(markup))])
        .unwrap_or_default();

    let found = split_into_groups(remote).into_iter().find(|group| {
        let candidate = group.match_text();

        candidate == plain
            || from_markup.iter().any(|variant| *variant == candidate)
            || (!plain.is_empty() && (candidate.contains(&plain) || plain.contains(&candidate)))
    });

    match &found {
        Some(group) => info!(
            "Matched highlight to blocks {}..{}",
            group.range().start,
            group.range().end
        ),
        None => info!("Highlight not found among {} remote blocks", remote.len()),
    }

    found
}
