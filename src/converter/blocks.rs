// file: src/converter/blocks.rs
// description: markup to content blocks, in fixed extraction order
// reference: internal markup conversion

use crate::converter::scanner::{MarkupScanner, remove_elements, strip_html, take_elements};
use crate::converter::spans::markup_to_spans;
use crate::models::{Block, RichText};
use tracing::debug;

/// Converts markup into blocks.
///
/// Blocks come out grouped by kind rather than in document order: every
/// `<ul>` item, then every `<ol>` item, then `h1`, `h2`, `h3`, quotes, code,
/// and finally the remaining paragraphs. Markup with none of those tags
/// becomes a single paragraph; blank input becomes one empty paragraph.
pub fn markup_to_blocks(markup: &str) -> Vec<Block> {
    if markup.trim().is_empty() {
        return vec![Block::empty_paragraph()];
    }

    let mut blocks = list_items(markup);

    let mut working = remove_elements(&remove_elements(markup, "ul"), "ol");

    for (tag, level) in [("h1", 1), ("h2", 2), ("h3", 3)] {
        for inner in take_elements(&mut working, tag) {
            let spans = markup_to_spans(&inner);
            if !spans.is_empty() {
                blocks.push(Block::heading(level, spans));
            }
        }
    }

    for inner in take_elements(&mut working, "blockquote") {
        let spans = markup_to_spans(&inner);
        if !spans.is_empty() {
            blocks.push(Block::quote(spans));
        }
    }

    for inner in take_elements(&mut working, "pre") {
        let code = strip_html(&inner);
        if !code.is_empty() {
            blocks.push(Block::code(code));
        }
    }

    let scanner = MarkupScanner::new(&working);
    for element in scanner.elements("p") {
        // empty paragraphs are kept; they separate highlights
        blocks.push(Block::paragraph(markup_to_spans(element.inner(&working))));
    }

    if blocks.is_empty() {
        blocks.push(Block::paragraph(markup_to_spans(markup)));
    }

    debug!("Converted {} bytes of markup into {} blocks", markup.len(), blocks.len());
    blocks
}

fn list_items(markup: &str) -> Vec<Block> {
    let mut items = Vec::new();
    let scanner = MarkupScanner::new(markup);

    let lists: [(&str, fn(Vec<RichText>) -> Block); 2] =
        [("ul", Block::bulleted), ("ol", Block::numbered)];

    for (tag, make) in lists {
        for list in scanner.elements(tag) {
            let body = list.inner(markup);
            let items_scanner = MarkupScanner::new(body);
            for item in items_scanner.elements("li") {
                let spans = markup_to_spans(item.inner(body));
                if !spans.is_empty() {
                    items.push(make(spans));
                }
            }
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockContent;
    use pretty_assertions::assert_eq;

    fn kinds(blocks: &[Block]) -> Vec<&str> {
        blocks.iter().map(|block| block.type_name()).collect()
    }

    fn texts(blocks: &[Block]) -> Vec<String> {
        blocks.iter().map(|block| block.plain_text()).collect()
    }

    #[test]
    fn test_blank_input_is_one_empty_paragraph() {
        for input in ["", "   ", "\n\t"] {
            let blocks = markup_to_blocks(input);
            assert_eq!(blocks, vec![Block::empty_paragraph()]);
        }
    }

    #[test]
    fn test_plain_text_becomes_paragraph() {
        let blocks = markup_to_blocks("no tags at all");
        assert_eq!(blocks, vec![Block::paragraph(vec![RichText::plain("no tags at all")])]);
    }

    #[test]
    fn test_unrecognized_tags_fall_back_to_paragraph() {
        let blocks = markup_to_blocks("<div><span>inside</span></div>");
        assert_eq!(kinds(&blocks), vec!["paragraph"]);
        assert_eq!(texts(&blocks), vec!["inside"]);
    }

    #[test]
    fn test_extraction_order_is_by_kind() {
        let markup = "<p>intro</p><ol><li>first</li></ol><h2>Sub</h2><ul><li>dot</li></ul>\
                      <blockquote>quoted</blockquote><h1>Top</h1><pre>let x = 1;</pre>";
        let blocks = markup_to_blocks(markup);

        assert_eq!(
            kinds(&blocks),
            vec![
                "bulleted_list_item",
                "numbered_list_item",
                "heading_1",
                "heading_2",
                "quote",
                "code",
                "paragraph",
            ]
        );
        assert_eq!(
            texts(&blocks),
            vec!["dot", "first", "Top", "Sub", "quoted", "let x = 1;", "intro"]
        );
    }

    #[test]
    fn test_all_unordered_before_ordered() {
        let markup = "<ol><li>n1</li></ol><ul><li>b1</li></ul><ol><li>n2</li></ol><ul><li>b2</li></ul>";
        let blocks = markup_to_blocks(markup);
        assert_eq!(texts(&blocks), vec!["b1", "b2", "n1", "n2"]);
    }

    #[test]
    fn test_empty_list_items_are_dropped() {
        let blocks = markup_to_blocks("<ul><li>kept</li><li> </li><li><br></li></ul>");
        assert_eq!(texts(&blocks), vec!["kept"]);
    }

    #[test]
    fn test_empty_paragraph_is_kept_as_separator() {
        let blocks = markup_to_blocks("<p>A</p><p><br></p><p>B</p>");

        assert_eq!(texts(&blocks), vec!["A", "", "B"]);
        assert!(blocks[1].is_blank_separator());
    }

    #[test]
    fn test_pre_becomes_plain_code() {
        let blocks = markup_to_blocks("<pre><code>fn main() {}\n&lt;T&gt;</code></pre>");

        match &blocks[0].content {
            BlockContent::Code(body) => {
                assert_eq!(body.language, "plain text");
                assert_eq!(body.rich_text[0].plain_text, "fn main() {}\n<T>");
            }
            other => panic!("expected code block, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_pre_is_skipped() {
        let blocks = markup_to_blocks("<pre>  </pre><p>after</p>");
        assert_eq!(kinds(&blocks), vec!["paragraph"]);
    }

    #[test]
    fn test_headings_keep_formatting_flags() {
        let blocks = markup_to_blocks("<h3><em>Quiet</em> title</h3>");
        let spans = blocks[0].rich_text().unwrap();

        assert_eq!(blocks[0].type_name(), "heading_3");
        assert!(spans[0].annotations.italic);
    }

    #[test]
    fn test_multiline_paragraph() {
        let blocks = markup_to_blocks("<p>line one\nline two</p>");
        assert_eq!(texts(&blocks), vec!["line one\nline two"]);
    }
}
