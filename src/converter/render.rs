// file: src/converter/render.rs
// description: content blocks back to markup and plain text
// reference: internal markup conversion

use crate::converter::scanner::{escape_attribute, escape_text};
use crate::models::{Block, BlockContent, ListItemBody, RichText};

const EMPTY_PARAGRAPH: &str = "<p><br></p>";

/// Renders blocks as markup. Adjacent list items of the same kind share one
/// list; empty paragraphs render as a line break so they survive a round trip.
pub fn blocks_to_markup(blocks: &[Block]) -> String {
    let mut markup = String::new();
    let mut index = 0;

    while index < blocks.len() {
        let block = &blocks[index];

        match &block.content {
            BlockContent::BulletedListItem(_) | BlockContent::NumberedListItem(_) => {
                let run = blocks[index..]
                    .iter()
                    .take_while(|next| next.same_type(block))
                    .count();
                let tag = match block.content {
                    BlockContent::BulletedListItem(_) => "ul",
                    _ => "ol",
                };
                render_list(&mut markup, tag, &blocks[index..index + run]);
                index += run;
                continue;
            }
            BlockContent::Paragraph(body) => {
                if body.rich_text.is_empty() {
                    markup.push_str(EMPTY_PARAGRAPH);
                } else {
                    wrap(&mut markup, "p", &spans_to_markup(&body.rich_text));
                }
            }
            BlockContent::Heading1(body) => wrap_non_empty(&mut markup, "h1", &body.rich_text),
            BlockContent::Heading2(body) => wrap_non_empty(&mut markup, "h2", &body.rich_text),
            BlockContent::Heading3(body) => wrap_non_empty(&mut markup, "h3", &body.rich_text),
            BlockContent::Quote(body) => {
                wrap_non_empty(&mut markup, "blockquote", &body.rich_text)
            }
            BlockContent::Code(body) => {
                if !body.rich_text.is_empty() {
                    let source: String = body.rich_text.iter().map(|s| s.plain_text.as_str()).collect();
                    markup.push_str("<pre><code>");
                    markup.push_str(&escape_text(&source));
                    markup.push_str("</code></pre>");
                }
            }
            BlockContent::Divider => markup.push_str("<hr>"),
            BlockContent::Unsupported { .. } if block.is_toggle() => {}
            BlockContent::Unsupported { rich_text, .. } => {
                if let Some(spans) = rich_text {
                    wrap(&mut markup, "p", &spans_to_markup(spans));
                }
            }
        }

        index += 1;
    }

    markup
}

/// Inline markup for a span sequence. Formatting wraps innermost first in the
/// order strong, em, u, s, code; a link wraps everything.
pub fn spans_to_markup(spans: &[RichText]) -> String {
    spans.iter().map(span_to_markup).collect()
}

/// One line per block with text; blocks without text add no line.
pub fn blocks_to_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::plain_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn span_to_markup(span: &RichText) -> String {
    let mut content = escape_text(&span.plain_text);
    let annotations = &span.annotations;

    let layers = [
        (annotations.bold, "strong"),
        (annotations.italic, "em"),
        (annotations.underline, "u"),
        (annotations.strikethrough, "s"),
        (annotations.code, "code"),
    ];
    for (enabled, tag) in layers {
        if enabled {
            content = format!("<{tag}>{content}</{tag}>");
        }
    }

    match &span.href {
        Some(href) => format!("<a href=\"{}\">{}</a>", escape_attribute(href), content),
        None => content,
    }
}

fn render_list(markup: &mut String, tag: &str, items: &[Block]) {
    markup.push_str(&format!("<{tag}>"));

    for item in items {
        if let BlockContent::BulletedListItem(body) | BlockContent::NumberedListItem(body) =
            &item.content
        {
            render_item(markup, body);
        }
    }

    markup.push_str(&format!("</{tag}>"));
}

fn render_item(markup: &mut String, body: &ListItemBody) {
    markup.push_str("<li>");
    markup.push_str(&spans_to_markup(&body.rich_text));
    markup.push_str(&blocks_to_markup(&body.children));
    markup.push_str("</li>");
}

fn wrap(markup: &mut String, tag: &str, inner: &str) {
    markup.push_str(&format!("<{tag}>{inner}</{tag}>"));
}

fn wrap_non_empty(markup: &mut String, tag: &str, spans: &[RichText]) {
    if !spans.is_empty() {
        wrap(markup, tag, &spans_to_markup(spans));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::blocks::markup_to_blocks;
    use crate::models::Annotations;
    use pretty_assertions::assert_eq;

    fn text(value: &str) -> Vec<RichText> {
        vec![RichText::plain(value)]
    }

    #[test]
    fn test_paragraphs_and_separator() {
        let blocks = vec![
            Block::paragraph(text("A")),
            Block::empty_paragraph(),
            Block::paragraph(text("B")),
        ];
        assert_eq!(blocks_to_markup(&blocks), "<p>A</p><p><br></p><p>B</p>");
    }

    #[test]
    fn test_adjacent_list_items_share_a_list() {
        let blocks = vec![
            Block::bulleted(text("one")),
            Block::bulleted(text("two")),
            Block::numbered(text("three")),
            Block::paragraph(text("break")),
            Block::bulleted(text("four")),
        ];

        assert_eq!(
            blocks_to_markup(&blocks),
            "<ul><li>one</li><li>two</li></ul><ol><li>three</li></ol><p>break</p><ul><li>four</li></ul>"
        );
    }

    #[test]
    fn test_nested_children_render_inside_item() {
        let parent = Block::new(BlockContent::BulletedListItem(ListItemBody {
            rich_text: text("parent"),
            children: vec![Block::bulleted(text("child"))],
        }));

        assert_eq!(
            blocks_to_markup(&[parent]),
            "<ul><li>parent<ul><li>child</li></ul></li></ul>"
        );
    }

    #[test]
    fn test_annotation_wrapping_order() {
        let span = RichText::plain("x")
            .with_annotations(Annotations {
                bold: true,
                italic: true,
                underline: true,
                strikethrough: true,
                code: true,
            })
            .with_href("https://example.com/?a=1&b=2");

        assert_eq!(
            spans_to_markup(&[span]),
            "<a href=\"https://example.com/?a=1&amp;b=2\"><code><s><u><em><strong>x</strong></em></u></s></code></a>"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(
            blocks_to_markup(&[Block::paragraph(text("a < b & c"))]),
            "<p>a &lt; b &amp; c</p>"
        );
    }

    #[test]
    fn test_other_block_kinds() {
        let blocks = vec![
            Block::heading(2, text("Title")),
            Block::heading(1, Vec::new()),
            Block::quote(text("said")),
            Block::code("let x = 1;"),
            Block::divider(),
            Block::new(BlockContent::Unsupported {
                kind: "callout".to_string(),
                rich_text: Some(text("note")),
            }),
            Block::new(BlockContent::Unsupported {
                kind: "toggle".to_string(),
                rich_text: Some(text("hidden")),
            }),
            Block::new(BlockContent::Unsupported {
                kind: "image".to_string(),
                rich_text: None,
            }),
        ];

        assert_eq!(
            blocks_to_markup(&blocks),
            "<h2>Title</h2><blockquote>said</blockquote><pre><code>let x = 1;</code></pre><hr><p>note</p>"
        );
    }

    #[test]
    fn test_blocks_to_text_skips_empty_blocks() {
        let blocks = vec![
            Block::paragraph(text("first")),
            Block::empty_paragraph(),
            Block::divider(),
            Block::bulleted(vec![RichText::plain("sec"), RichText::plain("ond")]),
        ];
        assert_eq!(blocks_to_text(&blocks), "first\nsecond");
    }

    #[test]
    fn test_round_trip_preserves_kinds_and_text() {
        let markup = "<h1>Title</h1><h2>Part</h2><ul><li>alpha</li><li>beta</li></ul><p>closing words</p>";
        let blocks = markup_to_blocks(markup);
        let again = markup_to_blocks(&blocks_to_markup(&blocks));

        let shape = |blocks: &[Block]| -> Vec<(String, String)> {
            blocks
                .iter()
                .map(|b| (b.type_name().to_string(), b.plain_text()))
                .collect()
        };
        assert_eq!(shape(&again), shape(&blocks));
        assert_eq!(
            shape(&blocks),
            vec![
                ("bulleted_list_item".to_string(), "alpha".to_string()),
                ("bulleted_list_item".to_string(), "beta".to_string()),
                ("heading_1".to_string(), "Title".to_string()),
                ("heading_2".to_string(), "Part".to_string()),
                ("paragraph".to_string(), "closing words".to_string()),
            ]
        );
    }

    #[test]
    fn test_round_trip_keeps_separators_and_links() {
        let markup = r#"<p>see <a href="https://example.com">here</a></p><p><br></p><p>next</p>"#;
        let blocks = markup_to_blocks(markup);
        let rendered = blocks_to_markup(&blocks);

        assert_eq!(rendered, markup);
    }
}
