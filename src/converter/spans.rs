// file: src/converter/spans.rs
// description: markup fragment to rich text spans
// reference: internal markup conversion

use crate::converter::scanner::{Anchor, MarkupScanner, strip_html};
use crate::models::{Annotations, RichText};

const BOLD_TAGS: &[&str] = &["strong", "b"];
const ITALIC_TAGS: &[&str] = &["em", "i"];
const UNDERLINE_TAGS: &[&str] = &["u"];
const CODE_TAGS: &[&str] = &["code"];

/// Converts one markup fragment into spans.
///
/// Formatting is decided once per call: if the fragment contains a bold tag
/// anywhere, every span is bold, and likewise for italic, underline and
/// code. Anchors split the text into plain and linked spans when their text
/// can be found in the stripped fragment. Fragments with no visible text
/// produce no spans.
pub fn markup_to_spans(markup: &str) -> Vec<RichText> {
    let plain = strip_html(markup);
    if plain.is_empty() {
        return Vec::new();
    }

    let scanner = MarkupScanner::new(markup);
    let annotations = Annotations {
        bold: scanner.has_open_tag(BOLD_TAGS),
        italic: scanner.has_open_tag(ITALIC_TAGS),
        strikethrough: false,
        underline: scanner.has_open_tag(UNDERLINE_TAGS),
        code: scanner.has_open_tag(CODE_TAGS),
    };

    split_on_anchors(&plain, &scanner.anchors(), annotations)
}

fn split_on_anchors(plain: &str, anchors: &[Anchor], annotations: Annotations) -> Vec<RichText> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for anchor in anchors {
        let Some(offset) = plain[cursor..].find(anchor.text.as_str()) else {
            continue;
        };
        let start = cursor + offset;
        let end = start + anchor.text.len();

        if start > cursor {
            spans.push(RichText::plain(&plain[cursor..start]).with_annotations(annotations));
        }
        spans.push(
            RichText::plain(&plain[start..end])
                .with_annotations(annotations)
                .with_href(anchor.href.as_str()),
        );
        cursor = end;
    }

    if cursor < plain.len() {
        spans.push(RichText::plain(&plain[cursor..]).with_annotations(annotations));
    }

    spans
}
