// file: src/converter/scanner.rs
// description: tag-level scanner over the supported markup vocabulary
// reference: internal markup conversion

/// Byte offsets of one `<tag ...>inner</tag>` element in the scanned source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    pub start: usize,
    pub open_end: usize,
    pub close_start: usize,
    pub end: usize,
}

impl Element {
    pub fn outer<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }

    pub fn inner<'s>(&self, source: &'s str) -> &'s str {
        &source[self.open_end..self.close_start]
    }

    pub fn open_tag<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.open_end]
    }
}

/// Anchor with a resolved target and its stripped inner text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
}

/// Finds elements by exact tag name, case-insensitively. Each element closes
/// at the first matching closing tag after it opens, so nested elements of
/// the same name are not balanced.
pub struct MarkupScanner<'a> {
    source: &'a str,
    // ASCII lowercasing keeps byte offsets identical to `source`
    lower: String,
}

impl<'a> MarkupScanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            lower: source.to_ascii_lowercase(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// First complete `tag` element starting at or after `from`.
    pub fn find(&self, tag: &str, from: usize) -> Option<Element> {
        let mut cursor = from;

        while let Some(offset) = self.lower.get(cursor..)?.find('<') {
            let start = cursor + offset;

            if let Some(open_end) = self.open_tag_end(start, tag) {
                // no closing tag after this one means none after any later one
                let (close_start, end) = self.closing_tag(open_end, tag)?;
                return Some(Element {
                    start,
                    open_end,
                    close_start,
                    end,
                });
            }

            cursor = start + 1;
        }

        None
    }

    /// All non-overlapping `tag` elements, in document order.
    pub fn elements(&self, tag: &str) -> Vec<Element> {
        let mut found = Vec::new();
        let mut cursor = 0;

        while let Some(element) = self.find(tag, cursor) {
            cursor = element.end;
            found.push(element);
        }

        found
    }

    /// Whether any opening tag with one of `tags` appears, closed or not.
    pub fn has_open_tag(&self, tags: &[&str]) -> bool {
        self.lower
            .match_indices('<')
            .any(|(start, _)| tags.iter().any(|tag| self.open_tag_end(start, tag).is_some()))
    }

    /// Anchors that carry an `href` and some visible text.
    pub fn anchors(&self) -> Vec<Anchor> {
        self.elements("a")
            .into_iter()
            .filter_map(|element| {
                let href = attribute(element.open_tag(self.source), "href")?;
                let text = strip_html(element.inner(self.source));
                if href.is_empty() || text.is_empty() {
                    return None;
                }
                Some(Anchor { href, text })
            })
            .collect()
    }

    fn open_tag_end(&self, start: usize, tag: &str) -> Option<usize> {
        let name_start = start + 1;
        if !self.lower.get(name_start..)?.starts_with(tag) {
            return None;
        }

        let after = name_start + tag.len();
        let rest = &self.lower[after..];
        match rest.chars().next()? {
            '>' => Some(after + 1),
            c if c.is_ascii_whitespace() || c == '/' => rest.find('>').map(|i| after + i + 1),
            _ => None,
        }
    }

    fn closing_tag(&self, from: usize, tag: &str) -> Option<(usize, usize)> {
        let needle = format!("</{}", tag);
        let mut cursor = from;

        while let Some(offset) = self.lower[cursor..].find(&needle) {
            let close_start = cursor + offset;
            let after = close_start + needle.len();
            let rest = &self.lower[after..];
            let trimmed = rest.trim_start();

            if trimmed.starts_with('>') {
                return Some((close_start, after + (rest.len() - trimmed.len()) + 1));
            }
            cursor = after;
        }

        None
    }
}

/// Repeatedly takes the first `tag` element out of `working`, returning the
/// inner markup of each in the order removed.
pub fn take_elements(working: &mut String, tag: &str) -> Vec<String> {
    let mut taken = Vec::new();

    loop {
        let Some(element) = MarkupScanner::new(working.as_str()).find(tag, 0) else {
            break;
        };
        taken.push(element.inner(working).to_string());
        working.replace_range(element.start..element.end, "");
    }

    taken
}

/// Removes every `tag` element, content included.
pub fn remove_elements(source: &str, tag: &str) -> String {
    let scanner = MarkupScanner::new(source);
    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;

    for element in scanner.elements(tag) {
        output.push_str(&source[cursor..element.start]);
        cursor = element.end;
    }
    output.push_str(&source[cursor..]);

    output
}

/// Drops every `<...>` run. A `<` with no closing `>` is kept as text.
pub fn strip_tags(source: &str) -> String {
    replace_tags(source, "")
}

fn replace_tags(source: &str, replacement: &str) -> String {
    let mut output = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(open) = rest.find('<') {
        match rest[open..].find('>') {
            Some(close) => {
                output.push_str(&rest[..open]);
                output.push_str(replacement);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    output.push_str(rest);

    output
}

const ENTITIES: &[(&str, char)] = &[
    ("&nbsp;", ' '),
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#39;", '\''),
];

/// Decodes the handful of entities the editor emits, in a single pass.
pub fn decode_entities(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        output.push_str(&rest[..amp]);
        rest = &rest[amp..];

        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, decoded)) => {
                output.push(*decoded);
                rest = &rest[entity.len()..];
            }
            None => {
                output.push('&');
                rest = &rest[1..];
            }
        }
    }
    output.push_str(rest);

    output
}

/// Visible text of a markup fragment, trimmed.
pub fn strip_html(markup: &str) -> String {
    decode_entities(&strip_tags(markup)).trim().to_string()
}

/// Visible words of a markup fragment with every tag read as a word break,
/// so text from adjacent blocks never runs together. Whitespace is collapsed.
pub fn markup_words(markup: &str) -> String {
    decode_entities(&replace_tags(markup, " "))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// Value of `name` inside an opening tag; quoted or bare. Attributes are
/// walked one at a time, so text inside another quoted value never matches.
fn attribute(open_tag: &str, name: &str) -> Option<String> {
    let body = open_tag.strip_prefix('<')?;
    let body = body.strip_suffix('>').unwrap_or(body);

    // tag name
    let mut rest = body.trim_start_matches(|c: char| !c.is_ascii_whitespace() && c != '/');

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '/');
        if rest.is_empty() {
            return None;
        }

        let name_end = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        let attribute_name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let value = match rest.strip_prefix('=') {
            Some(after_eq) => {
                let after_eq = after_eq.trim_start();
                match after_eq.chars().next() {
                    Some(quote @ ('"' | '\'')) => {
                        let quoted = &after_eq[1..];
                        let close = quoted.find(quote)?;
                        rest = &quoted[close + 1..];
                        Some(&quoted[..close])
                    }
                    _ => {
                        let end = after_eq
                            .find(|c: char| c.is_ascii_whitespace())
                            .unwrap_or(after_eq.len());
                        rest = &after_eq[end..];
                        Some(&after_eq[..end])
                    }
                }
            }
            None => None,
        };

        if attribute_name.eq_ignore_ascii_case(name) {
            return value.map(|raw| decode_entities(raw.trim()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_element_with_attributes() {
        let source = r#"<div><h2 class="x">Title</h2></div>"#;
        let scanner = MarkupScanner::new(source);
        let element = scanner.find("h2", 0).unwrap();

        assert_eq!(element.inner(source), "Title");
        assert_eq!(element.outer(source), r#"<h2 class="x">Title</h2>"#);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let source = "<P>Loud</P>";
        let element = MarkupScanner::new(source).find("p", 0).unwrap();
        assert_eq!(element.inner(source), "Loud");
    }

    #[test]
    fn test_tag_names_match_exactly() {
        let scanner = MarkupScanner::new("<pre>code</pre><br><u2>x</u2>");

        assert!(scanner.find("p", 0).is_none());
        assert!(!scanner.has_open_tag(&["b", "u"]));
        assert!(scanner.has_open_tag(&["pre"]));
    }

    #[test]
    fn test_unclosed_element_is_ignored() {
        let scanner = MarkupScanner::new("<h1>never closed <h1>also open");
        assert!(scanner.find("h1", 0).is_none());
    }

    #[test]
    fn test_elements_span_lines() {
        let source = "<ul>\n<li>a</li>\n<li>b</li>\n</ul>";
        let scanner = MarkupScanner::new(source);
        let inner: Vec<&str> = scanner
            .elements("li")
            .iter()
            .map(|element| element.inner(source))
            .collect();

        assert_eq!(inner, vec!["a", "b"]);
    }

    #[test]
    fn test_take_elements_empties_working_text() {
        let mut working = "<h1>One</h1><p>body</p><h1>Two</h1>".to_string();
        let taken = take_elements(&mut working, "h1");

        assert_eq!(taken, vec!["One", "Two"]);
        assert_eq!(working, "<p>body</p>");
    }

    #[test]
    fn test_remove_elements() {
        let source = "a<ul><li>x</li></ul>b<ul><li>y</li></ul>c";
        assert_eq!(remove_elements(source, "ul"), "abc");
    }

    #[test]
    fn test_strip_html_decodes_entities_once() {
        assert_eq!(strip_html("<p>Tom &amp;amp; Jerry&nbsp;</p>"), "Tom &amp; Jerry");
        assert_eq!(strip_html("a &lt;b&gt; &quot;c&quot; &#39;d&#39;"), "a <b> \"c\" 'd'");
    }

    #[test]
    fn test_strip_tags_keeps_lone_angle_bracket() {
        assert_eq!(strip_tags("1 < 2 <b>yes</b>"), "1 < 2 yes");
        assert_eq!(strip_tags("x <y"), "x <y");
    }

    #[test]
    fn test_markup_words_separates_blocks() {
        assert_eq!(
            markup_words("<h2>Deep work</h2><ul><li>protect&nbsp;mornings</li></ul>"),
            "Deep work protect mornings"
        );
        assert_eq!(strip_html("<h2>Deep work</h2><p>next</p>"), "Deep worknext");
    }

    #[test]
    fn test_anchor_href_forms() {
        let scanner = MarkupScanner::new(
            r#"<a href="https://a.example">A</a> <a class='k' HREF='https://b.example?x=1&amp;y=2'>B</a> <a href=c.html>C</a> <a data-href="no">D</a>"#,
        );
        let anchors = scanner.anchors();

        assert_eq!(
            anchors,
            vec![
                Anchor {
                    href: "https://a.example".to_string(),
                    text: "A".to_string()
                },
                Anchor {
                    href: "https://b.example?x=1&y=2".to_string(),
                    text: "B".to_string()
                },
                Anchor {
                    href: "c.html".to_string(),
                    text: "C".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_href_inside_another_attribute_value_is_ignored() {
        let scanner = MarkupScanner::new(
            r#"<a title="see href=x" href="y">first</a> <a data-note='href="z"' href=w>second</a>"#,
        );
        let hrefs: Vec<String> = scanner.anchors().into_iter().map(|a| a.href).collect();

        assert_eq!(hrefs, vec!["y", "w"]);
    }

    #[test]
    fn test_anchor_without_href_value_is_skipped() {
        let scanner = MarkupScanner::new(r#"<a href>bare</a><a name="top">named</a>"#);
        assert!(scanner.anchors().is_empty());
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_attribute("x\"y"), "x&quot;y");
    }
}
