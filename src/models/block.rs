// file: src/models/block.rs
// description: typed content blocks and rich text spans in the remote editor's wire shape
// reference: https://developers.notion.com/reference/block

use serde::de::{DeserializeOwned, Error as DeError};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

const DEFAULT_CODE_LANGUAGE: &str = "plain text";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

/// A run of text with uniform formatting and an optional link target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RichTextWire", into = "RichTextWire")]
pub struct RichText {
    pub plain_text: String,
    pub annotations: Annotations,
    pub href: Option<String>,
}

impl RichText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            annotations: Annotations::default(),
            href: None,
        }
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}

#[derive(Serialize, Deserialize)]
struct RichTextWire {
    #[serde(rename = "type", default = "text_kind")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<TextContent>,
    #[serde(default)]
    annotations: Annotations,
    #[serde(default)]
    plain_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    href: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct TextContent {
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    link: Option<LinkTarget>,
}

#[derive(Serialize, Deserialize)]
struct LinkTarget {
    url: String,
}

fn text_kind() -> String {
    "text".to_string()
}

impl From<RichTextWire> for RichText {
    fn from(wire: RichTextWire) -> Self {
        let (content, link) = match wire.text {
            Some(text) => (text.content, text.link.map(|link| link.url)),
            None => (String::new(), None),
        };

        let plain_text = if wire.plain_text.is_empty() {
            content
        } else {
            wire.plain_text
        };

        Self {
            plain_text,
            annotations: wire.annotations,
            href: wire.href.or(link),
        }
    }
}

impl From<RichText> for RichTextWire {
    fn from(span: RichText) -> Self {
        Self {
            kind: text_kind(),
            text: Some(TextContent {
                content: span.plain_text.clone(),
                link: span.href.clone().map(|url| LinkTarget { url }),
            }),
            annotations: span.annotations,
            plain_text: span.plain_text,
            href: span.href,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListItemBody {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    /// Nested blocks fetched separately from the remote API.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBody {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for CodeBody {
    fn default() -> Self {
        Self {
            rich_text: Vec::new(),
            language: default_language(),
        }
    }
}

fn default_language() -> String {
    DEFAULT_CODE_LANGUAGE.to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Paragraph(TextBody),
    Heading1(TextBody),
    Heading2(TextBody),
    Heading3(TextBody),
    BulletedListItem(ListItemBody),
    NumberedListItem(ListItemBody),
    Quote(TextBody),
    Code(CodeBody),
    Divider,
    /// Any block type outside the supported vocabulary, e.g. `toggle`.
    Unsupported {
        kind: String,
        rich_text: Option<Vec<RichText>>,
    },
}

impl BlockContent {
    pub fn type_name(&self) -> &str {
        match self {
            BlockContent::Paragraph(_) => "paragraph",
            BlockContent::Heading1(_) => "heading_1",
            BlockContent::Heading2(_) => "heading_2",
            BlockContent::Heading3(_) => "heading_3",
            BlockContent::BulletedListItem(_) => "bulleted_list_item",
            BlockContent::NumberedListItem(_) => "numbered_list_item",
            BlockContent::Quote(_) => "quote",
            BlockContent::Code(_) => "code",
            BlockContent::Divider => "divider",
            BlockContent::Unsupported { kind, .. } => kind,
        }
    }

    fn from_wire(kind: &str, body: Value) -> Result<Self, serde_json::Error> {
        let content = match kind {
            "paragraph" => BlockContent::Paragraph(parse_body(body)?),
            "heading_1" => BlockContent::Heading1(parse_body(body)?),
            "heading_2" => BlockContent::Heading2(parse_body(body)?),
            "heading_3" => BlockContent::Heading3(parse_body(body)?),
            "bulleted_list_item" => BlockContent::BulletedListItem(parse_body(body)?),
            "numbered_list_item" => BlockContent::NumberedListItem(parse_body(body)?),
            "quote" => BlockContent::Quote(parse_body(body)?),
            "code" => BlockContent::Code(parse_body(body)?),
            "divider" => BlockContent::Divider,
            other => BlockContent::Unsupported {
                kind: other.to_string(),
                rich_text: body
                    .get("rich_text")
                    .cloned()
                    .map(serde_json::from_value)
                    .transpose()?,
            },
        };
        Ok(content)
    }
}

fn parse_body<T: DeserializeOwned + Default>(body: Value) -> Result<T, serde_json::Error> {
    if body.is_null() {
        Ok(T::default())
    } else {
        serde_json::from_value(body)
    }
}

/// One node of a remote document. `id` is present for blocks fetched from
/// the remote API and absent for blocks produced locally.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: Option<String>,
    pub content: BlockContent,
}

impl Block {
    pub fn new(content: BlockContent) -> Self {
        Self { id: None, content }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn paragraph(rich_text: Vec<RichText>) -> Self {
        Self::new(BlockContent::Paragraph(TextBody { rich_text }))
    }

    pub fn empty_paragraph() -> Self {
        Self::paragraph(Vec::new())
    }

    /// Levels outside 1..=3 are clamped.
    pub fn heading(level: u8, rich_text: Vec<RichText>) -> Self {
        let body = TextBody { rich_text };
        Self::new(match level {
            0 | 1 => BlockContent::Heading1(body),
            2 => BlockContent::Heading2(body),
            _ => BlockContent::Heading3(body),
        })
    }

    pub fn bulleted(rich_text: Vec<RichText>) -> Self {
        Self::new(BlockContent::BulletedListItem(ListItemBody {
            rich_text,
            children: Vec::new(),
        }))
    }

    pub fn numbered(rich_text: Vec<RichText>) -> Self {
        Self::new(BlockContent::NumberedListItem(ListItemBody {
            rich_text,
            children: Vec::new(),
        }))
    }

    pub fn quote(rich_text: Vec<RichText>) -> Self {
        Self::new(BlockContent::Quote(TextBody { rich_text }))
    }

    pub fn code(source: impl Into<String>) -> Self {
        Self::new(BlockContent::Code(CodeBody {
            rich_text: vec![RichText::plain(source)],
            language: default_language(),
        }))
    }

    pub fn divider() -> Self {
        Self::new(BlockContent::Divider)
    }

    pub fn type_name(&self) -> &str {
        self.content.type_name()
    }

    pub fn rich_text(&self) -> Option<&[RichText]> {
        match &self.content {
            BlockContent::Paragraph(body)
            | BlockContent::Heading1(body)
            | BlockContent::Heading2(body)
            | BlockContent::Heading3(body)
            | BlockContent::Quote(body) => Some(&body.rich_text),
            BlockContent::BulletedListItem(body) | BlockContent::NumberedListItem(body) => {
                Some(&body.rich_text)
            }
            BlockContent::Code(body) => Some(&body.rich_text),
            BlockContent::Divider => None,
            BlockContent::Unsupported { rich_text, .. } => rich_text.as_deref(),
        }
    }

    /// Concatenated span text; empty for blocks without rich text.
    pub fn plain_text(&self) -> String {
        self.rich_text()
            .map(|spans| spans.iter().map(|span| span.plain_text.as_str()).collect())
            .unwrap_or_default()
    }

    /// An empty paragraph marks the boundary between two highlights.
    pub fn is_blank_separator(&self) -> bool {
        matches!(&self.content, BlockContent::Paragraph(body) if body.rich_text.is_empty())
    }

    pub fn is_toggle(&self) -> bool {
        matches!(&self.content, BlockContent::Unsupported { kind, .. } if kind == "toggle")
    }

    pub fn same_type(&self, other: &Block) -> bool {
        self.type_name() == other.type_name()
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.type_name();
        let mut map = serializer.serialize_map(None)?;

        if let Some(id) = &self.id {
            map.serialize_entry("id", id)?;
        }
        map.serialize_entry("object", "block")?;
        map.serialize_entry("type", kind)?;

        match &self.content {
            BlockContent::Paragraph(body)
            | BlockContent::Heading1(body)
            | BlockContent::Heading2(body)
            | BlockContent::Heading3(body)
            | BlockContent::Quote(body) => map.serialize_entry(kind, body)?,
            BlockContent::BulletedListItem(body) | BlockContent::NumberedListItem(body) => {
                map.serialize_entry(kind, body)?
            }
            BlockContent::Code(body) => map.serialize_entry(kind, body)?,
            BlockContent::Divider => map.serialize_entry(kind, &Map::new())?,
            BlockContent::Unsupported { rich_text, .. } => match rich_text {
                Some(spans) => map.serialize_entry(
                    kind,
                    &TextBody {
                        rich_text: spans.clone(),
                    },
                )?,
                None => map.serialize_entry(kind, &Map::new())?,
            },
        }

        map.end()
    }
}

#[derive(Deserialize)]
struct RawBlock {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut raw = RawBlock::deserialize(deserializer)?;
        let body = raw.fields.remove(&raw.kind).unwrap_or(Value::Null);
        let content = BlockContent::from_wire(&raw.kind, body).map_err(D::Error::custom)?;

        Ok(Block {
            id: raw.id,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_paragraph_wire_shape() {
        let block = Block::paragraph(vec![RichText::plain("Hello")]);
        let value = serde_json::to_value(&block).unwrap();

        assert_eq!(value["type"], "paragraph");
        assert_eq!(value["paragraph"]["rich_text"][0]["plain_text"], "Hello");
        assert_eq!(value["paragraph"]["rich_text"][0]["text"]["content"], "Hello");
        assert_eq!(
            value["paragraph"]["rich_text"][0]["annotations"]["bold"],
            false
        );
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_link_serialises_both_locations() {
        let span = RichText::plain("docs").with_href("https://example.com");
        let value = serde_json::to_value(&span).unwrap();

        assert_eq!(value["href"], "https://example.com");
        assert_eq!(value["text"]["link"]["url"], "https://example.com");
    }

    #[test]
    fn test_deserialize_remote_block() {
        let value = json!({
            "object": "block",
            "id": "abc",
            "type": "heading_2",
            "has_children": false,
            "heading_2": {
                "rich_text": [{
                    "type": "text",
                    "text": {"content": "Title", "link": null},
                    "annotations": {
                        "bold": true, "italic": false, "strikethrough": false,
                        "underline": false, "code": false, "color": "default"
                    },
                    "plain_text": "Title",
                    "href": null
                }],
                "is_toggleable": false,
                "color": "default"
            }
        });

        let block: Block = serde_json::from_value(value).unwrap();
        assert_eq!(block.id.as_deref(), Some("abc"));
        assert_eq!(block.type_name(), "heading_2");
        assert_eq!(block.plain_text(), "Title");
        assert!(block.rich_text().unwrap()[0].annotations.bold);
    }

    #[test]
    fn test_link_read_from_text_content() {
        let value = json!({
            "type": "text",
            "text": {"content": "site", "link": {"url": "https://a.test"}}
        });

        let span: RichText = serde_json::from_value(value).unwrap();
        assert_eq!(span.plain_text, "site");
        assert_eq!(span.href.as_deref(), Some("https://a.test"));
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let value = json!({
            "type": "toggle",
            "toggle": {"rich_text": [{"plain_text": "Hidden"}]}
        });

        let block: Block = serde_json::from_value(value).unwrap();
        assert!(block.is_toggle());
        assert_eq!(block.plain_text(), "Hidden");
    }

    #[test]
    fn test_divider_without_body() {
        let block: Block = serde_json::from_value(json!({"type": "divider"})).unwrap();
        assert_eq!(block.content, BlockContent::Divider);
        assert!(block.rich_text().is_none());
    }

    #[test]
    fn test_blank_separator_detection() {
        assert!(Block::empty_paragraph().is_blank_separator());
        assert!(!Block::paragraph(vec![RichText::plain("x")]).is_blank_separator());
        assert!(!Block::quote(Vec::new()).is_blank_separator());
    }

    #[test]
    fn test_list_children_round_trip() {
        let mut parent = Block::bulleted(vec![RichText::plain("outer")]);
        if let BlockContent::BulletedListItem(body) = &mut parent.content {
            body.children.push(Block::bulleted(vec![RichText::plain("inner")]));
        }

        let json = serde_json::to_string(&parent).unwrap();
        let decoded: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, parent);
    }

    #[test]
    fn test_code_defaults_language() {
        let block: Block = serde_json::from_value(json!({
            "type": "code",
            "code": {"rich_text": [{"plain_text": "let x = 1;"}]}
        }))
        .unwrap();

        match block.content {
            BlockContent::Code(body) => assert_eq!(body.language, "plain text"),
            other => panic!("unexpected content: {:?}", other),
        }
    }
}
