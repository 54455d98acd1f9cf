//! Editor document model.
//!
//! Blocks arrive as `{ "type": ..., "data": ... }` records. The type tag is
//! resolved once, here, into a closed [`Block`] enum so that rendering never
//! inspects raw JSON. Tags outside the recognized set become
//! [`Block::Unknown`] and their data is never looked at.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{BlockDataError, Error, Result};

/// One unit of editor content.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub enum Block {
    Header(HeaderData),
    Paragraph(ParagraphData),
    List(ListData),
    Image(ImageData),
    Embed(EmbedData),
    /// A type tag outside the recognized set. Renders to nothing.
    Unknown(String),
}

impl Block {
    /// The editor type tag this block was read from.
    pub fn kind(&self) -> &str {
        match self {
            Block::Header(_) => "header",
            Block::Paragraph(_) => "paragraph",
            Block::List(_) => "list",
            Block::Image(_) => "image",
            Block::Embed(_) => "embed",
            Block::Unknown(kind) => kind,
        }
    }
}

#[derive(Deserialize)]
struct RawBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

impl TryFrom<RawBlock> for Block {
    type Error = BlockDataError;

    fn try_from(raw: RawBlock) -> std::result::Result<Self, Self::Error> {
        let RawBlock { kind, data } = raw;

        match kind.as_str() {
            "header" => decode(&kind, data).map(Block::Header),
            "paragraph" => decode(&kind, data).map(Block::Paragraph),
            "list" => decode(&kind, data).map(Block::List),
            "image" => decode(&kind, data).map(Block::Image),
            "embed" => decode(&kind, data).map(Block::Embed),
            _ => Ok(Block::Unknown(kind.clone())),
        }
    }
}

fn decode<T>(kind: &str, data: Value) -> std::result::Result<T, BlockDataError>
where
    T: DeserializeOwned + Default,
{
    if data.is_null() {
        return Ok(T::default());
    }

    serde_json::from_value(data).map_err(|source| BlockDataError {
        kind: kind.to_owned(),
        source,
    })
}

/// Treats an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HeaderData {
    #[serde(default)]
    pub text: Option<String>,
    /// Kept signed and unchecked so out-of-range values reach the renderer,
    /// which rejects them with the offending value.
    #[serde(default, deserialize_with = "null_as_default")]
    pub level: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ParagraphData {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Ordered,
    Unordered,
    /// Any other style string, or none at all. Renders to nothing.
    #[default]
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListMeta {
    #[serde(default)]
    pub start: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub style: ListStyle,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<ListItem>,
    #[serde(default)]
    pub meta: Option<ListMeta>,
}

impl ListData {
    /// First numeral of an ordered list. Zero counts as unset.
    pub fn start(&self) -> i64 {
        self.meta
            .as_ref()
            .and_then(|meta| meta.start)
            .filter(|start| *start != 0)
            .unwrap_or(1)
    }
}

/// A list entry: bare text, or text with a nested sub-list of the same style.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawListItem")]
pub enum ListItem {
    Leaf(String),
    Node {
        content: String,
        items: Vec<ListItem>,
    },
}

impl ListItem {
    pub fn content(&self) -> &str {
        match self {
            ListItem::Leaf(content) | ListItem::Node { content, .. } => content,
        }
    }

    pub fn children(&self) -> &[ListItem] {
        match self {
            ListItem::Leaf(_) => &[],
            ListItem::Node { items, .. } => items,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawListItem {
    Text(String),
    Record {
        #[serde(default)]
        content: Option<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        items: Vec<ListItem>,
    },
}

impl From<RawListItem> for ListItem {
    fn from(raw: RawListItem) -> Self {
        match raw {
            RawListItem::Text(content) => ListItem::Leaf(content),
            RawListItem::Record { content, items } => ListItem::Node {
                content: content.unwrap_or_default(),
                items,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImageFile {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImageData {
    #[serde(default)]
    pub file: Option<ImageFile>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl ImageData {
    pub fn url(&self) -> Option<&str> {
        self.file.as_ref()?.url.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmbedData {
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub embed: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl EmbedData {
    /// Video hosts render as `<video>`; everything else as `<file>`.
    pub fn is_video(&self) -> bool {
        matches!(self.service.as_deref(), Some("youtube" | "vimeo"))
    }
}

/// Reads a block sequence from JSON.
///
/// Accepts either a bare array of blocks or the editor's save format,
/// `{ "time": ..., "blocks": [...], "version": ... }`.
pub fn parse_document(json: &str) -> Result<Vec<Block>> {
    let value: Value = serde_json::from_str(json)?;

    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(mut document) => match document.remove("blocks") {
            Some(blocks @ Value::Array(_)) => Ok(serde_json::from_value(blocks)?),
            Some(_) => Err(Error::InvalidDocument("`blocks` must be an array".into())),
            None => Err(Error::InvalidDocument("missing `blocks` array".into())),
        },
        _ => Err(Error::InvalidDocument(
            "expected an array of blocks or an object with `blocks`".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(value: Value) -> Block {
        serde_json::from_value(value).expect("block should deserialize")
    }

    #[test]
    fn resolves_known_type_tags() {
        let header = block(json!({ "type": "header", "data": { "text": "Hi", "level": 2 } }));
        assert_eq!(
            header,
            Block::Header(HeaderData {
                text: Some("Hi".into()),
                level: 2,
            })
        );
        assert_eq!(header.kind(), "header");
    }

    #[test]
    fn unknown_tags_keep_their_name_and_ignore_data() {
        let quote = block(json!({ "type": "quote", "data": { "text": 42 } }));
        assert_eq!(quote, Block::Unknown("quote".into()));
        assert_eq!(quote.kind(), "quote");
    }

    #[test]
    fn malformed_data_names_the_block_type() {
        let err = serde_json::from_value::<Block>(json!({
            "type": "paragraph",
            "data": { "text": ["not", "text"] }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("malformed `paragraph` block data"));
    }

    #[test]
    fn missing_data_falls_back_to_defaults() {
        assert_eq!(
            block(json!({ "type": "paragraph" })),
            Block::Paragraph(ParagraphData::default())
        );
    }

    #[test]
    fn list_items_accept_strings_and_records() {
        let list = block(json!({
            "type": "list",
            "data": {
                "style": "unordered",
                "items": [
                    "plain",
                    { "content": "parent", "meta": {}, "items": ["child"] },
                    { "content": "empty", "items": null }
                ]
            }
        }));

        let Block::List(data) = list else {
            panic!("expected a list block");
        };
        assert_eq!(data.style, ListStyle::Unordered);
        assert_eq!(
            data.items,
            vec![
                ListItem::Leaf("plain".into()),
                ListItem::Node {
                    content: "parent".into(),
                    items: vec![ListItem::Leaf("child".into())],
                },
                ListItem::Node {
                    content: "empty".into(),
                    items: Vec::new(),
                },
            ]
        );
    }

    #[test]
    fn unknown_or_missing_list_style_is_unrecognized() {
        let checklist = block(json!({ "type": "list", "data": { "style": "checklist" } }));
        let bare = block(json!({ "type": "list", "data": { "items": [] } }));

        for list in [checklist, bare] {
            let Block::List(data) = list else {
                panic!("expected a list block");
            };
            assert_eq!(data.style, ListStyle::Unrecognized);
        }
    }

    #[test]
    fn list_start_defaults_to_one() {
        let mut data = ListData::default();
        assert_eq!(data.start(), 1);

        data.meta = Some(ListMeta { start: Some(0) });
        assert_eq!(data.start(), 1);

        data.meta = Some(ListMeta { start: Some(4) });
        assert_eq!(data.start(), 4);
    }

    #[test]
    fn embed_services_split_video_from_files() {
        let video = EmbedData {
            service: Some("vimeo".into()),
            ..EmbedData::default()
        };
        let file = EmbedData {
            service: Some("coub".into()),
            ..EmbedData::default()
        };
        assert!(video.is_video());
        assert!(!file.is_video());
    }

    #[test]
    fn parses_bare_arrays_and_editor_documents() {
        let bare = parse_document(r#"[{ "type": "paragraph", "data": { "text": "a" } }]"#)
            .expect("array should parse");
        let saved = parse_document(
            r#"{ "time": 1, "version": "2.30.0",
                 "blocks": [{ "type": "paragraph", "data": { "text": "a" } }] }"#,
        )
        .expect("editor document should parse");

        assert_eq!(bare, saved);
        assert_eq!(bare.len(), 1);
    }

    #[test]
    fn rejects_documents_without_blocks() {
        assert!(matches!(
            parse_document(r#"{ "time": 1 }"#),
            Err(Error::InvalidDocument(_))
        ));
        assert!(matches!(
            parse_document(r#""text""#),
            Err(Error::InvalidDocument(_))
        ));
        assert!(matches!(parse_document("{"), Err(Error::Json(_))));
    }
}
