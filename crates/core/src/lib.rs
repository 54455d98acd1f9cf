//! Renders block-based rich-text editor documents as Markdown/MDX.
//!
//! Blocks are dispatched by type to a renderer, inline `<a>` tags in text
//! fields become Markdown links, and the fragments are joined with blank
//! lines. Unknown block types are skipped; malformed headers and images
//! abort the conversion.

pub mod block;
pub mod error;
pub mod inline;
pub mod renderer;

pub use block::{
    Block, EmbedData, HeaderData, ImageData, ImageFile, ListData, ListItem, ListMeta, ListStyle,
    ParagraphData, parse_document,
};
pub use error::{Error, RenderError, Result};
pub use inline::{LinkStrategy, normalize_links};
pub use renderer::{BLOCK_SEPARATOR, MarkdownRenderer, Options};

/// Converts blocks to Markdown with default options.
///
/// Nothing inside awaits; the conversion runs to completion on first poll.
pub async fn parse_to_markdown(blocks: &[Block]) -> Result<String> {
    MarkdownRenderer::default().render(blocks)
}

/// Parses a JSON document (a block array or an editor save object) and
/// renders it.
pub fn convert_json(json: &str, options: Options) -> Result<String> {
    let blocks = parse_document(json)?;
    MarkdownRenderer::new(options).render(&blocks)
}

/// Crate version reported to the bindings.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
