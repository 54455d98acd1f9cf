//! Per-block Markdown/MDX renderers and the document assembler.

use serde::Deserialize;
use std::borrow::Cow;
use tracing::{debug, instrument};

use crate::block::{
    Block, EmbedData, HeaderData, ImageData, ListData, ListItem, ListStyle, ParagraphData,
};
use crate::error::{Error, RenderError, Result};
use crate::inline::{LinkStrategy, normalize_links};

/// Separator placed between rendered blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n";

const INDENT: &str = "  ";

/// Rendering configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// How inline `<a>` tags inside text fields are found.
    pub link_strategy: LinkStrategy,
}

/// Turns editor blocks into Markdown/MDX fragments and whole documents.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    /// Creates a renderer with the given options.
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// The options this renderer was built with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Renders every block in order and joins the non-empty fragments with a
    /// blank line. The first failing block aborts the whole document.
    #[instrument(level = "debug", skip_all, fields(blocks = blocks.len()))]
    pub fn render(&self, blocks: &[Block]) -> Result<String> {
        let mut fragments = Vec::with_capacity(blocks.len());

        for (index, block) in blocks.iter().enumerate() {
            let fragment = self.render_block(block).map_err(|source| Error::Render {
                index,
                kind: block.kind().to_owned(),
                source,
            })?;

            if !fragment.is_empty() {
                fragments.push(fragment);
            }
        }

        debug!(fragments = fragments.len(), "rendered document");
        Ok(fragments.join(BLOCK_SEPARATOR))
    }

    /// Renders a single block. Unknown blocks yield an empty fragment.
    pub fn render_block(&self, block: &Block) -> Result<String, RenderError> {
        match block {
            Block::Header(data) => self.header(data),
            Block::Paragraph(data) => Ok(self.paragraph(data)),
            Block::List(data) => Ok(self.list(data)),
            Block::Image(data) => self.image(data),
            Block::Embed(data) => Ok(self.embed(data)),
            Block::Unknown(_) => Ok(String::new()),
        }
    }

    /// `level` hashes, a space, then the link-normalized text.
    ///
    /// Levels outside `1..=6` are rejected with the offending value.
    pub fn header(&self, data: &HeaderData) -> Result<String, RenderError> {
        let level = match data.level {
            level @ 1..=6 => level as usize,
            level => return Err(RenderError::InvalidHeaderLevel { level }),
        };

        let text = self.inline(data.text.as_deref());
        Ok(format!("{} {text}", "#".repeat(level)))
    }

    /// The link-normalized text, or an empty string when absent.
    pub fn paragraph(&self, data: &ParagraphData) -> String {
        self.inline(data.text.as_deref()).into_owned()
    }

    /// One line per item: `-` or `N.` markers, two spaces of indent per
    /// nesting level, nested lists numbered from 1. Empty lists and
    /// unrecognized styles render nothing.
    ///
    /// Nested items are walked with an explicit stack, so input depth never
    /// turns into call-stack depth.
    pub fn list(&self, data: &ListData) -> String {
        let ordered = match data.style {
            ListStyle::Ordered => true,
            ListStyle::Unordered => false,
            ListStyle::Unrecognized => return String::new(),
        };

        let mut lines = Vec::new();
        let mut stack = vec![ListFrame {
            items: data.items.iter(),
            depth: 0,
            ordinal: i128::from(data.start()),
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(item) = frame.items.next() else {
                stack.pop();
                continue;
            };

            let depth = frame.depth;
            let marker: Cow<'_, str> = if ordered {
                Cow::Owned(format!("{}.", frame.ordinal))
            } else {
                Cow::Borrowed("-")
            };
            frame.ordinal += 1;

            lines.push(format!(
                "{}{marker} {}",
                INDENT.repeat(depth),
                self.inline(Some(item.content()))
            ));

            let children = item.children();
            if !children.is_empty() {
                stack.push(ListFrame {
                    items: children.iter(),
                    depth: depth + 1,
                    ordinal: 1,
                });
            }
        }

        lines.join("\n")
    }

    /// `![ALT](URL "TITLE")`, where the caption supplies both alt text and
    /// title. Without a caption the alt text is `Image` and the title is
    /// omitted. A missing `file.url` is an error.
    pub fn image(&self, data: &ImageData) -> Result<String, RenderError> {
        let url = data.url().ok_or(RenderError::MissingField {
            block: "image",
            field: "file.url",
        })?;

        let caption = self.caption(data.caption.as_deref());
        Ok(match caption {
            Some(caption) => format!("![{caption}]({url} \"{caption}\")"),
            None => format!("![Image]({url})"),
        })
    }

    /// A `<video>` tag for YouTube and Vimeo, otherwise a `<file>` tag named
    /// after the caption or the last path segment of the URL.
    pub fn embed(&self, data: &EmbedData) -> String {
        let embed = data.embed.as_deref().unwrap_or_default();

        if data.is_video() {
            return format!(
                r#"<video align="center" src="{embed}" width="80%" isUpload="true" />"#
            );
        }

        let src = data
            .source
            .as_deref()
            .filter(|source| !source.is_empty())
            .unwrap_or(embed);
        let name = match self.caption(data.caption.as_deref()) {
            Some(caption) => caption,
            None => Cow::Borrowed(file_name(src)),
        };

        format!(r#"<file name="{name}" align="center" src="{src}" width="80%" isUpload="true" />"#)
    }

    fn inline<'a>(&self, text: Option<&'a str>) -> Cow<'a, str> {
        normalize_links(text.unwrap_or_default(), self.options.link_strategy)
    }

    /// Normalized caption, treating an empty one as absent.
    fn caption<'a>(&self, caption: Option<&'a str>) -> Option<Cow<'a, str>> {
        caption
            .filter(|caption| !caption.is_empty())
            .map(|caption| self.inline(Some(caption)))
    }
}

struct ListFrame<'a> {
    items: std::slice::Iter<'a, ListItem>,
    depth: usize,
    /// Wide enough that any `i64` start plus any item count fits.
    ordinal: i128,
}

/// Everything after the last `/`, or the whole string when there is none.
fn file_name(url: &str) -> &str {
    url.rsplit_once('/').map_or(url, |(_, name)| name)
}
