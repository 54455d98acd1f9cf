//! Inline link normalization: `<a href="URL">LABEL</a>` becomes `[LABEL](URL)`.
//!
//! The structural pass takes every span matching the link pattern and runs it
//! through lol_html on its own, building the link from the tokenized `href`
//! and label. Text between spans, including other markup, is copied
//! byte-for-byte. If tokenizing fails, or disagrees with the pattern on any
//! span, the whole text is handed to a single regex substitution instead.

use lol_html::errors::RewritingError;
use lol_html::{HtmlRewriter, Settings, element, text};
use regex::Regex;
use serde::Deserialize;
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::LazyLock;
use tracing::warn;

/// Substring every convertible anchor contains.
const ANCHOR_OPENING: &str = "<a ";

static ANCHOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a href="([^"]+)">([^<]+)</a>"#).expect("anchor pattern is valid")
});

/// How inline anchors are located.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStrategy {
    /// HTML-aware rewrite with a pattern fallback.
    #[default]
    Structural,
    /// Regex substitution only.
    Pattern,
}

/// Converts canonical HTML anchors in `text` into Markdown links.
///
/// Never fails. Text without an anchor is returned borrowed and untouched.
pub fn normalize_links(text: &str, strategy: LinkStrategy) -> Cow<'_, str> {
    if !text.contains(ANCHOR_OPENING) {
        return Cow::Borrowed(text);
    }

    match strategy {
        LinkStrategy::Structural => recover(text, rewrite_anchors(text)),
        LinkStrategy::Pattern => replace_anchors(text),
    }
}

fn recover(text: &str, attempt: Result<String, RewriteFailure>) -> Cow<'_, str> {
    match attempt {
        Ok(rewritten) => Cow::Owned(rewritten),
        Err(err) => {
            warn!(error = %err, "structural link rewrite failed, using pattern fallback");
            replace_anchors(text)
        }
    }
}

fn replace_anchors(text: &str) -> Cow<'_, str> {
    ANCHOR_PATTERN.replace_all(text, "[${2}](${1})")
}

#[derive(Debug, thiserror::Error)]
enum RewriteFailure {
    #[error(transparent)]
    Rewriting(#[from] RewritingError),
    #[error("tokenizer disagrees with the link pattern on `{anchor}`")]
    Diverged { anchor: String },
}

/// What the scan saw of one `<a>` element.
#[derive(Debug, Default)]
struct AnchorScan {
    href: Option<String>,
    attributes: usize,
    label: String,
    nested: bool,
}

impl AnchorScan {
    /// The Markdown link for this anchor, if it has the canonical shape.
    fn markdown(&self) -> Option<String> {
        let href = self.href.as_deref()?;
        let label = self.label.as_str();

        if self.attributes != 1
            || self.nested
            || href.is_empty()
            || href.contains('"')
            || label.is_empty()
            || label.contains('<')
        {
            return None;
        }

        Some(format!("[{label}]({href})"))
    }
}

fn scan_anchors(html: &str) -> Result<Vec<AnchorScan>, RewritingError> {
    let anchors = Rc::new(RefCell::new(Vec::<AnchorScan>::new()));
    let nested = Rc::clone(&anchors);
    let opened = Rc::clone(&anchors);
    let labels = Rc::clone(&anchors);

    let mut settings = Settings::default();
    // Registered first so a child element marks its enclosing anchor, not
    // itself when the child is another anchor.
    settings.element_content_handlers = vec![
        element!("a *", move |_el| {
            if let Some(anchor) = nested.borrow_mut().last_mut() {
                anchor.nested = true;
            }
            Ok(())
        }),
        element!("a", move |el| {
            opened.borrow_mut().push(AnchorScan {
                href: el.get_attribute("href"),
                attributes: el.attributes().len(),
                ..AnchorScan::default()
            });
            Ok(())
        }),
        text!("a", move |chunk| {
            if let Some(anchor) = labels.borrow_mut().last_mut() {
                anchor.label.push_str(chunk.as_str());
            }
            Ok(())
        }),
    ];

    let mut rewriter = HtmlRewriter::new(settings, |_: &[u8]| {});
    rewriter.write(html.as_bytes())?;
    rewriter.end()?;

    Ok(anchors.take())
}

/// Tokenizes one anchor-shaped span on its own and builds its link from
/// what lol_html reports.
fn convert_span(span: &str) -> Result<String, RewriteFailure> {
    let anchors = scan_anchors(span)?;
    let link = match anchors.as_slice() {
        [anchor] => anchor.markdown(),
        _ => None,
    };

    link.map(|link| tidy(&link, span))
        .ok_or_else(|| RewriteFailure::Diverged {
            anchor: span.to_owned(),
        })
}

/// Candidate spans are exactly the pattern's matches, so markup outside
/// them (other anchors included) is never touched. Each span must tokenize
/// into the link the pattern would have produced.
fn rewrite_anchors(text: &str) -> Result<String, RewriteFailure> {
    let mut rewritten = String::with_capacity(text.len());
    let mut last = 0;

    for captures in ANCHOR_PATTERN.captures_iter(text) {
        let (Some(span), Some(href), Some(label)) =
            (captures.get(0), captures.get(1), captures.get(2))
        else {
            continue;
        };

        let link = convert_span(span.as_str())?;
        if link != format!("[{}]({})", label.as_str(), href.as_str()) {
            return Err(RewriteFailure::Diverged {
                anchor: span.as_str().to_owned(),
            });
        }

        rewritten.push_str(&text[last..span.start()]);
        rewritten.push_str(&link);
        last = span.end();
    }

    rewritten.push_str(&text[last..]);
    Ok(rewritten)
}

/// Removes artifacts an HTML pass may introduce but `source` did not
/// contain: a `<p>` wrapper, line breaks (one space per run) and
/// non-breaking spaces. Characters already present in `source` stay.
fn tidy(rewritten: &str, source: &str) -> String {
    let mut body = rewritten;
    if !source.trim_start().starts_with("<p>") {
        if let Some(inner) = body
            .trim()
            .strip_prefix("<p>")
            .and_then(|rest| rest.strip_suffix("</p>"))
        {
            body = inner;
        }
    }

    let keep_breaks = source.contains(['\n', '\r']);
    let keep_nbsp = source.contains('\u{a0}');

    let mut tidied = String::with_capacity(body.len());
    let mut in_break = false;
    for ch in body.chars() {
        match ch {
            '\n' | '\r' if !keep_breaks => {
                if !in_break {
                    tidied.push(' ');
                }
                in_break = true;
            }
            '\u{a0}' if !keep_nbsp => {
                tidied.push(' ');
                in_break = false;
            }
            other => {
                tidied.push(other);
                in_break = false;
            }
        }
    }
    tidied
}
