//! Caption rendering and alt-text derivation.
//!
//! Content items carry an optional markdown caption. Templates need two
//! renditions of it: HTML for the visible `<figcaption>`, and a plain-text
//! equivalent for the `alt` attribute. When there is no caption the alt text
//! falls back to the item's title, which the owning content model guarantees
//! to be non-blank — alt text is never empty for a non-decorative image.
//!
//! The markdown extension set is an explicit [`MarkdownOptions`] value passed
//! into each call. Callers hand the same value to their body renderer so
//! caption styling matches body styling.

use pulldown_cmark::{Event, Options, Parser, html};
use serde::{Deserialize, Serialize};

/// Markdown extension flags, mirrored onto `pulldown_cmark::Options`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub smart_punctuation: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            smart_punctuation: false,
        }
    }
}

impl MarkdownOptions {
    fn to_pulldown(self) -> Options {
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, self.tables);
        options.set(Options::ENABLE_FOOTNOTES, self.footnotes);
        options.set(Options::ENABLE_STRIKETHROUGH, self.strikethrough);
        options.set(Options::ENABLE_SMART_PUNCTUATION, self.smart_punctuation);
        options
    }
}

/// The two renditions of a caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionText {
    /// Rendered caption for on-page display. `None` when there is no caption.
    pub html: Option<String>,
    /// Markup-stripped caption, or the title fallback. Used as `alt` text.
    pub plain_text: String,
}

/// Render a markdown string to HTML.
///
/// Also used by host applications for body/summary fields, so captions and
/// bodies share one extension set.
pub fn render_markdown(text: &str, options: &MarkdownOptions) -> String {
    let parser = Parser::new_ext(text, options.to_pulldown());
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Reduce a markdown string to plain text: tags dropped, emphasis markers
/// resolved, entity references decoded. Works over parser events rather than
/// rendered HTML, so nothing needs un-escaping afterwards.
pub fn plain_text(text: &str, options: &MarkdownOptions) -> String {
    let parser = Parser::new_ext(text, options.to_pulldown());
    let mut out = String::new();
    for event in parser {
        match event {
            Event::Text(t) | Event::Code(t) => out.push_str(&t),
            Event::SoftBreak | Event::HardBreak => out.push(' '),
            // Raw HTML embedded in the caption is markup, not content
            Event::Html(_) | Event::InlineHtml(_) => {}
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Derive both caption renditions.
///
/// A missing or blank caption yields `html: None` and the title as plain
/// text. Never fails: malformed markdown degrades per the renderer (e.g.
/// unmatched emphasis markers come through literally).
pub fn derive_caption(
    caption: Option<&str>,
    title: &str,
    options: &MarkdownOptions,
) -> CaptionText {
    match caption.map(str::trim).filter(|c| !c.is_empty()) {
        Some(caption) => CaptionText {
            html: Some(render_markdown(caption, options)),
            plain_text: plain_text(caption, options),
        },
        None => CaptionText {
            html: None,
            plain_text: title.to_string(),
        },
    }
}
