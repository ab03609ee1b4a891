//! Image shortcode rewriting.
//!
//! Articles embed images with a compact token syntax instead of raw HTML:
//!
//! ```text
//! {{img:path|position|width|optional caption}}
//! ```
//!
//! [`rewrite_image_shortcodes`] expands every well-formed token into a
//! semantic `<figure>` block *before* the text is handed to the markdown
//! renderer, so the produced HTML passes through untouched:
//!
//! ```text
//! {{img:uploads/photo.jpg|right|300|A beautiful sunset}}
//! ```
//!
//! becomes
//!
//! ```text
//! <figure class="markdown-image float-right" style="max-width: 300px;">
//!   <img src="/media/uploads/photo.jpg" alt="A beautiful sunset" loading="lazy">
//!   <figcaption>A beautiful sunset</figcaption>
//! </figure>
//! ```
//!
//! The grammar is deliberately strict and the failure mode deliberately soft:
//! a token that doesn't match exactly is left verbatim in the output. Article
//! text with a typo'd shortcode must never break rendering of the whole page.
//!
//! Matching is a single-pass scanner, not a regex. The token grammar is a
//! stable wire format (it lives inside stored article text), and a scanner
//! makes the pass-through guarantee for malformed input directly testable.

use maud::html;

/// Options threaded into every rewrite call.
///
/// The media root is an explicit value, not a process-wide setting, so
/// different call sites (e.g. preview rendering vs. feed generation) can
/// resolve relative paths differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcodeOptions {
    /// Prefix for relative image paths. Absolute `http(s)://` URLs bypass it.
    pub media_root: String,
}

impl Default for ShortcodeOptions {
    fn default() -> Self {
        Self {
            media_root: "/media/".to_string(),
        }
    }
}

/// Image placement within the article column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    Left,
    Right,
    #[default]
    Center,
    Full,
}

impl Position {
    /// Positions are cosmetic, so an unrecognized value falls back to
    /// `Center` instead of failing the whole token.
    fn parse(s: &str) -> Self {
        match s {
            "left" => Self::Left,
            "right" => Self::Right,
            "center" => Self::Center,
            "full" => Self::Full,
            _ => Self::Center,
        }
    }

    fn css_class(self) -> &'static str {
        match self {
            Self::Left => "float-left",
            Self::Right => "float-right",
            Self::Center => "center",
            Self::Full => "full",
        }
    }
}

/// A parsed occurrence of `{{img:path|position|width|caption?}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ShortcodeToken<'a> {
    path: &'a str,
    position: Position,
    width: u32,
    caption: Option<&'a str>,
}

const OPEN: &str = "{{img:";
const CLOSE: &str = "}}";

/// Replace every well-formed `{{img:...}}` token in `text` with `<figure>`
/// markup. Malformed tokens pass through verbatim; text that contains no
/// tokens (including the output of a previous pass) is returned unchanged.
pub fn rewrite_image_shortcodes(text: &str, options: &ShortcodeOptions) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];

        match parse_token(&candidate[OPEN.len()..]) {
            Some((token, consumed)) => {
                render_figure(&mut out, &token, options);
                rest = &candidate[OPEN.len() + consumed..];
            }
            None => {
                // Not a token. Emit one byte and rescan so an overlapping
                // start like `{{{img:...` is still found.
                out.push('{');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Parse the token body following `{{img:`. Returns the token and the number
/// of bytes consumed (including the closing braces), or `None` if the body
/// does not match the grammar exactly.
fn parse_token(body: &str) -> Option<(ShortcodeToken<'_>, usize)> {
    let (path, rest) = segment(body)?;
    let (position, rest) = segment(rest)?;

    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let width: u32 = rest[..digits].parse().ok()?;
    let rest = &rest[digits..];

    let (caption, rest) = if let Some(rest) = rest.strip_prefix('|') {
        let end = rest.find('}')?;
        (Some(&rest[..end]), &rest[end..])
    } else {
        (None, rest)
    };

    let rest = rest.strip_prefix(CLOSE)?;
    let consumed = body.len() - rest.len();

    Some((
        ShortcodeToken {
            path,
            position: Position::parse(position),
            width,
            caption,
        },
        consumed,
    ))
}

/// Take a non-empty run of characters up to (and consuming) the next `|`.
fn segment(s: &str) -> Option<(&str, &str)> {
    let idx = s.find('|')?;
    if idx == 0 {
        return None;
    }
    Some((&s[..idx], &s[idx + 1..]))
}

/// Resolve a token path against the media root. Absolute URLs pass through.
fn resolve_src(path: &str, media_root: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!(
            "{}/{}",
            media_root.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Append the `<figure>` markup for one token. Maud escapes the interpolated
/// path and caption, which is what keeps user-entered content from injecting
/// markup here.
fn render_figure(out: &mut String, token: &ShortcodeToken<'_>, options: &ShortcodeOptions) {
    let src = resolve_src(token.path, &options.media_root);
    // An absent or blank caption means the image is decorative: empty alt,
    // no figcaption.
    let caption = token.caption.map(str::trim).filter(|c| !c.is_empty());

    let markup = html! {
        figure class={ "markdown-image " (token.position.css_class()) }
               style=(format!("max-width: {}px;", token.width)) {
            img src=(src) alt=(caption.unwrap_or("")) loading="lazy";
            @if let Some(caption) = caption {
                figcaption { (caption) }
            }
        }
    };
    out.push_str(&markup.into_string());
}
