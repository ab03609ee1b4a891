//! # Imagemark
//!
//! A content pipeline for personal blogs: compact image shortcodes embedded
//! in markdown, plus web optimization for uploaded raster images. Everything
//! operates on in-memory values — the storage layer, URL routing, and page
//! templates live in the host application and call into this crate.
//!
//! # The Four Operations
//!
//! ```text
//! 1. Rewrite    {{img:path|pos|width|caption?}}  →  <figure> HTML
//! 2. Optimize   uploaded bytes                   →  resized, re-encoded bytes
//! 3. Thumbnail  uploaded bytes                   →  bounded-box JPEG preview
//! 4. Caption    markdown caption + title         →  HTML + plain alt text
//! ```
//!
//! Each operation is a pure, synchronous function over its inputs: no shared
//! state, no I/O inside the crate boundary, no ordering requirements between
//! calls. Bulk work (the CLI does this with rayon) is just independent calls
//! fanned out over a thread pool.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`shortcode`] | Single-pass scanner rewriting `{{img:...}}` tokens into `<figure>` markup |
//! | [`imaging`] | Decode, resize (Lanczos3), flatten, re-encode; thumbnail generation |
//! | [`caption`] | Caption markdown rendering and plain-text alt derivation |
//! | [`config`] | TOML pipeline configuration consumed by the CLI |
//!
//! # Design Decisions
//!
//! ## Scanner Over Regex
//!
//! The shortcode grammar is user-authored content stored inside article text,
//! so "malformed tokens pass through untouched" is a hard guarantee, not a
//! nicety. A hand-written single-pass scanner makes that guarantee directly
//! testable; a backtracking regex makes it an accident of engine semantics.
//!
//! ## Explicit Options, No Globals
//!
//! The media root and the markdown extension set are values threaded into
//! each call ([`shortcode::ShortcodeOptions`], [`caption::MarkdownOptions`]),
//! never process-wide defaults. Callers that want caption styling to match
//! body styling pass the same `MarkdownOptions` to both renderers.
//!
//! ## Bytes In, Bytes Out
//!
//! Image operations take a byte buffer and return an [`imaging::OptimizedImage`]
//! (bytes + filename + MIME type + final dimensions). The crate never learns
//! where the caller stores the result — local disk and cloud blobs look the
//! same from here.
//!
//! ## Format Preservation
//!
//! Re-encoding keeps the input format for JPEG/PNG/WebP/GIF (anything else
//! falls back to JPEG) so PNG transparency and WebP compression survive the
//! pipeline. Alpha is flattened onto white only when the chosen output
//! format cannot represent it — which today means JPEG.

pub mod caption;
pub mod config;
pub mod imaging;
pub mod shortcode;
