//! Visitors that turn a [`Document`] into output text.
//!
//! - [`HtmlRenderer`]: semantic HTML, pretty or compact
//! - [`PlainTextRenderer`]: markdown-like text for debugging
//! - [`StructureRenderer`]: the tagged JSON form, also used for caching

use std::fmt;
use std::str::FromStr;

use markdown_lathe_syntax::Document;
use thiserror::Error;

pub mod html;
pub mod structure;
pub mod text;

pub use html::{DEFAULT_INDENT, HtmlRenderer, escape_html};
pub use structure::{StructureError, StructureRenderer, from_value, to_value};
pub use text::PlainTextRenderer;

/// Output format for [`crate::Engine::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Html {
        pretty: bool,
    },
    Text,
    /// Structural form as pretty-printed JSON.
    Json,
}

impl Default for RenderMode {
    fn default() -> Self {
        RenderMode::Html { pretty: true }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RenderMode::Html { pretty: true } => "html",
            RenderMode::Html { pretty: false } => "html-compact",
            RenderMode::Text => "text",
            RenderMode::Json => "json",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown render mode `{0}` (expected html, html-compact, text or json)")]
pub struct UnknownRenderMode(pub String);

impl FromStr for RenderMode {
    type Err = UnknownRenderMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(RenderMode::Html { pretty: true }),
            "html-compact" | "compact" => Ok(RenderMode::Html { pretty: false }),
            "text" | "plain" => Ok(RenderMode::Text),
            "json" | "tree" => Ok(RenderMode::Json),
            _ => Err(UnknownRenderMode(s.to_string())),
        }
    }
}

pub fn render_html(document: &Document, pretty: bool) -> String {
    HtmlRenderer::new(pretty).render(document)
}

pub fn render_text(document: &Document) -> String {
    PlainTextRenderer::render(document)
}
