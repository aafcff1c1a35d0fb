//! The parse/render service.
//!
//! [`Engine`] owns one [`CacheManager`] and routes every call through it.
//! There is no process-wide state: callers that want to share memoized
//! results share the engine by reference.

use std::sync::Arc;
use std::time::{Duration, Instant};

use markdown_lathe_syntax::{Document, OwnedToken, ParseError, Token, lex, parse_tokens};
use thiserror::Error;

use crate::cache::CacheManager;
use crate::render::{DEFAULT_INDENT, HtmlRenderer, PlainTextRenderer, RenderMode, structure};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to serialize tree: {0}")]
    Json(#[from] serde_json::Error),
}

/// A parsed document and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub document: Document,
    pub cached: bool,
    /// Time spent lexing and parsing. `None` for cache hits.
    pub elapsed: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct Engine {
    cache: CacheManager,
    indent: Option<usize>,
}

impl Engine {
    pub fn new(cache: CacheManager) -> Self {
        Self {
            cache,
            indent: None,
        }
    }

    /// Spaces per nesting level in pretty HTML.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// Tokens for `text`, from the `tokens:` namespace when present.
    pub fn tokenize(&self, text: &str) -> Vec<OwnedToken> {
        self.tokens(text).to_vec()
    }

    pub fn parse(&self, text: &str) -> Result<Document, EngineError> {
        self.parse_traced(text).map(|parsed| parsed.document)
    }

    /// Like [`Engine::parse`], also reporting whether the tree was cached.
    pub fn parse_traced(&self, text: &str) -> Result<Parsed, EngineError> {
        if let Some(document) = self.cache.get_tree(text) {
            return Ok(Parsed {
                document,
                cached: true,
                elapsed: None,
            });
        }

        let start = Instant::now();
        let owned = self.tokens(text);
        let tokens: Vec<Token<'_>> = owned.iter().map(OwnedToken::as_token).collect();
        let document = parse_tokens(&tokens)?;
        let elapsed = start.elapsed();
        log::debug!(
            "parsed {} bytes into {} blocks in {elapsed:?}",
            text.len(),
            document.blocks.len()
        );

        self.cache.set_tree(text, &document);
        Ok(Parsed {
            document,
            cached: false,
            elapsed: Some(elapsed),
        })
    }

    /// Render an already parsed document. Not cached.
    pub fn render(&self, document: &Document, mode: RenderMode) -> Result<String, EngineError> {
        let start = Instant::now();
        let output = match mode {
            RenderMode::Html { pretty } => self.html_renderer(pretty).render(document),
            RenderMode::Text => PlainTextRenderer::render(document),
            RenderMode::Json => serde_json::to_string_pretty(&structure::to_value(document))?,
        };
        log::debug!("rendered {mode} in {:?}", start.elapsed());
        Ok(output)
    }

    /// Parse and render `text` as HTML, from the `html:` namespace when
    /// present.
    pub fn render_html(&self, text: &str, pretty: bool) -> Result<String, EngineError> {
        if let Some(html) = self.cache.get_html(text, pretty) {
            return Ok(html.to_string());
        }

        let document = self.parse(text)?;
        let html = self.render(&document, RenderMode::Html { pretty })?;
        self.cache.set_html(text, pretty, Arc::from(html.as_str()));
        Ok(html)
    }

    fn tokens(&self, text: &str) -> Arc<[OwnedToken]> {
        if let Some(tokens) = self.cache.get_tokens(text) {
            return tokens;
        }
        let tokens: Arc<[OwnedToken]> = lex(text).iter().map(Token::to_owned_token).collect();
        self.cache.set_tokens(text, Arc::clone(&tokens));
        tokens
    }

    fn html_renderer(&self, pretty: bool) -> HtmlRenderer {
        HtmlRenderer::new(pretty).with_indent(self.indent.unwrap_or(DEFAULT_INDENT))
    }
}
