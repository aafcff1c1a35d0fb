//! # Parser - Recursive Descent Tree Construction
//!
//! This module turns a token stream into an owned [`Document`] tree. Grammar
//! functions take a `&mut Parser`, inspect the current token and return the
//! node they recognized.
//!
//! ## Cursor Discipline
//!
//! The cursor only moves forward, with one exception: the fence and
//! thematic-break probes in the block grammar run inside [`Parser::probe`],
//! which saves the cursor, lets the predicate look ahead by consuming tokens,
//! and always puts the cursor back. A probe therefore reports what it saw
//! without consuming anything; the caller decides how many tokens to take.
//!
//! ```text
//! let fence = p.probe(|p| {   // cursor saved
//!     let mut run = 0;
//!     while p.eat(BACKTICK) { run += 1; }
//!     (run >= 3).then_some(run)
//! });                         // cursor restored
//! ```
//!
//! ## Errors
//!
//! Parsing is lenient. Unclosed bold, italic and code spans still produce
//! nodes, and stray punctuation becomes text. The one hard failure is a link
//! whose `[` or `(` is never closed before end of input, reported as
//! [`ParseError::Unterminated`].
//!
//! ## Module Structure
//!
//! - [`grammar`] - Grammar rules (document, block, inline)
//!
//! ## Public API
//!
//! The main entry point is [`parse`]:
//!
//! ```
//! use markdown_lathe_syntax::parse;
//!
//! let doc = parse("# Hello\n").unwrap();
//! println!("{:#?}", doc);
//! ```

use std::fmt;

use thiserror::Error;

use crate::lexer::{Token, lex};
use crate::syntax_kind::SyntaxKind;
use crate::tree::Document;

mod grammar;

/// Deepest emphasis nesting the inline grammar builds. Openers past this
/// depth are read as literal text.
pub const MAX_INLINE_DEPTH: usize = 32;

/// The construct left open by an [`ParseError::Unterminated`] error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    /// `[` with no matching `]`
    LinkText,
    /// `(` after link text with no matching `)`
    LinkUrl,
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Construct::LinkText => f.write_str("link text (missing `]`)"),
            Construct::LinkUrl => f.write_str("link URL (missing `)`)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unterminated {construct} starting at byte {offset}")]
    Unterminated { construct: Construct, offset: usize },
}

impl ParseError {
    /// Byte offset the error points at.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::Unterminated { offset, .. } => *offset,
        }
    }

    /// Re-anchor the error at `offset`, for errors raised while parsing a
    /// derived buffer rather than the original source.
    pub fn relocated(self, offset: usize) -> Self {
        match self {
            ParseError::Unterminated { construct, .. } => {
                ParseError::Unterminated { construct, offset }
            }
        }
    }
}

/// Parse source text into a document.
pub fn parse(input: &str) -> Result<Document, ParseError> {
    let tokens = lex(input);
    Parser::new(&tokens).parse()
}

/// Parse an already lexed token stream.
pub fn parse_tokens(tokens: &[Token<'_>]) -> Result<Document, ParseError> {
    Parser::new(tokens).parse()
}

/// The parser state: a token slice and a cursor into it.
///
/// Grammar functions receive `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `at()`, `at_end()`, `current_text()`
/// - Consume tokens: `bump()`, `eat()`
/// - Look ahead without consuming: `probe()`
/// - Track emphasis nesting: `depth()`, `nested()`
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    depth: usize,
}

/// A saved cursor position, restored by [`Parser::rewind`].
#[must_use = "a checkpoint does nothing unless rewound to"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of tokens.
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parse the tokens into a document.
    pub fn parse(mut self) -> Result<Document, ParseError> {
        grammar::document(&mut self)
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.current() == SyntaxKind::EOF
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token unconditionally. EOF is never consumed.
    pub fn bump(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    /// Get the text of the current token.
    pub fn current_text(&self) -> &'input str {
        self.tokens.get(self.pos).map(|t| t.text).unwrap_or("")
    }

    /// Source offset of the current token.
    pub fn offset(&self) -> usize {
        match self.tokens.get(self.pos) {
            Some(token) => token.offset,
            None => self.tokens.last().map_or(0, |t| t.offset + t.text.len()),
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.pos)
    }

    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.0;
    }

    /// Run a lookahead predicate and restore the cursor afterwards,
    /// whatever the predicate consumed.
    pub fn probe<T>(&mut self, predicate: impl FnOnce(&mut Self) -> T) -> T {
        let checkpoint = self.checkpoint();
        let result = predicate(self);
        self.rewind(checkpoint);
        result
    }

    /// How many emphasis spans enclose the cursor.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Run `rule` one nesting level deeper.
    pub fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> T) -> T {
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }
}
