//! # Lexer - Tokenizing Markdown Source
//!
//! This module provides the first stage of parsing: breaking source text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## Totality
//!
//! Lexing never fails. Every character belongs to some token rule, and anything
//! Logos cannot classify falls back to `TEXT`. The output always ends with
//! exactly one `EOF` token whose offset is the input length.
//!
//! Apart from line endings, the lexer is lossless: concatenating the token
//! texts gives back the input. Line endings (`\n`, `\r\n` or a lone `\r`) are
//! normalized so that every `NEWLINE` token carries the text `"\n"`.
//!
//! ```
//! use markdown_lathe_syntax::lexer::lex;
//!
//! let tokens = lex("# Hello\r\nworld");
//! let text: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(text, "# Hello\nworld");
//! ```
//!
//! ## Why Two Token Enums?
//!
//! Logos needs its own enum for `#[derive(Logos)]`, and some of its variants
//! are not final kinds: a run of spaces becomes `SPACE` or `INDENT` depending
//! on its width, and a digit run without a trailing `.` is plain `TEXT`.
//! [`lex`] resolves these into [`SyntaxKind`].
//!
//! ## Priority
//!
//! The token rules are arranged so the longest match implements the
//! dialect's priority table:
//!
//! - `**` wins over `*`
//! - `12.` is a `NUMBER` marker, while `12a` and `2024` are `TEXT`
//! - single punctuation characters (`# - _ ` [ ] ( )`) are tokens on their own
//! - everything else groups into maximal `TEXT` runs
//!
//! ## Fence Labels
//!
//! A run of three or more backticks at the start of a line opens a code fence.
//! The rest of that line is the fence's language label, so after the main
//! pass the tokens between the run and the next newline are folded into a
//! single `TEXT` token sliced straight from the source.

use std::fmt;

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// Space runs at least this wide lex as `INDENT` instead of `SPACE`.
pub const INDENT_WIDTH: usize = 4;

/// Minimum backtick run that opens a code fence.
pub const FENCE_MIN: usize = 3;

/// Token kinds produced by the Logos lexer.
///
/// This enum exists separately from [`SyntaxKind`] because Logos needs to
/// derive on it, and because `Spaces` and `Digits` only become final kinds
/// once their text is known.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Line ending (LF, CRLF or bare CR)
    #[regex(r"\r\n|\r|\n")]
    Newline,

    /// Run of space characters
    #[regex(r" +")]
    Spaces,

    /// `#` for headings
    #[token("#")]
    Hash,

    /// `-` for lists and thematic breaks
    #[token("-")]
    Dash,

    /// `**` for bold
    #[token("**")]
    DoubleStar,

    /// `*` for italics and thematic breaks
    #[token("*")]
    Star,

    /// `_` for italics
    #[token("_")]
    Underscore,

    /// Single backtick
    #[token("`")]
    Backtick,

    /// `[` for links
    #[token("[")]
    LBracket,

    /// `]` for links
    #[token("]")]
    RBracket,

    /// `(` for link URLs
    #[token("(")]
    LParen,

    /// `)` for link URLs
    #[token(")")]
    RParen,

    /// Ordered list marker: digits followed by a literal dot
    #[regex(r"[0-9]+\.")]
    Number,

    /// Text starting with a digit that is not a number marker
    #[regex(r"[0-9]+([^\r\n `*#_\[\]().0-9-][^\r\n `*#_\[\]()-]*)?")]
    Digits,

    /// Plain text - anything not matched by other rules
    #[regex(r"[^\r\n `*#_\[\]()0-9-][^\r\n `*#_\[\]()-]*")]
    Text,
}

impl TokenKind {
    /// Convert to SyntaxKind.
    ///
    /// `Spaces` maps to `SPACE` here; [`lex`] upgrades wide runs to `INDENT`.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::Spaces => SyntaxKind::SPACE,
            TokenKind::Hash => SyntaxKind::HASH,
            TokenKind::Dash => SyntaxKind::DASH,
            TokenKind::DoubleStar => SyntaxKind::DOUBLE_STAR,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::Underscore => SyntaxKind::UNDERSCORE,
            TokenKind::Backtick => SyntaxKind::BACKTICK,
            TokenKind::LBracket => SyntaxKind::LBRACKET,
            TokenKind::RBracket => SyntaxKind::RBRACKET,
            TokenKind::LParen => SyntaxKind::LPAREN,
            TokenKind::RParen => SyntaxKind::RPAREN,
            TokenKind::Number => SyntaxKind::NUMBER,
            TokenKind::Digits | TokenKind::Text => SyntaxKind::TEXT,
        }
    }
}

/// A lexed token with its kind, text slice and byte offset into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: usize,
}

impl Token<'_> {
    /// Copy the token out of its source buffer.
    pub fn to_owned_token(&self) -> OwnedToken {
        OwnedToken {
            kind: self.kind,
            text: self.text.to_string(),
            offset: self.offset,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} @{}", self.kind, self.text, self.offset)
    }
}

/// A token that owns its text, for storing token streams beyond the
/// lifetime of the source buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnedToken {
    pub kind: SyntaxKind,
    pub text: String,
    pub offset: usize,
}

impl OwnedToken {
    /// Borrow as a [`Token`] so it can be fed back to the parser.
    pub fn as_token(&self) -> Token<'_> {
        Token {
            kind: self.kind,
            text: &self.text,
            offset: self.offset,
        }
    }
}

impl fmt::Display for OwnedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_token().fmt(f)
    }
}

/// Lex the input into a sequence of tokens terminated by a single `EOF`.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let offset = lexer.span().start;
        let text = lexer.slice();
        let kind = match result {
            Ok(TokenKind::Spaces) if text.len() >= INDENT_WIDTH => SyntaxKind::INDENT,
            Ok(token_kind) => token_kind.to_syntax_kind(),
            // Logos error means unrecognized character - treat as TEXT
            Err(()) => SyntaxKind::TEXT,
        };
        let text = if kind == SyntaxKind::NEWLINE {
            "\n"
        } else {
            text
        };
        tokens.push(Token { kind, text, offset });
    }

    let mut tokens = capture_fence_labels(input, tokens);

    tokens.push(Token {
        kind: SyntaxKind::EOF,
        text: "",
        offset: input.len(),
    });
    tokens
}

/// Fold everything after a line-start fence run, up to the line end, into one
/// `TEXT` token holding the raw label. Single pass over `tokens`.
fn capture_fence_labels<'a>(input: &'a str, tokens: Vec<Token<'a>>) -> Vec<Token<'a>> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut tokens = tokens.into_iter().peekable();
    let mut at_line_start = true;

    while let Some(token) = tokens.next() {
        if !at_line_start || token.kind != SyntaxKind::BACKTICK {
            at_line_start = token.kind == SyntaxKind::NEWLINE;
            out.push(token);
            continue;
        }

        at_line_start = false;
        out.push(token);
        let mut run = 1;
        while let Some(tick) = tokens.next_if(|t| t.kind == SyntaxKind::BACKTICK) {
            out.push(tick);
            run += 1;
        }
        if run < FENCE_MIN {
            continue;
        }

        let mut span: Option<(usize, usize)> = None;
        while let Some(t) = tokens.next_if(|t| t.kind != SyntaxKind::NEWLINE) {
            let start = span.map_or(t.offset, |(start, _)| start);
            span = Some((start, t.offset + t.text.len()));
        }
        if let Some((start, end)) = span {
            out.push(Token {
                kind: SyntaxKind::TEXT,
                text: &input[start..end],
                offset: start,
            });
        }
    }
    out
}
