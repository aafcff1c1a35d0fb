//! SyntaxKind enum for every token the lexer can produce.
//!
//! Block and inline structure is not represented here: the parser builds
//! owned [`tree`](crate::tree) nodes directly instead of a kinded CST.

use std::fmt;

/// All token kinds of the restricted Markdown dialect.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    /// `#` heading marker, one token per character
    HASH,
    /// `-` for unordered lists and thematic breaks
    DASH,
    /// `*` for italics and thematic breaks
    STAR,
    /// `**` for bold
    DOUBLE_STAR,
    /// `_` for italics
    UNDERSCORE,
    /// Single backtick for code spans and fences
    BACKTICK,
    /// `[` opening link text
    LBRACKET,
    /// `]` closing link text
    RBRACKET,
    /// `(` opening a link URL
    LPAREN,
    /// `)` closing a link URL
    RPAREN,
    /// Line ending, normalized to `\n`
    NEWLINE,
    /// Run of four or more spaces
    INDENT,
    /// Run of one to three spaces
    SPACE,
    /// Ordered list marker, digits followed by `.`
    NUMBER,
    /// Plain text content
    TEXT,
    /// End of input marker
    EOF,
}

impl SyntaxKind {
    /// Is this kind horizontal whitespace (`SPACE` or `INDENT`)?
    pub fn is_whitespace(self) -> bool {
        matches!(self, SyntaxKind::SPACE | SyntaxKind::INDENT)
    }

    /// Is this kind a line terminator (`NEWLINE` or `EOF`)?
    pub fn is_line_end(self) -> bool {
        matches!(self, SyntaxKind::NEWLINE | SyntaxKind::EOF)
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
