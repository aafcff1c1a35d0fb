//! # markdown-lathe-syntax
//!
//! Lexer, document tree and recursive-descent parser for a restricted
//! Markdown dialect: ATX headings, paragraphs, blockquotes, flat lists,
//! fenced code, thematic breaks, bold, italic, code spans and links.
//!
//! ## Architecture Overview
//!
//! The parsing pipeline has two stages:
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Document
//!               (Logos)          (Grammar)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! The lexer uses [Logos] to tokenize input into a flat sequence of tokens,
//! each carrying its source offset. It never fails and always ends the
//! sequence with a single `EOF` token.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ```text
//! "# Hello\n" → [HASH, SPACE, TEXT("Hello"), NEWLINE, EOF]
//! ```
//!
//! ### 2. Parser ([`parser`] module)
//!
//! The parser walks the tokens with a forward-only cursor and builds owned
//! [`tree`] nodes directly. Grammar rules live in `parser::grammar`. The only
//! backtracking is the bounded lookahead used to recognize code fences and
//! thematic breaks.
//!
//! ## Module Structure
//!
//! ```text
//! markdown-lathe-syntax/
//! ├── lib.rs           # This file - public API and integration tests
//! ├── syntax_kind.rs   # SyntaxKind enum for tokens
//! ├── lexer.rs         # Logos-based tokenizer
//! ├── tree.rs          # Document, Block, Inline and the Visitor trait
//! └── parser/
//!     ├── mod.rs       # Parser cursor, ParseError, public parse() function
//!     └── grammar/
//!         ├── mod.rs   # Root document parsing
//!         ├── block.rs # Block-level elements (headings, lists, code blocks)
//!         └── inline.rs# Inline elements (links, emphasis, code spans)
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use markdown_lathe_syntax::{Block, parse};
//!
//! let doc = parse("# Hello\n\nSome **bold** text.").unwrap();
//! assert_eq!(doc.blocks.len(), 2);
//! assert!(matches!(doc.blocks[0], Block::Heading { level: 1, .. }));
//! ```

pub mod lexer;
pub mod parser;
pub mod syntax_kind;
pub mod tree;

pub use lexer::{OwnedToken, Token, lex};
pub use parser::{Construct, MAX_INLINE_DEPTH, ParseError, Parser, parse, parse_tokens};
pub use syntax_kind::SyntaxKind;
pub use tree::{Block, Document, Inline, ListItem, Visitor};

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use proptest::prelude::*;

    /// Indented outline of a document for snapshot testing.
    fn outline(doc: &Document) -> String {
        let mut lines = Vec::new();
        for block in &doc.blocks {
            outline_block(block, 0, &mut lines);
        }
        lines.join("\n")
    }

    fn outline_block(block: &Block, depth: usize, lines: &mut Vec<String>) {
        let pad = "  ".repeat(depth);
        match block {
            Block::Heading { level, inlines } => {
                lines.push(format!("{pad}Heading({level})"));
                outline_inlines(inlines, depth + 1, lines);
            }
            Block::Paragraph { inlines } => {
                lines.push(format!("{pad}Paragraph"));
                outline_inlines(inlines, depth + 1, lines);
            }
            Block::BlockQuote { children } => {
                lines.push(format!("{pad}BlockQuote"));
                for child in children {
                    outline_block(child, depth + 1, lines);
                }
            }
            Block::List { items, ordered } => {
                lines.push(format!("{pad}List(ordered={ordered})"));
                for item in items {
                    lines.push(format!("{pad}  Item"));
                    for child in &item.children {
                        outline_block(child, depth + 2, lines);
                    }
                }
            }
            Block::CodeBlock { code, language } => {
                lines.push(format!("{pad}CodeBlock({language:?}) {code:?}"));
            }
            Block::HorizontalRule => lines.push(format!("{pad}HorizontalRule")),
        }
    }

    fn outline_inlines(inlines: &[Inline], depth: usize, lines: &mut Vec<String>) {
        let pad = "  ".repeat(depth);
        for inline in inlines {
            match inline {
                Inline::Text { value } => lines.push(format!("{pad}Text {value:?}")),
                Inline::Bold { children } => {
                    lines.push(format!("{pad}Bold"));
                    outline_inlines(children, depth + 1, lines);
                }
                Inline::Italic { children } => {
                    lines.push(format!("{pad}Italic"));
                    outline_inlines(children, depth + 1, lines);
                }
                Inline::CodeSpan { code } => lines.push(format!("{pad}CodeSpan {code:?}")),
                Inline::Link {
                    children,
                    url,
                    title,
                } => {
                    lines.push(format!("{pad}Link {url:?} {title:?}"));
                    outline_inlines(children, depth + 1, lines);
                }
            }
        }
    }

    #[test]
    fn snapshot_mixed_document() {
        let input =
            "## Notes\n\n> quoted `code`\n\n1. [home](/ \"Home\")\n2. _done_\n\n```\nraw\n```";
        let doc = parse(input).unwrap();
        assert_snapshot!(outline(&doc), @r#"
        Heading(2)
          Text "Notes"
        BlockQuote
          Paragraph
            Text "quoted"
            Text " "
            CodeSpan "code"
        List(ordered=true)
          Item
            Paragraph
              Link "/" Some("Home")
                Text "home"
          Item
            Paragraph
              Italic
                Text "done"
        CodeBlock(None) "raw\n"
        "#);
    }

    #[test]
    fn parse_tokens_matches_parse() {
        let input = "# a\n\n- b\n- c";
        let tokens = lex(input);
        assert_eq!(parse_tokens(&tokens), parse(input));
    }

    proptest! {
        #[test]
        fn parse_never_panics(input in "[#*_`\\[\\]() \n>0-9a-z.-]{0,80}") {
            let _ = parse(&input);
        }

        #[test]
        fn parse_accepts_input_without_brackets(input in "[#*_` \n>0-9a-z.-]{0,80}") {
            prop_assert!(parse(&input).is_ok());
        }
    }
}
