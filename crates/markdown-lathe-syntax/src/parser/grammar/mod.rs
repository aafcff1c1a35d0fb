//! # Grammar Rules
//!
//! This module contains the grammar rules that drive parsing. Each function
//! takes a `&mut Parser` and uses its methods to:
//!
//! 1. Inspect the current token (`p.current()`, `p.at()`, `p.nth()`)
//! 2. Consume tokens (`p.bump()`, `p.eat()`)
//! 3. Return the node it recognized, or a [`ParseError`]
//!
//! ## Module Structure
//!
//! - [`block`] - Block-level elements (headings, paragraphs, lists, code blocks)
//! - [`inline`] - Inline elements (links, emphasis, code spans)
//!
//! ## Writing Grammar Rules
//!
//! A typical grammar function looks like:
//!
//! ```ignore
//! fn heading(p: &mut Parser) -> Result<Block, ParseError> {
//!     let mut level = 0;
//!     while p.eat(SyntaxKind::HASH) {     // 1. Consume tokens
//!         level += 1;
//!     }
//!     eat_whitespace(p);
//!     let inlines = line_inlines(p)?;     // 2. Call other grammar rules
//!     p.eat(SyntaxKind::NEWLINE);
//!
//!     Ok(Block::Heading { level, inlines }) // 3. Return the node
//! }
//! ```
//!
//! ## Progress
//!
//! Every rule entered on a non-EOF token consumes at least one token, so the
//! loops that drive them always terminate.

mod block;
mod inline;

use crate::parser::{ParseError, Parser};
use crate::tree::Document;

/// Parse the root document.
///
/// Blank lines between blocks are skipped; everything else belongs to some
/// block.
pub fn document(p: &mut Parser<'_, '_>) -> Result<Document, ParseError> {
    let mut blocks = Vec::new();

    loop {
        block::skip_blank_lines(p);
        if p.at_end() {
            break;
        }
        blocks.push(block::block(p)?);
    }

    Ok(Document::new(blocks))
}
