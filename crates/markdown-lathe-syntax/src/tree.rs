//! # Document Tree
//!
//! The parser's output: a strictly owned value tree. Each node owns its
//! children, nothing points back up, and [`Document`] is the only root.
//!
//! Block nodes ([`Block`]) describe line-level structure, inline nodes
//! ([`Inline`]) describe formatting inside a block. Both sets are closed.
//!
//! ## Visiting
//!
//! Renderers implement [`Visitor`], which has one method per node variant
//! and no default bodies, so adding a variant breaks every renderer until it
//! handles the new case. [`Block::accept`] and [`Inline::accept`] do the
//! exhaustive dispatch.
//!
//! ```
//! use markdown_lathe_syntax::tree::{Inline, Visitor};
//! # use markdown_lathe_syntax::tree::{Block, Document, ListItem};
//!
//! struct CountText;
//!
//! impl Visitor for CountText {
//!     type Output = usize;
//!     fn visit_document(&mut self, d: &Document) -> usize { d.blocks.iter().map(|b| b.accept(self)).sum() }
//!     fn visit_heading(&mut self, _: usize, i: &[Inline]) -> usize { self.visit_inlines(i) }
//!     fn visit_paragraph(&mut self, i: &[Inline]) -> usize { self.visit_inlines(i) }
//!     fn visit_block_quote(&mut self, c: &[Block]) -> usize { c.iter().map(|b| b.accept(self)).sum() }
//!     fn visit_list(&mut self, items: &[ListItem], _: bool) -> usize { items.iter().map(|i| self.visit_list_item(i)).sum() }
//!     fn visit_list_item(&mut self, item: &ListItem) -> usize { item.children.iter().map(|b| b.accept(self)).sum() }
//!     fn visit_code_block(&mut self, _: &str, _: Option<&str>) -> usize { 0 }
//!     fn visit_horizontal_rule(&mut self) -> usize { 0 }
//!     fn visit_text(&mut self, _: &str) -> usize { 1 }
//!     fn visit_bold(&mut self, c: &[Inline]) -> usize { self.visit_inlines(c) }
//!     fn visit_italic(&mut self, c: &[Inline]) -> usize { self.visit_inlines(c) }
//!     fn visit_code_span(&mut self, _: &str) -> usize { 0 }
//!     fn visit_link(&mut self, c: &[Inline], _: &str, _: Option<&str>) -> usize { self.visit_inlines(c) }
//! }
//!
//! impl CountText {
//!     fn visit_inlines(&mut self, inlines: &[Inline]) -> usize {
//!         inlines.iter().map(|i| i.accept(self)).sum()
//!     }
//! }
//!
//! let doc = markdown_lathe_syntax::parse("# a\n\nb **c**").unwrap();
//! // "a", then "b", " " and "c"
//! assert_eq!(CountText.visit_document(&doc), 4);
//! ```

/// Root of a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Block-level nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// ATX heading. `level` is the raw marker count; renderers clamp it.
    Heading {
        level: usize,
        inlines: Vec<Inline>,
    },
    Paragraph {
        inlines: Vec<Inline>,
    },
    BlockQuote {
        children: Vec<Block>,
    },
    List {
        items: Vec<ListItem>,
        ordered: bool,
    },
    CodeBlock {
        code: String,
        language: Option<String>,
    },
    HorizontalRule,
}

/// One entry of a [`Block::List`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    pub children: Vec<Block>,
}

/// Inline-level nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text {
        value: String,
    },
    Bold {
        children: Vec<Inline>,
    },
    Italic {
        children: Vec<Inline>,
    },
    CodeSpan {
        code: String,
    },
    Link {
        children: Vec<Inline>,
        url: String,
        title: Option<String>,
    },
}

impl Inline {
    /// Shorthand for a [`Inline::Text`] node.
    pub fn text(value: impl Into<String>) -> Self {
        Inline::Text {
            value: value.into(),
        }
    }

    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Inline::Text { value } => visitor.visit_text(value),
            Inline::Bold { children } => visitor.visit_bold(children),
            Inline::Italic { children } => visitor.visit_italic(children),
            Inline::CodeSpan { code } => visitor.visit_code_span(code),
            Inline::Link {
                children,
                url,
                title,
            } => visitor.visit_link(children, url, title.as_deref()),
        }
    }

    /// Is this a text node holding only whitespace?
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Inline::Text { value } if value.trim().is_empty())
    }
}

impl Block {
    /// Shorthand for a paragraph holding a single text node.
    pub fn paragraph_text(value: impl Into<String>) -> Self {
        Block::Paragraph {
            inlines: vec![Inline::text(value)],
        }
    }

    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Block::Heading { level, inlines } => visitor.visit_heading(*level, inlines),
            Block::Paragraph { inlines } => visitor.visit_paragraph(inlines),
            Block::BlockQuote { children } => visitor.visit_block_quote(children),
            Block::List { items, ordered } => visitor.visit_list(items, *ordered),
            Block::CodeBlock { code, language } => {
                visitor.visit_code_block(code, language.as_deref())
            }
            Block::HorizontalRule => visitor.visit_horizontal_rule(),
        }
    }
}

/// One method per node variant.
///
/// Every method is required, so each renderer spells out every case.
pub trait Visitor {
    type Output;

    fn visit_document(&mut self, document: &Document) -> Self::Output;

    fn visit_heading(&mut self, level: usize, inlines: &[Inline]) -> Self::Output;
    fn visit_paragraph(&mut self, inlines: &[Inline]) -> Self::Output;
    fn visit_block_quote(&mut self, children: &[Block]) -> Self::Output;
    fn visit_list(&mut self, items: &[ListItem], ordered: bool) -> Self::Output;
    fn visit_list_item(&mut self, item: &ListItem) -> Self::Output;
    fn visit_code_block(&mut self, code: &str, language: Option<&str>) -> Self::Output;
    fn visit_horizontal_rule(&mut self) -> Self::Output;

    fn visit_text(&mut self, value: &str) -> Self::Output;
    fn visit_bold(&mut self, children: &[Inline]) -> Self::Output;
    fn visit_italic(&mut self, children: &[Inline]) -> Self::Output;
    fn visit_code_span(&mut self, code: &str) -> Self::Output;
    fn visit_link(&mut self, children: &[Inline], url: &str, title: Option<&str>) -> Self::Output;
}
