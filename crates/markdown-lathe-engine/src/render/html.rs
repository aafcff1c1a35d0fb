//! HTML output.
//!
//! Compact mode writes tags back to back with no whitespace of its own.
//! Pretty mode puts every block element on its own line, indented by
//! `indent` spaces per nesting level.

use markdown_lathe_syntax::tree::{Block, Document, Inline, ListItem, Visitor};

/// Spaces per nesting level in pretty mode.
pub const DEFAULT_INDENT: usize = 2;

/// Renders a [`Document`] to HTML.
///
/// ```
/// use markdown_lathe_engine::render::HtmlRenderer;
///
/// let doc = markdown_lathe_syntax::parse("# Title\nParagraph").unwrap();
/// assert_eq!(
///     HtmlRenderer::new(false).render(&doc),
///     "<h1>Title</h1><p>Paragraph</p>"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    pretty: bool,
    indent: usize,
    depth: usize,
    out: String,
}

impl HtmlRenderer {
    pub fn new(pretty: bool) -> Self {
        Self {
            pretty,
            indent: DEFAULT_INDENT,
            depth: 0,
            out: String::new(),
        }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn render(mut self, document: &Document) -> String {
        self.visit_document(document);
        self.out
    }

    fn start_line(&mut self) {
        if self.pretty {
            let width = self.indent * self.depth;
            self.out.extend(std::iter::repeat_n(' ', width));
        }
    }

    fn end_line(&mut self) {
        if self.pretty {
            self.out.push('\n');
        }
    }

    fn push_escaped(&mut self, text: &str) {
        self.out.push_str(&escape_html(text));
    }

    fn blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            block.accept(self);
        }
    }

    fn inlines(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            inline.accept(self);
        }
    }

    /// A block element holding only inline content, on one line.
    fn inline_block(&mut self, tag: &str, inlines: &[Inline]) {
        self.start_line();
        self.out.push_str(&format!("<{tag}>"));
        self.inlines(inlines);
        self.out.push_str(&format!("</{tag}>"));
        self.end_line();
    }

    /// A block element whose children are blocks, one nesting level deeper.
    fn container(&mut self, tag: &str, body: impl FnOnce(&mut Self)) {
        self.start_line();
        self.out.push_str(&format!("<{tag}>"));
        self.end_line();
        self.depth += 1;
        body(self);
        self.depth -= 1;
        self.start_line();
        self.out.push_str(&format!("</{tag}>"));
        self.end_line();
    }

    fn span(&mut self, tag: &str, children: &[Inline]) {
        self.out.push_str(&format!("<{tag}>"));
        self.inlines(children);
        self.out.push_str(&format!("</{tag}>"));
    }
}

impl Visitor for HtmlRenderer {
    type Output = ();

    fn visit_document(&mut self, document: &Document) {
        self.blocks(&document.blocks);
    }

    fn visit_heading(&mut self, level: usize, inlines: &[Inline]) {
        let level = level.clamp(1, 6);
        self.inline_block(&format!("h{level}"), inlines);
    }

    fn visit_paragraph(&mut self, inlines: &[Inline]) {
        self.inline_block("p", inlines);
    }

    fn visit_block_quote(&mut self, children: &[Block]) {
        self.container("blockquote", |r| r.blocks(children));
    }

    fn visit_list(&mut self, items: &[ListItem], ordered: bool) {
        let tag = if ordered { "ol" } else { "ul" };
        self.container(tag, |r| {
            for item in items {
                r.visit_list_item(item);
            }
        });
    }

    fn visit_list_item(&mut self, item: &ListItem) {
        self.start_line();
        self.out.push_str("<li>");

        // A leading paragraph is written inline, without its own <p>
        let mut rest = item.children.as_slice();
        if let Some((Block::Paragraph { inlines }, tail)) = rest.split_first() {
            self.inlines(inlines);
            rest = tail;
        }
        if !rest.is_empty() {
            self.end_line();
            self.depth += 1;
            self.blocks(rest);
            self.depth -= 1;
            self.start_line();
        }

        self.out.push_str("</li>");
        self.end_line();
    }

    fn visit_code_block(&mut self, code: &str, language: Option<&str>) {
        self.start_line();
        match language {
            Some(lang) => {
                self.out.push_str("<pre><code class=\"language-");
                self.push_escaped(lang);
                self.out.push_str("\">");
            }
            None => self.out.push_str("<pre><code>"),
        }
        self.push_escaped(code);
        self.out.push_str("</code></pre>");
        self.end_line();
    }

    fn visit_horizontal_rule(&mut self) {
        self.start_line();
        self.out.push_str("<hr />");
        self.end_line();
    }

    fn visit_text(&mut self, value: &str) {
        self.push_escaped(value);
    }

    fn visit_bold(&mut self, children: &[Inline]) {
        self.span("strong", children);
    }

    fn visit_italic(&mut self, children: &[Inline]) {
        self.span("em", children);
    }

    fn visit_code_span(&mut self, code: &str) {
        self.out.push_str("<code>");
        self.push_escaped(code);
        self.out.push_str("</code>");
    }

    fn visit_link(&mut self, children: &[Inline], url: &str, title: Option<&str>) {
        self.out.push_str("<a href=\"");
        self.push_escaped(url);
        self.out.push('"');
        if let Some(title) = title {
            self.out.push_str(" title=\"");
            self.push_escaped(title);
            self.out.push('"');
        }
        self.out.push('>');
        self.inlines(children);
        self.out.push_str("</a>");
    }
}

/// Escape the five HTML metacharacters for text content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
