//! Markdown-like plain text.
//!
//! Output is lossy: soft breaks are already spaces in the tree, and emphasis
//! always comes back as `*`. Useful for snapshots and debugging, not for
//! round-tripping source.

use markdown_lathe_syntax::tree::{Block, Document, Inline, ListItem, Visitor};

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl PlainTextRenderer {
    pub fn render(document: &Document) -> String {
        PlainTextRenderer.visit_document(document)
    }

    fn inlines(&mut self, inlines: &[Inline]) -> String {
        inlines.iter().map(|inline| inline.accept(self)).collect()
    }

    fn blocks(&mut self, blocks: &[Block], separator: &str) -> String {
        blocks
            .iter()
            .map(|block| block.accept(self))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl Visitor for PlainTextRenderer {
    type Output = String;

    fn visit_document(&mut self, document: &Document) -> String {
        if document.is_empty() {
            return String::new();
        }
        let mut out = self.blocks(&document.blocks, "\n\n");
        out.push('\n');
        out
    }

    fn visit_heading(&mut self, level: usize, inlines: &[Inline]) -> String {
        let hashes = "#".repeat(level.clamp(1, 6));
        format!("{hashes} {}", self.inlines(inlines))
    }

    fn visit_paragraph(&mut self, inlines: &[Inline]) -> String {
        self.inlines(inlines)
    }

    fn visit_block_quote(&mut self, children: &[Block]) -> String {
        self.blocks(children, "\n")
            .lines()
            .map(|line| {
                if line.is_empty() {
                    ">".to_string()
                } else {
                    format!("> {line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn visit_list(&mut self, items: &[ListItem], ordered: bool) -> String {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let marker = if ordered {
                    format!("{}. ", i + 1)
                } else {
                    "- ".to_string()
                };
                format!("{marker}{}", self.visit_list_item(item))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn visit_list_item(&mut self, item: &ListItem) -> String {
        self.blocks(&item.children, "\n")
    }

    fn visit_code_block(&mut self, code: &str, language: Option<&str>) -> String {
        let newline = if code.is_empty() || code.ends_with('\n') {
            ""
        } else {
            "\n"
        };
        format!("```{}\n{code}{newline}```", language.unwrap_or_default())
    }

    fn visit_horizontal_rule(&mut self) -> String {
        "---".to_string()
    }

    fn visit_text(&mut self, value: &str) -> String {
        value.to_string()
    }

    fn visit_bold(&mut self, children: &[Inline]) -> String {
        format!("**{}**", self.inlines(children))
    }

    fn visit_italic(&mut self, children: &[Inline]) -> String {
        format!("*{}*", self.inlines(children))
    }

    fn visit_code_span(&mut self, code: &str) -> String {
        format!("`{code}`")
    }

    fn visit_link(&mut self, children: &[Inline], url: &str, title: Option<&str>) -> String {
        let text = self.inlines(children);
        match title {
            Some(title) => format!("[{text}]({url} \"{title}\")"),
            None => format!("[{text}]({url})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use markdown_lathe_syntax::parse;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn render(input: &str) -> String {
        PlainTextRenderer::render(&parse(input).unwrap())
    }

    #[rstest]
    #[case("", "")]
    #[case("plain", "plain\n")]
    #[case("#### Deep", "#### Deep\n")]
    #[case("_a_ and __", "*a* and **\n")]
    #[case("[site](http://x \"X\")", "[site](http://x \"X\")\n")]
    #[case("line one\nline two", "line one line two\n")]
    fn render_plain_text(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(render(input), expected);
    }

    #[test]
    fn render_mixed_document() {
        let text = render(
            "# Title\n\nSome **bold** and `code`.\n\n1. first\n2. [second](/2)\n\n> a\n> b\n\n```rust\nfn main() {}\n```\n\n***",
        );
        assert_snapshot!(text, @r"
        # Title

        Some **bold** and `code`.

        1. first
        2. [second](/2)

        > a
        > b

        ```rust
        fn main() {}
        ```

        ---
        ");
    }

    #[test]
    fn render_code_block_without_trailing_newline() {
        let doc = Document::new(vec![Block::CodeBlock {
            code: "x = 1".to_string(),
            language: None,
        }]);
        assert_eq!(PlainTextRenderer::render(&doc), "```\nx = 1\n```\n");
    }
}
