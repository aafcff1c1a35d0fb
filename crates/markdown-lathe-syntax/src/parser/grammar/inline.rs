//! # Inline-Level Grammar
//!
//! Inline elements are the formatting within blocks: links, emphasis, code spans.
//! Unlike blocks, inline parsing is driven by **special characters** rather than
//! line-start patterns.
//!
//! ## Dispatch Logic
//!
//! The [`inline_element`] function checks the current token:
//!
//! | Token | Element |
//! |-------|---------|
//! | `**` | Bold |
//! | `*`, `_` | Italic |
//! | `` ` `` run | Code span |
//! | `[` | Link |
//! | (other) | Plain text |
//!
//! ## Stop Tokens
//!
//! Every caller names the token that ends its content: `NEWLINE` for block
//! lines, `]` for link text. Bold and italic stop at their own closer, at a
//! newline, and at the caller's stop token, so `[**x](u)` still closes the
//! link at `]`.
//!
//! ## Error Tolerance
//!
//! - Unclosed `**`, `*` or `_` still produce a node with what was collected
//! - An unclosed code span ends at the line end
//! - `[text]` without `(url)` becomes a link with an empty URL
//! - A `[` or `(` left open at end of input is a [`ParseError`]
//! - Emphasis nests at most [`MAX_INLINE_DEPTH`] deep; deeper openers are text
//!
//! `***x***` lexes as `**` `*` and reads as bold holding italic. The closing
//! `***` opens a second, empty bold-italic pair inside the first, giving
//! `<strong><em>x<strong><em></em></strong></em></strong>`.

use crate::parser::{Construct, MAX_INLINE_DEPTH, ParseError, Parser};
use crate::syntax_kind::SyntaxKind;
use crate::tree::Inline;

/// Parse inline content until `stop` (not consumed) or end of input.
pub fn inline_until(p: &mut Parser<'_, '_>, stop: SyntaxKind) -> Result<Vec<Inline>, ParseError> {
    let mut nodes = Vec::new();
    while !p.at_end() && !p.at(stop) {
        nodes.push(inline_element(p, stop)?);
    }
    Ok(nodes)
}

/// Parse a single inline element. Always consumes at least one token.
fn inline_element(p: &mut Parser<'_, '_>, stop: SyntaxKind) -> Result<Inline, ParseError> {
    match p.current() {
        SyntaxKind::DOUBLE_STAR | SyntaxKind::STAR | SyntaxKind::UNDERSCORE
            if p.depth() >= MAX_INLINE_DEPTH =>
        {
            Ok(text(p))
        }
        SyntaxKind::DOUBLE_STAR => p.nested(|p| bold(p, stop)),
        SyntaxKind::STAR | SyntaxKind::UNDERSCORE => p.nested(|p| italic(p, stop)),
        SyntaxKind::BACKTICK => Ok(code_span(p)),
        // Links do not nest
        SyntaxKind::LBRACKET if stop != SyntaxKind::RBRACKET => link(p),
        _ => Ok(text(p)),
    }
}

/// Any token as literal text. Newlines inside link text read as spaces.
fn text(p: &mut Parser<'_, '_>) -> Inline {
    let value = match p.current() {
        SyntaxKind::NEWLINE => " ",
        _ => p.current_text(),
    };
    p.bump();
    Inline::text(value)
}

/// Parse `**...**`, closed by `**` or the end of the line.
fn bold(p: &mut Parser<'_, '_>, stop: SyntaxKind) -> Result<Inline, ParseError> {
    p.bump();

    let mut children = Vec::new();
    while !p.current().is_line_end() && !p.at(SyntaxKind::DOUBLE_STAR) && !p.at(stop) {
        children.push(inline_element(p, stop)?);
    }
    p.eat(SyntaxKind::DOUBLE_STAR);

    Ok(Inline::Bold { children })
}

/// Parse `*...*` or `_..._`. Only the opening kind closes the span.
fn italic(p: &mut Parser<'_, '_>, stop: SyntaxKind) -> Result<Inline, ParseError> {
    let opener = p.current();
    p.bump();

    let mut children = Vec::new();
    while !p.current().is_line_end() && !p.at(opener) && !p.at(stop) {
        children.push(inline_element(p, stop)?);
    }
    p.eat(opener);

    Ok(Inline::Italic { children })
}

/// Parse a code span opened by a run of k backticks, closed by a run of
/// exactly k. Runs of other lengths are part of the code.
fn code_span(p: &mut Parser<'_, '_>) -> Inline {
    let open = backtick_run(p);
    let mut code = String::new();

    while !p.current().is_line_end() {
        if p.at(SyntaxKind::BACKTICK) {
            let run = backtick_run(p);
            if run == open {
                break;
            }
            code.push_str(&"`".repeat(run));
        } else {
            code.push_str(p.current_text());
            p.bump();
        }
    }

    Inline::CodeSpan {
        code: code.trim().to_string(),
    }
}

fn backtick_run(p: &mut Parser<'_, '_>) -> usize {
    let mut run = 0;
    while p.eat(SyntaxKind::BACKTICK) {
        run += 1;
    }
    run
}

/// Parse `[text]` with an optional `(url "title")` part.
fn link(p: &mut Parser<'_, '_>) -> Result<Inline, ParseError> {
    let text_start = p.offset();
    p.bump();

    let mut children = Vec::new();
    loop {
        if p.at_end() {
            return Err(ParseError::Unterminated {
                construct: Construct::LinkText,
                offset: text_start,
            });
        }
        if p.eat(SyntaxKind::RBRACKET) {
            break;
        }
        children.push(inline_element(p, SyntaxKind::RBRACKET)?);
    }

    if !p.at(SyntaxKind::LPAREN) {
        return Ok(Inline::Link {
            children,
            url: String::new(),
            title: None,
        });
    }

    let url_start = p.offset();
    p.bump();

    let mut raw = String::new();
    loop {
        if p.at_end() {
            return Err(ParseError::Unterminated {
                construct: Construct::LinkUrl,
                offset: url_start,
            });
        }
        if p.eat(SyntaxKind::RPAREN) {
            break;
        }
        raw.push_str(p.current_text());
        p.bump();
    }

    let (url, title) = split_title(&raw);
    Ok(Inline::Link {
        children,
        url,
        title,
    })
}

/// Split `url "title"` into its parts. Without a quoted title the whole
/// trimmed text is the URL.
fn split_title(raw: &str) -> (String, Option<String>) {
    let raw = raw.trim();
    if let Some((url, rest)) = raw.split_once(char::is_whitespace) {
        let rest = rest.trim();
        if rest.len() >= 2 && rest.starts_with('"') && rest.ends_with('"') {
            return (url.to_string(), Some(rest[1..rest.len() - 1].to_string()));
        }
    }
    (raw.to_string(), None)
}
