//! Block-level grammar rules.

use crate::lexer::{FENCE_MIN, lex};
use crate::parser::{ParseError, Parser};
use crate::syntax_kind::SyntaxKind;
use crate::tree::{Block, Inline, ListItem};

use super::inline;

/// Minimum marker count for a thematic break.
const RULE_MIN: usize = 3;

/// Parse a block element. The caller has already skipped blank lines.
pub fn block(p: &mut Parser<'_, '_>) -> Result<Block, ParseError> {
    match p.current() {
        SyntaxKind::HASH => heading(p),
        SyntaxKind::BACKTICK => match fence_len(p) {
            Some(fence) => Ok(fenced_code(p, fence)),
            None => paragraph(p),
        },
        SyntaxKind::TEXT if is_quote_line(p) => block_quote(p),
        SyntaxKind::DASH | SyntaxKind::STAR | SyntaxKind::DOUBLE_STAR if is_thematic_break(p) => {
            Ok(thematic_break(p))
        }
        SyntaxKind::DASH | SyntaxKind::NUMBER => list(p),
        _ => paragraph(p),
    }
}

/// Skip empty and whitespace-only lines.
pub fn skip_blank_lines(p: &mut Parser<'_, '_>) {
    loop {
        if p.eat(SyntaxKind::NEWLINE) {
            continue;
        }
        if p.current().is_whitespace() && p.nth(1).is_line_end() {
            p.bump();
            continue;
        }
        break;
    }
}

/// Length of the backtick run opening a fence at the cursor, if any.
///
/// Lookahead only: the cursor is restored.
pub fn fence_len(p: &mut Parser<'_, '_>) -> Option<usize> {
    p.probe(|p| {
        let mut run = 0;
        while p.eat(SyntaxKind::BACKTICK) {
            run += 1;
        }
        (run >= FENCE_MIN).then_some(run)
    })
}

/// Check if the cursor is on a thematic break (`---`, `***`, `* * *`).
///
/// A dash rule is three or more consecutive dashes and ignores the rest of
/// the line. A star rule counts `*` as one and `**` as two, may contain
/// spaces, and must be the only thing on its line, so `***bold***` stays
/// inline content. Lookahead only: the cursor is restored.
pub fn is_thematic_break(p: &mut Parser<'_, '_>) -> bool {
    p.probe(|p| match p.current() {
        SyntaxKind::DASH => {
            let mut count = 0;
            while p.eat(SyntaxKind::DASH) {
                count += 1;
            }
            count >= RULE_MIN
        }
        SyntaxKind::STAR | SyntaxKind::DOUBLE_STAR => {
            let mut count = 0;
            loop {
                match p.current() {
                    SyntaxKind::STAR => count += 1,
                    SyntaxKind::DOUBLE_STAR => count += 2,
                    kind if kind.is_whitespace() => {}
                    _ => break,
                }
                p.bump();
            }
            count >= RULE_MIN && p.current().is_line_end()
        }
        _ => false,
    })
}

/// A text token starting with `>` opens a blockquote line.
fn is_quote_line(p: &Parser<'_, '_>) -> bool {
    p.at(SyntaxKind::TEXT) && p.current_text().starts_with('>')
}

/// Would the line at the cursor start a block that interrupts a paragraph?
fn starts_block(p: &mut Parser<'_, '_>) -> bool {
    match p.current() {
        SyntaxKind::HASH | SyntaxKind::DASH | SyntaxKind::NUMBER => true,
        SyntaxKind::BACKTICK => fence_len(p).is_some(),
        SyntaxKind::TEXT => is_quote_line(p),
        SyntaxKind::STAR | SyntaxKind::DOUBLE_STAR => is_thematic_break(p),
        _ => false,
    }
}

fn at_blank_line(p: &Parser<'_, '_>) -> bool {
    p.current().is_line_end() || (p.current().is_whitespace() && p.nth(1).is_line_end())
}

fn eat_whitespace(p: &mut Parser<'_, '_>) {
    if p.current().is_whitespace() {
        p.bump();
    }
}

/// Collect the raw text up to (not including) the line end.
fn raw_line(p: &mut Parser<'_, '_>) -> String {
    let mut line = String::new();
    while !p.current().is_line_end() {
        line.push_str(p.current_text());
        p.bump();
    }
    line
}

/// Inline content to the end of the line, without trailing blanks.
fn line_inlines(p: &mut Parser<'_, '_>) -> Result<Vec<Inline>, ParseError> {
    let mut inlines = inline::inline_until(p, SyntaxKind::NEWLINE)?;
    while inlines.last().is_some_and(Inline::is_blank_text) {
        inlines.pop();
    }
    Ok(inlines)
}

/// Parse an ATX heading. The level is the raw marker count.
fn heading(p: &mut Parser<'_, '_>) -> Result<Block, ParseError> {
    let mut level = 0;
    while p.eat(SyntaxKind::HASH) {
        level += 1;
    }

    eat_whitespace(p);
    let inlines = line_inlines(p)?;
    p.eat(SyntaxKind::NEWLINE);

    Ok(Block::Heading { level, inlines })
}

/// Parse a fenced code block opened by `fence` backticks.
fn fenced_code(p: &mut Parser<'_, '_>, fence: usize) -> Block {
    for _ in 0..fence {
        p.bump();
    }

    let label = raw_line(p);
    let language = Some(label.trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string);
    p.eat(SyntaxKind::NEWLINE);

    // Each iteration starts at the beginning of a line.
    let mut code = String::new();
    while !p.at_end() {
        if fence_len(p) == Some(fence) {
            raw_line(p);
            p.eat(SyntaxKind::NEWLINE);
            break;
        }

        code.push_str(&raw_line(p));
        if p.eat(SyntaxKind::NEWLINE) {
            code.push('\n');
        }
    }

    Block::CodeBlock { code, language }
}

/// Parse consecutive `>` lines into a blockquote.
///
/// Each line loses its `>` and one following space, the stripped lines are
/// lexed again as one buffer, and every non-empty line becomes a paragraph.
fn block_quote(p: &mut Parser<'_, '_>) -> Result<Block, ParseError> {
    let start = p.offset();
    let mut lines = Vec::new();

    while is_quote_line(p) {
        let line = raw_line(p);
        let stripped = line.strip_prefix('>').unwrap_or(&line);
        let stripped = stripped.strip_prefix(' ').unwrap_or(stripped);
        lines.push(stripped.to_string());
        p.eat(SyntaxKind::NEWLINE);
    }

    let buffer = lines.join("\n");
    let tokens = lex(&buffer);
    let mut inner = Parser::new(&tokens);
    let mut children = Vec::new();

    while !inner.at_end() {
        let inlines = line_inlines(&mut inner).map_err(|e| e.relocated(start))?;
        inner.eat(SyntaxKind::NEWLINE);
        if !inlines.is_empty() {
            children.push(Block::Paragraph { inlines });
        }
    }

    Ok(Block::BlockQuote { children })
}

/// Parse a thematic break, discarding the rest of its line.
fn thematic_break(p: &mut Parser<'_, '_>) -> Block {
    raw_line(p);
    p.eat(SyntaxKind::NEWLINE);
    Block::HorizontalRule
}

/// Parse a run of list items sharing the marker kind at the cursor.
///
/// Stops at end of input, at a line that does not start with the same kind
/// of marker, or at a dash line that is a thematic break.
fn list(p: &mut Parser<'_, '_>) -> Result<Block, ParseError> {
    let marker = p.current();
    let ordered = marker == SyntaxKind::NUMBER;
    let mut items = Vec::new();

    while p.at(marker) && !is_thematic_break(p) {
        p.bump();
        eat_whitespace(p);

        let inlines = line_inlines(p)?;
        items.push(ListItem {
            children: vec![Block::Paragraph { inlines }],
        });

        if !p.eat(SyntaxKind::NEWLINE) {
            break;
        }
    }

    Ok(Block::List { items, ordered })
}

/// Parse a paragraph (default block).
///
/// Lines are joined with a single space. A blank line or the start of a
/// competing block ends the paragraph; those tokens are left for the caller.
fn paragraph(p: &mut Parser<'_, '_>) -> Result<Block, ParseError> {
    eat_whitespace(p);
    let mut inlines = line_inlines(p)?;

    while p.eat(SyntaxKind::NEWLINE) {
        if at_blank_line(p) || starts_block(p) {
            break;
        }

        eat_whitespace(p);
        inlines.push(Inline::text(" "));
        inlines.extend(line_inlines(p)?);
    }

    Ok(Block::Paragraph { inlines })
}
