//! Line-based interactive loop.
//!
//! Each plain line is parsed and rendered in the current mode. Lines
//! starting with `:` are commands. A literal `\n` inside a line stands for
//! a line break, so multi-line markdown fits on one input line.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use markdown_lathe_engine::{Engine, EngineError, RenderMode};

use crate::commands::write_block;

const HELP: &str = "\
Commands:
  :q, :quit        exit
  :html [TEXT]     render TEXT as HTML, or switch to HTML mode
  :text [TEXT]     render TEXT as plain text, or switch to text mode
  :tree [TEXT]     print the tree of TEXT as JSON, or switch to tree mode
  :tokens [TEXT]   print the tokens of TEXT, or switch to tokens mode
  :stats           show cache statistics
  :clear           clear the cache
  :help            show this help
Any other line is rendered in the current mode. Write \\n for a line break.
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Html,
    Text,
    Tree,
    Tokens,
}

impl Mode {
    fn named(name: &str) -> Option<Self> {
        match name {
            "html" => Some(Mode::Html),
            "text" => Some(Mode::Text),
            "tree" => Some(Mode::Tree),
            "tokens" => Some(Mode::Tokens),
            _ => None,
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

pub struct Repl<'e> {
    engine: &'e Engine,
    pretty: bool,
    mode: Mode,
}

impl<'e> Repl<'e> {
    pub fn new(engine: &'e Engine, pretty: bool) -> Self {
        Self {
            engine,
            pretty,
            mode: Mode::Html,
        }
    }

    /// Read lines until `:q` or end of input.
    pub fn run(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> Result<()> {
        writeln!(out, "mdlathe interactive mode, :help for commands")?;

        let mut line = String::new();
        loop {
            write!(out, "md> ")?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line).context("failed to read input")? == 0 {
                writeln!(out)?;
                break;
            }
            let line = line.trim_end_matches(['\n', '\r']);
            if let Flow::Quit = self.handle(line, out)? {
                break;
            }
        }
        Ok(())
    }

    fn handle(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let Some(command) = line.trim_start().strip_prefix(':') else {
            if !line.trim().is_empty() {
                self.evaluate(self.mode, line, out)?;
            }
            return Ok(Flow::Continue);
        };

        let (name, arg) = match command.split_once(' ') {
            Some((name, arg)) => (name, Some(arg).filter(|a| !a.trim().is_empty())),
            None => (command.trim_end(), None),
        };

        match name {
            "q" | "quit" => return Ok(Flow::Quit),
            "help" => out.write_all(HELP.as_bytes())?,
            "stats" => writeln!(out, "{}", self.engine.cache().stats())?,
            "clear" => {
                self.engine.cache().clear();
                writeln!(out, "cache cleared")?;
            }
            _ => match (Mode::named(name), arg) {
                (Some(mode), Some(text)) => self.evaluate(mode, text, out)?,
                (Some(mode), None) => {
                    self.mode = mode;
                    writeln!(out, "mode: {name}")?;
                }
                (None, _) => writeln!(out, "unknown command :{name} (try :help)")?,
            },
        }
        Ok(Flow::Continue)
    }

    /// Render one line. Parse errors are reported and the loop goes on.
    fn evaluate(&self, mode: Mode, line: &str, out: &mut impl Write) -> Result<()> {
        let text = line.replace("\\n", "\n");
        match self.render(mode, &text) {
            Ok(output) => write_block(out, &output),
            Err(err) => {
                writeln!(out, "error: {err}")?;
                Ok(())
            }
        }
    }

    fn render(&self, mode: Mode, text: &str) -> Result<String, EngineError> {
        match mode {
            Mode::Html => self.engine.render_html(text, self.pretty),
            Mode::Text => {
                let document = self.engine.parse(text)?;
                self.engine.render(&document, RenderMode::Text)
            }
            Mode::Tree => {
                let document = self.engine.parse(text)?;
                self.engine.render(&document, RenderMode::Json)
            }
            Mode::Tokens => Ok(self
                .engine
                .tokenize(text)
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_lathe_engine::StrategyKind;
    use markdown_lathe_engine::cache::CacheManager;
    use pretty_assertions::assert_eq;

    fn session(input: &str) -> String {
        let engine = Engine::new(CacheManager::from_kind(StrategyKind::Lru, 16));
        let mut input = input.as_bytes();
        let mut out = Vec::new();
        Repl::new(&engine, false).run(&mut input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    /// Output with the banner and prompts removed.
    fn replies(input: &str) -> Vec<String> {
        session(input)
            .lines()
            .skip(1)
            .map(|line| line.replace("md> ", ""))
            .filter(|line| !line.is_empty())
            .collect()
    }

    #[test]
    fn renders_lines_in_html_by_default() {
        assert_eq!(replies("# Hi\n:q\n"), vec!["<h1>Hi</h1>"]);
    }

    #[test]
    fn line_escape_becomes_newline() {
        assert_eq!(
            replies("- a\\n- b\n"),
            vec!["<ul><li>a</li><li>b</li></ul>"]
        );
    }

    #[test]
    fn switches_modes() {
        assert_eq!(
            replies(":text\n_x_\n:tokens\n*\n"),
            vec![
                "mode: text",
                "*x*",
                "mode: tokens",
                "STAR \"*\" @0",
                "EOF \"\" @1",
            ]
        );
    }

    #[test]
    fn one_shot_command_keeps_mode() {
        assert_eq!(replies(":text **b**\nx\n"), vec!["**b**", "<p>x</p>"]);
    }

    #[test]
    fn parse_errors_do_not_end_session() {
        assert_eq!(
            replies("[abc\nok\n"),
            vec![
                "error: unterminated link text (missing `]`) starting at byte 0",
                "<p>ok</p>",
            ]
        );
    }

    #[test]
    fn quit_stops_reading() {
        assert_eq!(replies(":quit\n# never\n"), Vec::<String>::new());
    }

    #[test]
    fn stats_and_clear() {
        let replies = replies("a\na\n:stats\n:clear\n");
        assert_eq!(
            replies[2],
            "strategy=lru enabled=true hits=1 misses=3 size=3 capacity=16 hit_ratio=0.25"
        );
        assert_eq!(replies[3], "cache cleared");
    }

    #[test]
    fn unknown_command_is_reported() {
        assert_eq!(
            replies(":frob\n"),
            vec!["unknown command :frob (try :help)"]
        );
    }

    #[test]
    fn help_lists_commands() {
        let output = session(":help\n");
        assert!(output.contains(":tokens [TEXT]"));
        assert!(output.contains("Write \\n for a line break."));
    }
}
