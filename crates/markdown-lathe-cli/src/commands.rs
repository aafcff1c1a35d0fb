use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use markdown_lathe_engine::{CacheEfficiencyMeter, Engine, RenderMode};

use crate::cli::{CacheAction, Commands, InputArgs};
use crate::repl::Repl;
use crate::settings::Settings;

/// Run one command, writing its output to `out`. `stdin` backs `-` inputs
/// and the REPL.
pub fn run(
    command: &Commands,
    settings: &Settings,
    engine: &Engine,
    stdin: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::Tokens(input) => tokens(engine, &read_input(input, stdin)?, out),
        Commands::Tree(input) => tree(engine, &read_input(input, stdin)?, out),
        Commands::Html { input, compact } => {
            let pretty = settings.pretty && !compact;
            html(engine, &read_input(input, stdin)?, pretty, out)
        }
        Commands::Text(input) => text(engine, &read_input(input, stdin)?, out),
        Commands::Cache { action } => cache(engine, action, out),
        Commands::Bench { input, repeat } => {
            let repeat = repeat.unwrap_or(settings.repeat);
            bench(engine, &read_input(input, stdin)?, repeat, out)
        }
        Commands::Repl => Repl::new(engine, settings.pretty).run(stdin, out),
    }
}

pub fn read_input(input: &InputArgs, stdin: &mut impl BufRead) -> Result<String> {
    match input.path() {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

pub fn tokens(engine: &Engine, text: &str, out: &mut impl Write) -> Result<()> {
    for token in engine.tokenize(text) {
        writeln!(out, "{token}")?;
    }
    Ok(())
}

pub fn tree(engine: &Engine, text: &str, out: &mut impl Write) -> Result<()> {
    let document = engine.parse(text)?;
    write_block(out, &engine.render(&document, RenderMode::Json)?)
}

pub fn html(engine: &Engine, text: &str, pretty: bool, out: &mut impl Write) -> Result<()> {
    write_block(out, &engine.render_html(text, pretty)?)
}

pub fn text(engine: &Engine, text: &str, out: &mut impl Write) -> Result<()> {
    let document = engine.parse(text)?;
    write_block(out, &engine.render(&document, RenderMode::Text)?)
}

pub fn cache(engine: &Engine, action: &CacheAction, out: &mut impl Write) -> Result<()> {
    match action {
        CacheAction::Stats { json: true } => {
            let stats = serde_json::to_string_pretty(&engine.cache().stats())?;
            writeln!(out, "{stats}")?;
        }
        CacheAction::Stats { json: false } => writeln!(out, "{}", engine.cache().stats())?,
        CacheAction::Clear => {
            engine.cache().clear();
            writeln!(out, "cache cleared")?;
        }
    }
    Ok(())
}

pub fn bench(engine: &Engine, text: &str, repeat: usize, out: &mut impl Write) -> Result<()> {
    let report = CacheEfficiencyMeter::new(engine).measure(text, repeat)?;
    writeln!(out, "{report}")?;
    Ok(())
}

/// Write `output`, ending it with a newline unless it is empty or already
/// ends with one.
pub fn write_block(out: &mut impl Write, output: &str) -> Result<()> {
    out.write_all(output.as_bytes())?;
    if !output.is_empty() && !output.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Locked stdin, for callers that do not supply their own reader.
pub fn stdin() -> io::StdinLock<'static> {
    io::stdin().lock()
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_lathe_engine::StrategyKind;
    use markdown_lathe_engine::cache::CacheManager;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn engine() -> Engine {
        Engine::new(CacheManager::from_kind(StrategyKind::Lru, 16))
    }

    fn settings() -> Settings {
        Settings {
            strategy: StrategyKind::Lru,
            capacity: 16,
            pretty: true,
            indent: 2,
            repeat: 2,
        }
    }

    fn run_with_stdin(command: Commands, input: &str) -> Result<String> {
        let engine = engine();
        let mut stdin = input.as_bytes();
        let mut out = Vec::new();
        run(&command, &settings(), &engine, &mut stdin, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn stdin_input() -> InputArgs {
        InputArgs::default()
    }

    #[test]
    fn tokens_one_per_line() {
        let output = run_with_stdin(Commands::Tokens(stdin_input()), "# a").unwrap();
        assert_eq!(
            output,
            "HASH \"#\" @0\nSPACE \" \" @1\nTEXT \"a\" @2\nEOF \"\" @3\n"
        );
    }

    #[test]
    fn html_respects_compact_flag() {
        let pretty = run_with_stdin(
            Commands::Html {
                input: stdin_input(),
                compact: false,
            },
            "- a",
        )
        .unwrap();
        let compact = run_with_stdin(
            Commands::Html {
                input: stdin_input(),
                compact: true,
            },
            "- a",
        )
        .unwrap();

        assert_eq!(pretty, "<ul>\n  <li>a</li>\n</ul>\n");
        assert_eq!(compact, "<ul><li>a</li></ul>\n");
    }

    #[test]
    fn text_renders_plain_text() {
        let output = run_with_stdin(Commands::Text(stdin_input()), "**b** _i_").unwrap();
        assert_eq!(output, "**b** *i*\n");
    }

    #[test]
    fn tree_prints_structural_json() {
        let output = run_with_stdin(Commands::Tree(stdin_input()), "---").unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "Document",
                "blocks": [{ "type": "HorizontalRule" }],
            })
        );
    }

    #[test]
    fn parse_error_propagates() {
        let command = Commands::Html {
            input: stdin_input(),
            compact: true,
        };
        let err = run_with_stdin(command, "[abc").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unterminated link text (missing `]`) starting at byte 0"
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let input = InputArgs {
            file: Some(PathBuf::from("/definitely/not/here.md")),
        };
        let err = run_with_stdin(Commands::Text(input), "").unwrap_err();
        assert_eq!(err.to_string(), "failed to read /definitely/not/here.md");
    }

    #[test]
    fn cache_stats_as_json() {
        let output = run_with_stdin(
            Commands::Cache {
                action: CacheAction::Stats { json: true },
            },
            "",
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["strategy"], "lru");
        assert_eq!(value["hits"], 0);
        assert_eq!(value["capacity"], 16);
    }

    #[test]
    fn bench_prints_report() {
        let output = run_with_stdin(
            Commands::Bench {
                input: stdin_input(),
                repeat: None,
            },
            "# Bench",
        )
        .unwrap();
        assert!(output.starts_with("repeat:       2\n"));
        assert!(output.contains("hit ratio:"));
    }

    #[test]
    fn write_block_adds_missing_newline_only() {
        let mut out = Vec::new();
        write_block(&mut out, "a").unwrap();
        write_block(&mut out, "b\n").unwrap();
        write_block(&mut out, "").unwrap();
        assert_eq!(out, b"a\nb\n");
    }
}
