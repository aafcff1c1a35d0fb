//! # CLI Structure and Argument Parsing
//!
//! ```bash
//! mdlathe tokens notes.md
//! mdlathe html --compact notes.md
//! cat notes.md | mdlathe text
//! mdlathe --cache lfu --capacity 32 bench --repeat 100 notes.md
//! mdlathe repl
//! ```
//!
//! Global options apply to every command. Command-line values win over the
//! config file.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use log::LevelFilter;
use markdown_lathe_engine::StrategyKind;

#[derive(Parser, Debug)]
#[command(name = "mdlathe")]
#[command(version)]
#[command(about = "Lex, parse and render a restricted markdown dialect", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Start the interactive loop (same as `mdlathe repl`)
    #[arg(short, long)]
    pub interactive: bool,

    /// Config file to read instead of ~/.config/markdown-lathe/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Cache strategy: none, lru or lfu
    #[arg(long, global = true, value_name = "STRATEGY")]
    pub cache: Option<StrategyKind>,

    /// Maximum entries held by the lru and lfu strategies
    #[arg(long, global = true, value_name = "N")]
    pub capacity: Option<usize>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print cache statistics to stderr when done
    #[arg(long, global = true)]
    pub stats: bool,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print one token per line
    Tokens(InputArgs),

    /// Print the document tree as JSON
    Tree(InputArgs),

    /// Render HTML
    Html {
        #[command(flatten)]
        input: InputArgs,

        /// No indentation or line breaks between elements
        #[arg(long)]
        compact: bool,
    },

    /// Render markdown-like plain text
    Text(InputArgs),

    /// Inspect or reset the cache of this process
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Compare parse and render times with and without the cache
    Bench {
        #[command(flatten)]
        input: InputArgs,

        /// Cycles per phase (defaults to the config's bench.repeat)
        #[arg(long, value_name = "N")]
        repeat: Option<usize>,
    },

    /// Read markdown line by line and print the rendering
    Repl,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CacheAction {
    Stats {
        #[arg(long)]
        json: bool,
    },
    Clear,
}

#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Markdown file; `-` or nothing reads stdin
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

impl InputArgs {
    /// The file to read, or `None` for stdin.
    pub fn path(&self) -> Option<&Path> {
        self.file.as_deref().filter(|p| *p != Path::new("-"))
    }
}
