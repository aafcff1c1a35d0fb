use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use markdown_lathe_config::Config;

mod cli;
mod commands;
mod repl;
mod settings;

use cli::{Cli, Commands};
use settings::Settings;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG, when set, overrides the -v level
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let command = match (&cli.command, cli.interactive) {
        (Some(command), _) => command.clone(),
        (None, true) => Commands::Repl,
        (None, false) => {
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    let config =
        Config::load_or_default(cli.config.as_deref()).context("failed to load configuration")?;
    let settings = Settings::resolve(&cli, &config)?;
    log::info!(
        "cache strategy {} with capacity {}",
        settings.strategy,
        settings.capacity
    );

    let engine = settings.engine();
    let mut stdin = commands::stdin();
    let mut stdout = io::stdout().lock();
    commands::run(&command, &settings, &engine, &mut stdin, &mut stdout)?;
    stdout.flush()?;

    if cli.stats {
        eprintln!("{}", engine.cache().stats());
    }
    Ok(())
}
