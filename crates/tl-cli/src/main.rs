use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tl_cli::commands::{day, job, print, times};
use tl_cli::{Cli, Commands, Config, LinePrompt, Session};
use tl_core::SystemClock;
use tl_store::JsonStore;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --verbose overrides RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut session = Session::open(JsonStore::new(&config.log_path), &SystemClock)
        .context("failed to load time data")?;
    let mut prompt = LinePrompt::new(io::stdin().lock(), io::stdout(), &config);
    let mut out = io::stdout();

    match command {
        Commands::Day(action) => day::run(&mut out, &mut session, action, &mut prompt)?,
        Commands::Job(action) => job::run(&mut out, &mut session, action, &mut prompt)?,
        Commands::Print => print::run(&mut out, &session)?,
        Commands::Times { prefix } => times::run(&mut out, &session, prefix.as_deref())?,
    }

    session.finish().context("failed to save time data")?;
    Ok(())
}
