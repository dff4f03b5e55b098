//! spig
//!
//! Resolves a configuration file and its `$import` directives into one
//! merged tree and prints it.

use anyhow::{Context, Result};
use clap::Parser;
use spig::cli::{Cli, Command};
use spig::config::{ConfigLoader, LoaderOptions, leaves};
use spig::format::format_leaves;
use spig::logging::Logger;
use std::fs::OpenOptions;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)
                .with_context(|| format!("Failed to open log file {filename}"))?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let options = cli.loader_options(LoaderOptions::from_env());
    debug!(?options, "Resolved loader options");

    let loader = ConfigLoader::new(options).with_logger(Logger::new().with_name("spig"));
    let resolved = match cli.dir {
        Some(ref dir) => loader.load_from_dir(dir),
        None => loader.load(),
    }
    .context("Failed to load configuration")?;

    let output = match cli.command {
        Command::Show { format } => format.render(resolved.values())?,
        Command::Get { ref path, format } => {
            let value = resolved
                .get(path)
                .with_context(|| format!("Failed to read path {path}"))?
                .cloned()
                .unwrap_or_default();
            format.render(&value)?
        }
        Command::Leaves => format_leaves(&leaves(resolved.values())?),
        Command::Read { ref file, format } => {
            let value = resolved
                .read_file(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            format.render(&value)?
        }
    };

    println!("{output}");
    Ok(())
}
