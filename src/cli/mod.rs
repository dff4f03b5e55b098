//! CLI command definitions for spig
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use crate::config::LoaderOptions;
use crate::format::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Resolve `$import` directives and print the merged configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Key treated as the import directive (default: $import)
    #[arg(long, global = true, visible_alias = "spig-prop-import")]
    pub import_key: Option<String>,

    /// Root configuration file name (default: config)
    #[arg(short, long, global = true, visible_alias = "spig-config")]
    pub config: Option<String>,

    /// Report unreadable files and continue instead of failing
    #[arg(long, global = true, visible_alias = "spig-no-throw")]
    pub no_throw: bool,

    /// Directory the root file is looked up in (default: working directory)
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the merged configuration
    Show {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Print the value at a dot path (e.g. .db.url)
    Get {
        #[arg(value_name = "PATH", allow_hyphen_values = true)]
        path: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Print every leaf as `<path> = <value>`
    Leaves,

    /// Resolve an additional file with the same import rules
    Read {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

impl Cli {
    /// Apply command-line overrides on top of `base` options.
    pub fn loader_options(&self, base: LoaderOptions) -> LoaderOptions {
        let mut options = base;
        if let Some(ref key) = self.import_key {
            options.import_key = key.clone();
        }
        if let Some(ref filename) = self.config {
            options.filename = filename.clone();
        }
        if self.no_throw {
            options.fail_on_error = false;
        }
        options
    }
}
