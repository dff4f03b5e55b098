//! spig configuration loader library
//!
//! This module exports the loader, the path accessor and the diagnostic
//! logger for the binary and for embedding applications.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;

pub use config::{ConfigLoader, LoaderOptions, ResolvedConfig, load};
pub use error::{Result, SourceError, SpigError};
