//! Loader entry point.
//!
//! Finds the root file (by default `config` in the working directory),
//! resolves it, and hands back the merged tree together with a handle that
//! loads further files with the same rules.

use super::options::LoaderOptions;
use super::path::find_path;
use super::resolver::Resolver;
use super::source::SourceLoader;
use crate::error::{Result, SourceError, SpigError};
use crate::logging::Logger;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Configures and runs a top-level load.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    resolver: Resolver,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(LoaderOptions::default())
    }
}

impl ConfigLoader {
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            resolver: Resolver::new(options),
        }
    }

    /// A loader configured from `SPIG_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(LoaderOptions::from_env())
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.resolver = self.resolver.with_logger(logger);
        self
    }

    pub fn with_source(mut self, source: Arc<dyn SourceLoader>) -> Self {
        self.resolver = self.resolver.with_source(source);
        self
    }

    pub fn options(&self) -> &LoaderOptions {
        self.resolver.options()
    }

    /// Load the root file from the current working directory.
    pub fn load(&self) -> Result<ResolvedConfig> {
        let cwd = std::env::current_dir().map_err(|e| SpigError::Load {
            path: PathBuf::from(&self.options().filename),
            source: SourceError::Io(e),
        })?;
        self.load_from_dir(cwd)
    }

    /// Load the root file from `dir`.
    pub fn load_from_dir(&self, dir: impl AsRef<Path>) -> Result<ResolvedConfig> {
        let base_dir = absolute(dir.as_ref())?;
        let root = base_dir.join(&self.options().filename);
        debug!(root = %root.display(), "Loading configuration");

        let values = self.resolver.resolve(&root)?;
        Ok(ResolvedConfig {
            values: Value::Object(values),
            root,
            base_dir,
            resolver: self.resolver.clone(),
        })
    }
}

/// Load with options taken from the environment, starting in the working directory.
pub fn load() -> Result<ResolvedConfig> {
    ConfigLoader::from_env().load()
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| SpigError::Load {
        path: path.to_path_buf(),
        source: SourceError::Io(e),
    })
}

/// The merged configuration plus the handle that produced it.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    values: Value,
    root: PathBuf,
    base_dir: PathBuf,
    resolver: Resolver,
}

impl ResolvedConfig {
    /// Historical name of the reserved key exposing the load handle.
    /// The handle is [`ResolvedConfig::read_file`]; the key is never stored in the tree.
    pub const READ_FILE_KEY: &'static str = "$readFile";

    /// The merged tree (always a mapping).
    pub fn values(&self) -> &Value {
        &self.values
    }

    /// Mutable access for consumers using [`crate::config::set_path`].
    pub fn values_mut(&mut self) -> &mut Value {
        &mut self.values
    }

    pub fn into_values(self) -> Value {
        self.values
    }

    /// The root file path the load started from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up a dot path without modifying the tree.
    pub fn get(&self, path: &str) -> Result<Option<&Value>> {
        find_path(&self.values, path)
    }

    /// Resolve another file with the same import and merge rules.
    ///
    /// Relative references are resolved against the directory the original
    /// load started from.
    pub fn read_file(&self, reference: impl AsRef<Path>) -> Result<Value> {
        let path = self.base_dir.join(reference);
        self.resolver.resolve(&path).map(Value::Object)
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }
}
