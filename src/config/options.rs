//! Loader options.
//!
//! Resolution order (highest wins): explicit setters / CLI flags, then
//! environment variables, then built-in defaults.

use serde::{Deserialize, Serialize};

/// Default key holding the import directive.
pub const DEFAULT_IMPORT_KEY: &str = "$import";

/// Default root file name, looked up in the working directory.
pub const DEFAULT_FILENAME: &str = "config";

/// Environment variable overriding the import key.
pub const ENV_IMPORT_KEY: &str = "SPIG_IMPORT_KEY";
/// Environment variable overriding the root file name.
pub const ENV_CONFIG: &str = "SPIG_CONFIG";
/// Environment variable disabling fail-on-error when truthy.
pub const ENV_NO_THROW: &str = "SPIG_NO_THROW";

/// Options controlling how configuration files are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Mapping key treated as the import directive.
    pub import_key: String,
    /// File the top-level load starts from.
    pub filename: String,
    /// Whether an unreadable file aborts the load. When disabled, the file is
    /// reported and replaced by an empty mapping.
    pub fail_on_error: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            import_key: DEFAULT_IMPORT_KEY.to_string(),
            filename: DEFAULT_FILENAME.to_string(),
            fail_on_error: true,
        }
    }
}

impl LoaderOptions {
    /// Defaults overlaid with `SPIG_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(key) = lookup(ENV_IMPORT_KEY).filter(|v| !v.is_empty()) {
            options.import_key = key;
        }

        if let Some(filename) = lookup(ENV_CONFIG).filter(|v| !v.is_empty()) {
            options.filename = filename;
        }

        if let Some(no_throw) = lookup(ENV_NO_THROW) {
            options.fail_on_error = !is_truthy(&no_throw);
        }

        options
    }

    pub fn with_import_key(mut self, import_key: impl Into<String>) -> Self {
        self.import_key = import_key.into();
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_fail_on_error(mut self, fail_on_error: bool) -> Self {
        self.fail_on_error = fail_on_error;
        self
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
