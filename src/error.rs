//! Error types for configuration loading and path access.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading configuration or accessing it by path.
#[derive(Debug, Error)]
pub enum SpigError {
    /// A configuration source could not be found, read or parsed.
    #[error("Unable to read the configuration file located at: <{}>!", .path.display())]
    Load {
        /// Absolute path of the file that failed.
        path: PathBuf,
        /// The underlying cause.
        #[source]
        source: SourceError,
    },

    /// A path accessor precondition was violated.
    #[error("AssertionError: {0}")]
    InvalidArgument(String),

    /// An intermediate path segment does not exist and auto-creation was not requested.
    #[error("Missing required parent property <{key}> of path <{path}>!")]
    MissingPathSegment { key: String, path: String },

    /// A file imports itself, directly or through other files.
    #[error("Cyclic import of <{}> (chain: {})", .path.display(), format_chain(.chain))]
    CyclicImport { path: PathBuf, chain: Vec<PathBuf> },
}

impl SpigError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn missing_segment(key: &str, path: &str) -> Self {
        Self::MissingPathSegment {
            key: key.to_string(),
            path: path.to_string(),
        }
    }

    /// Whether this error stems from an unreachable or unparsable source.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::Load { .. })
    }
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Failures reported by a source loader.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document parsed, but its top level is not a mapping.
    #[error("expected a mapping at the top level, found {0}")]
    NotAMapping(&'static str),
}

/// Result type for loader and path operations.
pub type Result<T> = std::result::Result<T, SpigError>;
