//! Reading configuration sources from disk.
//!
//! A file reference may omit its extension: when the path does not exist as
//! given, `.json`, `.yaml` and `.yml` are tried in that order.

use crate::error::SourceError;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Extensions probed when a reference does not exist as written.
pub const PROBED_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// Format of a configuration source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// Pick the parser from the file extension. Unknown or missing
    /// extensions are parsed as YAML, which also accepts JSON documents.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SourceFormat::Json,
            _ => SourceFormat::Yaml,
        }
    }

    /// Parse `content` into a raw mapping.
    pub fn parse(self, content: &str) -> Result<Map<String, Value>, SourceError> {
        let value: Value = match self {
            SourceFormat::Json => serde_json::from_str(content)?,
            SourceFormat::Yaml => serde_yaml::from_str(content)?,
        };
        into_mapping(value)
    }
}

fn into_mapping(value: Value) -> Result<Map<String, Value>, SourceError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Err(SourceError::NotAMapping("null")),
        Value::Bool(_) => Err(SourceError::NotAMapping("a boolean")),
        Value::Number(_) => Err(SourceError::NotAMapping("a number")),
        Value::String(_) => Err(SourceError::NotAMapping("a string")),
        Value::Array(_) => Err(SourceError::NotAMapping("a sequence")),
    }
}

/// A loaded source: the file that was actually read and its raw mapping.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub path: PathBuf,
    pub content: Map<String, Value>,
}

/// Turns a file reference into a raw mapping.
pub trait SourceLoader: Send + Sync {
    /// Load the source referenced by `path` (already absolute).
    fn load(&self, path: &Path) -> Result<LoadedSource, SourceError>;
}

/// Loads JSON and YAML files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl FileSource {
    /// Locate the file for `path`, probing extensions if needed.
    pub fn locate(path: &Path) -> Option<PathBuf> {
        if path.is_file() {
            return Some(path.to_path_buf());
        }

        PROBED_EXTENSIONS
            .iter()
            .map(|ext| with_appended_extension(path, ext))
            .find(|candidate| candidate.is_file())
    }
}

impl SourceLoader for FileSource {
    fn load(&self, path: &Path) -> Result<LoadedSource, SourceError> {
        let Some(found) = Self::locate(path) else {
            return Err(SourceError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no configuration file at {}", path.display()),
            )));
        };

        let content = std::fs::read_to_string(&found)?;
        let content = SourceFormat::from_path(&found).parse(&content)?;
        Ok(LoadedSource {
            path: found,
            content,
        })
    }
}

/// `config` + `json` -> `config.json`; `app.prod` + `yaml` -> `app.prod.yaml`.
fn with_appended_extension(path: &Path, ext: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".");
    os.push(ext);
    PathBuf::from(os)
}
