//! Import resolution.
//!
//! A source may declare other sources under the import key. Imports are
//! resolved recursively relative to the declaring file, merged in listed
//! order, and the declaring file's own keys are merged last so they win.

use super::merge::deep_merge_into;
use super::options::LoaderOptions;
use super::source::{FileSource, SourceLoader};
use crate::error::{Result, SpigError};
use crate::logging::Logger;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Resolves a configuration file and everything it imports into one mapping.
#[derive(Clone)]
pub struct Resolver {
    options: LoaderOptions,
    source: Arc<dyn SourceLoader>,
    logger: Logger,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("options", &self.options)
            .field("logger", &self.logger)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Create a resolver reading files from disk and logging to tracing.
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            options,
            source: Arc::new(FileSource),
            logger: Logger::new(),
        }
    }

    /// Use a different source loader.
    pub fn with_source(mut self, source: Arc<dyn SourceLoader>) -> Self {
        self.source = source;
        self
    }

    /// Use a different diagnostic logger.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Resolve `path` and its imports.
    ///
    /// Fails with [`SpigError::Load`] when a file cannot be read and
    /// fail-on-error is enabled; otherwise the file is reported and treated
    /// as an empty mapping. Fails with [`SpigError::CyclicImport`] when a
    /// file is reached again through its own imports.
    pub fn resolve(&self, path: &Path) -> Result<Map<String, Value>> {
        let mut chain = Vec::new();
        self.resolve_file(path, &mut chain)
    }

    fn resolve_file(&self, path: &Path, chain: &mut Vec<PathBuf>) -> Result<Map<String, Value>> {
        let loaded = match self.source.load(path) {
            Ok(loaded) => loaded,
            Err(source) => {
                let err = SpigError::Load {
                    path: path.to_path_buf(),
                    source,
                };
                if self.options.fail_on_error {
                    return Err(err);
                }
                self.logger.error(&describe_load_failure(&err));
                return Ok(Map::new());
            }
        };

        let identity = std::fs::canonicalize(&loaded.path).unwrap_or_else(|_| loaded.path.clone());
        if chain.contains(&identity) {
            let mut cycle = chain.clone();
            cycle.push(identity.clone());
            return Err(SpigError::CyclicImport {
                path: identity,
                chain: cycle,
            });
        }
        debug!(path = %loaded.path.display(), depth = chain.len(), "Loaded configuration file");

        let directory = loaded
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let mut content = loaded.content;

        let Some(directive) = content.shift_remove(&self.options.import_key) else {
            return Ok(content);
        };

        chain.push(identity);
        let mut merged = Map::new();
        for reference in import_references(directive) {
            let Value::String(reference) = reference else {
                self.logger.warning(&format!(
                    "Unsupported import type: <{}>! Must be: <string>.",
                    type_name(&reference)
                ));
                continue;
            };

            let target = directory.join(&reference);
            debug!(from = %loaded.path.display(), import = %target.display(), "Resolving import");
            let imported = self.resolve_file(&target, chain)?;
            deep_merge_into(&mut merged, imported);
        }
        chain.pop();

        deep_merge_into(&mut merged, content);
        Ok(merged)
    }
}

/// A bare directive value is a one-element import list.
fn import_references(directive: Value) -> Vec<Value> {
    match directive {
        Value::Array(items) => items,
        other => vec![other],
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn describe_load_failure(err: &SpigError) -> String {
    match std::error::Error::source(err) {
        Some(cause) => format!("{err} Caused by: {cause}"),
        None => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::source::LoadedSource;
    use crate::error::SourceError;
    use crate::logging::Severity;
    use serde_json::json;
    use std::collections::HashMap;

    /// In-memory sources keyed by absolute path.
    struct MemorySource(HashMap<PathBuf, Value>);

    impl MemorySource {
        fn new(files: &[(&str, Value)]) -> Arc<Self> {
            Arc::new(Self(
                files
                    .iter()
                    .map(|(path, value)| (PathBuf::from(path), value.clone()))
                    .collect(),
            ))
        }
    }

    impl SourceLoader for MemorySource {
        fn load(&self, path: &Path) -> std::result::Result<LoadedSource, SourceError> {
            match self.0.get(path) {
                Some(Value::Object(map)) => Ok(LoadedSource {
                    path: path.to_path_buf(),
                    content: map.clone(),
                }),
                Some(_) => Err(SourceError::NotAMapping("a scalar")),
                None => Err(SourceError::Io(std::io::Error::from(
                    std::io::ErrorKind::NotFound,
                ))),
            }
        }
    }

    fn resolver(files: &[(&str, Value)], options: LoaderOptions) -> Resolver {
        Resolver::new(options)
            .with_source(MemorySource::new(files))
            .with_logger(Logger::new().with_capture())
    }

    #[test]
    fn test_no_imports_returns_content() {
        let r = resolver(&[("/cfg/config", json!({"a": 1}))], LoaderOptions::default());
        let result = r.resolve(Path::new("/cfg/config")).unwrap();
        assert_eq!(Value::Object(result), json!({"a": 1}));
    }

    #[test]
    fn test_import_order_and_own_keys_win() {
        let r = resolver(
            &[
                (
                    "/cfg/config",
                    json!({"$import": ["x.json", "y.json"], "shared": "own", "db": {"pool": 1}}),
                ),
                ("/cfg/x.json", json!({"shared": "x", "only_x": true, "db": {"url": "x", "pool": 8}})),
                ("/cfg/y.json", json!({"shared": "y", "db": {"url": "y"}})),
            ],
            LoaderOptions::default(),
        );
        let result = r.resolve(Path::new("/cfg/config")).unwrap();
        assert_eq!(
            Value::Object(result),
            json!({"shared": "own", "only_x": true, "db": {"url": "y", "pool": 1}})
        );
    }

    #[test]
    fn test_bare_string_import() {
        let r = resolver(
            &[
                ("/cfg/config", json!({"$import": "base.json", "name": "app"})),
                ("/cfg/base.json", json!({"name": "base", "port": 80})),
            ],
            LoaderOptions::default(),
        );
        let result = r.resolve(Path::new("/cfg/config")).unwrap();
        assert_eq!(Value::Object(result), json!({"name": "app", "port": 80}));
    }

    #[test]
    fn test_imports_resolve_relative_to_declaring_file() {
        let r = resolver(
            &[
                ("/cfg/config", json!({"$import": "sub/db.json"})),
                ("/cfg/sub/db.json", json!({"$import": "creds.json", "db": {"url": "x"}})),
                ("/cfg/sub/creds.json", json!({"db": {"user": "root"}})),
            ],
            LoaderOptions::default(),
        );
        let result = r.resolve(Path::new("/cfg/config")).unwrap();
        assert_eq!(Value::Object(result), json!({"db": {"user": "root", "url": "x"}}));
    }

    #[test]
    fn test_import_key_never_survives() {
        let r = resolver(
            &[
                ("/cfg/config", json!({"$import": ["a.json"], "k": 1})),
                ("/cfg/a.json", json!({"$import": "b.json", "a": 1})),
                ("/cfg/b.json", json!({"b": 1})),
            ],
            LoaderOptions::default(),
        );
        let result = r.resolve(Path::new("/cfg/config")).unwrap();
        assert!(!result.contains_key("$import"));
        assert_eq!(Value::Object(result), json!({"b": 1, "a": 1, "k": 1}));
    }

    #[test]
    fn test_custom_import_key() {
        let r = resolver(
            &[
                ("/cfg/config", json!({"@include": "a.json", "$import": "kept"})),
                ("/cfg/a.json", json!({"a": 1})),
            ],
            LoaderOptions::default().with_import_key("@include"),
        );
        let result = r.resolve(Path::new("/cfg/config")).unwrap();
        assert_eq!(Value::Object(result), json!({"a": 1, "$import": "kept"}));
    }

    #[test]
    fn test_non_string_entry_warns_once_and_is_skipped() {
        let r = resolver(
            &[
                ("/cfg/config", json!({"$import": [true, "a.json"]})),
                ("/cfg/a.json", json!({"a": 1})),
            ],
            LoaderOptions::default(),
        );
        let result = r.resolve(Path::new("/cfg/config")).unwrap();
        assert_eq!(Value::Object(result), json!({"a": 1}));

        let warnings = r.logger().captured_at(Severity::Warning);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].message,
            "Unsupported import type: <boolean>! Must be: <string>."
        );
        assert!(r.logger().captured_at(Severity::Error).is_empty());
    }

    #[test]
    fn test_missing_import_fails_by_default() {
        let r = resolver(
            &[("/cfg/config", json!({"$import": "gone.json", "a": 1}))],
            LoaderOptions::default(),
        );
        let err = r.resolve(Path::new("/cfg/config")).unwrap_err();
        assert!(matches!(err, SpigError::Load { ref path, .. } if path == Path::new("/cfg/gone.json")));
    }

    #[test]
    fn test_missing_import_degrades_without_fail_on_error() {
        let r = resolver(
            &[
                ("/cfg/config", json!({"$import": ["gone.json", "a.json"], "own": 1})),
                ("/cfg/a.json", json!({"a": 1})),
            ],
            LoaderOptions::default().with_fail_on_error(false),
        );
        let result = r.resolve(Path::new("/cfg/config")).unwrap();
        assert_eq!(Value::Object(result), json!({"a": 1, "own": 1}));

        let errors = r.logger().captured_at(Severity::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("</cfg/gone.json>"));
    }

    #[test]
    fn test_direct_cycle_is_detected() {
        let r = resolver(
            &[("/cfg/config", json!({"$import": "config"}))],
            LoaderOptions::default(),
        );
        let err = r.resolve(Path::new("/cfg/config")).unwrap_err();
        assert!(matches!(err, SpigError::CyclicImport { ref chain, .. } if chain.len() == 2));
    }

    #[test]
    fn test_indirect_cycle_is_fatal_even_without_fail_on_error() {
        let r = resolver(
            &[
                ("/cfg/a", json!({"$import": "b"})),
                ("/cfg/b", json!({"$import": "c"})),
                ("/cfg/c", json!({"$import": "a"})),
            ],
            LoaderOptions::default().with_fail_on_error(false),
        );
        let err = r.resolve(Path::new("/cfg/a")).unwrap_err();
        match err {
            SpigError::CyclicImport { path, chain } => {
                assert_eq!(path, PathBuf::from("/cfg/a"));
                assert_eq!(
                    chain,
                    ["/cfg/a", "/cfg/b", "/cfg/c", "/cfg/a"].map(PathBuf::from)
                );
            }
            other => panic!("expected cyclic import, got {other}"),
        }
    }

    #[test]
    fn test_diamond_imports_are_not_cycles() {
        let r = resolver(
            &[
                ("/cfg/config", json!({"$import": ["left", "right"]})),
                ("/cfg/left", json!({"$import": "common", "side": "left"})),
                ("/cfg/right", json!({"$import": "common", "side": "right"})),
                ("/cfg/common", json!({"common": true})),
            ],
            LoaderOptions::default(),
        );
        let result = r.resolve(Path::new("/cfg/config")).unwrap();
        assert_eq!(Value::Object(result), json!({"common": true, "side": "right"}));
    }
}
