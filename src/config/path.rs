//! Dot-path access to configuration trees.
//!
//! Paths start with the separator and name one key per segment:
//! `.db.options.auth` addresses `root["db"]["options"]["auth"]`.

use crate::error::{Result, SpigError};
use serde_json::{Map, Value};

/// Separator between path segments. Every path starts with it.
pub const SEPARATOR: char = '.';

/// Classification of a [`Visit`] emitted by [`walk_object_tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitKind {
    /// Emitted once for every key, whatever its value.
    Node,
    /// The value is a mapping; its keys are visited next.
    Parent,
    /// The value is not a mapping.
    Leaf,
}

impl std::fmt::Display for VisitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisitKind::Node => write!(f, "node"),
            VisitKind::Parent => write!(f, "parent"),
            VisitKind::Leaf => write!(f, "leaf"),
        }
    }
}

/// A single traversal event.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub kind: VisitKind,
    pub key: &'a str,
    pub value: &'a Value,
    /// Full path from the traversal root, leading separator included.
    pub path: &'a str,
}

fn split_path(path: &str) -> Result<(Vec<&str>, &str)> {
    let Some(rest) = path.strip_prefix(SEPARATOR) else {
        return Err(SpigError::invalid_argument(format!(
            "Expected <objPath> to start with <{SEPARATOR}>!"
        )));
    };
    let mut segments: Vec<&str> = rest.split(SEPARATOR).collect();
    // `split` always yields at least one item
    let last = segments.pop().unwrap_or_default();
    Ok((segments, last))
}

fn root_mapping_mut(root: &mut Value) -> Result<&mut Map<String, Value>> {
    match root {
        Value::Object(map) => Ok(map),
        _ => Err(SpigError::invalid_argument(
            "Expected <obj> to be an <object>!",
        )),
    }
}

fn not_a_mapping(key: &str, path: &str) -> SpigError {
    SpigError::invalid_argument(format!(
        "Expected <{key}> of path <{path}> to be an <object>!"
    ))
}

/// Walk to the mapping holding the terminal key, creating missing
/// intermediates when `create` is set.
fn descend<'a, 'p>(
    root: &'a mut Value,
    path: &'p str,
    create: bool,
) -> Result<(&'a mut Map<String, Value>, &'p str)> {
    let (parents, last) = split_path(path)?;
    let mut current = root_mapping_mut(root)?;

    for key in parents {
        if !current.contains_key(key) {
            if !create {
                return Err(SpigError::missing_segment(key, path));
            }
            current.insert(key.to_string(), Value::Object(Map::new()));
        }
        current = match current.get_mut(key) {
            Some(Value::Object(map)) => map,
            _ => return Err(not_a_mapping(key, path)),
        };
    }

    Ok((current, last))
}

/// Read the value at `path`.
///
/// A missing intermediate key fails with [`SpigError::MissingPathSegment`]
/// unless `suppress_missing` is set, in which case an empty mapping is
/// inserted at that position and descent continues. A missing terminal key
/// yields `Ok(None)`.
pub fn get_path<'a>(
    root: &'a mut Value,
    path: &str,
    suppress_missing: bool,
) -> Result<Option<&'a Value>> {
    let (parent, key) = descend(root, path, suppress_missing)?;
    let parent: &'a Map<String, Value> = parent;
    Ok(parent.get(key))
}

/// Read-only variant of [`get_path`] that never creates intermediates.
pub fn find_path<'a>(root: &'a Value, path: &str) -> Result<Option<&'a Value>> {
    let (parents, last) = split_path(path)?;
    let Value::Object(root) = root else {
        return Err(SpigError::invalid_argument(
            "Expected <obj> to be an <object>!",
        ));
    };
    let mut current = root;

    for key in parents {
        current = match current.get(key) {
            Some(Value::Object(map)) => map,
            Some(_) => return Err(not_a_mapping(key, path)),
            None => return Err(SpigError::missing_segment(key, path)),
        };
    }

    Ok(current.get(last))
}

/// Assign `value` at `path`, overwriting whatever was there.
///
/// Intermediate keys follow the same rules as [`get_path`], with
/// `generate_missing` in place of `suppress_missing`.
pub fn set_path(root: &mut Value, path: &str, value: Value, generate_missing: bool) -> Result<()> {
    let (parent, key) = descend(root, path, generate_missing)?;
    parent.insert(key.to_string(), value);
    Ok(())
}

/// Depth-first pre-order traversal over every key of every mapping.
///
/// Each key yields a [`VisitKind::Node`] event followed by either a
/// [`VisitKind::Parent`] event and the recursive walk of its value, or a
/// [`VisitKind::Leaf`] event. Sequences are leaves.
pub fn walk_object_tree<F>(root: &Value, mut visitor: F) -> Result<()>
where
    F: FnMut(Visit<'_>),
{
    let Value::Object(map) = root else {
        return Err(SpigError::invalid_argument(
            "Expected <obj> to be an <object>!",
        ));
    };
    walk_mapping(map, &mut visitor, "");
    Ok(())
}

fn walk_mapping<F>(map: &Map<String, Value>, visitor: &mut F, prefix: &str)
where
    F: FnMut(Visit<'_>),
{
    for (key, value) in map {
        let path = format!("{prefix}{SEPARATOR}{key}");
        let visit = |kind: VisitKind| Visit {
            kind,
            key,
            value,
            path: &path,
        };

        visitor(visit(VisitKind::Node));
        match value {
            Value::Object(child) => {
                visitor(visit(VisitKind::Parent));
                walk_mapping(child, visitor, &path);
            }
            _ => visitor(visit(VisitKind::Leaf)),
        }
    }
}

/// Collect `(path, value)` pairs for every leaf, in traversal order.
pub fn leaves(root: &Value) -> Result<Vec<(String, Value)>> {
    let mut out = Vec::new();
    walk_object_tree(root, |visit| {
        if visit.kind == VisitKind::Leaf {
            out.push((visit.path.to_string(), visit.value.clone()));
        }
    })?;
    Ok(out)
}
