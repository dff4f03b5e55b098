//! Deep merge of configuration nodes.
//!
//! Mappings are merged key by key, recursively. Every other value type
//! (scalars, nulls, sequences) is replaced wholesale by the overriding value.

use serde_json::{Map, Value};

/// Deep merge two values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - Everything else in overlay (including `null` and arrays) replaces base
///
/// # Example
/// ```
/// use serde_json::json;
/// use spig::config::deep_merge;
///
/// let base = json!({
///     "db": { "url": "mysql://localhost", "pool": 4 },
///     "hosts": ["a", "b"]
/// });
/// let overlay = json!({
///     "db": { "pool": 16 },
///     "hosts": ["c"]
/// });
/// let result = deep_merge(base, overlay);
/// assert_eq!(
///     result,
///     json!({ "db": { "url": "mysql://localhost", "pool": 16 }, "hosts": ["c"] })
/// );
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            deep_merge_into(&mut base_map, overlay_map);
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Merge `overlay` into `base` in place.
///
/// Keys already present in `base` keep their position; new keys are
/// appended in overlay order.
pub fn deep_merge_into(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, overlay_value) in overlay {
        match base.get_mut(&key) {
            Some(base_value) => {
                let previous = std::mem::take(base_value);
                *base_value = deep_merge(previous, overlay_value);
            }
            None => {
                base.insert(key, overlay_value);
            }
        }
    }
}

/// Merge multiple mappings in order, with later mappings taking precedence.
pub fn deep_merge_all(maps: impl IntoIterator<Item = Map<String, Value>>) -> Map<String, Value> {
    maps.into_iter().fold(Map::new(), |mut acc, map| {
        deep_merge_into(&mut acc, map);
        acc
    })
}
