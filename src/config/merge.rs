//! Layered document merge
//!
//! Raw configuration documents are layered before they are typed:
//! file document first, then each CLI `--set` layer.
//! - Objects: merged by key, recursively
//! - Arrays: replaced whole (`compilers` and `overrides` are never spliced)
//! - Scalars: later layer wins

use serde_json::Value;

/// Merge `overlay` onto `base`.
///
/// An overlay `null` replaces the base value rather than being skipped, so
/// `--set settings.optimizerRuns=null` clears the run count and lets the
/// version or override block supply it.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }

        (Value::Array(_), overlay @ Value::Array(_)) => overlay,

        (_, overlay) => overlay,
    }
}

/// Merge layers in order (first is base, last has highest precedence)
pub fn merge_layers<I>(layers: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    layers.into_iter().fold(Value::Null, deep_merge)
}
