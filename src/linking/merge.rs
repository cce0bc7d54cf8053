//! Deterministic recursive merge over metadata maps.

use serde_json::{Map, Value};

/// Knobs controlling merge behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    /// Drop duplicate array elements (first occurrence wins).
    ///
    /// Plain concatenation is not idempotent: two racing logins that both
    /// merge the same profiles would double every array element. Enabling
    /// dedup makes re-application converge at the cost of dropping
    /// intentional duplicates.
    pub dedup_arrays: bool,
}

/// Merges two metadata maps key-by-key.
///
/// Precedence rules, applied per key:
/// - present on one side only: that value is used as-is;
/// - both arrays: secondary's elements followed by primary's;
/// - both objects: merged recursively with the same rules;
/// - anything else (scalar conflict or mismatched kinds): primary wins.
///
/// Either input may be `None` (the directory omits empty metadata); the
/// result is always a concrete map.
#[must_use]
pub fn merge_metadata(
    secondary: Option<&Map<String, Value>>,
    primary: Option<&Map<String, Value>>,
    options: MergeOptions,
) -> Map<String, Value> {
    let empty = Map::new();
    let secondary = secondary.unwrap_or(&empty);
    let primary = primary.unwrap_or(&empty);
    merge_maps(secondary, primary, options)
}

fn merge_maps(
    secondary: &Map<String, Value>,
    primary: &Map<String, Value>,
    options: MergeOptions,
) -> Map<String, Value> {
    let mut merged = Map::new();
    for (key, secondary_value) in secondary {
        match primary.get(key) {
            Some(primary_value) => {
                merged.insert(key.clone(), merge_values(secondary_value, primary_value, options));
            }
            None => {
                merged.insert(key.clone(), secondary_value.clone());
            }
        }
    }
    for (key, primary_value) in primary {
        if !secondary.contains_key(key) {
            merged.insert(key.clone(), primary_value.clone());
        }
    }
    merged
}

fn merge_values(secondary: &Value, primary: &Value, options: MergeOptions) -> Value {
    match (secondary, primary) {
        (Value::Array(secondary_items), Value::Array(primary_items)) => {
            let mut items: Vec<Value> =
                secondary_items.iter().chain(primary_items).cloned().collect();
            if options.dedup_arrays {
                let mut seen = Vec::new();
                items.retain(|item| {
                    if seen.contains(item) {
                        false
                    } else {
                        seen.push(item.clone());
                        true
                    }
                });
            }
            Value::Array(items)
        }
        (Value::Object(secondary_map), Value::Object(primary_map)) => {
            Value::Object(merge_maps(secondary_map, primary_map, options))
        }
        // Scalar conflict, or mismatched kinds: the merge target wins.
        (_, primary_value) => primary_value.clone(),
    }
}
