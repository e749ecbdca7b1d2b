//! Dot-path flattening of nested objects
//!
//! `{"address": {"city": "X"}}` flattens to `{"address.city": "X"}`. Only
//! plain objects are descended into; lists and primitives are leaves. A key
//! that already contains a literal `.` is indistinguishable from a flattened
//! path, so `unflatten(flatten(x)) == x` only holds when no original key
//! contains a dot.

use crate::models::value::{CellValue, Row};

/// Flatten nested objects into dot-joined keys under `prefix`.
///
/// Empty nested objects are kept as leaves so no key disappears.
pub fn flatten(object: &Row, prefix: &str) -> Row {
    let mut flat = Row::new();
    flatten_into(&mut flat, object, prefix);
    flat
}

fn flatten_into(flat: &mut Row, object: &Row, prefix: &str) {
    for (key, value) in object {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            CellValue::Object(child) if !child.is_empty() => flatten_into(flat, child, &path),
            _ => {
                flat.insert(path, value.clone());
            }
        }
    }
}

/// Rebuild nested objects from dot-joined keys.
///
/// When a path runs through a key that already holds a non-object value, the
/// value is replaced by an object (later keys win).
pub fn unflatten(flat: &Row) -> Row {
    let mut nested = Row::new();
    for (key, value) in flat {
        let parts: Vec<&str> = key.split('.').collect();
        insert_path(&mut nested, &parts, value.clone());
    }
    nested
}

fn insert_path(target: &mut Row, parts: &[&str], value: CellValue) {
    match parts {
        [] => {}
        [last] => {
            target.insert(last.to_string(), value);
        }
        [head, rest @ ..] => {
            let slot = target
                .entry(head.to_string())
                .or_insert_with(|| CellValue::Object(Row::new()));
            if !matches!(slot, CellValue::Object(_)) {
                *slot = CellValue::Object(Row::new());
            }
            if let CellValue::Object(child) = slot {
                insert_path(child, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_flatten_nested_object() {
        assert_eq!(
            flatten(&row(json!({"address": {"city": "X"}})), ""),
            row(json!({"address.city": "X"}))
        );
    }

    #[test]
    fn test_flatten_keeps_lists_as_leaves() {
        let input = row(json!({"tags": [{"a": 1}], "n": 1}));
        assert_eq!(flatten(&input, ""), input);
    }

    #[test]
    fn test_flatten_with_prefix() {
        assert_eq!(
            flatten(&row(json!({"a": {"b": 1}})), "root"),
            row(json!({"root.a.b": 1}))
        );
    }

    #[test]
    fn test_unflatten_dotted_keys() {
        assert_eq!(
            unflatten(&row(json!({"address.city": "X", "address.zip": "1", "name": "n"}))),
            row(json!({"address": {"city": "X", "zip": "1"}, "name": "n"}))
        );
    }

    #[test]
    fn test_round_trip_without_literal_dots() {
        let input = row(json!({"a": {"b": {"c": 1}, "d": [1, 2]}, "e": null, "f": {}}));
        assert_eq!(unflatten(&flatten(&input, "")), input);
    }

    #[test]
    fn test_literal_dot_key_is_ambiguous() {
        let input = row(json!({"version.major": 1}));
        assert_ne!(unflatten(&flatten(&input, "")), input);
    }

    #[test]
    fn test_path_through_primitive_replaces_it() {
        assert_eq!(
            unflatten(&row(json!({"a": 1, "a.b": 2}))),
            row(json!({"a": {"b": 2}}))
        );
    }
}
