// src/core/merge.rs

//! Structural merge of override fragments into the compilation accumulator.

use crate::models::Fragment;
use serde_json::Value;

/// Deep-merges `source` into `target` in place.
///
/// For every key of `source`: when both sides hold a JSON object the two are
/// merged key-wise, recursively. Anything else (arrays, scalars, `null`, or a
/// type mismatch) is overwritten by the source value. Later merges therefore
/// win on conflicting leaves. `source` is never modified.
pub fn merge(target: &mut Fragment, source: &Fragment) {
    for (key, incoming) in source {
        if let (Some(Value::Object(existing)), Value::Object(incoming_object)) =
            (target.get_mut(key), incoming)
        {
            merge(existing, incoming_object);
            continue;
        }
        target.insert(key.clone(), incoming.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragment(value: Value) -> Fragment {
        match value {
            Value::Object(map) => map,
            other => panic!("Expected an object fixture, got {}", other),
        }
    }

    #[test]
    fn test_merge_recurses_into_objects() {
        let mut target = fragment(json!({ "a": { "x": 1, "y": 2 } }));
        let source = fragment(json!({ "a": { "y": 9, "z": 3 } }));
        merge(&mut target, &source);
        assert_eq!(Value::Object(target), json!({ "a": { "x": 1, "y": 9, "z": 3 } }));
    }

    #[test]
    fn test_merge_scalar_replaces_object() {
        let mut target = fragment(json!({ "a": { "x": 1 } }));
        merge(&mut target, &fragment(json!({ "a": 5 })));
        assert_eq!(Value::Object(target), json!({ "a": 5 }));
    }

    #[test]
    fn test_merge_object_replaces_scalar_and_null() {
        let mut target = fragment(json!({ "a": 5, "b": null }));
        merge(
            &mut target,
            &fragment(json!({ "a": { "x": 1 }, "b": { "y": 2 } })),
        );
        assert_eq!(
            Value::Object(target),
            json!({ "a": { "x": 1 }, "b": { "y": 2 } })
        );
    }

    #[test]
    fn test_merge_arrays_are_replaced_not_concatenated() {
        let mut target = fragment(json!({ "next": ["A", "B"], "roi": [0, 0, 10, 10] }));
        merge(&mut target, &fragment(json!({ "next": ["C"] })));
        assert_eq!(
            Value::Object(target),
            json!({ "next": ["C"], "roi": [0, 0, 10, 10] })
        );
    }

    #[test]
    fn test_merge_null_source_overwrites() {
        let mut target = fragment(json!({ "a": { "x": 1 } }));
        merge(&mut target, &fragment(json!({ "a": null })));
        assert_eq!(Value::Object(target), json!({ "a": null }));
    }

    #[test]
    fn test_merge_with_empty_sides() {
        let source = fragment(json!({ "a": { "b": [1] } }));

        let mut empty_target = Fragment::new();
        merge(&mut empty_target, &source);
        assert_eq!(empty_target, source);

        let mut target = source.clone();
        merge(&mut target, &Fragment::new());
        assert_eq!(target, source);
    }

    #[test]
    fn test_merge_does_not_alias_source() {
        let source = fragment(json!({ "a": { "b": 1 } }));
        let snapshot = source.clone();
        let mut target = Fragment::new();
        merge(&mut target, &source);
        merge(&mut target, &fragment(json!({ "a": { "b": 2 } })));
        assert_eq!(source, snapshot);
        assert_eq!(Value::Object(target), json!({ "a": { "b": 2 } }));
    }

    #[test]
    fn test_merge_order_matters() {
        let first = fragment(json!({ "k": 1 }));
        let second = fragment(json!({ "k": 2 }));

        let mut forward = Fragment::new();
        merge(&mut forward, &first);
        merge(&mut forward, &second);

        let mut backward = Fragment::new();
        merge(&mut backward, &second);
        merge(&mut backward, &first);

        assert_eq!(forward["k"], json!(2));
        assert_eq!(backward["k"], json!(1));
    }
}
