//! Recursive key search over untyped JSON.

use serde_json::Value;

/// Collect every value stored under a mapping entry named `key`.
///
/// The walk is depth-first and pre-order: a matching value is recorded before
/// its own children are searched, and object entries and array elements are
/// visited in document order. Matches are not deduplicated.
pub fn find_keys<'a>(value: &'a Value, key: &str) -> Vec<&'a Value> {
    let mut results = Vec::new();
    walk(value, key, &mut |found| {
        results.push(found);
        true
    });
    results
}

/// First value found under `key`, in the same order as [`find_keys`].
pub fn find_first<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let mut first = None;
    walk(value, key, &mut |found| {
        first = Some(found);
        false
    });
    first
}

/// Visit matches until `visit` returns false. Returns false once stopped.
fn walk<'a, F>(value: &'a Value, key: &str, visit: &mut F) -> bool
where
    F: FnMut(&'a Value) -> bool,
{
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                if k == key && !visit(v) {
                    return false;
                }
                if !walk(v, key, visit) {
                    return false;
                }
            }
            true
        }
        Value::Array(items) => items.iter().all(|item| walk(item, key, visit)),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_keys_preorder_left_to_right() {
        let tree = json!({"a": {"x": 1}, "b": [{"x": 2}, {"x": 3}]});
        let found = find_keys(&tree, "x");
        assert_eq!(found, vec![&json!(1), &json!(2), &json!(3)]);
    }

    #[test]
    fn test_find_keys_descends_into_matches() {
        let tree = json!({"node": {"node": {"node": "leaf"}}});
        let found = find_keys(&tree, "node");
        assert_eq!(found.len(), 3);
        assert_eq!(found[2], &json!("leaf"));
    }

    #[test]
    fn test_find_keys_keeps_duplicates() {
        let tree = json!([{"id": "a"}, {"id": "a"}]);
        assert_eq!(find_keys(&tree, "id").len(), 2);
    }

    #[test]
    fn test_find_keys_absent_is_empty() {
        let tree = json!({"a": [1, 2, {"b": null}]});
        assert!(find_keys(&tree, "missing").is_empty());
        assert!(find_keys(&json!("scalar"), "a").is_empty());
    }

    #[test]
    fn test_find_first_matches_find_keys_order() {
        let tree = json!({
            "contents": [
                {"videoRenderer": {"videoId": "one"}},
                {"videoRenderer": {"videoId": "two"}}
            ]
        });
        let first = find_first(&tree, "videoId").and_then(Value::as_str);
        assert_eq!(first, Some("one"));
        assert!(find_first(&tree, "commentRenderer").is_none());
    }
}
