//! Relative path lookups and text-node helpers.

use serde_json::Value;

static NULL: Value = Value::Null;

/// Extract a value from nested JSON using dot-notation path.
///
/// Numeric segments index into arrays. Missing segments resolve to `Null`.
pub fn extract_path<'a>(data: &'a Value, path: &str) -> &'a Value {
    if path.is_empty() {
        return data;
    }

    let mut current = data;
    for key in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(key).unwrap_or(&NULL),
            Value::Array(arr) => match key.parse::<usize>() {
                Ok(idx) => arr.get(idx).unwrap_or(&NULL),
                Err(_) => &NULL,
            },
            _ => &NULL,
        };
    }

    current
}

/// String at `path`, if present.
pub fn path_str<'a>(data: &'a Value, path: &str) -> Option<&'a str> {
    extract_path(data, path).as_str()
}

/// Read a provider text node: either `{"simpleText": ...}` or
/// `{"runs": [{"text": ...}, ...]}` with the runs concatenated.
pub fn text_of(node: &Value) -> Option<String> {
    if let Some(simple) = node.get("simpleText").and_then(Value::as_str) {
        return Some(simple.to_string());
    }

    let runs = node.get("runs")?.as_array()?;
    let text: String = runs
        .iter()
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .collect();

    if runs.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// URL of the last entry of a `thumbnails` array, usually the largest.
pub fn last_thumbnail(node: &Value) -> Option<&str> {
    extract_path(node, "thumbnails")
        .as_array()?
        .last()?
        .get("url")?
        .as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_path_nested() {
        let data = json!({"a": {"b": [{"c": "deep"}]}});
        assert_eq!(extract_path(&data, "a.b.0.c"), &json!("deep"));
        assert_eq!(extract_path(&data, ""), &data);
    }

    #[test]
    fn test_extract_path_missing_is_null() {
        let data = json!({"a": [1]});
        assert!(extract_path(&data, "a.5").is_null());
        assert!(extract_path(&data, "a.x").is_null());
        assert!(extract_path(&data, "b.c.d").is_null());
        assert_eq!(path_str(&data, "a.0"), None);
    }

    #[test]
    fn test_text_of_simple_and_runs() {
        assert_eq!(
            text_of(&json!({"simpleText": "1.2M subscribers"})).as_deref(),
            Some("1.2M subscribers")
        );
        let runs = json!({"runs": [{"text": "Great "}, {"text": "video"}, {"emoji": {}}]});
        assert_eq!(text_of(&runs).as_deref(), Some("Great video"));
        assert_eq!(text_of(&json!({"runs": []})), None);
        assert_eq!(text_of(&json!({})), None);
    }

    #[test]
    fn test_last_thumbnail() {
        let node = json!({"thumbnails": [{"url": "small"}, {"url": "large"}]});
        assert_eq!(last_thumbnail(&node), Some("large"));
        assert_eq!(last_thumbnail(&json!({"thumbnails": []})), None);
    }
}
