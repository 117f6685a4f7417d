//! Dotted option path helpers.

use serde_json::{Map, Value};

/// A prop or option map. Iteration follows insertion order.
pub type Props = Map<String, Value>;

/// Copy `props`, prepending `prefix` to every key.
pub fn add_prefix_to_keys(props: &Props, prefix: &str) -> Props {
    props
        .iter()
        .map(|(key, value)| (format!("{prefix}{key}"), value.clone()))
        .collect()
}

/// Walk `value` along `keys`.
///
/// Returns `None` as soon as a segment is missing or the current value is not
/// an object. An empty key list yields `value` itself.
pub fn get_nested_value<'a, S: AsRef<str>>(value: &'a Value, keys: &[S]) -> Option<&'a Value> {
    keys.iter()
        .try_fold(value, |current, key| current.as_object()?.get(key.as_ref()))
}

/// Write `value` at the dotted `path` inside `target`, creating intermediate
/// objects and replacing non-object intermediates.
pub fn set_nested_value(target: &mut Props, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut current = target;

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return;
        }

        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(map) => map,
            _ => unreachable!("slot was just made an object"),
        };
    }
}

/// Split off the first segment of a dotted path.
pub(crate) fn split_head(path: &str) -> (&str, Vec<&str>) {
    let mut segments = path.split('.');
    let head = segments.next().unwrap_or_default();
    (head, segments.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Props {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn prefixes_keys_in_order() {
        let prefixed = add_prefix_to_keys(&props(json!({"b": 1, "a": 2})), "range.");

        let keys: Vec<_> = prefixed.keys().map(String::as_str).collect();
        assert_eq!(keys, ["range.b", "range.a"]);
        assert_eq!(prefixed["range.a"], json!(2));
    }

    #[test]
    fn reads_nested_values() {
        let value = json!({"a": {"b": {"c": 3}}, "x": 1});

        assert_eq!(get_nested_value(&value, &["a", "b", "c"]), Some(&json!(3)));
        assert_eq!(get_nested_value(&value, &["a", "missing"]), None);
        assert_eq!(get_nested_value(&value, &["x", "y"]), None);
        assert_eq!(get_nested_value::<&str>(&value, &[]), Some(&value));
    }

    #[test]
    fn writes_nested_values() {
        let mut target = props(json!({"a": 5}));

        set_nested_value(&mut target, "a.b", json!(1));
        set_nested_value(&mut target, "a.c", json!(2));
        set_nested_value(&mut target, "top", json!("x"));

        assert_eq!(Value::Object(target), json!({"a": {"b": 1, "c": 2}, "top": "x"}));
    }

    #[test]
    fn splits_head_segment() {
        assert_eq!(split_head("range.start"), ("range", vec!["start"]));
        assert_eq!(split_head("zoomLevel"), ("zoomLevel", vec![]));
    }
}
