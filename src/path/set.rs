use serde_json::{Map, Value};

/// Furthest an array may be padded past its current length by a single write.
pub const MAX_ARRAY_PADDING: usize = 1024;

/// Write `value` at the dot-delimited `path` inside `root`.
///
/// Missing intermediate segments are created as objects. An intermediate
/// that holds a scalar is replaced by an empty object. An existing array is
/// never replaced: a numeric segment writes at that index, padding with
/// `null` up to [`MAX_ARRAY_PADDING`] past its end. A non-numeric segment or
/// an index beyond that bound leaves `root` untouched and returns `false`.
///
/// ```
/// use conduit::path::set_path;
/// use serde_json::{json, Map};
///
/// let mut data = Map::new();
/// assert!(set_path(&mut data, "user.name", json!("Al")));
/// assert_eq!(data["user"], json!({ "name": "Al" }));
/// ```
pub fn set_path(root: &mut Map<String, Value>, path: &str, value: Value) -> bool {
    let mut segments = path.split('.');
    let first = segments.next().unwrap_or_default();

    let mut slot = root.entry(first.to_owned()).or_insert(Value::Null);
    for segment in segments {
        match child_slot(slot, segment) {
            Some(next) => slot = next,
            None => {
                tracing::debug!(%path, %segment, "path does not address an array element, write skipped");
                return false;
            }
        }
    }
    *slot = value;
    true
}

fn child_slot<'a>(container: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match container {
        Value::Array(items) => {
            let index = segment.parse::<usize>().ok()?;
            if index >= items.len() {
                if index - items.len() > MAX_ARRAY_PADDING {
                    return None;
                }
                items.resize(index.checked_add(1)?, Value::Null);
            }
            items.get_mut(index)
        }
        Value::Object(map) => Some(map.entry(segment.to_owned()).or_insert(Value::Null)),
        other => {
            *other = Value::Object(Map::new());
            child_slot(other, segment)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn set_top_level_key() {
        let mut data = Map::new();
        set_path(&mut data, "count", json!(5));
        assert_eq!(Value::Object(data), json!({ "count": 5 }));
    }

    #[test]
    fn set_creates_intermediate_objects() {
        let mut data = Map::new();
        set_path(&mut data, "a.b.c", json!(true));
        assert_eq!(Value::Object(data), json!({ "a": { "b": { "c": true } } }));
    }

    #[test]
    fn set_keeps_siblings() {
        let mut data = map(json!({ "user": { "name": "Al", "age": 3 } }));
        set_path(&mut data, "user.name", json!("Bo"));
        assert_eq!(Value::Object(data), json!({ "user": { "name": "Bo", "age": 3 } }));
    }

    #[test]
    fn set_replaces_scalar_intermediate() {
        let mut data = map(json!({ "a": 1 }));
        set_path(&mut data, "a.b", json!(2));
        assert_eq!(Value::Object(data), json!({ "a": { "b": 2 } }));
    }

    #[test]
    fn set_indexes_into_arrays() {
        let mut data = map(json!({ "items": [1, 2] }));
        assert!(set_path(&mut data, "items.1", json!("x")));
        assert!(set_path(&mut data, "items.3", json!("y")));
        assert_eq!(
            Value::Object(data),
            json!({ "items": [1, "x", null, "y"] })
        );
    }

    #[test]
    fn empty_path_is_a_literal_key() {
        let mut data = Map::new();
        set_path(&mut data, "", json!(1));
        assert_eq!(data.get(""), Some(&json!(1)));
    }

    #[test]
    fn oversized_index_leaves_array_untouched() {
        let mut data = map(json!({ "items": [1] }));

        assert!(!set_path(&mut data, "items.18446744073709551615", json!(1)));
        assert!(!set_path(&mut data, "items.1000000000000", json!(1)));
        assert_eq!(Value::Object(data), json!({ "items": [1] }));
    }

    #[test]
    fn padding_is_bounded() {
        let mut data = map(json!({ "items": [] }));

        assert!(set_path(&mut data, &format!("items.{MAX_ARRAY_PADDING}"), json!("last")));
        assert_eq!(data["items"].as_array().map(Vec::len), Some(MAX_ARRAY_PADDING + 1));

        let too_far = format!("items.{}", 2 * MAX_ARRAY_PADDING + 2);
        assert!(!set_path(&mut data, &too_far, json!("x")));
        assert_eq!(data["items"].as_array().map(Vec::len), Some(MAX_ARRAY_PADDING + 1));
    }

    #[test]
    fn named_segment_keeps_existing_array() {
        let mut data = map(json!({ "items": [1, 2] }));

        assert!(!set_path(&mut data, "items.label", json!("x")));
        assert!(!set_path(&mut data, "items.label.deep", json!("x")));
        assert_eq!(Value::Object(data), json!({ "items": [1, 2] }));
    }

    #[test]
    fn nested_paths_through_array_elements() {
        let mut data = map(json!({ "rows": [{ "id": 1 }] }));

        assert!(set_path(&mut data, "rows.0.name", json!("first")));
        assert_eq!(
            Value::Object(data),
            json!({ "rows": [{ "id": 1, "name": "first" }] })
        );
    }
}
