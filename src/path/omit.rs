use serde_json::{Map, Value};

/// Return `map` without the given top-level keys, preserving the order of the rest.
///
/// Keys are matched literally; dots are not treated as paths.
pub fn omit<K: AsRef<str>>(map: Map<String, Value>, keys: &[K]) -> Map<String, Value> {
    map.into_iter()
        .filter(|(key, _)| !keys.iter().any(|omitted| omitted.as_ref() == key.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn omit_drops_only_named_keys() {
        let Value::Object(data) = json!({ "x": 1, "y": 2, "z": 3 }) else {
            unreachable!()
        };

        let kept = omit(data, &["x", "y", "missing"]);
        assert_eq!(Value::Object(kept), json!({ "z": 3 }));
    }

    #[test]
    fn omit_is_not_path_aware() {
        let Value::Object(data) = json!({ "a": { "b": 1 }, "a.b": 2 }) else {
            unreachable!()
        };

        let kept = omit(data, &["a.b"]);
        assert_eq!(Value::Object(kept), json!({ "a": { "b": 1 } }));
    }
}
