use super::config::ShapePolicy;
use crate::error::{Result, StoreError};
use crate::path::set_path;
use serde_json::{Map, Value};

/// A partial update: one path and value, or a mapping of paths to values.
///
/// Paths use dot notation, so `"user.name"` writes inside `user`.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Single { path: String, value: Value },
    Many(Map<String, Value>),
}

impl Update {
    /// Build an update from dynamically-shaped arguments.
    ///
    /// A mapping becomes [`Update::Many`] and `value` is ignored; a string
    /// becomes the path of [`Update::Single`]. Any other `name` is rejected
    /// under [`ShapePolicy::Strict`] and rendered as JSON text and used as
    /// the path under [`ShapePolicy::Permissive`].
    pub fn parse(name: Value, value: Value, policy: ShapePolicy) -> Result<Self> {
        match (name, policy) {
            (Value::Object(map), _) => Ok(Update::Many(map)),
            (Value::String(path), _) => Ok(Update::Single { path, value }),
            (other, ShapePolicy::Permissive) => Ok(Update::Single {
                path: other.to_string(),
                value,
            }),
            (other, ShapePolicy::Strict) => Err(StoreError::InvalidUpdateShape {
                found: json_kind(&other),
            }),
        }
    }

    /// Apply every path/value pair to `data`.
    ///
    /// A pair whose path cannot be written without replacing an existing
    /// array is skipped; see [`set_path`].
    pub(crate) fn apply(self, data: &mut Map<String, Value>) {
        match self {
            Update::Single { path, value } => {
                set_path(data, &path, value);
            }
            Update::Many(pairs) => {
                for (path, value) in pairs {
                    set_path(data, &path, value);
                }
            }
        }
    }
}

impl<K, V> From<(K, V)> for Update
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from((path, value): (K, V)) -> Self {
        Update::Single {
            path: path.into(),
            value: value.into(),
        }
    }
}

impl From<Map<String, Value>> for Update {
    fn from(pairs: Map<String, Value>) -> Self {
        Update::Many(pairs)
    }
}

/// One or more top-level keys, as accepted by [`Store::remove`](crate::Store::remove).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keys(Vec<String>);

impl Keys {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for Keys {
    fn from(key: &str) -> Self {
        Keys(vec![key.to_owned()])
    }
}

impl From<String> for Keys {
    fn from(key: String) -> Self {
        Keys(vec![key])
    }
}

impl<K: Into<String>> From<Vec<K>> for Keys {
    fn from(keys: Vec<K>) -> Self {
        Keys(keys.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, const N: usize> From<[K; N]> for Keys {
    fn from(keys: [K; N]) -> Self {
        Keys(keys.into_iter().map(Into::into).collect())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
