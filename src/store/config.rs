use crate::error::Result;
use crate::event::RELAY_PRIORITY;
use serde::{Deserialize, Serialize};

/// How dynamically-shaped updates are validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapePolicy {
    /// Only a string path or a mapping is accepted; anything else is an error.
    #[default]
    Strict,
    /// Any non-mapping argument is rendered to a string and used as a single path.
    Permissive,
}

/// How `get_or` treats the default when a key is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultPolicy {
    /// The supplied default is returned as given, including `null`, `false`, `0` and `""`.
    #[default]
    Exact,
    /// Falsy defaults (`null`, `false`, `0`, `""`) collapse to `null`.
    FalsyAsNull,
}

/// Construction-time settings for a [`Store`](crate::Store).
///
/// ```
/// use conduit::{ShapePolicy, StoreConfig};
///
/// let config = StoreConfig::from_json(r#"{ "name": "session", "update_shape": "permissive" }"#)?;
/// assert_eq!(config.name, "session");
/// assert_eq!(config.update_shape, ShapePolicy::Permissive);
/// # Ok::<(), conduit::StoreError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    pub name: String,
    pub update_shape: ShapePolicy,
    pub default_value: DefaultPolicy,
    /// Priority of the listener that relays changes to connected stores.
    pub relay_priority: i32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            update_shape: ShapePolicy::default(),
            default_value: DefaultPolicy::default(),
            relay_priority: RELAY_PRIORITY,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_update_shape(mut self, policy: ShapePolicy) -> Self {
        self.update_shape = policy;
        self
    }

    pub fn with_default_value(mut self, policy: DefaultPolicy) -> Self {
        self.default_value = policy;
        self
    }

    pub fn with_relay_priority(mut self, priority: i32) -> Self {
        self.relay_priority = priority;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn defaults_are_strict_and_exact() {
        let config = StoreConfig::default();
        assert_eq!(config.name, "");
        assert_eq!(config.update_shape, ShapePolicy::Strict);
        assert_eq!(config.default_value, DefaultPolicy::Exact);
        assert_eq!(config.relay_priority, RELAY_PRIORITY);
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let config = StoreConfig::from_json(r#"{ "default_value": "falsy_as_null" }"#).unwrap();
        assert_eq!(config.default_value, DefaultPolicy::FalsyAsNull);
        assert_eq!(config.update_shape, ShapePolicy::Strict);
        assert_eq!(config.relay_priority, RELAY_PRIORITY);
    }

    #[test]
    fn from_json_rejects_unknown_policy() {
        let err = StoreConfig::from_json(r#"{ "update_shape": "lenient" }"#).unwrap_err();
        assert!(matches!(err, StoreError::InvalidConfig(_)));
    }

    #[test]
    fn builder_overrides() {
        let config = StoreConfig::new()
            .with_name("cart")
            .with_update_shape(ShapePolicy::Permissive)
            .with_relay_priority(10);

        assert_eq!(config.name, "cart");
        assert_eq!(config.update_shape, ShapePolicy::Permissive);
        assert_eq!(config.relay_priority, 10);
    }
}
