//! Configuration shapes consumed by the router

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ContractError;

/// Top-level router configuration.
///
/// Keys are either module names (the value is that module's global
/// config) or path names (the value deserializes to [`PathConfig`]).
/// Module names take priority; one key can never be interpreted as both.
pub type RouterConfig = Map<String, Value>;

/// Per-path configuration.
///
/// `send_to` is the ordered fan-out list; everything else is passed
/// through untouched to the owning module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathConfig {
    /// Fan-out list. Order governs the order of aggregated replies,
    /// not delivery order (delivery is concurrent).
    #[serde(default)]
    pub send_to: Vec<SinkEntry>,

    /// Module-specific settings for the owning module
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl PathConfig {
    /// Deserialize a path config from a raw config value
    ///
    /// # Errors
    /// Returns a parse error when the value is not an object of the
    /// expected shape.
    pub fn from_value(value: &Value) -> Result<Self, ContractError> {
        serde_json::from_value(value.clone())
            .map_err(|e| ContractError::config_parse(format!("invalid path config: {e}")))
    }

    /// Read one module-specific parameter
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }
}

/// One entry of a path's `send_to` fan-out list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SinkEntry {
    /// Name of the sink module. Entries without one are dropped when
    /// the dispatch handler is built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    /// Per-delivery deadline in milliseconds, overriding the
    /// router-wide default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Module-specific sink settings
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl SinkEntry {
    /// Create an entry targeting `module` with no extra settings
    pub fn to_module(module: impl Into<String>) -> Self {
        Self {
            module: Some(module.into()),
            ..Self::default()
        }
    }

    /// Read one module-specific parameter
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_config_from_value() {
        let value = json!({
            "send_to": [
                { "module": "echo", "tag": "primary" },
                { "module": "file", "timeout_ms": 250 },
            ],
            "interval_ms": 100,
        });

        let config = PathConfig::from_value(&value).unwrap();
        assert_eq!(config.send_to.len(), 2);
        assert_eq!(config.send_to[0].module.as_deref(), Some("echo"));
        assert_eq!(config.send_to[0].param("tag"), Some(&json!("primary")));
        assert_eq!(config.send_to[1].timeout_ms, Some(250));
        assert_eq!(config.param("interval_ms"), Some(&json!(100)));
    }

    #[test]
    fn test_path_config_missing_send_to() {
        let config = PathConfig::from_value(&json!({ "interval_ms": 50 })).unwrap();
        assert!(config.send_to.is_empty());
    }

    #[test]
    fn test_sink_entry_without_module() {
        let value = json!({ "send_to": [ { "tag": "anonymous" } ] });
        let config = PathConfig::from_value(&value).unwrap();
        assert!(config.send_to[0].module.is_none());
    }

    #[test]
    fn test_path_config_rejects_non_object() {
        assert!(PathConfig::from_value(&json!("not an object")).is_err());
        assert!(PathConfig::from_value(&json!({ "send_to": "not a list" })).is_err());
    }
}
