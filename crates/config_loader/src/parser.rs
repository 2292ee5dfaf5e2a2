//! 配置解析模块
//!
//! 支持 TOML (主要) 和 JSON (可选) 格式，统一解析为 `RouterConfig` 映射。

use contracts::{ContractError, RouterConfig};
use serde_json::Value;

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式 (推荐)
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// 解析 TOML 格式配置
pub fn parse_toml(content: &str) -> Result<RouterConfig, ContractError> {
    let value: Value = toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })?;
    into_mapping(value)
}

/// 解析 JSON 格式配置
pub fn parse_json(content: &str) -> Result<RouterConfig, ContractError> {
    let value: Value = serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })?;
    into_mapping(value)
}

/// 根据格式解析配置
pub fn parse(content: &str, format: ConfigFormat) -> Result<RouterConfig, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

fn into_mapping(value: Value) -> Result<RouterConfig, ContractError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ContractError::config_parse(format!(
            "top level must be a mapping of module/path names, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml_minimal() {
        let content = r#"
["/timer/tick"]
interval_ms = 100

[["/timer/tick".send_to]]
module = "echo"
tag = "primary"

[timer]
default_interval_ms = 1000
"#;
        let config = parse_toml(content).unwrap();
        assert!(config.contains_key("/timer/tick"));
        assert!(config.contains_key("timer"));

        let send_to = &config["/timer/tick"]["send_to"];
        assert_eq!(send_to[0]["module"], "echo");
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "timer": { "default_interval_ms": 1000 },
            "/timer/tick": {
                "interval_ms": 100,
                "send_to": [ { "module": "echo" } ]
            }
        }"#;
        let config = parse_json(content).unwrap();
        assert_eq!(config["/timer/tick"]["send_to"][0]["module"], "echo");
    }

    #[test]
    fn test_toml_and_json_agree() {
        let toml_content = r#"
["/timer/tick"]
interval_ms = 100

[["/timer/tick".send_to]]
module = "echo"
"#;
        let json_content = r#"{
            "/timer/tick": {
                "interval_ms": 100,
                "send_to": [ { "module": "echo" } ]
            }
        }"#;
        assert_eq!(
            parse_toml(toml_content).unwrap(),
            parse_json(json_content).unwrap()
        );
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let result = parse_toml("invalid toml [[[");
        assert!(matches!(
            result.unwrap_err(),
            ContractError::ConfigParse { .. }
        ));
    }

    #[test]
    fn test_parse_json_non_object_top_level() {
        let result = parse_json("[1, 2, 3]");
        assert!(matches!(
            result.unwrap_err(),
            ContractError::ConfigParse { .. }
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("JSON"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
