//! 配置校验模块
//!
//! 校验规则：
//! - 顶层键非空
//! - 顶层值均为映射 (模块配置或路径配置)
//! - `send_to` 为映射数组
//! - send_to 条目中的 `module` 为字符串
//! - send_to 条目中的 `timeout_ms` 为非负整数
//!
//! `send_to` 条目是否指向已注册模块由路由器决定：无法解析的条目
//! 会被记录错误并丢弃，而不是使整个配置失败。

use contracts::{ContractError, RouterConfig};
use serde_json::Value;

/// 校验路由器配置的形状
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &RouterConfig) -> Result<(), ContractError> {
    for (key, value) in config {
        validate_key(key)?;
        validate_entry(key, value)?;
    }
    Ok(())
}

/// 顶层键名要么是模块名要么是路径名，均不能为空
fn validate_key(key: &str) -> Result<(), ContractError> {
    if key.trim().is_empty() {
        return Err(ContractError::config_validation(
            "<top level>",
            "empty module/path name",
        ));
    }
    Ok(())
}

/// 模块配置与路径配置都必须是映射
fn validate_entry(key: &str, value: &Value) -> Result<(), ContractError> {
    let Some(entry) = value.as_object() else {
        return Err(ContractError::config_validation(
            key,
            format!("expected a mapping, got {value}"),
        ));
    };

    if let Some(send_to) = entry.get("send_to") {
        validate_send_to(key, send_to)?;
    }
    Ok(())
}

/// `send_to` 必须是 sink 条目映射的数组
fn validate_send_to(key: &str, send_to: &Value) -> Result<(), ContractError> {
    let Some(entries) = send_to.as_array() else {
        return Err(ContractError::config_validation(
            format!("{key}.send_to"),
            "expected an array",
        ));
    };

    for (index, entry) in entries.iter().enumerate() {
        let Some(fields) = entry.as_object() else {
            return Err(ContractError::config_validation(
                format!("{key}.send_to[{index}]"),
                "expected a mapping",
            ));
        };

        if let Some(module) = fields.get("module") {
            if !module.is_string() {
                return Err(ContractError::config_validation(
                    format!("{key}.send_to[{index}].module"),
                    format!("expected a string, got {module}"),
                ));
            }
        }

        if let Some(timeout) = fields.get("timeout_ms") {
            if !timeout.is_u64() {
                return Err(ContractError::config_validation(
                    format!("{key}.send_to[{index}].timeout_ms"),
                    format!("expected a non-negative integer, got {timeout}"),
                ));
            }
        }
    }

    Ok(())
}
