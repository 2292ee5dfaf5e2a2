//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use contracts::RouterConfig;

use crate::cli::ValidateArgs;

use super::is_module_key;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    module_config_count: usize,
    path_count: usize,
    sink_reference_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(summarize(&config)),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

fn send_to_of(value: &Value) -> Option<&Vec<Value>> {
    value.get("send_to").and_then(Value::as_array)
}

fn summarize(config: &RouterConfig) -> ConfigSummary {
    let module_config_count = config.keys().filter(|k| is_module_key(k)).count();
    let path_count = config.len() - module_config_count;
    let sink_reference_count = config
        .iter()
        .filter(|(key, _)| !is_module_key(key))
        .filter_map(|(_, value)| send_to_of(value))
        .map(Vec::len)
        .sum();

    ConfigSummary {
        module_config_count,
        path_count,
        sink_reference_count,
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &RouterConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    for (key, value) in config {
        if is_module_key(key) {
            continue;
        }

        let Some(send_to) = send_to_of(value) else {
            warnings.push(format!("Path '{key}' has no 'send_to' list - fan-out disabled"));
            continue;
        };
        if send_to.is_empty() {
            warnings.push(format!("Path '{key}' has an empty 'send_to' list - fan-out disabled"));
            continue;
        }

        for (index, entry) in send_to.iter().enumerate() {
            match entry.get("module").and_then(Value::as_str) {
                None => warnings.push(format!(
                    "Path '{key}' send_to[{index}] is missing 'module' - entry will be dropped"
                )),
                Some(module) if !is_module_key(module) => warnings.push(format!(
                    "Path '{key}' send_to[{index}] references module '{module}' which is not built in - \
                     it must be registered before the config is applied"
                )),
                Some(_) => {}
            }
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Module configs: {}", summary.module_config_count);
            println!("  Paths: {}", summary.path_count);
            println!("  Sink references: {}", summary.sink_reference_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> RouterConfig {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_summary_counts() {
        let config = config(json!({
            "timer": { "default_interval_ms": 500 },
            "/timer/a": { "send_to": [ { "module": "echo" } ] },
            "/timer/b": { "send_to": [ { "module": "echo" }, { "module": "echo" } ] },
        }));

        let summary = summarize(&config);
        assert_eq!(summary.module_config_count, 1);
        assert_eq!(summary.path_count, 2);
        assert_eq!(summary.sink_reference_count, 3);
    }

    #[test]
    fn test_validate_config_reads_file() {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[\"/timer/t\"]").unwrap();
        writeln!(file, "[[\"/timer/t\".send_to]]").unwrap();
        writeln!(file, "module = \"echo\"").unwrap();

        let args = ValidateArgs {
            config: file.path().to_path_buf(),
            json: false,
        };
        let result = validate_config(&args);
        assert!(result.valid);
        assert_eq!(result.summary.unwrap().path_count, 1);
    }

    #[test]
    fn test_validate_config_missing_file() {
        let args = ValidateArgs {
            config: "/nonexistent/config.toml".into(),
            json: false,
        };
        let result = validate_config(&args);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("File not found"));
    }

    #[test]
    fn test_warnings_for_suspicious_entries() {
        let config = config(json!({
            "/a": {},
            "/b": { "send_to": [] },
            "/c": { "send_to": [ {}, { "module": "kafka" } ] },
        }));

        let warnings = collect_warnings(&config);
        assert_eq!(warnings.len(), 4);
        assert!(warnings.iter().any(|w| w.contains("'/a'")));
        assert!(warnings.iter().any(|w| w.contains("missing 'module'")));
        assert!(warnings.iter().any(|w| w.contains("'kafka'")));
    }
}
