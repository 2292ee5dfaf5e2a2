//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use contracts::RouterConfig;

use crate::cli::InfoArgs;

use super::is_module_key;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    module_configs: Vec<ModuleConfigInfo>,
    paths: Vec<PathInfo>,
}

#[derive(Serialize)]
struct ModuleConfigInfo {
    module: String,
    keys: Vec<String>,
}

#[derive(Serialize)]
struct PathInfo {
    path: String,
    sink_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sinks: Vec<SinkInfo>,
}

#[derive(Serialize)]
struct SinkInfo {
    module: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_ms: Option<u64>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let info = build_config_info(&config, args);

    if args.json {
        let json = serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info, args);
    }

    Ok(())
}

fn build_config_info(config: &RouterConfig, args: &InfoArgs) -> ConfigInfo {
    let mut module_configs = Vec::new();
    let mut paths = Vec::new();

    for (key, value) in config {
        if is_module_key(key) {
            let keys = value
                .as_object()
                .map(|m| m.keys().cloned().collect())
                .unwrap_or_default();
            module_configs.push(ModuleConfigInfo {
                module: key.clone(),
                keys,
            });
            continue;
        }

        let entries = value
            .get("send_to")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let sinks = if args.sinks {
            entries
                .iter()
                .map(|entry| SinkInfo {
                    module: entry
                        .get("module")
                        .and_then(Value::as_str)
                        .unwrap_or("(missing)")
                        .to_string(),
                    timeout_ms: entry.get("timeout_ms").and_then(Value::as_u64),
                })
                .collect()
        } else {
            Vec::new()
        };

        paths.push(PathInfo {
            path: key.clone(),
            sink_count: entries.len(),
            sinks,
        });
    }

    ConfigInfo {
        module_configs,
        paths,
    }
}

fn print_config_info(info: &ConfigInfo, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 datapath Configuration                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("⚙️  Module Configs ({})", info.module_configs.len());
    for (i, module) in info.module_configs.iter().enumerate() {
        let is_last = i == info.module_configs.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        if module.keys.is_empty() {
            println!("   {} {}", prefix, module.module);
        } else {
            println!("   {} {} ({})", prefix, module.module, module.keys.join(", "));
        }
    }

    println!("\n📡 Paths ({})", info.paths.len());
    for (i, path) in info.paths.iter().enumerate() {
        let is_last = i == info.paths.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        println!("   {} {} ({} sinks)", prefix, path.path, path.sink_count);

        if args.sinks && !path.sinks.is_empty() {
            for (j, sink) in path.sinks.iter().enumerate() {
                let sink_is_last = j == path.sinks.len() - 1;
                let sink_prefix = if sink_is_last { "└─" } else { "├─" };
                match sink.timeout_ms {
                    Some(ms) => println!(
                        "   {}  {} {} (timeout {} ms)",
                        child_prefix, sink_prefix, sink.module, ms
                    ),
                    None => println!("   {}  {} {}", child_prefix, sink_prefix, sink.module),
                }
            }
        }
    }

    println!();
}
