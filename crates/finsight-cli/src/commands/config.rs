//! Configuration display command

use std::path::Path;

use anyhow::{Context, Result};
use finsight_core::{default_config_path, EngineConfig};

use super::print_json;

pub fn cmd_config(config: Option<&Path>, json: bool) -> Result<()> {
    let effective = EngineConfig::load(config).context("Failed to load engine configuration")?;

    if json {
        return print_json(&effective);
    }

    let override_path = default_config_path();
    let source = match (config, &override_path) {
        (Some(path), _) => format!("{} (--config)", path.display()),
        (None, Some(path)) if path.exists() => format!("{} (override)", path.display()),
        _ => "built-in defaults".to_string(),
    };

    println!();
    println!("⚙️  Engine Configuration");
    println!("   Source: {}", source);
    if let Some(path) = &override_path {
        println!("   Override path: {}", path.display());
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!();
    let toml = toml::to_string_pretty(&effective).context("Failed to render configuration")?;
    println!("{}", toml);
    Ok(())
}
