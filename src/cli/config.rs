//
//  moysklad-cli
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI configuration commands
//!
//! Get, set and list the `[core]` settings and show where the file lives.
//! Per-host entries are written by `msk auth login` and shown by `list`.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::config::{Config, CONFIG_KEYS};

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print a setting
    Get(GetArgs),

    /// Change a setting
    Set(SetArgs),

    /// List every setting
    #[command(visible_alias = "ls")]
    List,

    /// Print the path of the configuration file
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// One of: host, timeout, output
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// One of: host, timeout, output
    pub key: String,

    /// New value
    pub value: String,
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => get(args, global),
            ConfigSubcommand::Set(args) => set(args, global),
            ConfigSubcommand::List => list(global),
            ConfigSubcommand::Path => path(global),
        }
    }
}

fn check_key(key: &str) -> Result<()> {
    if !CONFIG_KEYS.contains(&key) {
        bail!(
            "Unknown configuration key '{}'. Valid keys: {}",
            key,
            CONFIG_KEYS.join(", ")
        );
    }
    Ok(())
}

fn get(args: &GetArgs, global: &GlobalOptions) -> Result<()> {
    check_key(&args.key)?;
    let config = Config::load()?;
    let value = config.get(&args.key);

    if global.json {
        let result = serde_json::json!({ "key": args.key, "value": value });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if let Some(v) = value {
        println!("{}", v);
    }
    Ok(())
}

fn set(args: &SetArgs, global: &GlobalOptions) -> Result<()> {
    check_key(&args.key)?;
    let mut config = Config::load()?;
    config.set(&args.key, args.value.clone())?;
    config.save()?;

    let stored = config.get(&args.key).unwrap_or_default();
    if global.json {
        let result = serde_json::json!({ "success": true, "key": args.key, "value": stored });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "{} Set {} = {}",
            style("✓").green(),
            style(&args.key).cyan(),
            stored
        );
    }
    Ok(())
}

fn list(global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;

    if global.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", style("Core Configuration").bold());
    println!("{}", "-".repeat(50));
    for key in CONFIG_KEYS {
        let value = config.get(key).unwrap_or_else(|| "(not set)".to_string());
        println!("  {}: {}", key, value);
    }

    if !config.hosts.is_empty() {
        println!();
        println!("{}", style("Host Configuration").bold());
        println!("{}", "-".repeat(50));
        for (host, host_config) in &config.hosts {
            println!("  {}", style(host).cyan().bold());
            if let Some(login) = &host_config.login {
                println!("    login: {}", login);
            }
            if let Some(version) = &host_config.api_version {
                println!("    api_version: {}", version);
            }
            println!("    base_url: {}", host_config.base_url());
        }
    }
    Ok(())
}

fn path(global: &GlobalOptions) -> Result<()> {
    let path = Config::config_path()?;
    if global.json {
        let result = serde_json::json!({ "path": path, "exists": path.is_file() });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_key() {
        assert!(check_key("timeout").is_ok());
        assert!(check_key("editor").is_err());
    }
}
