//
//  moysklad-cli
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod api;
mod auth;
mod config;
mod context;
mod entity;
mod task;

pub use api::ApiCommand;
pub use auth::AuthCommand;
pub use config::ConfigCommand;
pub use context::ContextCommand;
pub use entity::EntityCommand;
pub use task::TaskCommand;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use crate::api::MoySkladClient;
use crate::auth::resolve_credential;
use crate::config::Config;
use crate::output::{OutputFormat, OutputWriter};

/// No credential is configured for the active host.
#[derive(Debug, thiserror::Error)]
#[error("Not authenticated with {host}. Run 'msk auth login' or set MOYSKLAD_TOKEN.")]
pub struct NotAuthenticated {
    pub host: String,
}

/// MoySklad CLI - Work with the MoySklad JSON API from the command line
#[derive(Parser, Debug)]
#[command(
    name = "msk",
    version,
    about = "Work with the MoySklad JSON API from the command line",
    long_about = "msk is a CLI for the MoySklad JSON API 1.2.\n\n\
                  It lists and fetches entities, runs async exports, and makes raw API calls.",
    propagate_version = true,
    after_help = "Use 'msk <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// API host, e.g. api.moysklad.ru or http://127.0.0.1:8080
    #[arg(long, global = true, env = "MSK_HOST")]
    pub host: Option<String>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate with MoySklad
    #[command(visible_alias = "login")]
    Auth(AuthCommand),

    /// List, view and delete entities
    #[command(visible_alias = "e")]
    Entity(EntityCommand),

    /// Run and manage async tasks
    Task(TaskCommand),

    /// Show the current employee and their permissions
    Context(ContextCommand),

    /// Make API requests
    Api(ApiCommand),

    /// Manage CLI configuration
    Config(ConfigCommand),

    /// Print version information
    Version,
}

/// Configuration, host and client shared by the API-facing commands.
pub(crate) struct Session {
    pub config: Config,
    pub host: String,
    pub client: MoySkladClient,
}

impl Session {
    /// Opens a session with whatever credential is available, possibly none.
    pub(crate) fn open(global: &GlobalOptions) -> Result<Self> {
        let config = Config::load()?;
        let host = config.active_host(global.host.as_deref());
        let host_config = config.host_config_or_default(&host);
        let mut client = MoySkladClient::from_config(&host_config, config.timeout())?;
        if let Some(credential) = resolve_credential(&host)? {
            client = client.with_auth(credential);
        }
        tracing::debug!(host = %host, base = %client.base_url(), "Session opened");
        Ok(Self {
            config,
            host,
            client,
        })
    }

    /// Opens a session, failing when no credential is configured.
    pub(crate) fn authenticated(global: &GlobalOptions) -> Result<Self> {
        let session = Self::open(global)?;
        if session.client.auth().is_none() {
            return Err(NotAuthenticated {
                host: session.host,
            }
            .into());
        }
        Ok(session)
    }

    /// Writer honouring `--json` and the configured default format.
    pub(crate) fn writer(&self, global: &GlobalOptions) -> OutputWriter {
        OutputWriter::new(OutputFormat::resolve(
            global.json,
            Some(self.config.core.output.as_str()),
        ))
    }
}

/// Splits `key=value`.
pub(crate) fn split_pair(pair: &str) -> Result<(&str, &str)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("Invalid format: {}. Expected key=value", pair),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_split_pair() {
        assert_eq!(split_pair("limit=10").unwrap(), ("limit", "10"));
        assert_eq!(split_pair("filter=name=a").unwrap(), ("filter", "name=a"));
        assert!(split_pair("=x").is_err());
        assert!(split_pair("novalue").is_err());
    }
}
