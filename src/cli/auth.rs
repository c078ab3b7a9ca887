//
//  moysklad-cli
//  cli/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Authentication commands for the MoySklad CLI.
//!
//! Credentials are verified against the server before they are stored in
//! the system keyring. Secrets are only ever read from stdin so that they
//! stay out of shell history.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::api::MoySkladClient;
use crate::auth::{
    credential_from_env, read_secret_from_stdin, validate_token, verify_credential,
    AuthCredential, KeyringStore,
};
use crate::config::Config;

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Store a credential for a host
    Login(LoginArgs),

    /// Remove stored credentials
    Logout(LogoutArgs),

    /// Show authentication status
    Status(StatusArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Read an access token from stdin
    #[arg(long, conflicts_with = "login")]
    pub with_token: bool,

    /// Login (user@account) for Basic credentials; the password is read from stdin
    #[arg(long, short = 'u')]
    pub login: Option<String>,

    /// Exchange the login and password for an access token before storing
    #[arg(long, requires = "login")]
    pub exchange: bool,

    /// Store the credential without checking it against the server
    #[arg(long)]
    pub skip_verify: bool,
}

#[derive(Args, Debug)]
pub struct LogoutArgs {
    /// Log out of every configured host
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Do not contact the server
    #[arg(long)]
    pub offline: bool,
}

impl AuthCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AuthSubcommand::Login(args) => login(args, global).await,
            AuthSubcommand::Logout(args) => logout(args, global).await,
            AuthSubcommand::Status(args) => status(args, global).await,
        }
    }
}

fn client_for(config: &Config, host: &str) -> Result<MoySkladClient> {
    Ok(MoySkladClient::from_config(
        &config.host_config_or_default(host),
        config.timeout(),
    )?)
}

async fn login(args: &LoginArgs, global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load()?;
    let host = config.active_host(global.host.as_deref());

    let mut credential = if args.with_token {
        eprintln!("Paste your access token:");
        let token = read_secret_from_stdin()?;
        if !validate_token(&token) {
            bail!("Invalid token format");
        }
        AuthCredential::bearer(token)
    } else if let Some(login) = &args.login {
        eprintln!("Password for {}:", login);
        let password = read_secret_from_stdin()?;
        if password.is_empty() {
            bail!("Empty password");
        }
        AuthCredential::basic(login.clone(), password)
    } else {
        bail!("Specify --with-token or --login <user@account>");
    };

    if args.exchange {
        let client = client_for(&config, &host)?.with_auth(credential);
        let issued = client.issue_token().await?.into_data();
        credential = AuthCredential::bearer(issued.access_token);
        println!("{} Exchanged password for an access token", style("✓").green());
    }

    let mut login = credential.login().map(str::to_string);
    if !args.skip_verify {
        let client = client_for(&config, &host)?.with_auth(credential.clone());
        let Some(context) = verify_credential(&client).await? else {
            bail!("{} rejected the credential", host);
        };
        login = context.employee().uid.value().cloned().or(login);
    }

    KeyringStore::new().store_credential(&host, &credential)?;

    let mut host_config = config.host_config_or_default(&host);
    host_config.login = login.clone().or(host_config.login);
    config.upsert_host(host_config);
    config.save()?;

    match login {
        Some(login) => println!("Logged in to {} as {}", host, style(login).bold()),
        None => println!("Logged in to {}", host),
    }
    Ok(())
}

async fn logout(args: &LogoutArgs, global: &GlobalOptions) -> Result<()> {
    let keyring = KeyringStore::new();
    let mut config = Config::load()?;

    let hosts: Vec<String> = if args.all {
        config.hosts.keys().cloned().collect()
    } else {
        vec![config.active_host(global.host.as_deref())]
    };
    if hosts.is_empty() {
        println!("Not logged in to any hosts");
        return Ok(());
    }

    for host in &hosts {
        keyring.delete(host)?;
        config.hosts.remove(host);
    }
    config.save()?;

    if hosts.len() == 1 {
        println!("Logged out of {}", hosts[0]);
    } else {
        println!("Logged out of {} host(s)", hosts.len());
    }
    Ok(())
}

async fn status(args: &StatusArgs, global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;
    let host = config.active_host(global.host.as_deref());

    let (credential, source) = match credential_from_env(|name| std::env::var(name).ok()) {
        Some(credential) => (Some(credential), "environment"),
        None => (KeyringStore::new().get_credential(&host)?, "keyring"),
    };

    println!("{}", style(&host).bold());
    let Some(credential) = credential else {
        println!("  Not logged in");
        println!();
        println!("Run 'msk auth login' to authenticate");
        return Ok(());
    };

    println!("  Credential: {} (from {})", credential.kind(), source);
    if let Some(login) = config.host_config(&host).and_then(|h| h.login.as_deref()) {
        println!("  Login:      {}", login);
    }
    if args.offline {
        return Ok(());
    }

    let client = client_for(&config, &host)?.with_auth(credential);
    match verify_credential(&client).await? {
        Some(context) => {
            let name = context.employee().name.value().cloned().unwrap_or_default();
            println!("  Status:     {} ({})", style("Active").green(), name);
        }
        None => println!("  Status:     {}", style("Rejected").red()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::config::HostConfig;
    use clap::Parser;

    #[test]
    fn test_exchange_requires_login() {
        assert!(Cli::try_parse_from(["msk", "auth", "login", "--exchange"]).is_err());
        assert!(
            Cli::try_parse_from(["msk", "auth", "login", "--login", "a@b", "--exchange"]).is_ok()
        );
    }

    #[test]
    fn test_token_and_login_conflict() {
        assert!(
            Cli::try_parse_from(["msk", "auth", "login", "--with-token", "--login", "a@b"]).is_err()
        );
    }

    #[test]
    fn test_host_config_default_is_public_api() {
        let config = HostConfig::new("api.moysklad.ru");
        assert_eq!(config.base_url(), "https://api.moysklad.ru/api/remap/1.2");
    }
}
