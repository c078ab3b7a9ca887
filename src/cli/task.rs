//
//  moysklad-cli
//  cli/task.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Async task commands
//!
//! Starts server-side exports and follows them through their status and
//! result locators. Locators printed by `msk task export` can be fed back
//! into `status`, `result` and `cancel` from another shell.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;

use crate::api::model::MetaType;
use crate::api::{AsyncTask, EntityList, Params, TaskState, TaskStatus};
use crate::output::{format_state, print_field, print_header, write_json, TableOutput};

use super::{GlobalOptions, Session};

/// Upper bound on polls made by `--wait`.
const MAX_POLLS: u32 = 720;

#[derive(Args, Debug)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub command: TaskSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TaskSubcommand {
    /// Start an async export of an entity collection
    Export(ExportArgs),

    /// Show the status of a task
    Status(LocatorArgs),

    /// Fetch the result of a finished task
    Result(LocatorArgs),

    /// Cancel a running task
    Cancel(LocatorArgs),
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Entity kind, e.g. product
    pub kind: String,

    /// Filter clause passed through as is (e.g. archived=false)
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Poll until the task finishes and print the result
    #[arg(long, short = 'w')]
    pub wait: bool,

    /// Seconds between polls with --wait
    #[arg(long, default_value = "5")]
    pub interval: u64,
}

#[derive(Args, Debug)]
pub struct LocatorArgs {
    /// Locator URL (absolute, or relative to the API root)
    pub url: String,
}

/// Locators of a started task.
#[derive(Debug, Serialize)]
struct TaskLocators {
    status: String,
    result: String,
}

impl TableOutput for TaskLocators {
    fn print_table(&self, color: bool) {
        print_header("Async task started");
        print_field("Status", &self.status, color);
        print_field("Result", &self.result, color);
        println!();
        println!("Check it with: msk task status {}", self.status);
    }
}

impl TableOutput for TaskStatus {
    fn print_table(&self, color: bool) {
        print_field("State", &format_state(self.state.as_str(), color), color);
        if let Some(kind) = &self.request_type {
            print_field("Request", kind, color);
        }
        for error in self.errors.iter().flatten() {
            print_field("Error", &error.to_string(), color);
        }
    }
}

impl TaskCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            TaskSubcommand::Export(args) => export(args, global).await,
            TaskSubcommand::Status(args) => status(args, global).await,
            TaskSubcommand::Result(args) => result(args, global).await,
            TaskSubcommand::Cancel(args) => cancel(args, global).await,
        }
    }
}

/// Rebuilds a task handle from a locator given on the command line.
fn task_at(session: &Session, url: &str) -> Result<AsyncTask<Value>> {
    let url = session
        .client
        .resolve_url(url)
        .with_context(|| format!("Invalid locator '{}'", url))?;
    Ok(AsyncTask::from_locators(session.client.clone(), url.clone(), url))
}

async fn export(args: &ExportArgs, global: &GlobalOptions) -> Result<()> {
    let kind = MetaType::from_str(&args.kind.to_lowercase())
        .with_context(|| "Run 'msk entity kinds' to see the known kinds")?;
    let session = Session::authenticated(global)?;
    let writer = session.writer(global);

    let params = match &args.filter {
        Some(filter) => Params::new().set("filter", filter.as_str()),
        None => Params::new(),
    };
    let task = session
        .client
        .request::<EntityList<Value>>(format!("entity/{}", kind.as_str()))
        .with_params(params)
        .run_async()
        .await?;

    if !args.wait {
        return writer.write(&TaskLocators {
            status: task.status_url().to_string(),
            result: task.result_url().to_string(),
        });
    }

    let interval = Duration::from_secs(args.interval.max(1));
    let mut polls = 0;
    let status = loop {
        let status = task.status().await?;
        tracing::debug!(state = %status.state, "Polled async task");
        if status.state.is_terminal() {
            break status;
        }
        polls += 1;
        if polls >= MAX_POLLS {
            bail!(
                "Task still {} after {} polls; check later with: msk task status {}",
                status.state,
                polls,
                task.status_url()
            );
        }
        tokio::time::sleep(interval).await;
    };

    if status.state != TaskState::Done {
        writer.write(&status)?;
        bail!("Task finished in state {}", status.state);
    }

    let page = task.result().await?.into_data();
    if writer.is_json() {
        write_json(&page)
    } else {
        println!("Exported {} row(s) from {}", page.len(), task.result_url());
        Ok(())
    }
}

async fn status(args: &LocatorArgs, global: &GlobalOptions) -> Result<()> {
    let session = Session::authenticated(global)?;
    let status = task_at(&session, &args.url)?.status().await?;
    session.writer(global).write(&status)
}

async fn result(args: &LocatorArgs, global: &GlobalOptions) -> Result<()> {
    let session = Session::authenticated(global)?;
    let result = task_at(&session, &args.url)?.result().await?.into_data();
    write_json(&result)
}

async fn cancel(args: &LocatorArgs, global: &GlobalOptions) -> Result<()> {
    let session = Session::authenticated(global)?;
    let writer = session.writer(global);

    if !task_at(&session, &args.url)?.cancel().await? {
        bail!("The server did not confirm cancellation of {}", args.url);
    }
    writer.write_success("Task cancelled");
    Ok(())
}
