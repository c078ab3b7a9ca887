//
//  moysklad-cli
//  cli/entity.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Entity commands
//!
//! Generic list/view/delete over any entity collection, addressed by its
//! kind (`product`, `counterparty`, `retaildemand`, ...). Rows are handled
//! as untyped JSON so every kind works the same way.

use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;

use crate::api::model::MetaType;
use crate::api::{follow_pages, EntityList, FilterOp, Params, SortDir};
use crate::output::{
    format_cell, print_field, print_header, truncate, OutputWriter, TableBuilder, TableOutput,
};

use super::{GlobalOptions, Session};

#[derive(Args, Debug)]
pub struct EntityCommand {
    #[command(subcommand)]
    pub command: EntitySubcommand,
}

#[derive(Subcommand, Debug)]
pub enum EntitySubcommand {
    /// List entities of a kind
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show one entity
    #[command(visible_alias = "view")]
    Get(GetArgs),

    /// Delete one entity
    #[command(visible_alias = "rm")]
    Delete(DeleteArgs),

    /// List known entity kinds
    Kinds,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Entity kind, e.g. product
    pub kind: String,

    /// Page size (max 1000)
    #[arg(long, short = 'l', default_value = "25")]
    pub limit: u32,

    /// Rows to skip
    #[arg(long)]
    pub offset: Option<u32>,

    /// Full-text search
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Filter clause such as name=Pencil or updated>=2024-01-01; repeatable
    #[arg(long, short = 'f', action = clap::ArgAction::Append)]
    pub filter: Vec<String>,

    /// Sort as field or field,desc; repeatable
    #[arg(long, short = 'o', action = clap::ArgAction::Append)]
    pub order: Vec<String>,

    /// Inline a referenced entity; repeatable
    #[arg(long, short = 'e', action = clap::ArgAction::Append)]
    pub expand: Vec<String>,

    /// Follow nextHref through every page
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Entity kind, e.g. product
    pub kind: String,

    /// Entity id
    pub id: String,

    /// Inline a referenced entity; repeatable
    #[arg(long, short = 'e', action = clap::ArgAction::Append)]
    pub expand: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Entity kind, e.g. product
    pub kind: String,

    /// Entity id
    pub id: String,
}

/// One row of a listing.
#[derive(Debug, Serialize)]
struct EntityRow {
    id: String,
    name: String,
    code: String,
    updated: String,
}

impl EntityRow {
    fn from_json(row: &Value) -> Self {
        Self {
            id: format_cell(row.get("id")),
            name: format_cell(row.get("name")),
            code: format_cell(row.get("code").or_else(|| row.get("externalCode"))),
            updated: format_cell(row.get("updated")),
        }
    }
}

/// A single entity shown as aligned fields.
#[derive(Debug, Serialize)]
#[serde(transparent)]
struct EntityDetail(Value);

impl TableOutput for EntityDetail {
    fn print_table(&self, color: bool) {
        let title = self
            .0
            .get("name")
            .and_then(Value::as_str)
            .or_else(|| self.0.get("id").and_then(Value::as_str))
            .unwrap_or("(unnamed)");
        print_header(title);

        let Some(fields) = self.0.as_object() else {
            return;
        };
        for (key, value) in fields {
            let shown = match value {
                Value::Object(map) => match map.get("meta").and_then(|m| m.get("href")) {
                    Some(href) => format_cell(Some(href)),
                    None => "{...}".to_string(),
                },
                Value::Array(items) => format!("[{} item(s)]", items.len()),
                scalar => format_cell(Some(scalar)),
            };
            print_field(key, &truncate(&shown, 80), color);
        }
    }
}

impl EntityCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            EntitySubcommand::List(args) => list(args, global).await,
            EntitySubcommand::Get(args) => get(args, global).await,
            EntitySubcommand::Delete(args) => delete(args, global).await,
            EntitySubcommand::Kinds => {
                for kind in MetaType::ALL {
                    println!("{}", kind.as_str());
                }
                Ok(())
            }
        }
    }
}

/// Collection path of `kind`, rejecting unknown kinds.
fn entity_path(kind: &str) -> Result<String> {
    let kind = MetaType::from_str(&kind.to_lowercase())
        .with_context(|| "Run 'msk entity kinds' to see the known kinds")?;
    Ok(format!("entity/{}", kind.as_str()))
}

/// Builds the query of `entity list`.
fn list_params(args: &ListArgs) -> Result<Params> {
    let mut params = Params::new().limit(args.limit);
    if let Some(offset) = args.offset {
        params = params.offset(offset);
    }
    if let Some(search) = &args.search {
        params = params.search(search.as_str());
    }
    for clause in &args.filter {
        let Some((field, op, value)) = FilterOp::split_clause(clause) else {
            bail!("Invalid filter '{}'. Expected <field><op><value>, e.g. name=Pencil", clause);
        };
        params = params.filter(field, op, value);
    }
    for order in &args.order {
        let (field, dir) = match order.split_once(',') {
            Some((field, "desc")) => (field, SortDir::Desc),
            Some((field, "asc")) => (field, SortDir::Asc),
            Some((_, other)) => bail!("Invalid sort direction '{}'. Use asc or desc", other),
            None => (order.as_str(), SortDir::Asc),
        };
        params = params.order(field, dir);
    }
    for field in &args.expand {
        params = params.expand(field);
    }
    Ok(params)
}

async fn list(args: &ListArgs, global: &GlobalOptions) -> Result<()> {
    let path = entity_path(&args.kind)?;
    let params = list_params(args)?;
    let session = Session::authenticated(global)?;
    let writer = session.writer(global);

    let page = session
        .client
        .request::<EntityList<Value>>(path)
        .with_params(params)
        .get()
        .await?
        .into_data();

    if args.all {
        let scan = follow_pages(&session.client, page, None).await?;
        return print_rows(&writer, &scan.rows, scan.total, scan.truncated);
    }
    print_rows(&writer, &page.rows, page.total(), page.has_next())
}

fn print_rows(
    writer: &OutputWriter,
    rows: &[Value],
    total: Option<u64>,
    more: bool,
) -> Result<()> {
    if writer.is_json() {
        return crate::output::write_json(rows);
    }
    if rows.is_empty() {
        println!("No entities found.");
        return Ok(());
    }

    let items: Vec<EntityRow> = rows.iter().map(EntityRow::from_json).collect();
    TableBuilder::new()
        .color(writer.color_enabled())
        .headers(["ID", "NAME", "CODE", "UPDATED"])
        .rows(
            items
                .iter()
                .map(|r| [r.id.clone(), truncate(&r.name, 40), r.code.clone(), r.updated.clone()]),
        )
        .print();

    match total {
        Some(total) => println!("Showing {} of {} row(s)", items.len(), total),
        None => println!("Showing {} row(s)", items.len()),
    }
    if more {
        writer.write_info("More rows available; use --all or --offset");
    }
    Ok(())
}

async fn get(args: &GetArgs, global: &GlobalOptions) -> Result<()> {
    let path = entity_path(&args.kind)?;
    let params = args
        .expand
        .iter()
        .fold(Params::new(), |params, field| params.expand(field));
    let session = Session::authenticated(global)?;

    let entity = session
        .client
        .request::<Value>(path)
        .with_path(&args.id)
        .with_params(params)
        .get()
        .await?
        .into_data();

    session.writer(global).write(&EntityDetail(entity))
}

async fn delete(args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
    let path = entity_path(&args.kind)?;
    let session = Session::authenticated(global)?;

    let deleted = session
        .client
        .request::<()>(path)
        .with_path(&args.id)
        .delete()
        .await?
        .data;

    let writer = session.writer(global);
    if writer.is_json() {
        return crate::output::write_json(&serde_json::json!({
            "kind": args.kind,
            "id": args.id,
            "deleted": deleted,
        }));
    }
    writer.write_success(&format!("Deleted {} {}", args.kind, args.id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list_args(kind: &str) -> ListArgs {
        ListArgs {
            kind: kind.to_string(),
            limit: 25,
            offset: None,
            search: None,
            filter: Vec::new(),
            order: Vec::new(),
            expand: Vec::new(),
            all: false,
        }
    }

    #[test]
    fn test_entity_path() {
        assert_eq!(entity_path("product").unwrap(), "entity/product");
        assert_eq!(entity_path("RetailDemand").unwrap(), "entity/retaildemand");
        assert!(entity_path("spaceship").is_err());
    }

    #[test]
    fn test_list_params() {
        let mut args = list_args("product");
        args.limit = 5000;
        args.filter = vec!["archived=false".into(), "name~pen".into()];
        args.order = vec!["name,desc".into(), "code".into()];
        args.expand = vec!["supplier".into()];

        let params = list_params(&args).unwrap();
        assert_eq!(params.get("limit"), Some("1000"));
        assert_eq!(params.get("filter"), Some("archived=false;name~pen"));
        assert_eq!(params.get("order"), Some("name,desc;code,asc"));
        assert_eq!(params.get("expand"), Some("supplier"));
    }

    #[test]
    fn test_list_params_rejects_bad_input() {
        let mut args = list_args("product");
        args.filter = vec!["archived".into()];
        assert!(list_params(&args).is_err());

        let mut args = list_args("product");
        args.order = vec!["name,sideways".into()];
        assert!(list_params(&args).is_err());
    }

    #[test]
    fn test_entity_row_falls_back_to_external_code() {
        let row = EntityRow::from_json(&json!({
            "id": "a1",
            "name": "Pencil",
            "externalCode": "ext-1"
        }));
        assert_eq!(row.code, "ext-1");
        assert_eq!(row.updated, "-");
    }
}
