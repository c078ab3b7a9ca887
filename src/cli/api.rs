//
//  moysklad-cli
//  cli/api.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Direct API access command
//!
//! Makes authenticated requests to any endpoint of the JSON API, similar to
//! `gh api`. Useful for endpoints without a dedicated command and for
//! debugging.
//!
//! ## Examples
//!
//! ```bash
//! # Fetch a product
//! msk api entity/product/7944ef04-f831-11e5-7a69-971500188b19
//!
//! # Create a product
//! msk api -X POST entity/product -F name="Pencil" -F vat=20
//!
//! # Filter with query parameters
//! msk api entity/product -q filter=archived=false -q limit=10
//!
//! # Every page of a collection
//! msk api entity/counterparty --paginate
//!
//! # Start an async task and print its locators
//! msk api entity/product --async
//! ```

use std::fs;

use anyhow::{bail, Result};
use clap::Args;
use console::style;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::{Map, Value};

use crate::api::{follow_pages, EntityList, Params, RawResponse, Request};
use crate::output::{select_path, write_json, write_json_compact};

use super::{split_pair, GlobalOptions, Session};

/// Upper bound on pages fetched by `--paginate`.
const MAX_PAGES: usize = 100;

/// Make an authenticated API request
#[derive(Args, Debug)]
pub struct ApiCommand {
    /// Path relative to the API root (e.g. entity/product) or an absolute URL
    pub endpoint: String,

    /// HTTP method
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Add a request header (Name: Value)
    #[arg(long, short = 'H', action = clap::ArgAction::Append)]
    pub header: Vec<String>,

    /// Add a typed body field (key=value; numbers, booleans, null and JSON are parsed)
    #[arg(long, short = 'F', action = clap::ArgAction::Append)]
    pub field: Vec<String>,

    /// Add a string body field (key=value)
    #[arg(long, action = clap::ArgAction::Append)]
    pub raw_field: Vec<String>,

    /// Read the body from a file, or '-' for stdin
    #[arg(long, short = 'f')]
    pub input: Option<String>,

    /// Add a query parameter (key=value); repeatable
    #[arg(long, short = 'q', action = clap::ArgAction::Append)]
    pub param: Vec<String>,

    /// Follow nextHref and print every row
    #[arg(long)]
    pub paginate: bool,

    /// Start the request as an async task and print its locators
    #[arg(long = "async")]
    pub run_async: bool,

    /// Print the response status and headers
    #[arg(long, short = 'i')]
    pub include: bool,

    /// Print nothing on success
    #[arg(long)]
    pub silent: bool,

    /// Print only the value at this dotted path (e.g. .meta.size)
    #[arg(long)]
    pub select: Option<String>,
}

impl ApiCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::authenticated(global)?;
        let method = self.parse_method()?;
        let body = self.build_body()?;
        let params = self.build_params()?;

        if self.run_async {
            return self.execute_async(&session, params, body).await;
        }
        if self.paginate {
            if method != Method::GET {
                bail!("--paginate only works with GET requests");
            }
            return self.execute_paginated(&session, params).await;
        }

        let mut request = self.request(&session, params)?;
        if let Some(body) = &body {
            request = request.with_body(body);
        }

        match request.send(method).await {
            Ok(response) => self.print_response(&response),
            Err(error) => {
                if let Some(response) = error.response() {
                    if !self.silent {
                        self.print_response(response)?;
                    }
                }
                Err(error.into())
            }
        }
    }

    fn request<'s>(&self, session: &'s Session, params: Params) -> Result<Request<'s, Value>> {
        let mut request = if is_absolute(&self.endpoint) {
            session.client.request::<Value>("").with_url(self.endpoint.clone())
        } else {
            session
                .client
                .request::<Value>(self.endpoint.trim_start_matches('/'))
                .with_params(params)
        };
        for (name, value) in self.build_headers()? {
            request = request.header(name, value);
        }
        Ok(request)
    }

    fn parse_method(&self) -> Result<Method> {
        match self.method.to_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            _ => bail!("Unsupported HTTP method: {}", self.method),
        }
    }

    fn build_params(&self) -> Result<Params> {
        let mut params = Params::new();
        for pair in &self.param {
            let (key, value) = split_pair(pair)?;
            params = params.append(key, value);
        }
        Ok(params)
    }

    fn build_body(&self) -> Result<Option<Value>> {
        if let Some(input) = &self.input {
            let content = if input == "-" {
                let mut buffer = String::new();
                std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)?;
                buffer
            } else {
                fs::read_to_string(input)?
            };
            return Ok(Some(serde_json::from_str(&content)?));
        }

        if self.field.is_empty() && self.raw_field.is_empty() {
            return Ok(None);
        }

        let mut body = Map::new();
        for field in &self.field {
            let (key, value) = split_pair(field)?;
            set_nested_value(&mut body, key, parse_typed(value));
        }
        for field in &self.raw_field {
            let (key, value) = split_pair(field)?;
            set_nested_value(&mut body, key, Value::String(value.to_string()));
        }
        Ok(Some(Value::Object(body)))
    }

    fn build_headers(&self) -> Result<Vec<(HeaderName, HeaderValue)>> {
        self.header
            .iter()
            .map(|header| -> Result<(HeaderName, HeaderValue)> {
                let Some((name, value)) = header.split_once(':') else {
                    bail!("Invalid header format: {}. Expected 'Name: Value'", header);
                };
                Ok((
                    HeaderName::from_bytes(name.trim().as_bytes())?,
                    HeaderValue::from_str(value.trim())?,
                ))
            })
            .collect()
    }

    fn print_response(&self, response: &RawResponse) -> Result<()> {
        if self.include {
            println!("{} {}", style("HTTP").dim(), response.status);
            for (name, value) in &response.headers {
                println!("{}: {}", name, value.to_str().unwrap_or(""));
            }
            println!();
        }
        if self.silent || response.body.is_empty() {
            return Ok(());
        }

        match serde_json::from_slice::<Value>(&response.body) {
            Ok(json) => self.print_json(&json),
            Err(_) => {
                println!("{}", response.text());
                Ok(())
            }
        }
    }

    fn print_json(&self, json: &Value) -> Result<()> {
        match &self.select {
            Some(path) => match select_path(json, path) {
                Some(Value::String(s)) => println!("{}", s),
                Some(value) => write_json(value)?,
                None => bail!("Nothing at path '{}'", path),
            },
            None => write_json(json)?,
        }
        Ok(())
    }

    async fn execute_paginated(&self, session: &Session, params: Params) -> Result<()> {
        let response = self.request(session, params)?.send(Method::GET).await?;
        let first: EntityList<Value> = serde_json::from_slice(&response.body)?;

        let scan = follow_pages(&session.client, first, Some(MAX_PAGES)).await?;
        if scan.truncated {
            eprintln!("{} Stopping at {} pages", style("!").yellow(), MAX_PAGES);
        }

        if self.silent {
            return Ok(());
        }
        self.print_json(&Value::Array(scan.rows))
    }

    async fn execute_async(
        &self,
        session: &Session,
        params: Params,
        body: Option<Value>,
    ) -> Result<()> {
        let mut request = self.request(session, params)?;
        if let Some(body) = &body {
            request = request.with_body(body);
        }
        let task = request.run_async().await?;

        if self.silent {
            return Ok(());
        }
        let locators = serde_json::json!({
            "status": task.status_url().as_str(),
            "result": task.result_url().as_str(),
        });
        write_json_compact(&locators)
    }
}

fn is_absolute(endpoint: &str) -> bool {
    endpoint.starts_with("http://") || endpoint.starts_with("https://")
}

/// Parses a `-F` value: booleans, null, numbers and JSON literals become
/// typed values; anything else stays a string.
fn parse_typed(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => {
            if let Ok(n) = raw.parse::<i64>() {
                Value::Number(n.into())
            } else if let Some(n) = raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                Value::Number(n)
            } else if raw.starts_with('[') || raw.starts_with('{') {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
            } else {
                Value::String(raw.to_string())
            }
        }
    }
}

/// Inserts `value` at a dotted key, creating intermediate objects.
fn set_nested_value(obj: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            obj.insert(key.to_string(), value);
        }
        Some((first, rest)) => {
            let nested = obj
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !nested.is_object() {
                *nested = Value::Object(Map::new());
            }
            if let Value::Object(nested) = nested {
                set_nested_value(nested, rest, value);
            }
        }
    }
}
