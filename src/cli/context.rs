//
//  moysklad-cli
//  cli/context.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Employee context command
//!
//! Shows who the credential belongs to and what they may do.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::api::model::{Action, EmployeeContext, Permission};
use crate::output::{format_bool, format_state, print_field, print_header, TableBuilder, TableOutput};

use super::{GlobalOptions, Session};

#[derive(Args, Debug)]
pub struct ContextCommand {
    /// Also list per-entity permissions
    #[arg(long, short = 'p')]
    pub permissions: bool,

    /// Only show permissions of entities whose name contains this text
    #[arg(long, short = 'e')]
    pub entity: Option<String>,
}

/// What `msk context` prints.
#[derive(Debug, Serialize)]
#[serde(transparent)]
struct ContextView {
    #[serde(skip)]
    show_permissions: bool,
    #[serde(skip)]
    entity: Option<String>,
    context: EmployeeContext,
}

impl ContextView {
    fn matches(&self, name: &str) -> bool {
        self.entity
            .as_deref()
            .map_or(true, |needle| name.to_lowercase().contains(&needle.to_lowercase()))
    }
}

impl TableOutput for ContextView {
    fn print_table(&self, color: bool) {
        let employee = self.context.employee();
        let name = employee.name.value().map(String::as_str).unwrap_or("(unnamed)");
        print_header(name);
        if let Some(uid) = employee.uid.value() {
            print_field("Login", uid, color);
        }
        if let Some(email) = employee.email.value() {
            print_field("E-mail", email, color);
        }
        if let Some(position) = employee.position.value() {
            print_field("Position", position, color);
        }
        print_field(
            "Permissions",
            &format!("{} entr(ies)", self.context.permissions().len()),
            color,
        );

        if !self.show_permissions && self.entity.is_none() {
            return;
        }

        let mut entities = TableBuilder::new()
            .color(color)
            .headers(["ENTITY", "VIEW", "CREATE", "UPDATE", "DELETE", "PRINT", "APPROVE"]);
        let mut flags = Vec::new();
        for (name, permission) in self.context.permissions().iter() {
            if !self.matches(name) {
                continue;
            }
            match permission {
                Permission::Entity(scopes) => {
                    let mut row = vec![name.to_string()];
                    row.extend(Action::ALL.iter().map(|action| {
                        scopes
                            .scope(*action)
                            .map(|scope| format_state(scope.as_str(), color))
                            .unwrap_or_else(|| "-".to_string())
                    }));
                    entities = entities.row(row);
                }
                Permission::Flag(enabled) => flags.push((name, *enabled)),
            }
        }

        println!();
        entities.print();
        for (name, enabled) in flags {
            print_field(name, &format_bool(enabled, color), color);
        }
    }
}

impl ContextCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::authenticated(global)?;
        let context = session.client.employee_context().await?.into_data();

        session.writer(global).write(&ContextView {
            show_permissions: self.permissions,
            entity: self.entity.clone(),
            context,
        })
    }
}
