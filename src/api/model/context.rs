//
//  moysklad-cli
//  api/model/context.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! The current employee and their permissions (`GET context/employee`).
//!
//! The context is a read-only snapshot. It is fetched on demand through
//! [`MoySkladClient::employee_context`](crate::api::MoySkladClient::employee_context)
//! and never cached; fetch it again to observe permission changes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Employee;

/// Snapshot of the authenticated employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeContext {
    #[serde(flatten)]
    employee: Employee,

    #[serde(default)]
    permissions: Permissions,
}

impl EmployeeContext {
    /// The employee record.
    pub fn employee(&self) -> &Employee {
        &self.employee
    }

    /// The employee's permission tree.
    pub fn permissions(&self) -> &Permissions {
        &self.permissions
    }

    /// Shorthand for [`Permissions::can`].
    pub fn can(&self, entity: &str, action: Action) -> bool {
        self.permissions.can(entity, action)
    }
}

/// Permission tree keyed by entity name (`product`, `retaildemand`, ...)
/// or by flag name (`viewDashboard`, `exportData`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(BTreeMap<String, Permission>);

impl Permissions {
    /// Returns the entry for `name`.
    pub fn get(&self, name: &str) -> Option<&Permission> {
        self.0.get(name)
    }

    /// Returns the per-action permissions of `entity`.
    pub fn entity(&self, entity: &str) -> Option<&EntityPermissions> {
        match self.0.get(entity)? {
            Permission::Entity(permissions) => Some(permissions),
            Permission::Flag(_) => None,
        }
    }

    /// Returns a boolean flag such as `viewDashboard`.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.0.get(name)? {
            Permission::Flag(value) => Some(*value),
            Permission::Entity(_) => None,
        }
    }

    /// Checks whether `action` on `entity` is allowed in any scope.
    ///
    /// Unknown entities and unlisted actions are denied.
    pub fn can(&self, entity: &str, action: Action) -> bool {
        self.entity(entity)
            .and_then(|permissions| permissions.scope(action))
            .is_some_and(Scope::allows)
    }

    /// Iterates over all entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Permission)> {
        self.0.iter().map(|(name, permission)| (name.as_str(), permission))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One entry of the permission tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Permission {
    /// A global on/off flag.
    Flag(bool),
    /// Per-action scopes of an entity.
    Entity(EntityPermissions),
}

/// Scopes granted for each action on an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityPermissions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<Scope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create: Option<Scope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<Scope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Scope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print: Option<Scope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approve: Option<Scope>,
}

impl EntityPermissions {
    /// Scope granted for `action`.
    pub fn scope(&self, action: Action) -> Option<&Scope> {
        match action {
            Action::View => self.view.as_ref(),
            Action::Create => self.create.as_ref(),
            Action::Update => self.update.as_ref(),
            Action::Delete => self.delete.as_ref(),
            Action::Print => self.print.as_ref(),
            Action::Approve => self.approve.as_ref(),
        }
    }
}

/// An action guarded by a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    View,
    Create,
    Update,
    Delete,
    Print,
    Approve,
}

impl Action {
    /// Every action, in display order.
    pub const ALL: [Action; 6] = [
        Action::View,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::Print,
        Action::Approve,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Print => "print",
            Action::Approve => "approve",
        };
        f.write_str(name)
    }
}

/// Which records an action is allowed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Nothing.
    No,
    /// Own records only.
    Own,
    /// Own and shared records.
    OwnShared,
    /// Records of the employee's department.
    Department,
    /// Records of the department and shared records.
    DepartmentShared,
    /// Every record.
    All,
    /// A scope name this client does not know, kept verbatim.
    Unknown(String),
}

impl Scope {
    /// Returns `false` only for [`Scope::No`].
    pub fn allows(&self) -> bool {
        !matches!(self, Scope::No)
    }

    /// Wire name of the scope.
    pub fn as_str(&self) -> &str {
        match self {
            Scope::No => "NO",
            Scope::Own => "OWN",
            Scope::OwnShared => "OWN_SHARED",
            Scope::Department => "DEPARTMENT",
            Scope::DepartmentShared => "DEPARTMENT_SHARED",
            Scope::All => "ALL",
            Scope::Unknown(name) => name,
        }
    }
}

impl From<&str> for Scope {
    fn from(name: &str) -> Self {
        match name {
            "NO" => Scope::No,
            "OWN" => Scope::Own,
            "OWN_SHARED" => Scope::OwnShared,
            "DEPARTMENT" => Scope::Department,
            "DEPARTMENT_SHARED" => Scope::DepartmentShared,
            "ALL" => Scope::All,
            other => Scope::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Scope::from(name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::model::{Field, MetaType};

    const CONTEXT: &str = r#"{
        "meta": {"href": "https://api.moysklad.ru/api/remap/1.2/context/employee", "type": "employee"},
        "id": "e1",
        "name": "Иванов И. И.",
        "uid": "admin@shop",
        "permissions": {
            "product": {"view": "ALL", "create": "OWN", "update": "OWN", "delete": "NO"},
            "retaildemand": {"view": "OWN_SHARED", "print": "ALL", "approve": "SOMETHING_NEW"},
            "viewDashboard": true,
            "exportData": false
        }
    }"#;

    #[test]
    fn test_context_decodes_employee_and_permissions() {
        let context: EmployeeContext = serde_json::from_str(CONTEXT).unwrap();
        assert_eq!(
            context.employee().uid,
            Field::Value("admin@shop".to_string())
        );
        assert_eq!(
            context.employee().meta.value().map(|m| m.kind.clone()),
            Some(MetaType::Employee)
        );
        assert_eq!(context.permissions().len(), 4);
    }

    #[test]
    fn test_can() {
        let context: EmployeeContext = serde_json::from_str(CONTEXT).unwrap();
        let product = MetaType::Product.as_str();

        assert!(context.can(product, Action::View));
        assert!(context.can(product, Action::Create));
        assert!(!context.can(product, Action::Delete));
        assert!(!context.can(product, Action::Print));
        assert!(context.can("retaildemand", Action::Approve));
        assert!(!context.can("counterparty", Action::View));
        assert!(!context.can("viewDashboard", Action::View));
    }

    #[test]
    fn test_flags() {
        let context: EmployeeContext = serde_json::from_str(CONTEXT).unwrap();
        let permissions = context.permissions();
        assert_eq!(permissions.flag("viewDashboard"), Some(true));
        assert_eq!(permissions.flag("exportData"), Some(false));
        assert_eq!(permissions.flag("product"), None);
        assert_eq!(
            permissions.entity("retaildemand").and_then(|p| p.approve.clone()),
            Some(Scope::Unknown("SOMETHING_NEW".to_string()))
        );
    }

    #[test]
    fn test_missing_permissions_is_empty() {
        let json = r#"{"meta": {"href": "https://api.moysklad.ru/api/remap/1.2/context/employee", "type": "employee"}}"#;
        let context: EmployeeContext = serde_json::from_str(json).unwrap();
        assert!(context.permissions().is_empty());
    }
}
