//! Role entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use smartcare_core::error::AppError;
use smartcare_core::result::AppResult;
use smartcare_core::types::RoleId;

use crate::permission::{Action, Module, PermissionMatrix};

/// A named bundle of permissions assignable to employee accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    /// Store-assigned identifier.
    pub id: RoleId,
    /// Display name, trimmed and non-empty.
    pub name: String,
    /// The role's permission matrix.
    pub permissions: PermissionMatrix,
    /// Incremented by every successful update.
    pub revision: i64,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
    /// When the role was last replaced.
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Whether the role grants `action` on `module`.
    pub fn allows(&self, module: Module, action: Action) -> bool {
        self.permissions.normalize().get(module, action)
    }
}

/// A validated name and normalized matrix, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRole {
    name: String,
    permissions: PermissionMatrix,
}

impl NewRole {
    /// Trim and validate `name`, normalize `permissions`.
    pub fn new(name: &str, permissions: PermissionMatrix) -> AppResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Role name must not be empty"));
        }
        Ok(Self {
            name: name.to_string(),
            permissions: permissions.normalize(),
        })
    }

    /// The trimmed name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The normalized matrix.
    pub fn permissions(&self) -> &PermissionMatrix {
        &self.permissions
    }

    /// Split into name and matrix.
    pub fn into_parts(self) -> (String, PermissionMatrix) {
        (self.name, self.permissions)
    }
}
