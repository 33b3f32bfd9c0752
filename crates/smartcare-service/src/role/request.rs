//! Incoming role payloads.

use serde::{Deserialize, Serialize};

use smartcare_core::config::RbacConfig;
use smartcare_core::error::AppError;
use smartcare_core::result::AppResult;
use smartcare_entity::permission::{PermissionMatrix, RawPermissions};

/// Body of a create or replace request, as sent by the permissions screen.
///
/// `permissions` may be partial; absent modules and flags are false.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleRequest {
    /// Role display name.
    #[serde(default)]
    pub name: String,
    /// Module to flags map.
    #[serde(default)]
    pub permissions: RawPermissions,
    /// Revision the client last read. Replace fails on mismatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,
}

impl RoleRequest {
    /// Builds a request from an already typed matrix.
    pub fn new(name: impl Into<String>, permissions: &PermissionMatrix) -> Self {
        Self {
            name: name.into(),
            permissions: permissions.to_raw(),
            revision: None,
        }
    }

    /// Sets the expected revision.
    pub fn with_revision(mut self, revision: i64) -> Self {
        self.revision = Some(revision);
        self
    }

    /// Checks the payload and returns the trimmed name and normalized matrix.
    pub(crate) fn validate(&self, limits: &RbacConfig) -> AppResult<(String, PermissionMatrix)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Role name must not be empty"));
        }
        if name.chars().count() > limits.max_role_name_length {
            return Err(AppError::validation(format!(
                "Role name must be at most {} characters",
                limits.max_role_name_length
            )));
        }

        let permissions = PermissionMatrix::try_from_raw(self.permissions.clone())?;
        Ok((name.to_string(), permissions.normalize()))
    }
}
