//! PostgreSQL role store (`permission_roles` table).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::{info, warn};

use smartcare_core::error::AppError;
use smartcare_core::result::AppResult;
use smartcare_core::types::RoleId;
use smartcare_entity::permission::PermissionMatrix;
use smartcare_entity::role::{NewRole, Role};

use super::RoleStore;
use crate::connection::classify_sqlx_error;

const ROLE_COLUMNS: &str = "id, name, permissions, revision, created_at, updated_at";

/// A `permission_roles` row before the matrix is decoded.
///
/// `permissions` is read as an untyped document so that a legacy `null` or
/// a malformed flag degrades to "not granted" instead of failing the query.
#[derive(Debug, FromRow)]
struct RoleRow {
    id: RoleId,
    name: String,
    permissions: Json<Value>,
    revision: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RoleRow {
    fn into_role(self) -> Role {
        let (matrix, skipped) = PermissionMatrix::from_stored(&self.permissions.0);
        if !skipped.is_empty() {
            warn!(
                role_id = %self.id,
                skipped = ?skipped,
                "Stored permissions contain entries this build cannot read; treating them as not granted"
            );
        }
        Role {
            id: self.id,
            name: self.name,
            permissions: matrix.normalize(),
            revision: self.revision,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Role store over PostgreSQL.
///
/// Each write is a single statement, so a row is replaced atomically.
#[derive(Debug, Clone)]
pub struct PgRoleStore {
    pool: PgPool,
}

impl PgRoleStore {
    /// Create a new role store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: RoleId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM permission_roles WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify_sqlx_error("Failed to check role", e))
    }
}

#[async_trait]
impl RoleStore for PgRoleStore {
    async fn list(&self) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM permission_roles ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify_sqlx_error("Failed to list roles", e))?;

        Ok(rows.into_iter().map(RoleRow::into_role).collect())
    }

    async fn get(&self, id: RoleId) -> AppResult<Role> {
        sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM permission_roles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify_sqlx_error("Failed to find role", e))?
        .map(RoleRow::into_role)
        .ok_or_else(|| AppError::not_found(format!("Role {id} not found")))
    }

    async fn create(&self, name: &str, permissions: PermissionMatrix) -> AppResult<Role> {
        let role = NewRole::new(name, permissions)?;

        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "INSERT INTO permission_roles (name, permissions) VALUES ($1, $2) \
             RETURNING {ROLE_COLUMNS}"
        ))
        .bind(role.name())
        .bind(Json(role.permissions().to_raw()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_sqlx_error("Failed to create role", e))?;

        info!(role_id = %row.id, name = %row.name, "Role created");
        Ok(row.into_role())
    }

    async fn update(
        &self,
        id: RoleId,
        name: &str,
        permissions: PermissionMatrix,
        expected_revision: Option<i64>,
    ) -> AppResult<Role> {
        let role = NewRole::new(name, permissions)?;

        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "UPDATE permission_roles \
             SET name = $2, permissions = $3, revision = revision + 1, updated_at = NOW() \
             WHERE id = $1 AND ($4::BIGINT IS NULL OR revision = $4) \
             RETURNING {ROLE_COLUMNS}"
        ))
        .bind(id)
        .bind(role.name())
        .bind(Json(role.permissions().to_raw()))
        .bind(expected_revision)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify_sqlx_error("Failed to update role", e))?;

        match row {
            Some(row) => {
                info!(role_id = %id, revision = row.revision, "Role replaced");
                Ok(row.into_role())
            }
            None if expected_revision.is_some() && self.exists(id).await? => {
                Err(AppError::conflict(format!(
                    "Role {id} was modified concurrently (expected revision {})",
                    expected_revision.unwrap_or_default()
                )))
            }
            None => Err(AppError::not_found(format!("Role {id} not found"))),
        }
    }

    async fn delete(&self, id: RoleId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM permission_roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| classify_sqlx_error("Failed to delete role", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Role {id} not found")));
        }

        info!(role_id = %id, "Role deleted");
        Ok(())
    }
}
