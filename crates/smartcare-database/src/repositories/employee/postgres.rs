//! PostgreSQL employee directory (`employees.role_id`).

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use smartcare_core::error::AppError;
use smartcare_core::result::AppResult;
use smartcare_core::types::{EmployeeId, RoleId};
use smartcare_entity::employee::EmployeeAccount;

use super::EmployeeDirectory;
use crate::connection::classify_sqlx_error;

/// Reads and writes the role binding on the existing `employees` table.
#[derive(Debug, Clone)]
pub struct PgEmployeeDirectory {
    pool: PgPool,
}

impl PgEmployeeDirectory {
    /// Create a new employee directory.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeDirectory for PgEmployeeDirectory {
    async fn find(&self, id: &EmployeeId) -> AppResult<Option<EmployeeAccount>> {
        sqlx::query_as::<_, EmployeeAccount>(
            "SELECT id, email, status, role_id FROM employees WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify_sqlx_error("Failed to find employee", e))
    }

    async fn assign_role(&self, id: &EmployeeId, role_id: Option<RoleId>) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE employees SET role_id = $2, updated_at = NOW() WHERE id = $1")
                .bind(id.as_str())
                .bind(role_id)
                .execute(&self.pool)
                .await
                .map_err(|e| classify_sqlx_error("Failed to assign role", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Employee {id} not found")));
        }

        info!(employee_id = %id, role_id = ?role_id, "Employee role binding updated");
        Ok(())
    }

    async fn count_bound_to(&self, role_id: RoleId) -> AppResult<u64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE role_id = $1")
            .bind(role_id)
            .fetch_one(&self.pool)
            .await
            .map(|n| n.max(0) as u64)
            .map_err(|e| classify_sqlx_error("Failed to count role bindings", e))
    }
}
