//! In-memory employee directory.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;

use smartcare_core::error::AppError;
use smartcare_core::result::AppResult;
use smartcare_core::types::{EmployeeId, RoleId};
use smartcare_entity::employee::EmployeeAccount;

use super::EmployeeDirectory;

/// Employee directory held in a concurrent map, keyed by employee code.
#[derive(Debug, Default)]
pub struct MemoryEmployeeDirectory {
    accounts: DashMap<String, EmployeeAccount>,
}

impl MemoryEmployeeDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account.
    pub fn insert(&self, account: EmployeeAccount) {
        self.accounts.insert(account.id.clone(), account);
    }
}

#[async_trait]
impl EmployeeDirectory for MemoryEmployeeDirectory {
    async fn find(&self, id: &EmployeeId) -> AppResult<Option<EmployeeAccount>> {
        Ok(self.accounts.get(id.as_str()).map(|a| a.value().clone()))
    }

    async fn assign_role(&self, id: &EmployeeId, role_id: Option<RoleId>) -> AppResult<()> {
        let mut account = self
            .accounts
            .get_mut(id.as_str())
            .ok_or_else(|| AppError::not_found(format!("Employee {id} not found")))?;
        account.role_id = role_id;
        info!(employee_id = %id, role_id = ?role_id, "Employee role binding updated");
        Ok(())
    }

    async fn count_bound_to(&self, role_id: RoleId) -> AppResult<u64> {
        Ok(self
            .accounts
            .iter()
            .filter(|a| a.role_id == Some(role_id))
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str, role_id: Option<RoleId>) -> EmployeeAccount {
        EmployeeAccount {
            id: id.to_string(),
            email: format!("{}@example.com", id.to_lowercase()),
            status: true,
            role_id,
        }
    }

    #[tokio::test]
    async fn test_assign_and_count() {
        let dir = MemoryEmployeeDirectory::new();
        dir.insert(account("EMP0001", None));
        dir.insert(account("EMP0002", Some(RoleId(1))));

        dir.assign_role(&"EMP0001".into(), Some(RoleId(1)))
            .await
            .unwrap();
        assert_eq!(dir.count_bound_to(RoleId(1)).await.unwrap(), 2);

        dir.assign_role(&"EMP0002".into(), None).await.unwrap();
        assert_eq!(dir.count_bound_to(RoleId(1)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_assign_unknown_employee_is_not_found() {
        let dir = MemoryEmployeeDirectory::new();
        let err = dir
            .assign_role(&"EMP9999".into(), Some(RoleId(1)))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
