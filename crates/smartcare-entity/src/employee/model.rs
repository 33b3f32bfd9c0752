//! Employee account fields relevant to authorization.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use smartcare_core::types::RoleId;

/// The slice of an `employees` row that access control reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct EmployeeAccount {
    /// Employee code.
    pub id: String,
    /// Login email.
    pub email: String,
    /// Whether the account may log in.
    pub status: bool,
    /// Bound role. May point at a role that no longer exists.
    pub role_id: Option<RoleId>,
}

impl EmployeeAccount {
    /// The role this account acts with, if any.
    ///
    /// Disabled accounts act with no role at all.
    pub fn effective_role(&self) -> Option<RoleId> {
        if self.status { self.role_id } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_account_has_no_effective_role() {
        let mut account = EmployeeAccount {
            id: "EMP0001".into(),
            email: "somchai@example.com".into(),
            status: true,
            role_id: Some(RoleId(3)),
        };
        assert_eq!(account.effective_role(), Some(RoleId(3)));
        account.status = false;
        assert_eq!(account.effective_role(), None);
    }
}
