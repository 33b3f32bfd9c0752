//! JWT claims carried by admin-panel bearer tokens.

use serde::{Deserialize, Serialize};

use smartcare_core::types::EmployeeId;

/// Claims payload of an access token issued at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Employee code of the logged-in account.
    pub employee_id: String,
    /// Login email at the time of issuance.
    pub email: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the employee this token was issued to.
    pub fn employee(&self) -> EmployeeId {
        EmployeeId::new(self.employee_id.clone())
    }
}
