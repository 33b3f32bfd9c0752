//! The employee-to-role binding.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use smartcare_core::result::AppResult;
use smartcare_core::types::{EmployeeId, RoleId};
use smartcare_entity::employee::EmployeeAccount;

pub use memory::MemoryEmployeeDirectory;
pub use postgres::PgEmployeeDirectory;

/// Lookup and assignment of the role an employee account acts with.
///
/// The directory does not check that a bound role exists; a dangling
/// binding is resolved to "no permissions" by the caller.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync + 'static {
    /// The account, or `None` if no such employee exists.
    async fn find(&self, id: &EmployeeId) -> AppResult<Option<EmployeeAccount>>;

    /// Bind (or with `None`, unbind) a role. `NotFound` if the employee is absent.
    async fn assign_role(&self, id: &EmployeeId, role_id: Option<RoleId>) -> AppResult<()>;

    /// Number of accounts currently bound to `role_id`.
    async fn count_bound_to(&self, role_id: RoleId) -> AppResult<u64>;
}
