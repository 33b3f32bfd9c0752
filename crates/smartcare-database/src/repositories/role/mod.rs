//! Role persistence.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use smartcare_core::result::AppResult;
use smartcare_core::types::RoleId;
use smartcare_entity::permission::PermissionMatrix;
use smartcare_entity::role::Role;

pub use memory::MemoryRoleStore;
pub use postgres::PgRoleStore;

/// CRUD over roles keyed by id.
///
/// Implementations validate names (trimmed, non-empty) and normalize the
/// matrix before storing it. Writes to one id are serialized; a record is
/// never observed half-written.
#[async_trait]
pub trait RoleStore: Send + Sync + 'static {
    /// All roles in creation order.
    async fn list(&self) -> AppResult<Vec<Role>>;

    /// One role, or `NotFound`.
    async fn get(&self, id: RoleId) -> AppResult<Role>;

    /// Insert a role and assign it a new id.
    async fn create(&self, name: &str, permissions: PermissionMatrix) -> AppResult<Role>;

    /// Replace a role's name and matrix.
    ///
    /// With `expected_revision`, fails with `Conflict` when the stored
    /// revision differs.
    async fn update(
        &self,
        id: RoleId,
        name: &str,
        permissions: PermissionMatrix,
        expected_revision: Option<i64>,
    ) -> AppResult<Role>;

    /// Remove a role. Employees still bound to it are left untouched.
    async fn delete(&self, id: RoleId) -> AppResult<()>;
}
