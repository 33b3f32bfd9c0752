//! In-memory role store for tests and single-process tooling.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, info};

use smartcare_core::error::AppError;
use smartcare_core::result::AppResult;
use smartcare_core::types::RoleId;
use smartcare_entity::permission::PermissionMatrix;
use smartcare_entity::role::{NewRole, Role};

use super::RoleStore;

/// Role store backed by a sharded concurrent map.
///
/// Updates and deletes run under the entry's shard lock, so writers to the
/// same id are serialized while other ids proceed in parallel.
#[derive(Debug)]
pub struct MemoryRoleStore {
    roles: DashMap<RoleId, Role>,
    next_id: AtomicI64,
}

impl MemoryRoleStore {
    /// Creates an empty store. The first role gets id 1.
    pub fn new() -> Self {
        Self {
            roles: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether the store holds no roles.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl Default for MemoryRoleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn list(&self) -> AppResult<Vec<Role>> {
        let mut roles: Vec<Role> = self.roles.iter().map(|r| r.value().clone()).collect();
        roles.sort_by_key(|r| r.id);
        Ok(roles)
    }

    async fn get(&self, id: RoleId) -> AppResult<Role> {
        self.roles
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Role {id} not found")))
    }

    async fn create(&self, name: &str, permissions: PermissionMatrix) -> AppResult<Role> {
        let (name, permissions) = NewRole::new(name, permissions)?.into_parts();
        let id = RoleId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let now = Utc::now();
        let role = Role {
            id,
            name,
            permissions,
            revision: 1,
            created_at: now,
            updated_at: now,
        };
        self.roles.insert(id, role.clone());

        info!(role_id = %id, name = %role.name, "Role created");
        Ok(role)
    }

    async fn update(
        &self,
        id: RoleId,
        name: &str,
        permissions: PermissionMatrix,
        expected_revision: Option<i64>,
    ) -> AppResult<Role> {
        let (name, permissions) = NewRole::new(name, permissions)?.into_parts();

        let mut entry = self
            .roles
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Role {id} not found")))?;

        if let Some(expected) = expected_revision {
            if entry.revision != expected {
                debug!(
                    role_id = %id,
                    expected,
                    actual = entry.revision,
                    "Role revision mismatch"
                );
                return Err(AppError::conflict(format!(
                    "Role {id} was modified concurrently (expected revision {expected}, found {})",
                    entry.revision
                )));
            }
        }

        let role = entry.value_mut();
        role.name = name;
        role.permissions = permissions;
        role.revision += 1;
        role.updated_at = Utc::now();
        let updated = role.clone();
        drop(entry);

        info!(role_id = %id, revision = updated.revision, "Role replaced");
        Ok(updated)
    }

    async fn delete(&self, id: RoleId) -> AppResult<()> {
        match self.roles.remove(&id) {
            Some(_) => {
                info!(role_id = %id, "Role deleted");
                Ok(())
            }
            None => Err(AppError::not_found(format!("Role {id} not found"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use smartcare_core::error::ErrorKind;
    use smartcare_entity::permission::{Action, Module};

    fn viewer() -> PermissionMatrix {
        PermissionMatrix::new().with(Module::Customers, Action::View, true)
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = MemoryRoleStore::new();
        let a = store.create("ผู้จัดการ", viewer()).await.unwrap();
        let b = store.create("พนักงาน", viewer()).await.unwrap();
        assert!(a.id < b.id);
        assert_eq!(a.revision, 1);
        assert!(a.permissions.is_normalized());
    }

    #[tokio::test]
    async fn test_list_is_in_creation_order() {
        let store = MemoryRoleStore::new();
        for name in ["zeta", "alpha", "mid"] {
            store.create(name, viewer()).await.unwrap();
        }
        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[tokio::test]
    async fn test_duplicate_names_are_allowed() {
        let store = MemoryRoleStore::new();
        store.create("พนักงาน", viewer()).await.unwrap();
        store.create("พนักงาน", viewer()).await.unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let store = MemoryRoleStore::new();
        let err = store.create("   ", viewer()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_whole_matrix() {
        let store = MemoryRoleStore::new();
        let role = store.create("staff", viewer()).await.unwrap();

        let replacement = PermissionMatrix::new()
            .with(Module::Positions, Action::View, true)
            .with(Module::Positions, Action::Create, true);
        let updated = store
            .update(role.id, "staff", replacement, None)
            .await
            .unwrap();

        assert!(!updated.permissions.get(Module::Customers, Action::View));
        assert!(updated.permissions.get(Module::Positions, Action::Create));
        assert_eq!(updated.revision, 2);
    }

    #[tokio::test]
    async fn test_update_missing_role_is_not_found() {
        let store = MemoryRoleStore::new();
        let err = store
            .update(RoleId(99), "ghost", viewer(), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_with_stale_revision_conflicts() {
        let store = MemoryRoleStore::new();
        let role = store.create("staff", viewer()).await.unwrap();
        store
            .update(role.id, "staff v2", viewer(), Some(1))
            .await
            .unwrap();

        let err = store
            .update(role.id, "staff v3", viewer(), Some(1))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(store.get(role.id).await.unwrap().name, "staff v2");
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let store = MemoryRoleStore::new();
        let role = store.create("temp", viewer()).await.unwrap();
        store.delete(role.id).await.unwrap();
        assert!(store.get(role.id).await.unwrap_err().is_not_found());
        assert!(store.delete(role.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_update_and_delete_converge() {
        for _ in 0..50 {
            let store = Arc::new(MemoryRoleStore::new());
            let id = store.create("staff", viewer()).await.unwrap().id;

            let replacement = PermissionMatrix::full();
            let updater = {
                let store = Arc::clone(&store);
                let replacement = replacement.clone();
                tokio::spawn(async move { store.update(id, "admin", replacement, None).await })
            };
            let deleter = {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.delete(id).await })
            };

            let update_result = updater.await.unwrap();
            deleter.await.unwrap().unwrap();

            if let Ok(updated) = update_result {
                assert_eq!(updated.name, "admin");
                assert_eq!(updated.permissions, replacement);
            }
            assert!(store.get(id).await.unwrap_err().is_not_found());
        }
    }
}
