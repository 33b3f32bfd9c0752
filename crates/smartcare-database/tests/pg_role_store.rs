//! PostgreSQL role store tests.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -p smartcare-database -- --ignored`.

use smartcare_core::config::DatabaseConfig;
use smartcare_core::error::ErrorKind;
use smartcare_database::repositories::{PgRoleStore, RoleStore};
use smartcare_database::{DatabasePool, migration};
use smartcare_entity::permission::{Action, Module, PermissionMatrix};

async fn store() -> PgRoleStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let config = DatabaseConfig {
        url,
        max_connections: 2,
        min_connections: 1,
        connect_timeout_seconds: 5,
        idle_timeout_seconds: 60,
    };
    let pool = DatabasePool::connect(&config)
        .await
        .expect("connect")
        .pool()
        .clone();
    migration::run_migrations(&pool).await.expect("migrate");
    PgRoleStore::new(pool)
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_role_lifecycle() {
    let store = store().await;

    let created = store
        .create(
            "พนักงาน",
            PermissionMatrix::new().with(Module::Customers, Action::View, true),
        )
        .await
        .expect("create");
    assert!(created.permissions.is_normalized());
    assert!(created.permissions.get(Module::Customers, Action::View));

    let replaced = store
        .update(
            created.id,
            "พนักงาน",
            PermissionMatrix::new().with(Module::Positions, Action::Create, true),
            Some(created.revision),
        )
        .await
        .expect("update");
    assert!(!replaced.permissions.get(Module::Customers, Action::View));
    assert_eq!(replaced.revision, created.revision + 1);

    let stale = store
        .update(created.id, "x", PermissionMatrix::new(), Some(created.revision))
        .await
        .unwrap_err();
    assert_eq!(stale.kind, ErrorKind::Conflict);

    store.delete(created.id).await.expect("delete");
    assert!(store.get(created.id).await.unwrap_err().is_not_found());
}
