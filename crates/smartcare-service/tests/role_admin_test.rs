//! Integration tests for role administration and authorization.

mod helpers;

use std::sync::Arc;

use smartcare_core::error::ErrorKind;
use smartcare_core::types::RoleId;
use smartcare_database::repositories::RoleStore;
use smartcare_entity::permission::{Action, Module, PermissionMatrix};
use smartcare_service::{RequestContext, RoleRequest};

async fn app_with_admin() -> (helpers::TestApp, RequestContext) {
    let app = helpers::TestApp::new();
    let admin_role = app.seed_role("ผู้ดูแลระบบ", PermissionMatrix::full()).await;
    app.add_employee("EMP0001", Some(admin_role.id));
    let ctx = app.context_for("EMP0001").await;
    (app, ctx)
}

#[tokio::test]
async fn test_created_role_grants_only_requested_flags() {
    let (app, admin) = app_with_admin().await;

    let staff = app
        .admin
        .create(
            &admin,
            RoleRequest::new(
                "พนักงาน",
                &PermissionMatrix::new().with(Module::Customers, Action::View, true),
            ),
        )
        .await
        .unwrap();
    app.add_employee("EMP0002", Some(staff.id));
    let staff_ctx = app.context_for("EMP0002").await;

    assert!(
        app.enforcer
            .authorize(staff_ctx.role_id(), Module::Customers, Action::View)
            .await
    );
    assert!(
        !app.enforcer
            .authorize(staff_ctx.role_id(), Module::Customers, Action::Delete)
            .await
    );
    assert!(
        !app.enforcer
            .authorize(staff_ctx.role_id(), Module::Employees, Action::View)
            .await
    );
}

#[tokio::test]
async fn test_update_is_full_replace() {
    let (app, admin) = app_with_admin().await;
    let staff = app
        .seed_role(
            "พนักงาน",
            PermissionMatrix::new().with(Module::Customers, Action::View, true),
        )
        .await;

    let request: RoleRequest = serde_json::from_value(serde_json::json!({
        "name": "พนักงาน",
        "permissions": { "positions": { "view": true } }
    }))
    .unwrap();
    let updated = app.admin.update(&admin, staff.id, request).await.unwrap();

    assert!(!updated.permissions.get(Module::Customers, Action::View));
    assert!(updated.permissions.get(Module::Positions, Action::View));
    assert!(updated.permissions.is_normalized());
    assert!(!app.enforcer.authorize(Some(staff.id), Module::Customers, Action::View).await);
}

#[tokio::test]
async fn test_nonexistent_role_denies_and_is_not_found() {
    let (app, admin) = app_with_admin().await;

    assert!(!app.enforcer.authorize(Some(RoleId(999)), Module::Customers, Action::View).await);
    let err = app.admin.get(&admin, RoleId(999)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_missing_permission_is_rejected_before_store() {
    let (app, _) = app_with_admin().await;
    let viewer = app
        .seed_role(
            "ผู้ตรวจสอบ",
            PermissionMatrix::new().with(Module::Permissions, Action::View, true),
        )
        .await;
    app.add_employee("EMP0003", Some(viewer.id));
    let ctx = app.context_for("EMP0003").await;

    assert_eq!(app.admin.list(&ctx).await.unwrap().len(), 2);

    let err = app
        .admin
        .create(&ctx, RoleRequest::new("แอบสร้าง", &PermissionMatrix::full()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert_eq!(app.roles.len(), 2);

    let err = app.admin.delete(&ctx, viewer.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_unbound_employee_cannot_list() {
    let (app, _) = app_with_admin().await;
    app.add_employee("EMP0004", None);
    let ctx = app.context_for("EMP0004").await;

    let err = app.admin.list(&ctx).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_invalid_payloads_are_validation_errors() {
    let (app, admin) = app_with_admin().await;

    let err = app
        .admin
        .create(&admin, RoleRequest::new("   ", &PermissionMatrix::new()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = app
        .admin
        .create(&admin, RoleRequest::new("x".repeat(101), &PermissionMatrix::new()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let unknown: RoleRequest = serde_json::from_value(serde_json::json!({
        "name": "บัญชี",
        "permissions": { "invoices": { "view": true } }
    }))
    .unwrap();
    let err = app.admin.create(&admin, unknown).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_stale_revision_conflicts() {
    let (app, admin) = app_with_admin().await;
    let role = app.seed_role("พนักงาน", PermissionMatrix::new()).await;

    let first = RoleRequest::new("พนักงาน v2", &PermissionMatrix::new()).with_revision(role.revision);
    app.admin.update(&admin, role.id, first).await.unwrap();

    let stale = RoleRequest::new("พนักงาน v3", &PermissionMatrix::new()).with_revision(role.revision);
    let err = app.admin.update(&admin, role.id, stale).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_deleting_bound_role_revokes_access() {
    let (app, admin) = app_with_admin().await;
    let staff = app
        .seed_role("พนักงาน", PermissionMatrix::new().with(Module::Customers, Action::View, true))
        .await;
    app.add_employee("EMP0005", Some(staff.id));

    app.admin.delete(&admin, staff.id).await.unwrap();

    let ctx = app.context_for("EMP0005").await;
    assert_eq!(ctx.role_id(), Some(staff.id));
    for module in Module::ALL {
        for action in Action::ALL {
            assert!(!app.enforcer.authorize(ctx.role_id(), module, action).await);
        }
    }
}

#[tokio::test]
async fn test_admin_may_delete_own_role() {
    let (app, admin) = app_with_admin().await;
    let own = admin.role_id().unwrap();

    app.admin.delete(&admin, own).await.unwrap();

    let err = app.admin.list(&admin).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_update_and_delete_converge() {
    let (app, admin) = app_with_admin().await;
    let app = Arc::new(app);

    for _ in 0..20 {
        let id = app.seed_role("ชั่วคราว", PermissionMatrix::new()).await.id;

        let updater = {
            let app = Arc::clone(&app);
            let admin = admin.clone();
            tokio::spawn(async move {
                app.admin
                    .update(&admin, id, RoleRequest::new("ชั่วคราว", &PermissionMatrix::full()))
                    .await
            })
        };
        let deleter = {
            let app = Arc::clone(&app);
            let admin = admin.clone();
            tokio::spawn(async move { app.admin.delete(&admin, id).await })
        };

        let updated = updater.await.unwrap();
        deleter.await.unwrap().unwrap();

        if let Err(e) = updated {
            assert_eq!(e.kind, ErrorKind::NotFound);
        }
        assert!(app.roles.get(id).await.unwrap_err().is_not_found());
    }
}
