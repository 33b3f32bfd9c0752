//! Role administration: list, read, create, replace, and delete roles.

use std::sync::Arc;

use tracing::{info, warn};

use smartcare_auth::RbacEnforcer;
use smartcare_core::config::RbacConfig;
use smartcare_core::result::AppResult;
use smartcare_core::types::RoleId;
use smartcare_database::repositories::{EmployeeDirectory, RoleStore};
use smartcare_entity::permission::{Action, Module};
use smartcare_entity::role::Role;

use super::request::RoleRequest;
use crate::context::{Actor, RequestContext};

/// Backs the permissions screen of the admin panel.
///
/// Every call is checked against the `permissions` module of the caller's
/// role before the store is touched.
#[derive(Clone)]
pub struct RoleAdminService {
    roles: Arc<dyn RoleStore>,
    employees: Arc<dyn EmployeeDirectory>,
    rbac: RbacEnforcer,
    limits: RbacConfig,
}

impl std::fmt::Debug for RoleAdminService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleAdminService")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl RoleAdminService {
    /// Creates a new role administration service.
    pub fn new(
        roles: Arc<dyn RoleStore>,
        employees: Arc<dyn EmployeeDirectory>,
        rbac: RbacEnforcer,
        limits: RbacConfig,
    ) -> Self {
        Self {
            roles,
            employees,
            rbac,
            limits,
        }
    }

    async fn authorize(&self, ctx: &RequestContext, action: Action) -> AppResult<()> {
        match &ctx.actor {
            Actor::Operator => Ok(()),
            Actor::Employee { role_id, .. } => {
                self.rbac.require(*role_id, Module::Permissions, action).await
            }
        }
    }

    /// Lists all roles in creation order.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<Role>> {
        self.authorize(ctx, Action::View).await?;
        self.roles.list().await
    }

    /// Gets a single role.
    pub async fn get(&self, ctx: &RequestContext, id: RoleId) -> AppResult<Role> {
        self.authorize(ctx, Action::View).await?;
        self.roles.get(id).await
    }

    /// Creates a role from a possibly partial matrix.
    pub async fn create(&self, ctx: &RequestContext, req: RoleRequest) -> AppResult<Role> {
        self.authorize(ctx, Action::Create).await?;
        let (name, permissions) = req.validate(&self.limits)?;

        let role = self.roles.create(&name, permissions).await?;
        info!(
            actor = ?ctx.actor,
            role_id = %role.id,
            grants = %role.permissions.summary(),
            "Role created by admin"
        );
        Ok(role)
    }

    /// Replaces a role's name and whole matrix.
    ///
    /// Modules absent from the request end up with every flag false; the
    /// previous matrix is not merged in.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: RoleId,
        req: RoleRequest,
    ) -> AppResult<Role> {
        self.authorize(ctx, Action::Update).await?;
        let (name, permissions) = req.validate(&self.limits)?;

        let role = self
            .roles
            .update(id, &name, permissions, req.revision)
            .await?;
        info!(
            actor = ?ctx.actor,
            role_id = %role.id,
            revision = role.revision,
            grants = %role.permissions.summary(),
            "Role replaced by admin"
        );
        Ok(role)
    }

    /// Deletes a role.
    ///
    /// Employees bound to it keep the dangling id and lose every permission.
    pub async fn delete(&self, ctx: &RequestContext, id: RoleId) -> AppResult<()> {
        self.authorize(ctx, Action::Delete).await?;

        self.roles.delete(id).await?;

        match self.employees.count_bound_to(id).await {
            Ok(0) => {}
            Ok(bound) => warn!(
                role_id = %id,
                bound,
                "Deleted role is still bound to employees; they now have no permissions"
            ),
            Err(e) => warn!(role_id = %id, error = %e, "Could not count employees bound to deleted role"),
        }
        if ctx.role_id() == Some(id) {
            warn!(
                role_id = %id,
                employee_id = ?ctx.employee_id(),
                "Employee deleted the role they act with"
            );
        }

        info!(actor = ?ctx.actor, role_id = %id, "Role deleted by admin");
        Ok(())
    }
}
