//! Binding employees to roles.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use smartcare_auth::RbacEnforcer;
use smartcare_core::error::AppError;
use smartcare_core::result::AppResult;
use smartcare_core::types::{EmployeeId, RoleId};
use smartcare_database::repositories::{EmployeeDirectory, RoleStore};
use smartcare_entity::employee::EmployeeAccount;
use smartcare_entity::permission::{Action, Module};
use smartcare_entity::role::Role;

use crate::context::{Actor, RequestContext};

/// An employee together with the role their binding points at.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeRoleView {
    /// The account.
    pub account: EmployeeAccount,
    /// The bound role, `None` when unbound or dangling.
    pub role: Option<Role>,
}

/// Reads and changes which role an employee acts with.
#[derive(Clone)]
pub struct EmployeeRoleService {
    employees: Arc<dyn EmployeeDirectory>,
    roles: Arc<dyn RoleStore>,
    rbac: RbacEnforcer,
}

impl std::fmt::Debug for EmployeeRoleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmployeeRoleService").finish_non_exhaustive()
    }
}

impl EmployeeRoleService {
    /// Creates a new employee role service.
    pub fn new(
        employees: Arc<dyn EmployeeDirectory>,
        roles: Arc<dyn RoleStore>,
        rbac: RbacEnforcer,
    ) -> Self {
        Self {
            employees,
            roles,
            rbac,
        }
    }

    async fn authorize(&self, ctx: &RequestContext, action: Action) -> AppResult<()> {
        match &ctx.actor {
            Actor::Operator => Ok(()),
            Actor::Employee { role_id, .. } => {
                self.rbac.require(*role_id, Module::Employees, action).await
            }
        }
    }

    /// Shows an employee and their bound role.
    pub async fn show(&self, ctx: &RequestContext, id: &EmployeeId) -> AppResult<EmployeeRoleView> {
        self.authorize(ctx, Action::View).await?;

        let account = self
            .employees
            .find(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Employee {id} not found")))?;

        let role = match account.role_id {
            Some(role_id) => match self.roles.get(role_id).await {
                Ok(role) => Some(role),
                Err(e) if e.is_not_found() => None,
                Err(e) => return Err(e),
            },
            None => None,
        };

        Ok(EmployeeRoleView { account, role })
    }

    /// Binds `role_id` to an employee, or unbinds with `None`.
    ///
    /// New bindings must point at an existing role.
    pub async fn assign(
        &self,
        ctx: &RequestContext,
        id: &EmployeeId,
        role_id: Option<RoleId>,
    ) -> AppResult<()> {
        self.authorize(ctx, Action::Update).await?;

        if let Some(role_id) = role_id {
            self.roles.get(role_id).await?;
        }
        self.employees.assign_role(id, role_id).await?;

        info!(actor = ?ctx.actor, employee_id = %id, role_id = ?role_id, "Employee role assigned");
        Ok(())
    }
}
