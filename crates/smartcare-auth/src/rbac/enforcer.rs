//! RBAC enforcement logic: checks a role's matrix for a (module, action) pair.

use std::sync::Arc;

use tracing::{debug, warn};

use smartcare_core::error::AppError;
use smartcare_core::result::AppResult;
use smartcare_core::types::RoleId;
use smartcare_database::repositories::RoleStore;
use smartcare_entity::permission::{Action, Module};
use smartcare_entity::role::Role;

/// Answers "may this role do that?" against the role store.
///
/// Every failure mode denies: no role bound, role deleted, store
/// unreachable, or a module/action name this build does not know. The
/// enforcer only reads from the store.
#[derive(Clone)]
pub struct RbacEnforcer {
    roles: Arc<dyn RoleStore>,
}

impl std::fmt::Debug for RbacEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RbacEnforcer").finish_non_exhaustive()
    }
}

impl RbacEnforcer {
    /// Creates an enforcer reading roles from `roles`.
    pub fn new(roles: Arc<dyn RoleStore>) -> Self {
        Self { roles }
    }

    /// Checks an already loaded role.
    pub fn role_allows(role: &Role, module: Module, action: Action) -> bool {
        role.allows(module, action)
    }

    /// Checks whether the role with `role_id` may perform `action` on `module`.
    pub async fn authorize(&self, role_id: Option<RoleId>, module: Module, action: Action) -> bool {
        let Some(role_id) = role_id else {
            debug!(%module, %action, "No role bound to principal, denying");
            return false;
        };

        match self.roles.get(role_id).await {
            Ok(role) => {
                let allowed = Self::role_allows(&role, module, action);
                debug!(role_id = %role_id, %module, %action, allowed, "Authorization check");
                allowed
            }
            Err(e) if e.is_not_found() => {
                debug!(role_id = %role_id, %module, %action, "Role no longer exists, denying");
                false
            }
            Err(e) => {
                warn!(
                    role_id = %role_id,
                    %module,
                    %action,
                    error = %e,
                    "Role lookup failed, denying"
                );
                false
            }
        }
    }

    /// String-keyed entry point for callers holding unparsed identifiers.
    ///
    /// A module or action outside the known set is a caller bug or stale
    /// configuration; it is logged and denied.
    pub async fn authorize_raw(&self, role_ref: Option<&str>, module: &str, action: &str) -> bool {
        let Ok(parsed_module) = module.parse::<Module>() else {
            warn!(module, action, "Authorization requested for unknown module, denying");
            return false;
        };
        let Ok(parsed_action) = action.parse::<Action>() else {
            warn!(module, action, "Authorization requested for unknown action, denying");
            return false;
        };

        let role_id = match role_ref {
            None => None,
            Some(raw) => match raw.parse::<RoleId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    debug!(role_ref = raw, "Unparseable role id, denying");
                    return false;
                }
            },
        };

        self.authorize(role_id, parsed_module, parsed_action).await
    }

    /// Like [`authorize`](Self::authorize) but returns an `Authorization`
    /// error on denial, for use with `?`.
    pub async fn require(
        &self,
        role_id: Option<RoleId>,
        module: Module,
        action: Action,
    ) -> AppResult<()> {
        if self.authorize(role_id, module, action).await {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Missing permission '{module}:{action}'"
            )))
        }
    }
}
