//! Request context carrying the acting principal.

use serde::Serialize;

use smartcare_auth::Principal;
use smartcare_core::types::{EmployeeId, RoleId};

/// Who is performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Actor {
    /// A logged-in employee, checked against their role.
    Employee {
        /// Acting employee.
        employee_id: EmployeeId,
        /// Role resolved at request time.
        role_id: Option<RoleId>,
    },
    /// A local operator with direct database credentials. Skips role checks.
    Operator,
}

/// Context for the current request.
///
/// Passed into service methods so that every operation knows who is acting.
/// Outside this crate a context can only come from a resolved employee;
/// the operator context needs the `operator` feature.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub(crate) actor: Actor,
}

impl RequestContext {
    /// Context for an employee acting with `role_id`.
    pub fn employee(employee_id: EmployeeId, role_id: Option<RoleId>) -> Self {
        Self {
            actor: Actor::Employee {
                employee_id,
                role_id,
            },
        }
    }

    /// Context for a local operator.
    #[cfg(any(test, feature = "operator"))]
    pub fn operator() -> Self {
        Self {
            actor: Actor::Operator,
        }
    }

    /// The acting principal.
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// The acting employee, if any.
    pub fn employee_id(&self) -> Option<&EmployeeId> {
        match &self.actor {
            Actor::Employee { employee_id, .. } => Some(employee_id),
            Actor::Operator => None,
        }
    }

    /// The role the actor is bound to, if any.
    pub fn role_id(&self) -> Option<RoleId> {
        match &self.actor {
            Actor::Employee { role_id, .. } => *role_id,
            Actor::Operator => None,
        }
    }
}

impl From<Principal> for RequestContext {
    fn from(principal: Principal) -> Self {
        Self::employee(principal.employee_id, principal.role_id)
    }
}
