//! Shared test helpers for service integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use smartcare_auth::{Claims, JwtDecoder, PrincipalResolver, RbacEnforcer};
use smartcare_core::config::{AuthConfig, RbacConfig};
use smartcare_core::types::{EmployeeId, RoleId};
use smartcare_database::repositories::{MemoryEmployeeDirectory, MemoryRoleStore, RoleStore};
use smartcare_entity::employee::EmployeeAccount;
use smartcare_entity::permission::PermissionMatrix;
use smartcare_entity::role::Role;
use smartcare_service::{EmployeeRoleService, RequestContext, RoleAdminService};

const TEST_SECRET: &str = "integration-test-secret";

/// Services wired over in-memory stores.
pub struct TestApp {
    pub roles: Arc<MemoryRoleStore>,
    pub employees: Arc<MemoryEmployeeDirectory>,
    pub enforcer: RbacEnforcer,
    pub resolver: PrincipalResolver,
    pub admin: RoleAdminService,
    pub bindings: EmployeeRoleService,
}

impl TestApp {
    pub fn new() -> Self {
        let roles = Arc::new(MemoryRoleStore::new());
        let employees = Arc::new(MemoryEmployeeDirectory::new());
        let enforcer = RbacEnforcer::new(roles.clone());
        let auth = AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            leeway_seconds: 0,
        };
        let resolver = PrincipalResolver::new(JwtDecoder::new(&auth), employees.clone());
        let admin = RoleAdminService::new(
            roles.clone(),
            employees.clone(),
            enforcer.clone(),
            RbacConfig::default(),
        );
        let bindings = EmployeeRoleService::new(employees.clone(), roles.clone(), enforcer.clone());

        Self {
            roles,
            employees,
            enforcer,
            resolver,
            admin,
            bindings,
        }
    }

    /// Inserts a role directly into the store.
    pub async fn seed_role(&self, name: &str, permissions: PermissionMatrix) -> Role {
        self.roles
            .create(name, permissions)
            .await
            .expect("Failed to seed role")
    }

    /// Inserts an active employee bound to `role_id`.
    pub fn add_employee(&self, id: &str, role_id: Option<RoleId>) -> EmployeeId {
        self.employees.insert(EmployeeAccount {
            id: id.to_string(),
            email: format!("{}@smartcare.test", id.to_lowercase()),
            status: true,
            role_id,
        });
        EmployeeId::from(id)
    }

    /// Issues a login token for an employee.
    pub fn login(&self, id: &str) -> String {
        let claims = Claims {
            employee_id: id.to_string(),
            email: format!("{}@smartcare.test", id.to_lowercase()),
            exp: Utc::now().timestamp() + 3600,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("Failed to sign token")
    }

    /// Resolves a request context the way a request handler would.
    pub async fn context_for(&self, id: &str) -> RequestContext {
        let principal = self
            .resolver
            .resolve_token(&self.login(id))
            .await
            .expect("Failed to resolve principal");
        RequestContext::from(principal)
    }
}
