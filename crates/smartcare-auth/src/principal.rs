//! Resolves who is acting and which role they act with.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use smartcare_core::error::AppError;
use smartcare_core::result::AppResult;
use smartcare_core::types::{EmployeeId, RoleId};
use smartcare_database::repositories::EmployeeDirectory;

use crate::jwt::JwtDecoder;

/// The authenticated employee behind a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// Acting employee.
    pub employee_id: EmployeeId,
    /// Role the employee acts with. `None` means no permissions.
    pub role_id: Option<RoleId>,
}

/// Turns bearer tokens or employee ids into a [`Principal`].
///
/// A dangling role binding is passed through as-is; the enforcer turns it
/// into "no permissions" so the employee can still log in.
#[derive(Clone)]
pub struct PrincipalResolver {
    decoder: JwtDecoder,
    employees: Arc<dyn EmployeeDirectory>,
}

impl std::fmt::Debug for PrincipalResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrincipalResolver")
            .field("decoder", &self.decoder)
            .finish_non_exhaustive()
    }
}

impl PrincipalResolver {
    /// Creates a resolver.
    pub fn new(decoder: JwtDecoder, employees: Arc<dyn EmployeeDirectory>) -> Self {
        Self { decoder, employees }
    }

    /// Verifies `token` and resolves the employee it was issued to.
    ///
    /// Fails with `Authentication` when the token is invalid or names an
    /// unknown employee.
    pub async fn resolve_token(&self, token: &str) -> AppResult<Principal> {
        let claims = self.decoder.decode(token)?;
        let employee_id = claims.employee();

        let account = self.employees.find(&employee_id).await?;
        let Some(account) = account else {
            debug!(employee_id = %employee_id, "Token names an unknown employee");
            return Err(AppError::authentication("Unknown employee"));
        };

        Ok(Principal {
            role_id: account.effective_role(),
            employee_id,
        })
    }

    /// Role behind a bearer token, or `None` on any failure.
    pub async fn role_for_token(&self, token: &str) -> Option<RoleId> {
        match self.resolve_token(token).await {
            Ok(principal) => principal.role_id,
            Err(e) => {
                debug!(error = %e, "Token did not resolve to a principal");
                None
            }
        }
    }

    /// Role for an employee. Any failure yields `None`.
    pub async fn resolve_employee(&self, employee_id: &EmployeeId) -> Option<RoleId> {
        match self.employees.find(employee_id).await {
            Ok(Some(account)) => account.effective_role(),
            Ok(None) => {
                debug!(employee_id = %employee_id, "Employee not found, resolving to no role");
                None
            }
            Err(e) => {
                warn!(
                    employee_id = %employee_id,
                    error = %e,
                    "Employee lookup failed, resolving to no role"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    use smartcare_core::config::AuthConfig;
    use smartcare_core::error::ErrorKind;
    use smartcare_database::repositories::MemoryEmployeeDirectory;
    use smartcare_entity::employee::EmployeeAccount;

    use crate::jwt::Claims;

    const SECRET: &str = "principal-test-secret";

    fn resolver() -> PrincipalResolver {
        let directory = MemoryEmployeeDirectory::new();
        directory.insert(EmployeeAccount {
            id: "EMP0001".into(),
            email: "somchai@example.com".into(),
            status: true,
            role_id: Some(RoleId(2)),
        });
        directory.insert(EmployeeAccount {
            id: "EMP0002".into(),
            email: "suda@example.com".into(),
            status: false,
            role_id: Some(RoleId(2)),
        });
        let config = AuthConfig {
            jwt_secret: SECRET.to_string(),
            leeway_seconds: 0,
        };
        PrincipalResolver::new(JwtDecoder::new(&config), Arc::new(directory))
    }

    fn token_for(employee_id: &str) -> String {
        let claims = Claims {
            employee_id: employee_id.to_string(),
            email: format!("{employee_id}@example.com"),
            exp: Utc::now().timestamp() + 600,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_resolve_token_binds_role() {
        let principal = resolver().resolve_token(&token_for("EMP0001")).await.unwrap();
        assert_eq!(principal.employee_id.as_str(), "EMP0001");
        assert_eq!(principal.role_id, Some(RoleId(2)));
    }

    #[tokio::test]
    async fn test_disabled_employee_has_no_role() {
        let principal = resolver().resolve_token(&token_for("EMP0002")).await.unwrap();
        assert_eq!(principal.role_id, None);
    }

    #[tokio::test]
    async fn test_unknown_employee_is_rejected() {
        let err = resolver()
            .resolve_token(&token_for("EMP9999"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(resolver().resolve_employee(&"EMP9999".into()).await, None);
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let err = resolver().resolve_token("not-a-jwt").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(resolver().role_for_token("not-a-jwt").await, None);
    }
}
