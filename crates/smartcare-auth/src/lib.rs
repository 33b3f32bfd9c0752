//! # smartcare-auth
//!
//! Access checks for the SmartCare admin panel.
//!
//! ## Modules
//!
//! - `rbac`: the authorization check against a role's permission matrix
//! - `jwt`: bearer-token claims and verification
//! - `principal`: token to employee to role resolution

pub mod jwt;
pub mod principal;
pub mod rbac;

pub use jwt::{Claims, JwtDecoder};
pub use principal::{Principal, PrincipalResolver};
pub use rbac::RbacEnforcer;
