//! # smartcare-service
//!
//! Use cases of the admin panel's permission screens. Services take their
//! stores and the enforcer at construction time as `Arc` references and
//! authorize every call against the acting [`RequestContext`].

pub mod context;
pub mod employee;
pub mod role;

pub use context::{Actor, RequestContext};
pub use employee::EmployeeRoleService;
pub use role::{RoleAdminService, RoleRequest};
