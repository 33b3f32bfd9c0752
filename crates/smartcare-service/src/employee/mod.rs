//! Employee role binding.

pub mod service;

pub use service::{EmployeeRoleService, EmployeeRoleView};
