//! Store traits and their implementations.

pub mod employee;
pub mod role;

pub use employee::{EmployeeDirectory, MemoryEmployeeDirectory, PgEmployeeDirectory};
pub use role::{MemoryRoleStore, PgRoleStore, RoleStore};
