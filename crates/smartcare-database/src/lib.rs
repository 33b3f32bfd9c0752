//! # smartcare-database
//!
//! PostgreSQL connection management, migrations, and the stores behind
//! access control: [`RoleStore`](repositories::RoleStore) for roles and
//! [`EmployeeDirectory`](repositories::EmployeeDirectory) for the
//! employee-to-role binding. Each store has a PostgreSQL and an in-memory
//! implementation.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
