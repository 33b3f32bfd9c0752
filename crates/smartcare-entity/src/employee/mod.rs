//! Employee accounts, as seen by access control.

pub mod model;

pub use model::EmployeeAccount;
