//! Role administration.

pub mod request;
pub mod service;

pub use request::RoleRequest;
pub use service::RoleAdminService;
