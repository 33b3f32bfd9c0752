//! Permission matrix domain: modules, actions, and the module x action grid.

pub mod action;
pub mod flags;
pub mod matrix;
pub mod module;

pub use action::Action;
pub use flags::PermissionFlags;
pub use matrix::{PermissionMatrix, RawFlags, RawPermissions};
pub use module::Module;
