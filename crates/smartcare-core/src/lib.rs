//! # smartcare-core
//!
//! Core crate for the SmartCare admin panel's access-control layer. Contains
//! configuration schemas, typed identifiers, and the unified error system.
//!
//! This crate has **no** internal dependencies on other SmartCare crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
