//! # smartcare-entity
//!
//! Domain models for SmartCare access control. The permission types are
//! pure values; [`role::Role`] and [`employee::EmployeeAccount`] mirror
//! database rows.

pub mod employee;
pub mod permission;
pub mod role;
