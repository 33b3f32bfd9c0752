//! Convenience result type alias for SmartCare.

use crate::error::AppError;

/// A specialized `Result` type for SmartCare operations.
pub type AppResult<T> = Result<T, AppError>;
