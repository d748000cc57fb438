//! Utility module
//!
//! - [`AppError`] / [`AppResult`] from `shared::error`
//! - logging setup, input validation, business-timezone helpers

pub mod logger;
pub mod time;
pub mod validation;

pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode, ErrorResponse};
