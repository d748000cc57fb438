//! Unified error system for the café server
//!
//! - [`ErrorCode`]: numeric codes shared with browser clients
//! - [`ErrorCategory`]: classification by code range
//! - [`AppError`]: error with code, message and optional details
//! - [`ErrorResponse`]: the `{success: false, error, code}` body
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::OrderingClosed);
//! assert_eq!(err.http_status(), shared::http::StatusCode::BAD_REQUEST);
//!
//! let err = AppError::validation("Items are required").with_detail("field", "items");
//! assert!(err.details.is_some());
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorResponse};
