//! Unified error codes for the café server
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication and customer identity errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a plain `u16` so that browser clients can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Record was modified by someone else
    VersionConflict = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Customer not found
    CustomerNotFound = 1101,
    /// Verification code expired
    VerificationCodeExpired = 1102,
    /// Verification code invalid or already used
    VerificationCodeInvalid = 1103,
    /// Customer has not completed verification
    CustomerNotVerified = 1104,
    /// Too many wrong codes; a new one must be requested
    VerificationTooManyAttempts = 1105,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// The café is not accepting orders right now
    OrderingClosed = 4003,
    /// Status change not allowed from the current status
    InvalidStatusTransition = 4004,

    // ==================== 5xxx: Payment ====================
    /// Payment gateway rejected or failed the request
    PaymentFailed = 5001,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item has an invalid price
    MenuItemInvalidPrice = 6002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Third-party service (payment, email, mirror) failed
    UpstreamService = 9003,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::VersionConflict => "Record was modified concurrently, reload and retry",

            ErrorCode::NotAuthenticated => "Please login first",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::VerificationCodeExpired => "OTP has expired, please request a new one",
            ErrorCode::VerificationCodeInvalid => "Invalid OTP",
            ErrorCode::VerificationTooManyAttempts => {
                "Too many incorrect attempts, please request a new OTP"
            }
            ErrorCode::CustomerNotVerified => "Customer has not been verified",

            ErrorCode::PermissionDenied => "Permission denied",

            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Items are required",
            ErrorCode::OrderingClosed => "Sorry, we are not accepting orders at the moment",
            ErrorCode::InvalidStatusTransition => "Order status change is not allowed",

            ErrorCode::PaymentFailed => "Failed to create payment order",

            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemInvalidPrice => "Price must be a positive number",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::UpstreamService => "Upstream service error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown `u16` into [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            9 => Ok(ErrorCode::VersionConflict),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1101 => Ok(ErrorCode::CustomerNotFound),
            1102 => Ok(ErrorCode::VerificationCodeExpired),
            1103 => Ok(ErrorCode::VerificationCodeInvalid),
            1104 => Ok(ErrorCode::CustomerNotVerified),
            1105 => Ok(ErrorCode::VerificationTooManyAttempts),

            2001 => Ok(ErrorCode::PermissionDenied),

            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::OrderingClosed),
            4004 => Ok(ErrorCode::InvalidStatusTransition),

            5001 => Ok(ErrorCode::PaymentFailed),

            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuItemInvalidPrice),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::UpstreamService),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::OrderingClosed.code(), 4003);
        assert_eq!(ErrorCode::UpstreamService.code(), 9003);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(4004), Ok(ErrorCode::InvalidStatusTransition));
        assert_eq!(ErrorCode::try_from(6001), Ok(ErrorCode::MenuItemNotFound));
        assert_eq!(ErrorCode::try_from(1105), Ok(ErrorCode::VerificationTooManyAttempts));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(7777), Err(InvalidErrorCode(7777)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderingClosed).unwrap();
        assert_eq!(json, "4003");
        let back: ErrorCode = serde_json::from_str("1103").unwrap();
        assert_eq!(back, ErrorCode::VerificationCodeInvalid);
    }

    #[test]
    fn test_deserialize_invalid() {
        assert!(serde_json::from_str::<ErrorCode>("4242").is_err());
    }
}
