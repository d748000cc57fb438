//! Order manager errors

use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;
use thiserror::Error;

use crate::db::StorageError;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Items are required")]
    EmptyOrder,

    #[error("{0}")]
    Validation(String),

    #[error("Ordering is closed")]
    OrderingClosed,

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("Customer not verified: {0}")]
    CustomerNotVerified(String),
}

pub type ManagerResult<T> = Result<T, ManagerError>;

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::Storage(e) => e.into(),
            ManagerError::EmptyOrder => AppError::new(ErrorCode::OrderEmpty),
            ManagerError::Validation(msg) => AppError::validation(msg),
            ManagerError::OrderingClosed => AppError::new(ErrorCode::OrderingClosed),
            ManagerError::OrderNotFound(key) => {
                AppError::new(ErrorCode::OrderNotFound).with_detail("id", key)
            }
            ManagerError::InvalidTransition { from, to } => AppError::with_message(
                ErrorCode::InvalidStatusTransition,
                format!("Cannot change order status from {from} to {to}"),
            )
            .with_detail("from", from.as_str())
            .with_detail("to", to.as_str()),
            ManagerError::CustomerNotFound(id) => {
                AppError::new(ErrorCode::CustomerNotFound).with_detail("id", id)
            }
            ManagerError::CustomerNotVerified(id) => {
                AppError::new(ErrorCode::CustomerNotVerified).with_detail("id", id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_error_mapping() {
        let err: AppError = ManagerError::EmptyOrder.into();
        assert_eq!(err.code, ErrorCode::OrderEmpty);
        assert_eq!(err.message, "Items are required");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);

        let err: AppError = ManagerError::OrderingClosed.into();
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);

        let err: AppError = ManagerError::InvalidTransition {
            from: OrderStatus::Completed,
            to: OrderStatus::Completed,
        }
        .into();
        assert_eq!(err.http_status(), StatusCode::CONFLICT);

        let err: AppError = ManagerError::OrderNotFound("99".to_string()).into();
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
    }
}
