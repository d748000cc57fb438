use thiserror::Error;

use crate::auth::{CredentialError, JwtError};
use crate::db::StorageError;
use crate::services::{MirrorError, NotifyError, PaymentError};
use crate::utils::AppError;

/// Failures while starting or running the server
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Storage(#[from] StorageError),

    #[error("JWT configuration: {0}")]
    Jwt(#[from] JwtError),

    #[error("Admin credentials: {0}")]
    Credentials(#[from] CredentialError),

    #[error("Email client: {0}")]
    Notifier(#[from] NotifyError),

    #[error("Payment client: {0}")]
    Payment(#[from] PaymentError),

    #[error("Mirror client: {0}")]
    Mirror(#[from] MirrorError),

    #[error("Startup failed: {0}")]
    App(#[from] AppError),
}

pub type Result<T> = std::result::Result<T, ServerError>;
