//! Staff authentication
//!
//! - [`CredentialStore`] - admin login check (argon2)
//! - [`JwtService`] - staff session tokens
//! - [`require_staff`] - route layer guarding staff endpoints

pub mod credential;
pub mod jwt;
pub mod middleware;

pub use credential::{CredentialError, CredentialStore, StaticCredentialStore};
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_staff;
