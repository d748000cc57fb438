//! Shared types for the café ordering server
//!
//! Data models, REST request/response bodies, the unified error type and
//! small utilities used by the server and its integration tests.

pub mod client;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
