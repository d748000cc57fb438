//! Core: configuration, shared state, server startup
//!
//! - [`Config`] - environment configuration
//! - [`ServerState`] - services shared by every handler
//! - [`Server`] - HTTP listener with graceful shutdown
//! - [`ServerError`] - startup failures

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::{Config, OrderGateScope};
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::{Collaborators, ServerState};
