//! Data models
//!
//! Shared between cafe-server and browser clients (via API).
//! All wire names are camelCase.

pub mod analytics;
pub mod customer;
pub mod menu_item;
pub mod order;
pub mod settings;

// Re-exports
pub use analytics::*;
pub use customer::*;
pub use menu_item::*;
pub use order::*;
pub use settings::*;
