//! Order lifecycle
//!
//! ```text
//! pending ──► accepted ──► completed
//!    │            │
//!    └────────────┴──► cancelled
//! ```
//!
//! Every state change runs inside one redb write transaction together with
//! its side effects on local state (order number counter, daily analytics).
//! Email and mirror copies go out after commit and never fail the operation.

pub mod error;
pub mod manager;

pub use error::{ManagerError, ManagerResult};
pub use manager::OrdersManager;
