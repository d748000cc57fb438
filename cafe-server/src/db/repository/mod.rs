//! Repository Module
//!
//! Record-level operations over [`Storage`](crate::db::Storage). Each write
//! runs in its own redb transaction; validation happens before the
//! transaction starts.

pub mod customer;
pub mod menu;
pub mod settings;

// Re-exports
pub use customer::{
    CustomerRepository, MAX_OTP_ATTEMPTS, OtpRejection, PendingOtp, StoredCustomer,
};
pub use menu::MenuRepository;
pub use settings::SettingsRepository;
