//! External collaborators
//!
//! - **notifier**: transactional email (Brevo, or log-only)
//! - **payment**: payment gateway orders (Razorpay, or disabled)
//! - **mirror**: best-effort copy of records to a remote store
//! - **verification**: customer OTP flow on top of the notifier

pub mod mirror;
pub mod notifier;
pub mod payment;
pub mod verification;

pub use mirror::{HttpMirror, Mirror, MirrorError, MirrorService, MirrorWorker};
pub use notifier::{BrevoNotifier, EmailMessage, LogNotifier, Notifier, NotifyError};
pub use payment::{
    DisabledGateway, PaymentError, PaymentGateway, PaymentOrder, RazorpayGateway, to_minor_units,
};
pub use verification::CustomerVerifier;
