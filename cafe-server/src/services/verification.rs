//! Customer identity verification (email OTP)

use chrono::{Duration, Utc};
use shared::models::{Customer, RegisterRequest, SendOtpRequest};
use shared::util::{numeric_code, snowflake_id};
use std::sync::Arc;

use crate::db::repository::{CustomerRepository, OtpRejection, PendingOtp, StoredCustomer};
use crate::security_log;
use crate::services::mirror::{CUSTOMERS_COLLECTION, MirrorService};
use crate::services::notifier::{EmailMessage, Notifier};
use crate::utils::validation::{
    MAX_NAME_LEN, validate_email, validate_phone, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const OTP_DIGITS: u32 = 4;

#[derive(Clone)]
pub struct CustomerVerifier {
    repo: CustomerRepository,
    notifier: Arc<dyn Notifier>,
    mirror: MirrorService,
    otp_ttl: Duration,
}

impl CustomerVerifier {
    pub fn new(
        repo: CustomerRepository,
        notifier: Arc<dyn Notifier>,
        mirror: MirrorService,
        otp_ttl_secs: i64,
    ) -> Self {
        Self {
            repo,
            notifier,
            mirror,
            otp_ttl: Duration::seconds(otp_ttl_secs.max(1)),
        }
    }

    /// Create an unverified customer and email them a one-time code.
    ///
    /// Returns the new customer id.
    pub async fn send_otp(&self, req: SendOtpRequest) -> AppResult<String> {
        let name = req.name.trim();
        let phone = req.phone.trim();
        let email = req.email.trim();
        validate_required_text(name, "name", MAX_NAME_LEN)?;
        validate_phone(phone)?;
        validate_email(email)?;

        let now = Utc::now();
        let code = numeric_code(OTP_DIGITS);
        let record = StoredCustomer {
            customer: Customer {
                id: format!("user_{}", snowflake_id()),
                name: name.to_string(),
                phone: Some(phone.to_string()),
                email: email.to_string(),
                verified: false,
                created_at: now,
                verified_at: None,
            },
            otp: Some(PendingOtp {
                code: code.clone(),
                expires_at: now + self.otp_ttl,
                attempts: 0,
            }),
        };
        self.repo.insert(&record)?;

        let message =
            EmailMessage::verification_code(name, email, &code, self.otp_ttl.num_minutes().max(1));
        if let Err(e) = self.notifier.send(message).await {
            tracing::error!(user_id = %record.customer.id, "Failed to send verification code: {e}");
            return Err(AppError::upstream("Failed to send verification code"));
        }

        tracing::info!(user_id = %record.customer.id, "Verification code sent");
        Ok(record.customer.id)
    }

    /// Confirm a code; the code is consumed on success
    pub fn verify_otp(&self, user_id: &str, otp: &str) -> AppResult<Customer> {
        if user_id.trim().is_empty() || otp.trim().is_empty() {
            return Err(AppError::validation("User ID and OTP are required"));
        }

        match self.repo.consume_otp(user_id.trim(), otp, Utc::now())? {
            Ok(customer) => {
                tracing::info!(user_id = %customer.id, "Customer verified");
                self.mirror
                    .enqueue(CUSTOMERS_COLLECTION, &customer.id, &customer);
                Ok(customer)
            }
            Err(rejection) => {
                security_log!(WARN, "otp_rejected", user_id = %user_id, reason = ?rejection);
                Err(match rejection {
                    OtpRejection::Expired => AppError::new(ErrorCode::VerificationCodeExpired),
                    OtpRejection::Mismatch => AppError::new(ErrorCode::VerificationCodeInvalid),
                    OtpRejection::TooManyAttempts => {
                        AppError::new(ErrorCode::VerificationTooManyAttempts)
                    }
                    OtpRejection::NotPending => AppError::with_message(
                        ErrorCode::VerificationCodeInvalid,
                        "No pending verification code",
                    ),
                })
            }
        }
    }

    /// Create a customer without verification
    pub fn register(&self, req: RegisterRequest) -> AppResult<Customer> {
        let name = req.name.trim();
        let email = req.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(AppError::validation("Name and email are required"));
        }
        validate_required_text(name, "name", MAX_NAME_LEN)?;
        validate_email(email)?;

        let customer = Customer {
            id: format!("customer_{}", snowflake_id()),
            name: name.to_string(),
            phone: None,
            email: email.to_string(),
            verified: false,
            created_at: Utc::now(),
            verified_at: None,
        };
        self.repo.insert(&StoredCustomer {
            customer: customer.clone(),
            otp: None,
        })?;
        self.mirror
            .enqueue(CUSTOMERS_COLLECTION, &customer.id, &customer);

        tracing::info!(customer_id = %customer.id, "Customer registered");
        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Storage;
    use crate::db::repository::MAX_OTP_ATTEMPTS;
    use crate::services::notifier::NotifyError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<EmailMessage>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    fn verifier() -> (CustomerVerifier, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let repo = CustomerRepository::new(Storage::open_in_memory().unwrap());
        let verifier = CustomerVerifier::new(repo, notifier.clone(), MirrorService::disabled(), 300);
        (verifier, notifier)
    }

    fn request() -> SendOtpRequest {
        SendOtpRequest {
            name: "Asha".to_string(),
            phone: "9876543210".to_string(),
            email: "asha@example.com".to_string(),
        }
    }

    /// The code is the only 4-digit run in the email body
    fn sent_code(notifier: &RecordingNotifier) -> String {
        let sent = notifier.sent.lock().unwrap();
        let text = &sent.last().unwrap().text;
        text.split(|c: char| !c.is_ascii_digit())
            .find(|part| part.len() == 4)
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_send_and_verify() {
        let (verifier, notifier) = verifier();
        let user_id = verifier.send_otp(request()).await.unwrap();
        let code = sent_code(&notifier);

        let customer = verifier.verify_otp(&user_id, &code).unwrap();
        assert!(customer.verified);
        let stored = verifier.repo.find_by_id(&user_id).unwrap().unwrap();
        assert!(stored.verified);

        let err = verifier.verify_otp(&user_id, &code).unwrap_err();
        assert_eq!(err.code, ErrorCode::VerificationCodeInvalid);
    }

    #[tokio::test]
    async fn test_send_otp_validation() {
        let (verifier, notifier) = verifier();
        let mut bad_phone = request();
        bad_phone.phone = "12345".to_string();
        let err = verifier.send_otp(bad_phone).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let mut bad_email = request();
        bad_email.email = "not-an-email".to_string();
        assert!(verifier.send_otp(bad_email).await.is_err());

        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_code() {
        let (verifier, notifier) = verifier();
        let user_id = verifier.send_otp(request()).await.unwrap();
        let code = sent_code(&notifier);
        let wrong = if code == "1000" { "1001" } else { "1000" };

        let err = verifier.verify_otp(&user_id, wrong).unwrap_err();
        assert_eq!(err.code, ErrorCode::VerificationCodeInvalid);
        let stored = verifier.repo.find_by_id(&user_id).unwrap().unwrap();
        assert!(!stored.verified);
    }

    #[tokio::test]
    async fn test_guessing_locks_out_code() {
        let (verifier, notifier) = verifier();
        let user_id = verifier.send_otp(request()).await.unwrap();
        let code = sent_code(&notifier);
        let wrong = if code == "1000" { "1001" } else { "1000" };

        for _ in 1..MAX_OTP_ATTEMPTS {
            let err = verifier.verify_otp(&user_id, wrong).unwrap_err();
            assert_eq!(err.code, ErrorCode::VerificationCodeInvalid);
        }
        let err = verifier.verify_otp(&user_id, wrong).unwrap_err();
        assert_eq!(err.code, ErrorCode::VerificationTooManyAttempts);

        // correct code after lockout is refused until a new one is sent
        let err = verifier.verify_otp(&user_id, &code).unwrap_err();
        assert_eq!(err.code, ErrorCode::VerificationCodeInvalid);
        assert!(!verifier.repo.find_by_id(&user_id).unwrap().unwrap().verified);
    }

    #[test]
    fn test_unknown_user() {
        let (verifier, _) = verifier();
        let err = verifier.verify_otp("user_missing", "1234").unwrap_err();
        assert_eq!(err.code, ErrorCode::CustomerNotFound);
    }

    #[test]
    fn test_register_is_unverified() {
        let (verifier, _) = verifier();
        let customer = verifier
            .register(RegisterRequest {
                name: "Ravi".to_string(),
                email: "ravi@example.com".to_string(),
            })
            .unwrap();
        assert!(!customer.verified);
        assert!(customer.id.starts_with("customer_"));

        let err = verifier
            .register(RegisterRequest {
                name: String::new(),
                email: "ravi@example.com".to_string(),
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
