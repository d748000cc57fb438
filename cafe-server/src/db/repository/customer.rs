//! Customer Repository
//!
//! Stores customers together with their pending verification code. The code
//! never leaves this module's record type; clients only see [`Customer`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::Customer;

use crate::db::storage::{
    CUSTOMERS_TABLE, Resource, StorageError, StorageResult, get_json, put_json,
};
use crate::db::Storage;
use crate::utils::AppResult;

/// Wrong guesses allowed before a pending code is discarded
pub const MAX_OTP_ATTEMPTS: u32 = 3;

/// Verification code waiting to be confirmed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOtp {
    pub code: String,
    pub expires_at: DateTime<Utc>,
    /// Wrong guesses so far
    #[serde(default)]
    pub attempts: u32,
}

/// Customer record as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCustomer {
    #[serde(flatten)]
    pub customer: Customer,
    #[serde(default)]
    pub otp: Option<PendingOtp>,
}

/// Why a code was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpRejection {
    /// No code pending (never sent, or already used)
    NotPending,
    Expired,
    Mismatch,
    /// Last allowed guess was wrong; the code has been discarded
    TooManyAttempts,
}

#[derive(Clone)]
pub struct CustomerRepository {
    storage: Storage,
}

impl CustomerRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn insert(&self, record: &StoredCustomer) -> AppResult<()> {
        let txn = self.storage.begin_write()?;
        put_json(&txn, CUSTOMERS_TABLE, &record.customer.id, record)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(())
    }

    #[cfg(test)]
    pub fn find_by_id(&self, id: &str) -> AppResult<Option<Customer>> {
        Ok(self.load(id)?.map(|r| r.customer))
    }

    fn load(&self, id: &str) -> StorageResult<Option<StoredCustomer>> {
        let read_txn = self.storage.begin_read()?;
        let table = read_txn.open_table(CUSTOMERS_TABLE)?;
        get_json(&table, id)
    }

    /// Check `code` against the pending one and consume it.
    ///
    /// The outer error is storage/not-found; the inner result tells whether
    /// the code was accepted. A mismatch is counted; after
    /// [`MAX_OTP_ATTEMPTS`] misses the pending code is discarded.
    pub fn consume_otp(
        &self,
        id: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Result<Customer, OtpRejection>> {
        Ok(self.consume_otp_txn(id, code, now)?)
    }

    fn consume_otp_txn(
        &self,
        id: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> StorageResult<Result<Customer, OtpRejection>> {
        let txn = self.storage.begin_write()?;
        let current: Option<StoredCustomer> = {
            let table = txn.open_table(CUSTOMERS_TABLE)?;
            get_json(&table, id)?
        };
        let mut record =
            current.ok_or_else(|| StorageError::NotFound(Resource::Customer, id.to_string()))?;

        let Some(mut pending) = record.otp.clone() else {
            return Ok(Err(OtpRejection::NotPending));
        };
        if now > pending.expires_at {
            // expired codes are cleared so a fresh one must be requested
            record.otp = None;
            put_json(&txn, CUSTOMERS_TABLE, id, &record)?;
            txn.commit()?;
            return Ok(Err(OtpRejection::Expired));
        }
        if pending.code != code.trim() {
            pending.attempts += 1;
            let rejection = if pending.attempts >= MAX_OTP_ATTEMPTS {
                record.otp = None;
                OtpRejection::TooManyAttempts
            } else {
                record.otp = Some(pending);
                OtpRejection::Mismatch
            };
            put_json(&txn, CUSTOMERS_TABLE, id, &record)?;
            txn.commit()?;
            return Ok(Err(rejection));
        }

        record.otp = None;
        record.customer.verified = true;
        record.customer.verified_at = Some(now);
        put_json(&txn, CUSTOMERS_TABLE, id, &record)?;
        txn.commit()?;
        Ok(Ok(record.customer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_test_customer(id: &str, otp: Option<PendingOtp>) -> StoredCustomer {
        StoredCustomer {
            customer: Customer {
                id: id.to_string(),
                name: "Asha".to_string(),
                phone: Some("9876543210".to_string()),
                email: "asha@example.com".to_string(),
                verified: false,
                created_at: Utc::now(),
                verified_at: None,
            },
            otp,
        }
    }

    fn pending(code: &str, ttl_secs: i64) -> Option<PendingOtp> {
        Some(PendingOtp {
            code: code.to_string(),
            expires_at: Utc::now() + Duration::seconds(ttl_secs),
            attempts: 0,
        })
    }

    #[test]
    fn test_otp_is_single_use() {
        let repo = CustomerRepository::new(Storage::open_in_memory().unwrap());
        repo.insert(&create_test_customer("c1", pending("4321", 300)))
            .unwrap();

        let customer = repo.consume_otp("c1", "4321", Utc::now()).unwrap().unwrap();
        assert!(customer.verified);
        assert!(customer.verified_at.is_some());

        let second = repo.consume_otp("c1", "4321", Utc::now()).unwrap();
        assert_eq!(second, Err(OtpRejection::NotPending));
    }

    #[test]
    fn test_otp_mismatch_keeps_code() {
        let repo = CustomerRepository::new(Storage::open_in_memory().unwrap());
        repo.insert(&create_test_customer("c1", pending("4321", 300)))
            .unwrap();

        assert_eq!(
            repo.consume_otp("c1", "1111", Utc::now()).unwrap(),
            Err(OtpRejection::Mismatch)
        );
        assert!(repo.consume_otp("c1", "4321", Utc::now()).unwrap().is_ok());
    }

    #[test]
    fn test_otp_discarded_after_max_attempts() {
        let repo = CustomerRepository::new(Storage::open_in_memory().unwrap());
        repo.insert(&create_test_customer("c1", pending("4321", 300)))
            .unwrap();

        for _ in 1..MAX_OTP_ATTEMPTS {
            assert_eq!(
                repo.consume_otp("c1", "0000", Utc::now()).unwrap(),
                Err(OtpRejection::Mismatch)
            );
        }
        assert_eq!(
            repo.consume_otp("c1", "0000", Utc::now()).unwrap(),
            Err(OtpRejection::TooManyAttempts)
        );

        // the right code no longer works once the limit is hit
        assert_eq!(
            repo.consume_otp("c1", "4321", Utc::now()).unwrap(),
            Err(OtpRejection::NotPending)
        );
        assert!(!repo.find_by_id("c1").unwrap().unwrap().verified);
    }

    #[test]
    fn test_otp_attempts_persist_between_calls() {
        let repo = CustomerRepository::new(Storage::open_in_memory().unwrap());
        repo.insert(&create_test_customer("c1", pending("4321", 300)))
            .unwrap();

        repo.consume_otp("c1", "9999", Utc::now()).unwrap().unwrap_err();
        let stored = repo.load("c1").unwrap().unwrap();
        assert_eq!(stored.otp.unwrap().attempts, 1);
    }

    #[test]
    fn test_otp_expired() {
        let repo = CustomerRepository::new(Storage::open_in_memory().unwrap());
        repo.insert(&create_test_customer("c1", pending("4321", 300)))
            .unwrap();

        let later = Utc::now() + Duration::seconds(301);
        assert_eq!(
            repo.consume_otp("c1", "4321", later).unwrap(),
            Err(OtpRejection::Expired)
        );
        assert_eq!(
            repo.consume_otp("c1", "4321", Utc::now()).unwrap(),
            Err(OtpRejection::NotPending)
        );
    }

    #[test]
    fn test_unknown_customer() {
        let repo = CustomerRepository::new(Storage::open_in_memory().unwrap());
        let err = repo.consume_otp("ghost", "1234", Utc::now()).unwrap_err();
        assert_eq!(err.code, shared::error::ErrorCode::CustomerNotFound);
        assert!(repo.find_by_id("ghost").unwrap().is_none());
    }

    #[test]
    fn test_stored_record_hides_nothing_from_storage() {
        let record = create_test_customer("c1", pending("4321", 300));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["otp"]["code"], "4321");
        assert_eq!(json["otp"]["attempts"], 0);
        assert_eq!(json["email"], "asha@example.com");
        let public = serde_json::to_value(&record.customer).unwrap();
        assert!(public.get("otp").is_none());
    }
}
