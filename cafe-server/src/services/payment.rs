//! Payment gateway

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::error::AppError;
use std::time::Duration;
use thiserror::Error;

const RAZORPAY_ORDERS_URL: &str = "https://api.razorpay.com/v1/orders";
const CURRENCY: &str = "INR";

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Amount must be a positive number")]
    InvalidAmount,

    #[error("Payment gateway is not configured")]
    NotConfigured,

    #[error("Payment gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Payment gateway returned an unexpected response: {0}")]
    InvalidResponse(String),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::InvalidAmount => AppError::validation("Amount must be a positive number"),
            other => {
                tracing::error!("Payment gateway error: {other}");
                AppError::upstream("Failed to create payment order")
            }
        }
    }
}

/// Gateway-side order the client completes checkout against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrder {
    pub order_id: String,
    /// Smallest currency unit (paise)
    pub amount: u64,
    pub currency: String,
}

/// Rupees to paise
pub fn to_minor_units(amount: f64) -> Result<u64, PaymentError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(PaymentError::InvalidAmount);
    }
    Ok((amount * 100.0).round() as u64)
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, amount: f64, receipt: &str) -> Result<PaymentOrder, PaymentError>;
}

pub struct RazorpayGateway {
    client: Client,
    key_id: String,
    key_secret: String,
}

impl RazorpayGateway {
    pub fn new(key_id: String, key_secret: String, timeout: Duration) -> Result<Self, PaymentError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            key_id,
            key_secret,
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, amount: f64, receipt: &str) -> Result<PaymentOrder, PaymentError> {
        let amount = to_minor_units(amount)?;

        let resp: serde_json::Value = self
            .client
            .post(RAZORPAY_ORDERS_URL)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&json!({
                "amount": amount,
                "currency": CURRENCY,
                "receipt": receipt,
            }))
            .send()
            .await?
            .json()
            .await?;

        let order_id = resp["id"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| PaymentError::InvalidResponse(resp.to_string()))?;

        Ok(PaymentOrder {
            order_id,
            amount: resp["amount"].as_u64().unwrap_or(amount),
            currency: resp["currency"].as_str().unwrap_or(CURRENCY).to_string(),
        })
    }
}

/// Used when no gateway keys are configured
pub struct DisabledGateway;

#[async_trait]
impl PaymentGateway for DisabledGateway {
    async fn create_order(&self, amount: f64, _receipt: &str) -> Result<PaymentOrder, PaymentError> {
        to_minor_units(amount)?;
        Err(PaymentError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_minor_units() {
        assert_eq!(to_minor_units(260.0).unwrap(), 26000);
        assert_eq!(to_minor_units(99.99).unwrap(), 9999);
        assert!(to_minor_units(0.0).is_err());
        assert!(to_minor_units(-5.0).is_err());
        assert!(to_minor_units(f64::NAN).is_err());
    }

    #[tokio::test]
    async fn test_disabled_gateway_is_upstream_error() {
        let err: AppError = DisabledGateway
            .create_order(100.0, "rcpt_1")
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::UpstreamService);
        assert_eq!(err.http_status(), http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_bad_amount_is_validation_error() {
        let err: AppError = DisabledGateway
            .create_order(-1.0, "rcpt_1")
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
