//! Email notifications

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use shared::models::{Order, OrderStatus};
use std::time::Duration;
use thiserror::Error;

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Email request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Email provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Plain-text email
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub text: String,
}

impl EmailMessage {
    /// Confirmation sent when an online order is placed
    pub fn order_confirmation(order: &Order, to_email: &str) -> Self {
        Self {
            to_email: to_email.to_string(),
            to_name: order.customer_name.clone(),
            subject: "Order Confirmed - BeanBox Café".to_string(),
            text: order_body(order, "Your order has been received."),
        }
    }

    /// Status change notice; `None` for statuses customers are not told about
    pub fn status_update(order: &Order, to_email: &str) -> Option<Self> {
        let (subject, headline) = match order.status {
            OrderStatus::Accepted => (
                "Order Accepted - BeanBox Café",
                "Your order has been accepted and is being prepared.",
            ),
            OrderStatus::Completed => (
                "Order Ready - BeanBox Café",
                "Your order is ready for pickup.",
            ),
            OrderStatus::Cancelled => (
                "Order Cancelled - BeanBox Café",
                "Your order has been cancelled.",
            ),
            OrderStatus::Pending => return None,
        };
        Some(Self {
            to_email: to_email.to_string(),
            to_name: order.customer_name.clone(),
            subject: subject.to_string(),
            text: order_body(order, headline),
        })
    }

    /// Verification code email
    pub fn verification_code(name: &str, to_email: &str, code: &str, ttl_minutes: i64) -> Self {
        Self {
            to_email: to_email.to_string(),
            to_name: name.to_string(),
            subject: "Your BeanBox verification code".to_string(),
            text: format!(
                "Hi {name},\n\nYour verification code is {code}.\nIt expires in {ttl_minutes} minutes.\n\nBeanBox Café"
            ),
        }
    }
}

fn order_body(order: &Order, headline: &str) -> String {
    let mut body = format!(
        "Hi {},\n\n{}\n\nOrder #{}\n",
        order.customer_name, headline, order.order_id
    );
    for item in &order.items {
        body.push_str(&format!(
            "  {} x{}  ₹{:.2}\n",
            item.name,
            item.quantity,
            item.line_total()
        ));
    }
    body.push_str(&format!(
        "Total: ₹{:.2}\n\nPickup OTP: {}\nShow this code when collecting your order.\n\nBeanBox Café",
        order.total, order.pickup_otp
    ));
    body
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), NotifyError>;
}

/// Brevo transactional email API
pub struct BrevoNotifier {
    client: Client,
    api_key: String,
    sender_name: String,
    sender_email: String,
}

impl BrevoNotifier {
    pub fn new(
        api_key: String,
        sender_name: String,
        sender_email: String,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            sender_name,
            sender_email,
        })
    }
}

#[async_trait]
impl Notifier for BrevoNotifier {
    async fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
        let body = json!({
            "sender": { "name": self.sender_name, "email": self.sender_email },
            "to": [{ "email": message.to_email, "name": message.to_name }],
            "subject": message.subject,
            "textContent": message.text,
        });

        let response = self
            .client
            .post(BREVO_SEND_URL)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status, body });
        }

        tracing::debug!(to = %message.to_email, subject = %message.subject, "Email sent");
        Ok(())
    }
}

/// Logs messages instead of sending them (no provider configured)
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
        tracing::info!(
            to = %message.to_email,
            subject = %message.subject,
            "Email (not sent, no provider configured):\n{}",
            message.text
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::models::{OrderItem, OrderType, PaymentType};

    fn create_test_order(status: OrderStatus) -> Order {
        let now = Utc::now();
        Order {
            id: "o-1".to_string(),
            order_id: 42,
            customer_name: "Asha".to_string(),
            customer_email: Some("asha@example.com".to_string()),
            customer_phone: None,
            customer_id: None,
            items: vec![OrderItem {
                id: "2".to_string(),
                name: "Latte".to_string(),
                price: 150.0,
                quantity: 2,
            }],
            total: 300.0,
            payment_type: PaymentType::Online,
            payment_id: None,
            pickup_otp: "4821".to_string(),
            status,
            order_type: OrderType::Online,
            created_at: now,
            updated_at: now,
            accepted_at: None,
            completed_at: None,
            cancelled_at: None,
            version: 1,
        }
    }

    #[test]
    fn test_confirmation_body() {
        let msg = EmailMessage::order_confirmation(
            &create_test_order(OrderStatus::Pending),
            "asha@example.com",
        );
        assert!(msg.text.contains("Order #42"));
        assert!(msg.text.contains("Latte x2"));
        assert!(msg.text.contains("300.00"));
        assert!(msg.text.contains("4821"));
    }

    #[test]
    fn test_status_update_subjects() {
        let ready = EmailMessage::status_update(
            &create_test_order(OrderStatus::Completed),
            "asha@example.com",
        )
        .unwrap();
        assert_eq!(ready.subject, "Order Ready - BeanBox Café");
        assert!(
            EmailMessage::status_update(&create_test_order(OrderStatus::Pending), "a@b.c")
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        let msg = EmailMessage::verification_code("Asha", "asha@example.com", "1234", 5);
        assert!(LogNotifier.send(msg).await.is_ok());
    }
}
