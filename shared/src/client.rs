//! Request/response bodies of the REST API
//!
//! Success bodies carry `success: true` next to the payload, matching the
//! `{success: false, error, code}` shape of [`crate::error::ErrorResponse`].

use serde::{Deserialize, Serialize};

use crate::models::{Customer, MenuItem, Order, OrderReceipt, Settings};

// =============================================================================
// Health
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

// =============================================================================
// Generic
// =============================================================================

/// `{success, message}` acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

// =============================================================================
// Menu
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemResponse {
    pub success: bool,
    pub item: MenuItem,
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreatedResponse {
    pub success: bool,
    pub order: OrderReceipt,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub success: bool,
    pub order: Order,
}

/// Status change request
///
/// `status` stays a string so unknown values surface as validation errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
    /// Expected current version of the order
    #[serde(default)]
    pub version: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<String>,
}

// =============================================================================
// Analytics
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsQuery {
    pub period: Option<String>,
}

// =============================================================================
// Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub success: bool,
    pub settings: Settings,
}

// =============================================================================
// Customer identity
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResponse {
    pub success: bool,
    pub user_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub user: Customer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub customer_id: String,
    pub name: String,
    pub email: String,
}

// =============================================================================
// Payments
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrderRequest {
    /// Amount in rupees
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrderResponse {
    pub success: bool,
    /// Gateway order id
    pub order_id: String,
    /// Amount in paise
    pub amount: u64,
    pub currency: String,
}

// =============================================================================
// Admin auth
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub message: String,
}
