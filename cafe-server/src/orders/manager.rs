//! OrdersManager - order creation and status transitions

use chrono::{DateTime, Utc};
use redb::WriteTransaction;
use shared::models::{
    NewOrder, Order, OrderItem, OrderReceipt, OrderStatus, OrderType, PaymentType,
};
use shared::util::numeric_code;
use std::sync::Arc;

use super::error::{ManagerError, ManagerResult};
use crate::analytics::AnalyticsAggregator;
use crate::core::config::OrderGateScope;
use crate::db::repository::StoredCustomer;
use crate::db::storage::{CUSTOMERS_TABLE, ORDER_NUMBER_COUNTER, check_version, get_json};
use crate::db::{Storage, StorageError};
use crate::services::mirror::{MirrorService, ORDERS_COLLECTION};
use crate::services::notifier::{EmailMessage, Notifier};
use crate::utils::time::business_date;
use crate::utils::validation::{MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_ORDER_LINES};

const WALK_IN_CUSTOMER: &str = "Walk-in Customer";
const PICKUP_OTP_DIGITS: u32 = 4;

/// Where a new order comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Customer,
    Counter,
}

#[derive(Clone)]
pub struct OrdersManager {
    storage: Storage,
    analytics: AnalyticsAggregator,
    notifier: Arc<dyn Notifier>,
    mirror: MirrorService,
    gate_scope: OrderGateScope,
}

impl OrdersManager {
    pub fn new(
        storage: Storage,
        analytics: AnalyticsAggregator,
        notifier: Arc<dyn Notifier>,
        mirror: MirrorService,
        gate_scope: OrderGateScope,
    ) -> Self {
        Self {
            storage,
            analytics,
            notifier,
            mirror,
            gate_scope,
        }
    }

    /// Place a customer order (status `pending`)
    pub async fn create_order(&self, new: NewOrder) -> ManagerResult<OrderReceipt> {
        let order = self.insert(new, Origin::Customer)?;

        tracing::info!(
            order_id = order.order_id,
            id = %order.id,
            payment_type = order.payment_type.as_str(),
            total = order.total,
            "Order created"
        );
        self.mirror.enqueue(ORDERS_COLLECTION, &order.id, &order);

        if order.payment_type == PaymentType::Online
            && let Some(email) = order.customer_email.as_deref()
        {
            self.notify(EmailMessage::order_confirmation(&order, email), &order)
                .await;
        }

        Ok(OrderReceipt::from(&order))
    }

    /// Counter order entered by staff: never gated, accepted immediately
    pub async fn create_walk_in_order(&self, new: NewOrder) -> ManagerResult<OrderReceipt> {
        let order = self.insert(new, Origin::Counter)?;

        tracing::info!(
            order_id = order.order_id,
            id = %order.id,
            total = order.total,
            "Walk-in order created"
        );
        self.mirror.enqueue(ORDERS_COLLECTION, &order.id, &order);

        Ok(OrderReceipt::from(&order))
    }

    /// Move an order along the lifecycle.
    ///
    /// `key` is the internal id or the display number. Entering `completed`
    /// records the sale in the daily analytics within the same transaction.
    pub async fn update_status(
        &self,
        key: &str,
        status: OrderStatus,
        expected_version: Option<u64>,
    ) -> ManagerResult<Order> {
        let order = self.update_status_txn(key, status, expected_version)?;

        tracing::info!(
            order_id = order.order_id,
            id = %order.id,
            status = %order.status,
            version = order.version,
            "Order status updated"
        );
        self.mirror.enqueue(ORDERS_COLLECTION, &order.id, &order);

        if let Some(email) = order.customer_email.as_deref()
            && let Some(message) = EmailMessage::status_update(&order, email)
        {
            self.notify(message, &order).await;
        }

        Ok(order)
    }

    pub fn get_order(&self, key: &str) -> ManagerResult<Order> {
        self.storage
            .get_order(key)?
            .ok_or_else(|| ManagerError::OrderNotFound(key.to_string()))
    }

    /// All orders, newest first, optionally filtered by status
    pub fn list_orders(&self, status: Option<OrderStatus>) -> ManagerResult<Vec<Order>> {
        let mut orders = self.storage.all_orders()?;
        if let Some(status) = status {
            orders.retain(|o| o.status == status);
        }
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.order_id.cmp(&a.order_id))
        });
        Ok(orders)
    }

    // ========== Internals ==========

    fn insert(&self, new: NewOrder, origin: Origin) -> ManagerResult<Order> {
        validate_new_order(&new)?;

        let payment_type = new.payment_type.unwrap_or(PaymentType::Cash);

        let txn = self.storage.begin_write()?;

        if origin == Origin::Customer && self.is_gated(payment_type) {
            let settings = self.storage.get_settings_txn(&txn)?;
            if !settings.accepting_orders {
                tracing::info!(
                    payment_type = payment_type.as_str(),
                    "Order refused, not accepting orders"
                );
                return Err(ManagerError::OrderingClosed);
            }
        }

        let mut customer_name = non_empty(new.customer_name);
        let mut customer_email = non_empty(new.customer_email);
        let mut customer_phone = non_empty(new.customer_phone);
        let customer_id = non_empty(new.user_id);
        if let Some(id) = customer_id.as_deref() {
            let record = load_customer(&txn, id)?;
            if !record.customer.verified {
                return Err(ManagerError::CustomerNotVerified(id.to_string()));
            }
            customer_name = Some(record.customer.name);
            customer_email = Some(record.customer.email);
            customer_phone = record.customer.phone.or(customer_phone);
        }

        let order_id = self.storage.increment_counter(&txn, ORDER_NUMBER_COUNTER)?;
        let now = Utc::now();
        let mut order = Order {
            id: uuid::Uuid::new_v4().to_string(),
            order_id,
            customer_name: customer_name.unwrap_or_else(|| WALK_IN_CUSTOMER.to_string()),
            customer_email,
            customer_phone,
            customer_id,
            items: new.items,
            total: new.total,
            payment_type,
            payment_id: non_empty(new.payment_id),
            pickup_otp: numeric_code(PICKUP_OTP_DIGITS),
            status: OrderStatus::Pending,
            order_type: match origin {
                Origin::Customer => OrderType::Online,
                Origin::Counter => OrderType::WalkIn,
            },
            created_at: now,
            updated_at: now,
            accepted_at: None,
            completed_at: None,
            cancelled_at: None,
            version: 1,
        };

        if origin == Origin::Counter {
            apply_transition(&mut order, OrderStatus::Accepted, now);
        }

        self.storage.store_order(&txn, &order)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(order)
    }

    fn update_status_txn(
        &self,
        key: &str,
        status: OrderStatus,
        expected_version: Option<u64>,
    ) -> ManagerResult<Order> {
        let txn = self.storage.begin_write()?;
        let mut order = self.storage.load_order_txn(&txn, key).map_err(|e| match e {
            StorageError::NotFound(_, key) => ManagerError::OrderNotFound(key),
            other => other.into(),
        })?;
        check_version(expected_version, order.version)?;

        if !order.status.can_transition_to(status) {
            return Err(ManagerError::InvalidTransition {
                from: order.status,
                to: status,
            });
        }

        let now = Utc::now();
        apply_transition(&mut order, status, now);

        if status == OrderStatus::Completed {
            let date = business_date(now, self.analytics.timezone());
            self.analytics.record_completion_txn(&txn, &order, date)?;
        }

        self.storage.store_order(&txn, &order)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(order)
    }

    fn is_gated(&self, payment_type: PaymentType) -> bool {
        match self.gate_scope {
            OrderGateScope::All => true,
            OrderGateScope::Online => payment_type == PaymentType::Online,
        }
    }

    async fn notify(&self, message: EmailMessage, order: &Order) {
        if let Err(e) = self.notifier.send(message).await {
            tracing::warn!(order_id = order.order_id, "Failed to send order email: {e}");
        }
    }
}

fn load_customer(txn: &WriteTransaction, id: &str) -> ManagerResult<StoredCustomer> {
    let table = txn
        .open_table(CUSTOMERS_TABLE)
        .map_err(StorageError::from)?;
    get_json::<StoredCustomer>(&table, id)?
        .ok_or_else(|| ManagerError::CustomerNotFound(id.to_string()))
}

fn apply_transition(order: &mut Order, status: OrderStatus, now: DateTime<Utc>) {
    order.status = status;
    order.updated_at = now;
    match status {
        OrderStatus::Accepted => order.accepted_at = Some(now),
        OrderStatus::Completed => order.completed_at = Some(now),
        OrderStatus::Cancelled => order.cancelled_at = Some(now),
        OrderStatus::Pending => {}
    }
    order.version += 1;
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_new_order(new: &NewOrder) -> ManagerResult<()> {
    if new.items.is_empty() {
        return Err(ManagerError::EmptyOrder);
    }
    if new.items.len() > MAX_ORDER_LINES {
        return Err(ManagerError::Validation(format!(
            "Too many order lines (max {MAX_ORDER_LINES})"
        )));
    }
    for item in &new.items {
        validate_item(item)?;
    }
    if !new.total.is_finite() || new.total < 0.0 {
        return Err(ManagerError::Validation(
            "Total must be a non-negative number".to_string(),
        ));
    }
    if new.customer_name.as_ref().is_some_and(|n| n.len() > MAX_NAME_LEN) {
        return Err(ManagerError::Validation("Customer name is too long".to_string()));
    }
    if new
        .customer_email
        .as_ref()
        .is_some_and(|e| e.len() > MAX_EMAIL_LEN)
    {
        return Err(ManagerError::Validation("Customer email is too long".to_string()));
    }
    Ok(())
}

fn validate_item(item: &OrderItem) -> ManagerResult<()> {
    if item.name.trim().is_empty() {
        return Err(ManagerError::Validation("Item name must not be empty".to_string()));
    }
    if item.quantity == 0 {
        return Err(ManagerError::Validation(format!(
            "Quantity of '{}' must be at least 1",
            item.name
        )));
    }
    if !item.price.is_finite() || item.price < 0.0 {
        return Err(ManagerError::Validation(format!(
            "Price of '{}' must not be negative",
            item.name
        )));
    }
    Ok(())
}
