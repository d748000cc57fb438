//! redb-backed record store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `menu_items` | item id | `MenuItem` JSON | menu catalog |
//! | `orders` | order id (UUID) | `Order` JSON | orders |
//! | `order_numbers` | display number | order id | lookup by `orderId` |
//! | `customers` | customer id | `StoredCustomer` JSON | verified identities |
//! | `daily_analytics` | `YYYY-MM-DD` | `DailyAnalytics` JSON | daily rollups |
//! | `analytics_applied` | order id | `()` | completion already counted |
//! | `settings` | `"settings"` | `Settings` JSON | café switches |
//! | `counters` | counter name | `u64` | order numbering |
//!
//! redb allows a single writer at a time, so a read-modify-write inside one
//! write transaction is atomic with respect to every other writer.

use redb::{
    AccessGuard, Database, ReadableDatabase, ReadableTable, ReadTransaction,
    TableDefinition, WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::{AppError, ErrorCode};
use shared::models::{DailyAnalytics, Order, Settings};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub(crate) const MENU_ITEMS_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("menu_items");

pub(crate) const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

pub(crate) const ORDER_NUMBERS_TABLE: TableDefinition<u64, &str> =
    TableDefinition::new("order_numbers");

pub(crate) const CUSTOMERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("customers");

pub(crate) const DAILY_ANALYTICS_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("daily_analytics");

pub(crate) const ANALYTICS_APPLIED_TABLE: TableDefinition<&str, ()> =
    TableDefinition::new("analytics_applied");

pub(crate) const SETTINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("settings");

pub(crate) const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

const SETTINGS_KEY: &str = "settings";
pub(crate) const ORDER_NUMBER_COUNTER: &str = "order_number";

/// Kind of record a lookup failed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    MenuItem,
    Order,
    Customer,
}

impl Resource {
    pub fn not_found_code(&self) -> ErrorCode {
        match self {
            Self::MenuItem => ErrorCode::MenuItemNotFound,
            Self::Order => ErrorCode::OrderNotFound,
            Self::Customer => ErrorCode::CustomerNotFound,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MenuItem => f.write_str("Menu item"),
            Self::Order => f.write_str("Order"),
            Self::Customer => f.write_str("Customer"),
        }
    }
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0} not found: {1}")]
    NotFound(Resource, String),

    #[error("Version conflict: expected {expected}, current {actual}")]
    VersionConflict { expected: u64, actual: u64 },
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(resource, id) => {
                AppError::with_message(resource.not_found_code(), format!("{} not found", resource))
                    .with_detail("id", id)
            }
            StorageError::VersionConflict { expected, actual } => {
                AppError::version_conflict(expected, actual)
            }
            StorageError::Serialization(e) => {
                AppError::internal(format!("Corrupted record: {e}"))
            }
            other => AppError::database(other.to_string()),
        }
    }
}

/// Reject a write when the caller's expected version is stale
pub(crate) fn check_version(expected: Option<u64>, actual: u64) -> StorageResult<()> {
    match expected {
        Some(expected) if expected != actual => {
            Err(StorageError::VersionConflict { expected, actual })
        }
        _ => Ok(()),
    }
}

/// Decode a JSON value guard
pub(crate) fn decode<T: DeserializeOwned>(
    guard: Option<AccessGuard<'_, &'static [u8]>>,
) -> StorageResult<Option<T>> {
    match guard {
        Some(g) => Ok(Some(serde_json::from_slice(g.value())?)),
        None => Ok(None),
    }
}

/// Read one JSON record from any readable table
pub(crate) fn get_json<T: DeserializeOwned>(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    key: &str,
) -> StorageResult<Option<T>> {
    decode(table.get(key)?)
}

/// Read every JSON record of a table in key order
pub(crate) fn all_json<T: DeserializeOwned>(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
) -> StorageResult<Vec<T>> {
    let mut values = Vec::with_capacity(table.len()? as usize);
    for result in table.iter()? {
        let (_key, value) = result?;
        values.push(serde_json::from_slice(value.value())?);
    }
    Ok(values)
}

/// Insert one JSON record inside a write transaction
pub(crate) fn put_json<T: Serialize>(
    txn: &WriteTransaction,
    table: TableDefinition<'static, &'static str, &'static [u8]>,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let bytes = serde_json::to_vec(value)?;
    let mut table = txn.open_table(table)?;
    table.insert(key, bytes.as_slice())?;
    Ok(())
}

/// Record store backed by redb
#[derive(Clone)]
pub struct Storage {
    db: Arc<Database>,
}

impl Storage {
    /// Open or create the database file
    ///
    /// redb commits are durable once `commit()` returns and the file stays
    /// consistent across crashes (copy-on-write with atomic root swap).
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(MENU_ITEMS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ORDER_NUMBERS_TABLE)?;
            let _ = write_txn.open_table(CUSTOMERS_TABLE)?;
            let _ = write_txn.open_table(DAILY_ANALYTICS_TABLE)?;
            let _ = write_txn.open_table(ANALYTICS_APPLIED_TABLE)?;
            let _ = write_txn.open_table(SETTINGS_TABLE)?;

            let mut counters = write_txn.open_table(COUNTERS_TABLE)?;
            if counters.get(ORDER_NUMBER_COUNTER)?.is_none() {
                counters.insert(ORDER_NUMBER_COUNTER, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction (blocks while another writer is active)
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    pub fn begin_read(&self) -> StorageResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    // ========== Counters ==========

    /// Increment a counter and return the new value (within transaction)
    pub fn increment_counter(&self, txn: &WriteTransaction, name: &str) -> StorageResult<u64> {
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let current = table.get(name)?.map(|guard| guard.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(name, next)?;
        Ok(next)
    }

    /// Current counter value (read-only)
    pub fn counter(&self, name: &str) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COUNTERS_TABLE)?;
        Ok(table.get(name)?.map(|guard| guard.value()).unwrap_or(0))
    }

    // ========== Orders ==========

    /// Store an order and its display-number index entry
    pub fn store_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        put_json(txn, ORDERS_TABLE, &order.id, order)?;
        let mut numbers = txn.open_table(ORDER_NUMBERS_TABLE)?;
        numbers.insert(order.order_id, order.id.as_str())?;
        Ok(())
    }

    /// Resolve an order key (internal id or display number) inside a transaction
    pub fn load_order_txn(&self, txn: &WriteTransaction, key: &str) -> StorageResult<Order> {
        let orders = txn.open_table(ORDERS_TABLE)?;
        if let Some(order) = get_json::<Order>(&orders, key)? {
            return Ok(order);
        }
        if let Ok(number) = key.parse::<u64>() {
            let numbers = txn.open_table(ORDER_NUMBERS_TABLE)?;
            let id = numbers.get(number)?.map(|g| g.value().to_string());
            if let Some(id) = id
                && let Some(order) = get_json::<Order>(&orders, &id)?
            {
                return Ok(order);
            }
        }
        Err(StorageError::NotFound(Resource::Order, key.to_string()))
    }

    /// Look up an order by internal id or display number
    pub fn get_order(&self, key: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;
        if let Some(order) = get_json::<Order>(&orders, key)? {
            return Ok(Some(order));
        }
        let Ok(number) = key.parse::<u64>() else {
            return Ok(None);
        };
        let numbers = read_txn.open_table(ORDER_NUMBERS_TABLE)?;
        let id = numbers.get(number)?.map(|g| g.value().to_string());
        match id {
            Some(id) => get_json(&orders, &id),
            None => Ok(None),
        }
    }

    pub fn all_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;
        all_json(&orders)
    }

    // ========== Analytics ==========

    /// Mark an order's completion as counted; `false` if it already was
    pub fn mark_analytics_applied(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<bool> {
        let mut table = txn.open_table(ANALYTICS_APPLIED_TABLE)?;
        if table.get(order_id)?.is_some() {
            return Ok(false);
        }
        table.insert(order_id, ())?;
        Ok(true)
    }

    pub fn get_daily_txn(
        &self,
        txn: &WriteTransaction,
        date: &str,
    ) -> StorageResult<Option<DailyAnalytics>> {
        let table = txn.open_table(DAILY_ANALYTICS_TABLE)?;
        get_json(&table, date)
    }

    pub fn store_daily(&self, txn: &WriteTransaction, day: &DailyAnalytics) -> StorageResult<()> {
        put_json(txn, DAILY_ANALYTICS_TABLE, &day.date, day)
    }

    /// Daily rollups with `from <= date <= to`, oldest first
    /// Rollups whose date key lies in `from..=to`; `None` leaves that side open
    pub fn daily_range(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> StorageResult<Vec<DailyAnalytics>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DAILY_ANALYTICS_TABLE)?;
        let range = match (from, to) {
            (Some(from), Some(to)) => table.range(from..=to)?,
            (Some(from), None) => table.range(from..)?,
            (None, Some(to)) => table.range(..=to)?,
            (None, None) => table.iter()?,
        };
        let mut days = Vec::new();
        for result in range {
            let (_key, value) = result?;
            days.push(serde_json::from_slice(value.value())?);
        }
        Ok(days)
    }

    // ========== Settings ==========

    pub fn get_settings(&self) -> StorageResult<Settings> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SETTINGS_TABLE)?;
        Ok(get_json(&table, SETTINGS_KEY)?.unwrap_or_default())
    }

    pub fn get_settings_txn(&self, txn: &WriteTransaction) -> StorageResult<Settings> {
        let table = txn.open_table(SETTINGS_TABLE)?;
        Ok(get_json(&table, SETTINGS_KEY)?.unwrap_or_default())
    }

    pub fn store_settings(&self, txn: &WriteTransaction, settings: &Settings) -> StorageResult<()> {
        put_json(txn, SETTINGS_TABLE, SETTINGS_KEY, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::models::{OrderItem, OrderStatus, OrderType, PaymentType};

    fn create_test_order(id: &str, number: u64) -> Order {
        let now = Utc::now();
        Order {
            id: id.to_string(),
            order_id: number,
            customer_name: "Asha".to_string(),
            customer_email: None,
            customer_phone: None,
            customer_id: None,
            items: vec![OrderItem {
                id: "2".to_string(),
                name: "Latte".to_string(),
                price: 130.0,
                quantity: 1,
            }],
            total: 130.0,
            payment_type: PaymentType::Cash,
            payment_id: None,
            pickup_otp: "1234".to_string(),
            status: OrderStatus::Pending,
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
    fn test_open_in_memory() {
        let storage = Storage::open_in_memory().unwrap();
        assert_eq!(storage.counter(ORDER_NUMBER_COUNTER).unwrap(), 0);
        assert!(storage.all_orders().unwrap().is_empty());
    }

    #[test]
    fn test_open_file_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cafe.redb");
        {
            let storage = Storage::open(&path).unwrap();
            let txn = storage.begin_write().unwrap();
            storage.increment_counter(&txn, ORDER_NUMBER_COUNTER).unwrap();
            storage.store_order(&txn, &create_test_order("a", 1)).unwrap();
            txn.commit().unwrap();
        }
        let storage = Storage::open(&path).unwrap();
        assert_eq!(storage.counter(ORDER_NUMBER_COUNTER).unwrap(), 1);
        assert!(storage.get_order("a").unwrap().is_some());
    }

    #[test]
    fn test_counter_increments() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        assert_eq!(storage.increment_counter(&txn, ORDER_NUMBER_COUNTER).unwrap(), 1);
        assert_eq!(storage.increment_counter(&txn, ORDER_NUMBER_COUNTER).unwrap(), 2);
        txn.commit().unwrap();
        assert_eq!(storage.counter(ORDER_NUMBER_COUNTER).unwrap(), 2);
    }

    #[test]
    fn test_uncommitted_writes_are_discarded() {
        let storage = Storage::open_in_memory().unwrap();
        {
            let txn = storage.begin_write().unwrap();
            storage.increment_counter(&txn, ORDER_NUMBER_COUNTER).unwrap();
            storage.store_order(&txn, &create_test_order("a", 1)).unwrap();
            // dropped without commit
        }
        assert_eq!(storage.counter(ORDER_NUMBER_COUNTER).unwrap(), 0);
        assert!(storage.get_order("a").unwrap().is_none());
    }

    #[test]
    fn test_order_lookup_by_id_and_number() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage.store_order(&txn, &create_test_order("uuid-7", 7)).unwrap();
        txn.commit().unwrap();

        assert_eq!(storage.get_order("uuid-7").unwrap().unwrap().order_id, 7);
        assert_eq!(storage.get_order("7").unwrap().unwrap().id, "uuid-7");
        assert!(storage.get_order("8").unwrap().is_none());
        assert!(storage.get_order("nope").unwrap().is_none());

        let txn = storage.begin_write().unwrap();
        assert!(storage.load_order_txn(&txn, "7").is_ok());
        assert!(matches!(
            storage.load_order_txn(&txn, "99"),
            Err(StorageError::NotFound(Resource::Order, _))
        ));
    }

    #[test]
    fn test_analytics_applied_once() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        assert!(storage.mark_analytics_applied(&txn, "o1").unwrap());
        assert!(!storage.mark_analytics_applied(&txn, "o1").unwrap());
        txn.commit().unwrap();
    }

    #[test]
    fn test_daily_range() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        for date in ["2026-10-01", "2026-10-10", "2026-10-17", "2026-10-18"] {
            storage.store_daily(&txn, &DailyAnalytics::empty(date)).unwrap();
        }
        txn.commit().unwrap();

        let week = storage
            .daily_range(Some("2026-10-12"), Some("2026-10-18"))
            .unwrap();
        let dates: Vec<_> = week.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-10-17", "2026-10-18"]);

        let until = storage.daily_range(None, Some("2026-10-17")).unwrap();
        assert_eq!(until.len(), 3);

        let since = storage.daily_range(Some("2026-10-10"), None).unwrap();
        assert_eq!(since.len(), 3);

        let all = storage.daily_range(None, None).unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].date, "2026-10-01");
        assert_eq!(all[3].date, "2026-10-18");
    }

    #[test]
    fn test_settings_default_accepting() {
        let storage = Storage::open_in_memory().unwrap();
        assert!(storage.get_settings().unwrap().accepting_orders);
    }

    #[test]
    fn test_check_version() {
        assert!(check_version(None, 4).is_ok());
        assert!(check_version(Some(4), 4).is_ok());
        assert!(matches!(
            check_version(Some(3), 4),
            Err(StorageError::VersionConflict {
                expected: 3,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_not_found_maps_to_domain_code() {
        let err: AppError = StorageError::NotFound(Resource::MenuItem, "x".into()).into();
        assert_eq!(err.code, ErrorCode::MenuItemNotFound);
        let err: AppError = StorageError::VersionConflict {
            expected: 1,
            actual: 2,
        }
        .into();
        assert_eq!(err.code, ErrorCode::VersionConflict);
    }
}
