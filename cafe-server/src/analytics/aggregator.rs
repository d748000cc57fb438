//! Daily rollup writer and period summaries

use chrono::NaiveDate;
use chrono_tz::Tz;
use redb::WriteTransaction;
use shared::models::{AnalyticsSummary, DailyAnalytics, ItemStat, Order, PaymentType, Period};

use crate::db::{Storage, StorageResult};
use crate::utils::time;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct AnalyticsAggregator {
    storage: Storage,
    tz: Tz,
}

impl AnalyticsAggregator {
    pub fn new(storage: Storage, tz: Tz) -> Self {
        Self { storage, tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Fold a completed order into the rollup of `date`.
    ///
    /// Returns `false` and leaves the rollup untouched when this order was
    /// already counted.
    pub fn record_completion(&self, order: &Order, date: NaiveDate) -> StorageResult<bool> {
        let txn = self.storage.begin_write()?;
        let applied = self.record_completion_txn(&txn, order, date)?;
        txn.commit()?;
        Ok(applied)
    }

    /// Same as [`record_completion`](Self::record_completion), inside the
    /// caller's transaction
    pub fn record_completion_txn(
        &self,
        txn: &WriteTransaction,
        order: &Order,
        date: NaiveDate,
    ) -> StorageResult<bool> {
        if !self.storage.mark_analytics_applied(txn, &order.id)? {
            tracing::debug!(order_id = %order.id, "Completion already counted, skipping");
            return Ok(false);
        }

        let key = time::date_key(date);
        let mut day = self
            .storage
            .get_daily_txn(txn, &key)?
            .unwrap_or_else(|| DailyAnalytics::empty(key.clone()));
        apply_order(&mut day, order);
        self.storage.store_daily(txn, &day)?;

        tracing::debug!(
            order_id = %order.id,
            date = %key,
            total_orders = day.total_orders,
            "Daily analytics updated"
        );
        Ok(true)
    }

    /// Sum the daily rollups of `period`, ending today
    pub fn summarize(&self, period: Period) -> AppResult<AnalyticsSummary> {
        self.summarize_at(period, time::today(self.tz))
    }

    /// Parse a `?period=` value (absent means `all`) and summarize
    pub fn summarize_str(&self, period: Option<&str>) -> AppResult<AnalyticsSummary> {
        let period = match period {
            Some(value) => value
                .trim()
                .parse::<Period>()
                .map_err(AppError::validation)?,
            None => Period::All,
        };
        self.summarize(period)
    }

    fn summarize_at(&self, period: Period, today: NaiveDate) -> AppResult<AnalyticsSummary> {
        // `all` is every stored rollup, including days ahead of the local date
        let (from, to) = match time::period_start(period, today) {
            Some(start) => (Some(time::date_key(start)), Some(time::date_key(today))),
            None => (None, None),
        };
        let days = self.storage.daily_range(from.as_deref(), to.as_deref())?;
        Ok(AnalyticsSummary::from_days(period, days))
    }
}

fn apply_order(day: &mut DailyAnalytics, order: &Order) {
    day.total_orders += 1;
    day.total_revenue += order.total;
    match order.payment_type {
        PaymentType::Online => {
            day.online_revenue += order.total;
            day.online_orders += 1;
        }
        PaymentType::Cash => {
            day.cash_revenue += order.total;
            day.cash_orders += 1;
        }
    }
    for item in &order.items {
        day.top_items.entry(item.name.clone()).or_default().add(&ItemStat {
            count: item.quantity as u64,
            revenue: item.line_total(),
        });
    }
}
