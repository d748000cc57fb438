//! Sales analytics
//!
//! Completed orders are folded into one [`DailyAnalytics`](shared::models::DailyAnalytics)
//! record per business day. Summaries sum the daily records of a period.

pub mod aggregator;

pub use aggregator::AnalyticsAggregator;
