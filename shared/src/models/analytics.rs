//! Analytics Model (daily sales rollups)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Per-item sales counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemStat {
    pub count: u64,
    pub revenue: f64,
}

impl ItemStat {
    pub fn add(&mut self, other: &ItemStat) {
        self.count += other.count;
        self.revenue += other.revenue;
    }
}

/// One rollup per calendar day, mutated only by completions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAnalytics {
    /// Business date (YYYY-MM-DD)
    pub date: String,
    pub total_orders: u64,
    pub total_revenue: f64,
    pub online_revenue: f64,
    pub cash_revenue: f64,
    pub online_orders: u64,
    pub cash_orders: u64,
    /// Item name -> sales
    pub top_items: BTreeMap<String, ItemStat>,
}

impl DailyAnalytics {
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Default::default()
        }
    }
}

/// Summary window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Today,
    /// Today and the 6 days before
    Week,
    /// Today and the 29 days before
    Month,
    #[default]
    All,
}

impl Period {
    /// Days before today included in the window, `None` for unbounded
    pub fn lookback_days(&self) -> Option<i64> {
        match self {
            Self::Today => Some(0),
            Self::Week => Some(6),
            Self::Month => Some(29),
            Self::All => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "all" | "" => Ok(Self::All),
            other => Err(format!("Unknown period: {}", other)),
        }
    }
}

/// Sum of the daily rollups inside a period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub period: Period,
    pub total_orders: u64,
    pub total_revenue: f64,
    pub online_revenue: f64,
    pub cash_revenue: f64,
    pub online_orders: u64,
    pub cash_orders: u64,
    pub top_items: BTreeMap<String, ItemStat>,
    /// Raw daily records, oldest first
    pub daily_data: Vec<DailyAnalytics>,
}

impl AnalyticsSummary {
    pub fn from_days(period: Period, days: Vec<DailyAnalytics>) -> Self {
        let mut summary = Self {
            period,
            ..Default::default()
        };
        for day in &days {
            summary.total_orders += day.total_orders;
            summary.total_revenue += day.total_revenue;
            summary.online_revenue += day.online_revenue;
            summary.cash_revenue += day.cash_revenue;
            summary.online_orders += day.online_orders;
            summary.cash_orders += day.cash_orders;
            for (name, stat) in &day.top_items {
                summary.top_items.entry(name.clone()).or_default().add(stat);
            }
        }
        summary.daily_data = days;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str, latte_count: u64) -> DailyAnalytics {
        let mut d = DailyAnalytics::empty(date);
        d.total_orders = 1;
        d.total_revenue = 130.0 * latte_count as f64;
        d.cash_revenue = d.total_revenue;
        d.cash_orders = 1;
        d.top_items.insert(
            "Latte".to_string(),
            ItemStat {
                count: latte_count,
                revenue: d.total_revenue,
            },
        );
        d
    }

    #[test]
    fn test_summary_merges_top_items() {
        let summary =
            AnalyticsSummary::from_days(Period::Week, vec![day("2026-10-01", 2), day("2026-10-02", 3)]);
        assert_eq!(summary.total_orders, 2);
        assert_eq!(summary.total_revenue, 650.0);
        assert_eq!(summary.cash_orders, 2);
        let latte = summary.top_items.get("Latte").unwrap();
        assert_eq!(latte.count, 5);
        assert_eq!(latte.revenue, 650.0);
        assert_eq!(summary.daily_data.len(), 2);
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("week".parse::<Period>(), Ok(Period::Week));
        assert_eq!("".parse::<Period>(), Ok(Period::All));
        assert!("year".parse::<Period>().is_err());
        assert_eq!(Period::Month.lookback_days(), Some(29));
    }
}
