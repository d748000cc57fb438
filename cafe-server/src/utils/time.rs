//! Business timezone helpers
//!
//! Analytics days are calendar dates in the café's timezone, keyed as
//! `YYYY-MM-DD` strings (lexicographic order == chronological order).

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use shared::models::Period;

/// Parse an IANA timezone name, falling back to UTC
pub fn parse_timezone(name: &str) -> Tz {
    name.parse::<Tz>().unwrap_or_else(|e| {
        tracing::warn!("Invalid BUSINESS_TIMEZONE '{}': {}, falling back to UTC", name, e);
        Tz::UTC
    })
}

/// Calendar date of an instant in the business timezone
pub fn business_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today in the business timezone
pub fn today(tz: Tz) -> NaiveDate {
    business_date(Utc::now(), tz)
}

/// Storage key of a date
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// First date included in `period` when today is `today`; `None` is unbounded
pub fn period_start(period: Period, today: NaiveDate) -> Option<NaiveDate> {
    period
        .lookback_days()
        .map(|days| today - Duration::days(days))
}
