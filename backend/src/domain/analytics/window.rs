//! Time window resolution for analytics queries.
//!
//! Selectors are checked in a fixed order: an explicit date range, then a
//! calendar `month`, then a rolling `period`. With no selector the window is
//! the trailing 30 days. Malformed selectors are rejected, never corrected.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;
use shared::AnalyticsRange;

use crate::domain::dates;
use crate::domain::errors::{DomainError, DomainResult};

pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Raw selector query parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowQuery {
    pub month: Option<String>,
    pub period: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Named rolling window ending at "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollingPeriod {
    Week,
    Month,
    Quarter,
    Year,
}

impl RollingPeriod {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "week" => Some(RollingPeriod::Week),
            "month" => Some(RollingPeriod::Month),
            "quarter" => Some(RollingPeriod::Quarter),
            "year" => Some(RollingPeriod::Year),
            _ => None,
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            RollingPeriod::Week => 7,
            RollingPeriod::Month => 30,
            RollingPeriod::Quarter => 90,
            RollingPeriod::Year => 365,
        }
    }
}

/// A resolved `[start, end]` interval, both ends inclusive
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// The `month` selector, echoed back when it was used
    pub month: Option<String>,
    /// The `period` selector, echoed back when it was used
    pub period: Option<String>,
}

impl AnalyticsWindow {
    fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end, month: None, period: None }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// The equal-length window that ends just before this one starts
    pub fn previous(&self) -> AnalyticsWindow {
        let length = self.end - self.start;
        let end = self.start - Duration::milliseconds(1);
        AnalyticsWindow::between(end - length, end)
    }

    pub fn range(&self) -> AnalyticsRange {
        AnalyticsRange {
            month: self.month.clone(),
            period: self.period.clone(),
            start_date: self.start,
            end_date: self.end,
        }
    }
}

pub fn resolve_window(query: &WindowQuery, now: DateTime<Utc>) -> DomainResult<AnalyticsWindow> {
    let start_date = present(&query.start_date);
    let end_date = present(&query.end_date);

    if start_date.is_some() || end_date.is_some() {
        let (start_raw, end_raw) = match (start_date, end_date) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(DomainError::validation("Both startDate and endDate are required")),
        };
        return explicit_window(start_raw, end_raw);
    }

    if let Some(month) = present(&query.month) {
        let first = parse_month(month)
            .ok_or_else(|| DomainError::validation("Invalid month format. Use YYYY-MM"))?;
        let mut window = AnalyticsWindow::between(
            dates::start_of_day(first),
            dates::end_of_day(dates::last_of_month(first)),
        );
        window.month = Some(month.to_string());
        return Ok(window);
    }

    if let Some(period) = present(&query.period) {
        let rolling = RollingPeriod::parse(period)
            .ok_or_else(|| DomainError::validation("Invalid period. Use week|month|quarter|year"))?;
        let mut window = AnalyticsWindow::between(now - Duration::days(rolling.days()), now);
        window.period = Some(period.to_string());
        return Ok(window);
    }

    Ok(AnalyticsWindow::between(now - Duration::days(DEFAULT_WINDOW_DAYS), now))
}

fn explicit_window(start_raw: &str, end_raw: &str) -> DomainResult<AnalyticsWindow> {
    let invalid = || DomainError::validation("Invalid startDate or endDate");
    let start = dates::parse_date_input(start_raw).ok_or_else(invalid)?;
    let end = dates::parse_date_input(end_raw).ok_or_else(invalid)?;
    let end = dates::end_of_day(end.date_naive());

    if start > end {
        return Err(DomainError::validation("startDate must be before or equal to endDate"));
    }
    Ok(AnalyticsWindow::between(start, end))
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Strict `YYYY-MM` with a real month number
fn parse_month(token: &str) -> Option<NaiveDate> {
    let bytes = token.as_bytes();
    let well_formed = bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..].iter().all(u8::is_ascii_digit);
    if !well_formed {
        return None;
    }

    let year: i32 = token[..4].parse().ok()?;
    let month: u32 = token[5..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn query(month: Option<&str>, period: Option<&str>, start: Option<&str>, end: Option<&str>) -> WindowQuery {
        WindowQuery {
            month: month.map(str::to_string),
            period: period.map(str::to_string),
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
        }
    }

    #[test]
    fn test_month_expands_to_calendar_month() {
        let window = resolve_window(&query(Some("2024-02"), None, None, None), now()).unwrap();

        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        assert_eq!(window.end, dates::end_of_day(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert_eq!(window.month.as_deref(), Some("2024-02"));
        assert_eq!(window.period, None);
    }

    #[test]
    fn test_explicit_range_wins_and_end_is_end_of_day() {
        let window = resolve_window(
            &query(Some("2024-02"), Some("week"), Some("2024-01-01"), Some("2024-01-10")),
            now(),
        )
        .unwrap();

        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(window.end, dates::end_of_day(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()));
        assert_eq!(window.month, None);
    }

    #[test]
    fn test_rolling_periods() {
        for (name, days) in [("week", 7), ("month", 30), ("QUARTER", 90), ("year", 365)] {
            let window = resolve_window(&query(None, Some(name), None, None), now()).unwrap();
            assert_eq!(window.end, now());
            assert_eq!(window.end - window.start, Duration::days(days));
        }
    }

    #[test]
    fn test_default_is_trailing_thirty_days() {
        let window = resolve_window(&WindowQuery::default(), now()).unwrap();
        assert_eq!(window.start, now() - Duration::days(30));
        assert_eq!(window.end, now());
    }

    #[test]
    fn test_invalid_selectors_are_rejected() {
        for bad in [
            query(Some("2024-1"), None, None, None),
            query(Some("2024-13"), None, None, None),
            query(Some("24-01-01"), None, None, None),
            query(None, Some("fortnight"), None, None),
            query(None, None, Some("2024-02-01"), Some("2024-01-01")),
            query(None, None, Some("not a date"), Some("2024-01-01")),
            query(None, None, Some("2024-01-01"), None),
        ] {
            assert!(matches!(resolve_window(&bad, now()), Err(DomainError::Validation(_))));
        }
    }

    #[test]
    fn test_previous_window_is_adjacent_and_equal_length() {
        let window = resolve_window(&query(None, Some("week"), None, None), now()).unwrap();
        let previous = window.previous();

        assert_eq!(previous.end - previous.start, window.end - window.start);
        assert!(previous.end < window.start);
        assert_eq!(window.start - previous.end, Duration::milliseconds(1));
    }
}
