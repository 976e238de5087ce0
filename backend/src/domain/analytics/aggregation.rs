//! Aggregation over transaction sets.
//!
//! Every function is a linear scan over the slice it is given; windowing is
//! applied here, not by the caller, so the same record set can feed several
//! aggregates.

use chrono::{DateTime, Duration, Utc};
use shared::{
    BudgetStatus, CategoryBreakdown, CategoryTrend, ChangeDirection, MonthlyTrend, PeriodChange,
    PeriodTotals, TrendDirection, WarningLevel,
};
use std::collections::HashMap;

use crate::domain::dates;
use crate::domain::models::category::DomainCategory;
use crate::domain::models::transaction::DomainTransaction;

/// Dead zone of the period-over-period direction, in percent
pub const CHANGE_THRESHOLD_PERCENT: f64 = 5.0;

/// Dead zone of the per-category trend, in percent
pub const TREND_THRESHOLD_PERCENT: f64 = 10.0;

pub const TREND_RECENT_DAYS: i64 = 30;
pub const TREND_PRIOR_DAYS: i64 = 60;

/// Totals over records dated within `[start, end]`
pub fn period_totals(
    transactions: &[DomainTransaction],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> PeriodTotals {
    let (total, count) = transactions
        .iter()
        .filter(|t| t.falls_within(start, end))
        .fold((0.0, 0usize), |(total, count), t| (total + t.amount, count + 1));

    totals(total, count)
}

fn totals(total: f64, count: usize) -> PeriodTotals {
    PeriodTotals {
        total,
        count,
        average: if count > 0 { total / count as f64 } else { 0.0 },
    }
}

/// `(current - previous) / previous * 100`; a zero baseline reads as 100%
/// growth when anything happened and 0 otherwise
pub fn percentage_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    (current - previous) / previous * 100.0
}

pub fn change_direction(percentage: f64) -> ChangeDirection {
    if percentage > CHANGE_THRESHOLD_PERCENT {
        ChangeDirection::Increase
    } else if percentage < -CHANGE_THRESHOLD_PERCENT {
        ChangeDirection::Decrease
    } else {
        ChangeDirection::Stable
    }
}

pub fn period_change(current: f64, previous: f64) -> PeriodChange {
    let percentage = percentage_change(current, previous);
    PeriodChange {
        amount: current - previous,
        percentage,
        direction: change_direction(percentage),
    }
}

/// Recent (last 30 days) against prior (31-60 days ago) spend
pub fn category_trend<'a, I>(transactions: I, now: DateTime<Utc>) -> CategoryTrend
where
    I: IntoIterator<Item = &'a DomainTransaction>,
{
    let recent_start = now - Duration::days(TREND_RECENT_DAYS);
    let prior_start = now - Duration::days(TREND_PRIOR_DAYS);

    let (mut recent, mut prior) = (0.0, 0.0);
    for t in transactions {
        if t.date >= recent_start {
            recent += t.amount;
        } else if t.date >= prior_start {
            prior += t.amount;
        }
    }

    trend_between(recent, prior)
}

pub fn trend_between(recent: f64, prior: f64) -> CategoryTrend {
    let flat = |direction| CategoryTrend { direction, change_percent: None };

    match (recent > 0.0, prior > 0.0) {
        (false, false) => flat(TrendDirection::Stable),
        (true, false) => flat(TrendDirection::Increasing),
        (false, true) => flat(TrendDirection::Decreasing),
        (true, true) => {
            let change = (recent - prior) / prior * 100.0;
            let direction = if change > TREND_THRESHOLD_PERCENT {
                TrendDirection::Increasing
            } else if change < -TREND_THRESHOLD_PERCENT {
                TrendDirection::Decreasing
            } else {
                TrendDirection::Stable
            };
            CategoryTrend { direction, change_percent: Some(change) }
        }
    }
}

/// Group by category id, largest total first.
///
/// `trend_source` is the record set each category's trend is computed from;
/// it is usually wider than `transactions` so a narrow window still has a
/// prior period to compare against.
pub fn category_breakdown(
    transactions: &[DomainTransaction],
    trend_source: &[DomainTransaction],
    categories: &HashMap<String, DomainCategory>,
    now: DateTime<Utc>,
) -> Vec<CategoryBreakdown> {
    let mut groups: HashMap<&str, (f64, usize)> = HashMap::new();
    for t in transactions {
        let entry = groups.entry(t.category_id.as_str()).or_insert((0.0, 0));
        entry.0 += t.amount;
        entry.1 += 1;
    }

    let grand_total: f64 = groups.values().map(|(total, _)| total).sum();

    let mut breakdown: Vec<CategoryBreakdown> = groups
        .into_iter()
        .map(|(category_id, (total, count))| {
            let category = categories.get(category_id);
            let trend = category_trend(
                trend_source.iter().filter(|t| t.category_id == category_id),
                now,
            );
            CategoryBreakdown {
                category_id: category_id.to_string(),
                name: category.map(|c| c.name.clone()),
                icon: category.map(|c| c.icon.clone()),
                color: category.map(|c| c.color.clone()),
                total,
                count,
                average: total / count as f64,
                percentage: if grand_total > 0.0 { total / grand_total * 100.0 } else { 0.0 },
                trend,
            }
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category_id.cmp(&b.category_id))
    });
    breakdown
}

/// One entry per calendar month for the `months` months ending with the
/// month containing `now`, oldest first
pub fn monthly_trends(transactions: &[DomainTransaction], months: u32, now: DateTime<Utc>) -> Vec<MonthlyTrend> {
    let current_month = dates::first_of_month(now.date_naive());

    (0..months)
        .rev()
        .map(|offset| {
            let first = dates::months_before(current_month, offset);
            let start = dates::start_of_day(first);
            let end = dates::end_of_day(dates::last_of_month(first));
            let period = period_totals(transactions, start, end);

            MonthlyTrend {
                month: first.format("%Y-%m").to_string(),
                label: first.format("%b %Y").to_string(),
                total: period.total,
                count: period.count,
                average: period.average,
            }
        })
        .collect()
}

/// Consumption tier: below 70% safe, below 90% warning, below 100% critical
pub fn warning_level(ratio: f64) -> WarningLevel {
    if ratio >= 1.0 {
        WarningLevel::Over
    } else if ratio >= 0.9 {
        WarningLevel::Critical
    } else if ratio >= 0.7 {
        WarningLevel::Warning
    } else {
        WarningLevel::Safe
    }
}

pub fn budget_status(budget_limit: f64, current_expenses: f64) -> BudgetStatus {
    let ratio = if budget_limit > 0.0 { current_expenses / budget_limit } else { 0.0 };
    let remaining_budget = budget_limit - current_expenses;

    BudgetStatus {
        budget_limit,
        current_expenses,
        remaining_budget,
        is_over_budget: remaining_budget < 0.0,
        warning_level: warning_level(ratio),
    }
}
