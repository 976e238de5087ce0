//! Rule-based spending insights.

use shared::{CategoryBreakdown, Insight, InsightAction, InsightKind, InsightSeverity};

/// Spend above this in one window raises a high-spending warning
pub const HIGH_SPENDING_THRESHOLD: f64 = 50_000.0;
/// Share of spend (percent) in the top category that counts as concentrated
pub const CONCENTRATION_PERCENT: f64 = 50.0;
/// Period-over-period swing (percent) worth calling out
pub const SWING_PERCENT: f64 = 20.0;
/// Fewer transactions than this in a window reads as low activity
pub const LOW_ACTIVITY_COUNT: usize = 5;

/// Inputs the rules look at
#[derive(Debug, Clone, Copy)]
pub struct InsightInput<'a> {
    pub total_spent: f64,
    pub transaction_count: usize,
    /// Percentage change of spend against the previous window
    pub spending_change: f64,
    /// Sorted largest first
    pub breakdown: &'a [CategoryBreakdown],
    pub currency_symbol: &'a str,
}

pub fn generate_insights(input: InsightInput<'_>) -> Vec<Insight> {
    let mut insights = Vec::new();

    if input.total_spent > HIGH_SPENDING_THRESHOLD {
        insights.push(Insight {
            kind: InsightKind::HighSpending,
            severity: InsightSeverity::Warning,
            title: "High Spending Alert".to_string(),
            message: format!(
                "You've spent {}{:.2} this period. Consider reviewing your budget.",
                input.currency_symbol, input.total_spent
            ),
            action: Some(action("View Expenses", "/expenses")),
        });
    }

    if let Some(top) = input.breakdown.first() {
        if top.percentage > CONCENTRATION_PERCENT {
            insights.push(Insight {
                kind: InsightKind::CategoryConcentration,
                severity: InsightSeverity::Info,
                title: "Category Concentration".to_string(),
                message: format!(
                    "{:.1}% of spending is in {}. Consider diversifying.",
                    top.percentage,
                    top.name.as_deref().unwrap_or("one category")
                ),
                action: None,
            });
        }
    }

    if input.spending_change > SWING_PERCENT {
        insights.push(Insight {
            kind: InsightKind::SpendingIncrease,
            severity: InsightSeverity::Warning,
            title: "Spending Increased".to_string(),
            message: format!(
                "Your spending increased by {:.1}% compared to the previous period.",
                input.spending_change
            ),
            action: None,
        });
    } else if input.spending_change < -SWING_PERCENT {
        insights.push(Insight {
            kind: InsightKind::SpendingDecrease,
            severity: InsightSeverity::Success,
            title: "Great Progress!".to_string(),
            message: format!(
                "You reduced spending by {:.1}% compared to the previous period.",
                input.spending_change.abs()
            ),
            action: None,
        });
    }

    if input.transaction_count < LOW_ACTIVITY_COUNT {
        insights.push(Insight {
            kind: InsightKind::LowActivity,
            severity: InsightSeverity::Info,
            title: "Low Activity".to_string(),
            message: "Consider logging more expenses for better insights.".to_string(),
            action: Some(action("Add Expense", "/expenses")),
        });
    }

    insights
}

fn action(text: &str, link: &str) -> InsightAction {
    InsightAction {
        text: text.to_string(),
        link: link.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{CategoryTrend, TrendDirection};

    fn slice(name: &str, percentage: f64) -> CategoryBreakdown {
        CategoryBreakdown {
            category_id: "c1".to_string(),
            name: Some(name.to_string()),
            icon: None,
            color: None,
            total: 0.0,
            count: 1,
            average: 0.0,
            percentage,
            trend: CategoryTrend { direction: TrendDirection::Stable, change_percent: None },
        }
    }

    fn kinds(insights: &[Insight]) -> Vec<InsightKind> {
        insights.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_quiet_period_yields_no_insights() {
        let breakdown = vec![slice("Food", 40.0)];
        let insights = generate_insights(InsightInput {
            total_spent: 1200.0,
            transaction_count: 12,
            spending_change: 10.0,
            breakdown: &breakdown,
            currency_symbol: "₹",
        });
        assert!(insights.is_empty());
    }

    #[test]
    fn test_every_rule_can_fire() {
        let breakdown = vec![slice("Rent", 72.5)];
        let insights = generate_insights(InsightInput {
            total_spent: 60_000.0,
            transaction_count: 3,
            spending_change: 35.0,
            breakdown: &breakdown,
            currency_symbol: "$",
        });

        assert_eq!(
            kinds(&insights),
            vec![
                InsightKind::HighSpending,
                InsightKind::CategoryConcentration,
                InsightKind::SpendingIncrease,
                InsightKind::LowActivity,
            ]
        );
        assert_eq!(
            insights[0].message,
            "You've spent $60000.00 this period. Consider reviewing your budget."
        );
        assert_eq!(insights[1].message, "72.5% of spending is in Rent. Consider diversifying.");
    }

    #[test]
    fn test_spending_drop_is_a_success() {
        let insights = generate_insights(InsightInput {
            total_spent: 100.0,
            transaction_count: 10,
            spending_change: -40.0,
            breakdown: &[],
            currency_symbol: "₹",
        });

        assert_eq!(kinds(&insights), vec![InsightKind::SpendingDecrease]);
        assert_eq!(insights[0].severity, InsightSeverity::Success);
        assert!(insights[0].message.contains("40.0%"));
    }
}
