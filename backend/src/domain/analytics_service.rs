//! Loads records for the analytics endpoints and runs the pure
//! [`analytics`](crate::domain::analytics) functions over them.

use chrono::{DateTime, Utc};
use shared::{AnalyticsOverview, AnalyticsSummary, BudgetStatus, PeriodComparison};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::domain::analytics::{self, InsightInput, WindowQuery};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::category::DomainCategory;
use crate::domain::models::transaction::DomainTransaction;
use crate::domain::settings_service::SettingsService;
use crate::domain::transaction_service::TransactionService;
use crate::storage::{CategoryStorage, Connection};

pub const DEFAULT_TREND_MONTHS: u32 = 6;
pub const MAX_TREND_MONTHS: u32 = 60;

#[derive(Clone)]
pub struct AnalyticsService<C: Connection> {
    expense_service: TransactionService<C>,
    deposit_service: TransactionService<C>,
    category_repository: C::CategoryRepository,
    settings_service: SettingsService<C>,
}

impl<C: Connection> AnalyticsService<C> {
    pub fn new(
        connection: Arc<C>,
        expense_service: TransactionService<C>,
        deposit_service: TransactionService<C>,
        settings_service: SettingsService<C>,
    ) -> Self {
        Self {
            expense_service,
            deposit_service,
            category_repository: connection.create_category_repository(),
            settings_service,
        }
    }

    /// Income, spend and balance for one window
    pub async fn summary(&self, query: &WindowQuery, now: DateTime<Utc>) -> DomainResult<AnalyticsSummary> {
        let window = analytics::resolve_window(query, now)?;
        debug!("Analytics summary over {} .. {}", window.start, window.end);

        let all_expenses = self.expense_service.all_records().await?;
        let deposits = self
            .deposit_service
            .records_between(window.start, window.end)
            .await?;
        let settings = self.settings_service.get_or_create_default().await?;
        let categories = self.category_index().await?;

        let in_window = within(&all_expenses, window.start, window.end);
        let expenses = analytics::period_totals(&in_window, window.start, window.end);
        let income = analytics::period_totals(&deposits, window.start, window.end);
        let category_breakdown = analytics::category_breakdown(&in_window, &all_expenses, &categories, now);

        Ok(AnalyticsSummary {
            range: window.range(),
            total_expenses: expenses.total,
            total_income: income.total,
            balance: income.total - expenses.total,
            currency: settings.currency,
            expenses,
            income,
            category_breakdown,
        })
    }

    /// Window-over-window comparison, breakdown, insights and the monthly
    /// series ending with the current month
    pub async fn overview(
        &self,
        query: &WindowQuery,
        months: Option<u32>,
        now: DateTime<Utc>,
    ) -> DomainResult<AnalyticsOverview> {
        let months = months.unwrap_or(DEFAULT_TREND_MONTHS);
        if months == 0 || months > MAX_TREND_MONTHS {
            return Err(DomainError::validation(format!(
                "months must be between 1 and {}",
                MAX_TREND_MONTHS
            )));
        }

        let window = analytics::resolve_window(query, now)?;
        let previous = window.previous();

        let all_expenses = self.expense_service.all_records().await?;
        let settings = self.settings_service.get_or_create_default().await?;
        let categories = self.category_index().await?;

        let current = analytics::period_totals(&all_expenses, window.start, window.end);
        let prior = analytics::period_totals(&all_expenses, previous.start, previous.end);
        let comparison = PeriodComparison {
            current,
            previous: prior,
            spending: analytics::period_change(current.total, prior.total),
            transactions: analytics::period_change(current.count as f64, prior.count as f64),
        };

        let in_window = within(&all_expenses, window.start, window.end);
        let category_breakdown = analytics::category_breakdown(&in_window, &all_expenses, &categories, now);

        let insights = analytics::generate_insights(InsightInput {
            total_spent: current.total,
            transaction_count: current.count,
            spending_change: comparison.spending.percentage,
            breakdown: &category_breakdown,
            currency_symbol: &settings.currency_symbol,
        });

        Ok(AnalyticsOverview {
            range: window.range(),
            comparison,
            top_category: category_breakdown.first().cloned(),
            monthly_trends: analytics::monthly_trends(&all_expenses, months, now),
            category_breakdown,
            insights,
        })
    }

    /// Spend in the window against the configured budget limit
    pub async fn budget_status(&self, query: &WindowQuery, now: DateTime<Utc>) -> DomainResult<BudgetStatus> {
        let window = analytics::resolve_window(query, now)?;
        let expenses = self
            .expense_service
            .records_between(window.start, window.end)
            .await?;
        let settings = self.settings_service.get_or_create_default().await?;

        let spent = analytics::period_totals(&expenses, window.start, window.end).total;
        Ok(analytics::budget_status(settings.budget_limit, spent))
    }

    async fn category_index(&self) -> DomainResult<HashMap<String, DomainCategory>> {
        let categories = self.category_repository.list_categories(None).await?;
        Ok(categories.into_iter().map(|c| (c.id.clone(), c)).collect())
    }
}

fn within(transactions: &[DomainTransaction], start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DomainTransaction> {
    transactions
        .iter()
        .filter(|t| t.falls_within(start, end))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category_service::CategoryService;
    use crate::storage::document::test_utils::TestEnvironment;
    use crate::storage::document::DocumentConnection;
    use chrono::{Duration, TimeZone};
    use shared::{
        AmountInput, CategoryRequest, ChangeDirection, InsightKind, SettingsRequest, TransactionKind,
        TransactionRequest, WarningLevel,
    };

    struct Fixture {
        _env: TestEnvironment,
        categories: CategoryService<DocumentConnection>,
        expenses: TransactionService<DocumentConnection>,
        deposits: TransactionService<DocumentConnection>,
        settings: SettingsService<DocumentConnection>,
        analytics: AnalyticsService<DocumentConnection>,
    }

    impl Fixture {
        async fn new() -> Self {
            let env = TestEnvironment::new().await.unwrap();
            let connection = Arc::new(env.connection.clone());
            let settings = SettingsService::new(connection.clone());
            let expenses = TransactionService::new(connection.clone(), TransactionKind::Expense, settings.clone());
            let deposits = TransactionService::new(connection.clone(), TransactionKind::Deposit, settings.clone());
            Self {
                categories: CategoryService::new(connection.clone()),
                analytics: AnalyticsService::new(connection, expenses.clone(), deposits.clone(), settings.clone()),
                expenses,
                deposits,
                settings,
                _env: env,
            }
        }

        async fn category(&self, name: &str) -> String {
            self.categories
                .create_category(CategoryRequest {
                    name: Some(name.to_string()),
                    icon: Some("📦".to_string()),
                    color: Some("#123456".to_string()),
                    category_type: None,
                })
                .await
                .unwrap()
                .id
        }

        async fn record(&self, service: &TransactionService<DocumentConnection>, amount: f64, category_id: &str, date: DateTime<Utc>) {
            service
                .create(TransactionRequest {
                    amount: Some(AmountInput::Number(amount)),
                    category_id: Some(category_id.to_string()),
                    date: Some(date.to_rfc3339()),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
    }

    fn month_query(month: &str) -> WindowQuery {
        WindowQuery {
            month: Some(month.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_month_summary_scenario() {
        let fixture = Fixture::new().await;
        let food = fixture.category("Food").await;
        fixture
            .expenses
            .create(TransactionRequest {
                amount: Some(AmountInput::Number(100.0)),
                category_id: Some(food.clone()),
                date: Some("2024-01-15".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap();
        let summary = fixture.analytics.summary(&month_query("2024-01"), now).await.unwrap();

        assert_eq!(summary.total_expenses, 100.0);
        assert_eq!(summary.total_income, 0.0);
        assert_eq!(summary.balance, -100.0);
        assert_eq!(summary.currency, "INR");
        assert_eq!(summary.category_breakdown.len(), 1);
        assert_eq!(summary.category_breakdown[0].total, 100.0);
        assert_eq!(summary.category_breakdown[0].percentage, 100.0);
        assert_eq!(summary.range.month.as_deref(), Some("2024-01"));
    }

    #[tokio::test]
    async fn test_summary_includes_income_in_window_only() {
        let fixture = Fixture::new().await;
        let salary = fixture.category("Salary").await;
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();
        fixture.record(&fixture.deposits, 3000.0, &salary, now - Duration::days(3)).await;
        fixture.record(&fixture.deposits, 999.0, &salary, now - Duration::days(45)).await;

        let summary = fixture.analytics.summary(&WindowQuery::default(), now).await.unwrap();

        assert_eq!(summary.total_income, 3000.0);
        assert_eq!(summary.income.count, 1);
        assert_eq!(summary.balance, 3000.0);
    }

    #[tokio::test]
    async fn test_overview_compares_with_previous_window() {
        let fixture = Fixture::new().await;
        let food = fixture.category("Food").await;
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();
        fixture.record(&fixture.expenses, 300.0, &food, now - Duration::days(2)).await;
        fixture.record(&fixture.expenses, 100.0, &food, now - Duration::days(40)).await;

        let overview = fixture
            .analytics
            .overview(&WindowQuery::default(), None, now)
            .await
            .unwrap();

        assert_eq!(overview.comparison.current.total, 300.0);
        assert_eq!(overview.comparison.previous.total, 100.0);
        assert_eq!(overview.comparison.spending.percentage, 200.0);
        assert_eq!(overview.comparison.spending.direction, ChangeDirection::Increase);
        assert_eq!(overview.comparison.transactions.direction, ChangeDirection::Stable);
        assert_eq!(overview.top_category.map(|c| c.category_id), Some(food));
        assert_eq!(overview.monthly_trends.len(), 6);
        assert_eq!(overview.monthly_trends[5].month, "2024-05");

        let kinds: Vec<InsightKind> = overview.insights.iter().map(|i| i.kind).collect();
        assert!(kinds.contains(&InsightKind::SpendingIncrease));
        assert!(kinds.contains(&InsightKind::LowActivity));
        assert!(kinds.contains(&InsightKind::CategoryConcentration));

        let bad_months = fixture.analytics.overview(&WindowQuery::default(), Some(0), now).await;
        assert!(matches!(bad_months, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_budget_status_uses_settings_limit() {
        let fixture = Fixture::new().await;
        let food = fixture.category("Food").await;
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();
        fixture.record(&fixture.expenses, 950.0, &food, now - Duration::days(1)).await;

        let status = fixture.analytics.budget_status(&WindowQuery::default(), now).await.unwrap();
        assert_eq!(status.budget_limit, 1000.0);
        assert_eq!(status.warning_level, WarningLevel::Critical);
        assert_eq!(status.remaining_budget, 50.0);

        fixture
            .settings
            .update_settings(SettingsRequest { budget_limit: Some(0.0), ..Default::default() })
            .await
            .unwrap();
        let unlimited = fixture.analytics.budget_status(&WindowQuery::default(), now).await.unwrap();
        assert_eq!(unlimited.warning_level, WarningLevel::Safe);
        assert!(unlimited.is_over_budget);
    }
}
