//! Expense and deposit management.
//!
//! Both kinds share this service; an instance is bound to one collection
//! through its [`TransactionKind`]. Incoming payloads go through
//! [`TransactionDraft::normalize`] first, which folds the accepted field
//! aliases into one canonical shape before any validation runs.

use chrono::{DateTime, Utc};
use shared::{AmountInput, CategoryType, TransactionKind, TransactionRequest};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::dates;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::category::DomainCategory;
use crate::domain::models::transaction::{
    CategoryTotals, DomainTransaction, ResolvedTransaction, TransactionSummaryModel,
};
use crate::domain::settings_service::{is_supported_currency, SettingsService};
use crate::storage::{CategoryStorage, Connection, TransactionStorage};

const RECENT_LIMIT: usize = 5;

/// Canonical view of a [`TransactionRequest`] with aliases resolved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionDraft {
    pub title: Option<String>,
    pub amount: Option<AmountInput>,
    pub category_id: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub currency: Option<String>,
}

impl TransactionDraft {
    /// `category` wins over `categoryId`; deposits also read `source` as the
    /// title. Blank strings count as absent.
    pub fn normalize(kind: TransactionKind, request: TransactionRequest) -> Self {
        let title_alias = match kind {
            TransactionKind::Deposit => non_blank(request.source),
            TransactionKind::Expense => None,
        };

        Self {
            title: non_blank(request.title).or(title_alias),
            amount: request.amount,
            category_id: non_blank(request.category).or_else(|| non_blank(request.category_id)),
            date: non_blank(request.date),
            description: non_blank(request.description),
            currency: non_blank(request.currency),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn positive_amount(amount: &AmountInput) -> DomainResult<f64> {
    match amount.value() {
        Some(value) if value > 0.0 => Ok(value),
        _ => Err(DomainError::validation("Amount must be a positive number")),
    }
}

fn parse_date(raw: &str) -> DomainResult<DateTime<Utc>> {
    dates::parse_date_input(raw).ok_or_else(|| DomainError::validation("Invalid date"))
}

fn validate_currency(code: &str) -> DomainResult<()> {
    if is_supported_currency(code) {
        Ok(())
    } else {
        Err(DomainError::validation("Invalid currency"))
    }
}

#[derive(Clone)]
pub struct TransactionService<C: Connection> {
    kind: TransactionKind,
    transaction_repository: C::TransactionRepository,
    category_repository: C::CategoryRepository,
    settings_service: SettingsService<C>,
}

impl<C: Connection> TransactionService<C> {
    pub fn new(connection: Arc<C>, kind: TransactionKind, settings_service: SettingsService<C>) -> Self {
        Self {
            kind,
            transaction_repository: connection.create_transaction_repository(kind),
            category_repository: connection.create_category_repository(),
            settings_service,
        }
    }

    fn not_found(&self) -> DomainError {
        DomainError::not_found(format!("{} not found", self.kind.label()))
    }

    pub async fn list(&self) -> DomainResult<Vec<ResolvedTransaction>> {
        let transactions = self.transaction_repository.list_transactions().await?;
        self.resolve_all(transactions).await
    }

    pub async fn get(&self, id: &str) -> DomainResult<ResolvedTransaction> {
        let transaction = self
            .transaction_repository
            .get_transaction(id)
            .await?
            .ok_or_else(|| self.not_found())?;
        self.resolve(transaction).await
    }

    pub async fn list_by_category(&self, category_id: &str) -> DomainResult<Vec<ResolvedTransaction>> {
        let transactions = self
            .transaction_repository
            .list_transactions_by_category(category_id)
            .await?;
        self.resolve_all(transactions).await
    }

    /// Both bounds are required; a date-only `end_date` covers that whole day
    pub async fn list_by_date_range(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> DomainResult<Vec<ResolvedTransaction>> {
        let (start_raw, end_raw) = match (
            start_date.filter(|s| !s.trim().is_empty()),
            end_date.filter(|s| !s.trim().is_empty()),
        ) {
            (Some(start), Some(end)) => (start.trim(), end.trim()),
            _ => return Err(DomainError::validation("Start date and end date are required")),
        };

        let invalid = || DomainError::validation("Invalid startDate or endDate");
        let start = dates::parse_date_input(start_raw).ok_or_else(invalid)?;
        let mut end = dates::parse_date_input(end_raw).ok_or_else(invalid)?;
        if dates::is_date_only(end_raw) {
            end = dates::end_of_day(end.date_naive());
        }
        if start > end {
            return Err(DomainError::validation("startDate must be before or equal to endDate"));
        }

        let transactions = self
            .transaction_repository
            .list_transactions_between(start, end)
            .await?;
        self.resolve_all(transactions).await
    }

    pub async fn create(&self, request: TransactionRequest) -> DomainResult<ResolvedTransaction> {
        let draft = TransactionDraft::normalize(self.kind, request);

        let (amount, category_id) = match (&draft.amount, &draft.category_id) {
            (Some(amount), Some(category_id)) => (amount, category_id.clone()),
            _ => return Err(DomainError::validation("Amount and category are required")),
        };
        let amount = positive_amount(amount)?;

        let category = self
            .category_repository
            .get_category(&category_id)
            .await?
            .ok_or_else(DomainError::invalid_category)?;
        if category.category_type != expected_category_type(self.kind) {
            // Permitted: categories are shared freely across kinds
            info!(
                "{} uses {} category '{}'",
                self.kind.label(),
                category.category_type,
                category.name
            );
        }

        let now = Utc::now();
        let date = match draft.date.as_deref() {
            Some(raw) => parse_date(raw)?,
            None => now,
        };
        let currency = match draft.currency {
            Some(code) => {
                validate_currency(&code)?;
                code
            }
            None => self.settings_service.get_or_create_default().await?.currency,
        };

        let title = draft
            .title
            .clone()
            .or_else(|| draft.description.clone())
            .unwrap_or_else(|| self.kind.label().to_string());

        let transaction = DomainTransaction {
            id: Uuid::new_v4().to_string(),
            title,
            amount,
            category_id,
            date,
            description: draft.description.unwrap_or_default(),
            currency,
            created_at: now,
            updated_at: now,
        };

        self.transaction_repository.store_transaction(&transaction).await?;
        info!(
            "Created {} {} amount={} category={}",
            self.kind.label(),
            transaction.id,
            transaction.amount,
            transaction.category_id
        );

        Ok(ResolvedTransaction {
            transaction,
            category: Some(category),
        })
    }

    /// Fields absent from the payload keep their stored values
    pub async fn update(&self, id: &str, request: TransactionRequest) -> DomainResult<ResolvedTransaction> {
        let existing = self
            .transaction_repository
            .get_transaction(id)
            .await?
            .ok_or_else(|| self.not_found())?;
        let draft = TransactionDraft::normalize(self.kind, request);

        let amount = match &draft.amount {
            Some(amount) => positive_amount(amount)?,
            None => existing.amount,
        };

        let category_id = draft.category_id.unwrap_or_else(|| existing.category_id.clone());
        if category_id != existing.category_id
            && self.category_repository.get_category(&category_id).await?.is_none()
        {
            return Err(DomainError::invalid_category());
        }

        let date = match draft.date.as_deref() {
            Some(raw) => parse_date(raw)?,
            None => existing.date,
        };
        let currency = match draft.currency {
            Some(code) => {
                validate_currency(&code)?;
                code
            }
            None => existing.currency.clone(),
        };

        let updated = DomainTransaction {
            title: draft.title.unwrap_or_else(|| existing.title.clone()),
            amount,
            category_id,
            date,
            description: draft.description.unwrap_or_else(|| existing.description.clone()),
            currency,
            updated_at: Utc::now(),
            ..existing
        };

        self.transaction_repository.update_transaction(&updated).await?;
        info!("Updated {} {}", self.kind.label(), updated.id);
        self.resolve(updated).await
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        if !self.transaction_repository.delete_transaction(id).await? {
            return Err(self.not_found());
        }
        Ok(())
    }

    pub async fn clear_all(&self) -> DomainResult<usize> {
        Ok(self.transaction_repository.delete_all_transactions().await?)
    }

    /// Every record of the collection, in storage order
    pub async fn all_records(&self) -> DomainResult<Vec<DomainTransaction>> {
        Ok(self.transaction_repository.list_transactions().await?)
    }

    /// Records dated within `[start, end]`
    pub async fn records_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<DomainTransaction>> {
        Ok(self
            .transaction_repository
            .list_transactions_between(start, end)
            .await?)
    }

    pub async fn summary(&self) -> DomainResult<TransactionSummaryModel> {
        let transactions = self.transaction_repository.list_transactions().await?;
        let categories = self.category_index().await?;

        let mut category_totals: BTreeMap<String, CategoryTotals> = BTreeMap::new();
        let mut monthly_totals: BTreeMap<String, f64> = BTreeMap::new();
        let mut total = 0.0;

        for transaction in &transactions {
            total += transaction.amount;

            let entry = category_totals
                .entry(transaction.category_id.clone())
                .or_insert_with(|| CategoryTotals {
                    category: categories.get(&transaction.category_id).cloned(),
                    total: 0.0,
                    count: 0,
                });
            entry.total += transaction.amount;
            entry.count += 1;

            *monthly_totals
                .entry(transaction.date.format("%Y-%m").to_string())
                .or_insert(0.0) += transaction.amount;
        }

        let mut recent = transactions.clone();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(RECENT_LIMIT);
        let recent = recent
            .into_iter()
            .map(|transaction| {
                let category = categories.get(&transaction.category_id).cloned();
                ResolvedTransaction { transaction, category }
            })
            .collect();

        Ok(TransactionSummaryModel {
            total,
            count: transactions.len(),
            category_count: categories.len(),
            category_totals,
            monthly_totals,
            recent,
        })
    }

    async fn category_index(&self) -> DomainResult<HashMap<String, DomainCategory>> {
        let categories = self.category_repository.list_categories(None).await?;
        Ok(categories.into_iter().map(|c| (c.id.clone(), c)).collect())
    }

    async fn resolve(&self, transaction: DomainTransaction) -> DomainResult<ResolvedTransaction> {
        let category = self
            .category_repository
            .get_category(&transaction.category_id)
            .await?;
        if category.is_none() {
            warn!(
                "{} {} references missing category {}",
                self.kind.label(),
                transaction.id,
                transaction.category_id
            );
        }
        Ok(ResolvedTransaction { transaction, category })
    }

    async fn resolve_all(&self, transactions: Vec<DomainTransaction>) -> DomainResult<Vec<ResolvedTransaction>> {
        let categories = self.category_index().await?;
        Ok(transactions
            .into_iter()
            .map(|transaction| {
                let category = categories.get(&transaction.category_id).cloned();
                ResolvedTransaction { transaction, category }
            })
            .collect())
    }
}

fn expected_category_type(kind: TransactionKind) -> CategoryType {
    match kind {
        TransactionKind::Expense => CategoryType::Expense,
        TransactionKind::Deposit => CategoryType::Income,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category_service::CategoryService;
    use crate::storage::document::test_utils::TestEnvironment;
    use crate::storage::document::DocumentConnection;
    use chrono::TimeZone;
    use shared::CategoryRequest;

    struct Fixture {
        env: TestEnvironment,
        categories: CategoryService<DocumentConnection>,
        settings: SettingsService<DocumentConnection>,
    }

    impl Fixture {
        async fn new() -> Self {
            let env = TestEnvironment::new().await.unwrap();
            let connection = Arc::new(env.connection.clone());
            Self {
                categories: CategoryService::new(connection.clone()),
                settings: SettingsService::new(connection),
                env,
            }
        }

        fn service(&self, kind: TransactionKind) -> TransactionService<DocumentConnection> {
            TransactionService::new(Arc::new(self.env.connection.clone()), kind, self.settings.clone())
        }

        async fn category(&self, name: &str) -> DomainCategory {
            self.categories
                .create_category(CategoryRequest {
                    name: Some(name.to_string()),
                    icon: Some("🍔".to_string()),
                    color: Some("#FF6B6B".to_string()),
                    category_type: None,
                })
                .await
                .unwrap()
        }
    }

    fn request(amount: AmountInput, category_id: &str) -> TransactionRequest {
        TransactionRequest {
            amount: Some(amount),
            category_id: Some(category_id.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_folds_aliases() {
        let deposit = TransactionDraft::normalize(
            TransactionKind::Deposit,
            TransactionRequest {
                source: Some(" Salary ".to_string()),
                category: Some("c1".to_string()),
                category_id: Some("c2".to_string()),
                description: Some("   ".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(deposit.title.as_deref(), Some("Salary"));
        assert_eq!(deposit.category_id.as_deref(), Some("c1"));
        assert_eq!(deposit.description, None);

        let expense = TransactionDraft::normalize(
            TransactionKind::Expense,
            TransactionRequest {
                source: Some("ignored".to_string()),
                category_id: Some("c2".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(expense.title, None);
        assert_eq!(expense.category_id.as_deref(), Some("c2"));
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let fixture = Fixture::new().await;
        let food = fixture.category("Food").await;
        let expenses = fixture.service(TransactionKind::Expense);

        let created = expenses
            .create(request(AmountInput::Text("42.5".to_string()), &food.id))
            .await
            .unwrap();

        assert_eq!(created.transaction.title, "Expense");
        assert_eq!(created.transaction.amount, 42.5);
        assert_eq!(created.transaction.currency, "INR");
        assert_eq!(created.category.map(|c| c.name), Some("Food".to_string()));

        let mut described = request(AmountInput::Number(3.0), &food.id);
        described.description = Some("Coffee".to_string());
        described.date = Some("2024-01-15".to_string());
        let coffee = expenses.create(described).await.unwrap();
        assert_eq!(coffee.transaction.title, "Coffee");
        assert_eq!(coffee.transaction.date, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let fixture = Fixture::new().await;
        let food = fixture.category("Food").await;
        let expenses = fixture.service(TransactionKind::Expense);

        for amount in [AmountInput::Number(-5.0), AmountInput::Number(0.0), AmountInput::Text("abc".to_string())] {
            let result = expenses.create(request(amount, &food.id)).await;
            assert!(matches!(result, Err(DomainError::Validation(_))));
        }

        let missing = expenses
            .create(TransactionRequest { amount: Some(AmountInput::Number(5.0)), ..Default::default() })
            .await;
        assert!(matches!(missing, Err(DomainError::Validation(_))));

        let dangling = expenses.create(request(AmountInput::Number(5.0), "no-such-category")).await;
        assert!(matches!(dangling, Err(DomainError::Referential { .. })));

        let mut bad_currency = request(AmountInput::Number(5.0), &food.id);
        bad_currency.currency = Some("DOGE".to_string());
        assert!(matches!(expenses.create(bad_currency).await, Err(DomainError::Validation(_))));

        assert!(expenses.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deposit_title_from_source() {
        let fixture = Fixture::new().await;
        let salary = fixture.category("Salary").await;
        let deposits = fixture.service(TransactionKind::Deposit);

        let mut payload = request(AmountInput::Number(1000.0), &salary.id);
        payload.source = Some("Paycheck".to_string());
        let created = deposits.create(payload).await.unwrap();

        assert_eq!(created.transaction.title, "Paycheck");
        assert_eq!(fixture.service(TransactionKind::Expense).list().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_update_keeps_absent_fields() {
        let fixture = Fixture::new().await;
        let food = fixture.category("Food").await;
        let rent = fixture.category("Rent").await;
        let expenses = fixture.service(TransactionKind::Expense);

        let mut payload = request(AmountInput::Number(20.0), &food.id);
        payload.title = Some("Groceries".to_string());
        payload.description = Some("weekly".to_string());
        let created = expenses.create(payload).await.unwrap().transaction;

        let updated = expenses
            .update(
                &created.id,
                TransactionRequest {
                    amount: Some(AmountInput::Number(25.0)),
                    category: Some(rent.id.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.transaction.amount, 25.0);
        assert_eq!(updated.transaction.title, "Groceries");
        assert_eq!(updated.transaction.description, "weekly");
        assert_eq!(updated.transaction.category_id, rent.id);
        assert_eq!(updated.transaction.created_at, created.created_at);

        let negative = expenses
            .update(&created.id, TransactionRequest { amount: Some(AmountInput::Number(-1.0)), ..Default::default() })
            .await;
        assert!(matches!(negative, Err(DomainError::Validation(_))));

        let missing = expenses.update("missing", TransactionRequest::default()).await;
        assert!(matches!(missing, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_date_range_requires_valid_bounds() {
        let fixture = Fixture::new().await;
        let food = fixture.category("Food").await;
        let expenses = fixture.service(TransactionKind::Expense);
        for date in ["2024-01-10", "2024-01-31T18:30:00Z", "2024-02-01"] {
            let mut payload = request(AmountInput::Number(10.0), &food.id);
            payload.date = Some(date.to_string());
            expenses.create(payload).await.unwrap();
        }

        let january = expenses
            .list_by_date_range(Some("2024-01-01"), Some("2024-01-31"))
            .await
            .unwrap();
        assert_eq!(january.len(), 2);

        assert!(matches!(
            expenses.list_by_date_range(Some("2024-01-01"), None).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            expenses.list_by_date_range(Some("2024-02-01"), Some("2024-01-01")).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            expenses.list_by_date_range(Some("yesterday"), Some("2024-01-01")).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_summary_groups_by_category_and_month() {
        let fixture = Fixture::new().await;
        let food = fixture.category("Food").await;
        let rent = fixture.category("Rent").await;
        let expenses = fixture.service(TransactionKind::Expense);
        for (amount, category, date) in [
            (10.0, &food, "2024-01-05"),
            (15.0, &food, "2024-02-05"),
            (500.0, &rent, "2024-02-01"),
        ] {
            let mut payload = request(AmountInput::Number(amount), &category.id);
            payload.date = Some(date.to_string());
            expenses.create(payload).await.unwrap();
        }

        let summary = expenses.summary().await.unwrap();

        assert_eq!(summary.total, 525.0);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.category_count, 2);
        assert_eq!(summary.category_totals[&food.id].total, 25.0);
        assert_eq!(summary.category_totals[&rent.id].count, 1);
        assert_eq!(summary.monthly_totals["2024-01"], 10.0);
        assert_eq!(summary.monthly_totals["2024-02"], 515.0);
        assert_eq!(summary.recent.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_and_clear_all() {
        let fixture = Fixture::new().await;
        let food = fixture.category("Food").await;
        let expenses = fixture.service(TransactionKind::Expense);
        let first = expenses.create(request(AmountInput::Number(1.0), &food.id)).await.unwrap();
        expenses.create(request(AmountInput::Number(2.0), &food.id)).await.unwrap();

        expenses.delete(&first.transaction.id).await.unwrap();
        assert!(matches!(expenses.delete(&first.transaction.id).await, Err(DomainError::NotFound(_))));
        assert_eq!(expenses.clear_all().await.unwrap(), 1);
    }
}
