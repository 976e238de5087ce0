//! # Storage Traits
//!
//! Storage abstractions the domain services are written against.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{CategoryType, TransactionKind};

use crate::domain::models::category::DomainCategory;
use crate::domain::models::settings::DomainSettings;
use crate::domain::models::transaction::DomainTransaction;

#[async_trait]
pub trait CategoryStorage: Send + Sync {
    async fn store_category(&self, category: &DomainCategory) -> Result<()>;

    async fn get_category(&self, category_id: &str) -> Result<Option<DomainCategory>>;

    /// All categories, optionally restricted to one type, sorted by name
    async fn list_categories(&self, category_type: Option<CategoryType>) -> Result<Vec<DomainCategory>>;

    /// Replace an existing category document
    async fn update_category(&self, category: &DomainCategory) -> Result<()>;

    /// Returns true if the category existed
    async fn delete_category(&self, category_id: &str) -> Result<bool>;

    /// Returns the number of categories removed
    async fn delete_all_categories(&self) -> Result<usize>;
}

/// Storage for one transaction collection (expenses or deposits)
#[async_trait]
pub trait TransactionStorage: Send + Sync {
    async fn store_transaction(&self, transaction: &DomainTransaction) -> Result<()>;

    async fn get_transaction(&self, transaction_id: &str) -> Result<Option<DomainTransaction>>;

    /// Ordered by date descending, then creation time descending
    async fn list_transactions(&self) -> Result<Vec<DomainTransaction>>;

    /// Ordered by date descending
    async fn list_transactions_by_category(&self, category_id: &str) -> Result<Vec<DomainTransaction>>;

    /// Transactions dated within `[start, end]`, ordered by date descending
    async fn list_transactions_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DomainTransaction>>;

    async fn update_transaction(&self, transaction: &DomainTransaction) -> Result<()>;

    /// Returns true if the transaction existed
    async fn delete_transaction(&self, transaction_id: &str) -> Result<bool>;

    /// Returns the number of transactions removed
    async fn delete_all_transactions(&self) -> Result<usize>;

    async fn count_transactions(&self) -> Result<usize>;

    async fn count_transactions_by_category(&self, category_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait SettingsStorage: Send + Sync {
    async fn get_settings(&self, user_id: &str) -> Result<Option<DomainSettings>>;

    /// Insert or replace the settings document keyed by its `user_id`
    async fn store_settings(&self, settings: &DomainSettings) -> Result<()>;

    /// Returns true if a settings document existed
    async fn delete_settings(&self, user_id: &str) -> Result<bool>;
}

/// Factory for the repositories of one storage backend.
///
/// Lets the domain layer work with any backend without knowing its concrete
/// repository types.
pub trait Connection: Send + Sync + Clone + 'static {
    type CategoryRepository: CategoryStorage + Clone + 'static;
    type TransactionRepository: TransactionStorage + Clone + 'static;
    type SettingsRepository: SettingsStorage + Clone + 'static;

    fn create_category_repository(&self) -> Self::CategoryRepository;

    fn create_transaction_repository(&self, kind: TransactionKind) -> Self::TransactionRepository;

    fn create_settings_repository(&self) -> Self::SettingsRepository;
}
