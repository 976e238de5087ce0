//! Test fixtures for the document store.
//!
//! `TestEnvironment` keeps its `TempDir` alive for the life of the test, so
//! the data directory is removed on drop even when an assertion panics.

use anyhow::Result;
use chrono::{DateTime, Utc};
use shared::{CategoryType, TransactionKind};
use std::path::PathBuf;
use tempfile::TempDir;
use uuid::Uuid;

use super::{CategoryRepository, DocumentConnection, SettingsRepository, TransactionRepository};
use crate::domain::models::category::DomainCategory;
use crate::domain::models::transaction::DomainTransaction;
use crate::storage::traits::Connection;

pub struct TestEnvironment {
    _temp_dir: TempDir,
    pub connection: DocumentConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = DocumentConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    pub fn category_repository(&self) -> CategoryRepository {
        self.connection.create_category_repository()
    }

    pub fn transaction_repository(&self, kind: TransactionKind) -> TransactionRepository {
        self.connection.create_transaction_repository(kind)
    }

    pub fn settings_repository(&self) -> SettingsRepository {
        self.connection.create_settings_repository()
    }
}

pub fn sample_category(name: &str, category_type: CategoryType) -> DomainCategory {
    let now = Utc::now();
    DomainCategory {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        icon: "📦".to_string(),
        color: "#4ECDC4".to_string(),
        category_type,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_transaction(
    title: &str,
    amount: f64,
    category_id: &str,
    date: DateTime<Utc>,
) -> DomainTransaction {
    let now = Utc::now();
    DomainTransaction {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        amount,
        category_id: category_id.to_string(),
        date,
        description: String::new(),
        currency: "INR".to_string(),
        created_at: now,
        updated_at: now,
    }
}
