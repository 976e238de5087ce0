//! # Transaction Repository
//!
//! One repository instance serves one collection, `expenses/` or
//! `deposits/`. Each record is a standalone `{id}.yaml` document carrying
//! its category by id only.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::TransactionKind;
use tracing::{debug, info};

use super::connection::DocumentConnection;
use crate::domain::models::transaction::DomainTransaction;
use crate::storage::traits::TransactionStorage;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionRecord {
    id: String,
    title: String,
    amount: f64,
    category_id: String,
    date: DateTime<Utc>,
    #[serde(default)]
    description: String,
    currency: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&DomainTransaction> for TransactionRecord {
    fn from(transaction: &DomainTransaction) -> Self {
        TransactionRecord {
            id: transaction.id.clone(),
            title: transaction.title.clone(),
            amount: transaction.amount,
            category_id: transaction.category_id.clone(),
            date: transaction.date,
            description: transaction.description.clone(),
            currency: transaction.currency.clone(),
            created_at: transaction.created_at,
            updated_at: transaction.updated_at,
        }
    }
}

impl From<TransactionRecord> for DomainTransaction {
    fn from(record: TransactionRecord) -> Self {
        DomainTransaction {
            id: record.id,
            title: record.title,
            amount: record.amount,
            category_id: record.category_id,
            date: record.date,
            description: record.description,
            currency: record.currency,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct TransactionRepository {
    connection: DocumentConnection,
    kind: TransactionKind,
}

impl TransactionRepository {
    pub fn new(connection: DocumentConnection, kind: TransactionKind) -> Self {
        Self { connection, kind }
    }

    fn collection(&self) -> &'static str {
        self.kind.collection()
    }

    fn load_all(&self) -> Result<Vec<DomainTransaction>> {
        let records: Vec<TransactionRecord> = self.connection.read_collection(self.collection())?;
        let mut transactions: Vec<DomainTransaction> =
            records.into_iter().map(DomainTransaction::from).collect();

        // Newest first; ties broken by creation time so listings are stable
        transactions.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(transactions)
    }
}

#[async_trait]
impl TransactionStorage for TransactionRepository {
    async fn store_transaction(&self, transaction: &DomainTransaction) -> Result<()> {
        debug!(
            "Storing {} {} amount={}",
            self.kind.label(),
            transaction.id,
            transaction.amount
        );
        self.connection.write_document(
            self.collection(),
            &transaction.id,
            &TransactionRecord::from(transaction),
        )
    }

    async fn get_transaction(&self, transaction_id: &str) -> Result<Option<DomainTransaction>> {
        let record: Option<TransactionRecord> =
            self.connection.read_document(self.collection(), transaction_id)?;
        Ok(record.map(DomainTransaction::from))
    }

    async fn list_transactions(&self) -> Result<Vec<DomainTransaction>> {
        self.load_all()
    }

    async fn list_transactions_by_category(&self, category_id: &str) -> Result<Vec<DomainTransaction>> {
        let mut transactions = self.load_all()?;
        transactions.retain(|t| t.category_id == category_id);
        Ok(transactions)
    }

    async fn list_transactions_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DomainTransaction>> {
        let mut transactions = self.load_all()?;
        transactions.retain(|t| t.falls_within(start, end));
        Ok(transactions)
    }

    async fn update_transaction(&self, transaction: &DomainTransaction) -> Result<()> {
        if self.get_transaction(&transaction.id).await?.is_none() {
            return Err(anyhow!(
                "{} {} does not exist",
                self.kind.label(),
                transaction.id
            ));
        }
        self.store_transaction(transaction).await
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<bool> {
        let removed = self.connection.remove_document(self.collection(), transaction_id)?;
        if removed {
            info!("Deleted {} {}", self.kind.label(), transaction_id);
        }
        Ok(removed)
    }

    async fn delete_all_transactions(&self) -> Result<usize> {
        let removed = self.connection.remove_collection(self.collection())?;
        info!("Deleted {} documents from {}", removed, self.collection());
        Ok(removed)
    }

    async fn count_transactions(&self) -> Result<usize> {
        Ok(self.load_all()?.len())
    }

    async fn count_transactions_by_category(&self, category_id: &str) -> Result<usize> {
        Ok(self
            .load_all()?
            .iter()
            .filter(|t| t.category_id == category_id)
            .count())
    }
}
