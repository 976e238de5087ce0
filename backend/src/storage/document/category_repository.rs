//! # Category Repository
//!
//! Stores each category as `categories/{id}.yaml`:
//!
//! ```yaml
//! id: 5f0c...
//! name: Food
//! icon: "🍔"
//! color: "#FF6B6B"
//! type: expense
//! createdAt: 2025-01-20T10:00:00Z
//! updatedAt: 2025-01-20T10:00:00Z
//! ```

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::CategoryType;
use tracing::{debug, info};

use super::connection::DocumentConnection;
use crate::domain::models::category::DomainCategory;
use crate::storage::traits::CategoryStorage;

const COLLECTION: &str = "categories";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryRecord {
    id: String,
    name: String,
    icon: String,
    color: String,
    #[serde(rename = "type", default = "default_type")]
    category_type: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn default_type() -> String {
    CategoryType::Expense.as_str().to_string()
}

impl From<&DomainCategory> for CategoryRecord {
    fn from(category: &DomainCategory) -> Self {
        CategoryRecord {
            id: category.id.clone(),
            name: category.name.clone(),
            icon: category.icon.clone(),
            color: category.color.clone(),
            category_type: category.category_type.as_str().to_string(),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl TryFrom<CategoryRecord> for DomainCategory {
    type Error = anyhow::Error;

    fn try_from(record: CategoryRecord) -> Result<Self> {
        let category_type = CategoryType::parse(&record.category_type)
            .ok_or_else(|| anyhow!("unknown category type '{}'", record.category_type))?;

        Ok(DomainCategory {
            id: record.id,
            name: record.name,
            icon: record.icon,
            color: record.color,
            category_type,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct CategoryRepository {
    connection: DocumentConnection,
}

impl CategoryRepository {
    pub fn new(connection: DocumentConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl CategoryStorage for CategoryRepository {
    async fn store_category(&self, category: &DomainCategory) -> Result<()> {
        debug!("Storing category {} ({})", category.id, category.name);
        self.connection
            .write_document(COLLECTION, &category.id, &CategoryRecord::from(category))
    }

    async fn get_category(&self, category_id: &str) -> Result<Option<DomainCategory>> {
        let record: Option<CategoryRecord> = self.connection.read_document(COLLECTION, category_id)?;
        record.map(DomainCategory::try_from).transpose()
    }

    async fn list_categories(&self, category_type: Option<CategoryType>) -> Result<Vec<DomainCategory>> {
        let records: Vec<CategoryRecord> = self.connection.read_collection(COLLECTION)?;

        let mut categories = records
            .into_iter()
            .map(DomainCategory::try_from)
            .collect::<Result<Vec<_>>>()?;

        if let Some(wanted) = category_type {
            categories.retain(|c| c.category_type == wanted);
        }
        categories.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        Ok(categories)
    }

    async fn update_category(&self, category: &DomainCategory) -> Result<()> {
        if self.get_category(&category.id).await?.is_none() {
            return Err(anyhow!("category {} does not exist", category.id));
        }
        self.store_category(category).await
    }

    async fn delete_category(&self, category_id: &str) -> Result<bool> {
        let removed = self.connection.remove_document(COLLECTION, category_id)?;
        if removed {
            info!("Deleted category {}", category_id);
        }
        Ok(removed)
    }

    async fn delete_all_categories(&self) -> Result<usize> {
        let removed = self.connection.remove_collection(COLLECTION)?;
        info!("Deleted {} categories", removed);
        Ok(removed)
    }
}
