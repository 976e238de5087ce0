//! Category management.
//!
//! Names are unique per category type, compared case-insensitively. A
//! category cannot be removed while expenses still point at it; deposits do
//! not block deletion and may be left with an orphaned reference.

use chrono::Utc;
use shared::{CategoryRequest, CategoryType, TransactionKind};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::category::DomainCategory;
use crate::storage::{CategoryStorage, Connection, TransactionStorage};

const TYPE_ERROR: &str = "Type must be either \"expense\" or \"income\"";

/// Validated, trimmed category fields
struct CategoryDraft {
    name: String,
    icon: String,
    color: String,
    category_type: Option<CategoryType>,
}

impl CategoryDraft {
    fn from_request(request: CategoryRequest) -> DomainResult<Self> {
        let name = non_blank(request.name);
        let icon = non_blank(request.icon);
        let color = non_blank(request.color);

        let (name, icon, color) = match (name, icon, color) {
            (Some(name), Some(icon), Some(color)) => (name, icon, color),
            _ => return Err(DomainError::validation("Name, icon, and color are required")),
        };

        let category_type = match request.category_type.as_deref() {
            None => None,
            Some(raw) => Some(CategoryType::parse(raw).ok_or_else(|| DomainError::validation(TYPE_ERROR))?),
        };

        Ok(Self { name, icon, color, category_type })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct CategoryService<C: Connection> {
    category_repository: C::CategoryRepository,
    expense_repository: C::TransactionRepository,
}

impl<C: Connection> CategoryService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            category_repository: connection.create_category_repository(),
            expense_repository: connection.create_transaction_repository(TransactionKind::Expense),
        }
    }

    /// `type_filter` is the raw `?type=` query value; blank means unfiltered
    pub async fn list_categories(&self, type_filter: Option<&str>) -> DomainResult<Vec<DomainCategory>> {
        let category_type = match type_filter.map(str::trim).filter(|v| !v.is_empty()) {
            None => None,
            Some(raw) => Some(CategoryType::parse(raw).ok_or_else(|| DomainError::validation(TYPE_ERROR))?),
        };
        Ok(self.category_repository.list_categories(category_type).await?)
    }

    pub async fn get_category(&self, category_id: &str) -> DomainResult<DomainCategory> {
        self.category_repository
            .get_category(category_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category not found"))
    }

    pub async fn create_category(&self, request: CategoryRequest) -> DomainResult<DomainCategory> {
        let draft = CategoryDraft::from_request(request)?;
        let category_type = draft.category_type.unwrap_or_default();

        self.ensure_unique_name(&draft.name, category_type, None).await?;

        let now = Utc::now();
        let category = DomainCategory {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            icon: draft.icon,
            color: draft.color,
            category_type,
            created_at: now,
            updated_at: now,
        };

        self.category_repository.store_category(&category).await?;
        info!("Created category '{}' ({})", category.name, category.id);
        Ok(category)
    }

    /// Replace name, icon and color; the type is kept when omitted
    pub async fn update_category(&self, category_id: &str, request: CategoryRequest) -> DomainResult<DomainCategory> {
        let draft = CategoryDraft::from_request(request)?;
        let existing = self.get_category(category_id).await?;
        let category_type = draft.category_type.unwrap_or(existing.category_type);

        self.ensure_unique_name(&draft.name, category_type, Some(category_id)).await?;

        let updated = DomainCategory {
            name: draft.name,
            icon: draft.icon,
            color: draft.color,
            category_type,
            updated_at: Utc::now(),
            ..existing
        };

        self.category_repository.update_category(&updated).await?;
        info!("Updated category {}", updated.id);
        Ok(updated)
    }

    pub async fn delete_category(&self, category_id: &str) -> DomainResult<()> {
        let expense_count = self
            .expense_repository
            .count_transactions_by_category(category_id)
            .await?;
        if expense_count > 0 {
            warn!(
                "Refusing to delete category {}: {} expenses reference it",
                category_id, expense_count
            );
            return Err(DomainError::blocked_by_expenses(
                "Cannot delete category that has expenses. Please move or delete the expenses first.",
                expense_count,
            ));
        }

        if !self.category_repository.delete_category(category_id).await? {
            return Err(DomainError::not_found("Category not found"));
        }
        Ok(())
    }

    /// Remove every category; refused while any expense exists
    pub async fn clear_all_categories(&self) -> DomainResult<usize> {
        let expense_count = self.expense_repository.count_transactions().await?;
        if expense_count > 0 {
            return Err(DomainError::blocked_by_expenses(
                "Cannot clear categories while expenses exist. Please clear expenses first.",
                expense_count,
            ));
        }
        Ok(self.category_repository.delete_all_categories().await?)
    }

    async fn ensure_unique_name(
        &self,
        name: &str,
        category_type: CategoryType,
        exclude_id: Option<&str>,
    ) -> DomainResult<()> {
        let same_type = self
            .category_repository
            .list_categories(Some(category_type))
            .await?;

        let duplicate = same_type
            .iter()
            .any(|c| c.has_name(name) && Some(c.id.as_str()) != exclude_id);
        if duplicate {
            return Err(DomainError::validation("Category name already exists for this type"));
        }
        Ok(())
    }
}
