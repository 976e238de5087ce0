use super::category_mapper::CategoryMapper;
use crate::domain::models::transaction::{
    CategoryTotals, ResolvedTransaction, TransactionSummaryModel,
};
use shared::{CategoryTotal, Transaction as SharedTransaction, TransactionSummary};

/// Placeholder shown for totals whose category no longer exists
const ORPHAN_NAME: &str = "Uncategorized";
const ORPHAN_ICON: &str = "❓";
const ORPHAN_COLOR: &str = "#9E9E9E";

pub struct TransactionMapper;

impl TransactionMapper {
    pub fn to_dto(resolved: ResolvedTransaction) -> SharedTransaction {
        let ResolvedTransaction { transaction, category } = resolved;
        SharedTransaction {
            id: transaction.id,
            title: transaction.title,
            amount: transaction.amount,
            category_id: transaction.category_id,
            category: category.as_ref().map(CategoryMapper::to_ref),
            date: transaction.date,
            description: transaction.description,
            currency: transaction.currency,
            created_at: transaction.created_at,
            updated_at: transaction.updated_at,
        }
    }

    pub fn to_dto_list(resolved: Vec<ResolvedTransaction>) -> Vec<SharedTransaction> {
        resolved.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_summary_dto(summary: TransactionSummaryModel) -> TransactionSummary {
        TransactionSummary {
            total: summary.total,
            count: summary.count,
            category_count: summary.category_count,
            category_breakdown: summary
                .category_totals
                .into_iter()
                .map(|(id, totals)| (id, Self::to_category_total(totals)))
                .collect(),
            monthly_totals: summary.monthly_totals,
            recent: Self::to_dto_list(summary.recent),
        }
    }

    fn to_category_total(totals: CategoryTotals) -> CategoryTotal {
        let (name, icon, color) = match totals.category {
            Some(category) => (category.name, category.icon, category.color),
            None => (
                ORPHAN_NAME.to_string(),
                ORPHAN_ICON.to_string(),
                ORPHAN_COLOR.to_string(),
            ),
        };
        CategoryTotal {
            name,
            icon,
            color,
            total: totals.total,
            count: totals.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::document::test_utils::{sample_category, sample_transaction};
    use chrono::Utc;
    use shared::CategoryType;
    use std::collections::BTreeMap;

    #[test]
    fn test_embeds_category_when_resolved() {
        let food = sample_category("Food", CategoryType::Expense);
        let expense = sample_transaction("lunch", 9.5, &food.id, Utc::now());

        let dto = TransactionMapper::to_dto(ResolvedTransaction {
            transaction: expense.clone(),
            category: Some(food.clone()),
        });
        assert_eq!(dto.category_id, food.id);
        assert_eq!(dto.category.as_ref().map(|c| c.name.as_str()), Some("Food"));

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["category"]["type"], "expense");
        assert_eq!(json["categoryId"], food.id.as_str());

        let orphan = TransactionMapper::to_dto(ResolvedTransaction { transaction: expense, category: None });
        let json = serde_json::to_value(&orphan).unwrap();
        assert!(json.get("category").is_none());
    }

    #[test]
    fn test_summary_labels_orphaned_totals() {
        let mut category_totals = BTreeMap::new();
        category_totals.insert(
            "gone".to_string(),
            CategoryTotals { category: None, total: 12.0, count: 2 },
        );

        let dto = TransactionMapper::to_summary_dto(TransactionSummaryModel {
            total: 12.0,
            count: 2,
            category_count: 0,
            category_totals,
            monthly_totals: BTreeMap::new(),
            recent: Vec::new(),
        });

        assert_eq!(dto.category_breakdown["gone"].name, ORPHAN_NAME);
        assert_eq!(dto.category_breakdown["gone"].total, 12.0);
    }
}
