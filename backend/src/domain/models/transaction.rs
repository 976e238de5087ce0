use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::category::DomainCategory;

/// Stored shape of an expense or deposit document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainTransaction {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub category_id: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DomainTransaction {
    /// Whether `date` lies in `[start, end]`, both ends inclusive
    pub fn falls_within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.date >= start && self.date <= end
    }
}

/// A transaction together with the category its reference resolves to
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTransaction {
    pub transaction: DomainTransaction,
    /// `None` when the reference is orphaned
    pub category: Option<DomainCategory>,
}

/// Spend of one category inside a collection summary
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotals {
    pub category: Option<DomainCategory>,
    pub total: f64,
    pub count: usize,
}

/// Whole-collection aggregates behind `GET /expenses/summary`
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionSummaryModel {
    pub total: f64,
    pub count: usize,
    /// Number of categories in the store, used or not
    pub category_count: usize,
    /// Keyed by category id
    pub category_totals: BTreeMap<String, CategoryTotals>,
    /// Keyed by `YYYY-MM`
    pub monthly_totals: BTreeMap<String, f64>,
    pub recent: Vec<ResolvedTransaction>,
}
