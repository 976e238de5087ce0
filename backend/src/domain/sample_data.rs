//! Sample data for local development.
//!
//! Every record is written through the regular services, so seeded data
//! passes the same validation as API writes. Seeding always starts from an
//! empty store and leaves the default settings in place.

use shared::{CategoryRequest, SettingsRequest, TransactionKind, TransactionRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::{CategoryService, SettingsService, TransactionService};
use crate::storage::Connection;

struct SampleCategory {
    name: &'static str,
    icon: &'static str,
    color: &'static str,
}

struct SampleTransaction {
    title: &'static str,
    amount: f64,
    category: &'static str,
    date: &'static str,
    description: &'static str,
}

const EXPENSE_CATEGORIES: &[SampleCategory] = &[
    SampleCategory { name: "Food & Dining", icon: "🍽️", color: "#FF6B6B" },
    SampleCategory { name: "Transportation", icon: "🚗", color: "#4ECDC4" },
    SampleCategory { name: "Shopping", icon: "🛍️", color: "#45B7D1" },
    SampleCategory { name: "Entertainment", icon: "🎬", color: "#96CEB4" },
    SampleCategory { name: "Utilities", icon: "⚡", color: "#FFEAA7" },
    SampleCategory { name: "Healthcare", icon: "🏥", color: "#DDA0DD" },
    SampleCategory { name: "Education", icon: "📚", color: "#98D8C8" },
    SampleCategory { name: "Travel", icon: "✈️", color: "#F7DC6F" },
];

const INCOME_CATEGORIES: &[SampleCategory] = &[
    SampleCategory { name: "Salary", icon: "💼", color: "#28A745" },
    SampleCategory { name: "Freelancing", icon: "💻", color: "#17A2B8" },
    SampleCategory { name: "Investment Returns", icon: "📈", color: "#FFC107" },
    SampleCategory { name: "Business Income", icon: "🏢", color: "#6F42C1" },
    SampleCategory { name: "Rental Income", icon: "🏠", color: "#E83E8C" },
    SampleCategory { name: "Gifts & Bonuses", icon: "🎁", color: "#20C997" },
    SampleCategory { name: "Side Hustle", icon: "🚀", color: "#FD7E14" },
    SampleCategory { name: "Other Income", icon: "💰", color: "#6C757D" },
];

const EXPENSES: &[SampleTransaction] = &[
    SampleTransaction { title: "Lunch at Italian Restaurant", amount: 1250.50, category: "Food & Dining", date: "2024-01-15", description: "Pasta and wine" },
    SampleTransaction { title: "Gas Station Fill-up", amount: 3500.00, category: "Transportation", date: "2024-01-14", description: "Petrol fill up" },
    SampleTransaction { title: "Grocery Shopping", amount: 2890.30, category: "Food & Dining", date: "2024-01-13", description: "Weekly groceries" },
    SampleTransaction { title: "Movie Tickets", amount: 800.00, category: "Entertainment", date: "2024-01-12", description: "IMAX screening" },
    SampleTransaction { title: "Uber Ride", amount: 450.50, category: "Transportation", date: "2024-01-11", description: "Downtown to airport" },
    SampleTransaction { title: "Coffee and Pastry", amount: 275.75, category: "Food & Dining", date: "2024-01-11", description: "Morning coffee break" },
    SampleTransaction { title: "Electricity Bill", amount: 1950.50, category: "Utilities", date: "2024-01-10", description: "Monthly electricity bill" },
    SampleTransaction { title: "Netflix Subscription", amount: 499.00, category: "Entertainment", date: "2024-01-09", description: "Monthly subscription" },
    SampleTransaction { title: "New Headphones", amount: 8999.99, category: "Shopping", date: "2024-01-08", description: "Wireless noise-canceling headphones" },
    SampleTransaction { title: "Doctor Visit", amount: 2500.00, category: "Healthcare", date: "2024-01-07", description: "Annual checkup" },
    SampleTransaction { title: "Book Purchase", amount: 1299.99, category: "Education", date: "2024-01-06", description: "Programming reference" },
    SampleTransaction { title: "Flight Booking", amount: 28500.00, category: "Travel", date: "2024-01-05", description: "Round trip to Mumbai" },
];

// The reimbursement deliberately files an income under an expense category
const DEPOSITS: &[SampleTransaction] = &[
    SampleTransaction { title: "Monthly Salary", amount: 85000.00, category: "Salary", date: "2024-01-01", description: "Software developer salary" },
    SampleTransaction { title: "Freelance Project Payment", amount: 25000.00, category: "Freelancing", date: "2024-01-05", description: "Website development project" },
    SampleTransaction { title: "Stock Market Gains", amount: 8500.00, category: "Investment Returns", date: "2024-01-08", description: "Quarterly dividend payout" },
    SampleTransaction { title: "Consulting Work", amount: 15000.00, category: "Business Income", date: "2024-01-10", description: "IT consulting for startup" },
    SampleTransaction { title: "Apartment Rent", amount: 18000.00, category: "Rental Income", date: "2024-01-02", description: "Monthly rent from tenant" },
    SampleTransaction { title: "Birthday Gift", amount: 5000.00, category: "Gifts & Bonuses", date: "2024-01-12", description: "Cash gift from family" },
    SampleTransaction { title: "Online Course Sales", amount: 12000.00, category: "Side Hustle", date: "2024-01-15", description: "Revenue from coding course" },
    SampleTransaction { title: "Cashback Rewards", amount: 850.00, category: "Other Income", date: "2024-01-14", description: "Credit card cashback" },
    SampleTransaction { title: "Travel Reimbursement", amount: 4200.00, category: "Travel", date: "2024-01-16", description: "Client trip refund" },
];

/// What `clear` removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearedData {
    pub expenses: usize,
    pub deposits: usize,
    pub categories: usize,
    pub settings: bool,
}

/// What `seed` created
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeedSummary {
    pub expense_categories: usize,
    pub income_categories: usize,
    pub expenses: usize,
    pub deposits: usize,
    pub expense_total: f64,
    pub deposit_total: f64,
}

impl SeedSummary {
    pub fn net_income(&self) -> f64 {
        self.deposit_total - self.expense_total
    }
}

pub struct SampleDataService<C: Connection> {
    category_service: CategoryService<C>,
    expense_service: TransactionService<C>,
    deposit_service: TransactionService<C>,
    settings_service: SettingsService<C>,
}

impl<C: Connection> SampleDataService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        let settings_service = SettingsService::new(connection.clone());
        Self {
            category_service: CategoryService::new(connection.clone()),
            expense_service: TransactionService::new(
                connection.clone(),
                TransactionKind::Expense,
                settings_service.clone(),
            ),
            deposit_service: TransactionService::new(
                connection,
                TransactionKind::Deposit,
                settings_service.clone(),
            ),
            settings_service,
        }
    }

    /// Wipe all four collections. Expenses go first so the category guard
    /// never trips.
    pub async fn clear(&self) -> DomainResult<ClearedData> {
        let cleared = ClearedData {
            expenses: self.expense_service.clear_all().await?,
            deposits: self.deposit_service.clear_all().await?,
            categories: self.category_service.clear_all_categories().await?,
            settings: self.settings_service.reset_settings().await?,
        };
        info!(
            "Cleared {} expenses, {} deposits, {} categories",
            cleared.expenses, cleared.deposits, cleared.categories
        );
        Ok(cleared)
    }

    pub async fn seed(&self) -> DomainResult<SeedSummary> {
        self.clear().await?;

        self.settings_service
            .update_settings(SettingsRequest {
                currency: Some("INR".to_string()),
                currency_symbol: Some("₹".to_string()),
                date_format: Some("DD/MM/YYYY".to_string()),
                theme: Some("light".to_string()),
                ..SettingsRequest::default()
            })
            .await?;

        let mut category_ids = HashMap::new();
        for (samples, category_type) in [(EXPENSE_CATEGORIES, "expense"), (INCOME_CATEGORIES, "income")] {
            for sample in samples {
                let category = self
                    .category_service
                    .create_category(CategoryRequest {
                        name: Some(sample.name.to_string()),
                        icon: Some(sample.icon.to_string()),
                        color: Some(sample.color.to_string()),
                        category_type: Some(category_type.to_string()),
                    })
                    .await?;
                category_ids.insert(sample.name, category.id);
            }
        }

        let expense_total = insert_all(&self.expense_service, EXPENSES, &category_ids).await?;
        let deposit_total = insert_all(&self.deposit_service, DEPOSITS, &category_ids).await?;

        let summary = SeedSummary {
            expense_categories: EXPENSE_CATEGORIES.len(),
            income_categories: INCOME_CATEGORIES.len(),
            expenses: EXPENSES.len(),
            deposits: DEPOSITS.len(),
            expense_total,
            deposit_total,
        };
        info!(
            "Seeded {} categories, {} expenses, {} deposits",
            summary.expense_categories + summary.income_categories,
            summary.expenses,
            summary.deposits
        );
        Ok(summary)
    }
}

/// Returns the sum of the stored amounts
async fn insert_all<C: Connection>(
    service: &TransactionService<C>,
    samples: &[SampleTransaction],
    category_ids: &HashMap<&'static str, String>,
) -> DomainResult<f64> {
    let mut total = 0.0;
    for sample in samples {
        let category_id = category_ids.get(sample.category).ok_or_else(|| {
            DomainError::Unexpected(anyhow::anyhow!("sample category '{}' was not created", sample.category))
        })?;

        let created = service
            .create(TransactionRequest {
                title: Some(sample.title.to_string()),
                amount: Some(sample.amount.into()),
                category_id: Some(category_id.clone()),
                date: Some(sample.date.to_string()),
                description: Some(sample.description.to_string()),
                currency: Some("INR".to_string()),
                ..TransactionRequest::default()
            })
            .await?;
        total += created.transaction.amount;
    }
    Ok(total)
}
