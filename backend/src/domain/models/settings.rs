use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::DEFAULT_USER_ID;

pub const DEFAULT_CURRENCY: &str = "INR";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";
pub const DEFAULT_DATE_FORMAT: &str = "DD/MM/YYYY";
pub const DEFAULT_THEME: &str = "light";
pub const DEFAULT_BUDGET_LIMIT: f64 = 1000.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainSettings {
    pub user_id: String,
    pub currency: String,
    pub currency_symbol: String,
    pub date_format: String,
    pub theme: String,
    pub budget_limit: f64,
    pub notifications: bool,
    pub auto_backup: bool,
    pub default_category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DomainSettings {
    /// The document created on first read
    pub fn defaults(now: DateTime<Utc>) -> Self {
        Self {
            user_id: DEFAULT_USER_ID.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            theme: DEFAULT_THEME.to_string(),
            budget_limit: DEFAULT_BUDGET_LIMIT,
            notifications: true,
            auto_backup: false,
            default_category: None,
            created_at: now,
            updated_at: now,
        }
    }
}
