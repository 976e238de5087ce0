use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::CategoryType;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainCategory {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub category_type: CategoryType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DomainCategory {
    /// Case-insensitive name comparison used for the uniqueness rule
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}
