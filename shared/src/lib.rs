use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of the implicit single user that owns the settings document.
pub const DEFAULT_USER_ID: &str = "default";

/// Whether a category classifies outflows or inflows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Expense,
    Income,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Expense => "expense",
            CategoryType::Income => "income",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "expense" => Some(CategoryType::Expense),
            "income" => Some(CategoryType::Income),
            _ => None,
        }
    }
}

impl Default for CategoryType {
    fn default() -> Self {
        CategoryType::Expense
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-defined bucket that transactions are filed under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    /// Display name, unique per type (case-insensitive)
    pub name: String,
    /// Emoji or icon token shown next to the name
    pub icon: String,
    /// CSS colour used by charts
    pub color: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The denormalized category fields embedded in transaction responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

impl From<&Category> for CategoryRef {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            icon: category.icon.clone(),
            color: category.color.clone(),
            category_type: category.category_type,
        }
    }
}

/// Payload for creating or replacing a category.
///
/// Every field is optional on the wire so that missing values surface as
/// validation errors instead of deserialization failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub category_type: Option<String>,
}

/// Which collection a transaction belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money going out
    Expense,
    /// Money coming in
    Deposit,
}

impl TransactionKind {
    /// Collection / route segment name
    pub fn collection(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "expenses",
            TransactionKind::Deposit => "deposits",
        }
    }

    /// Capitalised singular label, also the fallback title
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "Expense",
            TransactionKind::Deposit => "Deposit",
        }
    }
}

/// A single expense or deposit.
///
/// Both kinds share one shape; they differ only in which collection holds
/// them and which aggregate they contribute to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub title: String,
    /// Always strictly positive; the kind carries the sign
    pub amount: f64,
    pub category_id: String,
    /// Populated from the category collection when the reference resolves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRef>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type Expense = Transaction;
pub type Deposit = Transaction;

/// Amount as supplied by a client: JSON number or numeric string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    /// Numeric value, or `None` when the input is not a finite number
    pub fn value(&self) -> Option<f64> {
        let parsed = match self {
            AmountInput::Number(n) => Some(*n),
            AmountInput::Text(s) => s.trim().parse::<f64>().ok(),
        };
        parsed.filter(|n| n.is_finite())
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

/// Payload for creating or updating an expense or deposit.
///
/// Accepts the legacy aliases `category` (for `categoryId`) and `source`
/// (for a deposit's `title`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Aggregates over a whole transaction collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub total: f64,
    pub count: usize,
    pub category_count: usize,
    /// Keyed by category id
    pub category_breakdown: BTreeMap<String, CategoryTotal>,
    /// Keyed by `YYYY-MM`
    pub monthly_totals: BTreeMap<String, f64>,
    /// Most recently created records, newest first
    pub recent: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub total: f64,
    pub count: usize,
}

/// The singleton preferences document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub user_id: String,
    pub currency: String,
    pub currency_symbol: String,
    pub date_format: String,
    pub theme: String,
    pub budget_limit: f64,
    pub notifications: bool,
    pub auto_backup: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial settings update; only present fields are applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_limit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_backup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub code: String,
    pub symbol: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyInfoResponse {
    pub current: CurrencyInfo,
    pub available: BTreeMap<String, CurrencyInfo>,
    pub settings: UserSettings,
}

/// Supported currencies as (code, symbol, name)
pub const SUPPORTED_CURRENCIES: &[(&str, &str, &str)] = &[
    ("INR", "₹", "Indian Rupee"),
    ("USD", "$", "US Dollar"),
    ("EUR", "€", "Euro"),
    ("GBP", "£", "British Pound"),
    ("JPY", "¥", "Japanese Yen"),
    ("CAD", "C$", "Canadian Dollar"),
    ("AUD", "A$", "Australian Dollar"),
    ("SGD", "S$", "Singapore Dollar"),
    ("CNY", "¥", "Chinese Yuan"),
    ("KRW", "₩", "South Korean Won"),
];

pub const SUPPORTED_THEMES: &[&str] = &["light", "dark", "auto"];

pub const SUPPORTED_DATE_FORMATS: &[&str] = &["DD/MM/YYYY", "MM/DD/YYYY", "YYYY-MM-DD"];

/// Look up a supported currency by its ISO code
pub fn currency_info(code: &str) -> Option<CurrencyInfo> {
    SUPPORTED_CURRENCIES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(code, symbol, name)| CurrencyInfo {
            code: code.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
        })
}

/// Echo of the time window an analytics response was computed over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRange {
    pub month: Option<String>,
    pub period: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Sum, count and mean of a set of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub total: f64,
    pub count: usize,
    pub average: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Increase,
    Decrease,
    Stable,
}

/// Period-over-period movement of one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodChange {
    pub amount: f64,
    pub percentage: f64,
    pub direction: ChangeDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// Recent (last 30 days) versus prior (31-60 days ago) spend of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTrend {
    pub direction: TrendDirection,
    /// Absent when one side of the comparison is zero
    pub change_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category_id: String,
    /// Unset when the category reference no longer resolves
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub total: f64,
    pub count: usize,
    pub average: f64,
    /// Share of the grand total, 0-100
    pub percentage: f64,
    pub trend: CategoryTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    /// `YYYY-MM`
    pub month: String,
    /// e.g. `Jan 2024`
    pub label: String,
    pub total: f64,
    pub count: usize,
    pub average: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    Safe,
    Warning,
    Critical,
    Over,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub budget_limit: f64,
    pub current_expenses: f64,
    pub remaining_budget: f64,
    pub is_over_budget: bool,
    pub warning_level: WarningLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsightKind {
    HighSpending,
    CategoryConcentration,
    SpendingIncrease,
    SpendingDecrease,
    LowActivity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSeverity {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightAction {
    pub text: String,
    pub link: String,
}

/// A rule-based notice derived from the aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub severity: InsightSeverity,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<InsightAction>,
}

/// Response of `GET /analytics/summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub range: AnalyticsRange,
    pub total_expenses: f64,
    pub total_income: f64,
    pub balance: f64,
    pub currency: String,
    pub expenses: PeriodTotals,
    pub income: PeriodTotals,
    pub category_breakdown: Vec<CategoryBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
    pub spending: PeriodChange,
    pub transactions: PeriodChange,
}

/// Response of `GET /analytics/overview`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsOverview {
    pub range: AnalyticsRange,
    pub comparison: PeriodComparison,
    pub top_category: Option<CategoryBreakdown>,
    pub category_breakdown: Vec<CategoryBreakdown>,
    pub insights: Vec<Insight>,
    pub monthly_trends: Vec<MonthlyTrend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearAllResponse {
    pub message: String,
    pub deleted_count: usize,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    /// Number of expenses blocking a category deletion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub environment: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    /// Seconds since the server started
    pub uptime: f64,
    /// Only reported by development servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<RuntimeInfo>,
}

/// Process details exposed by development servers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeInfo {
    pub platform: String,
    pub arch: String,
    pub process_id: u32,
    pub available_parallelism: usize,
    pub uptime: f64,
}

/// Effective server configuration, served at `/env-status` in development
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvStatusResponse {
    pub environment: String,
    pub config: EnvConfigSummary,
    pub runtime: RuntimeInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvConfigSummary {
    pub host: String,
    pub port: u16,
    pub data_dir: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
}
