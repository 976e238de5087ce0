//! # View Helpers
//!
//! Pure functions that turn cached data into what screens display.
//!
//! ## Key Functions:
//! - `format_currency()` - Render an amount with symbol, grouping and precision
//! - `parse_currency_amount()` - Read a user-typed amount, ignoring symbols and commas
//! - `category_slices()` - Pie chart slices, one per category
//! - `monthly_series()` - Bar chart of totals for the last N months

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use shared::{currency_info, Category, Transaction, UserSettings};
use std::collections::HashMap;

const UNCATEGORIZED_LABEL: &str = "Uncategorized";
const UNCATEGORIZED_COLOR: &str = "#9E9E9E";
const CURRENCY_SYMBOLS: &[char] = &['₹', '$', '€', '£', '¥', '₩'];

/// Digit grouping used when rendering the integer part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// 12,34,567 (lakh/crore)
    Indian,
    /// 1,234,567
    Thousands,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub precision: usize,
    pub show_symbol: bool,
    pub grouping: Grouping,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "₹".to_string(),
            precision: 2,
            show_symbol: true,
            grouping: Grouping::Indian,
        }
    }
}

impl CurrencyFormat {
    /// Format for a currency code; unknown codes fall back to the code itself
    pub fn for_code(code: &str) -> Self {
        let symbol = currency_info(code)
            .map(|info| info.symbol)
            .unwrap_or_else(|| code.to_string());
        Self {
            symbol,
            grouping: if code == "INR" { Grouping::Indian } else { Grouping::Thousands },
            ..Self::default()
        }
    }

    /// Format matching the user's settings, honouring a custom symbol
    pub fn for_settings(settings: &UserSettings) -> Self {
        let mut format = Self::for_code(&settings.currency);
        if !settings.currency_symbol.trim().is_empty() {
            format.symbol = settings.currency_symbol.clone();
        }
        format
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn without_symbol(mut self) -> Self {
        self.show_symbol = false;
        self
    }
}

pub fn format_currency(amount: f64, format: &CurrencyFormat) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let fixed = format!("{:.*}", format.precision, amount.abs());
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut rendered = group_digits(integer, format.grouping);
    if let Some(fraction) = fraction {
        rendered.push('.');
        rendered.push_str(fraction);
    }

    // -0.00 after rounding is still zero
    let negative = amount < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    if format.show_symbol {
        format!("{}{}{}", sign, format.symbol, rendered)
    } else {
        format!("{}{}", sign, rendered)
    }
}

fn group_digits(integer: &str, grouping: Grouping) -> String {
    let digits: Vec<char> = integer.chars().collect();
    let mut groups: Vec<String> = Vec::new();

    let mut end = digits.len();
    let mut size = 3;
    while end > size {
        groups.push(digits[end - size..end].iter().collect());
        end -= size;
        if grouping == Grouping::Indian {
            size = 2;
        }
    }
    groups.push(digits[..end].iter().collect());
    groups.reverse();
    groups.join(",")
}

/// Parse an amount typed by a user. Unparseable input reads as zero.
pub fn parse_currency_amount(input: &str) -> f64 {
    let cleaned: String = input
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && *c != ',' && !c.is_whitespace())
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// One slice of a spending pie chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlice {
    pub category_id: String,
    pub label: String,
    pub color: String,
    pub value: f64,
    pub percentage: f64,
}

/// Totals per category, largest first. Names and colours come from the
/// transaction's embedded category, then from `categories`.
pub fn category_slices(transactions: &[Transaction], categories: &[Category]) -> Vec<ChartSlice> {
    let known: HashMap<&str, &Category> = categories.iter().map(|c| (c.id.as_str(), c)).collect();
    let mut slices: Vec<ChartSlice> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions {
        let index = match positions.get(transaction.category_id.as_str()).copied() {
            Some(index) => index,
            None => {
                let (label, color) = match (&transaction.category, known.get(transaction.category_id.as_str())) {
                    (Some(embedded), _) => (embedded.name.clone(), embedded.color.clone()),
                    (None, Some(category)) => (category.name.clone(), category.color.clone()),
                    (None, None) => (UNCATEGORIZED_LABEL.to_string(), UNCATEGORIZED_COLOR.to_string()),
                };
                slices.push(ChartSlice {
                    category_id: transaction.category_id.clone(),
                    label,
                    color,
                    value: 0.0,
                    percentage: 0.0,
                });
                positions.insert(transaction.category_id.as_str(), slices.len() - 1);
                slices.len() - 1
            }
        };
        slices[index].value += transaction.amount;
    }

    let total: f64 = slices.iter().map(|s| s.value).sum();
    if total > 0.0 {
        for slice in &mut slices {
            slice.percentage = slice.value / total * 100.0;
        }
    }

    slices.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.label.cmp(&b.label))
    });
    slices
}

/// One bar of a monthly totals chart
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBar {
    /// `YYYY-MM`
    pub month: String,
    /// e.g. `Mar 2024`
    pub label: String,
    pub total: f64,
    pub count: usize,
}

/// The last `months` calendar months ending with the one containing `now`,
/// oldest first. Months with no transactions are present with zero totals.
pub fn monthly_series(transactions: &[Transaction], months: u32, now: DateTime<Utc>) -> Vec<MonthlyBar> {
    let mut bars: Vec<MonthlyBar> = (0..months)
        .rev()
        .filter_map(|back| month_start(now.year(), now.month(), back))
        .map(|start| MonthlyBar {
            month: start.format("%Y-%m").to_string(),
            label: start.format("%b %Y").to_string(),
            total: 0.0,
            count: 0,
        })
        .collect();

    for transaction in transactions {
        let key = transaction.date.format("%Y-%m").to_string();
        if let Some(bar) = bars.iter_mut().find(|bar| bar.month == key) {
            bar.total += transaction.amount;
            bar.count += 1;
        }
    }
    bars
}

fn month_start(year: i32, month: u32, back: u32) -> Option<NaiveDate> {
    let index = year * 12 + month as i32 - 1 - back as i32;
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
}
