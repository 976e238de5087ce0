//! The settings singleton.
//!
//! Settings are keyed by [`shared::DEFAULT_USER_ID`] and created with fixed
//! defaults the first time anything reads them.

use chrono::Utc;
use shared::{
    currency_info, CurrencyInfo, SettingsRequest, DEFAULT_USER_ID, SUPPORTED_CURRENCIES,
    SUPPORTED_DATE_FORMATS, SUPPORTED_THEMES,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::settings::{DomainSettings, DEFAULT_CURRENCY};
use crate::storage::{Connection, SettingsStorage};

#[derive(Clone)]
pub struct SettingsService<C: Connection> {
    settings_repository: C::SettingsRepository,
}

impl<C: Connection> SettingsService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            settings_repository: connection.create_settings_repository(),
        }
    }

    pub async fn get_or_create_default(&self) -> DomainResult<DomainSettings> {
        if let Some(settings) = self.settings_repository.get_settings(DEFAULT_USER_ID).await? {
            return Ok(settings);
        }

        let settings = DomainSettings::defaults(Utc::now());
        self.settings_repository.store_settings(&settings).await?;
        info!("Created default settings for '{}'", DEFAULT_USER_ID);
        Ok(settings)
    }

    /// Apply the fields present in `request`; everything else keeps its
    /// stored value, or its default when no document exists yet
    pub async fn update_settings(&self, request: SettingsRequest) -> DomainResult<DomainSettings> {
        validate_request(&request)?;

        let mut settings = self.get_or_create_default().await?;

        if let Some(currency) = non_blank(request.currency) {
            settings.currency = currency;
        }
        if let Some(symbol) = non_blank(request.currency_symbol) {
            settings.currency_symbol = symbol;
        }
        if let Some(date_format) = non_blank(request.date_format) {
            settings.date_format = date_format;
        }
        if let Some(theme) = non_blank(request.theme) {
            settings.theme = theme;
        }
        if let Some(default_category) = non_blank(request.default_category) {
            settings.default_category = Some(default_category);
        }
        if let Some(budget_limit) = request.budget_limit {
            settings.budget_limit = budget_limit;
        }
        if let Some(notifications) = request.notifications {
            settings.notifications = notifications;
        }
        if let Some(auto_backup) = request.auto_backup {
            settings.auto_backup = auto_backup;
        }
        settings.updated_at = Utc::now();

        self.settings_repository.store_settings(&settings).await?;
        info!("Updated settings: currency={} theme={}", settings.currency, settings.theme);
        Ok(settings)
    }

    /// Drop the stored document; the next read recreates the defaults
    pub async fn reset_settings(&self) -> DomainResult<bool> {
        let removed = self.settings_repository.delete_settings(DEFAULT_USER_ID).await?;
        if removed {
            info!("Removed settings for '{}'", DEFAULT_USER_ID);
        }
        Ok(removed)
    }

    /// The active currency (falling back to the default when the stored code
    /// is unknown) and every supported currency keyed by code
    pub async fn currency_info(&self) -> DomainResult<(CurrencyInfo, BTreeMap<String, CurrencyInfo>, DomainSettings)> {
        let settings = self.get_or_create_default().await?;

        let available: BTreeMap<String, CurrencyInfo> = SUPPORTED_CURRENCIES
            .iter()
            .filter_map(|(code, _, _)| currency_info(code).map(|info| (code.to_string(), info)))
            .collect();

        let current = currency_info(&settings.currency)
            .or_else(|| currency_info(DEFAULT_CURRENCY))
            .ok_or_else(|| DomainError::Unexpected(anyhow::anyhow!("default currency missing")))?;

        Ok((current, available, settings))
    }
}

fn validate_request(request: &SettingsRequest) -> DomainResult<()> {
    if let Some(currency) = request.currency.as_deref().filter(|c| !c.trim().is_empty()) {
        if !is_supported_currency(currency) {
            return Err(DomainError::validation("Invalid currency"));
        }
    }
    if let Some(theme) = request.theme.as_deref().filter(|t| !t.trim().is_empty()) {
        if !SUPPORTED_THEMES.contains(&theme) {
            return Err(DomainError::validation("Invalid theme"));
        }
    }
    if let Some(format) = request.date_format.as_deref().filter(|f| !f.trim().is_empty()) {
        if !SUPPORTED_DATE_FORMATS.contains(&format) {
            return Err(DomainError::validation("Invalid date format"));
        }
    }
    if let Some(limit) = request.budget_limit {
        if !limit.is_finite() || limit < 0.0 {
            return Err(DomainError::validation("Budget limit must be a non-negative number"));
        }
    }
    Ok(())
}

pub fn is_supported_currency(code: &str) -> bool {
    SUPPORTED_CURRENCIES.iter().any(|(c, _, _)| *c == code)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
