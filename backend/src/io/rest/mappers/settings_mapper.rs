use crate::domain::models::settings::DomainSettings;
use shared::UserSettings;

pub struct SettingsMapper;

impl SettingsMapper {
    pub fn to_dto(domain: DomainSettings) -> UserSettings {
        UserSettings {
            user_id: domain.user_id,
            currency: domain.currency,
            currency_symbol: domain.currency_symbol,
            date_format: domain.date_format,
            theme: domain.theme,
            budget_limit: domain.budget_limit,
            notifications: domain.notifications,
            auto_backup: domain.auto_backup,
            default_category: domain.default_category,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
