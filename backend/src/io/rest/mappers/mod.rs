//! Conversions between domain models and the wire DTOs in `shared`.

pub mod category_mapper;
pub mod settings_mapper;
pub mod transaction_mapper;

pub use category_mapper::CategoryMapper;
pub use settings_mapper::SettingsMapper;
pub use transaction_mapper::TransactionMapper;
