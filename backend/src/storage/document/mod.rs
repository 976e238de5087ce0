//! YAML document store: one file per record, one directory per collection.

pub mod category_repository;
pub mod connection;
pub mod settings_repository;
pub mod transaction_repository;

#[cfg(test)]
pub mod test_utils;

pub use category_repository::CategoryRepository;
pub use connection::DocumentConnection;
pub use settings_repository::SettingsRepository;
pub use transaction_repository::TransactionRepository;
