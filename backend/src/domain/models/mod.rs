pub mod category;
pub mod settings;
pub mod transaction;
