//! # Domain Module
//!
//! Business rules of the finance tracker, independent of HTTP and of the
//! storage backend.
//!
//! ## Module Organization
//!
//! - **category_service**: category CRUD, uniqueness and delete guards
//! - **transaction_service**: expense/deposit CRUD shared by both kinds,
//!   alias normalization, collection summaries
//! - **settings_service**: the singleton settings document
//! - **analytics**: pure window resolution, aggregation and insight rules
//! - **analytics_service**: loads records and feeds them to `analytics`
//! - **sample_data**: seeds or wipes the store for local development
//!
//! ## Business Rules
//!
//! - Amounts are strictly positive; the collection carries the sign
//! - A transaction's category must exist when it is written, but nothing
//!   keeps it alive afterwards beyond the expense delete guard
//! - Settings exist implicitly, created with defaults on first read

pub mod analytics;
pub mod analytics_service;
pub mod category_service;
pub mod dates;
pub mod errors;
pub mod models;
pub mod sample_data;
pub mod settings_service;
pub mod transaction_service;

pub use analytics_service::AnalyticsService;
pub use category_service::CategoryService;
pub use errors::{DomainError, DomainResult};
pub use sample_data::SampleDataService;
pub use settings_service::SettingsService;
pub use transaction_service::TransactionService;
