//! # Finance Tracker Backend
//!
//! REST API for expenses, deposits, categories and settings, backed by a
//! YAML document store.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (axum REST handlers, error mapping)
//!     ↓
//! Domain Layer (services, analytics, validation)
//!     ↓
//! Storage Layer (document store behind the storage traits)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::Router;
use shared::TransactionKind;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::config::{AppConfig, Environment};
use crate::domain::{
    AnalyticsService, CategoryService, DomainError, SettingsService, TransactionService,
};
use crate::io::rest::error::ApiError;
use crate::storage::DocumentConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub category_service: CategoryService<DocumentConnection>,
    pub expense_service: TransactionService<DocumentConnection>,
    pub deposit_service: TransactionService<DocumentConnection>,
    pub settings_service: SettingsService<DocumentConnection>,
    pub analytics_service: AnalyticsService<DocumentConnection>,
    pub environment: Environment,
    pub config: Arc<AppConfig>,
    pub started_at: Instant,
}

impl AppState {
    /// The service bound to one transaction collection
    pub fn transactions(&self, kind: TransactionKind) -> &TransactionService<DocumentConnection> {
        match kind {
            TransactionKind::Expense => &self.expense_service,
            TransactionKind::Deposit => &self.deposit_service,
        }
    }

    pub fn api_error(&self, error: DomainError) -> ApiError {
        ApiError::new(error, self.environment.exposes_error_details())
    }
}

/// Initialize the backend with all required services
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Opening document store at {}", config.data_dir.display());
    let connection = Arc::new(DocumentConnection::new(&config.data_dir)?);

    info!("Setting up domain services");
    let settings_service = SettingsService::new(connection.clone());
    let category_service = CategoryService::new(connection.clone());
    let expense_service =
        TransactionService::new(connection.clone(), TransactionKind::Expense, settings_service.clone());
    let deposit_service =
        TransactionService::new(connection.clone(), TransactionKind::Deposit, settings_service.clone());
    let analytics_service = AnalyticsService::new(
        connection,
        expense_service.clone(),
        deposit_service.clone(),
        settings_service.clone(),
    );

    Ok(AppState {
        category_service,
        expense_service,
        deposit_service,
        settings_service,
        analytics_service,
        environment: config.environment,
        config: Arc::new(config.clone()),
        started_at: Instant::now(),
    })
}

/// Build the fully configured router for `config`
pub fn build_app(config: &AppConfig) -> Result<Router> {
    let state = initialize_backend(config)?;
    Ok(io::rest::create_router(state, &config.cors_origins))
}
