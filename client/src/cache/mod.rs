//! # Client Data Cache
//!
//! Per-collection TTL cache in front of the API with durable snapshots.
//!
//! ## Freshness
//! A collection is served from memory while it is younger than its TTL and
//! not marked dirty. Otherwise the store confirms the server is reachable
//! (itself cached for two minutes) and refetches the whole collection.
//!
//! ## Mutations
//! Creates, updates and deletes go to the server first and, on success,
//! patch the cached list in place instead of refetching. Deleting a
//! category marks expenses and deposits dirty because their embedded
//! category fields may be stale.

mod entry;
mod persistence;
mod store;

pub use entry::{CacheEntry, CacheSnapshot};
pub use persistence::SnapshotStore;
pub use store::{CategoryStats, ClearedCounts, ConnectionStatus, DataStore};

use chrono::Duration;
use shared::TransactionKind;

/// How long a health check result is trusted
pub const HEALTH_CHECK_TTL_MINUTES: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Categories,
    Expenses,
    Deposits,
    Settings,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Categories,
        Collection::Expenses,
        Collection::Deposits,
        Collection::Settings,
    ];

    /// Expenses change most often and expire soonest
    pub fn ttl(&self) -> Duration {
        match self {
            Collection::Categories => Duration::minutes(10),
            Collection::Expenses => Duration::minutes(5),
            Collection::Deposits => Duration::minutes(10),
            Collection::Settings => Duration::minutes(30),
        }
    }

    pub fn storage_key(&self) -> &'static str {
        match self {
            Collection::Categories => "finance_tracker_categories",
            Collection::Expenses => "finance_tracker_expenses",
            Collection::Deposits => "finance_tracker_deposits",
            Collection::Settings => "finance_tracker_settings",
        }
    }

    pub fn for_kind(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Expense => Collection::Expenses,
            TransactionKind::Deposit => Collection::Deposits,
        }
    }
}
