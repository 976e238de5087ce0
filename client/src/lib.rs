//! # Finance Tracker Client
//!
//! Client-side data layer for the finance tracker API: a typed HTTP client,
//! a TTL cache over the four collections with durable snapshots, and the
//! helpers views use to render amounts and charts.
//!
//! The cache is an explicit [`DataStore`] value. Construct one per
//! application and share it behind an `Arc`.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod view;

pub use api::{ApiClient, FinanceApi};
pub use cache::{
    CacheEntry, CategoryStats, ClearedCounts, Collection, ConnectionStatus, DataStore, SnapshotStore,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ClientConfig, ClientEnvironment};
pub use error::{ClientError, ClientResult};
