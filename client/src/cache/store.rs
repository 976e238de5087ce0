use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use shared::{
    Category, CategoryRequest, SettingsRequest, Transaction, TransactionKind, TransactionRequest,
    UserSettings,
};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use super::entry::{CacheEntry, CacheSnapshot};
use super::persistence::SnapshotStore;
use super::{Collection, HEALTH_CHECK_TTL_MINUTES};
use crate::api::{ApiClient, FinanceApi};
use crate::clock::{Clock, SystemClock};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

const SERVER_UNAVAILABLE: &str = "API server is not available";
const SERVER_NOT_RESPONDING: &str = "API server is not responding";
const RECENT_PER_CATEGORY: usize = 3;

/// Result of the most recent health check
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionStatus {
    pub is_connected: bool,
    /// A health check is in flight
    pub checking: bool,
    pub error: Option<String>,
    pub last_checked: Option<DateTime<Utc>>,
    /// Consecutive health checks that failed outright
    pub retry_count: u32,
}

/// Spending in one category, derived from cached expenses
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub count: usize,
    pub total: f64,
    pub average: f64,
    /// Newest first by transaction date
    pub recent: Vec<Transaction>,
}

/// Records removed by [`DataStore::clear_all_data`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedCounts {
    pub expenses: usize,
    pub deposits: usize,
    pub categories: usize,
}

#[derive(Default)]
struct StoreState {
    categories: CacheEntry<Vec<Category>>,
    expenses: CacheEntry<Vec<Transaction>>,
    deposits: CacheEntry<Vec<Transaction>>,
    settings: CacheEntry<Option<UserSettings>>,
    connection: ConnectionStatus,
}

impl StoreState {
    fn transactions(&mut self, kind: TransactionKind) -> &mut CacheEntry<Vec<Transaction>> {
        match kind {
            TransactionKind::Expense => &mut self.expenses,
            TransactionKind::Deposit => &mut self.deposits,
        }
    }
}

type Selector<T> = fn(&mut StoreState) -> &mut CacheEntry<T>;

fn categories_entry(state: &mut StoreState) -> &mut CacheEntry<Vec<Category>> {
    &mut state.categories
}

fn expenses_entry(state: &mut StoreState) -> &mut CacheEntry<Vec<Transaction>> {
    &mut state.expenses
}

fn deposits_entry(state: &mut StoreState) -> &mut CacheEntry<Vec<Transaction>> {
    &mut state.deposits
}

fn settings_entry(state: &mut StoreState) -> &mut CacheEntry<Option<UserSettings>> {
    &mut state.settings
}

/// The application's single view of server data.
///
/// State sits behind a `std::sync::Mutex` that is only held between awaits,
/// never across one. Concurrent fetches of the same collection are not
/// coalesced: each checks freshness on its own and may hit the server.
pub struct DataStore<A> {
    api: A,
    clock: Arc<dyn Clock>,
    snapshots: SnapshotStore,
    state: Mutex<StoreState>,
}

impl DataStore<ApiClient> {
    /// HTTP-backed store configured from `config`
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let api = ApiClient::new(config)?;
        Ok(Self::new(api, SnapshotStore::from_optional(config.cache_dir.clone())))
    }
}

impl<A: FinanceApi> DataStore<A> {
    pub fn new(api: A, snapshots: SnapshotStore) -> Self {
        Self::with_clock(api, snapshots, Arc::new(SystemClock))
    }

    pub fn with_clock(api: A, snapshots: SnapshotStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            clock,
            snapshots,
            state: Mutex::new(StoreState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist<T: Serialize>(&self, collection: Collection, snapshot: &CacheSnapshot<T>) {
        if let Err(e) = self.snapshots.save(collection, snapshot) {
            warn!("Could not persist {}: {}", collection.storage_key(), e);
        }
    }

    /// Restore snapshots from durable storage, then check the server
    pub async fn initialize(&self) -> ConnectionStatus {
        info!("Initializing data store");

        let categories = self.load_snapshot::<Vec<Category>>(Collection::Categories);
        let expenses = self.load_snapshot::<Vec<Transaction>>(Collection::Expenses);
        let deposits = self.load_snapshot::<Vec<Transaction>>(Collection::Deposits);
        let settings = self.load_snapshot::<Option<UserSettings>>(Collection::Settings);

        {
            let mut state = self.lock();
            if let Some(snapshot) = categories {
                state.categories.restore(snapshot);
            }
            if let Some(snapshot) = expenses {
                state.expenses.restore(snapshot);
            }
            if let Some(snapshot) = deposits {
                state.deposits.restore(snapshot);
            }
            if let Some(snapshot) = settings {
                state.settings.restore(snapshot);
            }
        }

        self.check_connection(false).await;
        self.connection_status()
    }

    fn load_snapshot<T: serde::de::DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Option<CacheSnapshot<T>> {
        match self.snapshots.load(collection) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Ignoring snapshot {}: {}", collection.storage_key(), e);
                None
            }
        }
    }

    /// Ask the server whether it is up. The answer is trusted for two
    /// minutes unless `force` is set.
    pub async fn check_connection(&self, force: bool) -> bool {
        let now = self.clock.now();
        {
            let mut state = self.lock();
            let connection = &mut state.connection;
            if !force {
                if let Some(last_checked) = connection.last_checked {
                    if now - last_checked < Duration::minutes(HEALTH_CHECK_TTL_MINUTES) {
                        return connection.is_connected;
                    }
                }
            }
            connection.checking = true;
            connection.error = None;
        }

        let result = self.api.health().await;
        let checked_at = self.clock.now();

        let mut state = self.lock();
        let connection = &mut state.connection;
        connection.checking = false;
        match result {
            Ok(health) => {
                let healthy = health.status == "OK";
                connection.is_connected = healthy;
                connection.last_checked = Some(checked_at);
                connection.retry_count = 0;
                if healthy {
                    debug!("API connection verified");
                } else {
                    warn!("API health check reported status {}", health.status);
                    connection.error = Some(SERVER_NOT_RESPONDING.to_string());
                }
            }
            Err(e) => {
                error!("API health check failed: {}", e);
                connection.is_connected = false;
                connection.error = Some(e.to_string());
                connection.retry_count += 1;
            }
        }
        connection.is_connected
    }

    pub async fn refresh_connection(&self) -> bool {
        self.check_connection(true).await
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.lock().connection.clone()
    }

    async fn ensure_connected(&self) -> ClientResult<()> {
        if self.check_connection(false).await {
            Ok(())
        } else {
            Err(ClientError::Connectivity(SERVER_UNAVAILABLE.to_string()))
        }
    }

    async fn fetch_collection<T, F>(
        &self,
        collection: Collection,
        force: bool,
        select: Selector<T>,
        load: F,
    ) -> ClientResult<T>
    where
        T: Clone + Serialize,
        F: Future<Output = ClientResult<T>>,
    {
        let now = self.clock.now();
        {
            let mut state = self.lock();
            let entry = select(&mut state);
            if !force && entry.is_fresh(collection.ttl(), now) {
                debug!("Using cached {}", collection.storage_key());
                return Ok(entry.data.clone());
            }
        }

        self.ensure_connected().await?;
        select(&mut self.lock()).begin_fetch();

        debug!("Fetching {} from API", collection.storage_key());
        match load.await {
            Ok(data) => {
                let fetched_at = self.clock.now();
                let snapshot = {
                    let mut state = self.lock();
                    let entry = select(&mut state);
                    entry.complete_fetch(data.clone(), fetched_at);
                    entry.snapshot()
                };
                self.persist(collection, &snapshot);
                Ok(data)
            }
            Err(e) => {
                error!("Failed to fetch {}: {}", collection.storage_key(), e);
                select(&mut self.lock()).fail_fetch(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn fetch_categories(&self, force: bool) -> ClientResult<Vec<Category>> {
        let load = self.api.list_categories();
        self.fetch_collection(Collection::Categories, force, categories_entry, load)
            .await
    }

    pub async fn fetch_transactions(&self, kind: TransactionKind, force: bool) -> ClientResult<Vec<Transaction>> {
        let select: Selector<Vec<Transaction>> = match kind {
            TransactionKind::Expense => expenses_entry,
            TransactionKind::Deposit => deposits_entry,
        };
        let load = self.api.list_transactions(kind);
        self.fetch_collection(Collection::for_kind(kind), force, select, load)
            .await
    }

    pub async fn fetch_expenses(&self, force: bool) -> ClientResult<Vec<Transaction>> {
        self.fetch_transactions(TransactionKind::Expense, force).await
    }

    pub async fn fetch_deposits(&self, force: bool) -> ClientResult<Vec<Transaction>> {
        self.fetch_transactions(TransactionKind::Deposit, force).await
    }

    pub async fn fetch_settings(&self, force: bool) -> ClientResult<UserSettings> {
        let force = force || self.lock().settings.data.is_none();
        let load = async { self.api.get_settings().await.map(Some) };
        let settings = self
            .fetch_collection(Collection::Settings, force, settings_entry, load)
            .await?;
        settings.ok_or_else(|| ClientError::Decode("settings response was empty".to_string()))
    }

    /// Fetch every collection concurrently
    pub async fn load_all(&self, force: bool) -> ClientResult<()> {
        tokio::try_join!(
            self.fetch_categories(force),
            self.fetch_expenses(force),
            self.fetch_deposits(force),
            self.fetch_settings(force),
        )?;
        Ok(())
    }

    pub async fn create_category(&self, request: &CategoryRequest) -> ClientResult<Category> {
        self.ensure_connected().await?;
        let created = self.api.create_category(request).await?;

        let snapshot = {
            let mut state = self.lock();
            state.categories.data.push(created.clone());
            state.categories.snapshot()
        };
        self.persist(Collection::Categories, &snapshot);

        info!("Category created: {}", created.name);
        Ok(created)
    }

    pub async fn update_category(&self, id: &str, request: &CategoryRequest) -> ClientResult<Category> {
        self.ensure_connected().await?;
        let updated = self.api.update_category(id, request).await?;

        let snapshot = {
            let mut state = self.lock();
            if let Some(slot) = state.categories.data.iter_mut().find(|c| c.id == id) {
                *slot = updated.clone();
            }
            state.categories.snapshot()
        };
        self.persist(Collection::Categories, &snapshot);

        info!("Category updated: {}", updated.name);
        Ok(updated)
    }

    /// Embedded category fields on cached transactions may now be stale, so
    /// both transaction caches are marked dirty rather than patched.
    pub async fn delete_category(&self, id: &str) -> ClientResult<()> {
        self.ensure_connected().await?;
        self.api.delete_category(id).await?;

        let snapshot = {
            let mut state = self.lock();
            state.categories.data.retain(|c| c.id != id);
            state.expenses.dirty = true;
            state.deposits.dirty = true;
            state.categories.snapshot()
        };
        self.persist(Collection::Categories, &snapshot);

        info!("Category deleted: {}", id);
        Ok(())
    }

    pub async fn create_transaction(
        &self,
        kind: TransactionKind,
        request: &TransactionRequest,
    ) -> ClientResult<Transaction> {
        self.ensure_connected().await?;
        let created = self.api.create_transaction(kind, request).await?;

        let snapshot = {
            let mut state = self.lock();
            let entry = state.transactions(kind);
            entry.data.insert(0, created.clone());
            entry.snapshot()
        };
        self.persist(Collection::for_kind(kind), &snapshot);

        info!("{} created: {}", kind.label(), created.title);
        Ok(created)
    }

    pub async fn update_transaction(
        &self,
        kind: TransactionKind,
        id: &str,
        request: &TransactionRequest,
    ) -> ClientResult<Transaction> {
        self.ensure_connected().await?;
        let updated = self.api.update_transaction(kind, id, request).await?;

        let snapshot = {
            let mut state = self.lock();
            let entry = state.transactions(kind);
            if let Some(slot) = entry.data.iter_mut().find(|t| t.id == id) {
                *slot = updated.clone();
            }
            entry.snapshot()
        };
        self.persist(Collection::for_kind(kind), &snapshot);

        info!("{} updated: {}", kind.label(), updated.title);
        Ok(updated)
    }

    pub async fn delete_transaction(&self, kind: TransactionKind, id: &str) -> ClientResult<()> {
        self.ensure_connected().await?;
        self.api.delete_transaction(kind, id).await?;

        let snapshot = {
            let mut state = self.lock();
            let entry = state.transactions(kind);
            entry.data.retain(|t| t.id != id);
            entry.snapshot()
        };
        self.persist(Collection::for_kind(kind), &snapshot);

        info!("{} deleted: {}", kind.label(), id);
        Ok(())
    }

    pub async fn update_settings(&self, request: &SettingsRequest) -> ClientResult<UserSettings> {
        self.ensure_connected().await?;
        let updated = self.api.update_settings(request).await?;

        let snapshot = {
            let mut state = self.lock();
            state.settings.data = Some(updated.clone());
            state.settings.snapshot()
        };
        self.persist(Collection::Settings, &snapshot);

        info!("Settings updated");
        Ok(updated)
    }

    /// Wipe the server and the local cache. Expenses go first because they
    /// block category deletion.
    pub async fn clear_all_data(&self) -> ClientResult<ClearedCounts> {
        self.ensure_connected().await?;

        let expenses = self.api.clear_transactions(TransactionKind::Expense).await?;
        let deposits = self.api.clear_transactions(TransactionKind::Deposit).await?;
        let categories = self.api.clear_categories().await?;

        {
            let mut state = self.lock();
            state.expenses = CacheEntry::default();
            state.deposits = CacheEntry::default();
            state.categories = CacheEntry::default();
        }

        for collection in Collection::ALL {
            if let Err(e) = self.snapshots.remove(collection) {
                warn!("Could not remove {}: {}", collection.storage_key(), e);
            }
        }

        let cleared = ClearedCounts {
            expenses: expenses.deleted_count,
            deposits: deposits.deleted_count,
            categories: categories.deleted_count,
        };
        info!("Cleared all data: {:?}", cleared);
        Ok(cleared)
    }

    pub fn categories(&self) -> Vec<Category> {
        self.lock().categories.data.clone()
    }

    pub fn transactions(&self, kind: TransactionKind) -> Vec<Transaction> {
        self.lock().transactions(kind).data.clone()
    }

    pub fn expenses(&self) -> Vec<Transaction> {
        self.transactions(TransactionKind::Expense)
    }

    pub fn deposits(&self) -> Vec<Transaction> {
        self.transactions(TransactionKind::Deposit)
    }

    pub fn settings(&self) -> Option<UserSettings> {
        self.lock().settings.data.clone()
    }

    pub fn category_cache(&self) -> CacheEntry<Vec<Category>> {
        self.lock().categories.clone()
    }

    pub fn transaction_cache(&self, kind: TransactionKind) -> CacheEntry<Vec<Transaction>> {
        self.lock().transactions(kind).clone()
    }

    pub fn settings_cache(&self) -> CacheEntry<Option<UserSettings>> {
        self.lock().settings.clone()
    }

    pub fn category_stats(&self, category_id: &str) -> CategoryStats {
        let mut matching: Vec<Transaction> = self
            .lock()
            .expenses
            .data
            .iter()
            .filter(|e| e.category_id == category_id)
            .cloned()
            .collect();

        let count = matching.len();
        let total: f64 = matching.iter().map(|e| e.amount).sum();
        let average = if count > 0 { total / count as f64 } else { 0.0 };

        matching.sort_by(|a, b| b.date.cmp(&a.date));
        matching.truncate(RECENT_PER_CATEGORY);

        CategoryStats {
            count,
            total,
            average,
            recent: matching,
        }
    }
}
