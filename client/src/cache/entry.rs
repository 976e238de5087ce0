use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Cached state of one collection
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub data: T,
    /// A fetch is in flight
    pub loading: bool,
    /// Message of the last failed fetch, cleared when a new fetch starts
    pub error: Option<String>,
    pub last_fetched_at: Option<DateTime<Utc>>,
    /// Forces the next read to go to the server regardless of age
    pub dirty: bool,
}

impl<T: Default> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            data: T::default(),
            loading: false,
            error: None,
            last_fetched_at: None,
            dirty: false,
        }
    }
}

impl<T> CacheEntry<T> {
    /// Usable without a network call: not dirty and younger than `ttl`
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        if self.dirty {
            return false;
        }
        match self.last_fetched_at {
            Some(fetched_at) => now - fetched_at < ttl,
            None => false,
        }
    }

    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn complete_fetch(&mut self, data: T, now: DateTime<Utc>) {
        self.data = data;
        self.loading = false;
        self.last_fetched_at = Some(now);
        self.dirty = false;
    }

    pub fn fail_fetch(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub fn restore(&mut self, snapshot: CacheSnapshot<T>) {
        self.data = snapshot.data;
        self.last_fetched_at = snapshot.last_fetched_at;
    }
}

impl<T: Clone> CacheEntry<T> {
    pub fn snapshot(&self) -> CacheSnapshot<T> {
        CacheSnapshot {
            data: self.data.clone(),
            last_fetched_at: self.last_fetched_at,
        }
    }
}

/// What survives a restart: the data and when it was fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSnapshot<T> {
    pub data: T,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_freshness_respects_ttl_and_dirty_flag() {
        let fetched = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let ttl = Duration::minutes(5);
        let mut entry: CacheEntry<Vec<u32>> = CacheEntry::default();

        assert!(!entry.is_fresh(ttl, fetched));

        entry.complete_fetch(vec![1, 2], fetched);
        assert!(entry.is_fresh(ttl, fetched + Duration::minutes(4)));
        assert!(!entry.is_fresh(ttl, fetched + Duration::minutes(5)));

        entry.dirty = true;
        assert!(!entry.is_fresh(ttl, fetched));
    }

    #[test]
    fn test_failed_fetch_keeps_data() {
        let mut entry = CacheEntry {
            data: vec!["kept"],
            ..CacheEntry::default()
        };
        entry.begin_fetch();
        assert!(entry.loading);

        entry.fail_fetch("boom".to_string());
        assert!(!entry.loading);
        assert_eq!(entry.error.as_deref(), Some("boom"));
        assert_eq!(entry.data, vec!["kept"]);
    }
}
