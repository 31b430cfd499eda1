//! In-memory catalog of every TIL note, rebuilt from the content store when stale.
//!
//! The catalog is an immutable snapshot behind an `Arc`. A refresh builds a new
//! snapshot and swaps the reference under a short write lock, so readers always
//! see either the old or the new catalog in full. Concurrent refreshes are not
//! deduplicated; a reload has no side effects beyond replacing the snapshot.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use til_types::{CatalogInfo, TilEntry};

use super::store::ContentStore;

/// Source of "now" for TTL checks
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// One loaded view of the content tree
#[derive(Debug, Clone)]
pub struct Catalog {
    pub entries: Vec<TilEntry>,
    /// Distinct entry categories, ascending
    pub categories: Vec<String>,
    pub refreshed_at: DateTime<Utc>,
}

impl Catalog {
    pub fn new(entries: Vec<TilEntry>, refreshed_at: DateTime<Utc>) -> Self {
        let categories = entries
            .iter()
            .map(|e| e.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Self {
            entries,
            categories,
            refreshed_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct CatalogCache {
    store: Arc<dyn ContentStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    current: RwLock<Option<Arc<Catalog>>>,
}

impl CatalogCache {
    pub fn new(store: Arc<dyn ContentStore>, ttl: Duration) -> Self {
        Self::with_clock(store, Arc::new(SystemClock), ttl)
    }

    pub fn with_clock(store: Arc<dyn ContentStore>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            store,
            clock,
            ttl,
            current: RwLock::new(None),
        }
    }

    /// Current catalog, reloading from the store first when it is missing,
    /// empty, or older than the TTL.
    pub async fn get_catalog(&self) -> Arc<Catalog> {
        let cached = self.current.read().clone();
        if let Some(catalog) = cached {
            if !self.needs_refresh(&catalog) {
                log::debug!("[TIL] Catalog cache hit ({} entries)", catalog.entries.len());
                return catalog;
            }
        }
        self.refresh().await
    }

    /// Reload from the store unconditionally and publish the new snapshot
    pub async fn refresh(&self) -> Arc<Catalog> {
        let entries = self.store.list_all().await;
        let catalog = Arc::new(Catalog::new(entries, self.clock.now()));

        log::info!(
            "[TIL] Catalog refreshed from {}: {} entries in {} categories",
            self.store.describe(),
            catalog.entries.len(),
            catalog.categories.len()
        );
        if catalog.is_empty() {
            log::warn!("[TIL] Catalog is empty; the next request will rescan");
        }

        *self.current.write() = Some(Arc::clone(&catalog));
        catalog
    }

    /// Drop the current snapshot so the next read reloads
    pub fn invalidate(&self) {
        *self.current.write() = None;
    }

    /// Describe the cached snapshot without triggering a reload
    pub fn info(&self) -> CatalogInfo {
        let cached = self.current.read().clone();
        let (total, categories, refreshed_at) = match cached {
            Some(catalog) => (
                catalog.entries.len(),
                catalog.categories.clone(),
                Some(catalog.refreshed_at),
            ),
            None => (0, Vec::new(), None),
        };

        CatalogInfo {
            total,
            categories,
            refreshed_at,
            ttl_secs: self.ttl.as_secs(),
            source: self.store.describe(),
        }
    }

    fn needs_refresh(&self, catalog: &Catalog) -> bool {
        if catalog.is_empty() {
            return true;
        }
        // A clock that went backwards counts as fresh
        match self.clock.now().signed_duration_since(catalog.refreshed_at).to_std() {
            Ok(elapsed) => elapsed > self.ttl,
            Err(_) => false,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::ManualClock;
    use super::*;
    use crate::til::memory_store::MemoryContentStore;
    use chrono::TimeZone;

    const TTL: Duration = Duration::from_secs(3600);

    fn setup(files: &[(&str, &str)]) -> (Arc<MemoryContentStore>, Arc<ManualClock>, CatalogCache) {
        let store = Arc::new(MemoryContentStore::with_files(files));
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let cache = CatalogCache::with_clock(store.clone(), clock.clone(), TTL);
        (store, clock, cache)
    }

    #[tokio::test]
    async fn test_first_call_loads() {
        let (store, _clock, cache) = setup(&[("rust/a.md", "A"), ("go/b.md", "B")]);
        assert_eq!(store.list_calls(), 0);

        let catalog = cache.get_catalog().await;
        assert_eq!(store.list_calls(), 1);
        assert_eq!(catalog.entries.len(), 2);
        assert_eq!(catalog.categories, vec!["Go", "Rust"]);
    }

    #[tokio::test]
    async fn test_cached_within_ttl() {
        let (store, clock, cache) = setup(&[("rust/a.md", "A")]);
        let first = cache.get_catalog().await;

        store.insert("rust/b.md", "B");
        clock.advance(TTL);
        let second = cache.get_catalog().await;

        assert_eq!(store.list_calls(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_reloads_once_after_ttl() {
        let (store, clock, cache) = setup(&[("rust/a.md", "A")]);
        cache.get_catalog().await;

        store.insert("go/b.md", "B");
        clock.advance(TTL + Duration::from_secs(1));

        let catalog = cache.get_catalog().await;
        assert_eq!(store.list_calls(), 2);
        assert_eq!(catalog.entries.len(), 2);
        assert_eq!(catalog.categories, vec!["Go", "Rust"]);

        // Fresh again after the reload
        cache.get_catalog().await;
        assert_eq!(store.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_catalog_retries_every_call() {
        let (store, _clock, cache) = setup(&[]);
        assert!(cache.get_catalog().await.is_empty());
        assert!(cache.get_catalog().await.is_empty());
        assert_eq!(store.list_calls(), 2);

        store.insert("rust/a.md", "A");
        let catalog = cache.get_catalog().await;
        assert_eq!(catalog.entries.len(), 1);
        assert_eq!(store.list_calls(), 3);

        cache.get_catalog().await;
        assert_eq!(store.list_calls(), 3);
    }

    #[tokio::test]
    async fn test_refresh_replaces_wholesale() {
        let (store, _clock, cache) = setup(&[("rust/a.md", "A"), ("go/b.md", "B")]);
        let before = cache.get_catalog().await;

        store.remove("go/b.md");
        let after = cache.refresh().await;

        assert_eq!(before.entries.len(), 2);
        assert_eq!(after.entries.len(), 1);
        assert_eq!(after.categories, vec!["Rust"]);
    }

    #[tokio::test]
    async fn test_invalidate_and_info() {
        let (store, clock, cache) = setup(&[("rust/a.md", "A")]);

        let info = cache.info();
        assert_eq!(info.total, 0);
        assert!(info.refreshed_at.is_none());
        assert_eq!(info.ttl_secs, 3600);
        assert_eq!(info.source, "memory");

        cache.get_catalog().await;
        let info = cache.info();
        assert_eq!(info.total, 1);
        assert_eq!(info.categories, vec!["Rust"]);
        assert_eq!(info.refreshed_at, Some(clock.now()));

        cache.invalidate();
        assert_eq!(cache.info().total, 0);
        cache.get_catalog().await;
        assert_eq!(store.list_calls(), 2);
    }

    #[test]
    fn test_catalog_categories_sorted_and_distinct() {
        let entry = |category: &str, path: &str| TilEntry {
            title: String::new(),
            category: category.to_string(),
            content: String::new(),
            path: path.to_string(),
        };
        let catalog = Catalog::new(
            vec![
                entry("Vim", "vim/a.md"),
                entry("Git", "git/b.md"),
                entry("Vim", "vim/c.md"),
                entry("General", "d.md"),
            ],
            Utc::now(),
        );
        assert_eq!(catalog.categories, vec!["General", "Git", "Vim"]);
    }
}
