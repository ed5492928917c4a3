use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::key::{InvalidationTable, MutationKind, QueryKey};
use super::view::ViewHandle;
use crate::error::Result;

#[derive(Debug, Default)]
struct Entry {
    data: Option<Value>,
    stale: bool,
    in_flight: usize,
    /// Bumped on every invalidation so a fetch that started earlier
    /// cannot mark its result fresh.
    generation: u64,
}

impl Entry {
    fn is_fresh(&self) -> bool {
        self.data.is_some() && !self.stale
    }
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<QueryKey, Entry>,
    mutating: HashMap<MutationKind, usize>,
    views: HashMap<QueryKey, HashSet<u64>>,
    next_view: u64,
}

/// Process-wide query cache.
///
/// Holds the last fetched payload per [`QueryKey`] plus a staleness flag.
/// Mutations run through [`QueryCache::mutate`]; on success every key the
/// [`InvalidationTable`] lists for that mutation is marked stale so the next
/// read goes back to the server. Nothing is ever patched locally.
///
/// Clones share the same state.
#[derive(Debug, Clone)]
pub struct QueryCache {
    inner: Arc<Mutex<Inner>>,
    table: Arc<InvalidationTable>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(InvalidationTable::standard())
    }
}

impl QueryCache {
    pub fn new(table: InvalidationTable) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            table: Arc::new(table),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn table(&self) -> &InvalidationTable {
        &self.table
    }

    /// Read `key`, calling `fetcher` only when there is no fresh entry.
    ///
    /// While the fetcher runs the key reports [`is_loading`](Self::is_loading).
    /// A failed fetch leaves whatever was cached before in place.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let started_at = {
            let mut inner = self.lock();
            let entry = inner.entries.entry(key).or_default();
            if entry.is_fresh() {
                if let Some(data) = entry.data.clone() {
                    debug!("query {} served from cache", key);
                    return Ok(serde_json::from_value(data)?);
                }
            }
            entry.in_flight += 1;
            entry.generation
        };
        let loading = Pending::query(self, key);

        debug!("query {} fetching", key);
        let result = fetcher().await;
        drop(loading);

        let mut inner = self.lock();
        let entry = inner.entries.entry(key).or_default();

        match result {
            Ok(value) => {
                entry.data = Some(serde_json::to_value(&value)?);
                entry.stale = entry.generation != started_at;
                Ok(value)
            }
            Err(e) => {
                warn!("query {} failed, keeping previous data: {}", key, e);
                Err(e)
            }
        }
    }

    /// Run a server-side write once. On success the dependent keys are
    /// invalidated; on failure the cache is left exactly as it was.
    pub async fn mutate<T, Fut>(&self, kind: MutationKind, op: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        *self.lock().mutating.entry(kind).or_default() += 1;
        let saving = Pending::mutation(self, kind);
        let result = op.await;
        drop(saving);

        match result {
            Ok(value) => {
                for key in self.table.dependents(kind) {
                    self.invalidate(*key);
                }
                Ok(value)
            }
            Err(e) => {
                warn!("mutation {:?} failed: {}", kind, e);
                Err(e)
            }
        }
    }

    /// Mark `key` stale so the next read refetches it.
    pub fn invalidate(&self, key: QueryKey) {
        let mut inner = self.lock();
        let entry = inner.entries.entry(key).or_default();
        entry.stale = true;
        entry.generation += 1;
        debug!("query {} invalidated", key);
    }

    pub fn is_stale(&self, key: QueryKey) -> bool {
        self.lock().entries.get(&key).map_or(true, |e| !e.is_fresh())
    }

    pub fn is_loading(&self, key: QueryKey) -> bool {
        self.lock().entries.get(&key).map_or(false, |e| e.in_flight > 0)
    }

    /// Whether a `kind` mutation is running, e.g. to disable a submit button
    pub fn is_mutating(&self, kind: MutationKind) -> bool {
        self.lock().mutating.get(&kind).map_or(false, |n| *n > 0)
    }

    /// Last payload stored under `key`, stale or not, without fetching.
    pub fn peek<T: DeserializeOwned>(&self, key: QueryKey) -> Option<T> {
        let data = self.lock().entries.get(&key)?.data.clone()?;
        serde_json::from_value(data).ok()
    }

    /// Register a view interested in `key`. Dropping the handle deregisters it.
    pub fn subscribe(&self, key: QueryKey) -> ViewHandle {
        let id = {
            let mut inner = self.lock();
            inner.next_view += 1;
            let id = inner.next_view;
            inner.views.entry(key).or_default().insert(id);
            id
        };
        debug!("view {} subscribed to {}", id, key);
        ViewHandle::new(self.clone(), key, id)
    }

    pub fn subscriber_count(&self, key: QueryKey) -> usize {
        self.lock().views.get(&key).map_or(0, HashSet::len)
    }

    pub(crate) fn is_subscribed(&self, key: QueryKey, id: u64) -> bool {
        self.lock().views.get(&key).map_or(false, |ids| ids.contains(&id))
    }

    pub(crate) fn unsubscribe(&self, key: QueryKey, id: u64) {
        if let Some(ids) = self.lock().views.get_mut(&key) {
            if ids.remove(&id) {
                debug!("view {} unsubscribed from {}", id, key);
            }
        }
    }
}

/// Undoes an in-flight count when the operation finishes or its future is dropped.
struct Pending<'a> {
    cache: &'a QueryCache,
    what: PendingKind,
}

enum PendingKind {
    Query(QueryKey),
    Mutation(MutationKind),
}

impl<'a> Pending<'a> {
    fn query(cache: &'a QueryCache, key: QueryKey) -> Self {
        Self {
            cache,
            what: PendingKind::Query(key),
        }
    }

    fn mutation(cache: &'a QueryCache, kind: MutationKind) -> Self {
        Self {
            cache,
            what: PendingKind::Mutation(kind),
        }
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        let mut inner = self.cache.lock();
        match self.what {
            PendingKind::Query(key) => {
                if let Some(entry) = inner.entries.get_mut(&key) {
                    entry.in_flight = entry.in_flight.saturating_sub(1);
                }
            }
            PendingKind::Mutation(kind) => {
                if let Some(count) = inner.mutating.get_mut(&kind) {
                    *count = count.saturating_sub(1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counting_fetch<'a>(
        calls: &'a AtomicUsize,
        items: Vec<&'static str>,
    ) -> impl Future<Output = Result<Vec<String>>> + 'a {
        calls.fetch_add(1, Ordering::SeqCst);
        let items: Vec<String> = items.into_iter().map(String::from).collect();
        async move { Ok(items) }
    }

    #[tokio::test]
    async fn fresh_entry_is_served_without_fetching() {
        let cache = QueryCache::default();
        let calls = AtomicUsize::new(0);

        let first: Vec<String> = cache
            .fetch(QueryKey::Categories, || counting_fetch(&calls, vec!["Lounge"]))
            .await
            .unwrap();
        let second: Vec<String> = cache
            .fetch(QueryKey::Categories, || counting_fetch(&calls, vec!["ignored"]))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!cache.is_stale(QueryKey::Categories));
    }

    #[tokio::test]
    async fn successful_mutation_forces_refetch() {
        let cache = QueryCache::default();
        let calls = AtomicUsize::new(0);

        let _: Vec<String> = cache
            .fetch(QueryKey::Categories, || counting_fetch(&calls, vec!["Lounge"]))
            .await
            .unwrap();

        cache
            .mutate(MutationKind::CreateCategory, async { Ok(()) })
            .await
            .unwrap();
        assert!(cache.is_stale(QueryKey::Categories));

        let after: Vec<String> = cache
            .fetch(QueryKey::Categories, || {
                counting_fetch(&calls, vec!["Lounge", "Outdoor"])
            })
            .await
            .unwrap();

        assert_eq!(after, vec!["Lounge", "Outdoor"]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_mutation_leaves_cache_untouched() {
        let cache = QueryCache::default();
        let calls = AtomicUsize::new(0);

        let _: Vec<String> = cache
            .fetch(QueryKey::Products, || counting_fetch(&calls, vec!["Sofa"]))
            .await
            .unwrap();

        let result: Result<()> = cache
            .mutate(MutationKind::DeleteProduct, async {
                Err(Error::api(500, None))
            })
            .await;
        assert!(result.is_err());
        assert!(!cache.is_stale(QueryKey::Products));

        let served: Vec<String> = cache
            .fetch(QueryKey::Products, || counting_fetch(&calls, vec!["other"]))
            .await
            .unwrap();
        assert_eq!(served, vec!["Sofa"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_data() {
        let cache = QueryCache::default();
        let calls = AtomicUsize::new(0);

        let _: Vec<String> = cache
            .fetch(QueryKey::Images, || counting_fetch(&calls, vec!["a.png"]))
            .await
            .unwrap();
        cache.invalidate(QueryKey::Images);

        let failed: Result<Vec<String>> = cache
            .fetch(QueryKey::Images, || async { Err(Error::api(502, None)) })
            .await;
        assert!(failed.is_err());
        assert!(!cache.is_loading(QueryKey::Images));
        assert_eq!(
            cache.peek::<Vec<String>>(QueryKey::Images),
            Some(vec!["a.png".to_string()])
        );
    }

    #[tokio::test]
    async fn invalidation_during_fetch_keeps_entry_stale() {
        let cache = QueryCache::default();
        let inner = cache.clone();

        let _: Vec<String> = cache
            .fetch(QueryKey::Blogs, || async move {
                inner.invalidate(QueryKey::Blogs);
                Ok(vec!["old".to_string()])
            })
            .await
            .unwrap();

        assert!(cache.is_stale(QueryKey::Blogs));
    }

    #[tokio::test]
    async fn custom_table_fans_out() {
        let table = InvalidationTable::new()
            .on(MutationKind::UpdateCategory, &[QueryKey::Categories, QueryKey::Products]);
        let cache = QueryCache::new(table);
        let calls = AtomicUsize::new(0);

        let _: Vec<String> = cache
            .fetch(QueryKey::Products, || counting_fetch(&calls, vec!["Sofa"]))
            .await
            .unwrap();
        cache
            .mutate(MutationKind::UpdateCategory, async { Ok(()) })
            .await
            .unwrap();

        assert!(cache.is_stale(QueryKey::Products));
    }

    #[tokio::test]
    async fn abandoned_fetch_stops_loading() {
        let cache = QueryCache::default();

        let slow = cache.fetch(QueryKey::Products, || async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Ok(vec!["late".to_string()])
        });
        let timed_out = tokio::time::timeout(Duration::from_millis(20), slow).await;

        assert!(timed_out.is_err());
        assert!(!cache.is_loading(QueryKey::Products));
        assert_eq!(cache.peek::<Vec<String>>(QueryKey::Products), None);
    }

    #[tokio::test]
    async fn mutation_is_visible_while_running() {
        let cache = QueryCache::default();
        let watcher = cache.clone();

        let (_, seen) = tokio::join!(
            cache.mutate(MutationKind::CreateProduct, async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(())
            }),
            async move { watcher.is_mutating(MutationKind::CreateProduct) }
        );

        assert!(seen);
        assert!(!cache.is_mutating(MutationKind::CreateProduct));
    }

    #[tokio::test]
    async fn abandoned_mutation_is_not_left_running() {
        let cache = QueryCache::default();

        let slow = cache.mutate(MutationKind::UpdateCategory, async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Ok(())
        });
        assert!(tokio::time::timeout(Duration::from_millis(20), slow)
            .await
            .is_err());

        assert!(!cache.is_mutating(MutationKind::UpdateCategory));
    }
}
