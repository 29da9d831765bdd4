// src/query_cache.rs
use crate::podcast::PodcastId;
use log::{debug, trace};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Entities the cache knows about. Mirrors the invalidation events the backend emits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    AllPodcasts,
    Podcast(PodcastId),
    PodcastEpisodes(PodcastId),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::AllPodcasts => write!(f, "podcasts"),
            QueryKey::Podcast(id) => write!(f, "podcast/{}", id),
            QueryKey::PodcastEpisodes(id) => write!(f, "podcast/{}/episodes", id),
        }
    }
}

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
}

/// Process-wide query cache. Built once by the shell and handed down through
/// the shell context; there is no global instance.
pub struct QueryCache {
    stale_time: Duration,
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
}

impl QueryCache {
    pub fn new(stale_time: Duration) -> Self {
        Self { stale_time, entries: Mutex::new(HashMap::new()) }
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    /// Returns the cached value for `key` while it is fresh, otherwise runs
    /// `fetch` and stores its result. Failed fetches are not cached.
    ///
    /// The lock is not held across `fetch`, so two concurrent misses on the
    /// same key both fetch; the later write wins.
    pub async fn fetch_query<T, E, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<Arc<T>, E>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get_fresh::<T>(&key).await {
            trace!("QueryCache: hit for {}", key);
            return Ok(hit);
        }

        debug!("QueryCache: miss for {}, fetching", key);
        let value = Arc::new(fetch().await?);
        let erased: Arc<dyn Any + Send + Sync> = value.clone();
        self.entries
            .lock()
            .await
            .insert(key, CacheEntry { value: erased, fetched_at: Instant::now() });
        Ok(value)
    }

    async fn get_fresh<T: Any + Send + Sync>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let entries = self.entries.lock().await;
        let entry = entries.get(key)?;
        if entry.fetched_at.elapsed() >= self.stale_time {
            return None;
        }
        entry.value.clone().downcast::<T>().ok()
    }

    pub async fn invalidate(&self, key: &QueryKey) -> bool {
        let removed = self.entries.lock().await.remove(key).is_some();
        debug!("QueryCache: invalidated {} (was cached: {})", key, removed);
        removed
    }

    /// Drops every entry tied to one podcast, the way a per-podcast sync does.
    pub async fn invalidate_podcast(&self, id: PodcastId) {
        let mut entries = self.entries.lock().await;
        entries.remove(&QueryKey::Podcast(id));
        entries.remove(&QueryKey::PodcastEpisodes(id));
        entries.remove(&QueryKey::AllPodcasts);
    }

    pub async fn invalidate_all(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn count_fetch(
        cache: &QueryCache,
        key: QueryKey,
        counter: &AtomicUsize,
    ) -> Result<Arc<usize>, String> {
        cache
            .fetch_query(key, || async {
                Ok::<_, String>(counter.fetch_add(1, Ordering::SeqCst) + 1)
            })
            .await
    }

    #[tokio::test]
    async fn fresh_entries_are_served_from_cache() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let counter = AtomicUsize::new(0);

        let first = count_fetch(&cache, QueryKey::AllPodcasts, &counter).await.unwrap();
        let second = count_fetch(&cache, QueryKey::AllPodcasts, &counter).await.unwrap();

        assert_eq!(*first, 1);
        assert_eq!(*second, 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_entries_are_refetched() {
        let cache = QueryCache::new(Duration::from_secs(5));
        let counter = AtomicUsize::new(0);

        count_fetch(&cache, QueryKey::AllPodcasts, &counter).await.unwrap();
        tokio::time::advance(Duration::from_secs(6)).await;
        let refreshed = count_fetch(&cache, QueryKey::AllPodcasts, &counter).await.unwrap();

        assert_eq!(*refreshed, 2);
    }

    #[tokio::test]
    async fn invalidation_forces_refetch() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let counter = AtomicUsize::new(0);
        let id = PodcastId::new(7);

        count_fetch(&cache, QueryKey::AllPodcasts, &counter).await.unwrap();
        count_fetch(&cache, QueryKey::Podcast(id), &counter).await.unwrap();
        assert_eq!(cache.len().await, 2);

        assert!(cache.invalidate(&QueryKey::AllPodcasts).await);
        assert!(!cache.invalidate(&QueryKey::AllPodcasts).await);
        let again = count_fetch(&cache, QueryKey::AllPodcasts, &counter).await.unwrap();
        assert_eq!(*again, 3);

        cache.invalidate_podcast(id).await;
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache = QueryCache::new(Duration::from_secs(60));

        let failed: Result<Arc<u32>, String> =
            cache.fetch_query(QueryKey::AllPodcasts, || async { Err("offline".to_string()) }).await;
        assert_eq!(failed.unwrap_err(), "offline");
        assert_eq!(cache.len().await, 0);

        let ok: Result<Arc<u32>, String> =
            cache.fetch_query(QueryKey::AllPodcasts, || async { Ok(5) }).await;
        assert_eq!(*ok.unwrap(), 5);
    }

    #[tokio::test]
    async fn invalidate_all_clears_everything() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let counter = AtomicUsize::new(0);
        count_fetch(&cache, QueryKey::PodcastEpisodes(PodcastId::new(1)), &counter).await.unwrap();

        cache.invalidate_all().await;
        assert_eq!(cache.len().await, 0);
    }
}
