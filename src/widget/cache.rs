//! Bounded in-memory store of rendered widgets
//!
//! The cache never judges freshness itself: [`WidgetCache::get`] returns
//! whatever entry is stored and callers decide with [`CacheEntry::is_fresh`].

use bytes::Bytes;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::options::WidgetOptions;

/// JSON array of bot id, style and the sorted `key:value` option pairs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(bot_id: &str, style: &str, options: &WidgetOptions) -> Self {
        let mut parts = vec![bot_id.to_string(), style.to_string()];
        parts.extend(options.cache_pairs());
        Self(serde_json::Value::from(parts).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub created_at: Instant,
    pub svg: Bytes,
}

impl CacheEntry {
    pub fn new(svg: impl Into<Bytes>) -> Self {
        Self {
            created_at: Instant::now(),
            svg: svg.into(),
        }
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() < ttl
    }
}

pub struct WidgetCache {
    entries: Mutex<LruCache<CacheKey, CacheEntry>>,
}

impl WidgetCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Stored entry for `key`, fresh or not; marks it most recently used
    pub async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.lock().await.get(key).cloned()
    }

    /// Stores `entry`, evicting the least recently used entry when full
    pub async fn set(&self, key: CacheKey, entry: CacheEntry) {
        self.entries.lock().await.put(key, entry);
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn capacity(&self) -> usize {
        self.entries.lock().await.cap().get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(bot: &str) -> CacheKey {
        CacheKey::new(bot, "default", &WidgetOptions::default())
    }

    #[test]
    fn test_key_format() {
        assert_eq!(
            key("123").as_str(),
            r#"["123","default","background:null","rounded:false","shadows:true"]"#
        );
    }

    #[test]
    fn test_key_distinguishes_options() {
        let rounded = WidgetOptions {
            rounded: true,
            ..WidgetOptions::default()
        };
        assert_ne!(key("1"), CacheKey::new("1", "default", &rounded));
        assert_ne!(key("1"), CacheKey::new("1", "dark", &WidgetOptions::default()));
        assert_eq!(key("1"), key("1"));
    }

    #[tokio::test]
    async fn test_get_after_set_returns_entry() {
        let cache = WidgetCache::new(4);
        let entry = CacheEntry::new("<svg/>");

        cache.set(key("1"), entry.clone()).await;

        assert_eq!(cache.get(&key("1")).await, Some(entry));
        assert_eq!(cache.get(&key("2")).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_entries_are_still_returned() {
        let ttl = Duration::from_secs(15 * 60);
        let cache = WidgetCache::new(4);
        cache.set(key("1"), CacheEntry::new("<svg/>")).await;

        tokio::time::advance(Duration::from_secs(14 * 60)).await;
        assert!(cache.get(&key("1")).await.unwrap().is_fresh(ttl));

        tokio::time::advance(Duration::from_secs(60)).await;
        let entry = cache.get(&key("1")).await.unwrap();
        assert!(!entry.is_fresh(ttl));
        assert_eq!(entry.svg, Bytes::from_static(b"<svg/>"));
    }

    #[tokio::test]
    async fn test_evicts_least_recently_used() {
        let cache = WidgetCache::new(2);
        cache.set(key("1"), CacheEntry::new("one")).await;
        cache.set(key("2"), CacheEntry::new("two")).await;

        // touch 1 so 2 becomes the eviction candidate
        cache.get(&key("1")).await;
        cache.set(key("3"), CacheEntry::new("three")).await;

        assert_eq!(cache.len().await, 2);
        assert!(cache.get(&key("1")).await.is_some());
        assert!(cache.get(&key("2")).await.is_none());
        assert!(cache.get(&key("3")).await.is_some());
    }

    #[tokio::test]
    async fn test_zero_capacity_is_clamped() {
        let cache = WidgetCache::new(0);
        assert_eq!(cache.capacity().await, 1);
        assert!(cache.is_empty().await);
    }
}
