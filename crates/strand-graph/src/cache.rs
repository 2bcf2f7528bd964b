//! Result caches keyed by tenant, index version, and a content fingerprint.
//!
//! Uses `moka::sync::Cache`. A version bump makes old keys unreachable; the
//! [`VersionTracker`] additionally evicts them eagerly. Tracks hits/misses/rate.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use moka::sync::Cache;
use strand_core::config::CacheConfig;
use strand_core::models::{IndexVersion, TenantId};
use tracing::debug;

/// Cache key. Entries from different tenants or index versions never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub tenant: TenantId,
    pub version: IndexVersion,
    pub fingerprint: String,
}

impl CacheKey {
    /// Fingerprint `parts` with blake3. Parts are unit-separated so
    /// `["ab", "c"]` and `["a", "bc"]` differ.
    pub fn new(tenant: &TenantId, version: IndexVersion, parts: &[&str]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(part.as_bytes());
            hasher.update(&[0x1f]);
        }
        Self {
            tenant: tenant.clone(),
            version,
            fingerprint: hasher.finalize().to_hex().to_string(),
        }
    }
}

/// Bounded, TTL-limited cache with hit/miss tracking.
///
/// A disabled cache never stores anything and every lookup misses.
pub struct ResultCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    cache: Option<Cache<CacheKey, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> ResultCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(config: &CacheConfig) -> Self {
        let cache = config.enabled.then(|| {
            Cache::builder()
                .max_capacity(config.max_entries)
                .time_to_live(Duration::from_secs(config.ttl_secs))
                .build()
        });
        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<V> {
        match self.cache.as_ref().and_then(|c| c.get(key)) {
            Some(v) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(v)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, key: CacheKey, value: V) {
        if let Some(cache) = &self.cache {
            cache.insert(key, value);
        }
    }

    /// Evict every entry belonging to `tenant`, whatever its version.
    pub fn invalidate_tenant(&self, tenant: &TenantId) {
        let Some(cache) = &self.cache else {
            return;
        };
        cache.run_pending_tasks();
        let keys: Vec<CacheKey> = cache
            .iter()
            .filter(|(k, _)| &k.tenant == tenant)
            .map(|(k, _)| k.as_ref().clone())
            .collect();
        for key in &keys {
            cache.invalidate(key);
        }
        debug!(tenant = %tenant, evicted = keys.len(), "invalidated tenant cache entries");
    }

    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }

    /// Approximate entry count.
    pub fn entry_count(&self) -> u64 {
        self.cache.as_ref().map_or(0, |c| {
            c.run_pending_tasks();
            c.entry_count()
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Total cache hits.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Total cache misses.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Cache hit rate (0.0–1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = (self.hits() + self.misses()) as f64;
        if total == 0.0 {
            0.0
        } else {
            self.hits() as f64 / total
        }
    }
}

/// What [`VersionTracker::observe`] saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChange {
    First,
    Unchanged,
    Changed { previous: IndexVersion },
}

/// Last index version seen per tenant.
#[derive(Debug, Default)]
pub struct VersionTracker {
    seen: DashMap<TenantId, IndexVersion>,
}

impl VersionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `version` for `tenant` and report how it compares.
    pub fn observe(&self, tenant: &TenantId, version: IndexVersion) -> VersionChange {
        match self.seen.insert(tenant.clone(), version) {
            None => VersionChange::First,
            Some(previous) if previous == version => VersionChange::Unchanged,
            Some(previous) => VersionChange::Changed { previous },
        }
    }

    pub fn current(&self, tenant: &TenantId) -> Option<IndexVersion> {
        self.seen.get(tenant).map(|v| *v)
    }
}
