use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use crate::container::base_container::{DataContainerTrait, EvictionListener};
use crate::container::container_config::DataContainerConfig;
use crate::container::entries::{CacheEntry, CacheValue, Expirable, InternalCacheValue};
use crate::container::entry_factory::create_value;
use crate::error::Result;
use crate::marshall::ExternalizerRegistry;
use crate::metadata::EmbeddedMetadata;
use crate::time_service::{DefaultTimeService, TimeService};
use async_trait::async_trait;
use bytes::Bytes;
use moka::future::Cache;
use moka::notification::RemovalCause;
use tokio::sync::Mutex;

/// A [`DataContainerTrait`] over [`moka::future::Cache`] holding each value
/// as the bytes produced by the [`ExternalizerRegistry`].
///
/// # Eviction Policy
/// Size-based: once `max_size` values are held, the **least recently used**
/// one is evicted. Expiry is checked against the [`TimeService`] when a value
/// is read or iterated; expired values are dropped at that point.
///
/// # Concurrency
/// Reads run concurrently. Every read-modify-write (put, replace, refreshing
/// the last access of transient values) holds a container-wide async mutex,
/// so at most one writer mutates a value at a time.
pub struct MokaDataContainer<K, V> {
    cache: Cache<K, Bytes>,
    registry: Arc<ExternalizerRegistry<V>>,
    time_service: Arc<dyn TimeService>,
    write_lock: Mutex<()>,
}

impl<K, V> MokaDataContainer<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + Debug + 'static,
    V: Send + Sync + 'static,
{
    pub fn new(config: DataContainerConfig, registry: Arc<ExternalizerRegistry<V>>) -> Self {
        Self::with_options(config, registry, Arc::new(DefaultTimeService), None)
    }

    pub fn with_options(
        config: DataContainerConfig,
        registry: Arc<ExternalizerRegistry<V>>,
        time_service: Arc<dyn TimeService>,
        eviction_listener: Option<EvictionListener<K, V>>,
    ) -> Self {
        let mut builder = Cache::builder()
            .max_capacity(config.max_size)
            .eviction_policy(moka::policy::EvictionPolicy::lru());

        if let Some(listener) = eviction_listener {
            let registry = registry.clone();
            builder = builder.eviction_listener(
                move |key: Arc<K>, bytes: Bytes, cause: RemovalCause| {
                    if cause == RemovalCause::Replaced {
                        return;
                    }
                    match registry.read_value(&bytes) {
                        Ok(value) => listener(value.to_internal_cache_entry(K::clone(&key)), cause),
                        Err(e) => {
                            tracing::warn!(?key, ?cause, error = %e, "cannot decode removed value")
                        }
                    }
                },
            );
        }

        Self {
            cache: builder.build(),
            registry,
            time_service,
            write_lock: Mutex::new(()),
        }
    }

    async fn read(&self, key: &K) -> Result<Option<CacheValue<V>>> {
        self.cache
            .get(key)
            .await
            .map(|bytes| self.registry.read_value(&bytes))
            .transpose()
    }

    /// Decodes the live value under `key`. Expired bytes are only dropped
    /// under the write lock, so a value written meanwhile survives.
    async fn load(&self, key: &K, now: i64) -> Result<Option<CacheValue<V>>> {
        match self.read(key).await? {
            Some(value) if value.is_expired(now) => {
                let _guard = self.write_lock.lock().await;
                self.load_locked(key, now).await
            }
            value => Ok(value),
        }
    }

    /// Same as [`Self::load`]; the caller holds the write lock.
    async fn load_locked(&self, key: &K, now: i64) -> Result<Option<CacheValue<V>>> {
        let Some(value) = self.read(key).await? else {
            return Ok(None);
        };
        if value.is_expired(now) {
            tracing::debug!(?key, now, expiry_time = value.expiry_time(), "value expired");
            self.cache.invalidate(key).await;
            return Ok(None);
        }
        Ok(Some(value))
    }

    async fn store(&self, key: K, value: &CacheValue<V>) -> Result<()> {
        let bytes = self.registry.write_value(value)?;
        self.cache.insert(key, bytes).await;
        Ok(())
    }
}

#[async_trait]
impl<K, V> DataContainerTrait<K, V> for MokaDataContainer<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + Debug + 'static,
    V: Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<CacheEntry<K, V>>> {
        let now = self.time_service.wall_clock_time();
        let Some(value) = self.load(key, now).await? else {
            return Ok(None);
        };
        if value.max_idle() < 0 {
            return Ok(Some(value.to_internal_cache_entry(key.clone())));
        }

        // Reload under the write lock so the refreshed bytes cannot clobber a
        // concurrent replace.
        let _guard = self.write_lock.lock().await;
        let Some(mut value) = self.load_locked(key, now).await? else {
            return Ok(None);
        };
        value.touch(now);
        self.store(key.clone(), &value).await?;
        Ok(Some(value.to_internal_cache_entry(key.clone())))
    }

    async fn put(&self, key: K, value: V, metadata: &EmbeddedMetadata) -> Result<()> {
        let now = self.time_service.wall_clock_time();
        self.put_value(key, create_value(value, metadata, now)).await
    }

    async fn put_value(&self, key: K, value: CacheValue<V>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store(key, &value).await
    }

    async fn replace(&self, key: &K, value: V) -> Result<Option<Arc<V>>> {
        let now = self.time_service.wall_clock_time();
        let _guard = self.write_lock.lock().await;
        let Some(mut current) = self.load_locked(key, now).await? else {
            return Ok(None);
        };
        let previous = current.set_value(Some(Arc::new(value)));
        self.store(key.clone(), &current).await?;
        Ok(previous)
    }

    async fn evict(&self, key: &K) {
        self.cache.invalidate(key).await;
    }

    async fn clear(&self) {
        self.cache.invalidate_all();
    }

    async fn len(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    async fn entries(&self) -> Result<Vec<CacheEntry<K, V>>> {
        let now = self.time_service.wall_clock_time();
        let mut entries = Vec::new();
        for (key, bytes) in self.cache.iter() {
            let value = self.registry.read_value(&bytes)?;
            if value.is_expired(now) {
                continue;
            }
            entries.push(value.to_internal_cache_entry(K::clone(&key)));
        }
        Ok(entries)
    }
}

#[cfg(test)]
impl<K, V> MokaDataContainer<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + Debug + 'static,
    V: Send + Sync + 'static,
{
    pub(crate) async fn force_cleanup_for_test(&self) {
        self.cache.run_pending_tasks().await;
    }

    pub(crate) async fn raw_bytes_for_test(&self, key: &K) -> Option<Bytes> {
        self.cache.get(key).await
    }

    /// Blocks every writer of the container until the guard drops.
    pub(crate) async fn lock_writes_for_test(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Writes without taking the write lock, for callers already holding it.
    pub(crate) async fn store_for_test(&self, key: K, value: &CacheValue<V>) -> Result<()> {
        self.store(key, value).await
    }
}
