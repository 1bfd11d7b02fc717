use crate::container::entries::{CacheEntry, CacheValue};
use crate::error::Result;
use crate::metadata::EmbeddedMetadata;
use async_trait::async_trait;
use moka::notification::RemovalCause;
use std::sync::Arc;

/// Receives the promoted entry of every value dropped from a container, except
/// values overwritten by a later write.
pub type EvictionListener<K, V> = Arc<dyn Fn(CacheEntry<K, V>, RemovalCause) + Send + Sync>;

/// Keyed store of externalized cache values.
///
/// Values are kept in their encoded form; `get` and `entries` decode and
/// promote them with the key on the way out.
#[async_trait]
pub trait DataContainerTrait<K, V>: Send + Sync
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Returns `None` for missing or expired keys. Reading a value that tracks
    /// last access refreshes it.
    async fn get(&self, key: &K) -> Result<Option<CacheEntry<K, V>>>;

    /// Stores `value` in the family `metadata` selects.
    async fn put(&self, key: K, value: V, metadata: &EmbeddedMetadata) -> Result<()>;

    async fn put_value(&self, key: K, value: CacheValue<V>) -> Result<()>;

    /// Swaps the payload of a live value and returns the previous payload.
    /// Returns `None` without writing when the key is missing or expired.
    async fn replace(&self, key: &K, value: V) -> Result<Option<Arc<V>>>;

    async fn evict(&self, key: &K);

    async fn clear(&self);

    async fn len(&self) -> u64;

    /// Every live value, promoted with its key.
    async fn entries(&self) -> Result<Vec<CacheEntry<K, V>>>;
}
