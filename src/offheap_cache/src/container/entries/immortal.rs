use super::{hash_payload, CacheValue, CacheValueKind, Expirable, InternalCacheValue, InternalEntry};
use crate::error::Result;
use crate::marshall::externalizer::unsupported_type;
use crate::marshall::{ids, Externalizer, ExternalizerId, ObjectInput, ObjectOutput};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A value that never expires: the payload and nothing else.
///
/// Every time-derived getter answers `-1` and the metadata is always
/// lifespan = max idle = `-1`, so none of it is stored or externalized.
#[derive(Debug)]
pub struct ImmortalCacheValue<V> {
    value: Option<Arc<V>>,
}

pub type ImmortalCacheEntry<K, V> = InternalEntry<K, ImmortalCacheValue<V>>;

impl<V> ImmortalCacheValue<V> {
    pub fn new(value: V) -> Self {
        Self::from_shared(Some(Arc::new(value)))
    }

    pub fn from_shared(value: Option<Arc<V>>) -> Self {
        Self { value }
    }

    /// A value holding no payload.
    pub fn absent() -> Self {
        Self { value: None }
    }
}

/// Shallow: the copy gets its own wrapper but shares the payload.
impl<V> Clone for ImmortalCacheValue<V> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
        }
    }
}

impl<V: PartialEq> PartialEq for ImmortalCacheValue<V> {
    fn eq(&self, other: &Self) -> bool {
        self.value.as_deref() == other.value.as_deref()
    }
}

impl<V: Eq> Eq for ImmortalCacheValue<V> {}

impl<V: Hash> Hash for ImmortalCacheValue<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_payload(self.value.as_ref(), state);
    }
}

impl<V: fmt::Debug> fmt::Display for ImmortalCacheValue<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImmortalCacheValue {{value={:?}}}", self.value.as_deref())
    }
}

impl<V> Expirable for ImmortalCacheValue<V> {
    fn created(&self) -> i64 {
        -1
    }

    fn last_used(&self) -> i64 {
        -1
    }

    fn lifespan(&self) -> i64 {
        -1
    }

    fn max_idle(&self) -> i64 {
        -1
    }

    fn expiry_time(&self) -> i64 {
        -1
    }

    fn can_expire(&self) -> bool {
        false
    }

    fn is_expired(&self, _now: i64) -> bool {
        false
    }

    fn is_expired_now(&self) -> bool {
        false
    }
}

impl<V> InternalCacheValue for ImmortalCacheValue<V> {
    type Value = V;

    fn value(&self) -> Option<&Arc<V>> {
        self.value.as_ref()
    }

    fn set_value(&mut self, value: Option<Arc<V>>) -> Option<Arc<V>> {
        std::mem::replace(&mut self.value, value)
    }

    fn kind(&self) -> CacheValueKind {
        CacheValueKind::Immortal
    }
}

/// Body: the payload object record only.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmortalCacheValueExternalizer;

impl<V> Externalizer<V> for ImmortalCacheValueExternalizer {
    fn write_object(&self, output: &mut ObjectOutput<'_, V>, value: &CacheValue<V>) -> Result<()> {
        let CacheValue::Immortal(value) = value else {
            return Err(unsupported_type(ids::IMMORTAL_VALUE, value));
        };
        output.write_object(value.value.as_deref())
    }

    fn read_object(&self, input: &mut ObjectInput<'_, V>) -> Result<CacheValue<V>> {
        let value = input.read_object()?;
        Ok(ImmortalCacheValue::from_shared(value.map(Arc::new)).into())
    }

    fn id(&self) -> ExternalizerId {
        ids::IMMORTAL_VALUE
    }

    fn type_classes(&self) -> &'static [CacheValueKind] {
        &[CacheValueKind::Immortal]
    }
}
