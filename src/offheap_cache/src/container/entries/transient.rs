use super::expiry::{is_expired_transient, transient_expiry_time};
use super::{hash_payload, CacheValue, CacheValueKind, Expirable, InternalCacheValue, InternalEntry};
use crate::error::Result;
use crate::marshall::externalizer::unsupported_type;
use crate::marshall::{ids, Externalizer, ExternalizerId, ObjectInput, ObjectOutput};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A value that expires once it has not been accessed for `max_idle`.
#[derive(Debug)]
pub struct TransientCacheValue<V> {
    value: Option<Arc<V>>,
    last_used: i64,
    max_idle: i64,
}

pub type TransientCacheEntry<K, V> = InternalEntry<K, TransientCacheValue<V>>;

impl<V> TransientCacheValue<V> {
    pub fn new(value: V, last_used: i64, max_idle: i64) -> Self {
        Self::from_shared(Some(Arc::new(value)), last_used, max_idle)
    }

    pub fn from_shared(value: Option<Arc<V>>, last_used: i64, max_idle: i64) -> Self {
        Self {
            value,
            last_used,
            max_idle,
        }
    }
}

impl<V> Clone for TransientCacheValue<V> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            last_used: self.last_used,
            max_idle: self.max_idle,
        }
    }
}

impl<V: PartialEq> PartialEq for TransientCacheValue<V> {
    fn eq(&self, other: &Self) -> bool {
        self.value.as_deref() == other.value.as_deref()
            && self.last_used == other.last_used
            && self.max_idle == other.max_idle
    }
}

impl<V: Eq> Eq for TransientCacheValue<V> {}

impl<V: Hash> Hash for TransientCacheValue<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_payload(self.value.as_ref(), state);
        self.last_used.hash(state);
        self.max_idle.hash(state);
    }
}

impl<V: fmt::Debug> fmt::Display for TransientCacheValue<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TransientCacheValue {{value={:?}, last_used={}, max_idle={}}}",
            self.value.as_deref(),
            self.last_used,
            self.max_idle
        )
    }
}

impl<V> Expirable for TransientCacheValue<V> {
    fn created(&self) -> i64 {
        -1
    }

    fn last_used(&self) -> i64 {
        self.last_used
    }

    fn lifespan(&self) -> i64 {
        -1
    }

    fn max_idle(&self) -> i64 {
        self.max_idle
    }

    fn expiry_time(&self) -> i64 {
        transient_expiry_time(self.last_used, self.max_idle)
    }

    fn can_expire(&self) -> bool {
        self.max_idle > -1
    }

    fn is_expired(&self, now: i64) -> bool {
        is_expired_transient(self.max_idle, self.last_used, now)
    }
}

impl<V> InternalCacheValue for TransientCacheValue<V> {
    type Value = V;

    fn value(&self) -> Option<&Arc<V>> {
        self.value.as_ref()
    }

    fn set_value(&mut self, value: Option<Arc<V>>) -> Option<Arc<V>> {
        std::mem::replace(&mut self.value, value)
    }

    fn touch(&mut self, now: i64) {
        self.last_used = now;
    }

    fn kind(&self) -> CacheValueKind {
        CacheValueKind::Transient
    }
}

/// Body: payload record, `last_used`, `max_idle`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransientCacheValueExternalizer;

impl<V> Externalizer<V> for TransientCacheValueExternalizer {
    fn write_object(&self, output: &mut ObjectOutput<'_, V>, value: &CacheValue<V>) -> Result<()> {
        let CacheValue::Transient(value) = value else {
            return Err(unsupported_type(ids::TRANSIENT_VALUE, value));
        };
        output.write_object(value.value.as_deref())?;
        output.write_i64(value.last_used);
        output.write_i64(value.max_idle);
        Ok(())
    }

    fn read_object(&self, input: &mut ObjectInput<'_, V>) -> Result<CacheValue<V>> {
        let value = input.read_object()?.map(Arc::new);
        let last_used = input.read_i64()?;
        let max_idle = input.read_i64()?;
        Ok(TransientCacheValue::from_shared(value, last_used, max_idle).into())
    }

    fn id(&self) -> ExternalizerId {
        ids::TRANSIENT_VALUE
    }

    fn type_classes(&self) -> &'static [CacheValueKind] {
        &[CacheValueKind::Transient]
    }
}
