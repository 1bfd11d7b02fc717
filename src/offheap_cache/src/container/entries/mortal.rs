use super::expiry::{is_expired_mortal, mortal_expiry_time};
use super::{hash_payload, CacheValue, CacheValueKind, Expirable, InternalCacheValue, InternalEntry};
use crate::error::Result;
use crate::marshall::externalizer::unsupported_type;
use crate::marshall::{ids, Externalizer, ExternalizerId, ObjectInput, ObjectOutput};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A value with a fixed lifespan counted from its creation time.
#[derive(Debug)]
pub struct MortalCacheValue<V> {
    value: Option<Arc<V>>,
    created: i64,
    lifespan: i64,
}

pub type MortalCacheEntry<K, V> = InternalEntry<K, MortalCacheValue<V>>;

impl<V> MortalCacheValue<V> {
    pub fn new(value: V, created: i64, lifespan: i64) -> Self {
        Self::from_shared(Some(Arc::new(value)), created, lifespan)
    }

    pub fn from_shared(value: Option<Arc<V>>, created: i64, lifespan: i64) -> Self {
        Self {
            value,
            created,
            lifespan,
        }
    }
}

impl<V> Clone for MortalCacheValue<V> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            created: self.created,
            lifespan: self.lifespan,
        }
    }
}

impl<V: PartialEq> PartialEq for MortalCacheValue<V> {
    fn eq(&self, other: &Self) -> bool {
        self.value.as_deref() == other.value.as_deref()
            && self.created == other.created
            && self.lifespan == other.lifespan
    }
}

impl<V: Eq> Eq for MortalCacheValue<V> {}

impl<V: Hash> Hash for MortalCacheValue<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_payload(self.value.as_ref(), state);
        self.created.hash(state);
        self.lifespan.hash(state);
    }
}

impl<V: fmt::Debug> fmt::Display for MortalCacheValue<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MortalCacheValue {{value={:?}, created={}, lifespan={}}}",
            self.value.as_deref(),
            self.created,
            self.lifespan
        )
    }
}

impl<V> Expirable for MortalCacheValue<V> {
    fn created(&self) -> i64 {
        self.created
    }

    fn last_used(&self) -> i64 {
        -1
    }

    fn lifespan(&self) -> i64 {
        self.lifespan
    }

    fn max_idle(&self) -> i64 {
        -1
    }

    fn expiry_time(&self) -> i64 {
        mortal_expiry_time(self.created, self.lifespan)
    }

    fn can_expire(&self) -> bool {
        self.lifespan > -1
    }

    fn is_expired(&self, now: i64) -> bool {
        is_expired_mortal(self.lifespan, self.created, now)
    }
}

impl<V> InternalCacheValue for MortalCacheValue<V> {
    type Value = V;

    fn value(&self) -> Option<&Arc<V>> {
        self.value.as_ref()
    }

    fn set_value(&mut self, value: Option<Arc<V>>) -> Option<Arc<V>> {
        std::mem::replace(&mut self.value, value)
    }

    fn kind(&self) -> CacheValueKind {
        CacheValueKind::Mortal
    }
}

/// Body: payload record, `created`, `lifespan`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MortalCacheValueExternalizer;

impl<V> Externalizer<V> for MortalCacheValueExternalizer {
    fn write_object(&self, output: &mut ObjectOutput<'_, V>, value: &CacheValue<V>) -> Result<()> {
        let CacheValue::Mortal(value) = value else {
            return Err(unsupported_type(ids::MORTAL_VALUE, value));
        };
        output.write_object(value.value.as_deref())?;
        output.write_i64(value.created);
        output.write_i64(value.lifespan);
        Ok(())
    }

    fn read_object(&self, input: &mut ObjectInput<'_, V>) -> Result<CacheValue<V>> {
        let value = input.read_object()?.map(Arc::new);
        let created = input.read_i64()?;
        let lifespan = input.read_i64()?;
        Ok(MortalCacheValue::from_shared(value, created, lifespan).into())
    }

    fn id(&self) -> ExternalizerId {
        ids::MORTAL_VALUE
    }

    fn type_classes(&self) -> &'static [CacheValueKind] {
        &[CacheValueKind::Mortal]
    }
}
