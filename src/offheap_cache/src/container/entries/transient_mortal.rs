use super::expiry::{is_expired_transient_mortal, transient_mortal_expiry_time};
use super::{hash_payload, CacheValue, CacheValueKind, Expirable, InternalCacheValue, InternalEntry};
use crate::error::Result;
use crate::marshall::externalizer::unsupported_type;
use crate::marshall::{ids, Externalizer, ExternalizerId, ObjectInput, ObjectOutput};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A value bounded both by a lifespan and by a max idle time, whichever
/// runs out first.
#[derive(Debug)]
pub struct TransientMortalCacheValue<V> {
    value: Option<Arc<V>>,
    created: i64,
    lifespan: i64,
    last_used: i64,
    max_idle: i64,
}

pub type TransientMortalCacheEntry<K, V> = InternalEntry<K, TransientMortalCacheValue<V>>;

impl<V> TransientMortalCacheValue<V> {
    pub fn new(value: V, created: i64, lifespan: i64, last_used: i64, max_idle: i64) -> Self {
        Self::from_shared(Some(Arc::new(value)), created, lifespan, last_used, max_idle)
    }

    pub fn from_shared(
        value: Option<Arc<V>>,
        created: i64,
        lifespan: i64,
        last_used: i64,
        max_idle: i64,
    ) -> Self {
        Self {
            value,
            created,
            lifespan,
            last_used,
            max_idle,
        }
    }
}

impl<V> Clone for TransientMortalCacheValue<V> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            created: self.created,
            lifespan: self.lifespan,
            last_used: self.last_used,
            max_idle: self.max_idle,
        }
    }
}

impl<V: PartialEq> PartialEq for TransientMortalCacheValue<V> {
    fn eq(&self, other: &Self) -> bool {
        self.value.as_deref() == other.value.as_deref()
            && self.created == other.created
            && self.lifespan == other.lifespan
            && self.last_used == other.last_used
            && self.max_idle == other.max_idle
    }
}

impl<V: Eq> Eq for TransientMortalCacheValue<V> {}

impl<V: Hash> Hash for TransientMortalCacheValue<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_payload(self.value.as_ref(), state);
        self.created.hash(state);
        self.lifespan.hash(state);
        self.last_used.hash(state);
        self.max_idle.hash(state);
    }
}

impl<V: fmt::Debug> fmt::Display for TransientMortalCacheValue<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TransientMortalCacheValue {{value={:?}, created={}, lifespan={}, last_used={}, max_idle={}}}",
            self.value.as_deref(),
            self.created,
            self.lifespan,
            self.last_used,
            self.max_idle
        )
    }
}

impl<V> Expirable for TransientMortalCacheValue<V> {
    fn created(&self) -> i64 {
        self.created
    }

    fn last_used(&self) -> i64 {
        self.last_used
    }

    fn lifespan(&self) -> i64 {
        self.lifespan
    }

    fn max_idle(&self) -> i64 {
        self.max_idle
    }

    fn expiry_time(&self) -> i64 {
        transient_mortal_expiry_time(self.created, self.lifespan, self.last_used, self.max_idle)
    }

    fn can_expire(&self) -> bool {
        self.lifespan > -1 || self.max_idle > -1
    }

    fn is_expired(&self, now: i64) -> bool {
        is_expired_transient_mortal(
            self.max_idle,
            self.last_used,
            self.lifespan,
            self.created,
            now,
        )
    }
}

impl<V> InternalCacheValue for TransientMortalCacheValue<V> {
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
        CacheValueKind::TransientMortal
    }
}

/// Body: payload record, `created`, `lifespan`, `last_used`, `max_idle`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransientMortalCacheValueExternalizer;

impl<V> Externalizer<V> for TransientMortalCacheValueExternalizer {
    fn write_object(&self, output: &mut ObjectOutput<'_, V>, value: &CacheValue<V>) -> Result<()> {
        let CacheValue::TransientMortal(value) = value else {
            return Err(unsupported_type(ids::TRANSIENT_MORTAL_VALUE, value));
        };
        output.write_object(value.value.as_deref())?;
        output.write_i64(value.created);
        output.write_i64(value.lifespan);
        output.write_i64(value.last_used);
        output.write_i64(value.max_idle);
        Ok(())
    }

    fn read_object(&self, input: &mut ObjectInput<'_, V>) -> Result<CacheValue<V>> {
        let value = input.read_object()?.map(Arc::new);
        let created = input.read_i64()?;
        let lifespan = input.read_i64()?;
        let last_used = input.read_i64()?;
        let max_idle = input.read_i64()?;
        Ok(
            TransientMortalCacheValue::from_shared(value, created, lifespan, last_used, max_idle)
                .into(),
        )
    }

    fn id(&self) -> ExternalizerId {
        ids::TRANSIENT_MORTAL_VALUE
    }

    fn type_classes(&self) -> &'static [CacheValueKind] {
        &[CacheValueKind::TransientMortal]
    }
}
