use super::{
    CacheEntry, CacheValueKind, Expirable, ImmortalCacheValue, InternalCacheValue,
    MortalCacheValue, TransientCacheValue, TransientMortalCacheValue,
};
use crate::metadata::EmbeddedMetadata;
use std::fmt;
use std::sync::Arc;

/// A cache value of any family; the unit the registry externalizes.
#[derive(Debug, PartialEq, Eq, Hash)]
pub enum CacheValue<V> {
    Immortal(ImmortalCacheValue<V>),
    Mortal(MortalCacheValue<V>),
    Transient(TransientCacheValue<V>),
    TransientMortal(TransientMortalCacheValue<V>),
}

macro_rules! dispatch {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            CacheValue::Immortal($inner) => $body,
            CacheValue::Mortal($inner) => $body,
            CacheValue::Transient($inner) => $body,
            CacheValue::TransientMortal($inner) => $body,
        }
    };
}

impl<V> CacheValue<V> {
    /// Promotes to an entry of the same family under `key`, sharing the payload.
    pub fn to_internal_cache_entry<K>(&self, key: K) -> CacheEntry<K, V> {
        InternalCacheValue::to_internal_cache_entry(self, key)
    }
}

impl<V> Clone for CacheValue<V> {
    fn clone(&self) -> Self {
        match self {
            CacheValue::Immortal(v) => CacheValue::Immortal(v.clone()),
            CacheValue::Mortal(v) => CacheValue::Mortal(v.clone()),
            CacheValue::Transient(v) => CacheValue::Transient(v.clone()),
            CacheValue::TransientMortal(v) => CacheValue::TransientMortal(v.clone()),
        }
    }
}

impl<V: fmt::Debug> fmt::Display for CacheValue<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, v => fmt::Display::fmt(v, f))
    }
}

impl<V> Expirable for CacheValue<V> {
    fn created(&self) -> i64 {
        dispatch!(self, v => v.created())
    }

    fn last_used(&self) -> i64 {
        dispatch!(self, v => v.last_used())
    }

    fn lifespan(&self) -> i64 {
        dispatch!(self, v => v.lifespan())
    }

    fn max_idle(&self) -> i64 {
        dispatch!(self, v => v.max_idle())
    }

    fn expiry_time(&self) -> i64 {
        dispatch!(self, v => v.expiry_time())
    }

    fn can_expire(&self) -> bool {
        dispatch!(self, v => v.can_expire())
    }

    fn is_expired(&self, now: i64) -> bool {
        dispatch!(self, v => v.is_expired(now))
    }

    fn is_expired_now(&self) -> bool {
        dispatch!(self, v => v.is_expired_now())
    }

    fn metadata(&self) -> EmbeddedMetadata {
        dispatch!(self, v => v.metadata())
    }
}

impl<V> InternalCacheValue for CacheValue<V> {
    type Value = V;

    fn value(&self) -> Option<&Arc<V>> {
        dispatch!(self, v => v.value())
    }

    fn set_value(&mut self, value: Option<Arc<V>>) -> Option<Arc<V>> {
        dispatch!(self, v => v.set_value(value))
    }

    fn touch(&mut self, now: i64) {
        dispatch!(self, v => v.touch(now))
    }

    fn kind(&self) -> CacheValueKind {
        dispatch!(self, v => v.kind())
    }
}

impl<V> From<ImmortalCacheValue<V>> for CacheValue<V> {
    fn from(value: ImmortalCacheValue<V>) -> Self {
        CacheValue::Immortal(value)
    }
}

impl<V> From<MortalCacheValue<V>> for CacheValue<V> {
    fn from(value: MortalCacheValue<V>) -> Self {
        CacheValue::Mortal(value)
    }
}

impl<V> From<TransientCacheValue<V>> for CacheValue<V> {
    fn from(value: TransientCacheValue<V>) -> Self {
        CacheValue::Transient(value)
    }
}

impl<V> From<TransientMortalCacheValue<V>> for CacheValue<V> {
    fn from(value: TransientMortalCacheValue<V>) -> Self {
        CacheValue::TransientMortal(value)
    }
}
