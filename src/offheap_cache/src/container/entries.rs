//! Value and entry families of the off-heap container.
//!
//! A *value* is what gets externalized into the off-heap region: the payload
//! plus whatever expiry fields its family tracks. It never knows its key. An
//! *entry* is a value promoted with the key the index already knows, built on
//! demand for iteration and eviction callbacks.
//!
//! Payloads are held as `Arc<V>`: cloning a value or promoting it to an entry
//! forks the wrapper but shares the payload until one side replaces it with
//! `set_value`. Callers that need payload isolation must copy the payload
//! themselves.

mod cache_value;
pub(crate) mod expiry;
mod immortal;
mod mortal;
mod transient;
mod transient_mortal;

#[cfg(test)]
mod entries_test;

use crate::metadata::EmbeddedMetadata;
use crate::time_service::{DefaultTimeService, TimeService};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub use cache_value::CacheValue;
pub use immortal::{ImmortalCacheEntry, ImmortalCacheValue, ImmortalCacheValueExternalizer};
pub use mortal::{MortalCacheEntry, MortalCacheValue, MortalCacheValueExternalizer};
pub use transient::{TransientCacheEntry, TransientCacheValue, TransientCacheValueExternalizer};
pub use transient_mortal::{
    TransientMortalCacheEntry, TransientMortalCacheValue, TransientMortalCacheValueExternalizer,
};

/// Entry produced by promoting a [`CacheValue`] of any family.
pub type CacheEntry<K, V> = InternalEntry<K, CacheValue<V>>;

/// Discriminates the concrete value families. Externalizers declare the kinds
/// they are authoritative for, the registry maps kinds to type identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheValueKind {
    Immortal,
    Mortal,
    Transient,
    TransientMortal,
}

impl fmt::Display for CacheValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheValueKind::Immortal => write!(f, "Immortal"),
            CacheValueKind::Mortal => write!(f, "Mortal"),
            CacheValueKind::Transient => write!(f, "Transient"),
            CacheValueKind::TransientMortal => write!(f, "TransientMortal"),
        }
    }
}

/// Time-derived attributes shared by values and entries. All timestamps and
/// durations are milliseconds; `-1` means "not applicable" for the family.
pub trait Expirable {
    fn created(&self) -> i64;

    fn last_used(&self) -> i64;

    fn lifespan(&self) -> i64;

    fn max_idle(&self) -> i64;

    fn expiry_time(&self) -> i64;

    fn can_expire(&self) -> bool;

    fn is_expired(&self, now: i64) -> bool;

    fn is_expired_now(&self) -> bool {
        self.is_expired(DefaultTimeService.wall_clock_time())
    }

    /// Builds a fresh descriptor on every call; it is never stored on the value.
    fn metadata(&self) -> EmbeddedMetadata {
        EmbeddedMetadata::builder()
            .lifespan(self.lifespan())
            .max_idle(self.max_idle())
            .build()
    }
}

pub trait InternalCacheValue: Expirable {
    type Value;

    fn value(&self) -> Option<&Arc<Self::Value>>;

    /// Replaces the payload in place and hands back the previous one.
    fn set_value(&mut self, value: Option<Arc<Self::Value>>) -> Option<Arc<Self::Value>>;

    /// Records an access at `now`. Only families tracking last access care.
    fn touch(&mut self, _now: i64) {}

    fn kind(&self) -> CacheValueKind;

    fn to_internal_cache_entry<K>(&self, key: K) -> InternalEntry<K, Self>
    where
        Self: Sized + Clone,
    {
        InternalEntry {
            key,
            cache_value: self.clone(),
        }
    }
}

pub trait InternalCacheEntry: Expirable {
    type Key;
    type Value;

    fn key(&self) -> &Self::Key;

    fn value(&self) -> Option<&Arc<Self::Value>>;

    fn to_internal_cache_value(&self) -> CacheValue<Self::Value>;
}

/// A cache value together with the key it is stored under.
///
/// Only built through [`InternalCacheValue::to_internal_cache_entry`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InternalEntry<K, T> {
    key: K,
    cache_value: T,
}

impl<K, T: InternalCacheValue> InternalEntry<K, T> {
    pub fn kind(&self) -> CacheValueKind {
        self.cache_value.kind()
    }

    pub fn into_parts(self) -> (K, T) {
        (self.key, self.cache_value)
    }
}

impl<K, T: Expirable> Expirable for InternalEntry<K, T> {
    fn created(&self) -> i64 {
        self.cache_value.created()
    }

    fn last_used(&self) -> i64 {
        self.cache_value.last_used()
    }

    fn lifespan(&self) -> i64 {
        self.cache_value.lifespan()
    }

    fn max_idle(&self) -> i64 {
        self.cache_value.max_idle()
    }

    fn expiry_time(&self) -> i64 {
        self.cache_value.expiry_time()
    }

    fn can_expire(&self) -> bool {
        self.cache_value.can_expire()
    }

    fn is_expired(&self, now: i64) -> bool {
        self.cache_value.is_expired(now)
    }
}

impl<K, T> InternalCacheEntry for InternalEntry<K, T>
where
    T: InternalCacheValue + Clone + Into<CacheValue<T::Value>>,
{
    type Key = K;
    type Value = T::Value;

    fn key(&self) -> &K {
        &self.key
    }

    fn value(&self) -> Option<&Arc<T::Value>> {
        self.cache_value.value()
    }

    fn to_internal_cache_value(&self) -> CacheValue<T::Value> {
        self.cache_value.clone().into()
    }
}

impl<K: fmt::Debug, T: InternalCacheValue + fmt::Display> fmt::Display for InternalEntry<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}CacheEntry {{key={:?}, {}}}",
            self.cache_value.kind(),
            self.key,
            self.cache_value
        )
    }
}

/// Hashes a payload, or `0` when it is absent.
pub(crate) fn hash_payload<V: Hash, H: Hasher>(value: Option<&Arc<V>>, state: &mut H) {
    match value {
        Some(value) => value.as_ref().hash(state),
        None => 0u32.hash(state),
    }
}
