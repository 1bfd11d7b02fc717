//! Picks the value family matching an expiry policy.

use crate::container::entries::{
    CacheEntry, CacheValue, ImmortalCacheValue, MortalCacheValue, TransientCacheValue,
    TransientMortalCacheValue,
};
use crate::metadata::EmbeddedMetadata;
use std::sync::Arc;

/// Wraps `value` in the family `metadata` calls for. `created` and
/// `last_used` are stamped with `now` where the family tracks them.
pub fn create_value<V>(value: V, metadata: &EmbeddedMetadata, now: i64) -> CacheValue<V> {
    create_shared_value(Some(Arc::new(value)), metadata, now)
}

pub fn create_shared_value<V>(
    value: Option<Arc<V>>,
    metadata: &EmbeddedMetadata,
    now: i64,
) -> CacheValue<V> {
    let lifespan = metadata.lifespan();
    let max_idle = metadata.max_idle();
    match (lifespan > -1, max_idle > -1) {
        (false, false) => ImmortalCacheValue::from_shared(value).into(),
        (true, false) => MortalCacheValue::from_shared(value, now, lifespan).into(),
        (false, true) => TransientCacheValue::from_shared(value, now, max_idle).into(),
        (true, true) => {
            TransientMortalCacheValue::from_shared(value, now, lifespan, now, max_idle).into()
        }
    }
}

pub fn create_entry<K, V>(
    key: K,
    value: V,
    metadata: &EmbeddedMetadata,
    now: i64,
) -> CacheEntry<K, V> {
    create_value(value, metadata, now).to_internal_cache_entry(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::entries::{
        CacheValueKind, Expirable, InternalCacheEntry, InternalCacheValue,
    };
    use rstest::rstest;

    #[rstest]
    #[case::immortal(-1, -1, CacheValueKind::Immortal)]
    #[case::mortal(1_000, -1, CacheValueKind::Mortal)]
    #[case::transient(-1, 200, CacheValueKind::Transient)]
    #[case::transient_mortal(1_000, 200, CacheValueKind::TransientMortal)]
    fn test_family_selection(
        #[case] lifespan: i64,
        #[case] max_idle: i64,
        #[case] expected: CacheValueKind,
    ) {
        let metadata = EmbeddedMetadata::builder()
            .lifespan(lifespan)
            .max_idle(max_idle)
            .build();
        let value = create_value("v".to_string(), &metadata, 5_000);
        assert_eq!(value.kind(), expected);
        assert_eq!(value.metadata(), metadata);
    }

    #[test]
    fn test_timestamps_are_stamped_with_now() {
        let metadata = EmbeddedMetadata::builder()
            .lifespan(1_000)
            .max_idle(200)
            .build();
        let value = create_value(7u32, &metadata, 5_000);
        assert_eq!(value.created(), 5_000);
        assert_eq!(value.last_used(), 5_000);
        assert_eq!(value.expiry_time(), 5_200);
    }

    #[test]
    fn test_create_entry() {
        let entry = create_entry("k", 1u8, &EmbeddedMetadata::immortal(), 0);
        assert_eq!(*entry.key(), "k");
        assert_eq!(entry.value().map(|v| **v), Some(1));
        assert_eq!(entry.kind(), CacheValueKind::Immortal);
    }
}
