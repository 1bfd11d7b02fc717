use crate::container::entries::{
    CacheValue, CacheValueKind, Expirable, ImmortalCacheValue, InternalCacheEntry,
    InternalCacheValue, MortalCacheValue, TransientCacheValue, TransientMortalCacheValue,
};
use crate::marshall::test_utils::FakeObjectMarshaller;
use crate::marshall::{ids, BincodeObjectMarshaller, ExternalizerRegistry, ObjectOutput};
use rstest::rstest;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

fn make_value(kind: CacheValueKind, payload: Option<&str>) -> CacheValue<String> {
    let payload = payload.map(|p| Arc::new(p.to_string()));
    match kind {
        CacheValueKind::Immortal => ImmortalCacheValue::from_shared(payload).into(),
        CacheValueKind::Mortal => MortalCacheValue::from_shared(payload, 1_000, 60_000).into(),
        CacheValueKind::Transient => TransientCacheValue::from_shared(payload, 2_000, 500).into(),
        CacheValueKind::TransientMortal => {
            TransientMortalCacheValue::from_shared(payload, 1_000, 60_000, 2_000, 500).into()
        }
    }
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn bincode_registry() -> ExternalizerRegistry<String> {
    ExternalizerRegistry::with_default_externalizers(Arc::new(
        BincodeObjectMarshaller::with_type_name("string"),
    ))
    .unwrap()
}

fn fake_registry() -> ExternalizerRegistry<String> {
    ExternalizerRegistry::with_default_externalizers(Arc::new(FakeObjectMarshaller)).unwrap()
}

#[rstest]
#[case::immortal(CacheValueKind::Immortal, ids::IMMORTAL_VALUE)]
#[case::mortal(CacheValueKind::Mortal, ids::MORTAL_VALUE)]
#[case::transient(CacheValueKind::Transient, ids::TRANSIENT_VALUE)]
#[case::transient_mortal(CacheValueKind::TransientMortal, ids::TRANSIENT_MORTAL_VALUE)]
fn test_round_trip_preserves_value_and_hash(
    #[case] kind: CacheValueKind,
    #[case] expected_id: u8,
    #[values(Some("hello"), Some(""), None)] payload: Option<&str>,
) {
    for registry in [bincode_registry(), fake_registry()] {
        let value = make_value(kind, payload);
        let bytes = registry.write_value(&value).unwrap();
        assert_eq!(bytes[0], expected_id);

        let decoded = registry.read_value(&bytes).unwrap();
        assert_eq!(decoded.kind(), kind);
        assert_eq!(decoded.value().map(|v| v.as_str()), payload);
        assert_eq!(decoded, make_value(kind, payload));
        assert_eq!(hash_of(&decoded), hash_of(&value));
        assert_eq!(decoded.metadata(), value.metadata());
        assert_eq!(decoded.expiry_time(), value.expiry_time());
    }
}

#[rstest]
#[case::immortal(CacheValueKind::Immortal)]
#[case::mortal(CacheValueKind::Mortal)]
#[case::transient(CacheValueKind::Transient)]
#[case::transient_mortal(CacheValueKind::TransientMortal)]
fn test_equality_follows_payload(#[case] kind: CacheValueKind) {
    let a = make_value(kind, Some("a"));
    assert_eq!(a, make_value(kind, Some("a")));
    assert_eq!(hash_of(&a), hash_of(&make_value(kind, Some("a"))));
    assert_ne!(a, make_value(kind, Some("b")));
    assert_ne!(a, make_value(kind, None));
    assert_eq!(make_value(kind, None), make_value(kind, None));
    assert_eq!(
        hash_of(&make_value(kind, None)),
        hash_of(&make_value(kind, None))
    );
}

#[test]
fn test_families_never_equal_each_other() {
    assert_ne!(
        make_value(CacheValueKind::Immortal, Some("a")),
        CacheValue::Mortal(MortalCacheValue::new("a".to_string(), -1, -1))
    );
}

#[rstest]
#[case::immortal(CacheValueKind::Immortal)]
#[case::mortal(CacheValueKind::Mortal)]
#[case::transient(CacheValueKind::Transient)]
#[case::transient_mortal(CacheValueKind::TransientMortal)]
fn test_promotion(#[case] kind: CacheValueKind) {
    let value = make_value(kind, Some("payload"));
    let entry = value.to_internal_cache_entry(42u64);

    assert_eq!(*entry.key(), 42);
    assert_eq!(entry.kind(), kind);
    assert!(Arc::ptr_eq(entry.value().unwrap(), value.value().unwrap()));
    assert_eq!(entry.created(), value.created());
    assert_eq!(entry.last_used(), value.last_used());
    assert_eq!(entry.lifespan(), value.lifespan());
    assert_eq!(entry.max_idle(), value.max_idle());
    assert_eq!(entry.expiry_time(), value.expiry_time());
    assert_eq!(entry.metadata(), value.metadata());
    assert_eq!(entry.to_internal_cache_value(), value);

    let (key, cache_value) = entry.into_parts();
    assert_eq!(key, 42);
    assert_eq!(cache_value, value);
}

#[rstest]
#[case::immortal(CacheValueKind::Immortal)]
#[case::mortal(CacheValueKind::Mortal)]
#[case::transient(CacheValueKind::Transient)]
#[case::transient_mortal(CacheValueKind::TransientMortal)]
fn test_set_value_exchange_and_clone_independence(#[case] kind: CacheValueKind) {
    let mut original = make_value(kind, Some("v1"));
    let clone = original.clone();
    assert_eq!(clone, original);

    let returned = original.set_value(Some(Arc::new("v2".to_string())));
    assert_eq!(returned.as_deref().map(String::as_str), Some("v1"));
    assert_eq!(original.value().map(|v| v.as_str()), Some("v2"));
    assert_eq!(clone.value().map(|v| v.as_str()), Some("v1"));
}

#[rstest]
fn test_immortal_never_expires(#[values(i64::MIN, -1, 0, 1_000, i64::MAX)] now: i64) {
    let value = make_value(CacheValueKind::Immortal, Some("forever"));
    assert!(!value.is_expired(now));
    assert!(!value.can_expire());
    let entry = value.to_internal_cache_entry("k");
    assert!(!entry.is_expired(now));
}

#[rstest]
#[case::mortal(CacheValueKind::Mortal, 61_000, 61_001)]
#[case::transient(CacheValueKind::Transient, 2_500, 2_501)]
#[case::transient_mortal(CacheValueKind::TransientMortal, 2_500, 2_501)]
fn test_expiring_families(
    #[case] kind: CacheValueKind,
    #[case] last_live: i64,
    #[case] dead: i64,
) {
    let value = make_value(kind, Some("v"));
    assert!(value.can_expire());
    assert_eq!(value.expiry_time(), last_live);
    assert!(!value.is_expired(last_live));
    assert!(value.is_expired(dead));
}

#[rstest]
#[case::immortal(ids::IMMORTAL_VALUE, CacheValueKind::Mortal)]
#[case::mortal(ids::MORTAL_VALUE, CacheValueKind::Transient)]
#[case::transient(ids::TRANSIENT_VALUE, CacheValueKind::TransientMortal)]
#[case::transient_mortal(ids::TRANSIENT_MORTAL_VALUE, CacheValueKind::Immortal)]
fn test_externalizer_rejects_foreign_family(#[case] id: u8, #[case] foreign: CacheValueKind) {
    let registry = bincode_registry();
    let externalizer = registry.externalizer(id).unwrap();
    let marshaller = BincodeObjectMarshaller::<String>::new();
    let mut buf = bytes::BytesMut::new();
    let mut output = ObjectOutput::<String>::new(&mut buf, &marshaller);
    let err = externalizer
        .write_object(&mut output, &make_value(foreign, Some("v")))
        .unwrap_err();
    assert!(matches!(err, crate::error::Error::UnsupportedType(_)));
    assert!(err
        .to_string()
        .contains(&format!("externalizer {id} cannot write a {foreign} cache value")));
    assert!(buf.is_empty());
}

#[test]
fn test_identifier_is_stable() {
    let registry = bincode_registry();
    let first = registry.id_for(CacheValueKind::Immortal);
    for _ in 0..10 {
        assert_eq!(registry.id_for(CacheValueKind::Immortal), first);
        assert_eq!(
            registry.externalizer(ids::IMMORTAL_VALUE).unwrap().id(),
            ids::IMMORTAL_VALUE
        );
    }
}

#[test]
fn test_hello_scenario() {
    let registry = bincode_registry();
    let original = ImmortalCacheValue::new("hello".to_string());
    let bytes = registry.write_value(&original.clone().into()).unwrap();

    let decoded = registry.read_value(&bytes).unwrap();
    assert_eq!(decoded.value().map(|v| v.as_str()), Some("hello"));
    assert!(!decoded.is_expired(1_234_567));
    assert_eq!(hash_of(&decoded), hash_of(&CacheValue::from(original)));
}

#[rstest]
#[case::mortal(CacheValueKind::Mortal)]
#[case::transient_mortal(CacheValueKind::TransientMortal)]
fn test_truncated_fields_fail_to_decode(#[case] kind: CacheValueKind) {
    let registry = bincode_registry();
    let bytes = registry.write_value(&make_value(kind, Some("v"))).unwrap();
    let err = registry.read_value(&bytes[..bytes.len() - 1]).unwrap_err();
    assert!(matches!(err, crate::error::Error::Decode(_)));
}
