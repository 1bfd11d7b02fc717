pub mod container;
pub mod error;
pub mod marshall;
pub mod metadata;
pub mod time_service;

pub use container::entries::{
    CacheEntry, CacheValue, CacheValueKind, Expirable, ImmortalCacheEntry, ImmortalCacheValue,
    ImmortalCacheValueExternalizer, InternalCacheEntry, InternalCacheValue, InternalEntry,
    MortalCacheEntry, MortalCacheValue, MortalCacheValueExternalizer, TransientCacheEntry,
    TransientCacheValue, TransientCacheValueExternalizer, TransientMortalCacheEntry,
    TransientMortalCacheValue, TransientMortalCacheValueExternalizer,
};
pub use container::entry_factory::{create_entry, create_shared_value, create_value};
pub use container::{DataContainerConfig, DataContainerTrait, EvictionListener, MokaDataContainer};
pub use error::{Error, Result};
pub use marshall::{
    BincodeObjectMarshaller, Externalizer, ExternalizerId, ExternalizerRegistry,
    ExternalizerRegistryBuilder, ObjectInput, ObjectMarshaller, ObjectOutput, MAX_PAYLOAD_BYTES,
};
pub use metadata::EmbeddedMetadata;
pub use time_service::{DefaultTimeService, TimeService};
