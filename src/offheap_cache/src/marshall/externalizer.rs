use crate::container::entries::{CacheValue, CacheValueKind, InternalCacheValue};
use crate::error::{Error, Result};
use crate::marshall::{ObjectInput, ObjectOutput};
use offheap_error::ErrorStruct;

/// Stable numeric tag written in front of every externalized value.
pub type ExternalizerId = u8;

/// Stateless codec bound to the value families listed by [`Externalizer::type_classes`].
pub trait Externalizer<V>: Send + Sync {
    /// Writes the body of `value`. The type identifier is written by the registry.
    fn write_object(&self, output: &mut ObjectOutput<'_, V>, value: &CacheValue<V>) -> Result<()>;

    fn read_object(&self, input: &mut ObjectInput<'_, V>) -> Result<CacheValue<V>>;

    fn id(&self) -> ExternalizerId;

    fn type_classes(&self) -> &'static [CacheValueKind];
}

#[track_caller]
pub(crate) fn unsupported_type<V>(id: ExternalizerId, value: &CacheValue<V>) -> Error {
    Error::UnsupportedType(ErrorStruct::permanent(format!(
        "externalizer {id} cannot write a {} cache value",
        value.kind()
    )))
}
