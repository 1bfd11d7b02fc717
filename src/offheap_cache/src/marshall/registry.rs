use crate::container::entries::{
    CacheValue, CacheValueKind, ImmortalCacheValueExternalizer, InternalCacheValue,
    MortalCacheValueExternalizer, TransientCacheValueExternalizer,
    TransientMortalCacheValueExternalizer,
};
use crate::error::{Error, Result};
use crate::marshall::object_io::ensure_remaining;
use crate::marshall::{Externalizer, ExternalizerId, ObjectInput, ObjectMarshaller, ObjectOutput};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use offheap_error::ErrorStruct;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Maps type identifiers to externalizers and value families to identifiers.
///
/// Built once, then read-only; share it through an `Arc`. Every externalized
/// value is framed as `[type id: u8][externalizer body]`.
pub struct ExternalizerRegistry<V> {
    marshaller: Arc<dyn ObjectMarshaller<V>>,
    by_id: HashMap<ExternalizerId, Arc<dyn Externalizer<V>>>,
    by_kind: HashMap<CacheValueKind, ExternalizerId>,
}

pub struct ExternalizerRegistryBuilder<V> {
    marshaller: Arc<dyn ObjectMarshaller<V>>,
    externalizers: Vec<Arc<dyn Externalizer<V>>>,
}

impl<V: 'static> ExternalizerRegistryBuilder<V> {
    pub fn register(mut self, externalizer: impl Externalizer<V> + 'static) -> Self {
        self.externalizers.push(Arc::new(externalizer));
        self
    }

    /// Fails with [`Error::ExternalizerCollision`] if two externalizers share
    /// an identifier or claim the same value family.
    pub fn build(self) -> Result<ExternalizerRegistry<V>> {
        let mut by_id: HashMap<ExternalizerId, Arc<dyn Externalizer<V>>> = HashMap::new();
        let mut by_kind = HashMap::new();
        for externalizer in self.externalizers {
            let id = externalizer.id();
            if by_id.contains_key(&id) {
                tracing::warn!(id, "duplicate externalizer identifier");
                return Err(Error::ExternalizerCollision(ErrorStruct::permanent(format!(
                    "externalizer identifier {id} registered twice"
                ))));
            }
            for kind in externalizer.type_classes() {
                if let Some(existing) = by_kind.insert(*kind, id) {
                    tracing::warn!(id, existing, %kind, "value family claimed twice");
                    return Err(Error::ExternalizerCollision(ErrorStruct::permanent(
                        format!(
                            "{kind} cache values claimed by externalizers {existing} and {id}"
                        ),
                    )));
                }
            }
            tracing::debug!(id, kinds = ?externalizer.type_classes(), "registered externalizer");
            by_id.insert(id, externalizer);
        }
        Ok(ExternalizerRegistry {
            marshaller: self.marshaller,
            by_id,
            by_kind,
        })
    }
}

impl<V: 'static> ExternalizerRegistry<V> {
    pub fn builder(marshaller: Arc<dyn ObjectMarshaller<V>>) -> ExternalizerRegistryBuilder<V> {
        ExternalizerRegistryBuilder {
            marshaller,
            externalizers: Vec::new(),
        }
    }

    /// Registry holding the externalizers of the four built-in value families.
    pub fn with_default_externalizers(marshaller: Arc<dyn ObjectMarshaller<V>>) -> Result<Self> {
        Self::builder(marshaller)
            .register(ImmortalCacheValueExternalizer)
            .register(MortalCacheValueExternalizer)
            .register(TransientCacheValueExternalizer)
            .register(TransientMortalCacheValueExternalizer)
            .build()
    }

    pub fn externalizer(&self, id: ExternalizerId) -> Option<&Arc<dyn Externalizer<V>>> {
        self.by_id.get(&id)
    }

    pub fn id_for(&self, kind: CacheValueKind) -> Option<ExternalizerId> {
        self.by_kind.get(&kind).copied()
    }

    pub fn write_value_into(&self, buf: &mut BytesMut, value: &CacheValue<V>) -> Result<()> {
        let kind = value.kind();
        let Some((id, externalizer)) = self
            .id_for(kind)
            .and_then(|id| self.by_id.get(&id).map(|externalizer| (id, externalizer)))
        else {
            return Err(Error::UnknownExternalizer(ErrorStruct::permanent(format!(
                "no externalizer registered for {kind} cache values"
            ))));
        };
        buf.put_u8(id);
        let mut output = ObjectOutput::new(buf, self.marshaller.as_ref());
        externalizer.write_object(&mut output, value)
    }

    pub fn write_value(&self, value: &CacheValue<V>) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        self.write_value_into(&mut buf, value)?;
        Ok(buf.freeze())
    }

    /// Decodes exactly one framed value; trailing bytes are an error.
    pub fn read_value(&self, mut bytes: &[u8]) -> Result<CacheValue<V>> {
        ensure_remaining(bytes, 1, "type identifier")?;
        let id = bytes.get_u8();
        let Some(externalizer) = self.by_id.get(&id) else {
            tracing::debug!(id, "unknown externalizer identifier");
            return Err(Error::UnknownExternalizer(ErrorStruct::permanent(format!(
                "no externalizer registered for identifier {id}"
            ))));
        };
        let mut input = ObjectInput::new(bytes, self.marshaller.as_ref());
        let value = externalizer.read_object(&mut input)?;
        if input.remaining() != 0 {
            return Err(Error::decode(format!(
                "{} trailing bytes after {} cache value",
                input.remaining(),
                value.kind()
            )));
        }
        Ok(value)
    }
}

impl<V> fmt::Debug for ExternalizerRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.by_id.keys().copied().collect();
        ids.sort_unstable();
        f.debug_struct("ExternalizerRegistry")
            .field("ids", &ids)
            .finish()
    }
}
