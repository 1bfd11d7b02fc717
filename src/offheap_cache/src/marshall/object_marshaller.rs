use crate::error::{Error, Result};
use crate::marshall::object_io::ensure_remaining;
use bytes::{Buf, BufMut, BytesMut};
use offheap_error::ErrorStruct;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

const ABSENT: u8 = 0;
const PRESENT: u8 = 1;

/// Upper bound on an encoded payload and on what bincode may allocate while
/// decoding one. Keeps corrupt length prefixes from reaching the allocator.
pub const MAX_PAYLOAD_BYTES: usize = 256 * 1024 * 1024;

type PayloadConfig = bincode::config::Configuration<
    bincode::config::LittleEndian,
    bincode::config::Varint,
    bincode::config::Limit<MAX_PAYLOAD_BYTES>,
>;

fn payload_config() -> PayloadConfig {
    bincode::config::standard().with_limit::<MAX_PAYLOAD_BYTES>()
}

/// The "write arbitrary object / read arbitrary object" capability handed to
/// externalizers. An object record must carry enough type information for
/// `read_object` to either rebuild the exact payload or fail with
/// [`Error::ClassResolution`].
pub trait ObjectMarshaller<V>: Send + Sync {
    fn write_object(&self, buf: &mut BytesMut, value: Option<&V>) -> Result<()>;

    /// Reads one object record and advances `buf` past it.
    fn read_object(&self, buf: &mut &[u8]) -> Result<Option<V>>;
}

/// Serde payloads encoded with bincode's standard configuration.
///
/// Record layout:
/// ```text
/// absent:  [0u8]
/// present: [1u8][name_len: u16][type name: utf8][payload_len: u32][bincode payload]
/// ```
pub struct BincodeObjectMarshaller<V> {
    type_name: Cow<'static, str>,
    _payload: PhantomData<fn() -> V>,
}

impl<V> BincodeObjectMarshaller<V> {
    pub fn new() -> Self {
        Self {
            type_name: Cow::Borrowed(std::any::type_name::<V>()),
            _payload: PhantomData,
        }
    }

    /// `std::any::type_name` is not stable across compiler versions, so bytes
    /// that outlive the process should be written with a pinned name.
    pub fn with_type_name(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Cow::Owned(type_name.into()),
            _payload: PhantomData,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl<V> Default for BincodeObjectMarshaller<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for BincodeObjectMarshaller<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BincodeObjectMarshaller")
            .field("type_name", &self.type_name)
            .finish()
    }
}

impl<V> ObjectMarshaller<V> for BincodeObjectMarshaller<V>
where
    V: Serialize + DeserializeOwned,
{
    fn write_object(&self, buf: &mut BytesMut, value: Option<&V>) -> Result<()> {
        let Some(value) = value else {
            buf.put_u8(ABSENT);
            return Ok(());
        };
        let payload = bincode::serde::encode_to_vec(value, payload_config())?;
        if payload.len() > MAX_PAYLOAD_BYTES {
            return Err(Error::PayloadTooLong(ErrorStruct::permanent(format!(
                "payload of {} bytes exceeds the {MAX_PAYLOAD_BYTES} byte limit",
                payload.len()
            ))));
        }
        let type_name = self.type_name.as_bytes();
        buf.put_u8(PRESENT);
        buf.put_u16(u16::try_from(type_name.len())?);
        buf.put_slice(type_name);
        buf.put_u32(u32::try_from(payload.len())?);
        buf.put_slice(&payload);
        Ok(())
    }

    fn read_object(&self, buf: &mut &[u8]) -> Result<Option<V>> {
        ensure_remaining(buf, 1, "presence flag")?;
        match buf.get_u8() {
            ABSENT => return Ok(None),
            PRESENT => {}
            flag => {
                return Err(Error::decode(format!(
                    "invalid object record presence flag {flag}"
                )))
            }
        }

        ensure_remaining(buf, 2, "type name length")?;
        let name_len = buf.get_u16() as usize;
        ensure_remaining(buf, name_len, "type name")?;
        let type_name = std::str::from_utf8(&buf[..name_len]).map_err(|e| {
            Error::Decode(ErrorStruct::permanent("object record type name is not utf-8").with_source(e))
        })?;
        if type_name != self.type_name {
            tracing::debug!(
                expected = %self.type_name,
                found = type_name,
                "cannot resolve payload type of object record"
            );
            return Err(Error::ClassResolution(ErrorStruct::permanent(format!(
                "cannot resolve payload type {type_name}, marshaller reads {}",
                self.type_name
            ))));
        }
        buf.advance(name_len);

        ensure_remaining(buf, 4, "payload length")?;
        let payload_len = buf.get_u32() as usize;
        if payload_len > MAX_PAYLOAD_BYTES {
            return Err(Error::decode(format!(
                "payload length {payload_len} exceeds the {MAX_PAYLOAD_BYTES} byte limit"
            )));
        }
        ensure_remaining(buf, payload_len, "payload")?;
        let (value, consumed) =
            bincode::serde::decode_from_slice::<V, _>(&buf[..payload_len], payload_config())?;
        if consumed != payload_len {
            return Err(Error::decode(format!(
                "payload decoded from {consumed} of {payload_len} bytes"
            )));
        }
        buf.advance(payload_len);
        Ok(Some(value))
    }
}
