use crate::error::{Error, Result};
use crate::marshall::object_io::ensure_remaining;
use crate::marshall::ObjectMarshaller;
use bytes::{Buf, BufMut, BytesMut};

/// Length-prefixed UTF-8 payload codec, independent of bincode.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct FakeObjectMarshaller;

impl ObjectMarshaller<String> for FakeObjectMarshaller {
    fn write_object(&self, buf: &mut BytesMut, value: Option<&String>) -> Result<()> {
        match value {
            None => buf.put_u8(0),
            Some(value) => {
                buf.put_u8(1);
                buf.put_u32(u32::try_from(value.len())?);
                buf.put_slice(value.as_bytes());
            }
        }
        Ok(())
    }

    fn read_object(&self, buf: &mut &[u8]) -> Result<Option<String>> {
        ensure_remaining(buf, 1, "presence flag")?;
        if buf.get_u8() == 0 {
            return Ok(None);
        }
        ensure_remaining(buf, 4, "string length")?;
        let len = buf.get_u32() as usize;
        ensure_remaining(buf, len, "string")?;
        let value = String::from_utf8(buf[..len].to_vec())
            .map_err(|e| Error::decode(format!("invalid string payload: {e}")))?;
        buf.advance(len);
        Ok(Some(value))
    }
}
