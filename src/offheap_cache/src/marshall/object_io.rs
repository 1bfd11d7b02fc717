use crate::error::{Error, Result};
use crate::marshall::ObjectMarshaller;
use bytes::{Buf, BufMut, BytesMut};

/// Write side of an externalizer: fixed-width primitives plus the injected
/// "write arbitrary object" capability.
pub struct ObjectOutput<'a, V> {
    buf: &'a mut BytesMut,
    marshaller: &'a dyn ObjectMarshaller<V>,
}

impl<'a, V> ObjectOutput<'a, V> {
    pub fn new(buf: &'a mut BytesMut, marshaller: &'a dyn ObjectMarshaller<V>) -> Self {
        Self { buf, marshaller }
    }

    pub fn write_object(&mut self, value: Option<&V>) -> Result<()> {
        self.marshaller.write_object(self.buf, value)
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.put_i64(value);
    }
}

/// Read side of an externalizer, the mirror of [`ObjectOutput`].
pub struct ObjectInput<'a, V> {
    buf: &'a [u8],
    marshaller: &'a dyn ObjectMarshaller<V>,
}

impl<'a, V> ObjectInput<'a, V> {
    pub fn new(buf: &'a [u8], marshaller: &'a dyn ObjectMarshaller<V>) -> Self {
        Self { buf, marshaller }
    }

    pub fn read_object(&mut self) -> Result<Option<V>> {
        self.marshaller.read_object(&mut self.buf)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        ensure_remaining(self.buf, 1, "u8")?;
        Ok(self.buf.get_u8())
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        ensure_remaining(self.buf, 8, "i64")?;
        Ok(self.buf.get_i64())
    }

    pub fn remaining(&self) -> usize {
        self.buf.len()
    }
}

#[track_caller]
pub(crate) fn ensure_remaining(buf: &[u8], needed: usize, what: &str) -> Result<()> {
    if buf.len() < needed {
        return Err(Error::decode(format!(
            "truncated input: {what} needs {needed} bytes, {} left",
            buf.len()
        )));
    }
    Ok(())
}
