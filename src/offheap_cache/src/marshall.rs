pub(crate) mod externalizer;
pub mod ids;
mod object_io;
mod object_marshaller;
mod registry;

pub use externalizer::{Externalizer, ExternalizerId};
pub use object_io::{ObjectInput, ObjectOutput};
pub use object_marshaller::{BincodeObjectMarshaller, ObjectMarshaller, MAX_PAYLOAD_BYTES};
pub use registry::{ExternalizerRegistry, ExternalizerRegistryBuilder};

#[cfg(test)]
pub(crate) mod test_utils;
