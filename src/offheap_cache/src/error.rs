use offheap_error::{ErrorStatus, ErrorStruct};
use std::result;
use thiserror::Error;

/// Custom error type for offheap_cache
#[derive(Clone, Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Decode(ErrorStruct),

    #[error("{0}")]
    Encode(ErrorStruct),

    /// The type recorded in an object record cannot be resolved by the reading marshaller.
    #[error("{0}")]
    ClassResolution(ErrorStruct),

    #[error("{0}")]
    UnknownExternalizer(ErrorStruct),

    #[error("{0}")]
    ExternalizerCollision(ErrorStruct),

    #[error("{0}")]
    UnsupportedType(ErrorStruct),

    #[error("{0}")]
    PayloadTooLong(ErrorStruct),
}

pub type Result<T> = result::Result<T, Error>;

impl Error {
    #[track_caller]
    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Error::Decode(ErrorStruct::permanent(message))
    }

    pub fn status(&self) -> ErrorStatus {
        match self {
            Error::Decode(e)
            | Error::Encode(e)
            | Error::ClassResolution(e)
            | Error::UnknownExternalizer(e)
            | Error::ExternalizerCollision(e)
            | Error::UnsupportedType(e)
            | Error::PayloadTooLong(e) => e.status,
        }
    }
}

impl From<bincode::error::DecodeError> for Error {
    #[track_caller]
    fn from(source: bincode::error::DecodeError) -> Self {
        Error::Decode(
            ErrorStruct::new(format!("Decode error: {source}"), ErrorStatus::Permanent)
                .with_source(source),
        )
    }
}

impl From<bincode::error::EncodeError> for Error {
    #[track_caller]
    fn from(source: bincode::error::EncodeError) -> Self {
        Error::Encode(
            ErrorStruct::new(format!("Encode error: {source}"), ErrorStatus::Permanent)
                .with_source(source),
        )
    }
}

impl From<std::num::TryFromIntError> for Error {
    #[track_caller]
    fn from(source: std::num::TryFromIntError) -> Self {
        Error::PayloadTooLong(
            ErrorStruct::new(format!("Payload too long: {source}"), ErrorStatus::Permanent)
                .with_source(source),
        )
    }
}
