pub mod error;

pub use error::{ErrorStatus, ErrorStruct};
