//! Type identifiers of the value externalizers.
//!
//! An identifier is the discriminant for polymorphic decode: once assigned to
//! an encoding it must never be reused for a different one.

use super::ExternalizerId;

pub const IMMORTAL_VALUE: ExternalizerId = 72;
pub const MORTAL_VALUE: ExternalizerId = 73;
pub const TRANSIENT_VALUE: ExternalizerId = 74;
pub const TRANSIENT_MORTAL_VALUE: ExternalizerId = 75;
