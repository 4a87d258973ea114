//! Conversion between native fixed-layout records and managed values.
//!
//! Every conversion is an explicit field-by-field copy. Nothing here holds a
//! reference into native memory after it returns.

mod collections;
mod enums;
mod records;
mod strings;

pub use collections::{copy_array, fill_array};
pub use strings::{c_string, string_from_ptr, NativeStr};

use crate::error::SdkError;

/// Two-way conversion between a managed value and its native layout.
///
/// `from_native(&to_native(v)?)? == v` holds for every value that can be
/// encoded at all; the result is always a new instance.
pub trait Marshal: Sized {
    type Native;

    fn to_native(&self) -> Result<Self::Native, SdkError>;

    fn from_native(native: &Self::Native) -> Result<Self, SdkError>;
}
