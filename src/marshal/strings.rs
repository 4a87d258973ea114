use std::ffi::{c_char, CStr, CString};
use std::fmt;

use bytemuck::Zeroable;

use crate::error::SdkError;

/// Inline, NUL-terminated UTF-8 string of at most `N - 1` bytes.
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct NativeStr<const N: usize>([u8; N]);

// SAFETY: an all-zero buffer is the empty string.
unsafe impl<const N: usize> Zeroable for NativeStr<N> {}

impl<const N: usize> NativeStr<N> {
    /// Copy `value` into a fixed buffer.
    ///
    /// Fails when the string does not fit together with its terminator or
    /// contains an interior NUL, which the native side would truncate.
    pub fn encode(value: &str) -> Result<Self, SdkError> {
        let bytes = value.as_bytes();
        if bytes.contains(&0) {
            return Err(SdkError::marshalling(
                "string contains an interior NUL byte",
            ));
        }
        if bytes.len() >= N {
            return Err(SdkError::marshalling(format!(
                "string of {} bytes exceeds native capacity of {} bytes",
                bytes.len(),
                N.saturating_sub(1)
            )));
        }

        let mut buffer = [0u8; N];
        buffer[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(buffer))
    }

    /// Decode the buffer up to its terminator.
    pub fn decode(&self) -> Result<String, SdkError> {
        let bytes = self.terminated_bytes().ok_or_else(|| {
            SdkError::marshalling("native string is not NUL-terminated")
        })?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|err| SdkError::marshalling(format!("native string is not valid UTF-8: {}", err)))
    }

    fn terminated_bytes(&self) -> Option<&[u8]> {
        let end = self.0.iter().position(|byte| *byte == 0)?;
        Some(&self.0[..end])
    }

    /// Raw buffer, including the terminator and trailing padding.
    pub fn as_raw(&self) -> &[u8; N] {
        &self.0
    }

    pub fn from_raw(raw: [u8; N]) -> Self {
        Self(raw)
    }
}

impl<const N: usize> Default for NativeStr<N> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<const N: usize> fmt::Debug for NativeStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.terminated_bytes() {
            Some(bytes) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
            None => write!(f, "<unterminated>"),
        }
    }
}

/// Convert a string argument into a C string for a native call.
pub fn c_string(value: &str, field: &str) -> Result<CString, SdkError> {
    CString::new(value)
        .map_err(|_| SdkError::marshalling(format!("{} contains an interior NUL byte", field)))
}

/// Copy a C string handed to a callback.
///
/// Null maps to an empty string. Invalid UTF-8 is a marshalling failure so
/// ids reach handlers byte for byte or not at all.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string valid for the
/// duration of the call.
pub unsafe fn string_from_ptr(ptr: *const c_char) -> Result<String, SdkError> {
    if ptr.is_null() {
        return Ok(String::new());
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(str::to_owned)
        .map_err(|err| SdkError::marshalling(format!("callback string is not valid UTF-8: {}", err)))
}
