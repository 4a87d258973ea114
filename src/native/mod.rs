//! Native engine call surface.
//!
//! The native engine is a flat, synchronous library: every call returns a
//! [`Status`] and writes results into caller-owned `#[repr(C)]` records.
//! [`NativeEngine`] is the seam the rest of the crate talks to; the in-process
//! [`StubEngine`] and the linked `LinkedEngine` (feature `native-link`)
//! implement it.

use std::ffi::{c_char, c_void, CStr};
use std::sync::Arc;

use crate::error::{translate, SdkError};

pub mod records;
mod stub;

pub use records::{
    NativeAudioDevice, NativeConferenceInfos, NativeConferenceOptions, NativeConferenceParams,
    NativeConnectionOptions, NativeJoinOptions, NativeListenOptions, NativeMediaConstraints,
    NativeParticipant, NativeParticipantInfo, NativeUserInfo,
};
pub use stub::StubEngine;

/// Native status codes returned by every engine call.
pub mod codes {
    pub const OK: i32 = 0;
    pub const GENERIC: i32 = 1;
    pub const INVALID_ARGUMENT: i32 = 2;
    pub const NOT_INITIALIZED: i32 = 3;
    pub const INVALID_STATE: i32 = 4;
    pub const NOT_FOUND: i32 = 5;
    pub const SIGNALING: i32 = 6;
    pub const INVALID_TOKEN: i32 = 7;
    pub const MEDIA_ENGINE: i32 = 8;
    pub const PERMISSION_DENIED: i32 = 9;
}

/// Result of a single native call: a status code plus the optional
/// diagnostic string the engine attached to it.
///
/// The only way to turn a status into a `Result` is [`Status::check`], which
/// goes through the error translator.
#[must_use = "native status must be passed through the error translator"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: i32,
    diagnostic: Option<String>,
}

impl Status {
    pub fn ok() -> Self {
        Self::from_code(codes::OK)
    }

    pub fn from_code(code: i32) -> Self {
        Self {
            code,
            diagnostic: None,
        }
    }

    pub fn failed(code: i32, diagnostic: impl Into<String>) -> Self {
        Self {
            code,
            diagnostic: Some(diagnostic.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == codes::OK
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    pub(crate) fn into_diagnostic(self) -> Option<String> {
        self.diagnostic
    }

    /// Run the status through the error translator.
    pub fn check(self, operation: &'static str) -> Result<(), SdkError> {
        translate(operation, self)
    }
}

/// A native array lent to the caller for the duration of one call.
///
/// `count` is what the engine reported; `items` is the buffer it handed
/// over. The two are kept separate so marshalling can detect an
/// inconsistent count instead of trusting it.
pub struct RawArray<'a, T> {
    count: i32,
    items: &'a [T],
}

impl<'a, T> RawArray<'a, T> {
    pub fn new(count: i32, items: &'a [T]) -> Self {
        Self { count, items }
    }

    pub fn from_slice(items: &'a [T]) -> Self {
        Self {
            count: i32::try_from(items.len()).unwrap_or(i32::MAX),
            items,
        }
    }

    /// Wrap a native `(count, pointer)` pair.
    ///
    /// A null pointer or a non-positive count yields an empty buffer; the
    /// reported count is kept as-is for validation.
    ///
    /// # Safety
    /// When `ptr` is non-null and `count > 0`, `ptr` must point to `count`
    /// initialized `T`s that stay valid and unmodified for `'a`.
    pub unsafe fn from_raw_parts(count: i32, ptr: *const T) -> Self {
        let items = if ptr.is_null() || count <= 0 {
            &[]
        } else {
            std::slice::from_raw_parts(ptr, count as usize)
        };
        Self { count, items }
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn items(&self) -> &'a [T] {
        self.items
    }
}

/// Opaque pointer handed to the engine with a callback and passed back on
/// every invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserData(*mut c_void);

// SAFETY: the pointer is never dereferenced by the engine; only the bridge
// trampolines read through it, and they point at `Sync` handler slots.
unsafe impl Send for UserData {}
unsafe impl Sync for UserData {}

impl UserData {
    pub fn new(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }
}

pub type DeviceCallback =
    unsafe extern "C" fn(user_data: *mut c_void, device: *const NativeAudioDevice);
pub type DeviceRemovedCallback =
    unsafe extern "C" fn(user_data: *mut c_void, device_id: *const c_char);
pub type DeviceChangedCallback =
    unsafe extern "C" fn(user_data: *mut c_void, device: *const NativeAudioDevice, no_device: u8);
pub type SignalingErrorCallback =
    unsafe extern "C" fn(user_data: *mut c_void, message: *const c_char);
pub type InvalidTokenCallback = unsafe extern "C" fn(
    user_data: *mut c_void,
    reason: *const c_char,
    description: *const c_char,
);

/// Flat synchronous call surface of the native engine.
///
/// Calls may block on I/O or device access. Output records are owned by the
/// caller and must be call-local; array outputs are only valid inside the
/// visitor.
pub trait NativeEngine: Send + Sync {
    fn init(&self, app_key: &CStr) -> Status;
    fn release(&self) -> Status;
    fn set_log_level(&self, level: i32) -> Status;

    fn session_open(&self, user: &NativeUserInfo, out: &mut NativeUserInfo) -> Status;
    fn session_close(&self) -> Status;

    fn conference_create(
        &self,
        options: &NativeConferenceOptions,
        out: &mut NativeConferenceInfos,
    ) -> Status;
    fn conference_join(
        &self,
        conference: &NativeConferenceInfos,
        options: &NativeJoinOptions,
        out: &mut NativeConferenceInfos,
    ) -> Status;
    fn conference_listen(
        &self,
        conference: &NativeConferenceInfos,
        options: &NativeListenOptions,
        out: &mut NativeConferenceInfos,
    ) -> Status;
    fn conference_leave(&self) -> Status;
    fn conference_participants(
        &self,
        visit: &mut dyn FnMut(RawArray<'_, NativeParticipant>),
    ) -> Status;

    fn audio_devices(&self, visit: &mut dyn FnMut(RawArray<'_, NativeAudioDevice>)) -> Status;
    fn current_audio_input_device(&self, out: &mut NativeAudioDevice) -> Status;
    fn current_audio_output_device(&self, out: &mut NativeAudioDevice) -> Status;
    fn set_preferred_audio_input_device(&self, device: &NativeAudioDevice) -> Status;
    fn set_preferred_audio_output_device(&self, device: &NativeAudioDevice) -> Status;

    fn local_audio_start(&self) -> Status;
    fn local_audio_stop(&self) -> Status;
    fn remote_audio_start(&self, participant_id: &CStr) -> Status;
    fn remote_audio_stop(&self, participant_id: &CStr) -> Status;
    fn remote_audio_mute(&self, muted: bool, participant_id: &CStr) -> Status;

    fn set_on_device_added(&self, callback: DeviceCallback, user_data: UserData) -> Status;
    fn set_on_device_removed(&self, callback: DeviceRemovedCallback, user_data: UserData)
        -> Status;
    fn set_on_device_changed(&self, callback: DeviceChangedCallback, user_data: UserData)
        -> Status;
    fn set_on_signaling_channel_error(
        &self,
        callback: SignalingErrorCallback,
        user_data: UserData,
    ) -> Status;
    fn set_on_invalid_token_error(
        &self,
        callback: InvalidTokenCallback,
        user_data: UserData,
    ) -> Status;
}

cfg_if::cfg_if! {
    if #[cfg(feature = "native-link")] {
        mod linked;
        pub use linked::LinkedEngine;

        /// Engine backed by the linked native library.
        pub fn default_engine() -> Arc<dyn NativeEngine> {
            Arc::new(LinkedEngine::new())
        }
    } else {
        /// In-process stub engine; enable `native-link` for the real library.
        pub fn default_engine() -> Arc<dyn NativeEngine> {
            Arc::new(StubEngine::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessors() {
        let ok = Status::ok();
        assert!(ok.is_ok());
        assert_eq!(ok.code(), codes::OK);
        assert!(ok.diagnostic().is_none());

        let failed = Status::failed(codes::INVALID_STATE, "no conference");
        assert!(!failed.is_ok());
        assert_eq!(failed.diagnostic(), Some("no conference"));
        assert!(failed.check("conference_leave").is_err());
    }

    #[test]
    fn test_raw_array_from_null_pointer_is_empty() {
        let raw = unsafe { RawArray::<NativeAudioDevice>::from_raw_parts(3, std::ptr::null()) };
        assert_eq!(raw.count(), 3);
        assert!(raw.items().is_empty());
    }

    #[test]
    fn test_raw_array_from_raw_parts_borrows_buffer() {
        let values = [1_i32, 2, 3];
        let raw = unsafe { RawArray::from_raw_parts(2, values.as_ptr()) };
        assert_eq!(raw.items(), &[1, 2]);

        let negative = unsafe { RawArray::from_raw_parts(-1, values.as_ptr()) };
        assert_eq!(negative.count(), -1);
        assert!(negative.items().is_empty());
    }
}
