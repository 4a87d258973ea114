use std::ffi::{c_char, c_int, c_void, CStr};

use super::{
    DeviceCallback, DeviceChangedCallback, DeviceRemovedCallback, InvalidTokenCallback,
    NativeAudioDevice, NativeConferenceInfos, NativeConferenceOptions, NativeEngine,
    NativeJoinOptions, NativeListenOptions, NativeParticipant, NativeUserInfo, RawArray,
    SignalingErrorCallback, Status, UserData,
};
#[link(name = "comms_native")]
extern "C" {
    fn comms_last_error_message() -> *const c_char;
    fn comms_free_array(items: *mut c_void);

    fn comms_init(app_key: *const c_char) -> c_int;
    fn comms_release() -> c_int;
    fn comms_set_log_level(level: c_int) -> c_int;

    fn comms_session_open(user: *const NativeUserInfo, out: *mut NativeUserInfo) -> c_int;
    fn comms_session_close() -> c_int;

    fn comms_conference_create(
        options: *const NativeConferenceOptions,
        out: *mut NativeConferenceInfos,
    ) -> c_int;
    fn comms_conference_join(
        conference: *const NativeConferenceInfos,
        options: *const NativeJoinOptions,
        out: *mut NativeConferenceInfos,
    ) -> c_int;
    fn comms_conference_listen(
        conference: *const NativeConferenceInfos,
        options: *const NativeListenOptions,
        out: *mut NativeConferenceInfos,
    ) -> c_int;
    fn comms_conference_leave() -> c_int;
    fn comms_conference_participants(
        count: *mut c_int,
        items: *mut *mut NativeParticipant,
    ) -> c_int;

    fn comms_audio_devices(count: *mut c_int, items: *mut *mut NativeAudioDevice) -> c_int;
    fn comms_current_audio_input_device(out: *mut NativeAudioDevice) -> c_int;
    fn comms_current_audio_output_device(out: *mut NativeAudioDevice) -> c_int;
    fn comms_set_preferred_audio_input_device(device: *const NativeAudioDevice) -> c_int;
    fn comms_set_preferred_audio_output_device(device: *const NativeAudioDevice) -> c_int;

    fn comms_local_audio_start() -> c_int;
    fn comms_local_audio_stop() -> c_int;
    fn comms_remote_audio_start(participant_id: *const c_char) -> c_int;
    fn comms_remote_audio_stop(participant_id: *const c_char) -> c_int;
    fn comms_remote_audio_mute(muted: bool, participant_id: *const c_char) -> c_int;

    fn comms_set_on_device_added(callback: DeviceCallback, user_data: *mut c_void) -> c_int;
    fn comms_set_on_device_removed(
        callback: DeviceRemovedCallback,
        user_data: *mut c_void,
    ) -> c_int;
    fn comms_set_on_device_changed(
        callback: DeviceChangedCallback,
        user_data: *mut c_void,
    ) -> c_int;
    fn comms_set_on_signaling_channel_error(
        callback: SignalingErrorCallback,
        user_data: *mut c_void,
    ) -> c_int;
    fn comms_set_on_invalid_token_error(
        callback: InvalidTokenCallback,
        user_data: *mut c_void,
    ) -> c_int;
}

/// Pair a raw return code with the engine's thread-local diagnostic.
fn status(code: c_int) -> Status {
    if code == 0 {
        return Status::ok();
    }
    // SAFETY: the engine returns null or a NUL-terminated string owned by the
    // calling thread, valid until the next engine call on that thread.
    let message = unsafe { comms_last_error_message() };
    let diagnostic = if message.is_null() {
        String::new()
    } else {
        // Diagnostics are for humans; a stray byte is not worth losing the text.
        unsafe { CStr::from_ptr(message) }
            .to_string_lossy()
            .into_owned()
    };
    if diagnostic.is_empty() {
        Status::from_code(code)
    } else {
        Status::failed(code, diagnostic)
    }
}

/// Lend an engine-allocated array to `visit`, then free it.
///
/// # Safety
/// `fetch` must write either null or a pointer to `count` initialized
/// elements allocated by the engine.
unsafe fn lend_array<T>(
    fetch: impl FnOnce(*mut c_int, *mut *mut T) -> c_int,
    visit: &mut dyn FnMut(RawArray<'_, T>),
) -> Status {
    let mut count: c_int = 0;
    let mut items: *mut T = std::ptr::null_mut();
    let result = status(fetch(&mut count as *mut c_int, &mut items as *mut *mut T));
    if result.is_ok() {
        visit(RawArray::from_raw_parts(count, items));
    }
    if !items.is_null() {
        comms_free_array(items.cast());
    }
    result
}

/// Engine backed by `libcomms_native`.
pub struct LinkedEngine {
    _private: (),
}

impl LinkedEngine {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Default for LinkedEngine {
    fn default() -> Self {
        Self::new()
    }
}

// Every function below forwards caller-owned, correctly laid out records to
// the engine; the engine does not retain pointers past the call except for
// callback user data.
impl NativeEngine for LinkedEngine {
    fn init(&self, app_key: &CStr) -> Status {
        status(unsafe { comms_init(app_key.as_ptr()) })
    }

    fn release(&self) -> Status {
        status(unsafe { comms_release() })
    }

    fn set_log_level(&self, level: i32) -> Status {
        status(unsafe { comms_set_log_level(level) })
    }

    fn session_open(&self, user: &NativeUserInfo, out: &mut NativeUserInfo) -> Status {
        status(unsafe { comms_session_open(user, out) })
    }

    fn session_close(&self) -> Status {
        status(unsafe { comms_session_close() })
    }

    fn conference_create(
        &self,
        options: &NativeConferenceOptions,
        out: &mut NativeConferenceInfos,
    ) -> Status {
        status(unsafe { comms_conference_create(options, out) })
    }

    fn conference_join(
        &self,
        conference: &NativeConferenceInfos,
        options: &NativeJoinOptions,
        out: &mut NativeConferenceInfos,
    ) -> Status {
        status(unsafe { comms_conference_join(conference, options, out) })
    }

    fn conference_listen(
        &self,
        conference: &NativeConferenceInfos,
        options: &NativeListenOptions,
        out: &mut NativeConferenceInfos,
    ) -> Status {
        status(unsafe { comms_conference_listen(conference, options, out) })
    }

    fn conference_leave(&self) -> Status {
        status(unsafe { comms_conference_leave() })
    }

    fn conference_participants(
        &self,
        visit: &mut dyn FnMut(RawArray<'_, NativeParticipant>),
    ) -> Status {
        unsafe {
            lend_array(
                |count, items| comms_conference_participants(count, items),
                visit,
            )
        }
    }

    fn audio_devices(&self, visit: &mut dyn FnMut(RawArray<'_, NativeAudioDevice>)) -> Status {
        unsafe { lend_array(|count, items| comms_audio_devices(count, items), visit) }
    }

    fn current_audio_input_device(&self, out: &mut NativeAudioDevice) -> Status {
        status(unsafe { comms_current_audio_input_device(out) })
    }

    fn current_audio_output_device(&self, out: &mut NativeAudioDevice) -> Status {
        status(unsafe { comms_current_audio_output_device(out) })
    }

    fn set_preferred_audio_input_device(&self, device: &NativeAudioDevice) -> Status {
        status(unsafe { comms_set_preferred_audio_input_device(device) })
    }

    fn set_preferred_audio_output_device(&self, device: &NativeAudioDevice) -> Status {
        status(unsafe { comms_set_preferred_audio_output_device(device) })
    }

    fn local_audio_start(&self) -> Status {
        status(unsafe { comms_local_audio_start() })
    }

    fn local_audio_stop(&self) -> Status {
        status(unsafe { comms_local_audio_stop() })
    }

    fn remote_audio_start(&self, participant_id: &CStr) -> Status {
        status(unsafe { comms_remote_audio_start(participant_id.as_ptr()) })
    }

    fn remote_audio_stop(&self, participant_id: &CStr) -> Status {
        status(unsafe { comms_remote_audio_stop(participant_id.as_ptr()) })
    }

    fn remote_audio_mute(&self, muted: bool, participant_id: &CStr) -> Status {
        status(unsafe { comms_remote_audio_mute(muted, participant_id.as_ptr()) })
    }

    fn set_on_device_added(&self, callback: DeviceCallback, user_data: UserData) -> Status {
        status(unsafe { comms_set_on_device_added(callback, user_data.as_ptr()) })
    }

    fn set_on_device_removed(
        &self,
        callback: DeviceRemovedCallback,
        user_data: UserData,
    ) -> Status {
        status(unsafe { comms_set_on_device_removed(callback, user_data.as_ptr()) })
    }

    fn set_on_device_changed(
        &self,
        callback: DeviceChangedCallback,
        user_data: UserData,
    ) -> Status {
        status(unsafe { comms_set_on_device_changed(callback, user_data.as_ptr()) })
    }

    fn set_on_signaling_channel_error(
        &self,
        callback: SignalingErrorCallback,
        user_data: UserData,
    ) -> Status {
        status(unsafe { comms_set_on_signaling_channel_error(callback, user_data.as_ptr()) })
    }

    fn set_on_invalid_token_error(
        &self,
        callback: InvalidTokenCallback,
        user_data: UserData,
    ) -> Status {
        status(unsafe { comms_set_on_invalid_token_error(callback, user_data.as_ptr()) })
    }
}
