// extern "C" entry points handed to the engine.
//
// Nothing may unwind out of these functions. Marshalling failures and handler
// panics are logged and the event is dropped.

use std::ffi::{c_char, c_void};
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::SdkError;
use crate::marshal::{string_from_ptr, Marshal};
use crate::native::NativeAudioDevice;
use crate::types::AudioDevice;

use super::{current, EventKind, HandlerSlots};

fn deliver(kind: EventKind, dispatch: impl FnOnce() -> Result<(), SdkError>) {
    match catch_unwind(AssertUnwindSafe(dispatch)) {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            log::warn!("Dropped {} event: {}", kind, err);
        }
        Err(_) => {
            log::error!("{} handler panicked; event dropped", kind);
        }
    }
}

/// # Safety
/// `user_data` must be null or the pointer the bridge registered.
unsafe fn slots<'a>(user_data: *mut c_void) -> Result<&'a HandlerSlots, SdkError> {
    (user_data as *const HandlerSlots)
        .as_ref()
        .ok_or_else(|| SdkError::marshalling("callback delivered without user data"))
}

/// # Safety
/// `device` must be null or point to a record valid for the call.
unsafe fn read_device(device: *const NativeAudioDevice) -> Result<AudioDevice, SdkError> {
    let native = device
        .as_ref()
        .ok_or_else(|| SdkError::marshalling("callback delivered a null device record"))?;
    AudioDevice::from_native(native)
}

pub(super) unsafe extern "C" fn device_added(
    user_data: *mut c_void,
    device: *const NativeAudioDevice,
) {
    deliver(EventKind::DeviceAdded, || {
        let slots = slots(user_data)?;
        let Some(handler) = current(&slots.device_added, EventKind::DeviceAdded)? else {
            return Ok(());
        };
        handler(read_device(device)?);
        Ok(())
    });
}

pub(super) unsafe extern "C" fn device_removed(user_data: *mut c_void, device_id: *const c_char) {
    deliver(EventKind::DeviceRemoved, || {
        let slots = slots(user_data)?;
        let Some(handler) = current(&slots.device_removed, EventKind::DeviceRemoved)? else {
            return Ok(());
        };
        handler(string_from_ptr(device_id)?);
        Ok(())
    });
}

pub(super) unsafe extern "C" fn device_changed(
    user_data: *mut c_void,
    device: *const NativeAudioDevice,
    no_device: u8,
) {
    deliver(EventKind::DeviceChanged, || {
        let slots = slots(user_data)?;
        let Some(handler) = current(&slots.device_changed, EventKind::DeviceChanged)? else {
            return Ok(());
        };
        handler(read_device(device)?, bool::from_native(&no_device)?);
        Ok(())
    });
}

pub(super) unsafe extern "C" fn signaling_error(user_data: *mut c_void, message: *const c_char) {
    deliver(EventKind::SignalingChannelError, || {
        let slots = slots(user_data)?;
        let Some(handler) = current(&slots.signaling_error, EventKind::SignalingChannelError)?
        else {
            return Ok(());
        };
        handler(string_from_ptr(message)?);
        Ok(())
    });
}

pub(super) unsafe extern "C" fn invalid_token(
    user_data: *mut c_void,
    reason: *const c_char,
    description: *const c_char,
) {
    deliver(EventKind::InvalidTokenError, || {
        let slots = slots(user_data)?;
        let Some(handler) = current(&slots.invalid_token, EventKind::InvalidTokenError)? else {
            return Ok(());
        };
        handler(string_from_ptr(reason)?, string_from_ptr(description)?);
        Ok(())
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_user_data_is_ignored() {
        unsafe {
            device_removed(std::ptr::null_mut(), std::ptr::null());
            invalid_token(std::ptr::null_mut(), std::ptr::null(), std::ptr::null());
        }
    }

    #[test]
    fn test_null_device_record_is_dropped() {
        let slots = HandlerSlots::default();
        let user_data = &slots as *const HandlerSlots as *mut c_void;
        unsafe { device_added(user_data, std::ptr::null()) };
    }
}
