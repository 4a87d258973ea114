//! Native callback to managed handler bridge.
//!
//! The engine keeps one function pointer plus one user-data pointer per event
//! kind and may invoke it from any of its threads. The bridge registers a
//! fixed `extern "C"` trampoline for each kind; the user data points at the
//! bridge's [`HandlerSlots`], and the trampoline looks up whatever handler is
//! currently installed in the matching slot.
//!
//! Handlers run synchronously on the delivering thread. There is no queue and
//! no serialization between deliveries, so a handler must be `Send + Sync`
//! and cope with concurrent calls.

mod trampolines;

use std::ffi::c_void;
use std::fmt;
use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::error::SdkError;
use crate::native::{NativeEngine, UserData};
use crate::types::AudioDevice;

pub type DeviceAddedHandler = Arc<dyn Fn(AudioDevice) + Send + Sync>;
/// Receives the id of the removed device.
pub type DeviceRemovedHandler = Arc<dyn Fn(String) + Send + Sync>;
/// Receives the new device and whether no device is left in that role.
pub type DeviceChangedHandler = Arc<dyn Fn(AudioDevice, bool) + Send + Sync>;
pub type SignalingErrorHandler = Arc<dyn Fn(String) + Send + Sync>;
/// Receives the reason and the description of the token failure.
pub type InvalidTokenHandler = Arc<dyn Fn(String, String) + Send + Sync>;

/// Event kinds the engine can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    DeviceAdded,
    DeviceRemoved,
    DeviceChanged,
    SignalingChannelError,
    InvalidTokenError,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::DeviceAdded => "device_added",
            EventKind::DeviceRemoved => "device_removed",
            EventKind::DeviceChanged => "device_changed",
            EventKind::SignalingChannelError => "signaling_channel_error",
            EventKind::InvalidTokenError => "invalid_token_error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One slot per event kind, each holding at most one handler.
#[derive(Default)]
pub(crate) struct HandlerSlots {
    device_added: RwLock<Option<DeviceAddedHandler>>,
    device_removed: RwLock<Option<DeviceRemovedHandler>>,
    device_changed: RwLock<Option<DeviceChangedHandler>>,
    signaling_error: RwLock<Option<SignalingErrorHandler>>,
    invalid_token: RwLock<Option<InvalidTokenHandler>>,
}

/// Swap a slot's handler in one write. Readers see either the old or the
/// new handler, never an empty slot in between.
fn install<H>(slot: &RwLock<Option<H>>, handler: H, kind: EventKind) -> Result<(), SdkError> {
    let mut guard = slot
        .write()
        .map_err(|_| SdkError::poisoned(kind.as_str()))?;
    *guard = Some(handler);
    Ok(())
}

/// Clone the current handler out of a slot so it can run without the lock.
fn current<H: Clone>(slot: &RwLock<Option<H>>, kind: EventKind) -> Result<Option<H>, SdkError> {
    slot.read()
        .map(|guard| guard.clone())
        .map_err(|_| SdkError::poisoned(kind.as_str()))
}

fn empty<H>(slot: &RwLock<Option<H>>) {
    match slot.write() {
        Ok(mut guard) => *guard = None,
        Err(poisoned) => *poisoned.into_inner() = None,
    }
}

impl HandlerSlots {
    fn clear(&self) {
        empty(&self.device_added);
        empty(&self.device_removed);
        empty(&self.device_changed);
        empty(&self.signaling_error);
        empty(&self.invalid_token);
    }

    fn is_set(&self, kind: EventKind) -> bool {
        fn occupied<H>(slot: &RwLock<Option<H>>) -> bool {
            slot.read().map(|guard| guard.is_some()).unwrap_or(false)
        }
        match kind {
            EventKind::DeviceAdded => occupied(&self.device_added),
            EventKind::DeviceRemoved => occupied(&self.device_removed),
            EventKind::DeviceChanged => occupied(&self.device_changed),
            EventKind::SignalingChannelError => occupied(&self.signaling_error),
            EventKind::InvalidTokenError => occupied(&self.invalid_token),
        }
    }
}

/// Owns the handler slots and registers trampolines with the engine.
///
/// The slots' address is handed to the engine as user data, so the bridge
/// must outlive every registration; the lifecycle guard releases the engine
/// (which drops registrations) before the bridge is dropped. Clones share
/// the same slots.
#[derive(Clone)]
pub struct CallbackBridge {
    slots: Arc<HandlerSlots>,
}

impl CallbackBridge {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(HandlerSlots::default()),
        }
    }

    fn user_data(&self) -> UserData {
        UserData::new(Arc::as_ptr(&self.slots) as *mut c_void)
    }

    // Each setter registers the trampoline first and only swaps the slot once
    // the engine accepted it, so a failed registration leaves the previous
    // handler active.

    pub fn set_device_added(
        &self,
        engine: &dyn NativeEngine,
        handler: DeviceAddedHandler,
    ) -> Result<(), SdkError> {
        engine
            .set_on_device_added(trampolines::device_added, self.user_data())
            .check("set_on_device_added")?;
        install(&self.slots.device_added, handler, EventKind::DeviceAdded)
    }

    pub fn set_device_removed(
        &self,
        engine: &dyn NativeEngine,
        handler: DeviceRemovedHandler,
    ) -> Result<(), SdkError> {
        engine
            .set_on_device_removed(trampolines::device_removed, self.user_data())
            .check("set_on_device_removed")?;
        install(&self.slots.device_removed, handler, EventKind::DeviceRemoved)
    }

    pub fn set_device_changed(
        &self,
        engine: &dyn NativeEngine,
        handler: DeviceChangedHandler,
    ) -> Result<(), SdkError> {
        engine
            .set_on_device_changed(trampolines::device_changed, self.user_data())
            .check("set_on_device_changed")?;
        install(&self.slots.device_changed, handler, EventKind::DeviceChanged)
    }

    pub fn set_signaling_error(
        &self,
        engine: &dyn NativeEngine,
        handler: SignalingErrorHandler,
    ) -> Result<(), SdkError> {
        engine
            .set_on_signaling_channel_error(trampolines::signaling_error, self.user_data())
            .check("set_on_signaling_channel_error")?;
        install(
            &self.slots.signaling_error,
            handler,
            EventKind::SignalingChannelError,
        )
    }

    pub fn set_invalid_token(
        &self,
        engine: &dyn NativeEngine,
        handler: InvalidTokenHandler,
    ) -> Result<(), SdkError> {
        engine
            .set_on_invalid_token_error(trampolines::invalid_token, self.user_data())
            .check("set_on_invalid_token_error")?;
        install(
            &self.slots.invalid_token,
            handler,
            EventKind::InvalidTokenError,
        )
    }

    /// Drop every handler. Called once the engine has been released.
    pub fn clear(&self) {
        self.slots.clear();
    }

    pub fn is_registered(&self, kind: EventKind) -> bool {
        self.slots.is_set(kind)
    }
}

impl Default for CallbackBridge {
    fn default() -> Self {
        Self::new()
    }
}
