use std::sync::Arc;

use bytemuck::Zeroable;

use crate::bridge::EventKind;
use crate::engine::SdkCore;
use crate::error::SdkError;
use crate::marshal::{copy_array, Marshal};
use crate::native::NativeAudioDevice;
use crate::types::AudioDevice;

/// Audio device enumeration, selection and hot-plug events.
pub struct MediaDeviceService {
    core: Arc<SdkCore>,
}

impl MediaDeviceService {
    pub(crate) fn new(core: Arc<SdkCore>) -> Self {
        Self { core }
    }

    /// All audio devices known to the engine, in engine order.
    pub async fn audio_devices(&self) -> Result<Vec<AudioDevice>, SdkError> {
        self.core
            .invoke("audio_devices", |engine| {
                let mut devices: Result<Vec<AudioDevice>, SdkError> = Ok(Vec::new());
                engine
                    .audio_devices(&mut |raw| devices = copy_array(raw))
                    .check("audio_devices")?;
                devices
            })
            .await
    }

    pub async fn current_audio_input_device(&self) -> Result<AudioDevice, SdkError> {
        self.core
            .invoke("current_audio_input_device", |engine| {
                let mut out = NativeAudioDevice::zeroed();
                engine
                    .current_audio_input_device(&mut out)
                    .check("current_audio_input_device")?;
                AudioDevice::from_native(&out)
            })
            .await
    }

    pub async fn current_audio_output_device(&self) -> Result<AudioDevice, SdkError> {
        self.core
            .invoke("current_audio_output_device", |engine| {
                let mut out = NativeAudioDevice::zeroed();
                engine
                    .current_audio_output_device(&mut out)
                    .check("current_audio_output_device")?;
                AudioDevice::from_native(&out)
            })
            .await
    }

    pub async fn set_preferred_audio_input_device(
        &self,
        device: &AudioDevice,
    ) -> Result<(), SdkError> {
        self.core
            .call(
                "set_preferred_audio_input_device",
                device.to_native(),
                |engine, native| {
                    engine
                        .set_preferred_audio_input_device(&native)
                        .check("set_preferred_audio_input_device")
                },
            )
            .await
    }

    pub async fn set_preferred_audio_output_device(
        &self,
        device: &AudioDevice,
    ) -> Result<(), SdkError> {
        self.core
            .call(
                "set_preferred_audio_output_device",
                device.to_native(),
                |engine, native| {
                    engine
                        .set_preferred_audio_output_device(&native)
                        .check("set_preferred_audio_output_device")
                },
            )
            .await
    }

    /// Replace the device-added handler.
    pub async fn set_added<F>(&self, handler: F) -> Result<(), SdkError>
    where
        F: Fn(AudioDevice) + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        self.core
            .register(EventKind::DeviceAdded, move |bridge, engine| {
                bridge.set_device_added(engine, handler)
            })
            .await
    }

    /// Replace the device-removed handler. The handler receives the device id.
    pub async fn set_removed<F>(&self, handler: F) -> Result<(), SdkError>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        self.core
            .register(EventKind::DeviceRemoved, move |bridge, engine| {
                bridge.set_device_removed(engine, handler)
            })
            .await
    }

    /// Replace the device-changed handler. The flag is set when no device is
    /// left in the changed role.
    pub async fn set_changed<F>(&self, handler: F) -> Result<(), SdkError>
    where
        F: Fn(AudioDevice, bool) + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        self.core
            .register(EventKind::DeviceChanged, move |bridge, engine| {
                bridge.set_device_changed(engine, handler)
            })
            .await
    }
}
