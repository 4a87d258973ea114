use serde::{Deserialize, Serialize};

/// Direction of an audio device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceDirection {
    /// Capture device (microphone)
    Input,
    /// Playback device (speaker)
    Output,
    /// Device exposing both directions (headset)
    InputAndOutput,
}

impl DeviceDirection {
    pub fn is_input(self) -> bool {
        matches!(self, DeviceDirection::Input | DeviceDirection::InputAndOutput)
    }

    pub fn is_output(self) -> bool {
        matches!(self, DeviceDirection::Output | DeviceDirection::InputAndOutput)
    }
}

/// Audio device known to the native engine.
///
/// Devices are selected by `id`; `name` is for display only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioDevice {
    pub id: String,
    pub name: String,
    pub direction: DeviceDirection,
}

impl AudioDevice {
    pub fn new(id: impl Into<String>, name: impl Into<String>, direction: DeviceDirection) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            direction,
        }
    }
}
