//! Managed value types exchanged with the SDK.
//!
//! These are plain owned values with no back-reference to the native engine.
//! Defaults documented on each type are the values used when a field is not
//! set explicitly.

mod conference;
mod device;
mod session;

pub use conference::{
    ConferenceAccessPermissions, ConferenceInfos, ConferenceOptions, ConferenceParams,
    ConferenceStatus, ConnectionOptions, JoinOptions, ListenOptions, MediaConstraints,
    SpatialAudioStyle,
};
pub use device::{AudioDevice, DeviceDirection};
pub use session::{Participant, ParticipantInfo, ParticipantStatus, ParticipantType, UserInfo};

use serde::{Deserialize, Serialize};

/// Native engine log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Off,
    Error,
    Warning,
    #[default]
    Info,
    Debug,
    Verbose,
}
