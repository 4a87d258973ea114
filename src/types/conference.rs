use serde::{Deserialize, Serialize};

/// Spatial audio rendering style for a conference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialAudioStyle {
    #[default]
    Disabled,
    Individual,
    Shared,
}

/// Conference lifecycle status reported by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConferenceStatus {
    #[default]
    Creating,
    Created,
    Joining,
    Joined,
    Leaving,
    Left,
    Destroyed,
    Error,
}

/// Permissions granted to the local participant in a conference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConferenceAccessPermissions {
    Invite,
    Join,
    Kick,
    Record,
    Stream,
    SendMessage,
    SendAudio,
    SendVideo,
    ShareScreen,
    ShareVideo,
    ShareFile,
    UpdatePermissions,
}

/// Conference creation parameters.
///
/// Defaults: Dolby Voice on, statistics off, spatial audio disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConferenceParams {
    pub dolby_voice: bool,
    pub stats: bool,
    pub spatial_audio_style: SpatialAudioStyle,
}

impl Default for ConferenceParams {
    fn default() -> Self {
        Self {
            dolby_voice: true,
            stats: false,
            spatial_audio_style: SpatialAudioStyle::Disabled,
        }
    }
}

/// Options for creating a conference. Default alias is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConferenceOptions {
    pub alias: String,
    pub params: ConferenceParams,
}

/// Conference description returned by create/join/listen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConferenceInfos {
    pub id: String,
    pub alias: String,
    pub is_new: bool,
    pub status: ConferenceStatus,
    pub permissions: Vec<ConferenceAccessPermissions>,
}

/// Connection options shared by join and listen.
///
/// Defaults: empty access token, spatial audio off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionOptions {
    pub conference_access_token: String,
    pub spatial_audio: bool,
}

/// Media constraints applied when joining.
///
/// Defaults: audio on, video off, audio processing off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
    pub audio_processing: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            audio: true,
            video: false,
            audio_processing: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinOptions {
    pub connection: ConnectionOptions,
    pub constraints: MediaConstraints,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenOptions {
    pub connection: ConnectionOptions,
}
