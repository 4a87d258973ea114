use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantType {
    #[default]
    User,
    Listener,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    #[default]
    Reserved,
    Connecting,
    OnAir,
    Decline,
    Inactive,
    Left,
    Warning,
    Error,
    Kicked,
}

/// Public details of a participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticipantInfo {
    pub name: String,
    pub external_id: String,
    pub avatar_url: String,
}

/// Conference participant as reported by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Participant {
    pub id: String,
    pub participant_type: ParticipantType,
    pub status: ParticipantStatus,
    pub info: ParticipantInfo,
    pub is_sending_audio: bool,
    pub is_audible_locally: bool,
}

/// Local user opening a session.
///
/// `participant_id` is empty on input and assigned by the engine on open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    pub participant_id: String,
    pub name: String,
    pub external_id: String,
    pub avatar_url: String,
}

impl UserInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
