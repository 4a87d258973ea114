// Record marshalling. Fields are copied in native declaration order.

use crate::error::SdkError;
use crate::native::records::MAX_PERMISSIONS;
use crate::native::{
    NativeAudioDevice, NativeConferenceInfos, NativeConferenceOptions, NativeConferenceParams,
    NativeConnectionOptions, NativeJoinOptions, NativeListenOptions, NativeMediaConstraints,
    NativeParticipant, NativeParticipantInfo, NativeUserInfo, RawArray,
};
use crate::types::{
    AudioDevice, ConferenceAccessPermissions, ConferenceInfos, ConferenceOptions,
    ConferenceParams, ConferenceStatus, ConnectionOptions, DeviceDirection, JoinOptions,
    ListenOptions, MediaConstraints, Participant, ParticipantInfo, ParticipantStatus,
    ParticipantType, SpatialAudioStyle, UserInfo,
};

use super::{copy_array, fill_array, Marshal, NativeStr};

// Engine-written flag bytes are checked rather than read as `bool`.
impl Marshal for bool {
    type Native = u8;

    fn to_native(&self) -> Result<u8, SdkError> {
        Ok(u8::from(*self))
    }

    fn from_native(native: &u8) -> Result<Self, SdkError> {
        match *native {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(SdkError::marshalling(format!(
                "native flag has invalid value {}",
                other
            ))),
        }
    }
}

impl Marshal for AudioDevice {
    type Native = NativeAudioDevice;

    fn to_native(&self) -> Result<NativeAudioDevice, SdkError> {
        Ok(NativeAudioDevice {
            id: NativeStr::encode(&self.id)?,
            name: NativeStr::encode(&self.name)?,
            direction: self.direction.to_native()?,
        })
    }

    fn from_native(native: &NativeAudioDevice) -> Result<Self, SdkError> {
        Ok(Self {
            id: native.id.decode()?,
            name: native.name.decode()?,
            direction: DeviceDirection::from_native(&native.direction)?,
        })
    }
}

impl Marshal for ConferenceParams {
    type Native = NativeConferenceParams;

    fn to_native(&self) -> Result<NativeConferenceParams, SdkError> {
        Ok(NativeConferenceParams {
            dolby_voice: self.dolby_voice.to_native()?,
            stats: self.stats.to_native()?,
            spatial_audio_style: self.spatial_audio_style.to_native()?,
        })
    }

    fn from_native(native: &NativeConferenceParams) -> Result<Self, SdkError> {
        Ok(Self {
            dolby_voice: bool::from_native(&native.dolby_voice)?,
            stats: bool::from_native(&native.stats)?,
            spatial_audio_style: SpatialAudioStyle::from_native(&native.spatial_audio_style)?,
        })
    }
}

impl Marshal for ConferenceOptions {
    type Native = NativeConferenceOptions;

    fn to_native(&self) -> Result<NativeConferenceOptions, SdkError> {
        Ok(NativeConferenceOptions {
            alias: NativeStr::encode(&self.alias)?,
            params: self.params.to_native()?,
        })
    }

    fn from_native(native: &NativeConferenceOptions) -> Result<Self, SdkError> {
        Ok(Self {
            alias: native.alias.decode()?,
            params: ConferenceParams::from_native(&native.params)?,
        })
    }
}

impl Marshal for ConferenceInfos {
    type Native = NativeConferenceInfos;

    fn to_native(&self) -> Result<NativeConferenceInfos, SdkError> {
        let (permissions, permissions_count) =
            fill_array::<_, MAX_PERMISSIONS>(&self.permissions)?;
        Ok(NativeConferenceInfos {
            id: NativeStr::encode(&self.id)?,
            alias: NativeStr::encode(&self.alias)?,
            is_new: self.is_new.to_native()?,
            status: self.status.to_native()?,
            permissions,
            permissions_count,
        })
    }

    fn from_native(native: &NativeConferenceInfos) -> Result<Self, SdkError> {
        Ok(Self {
            id: native.id.decode()?,
            alias: native.alias.decode()?,
            is_new: bool::from_native(&native.is_new)?,
            status: ConferenceStatus::from_native(&native.status)?,
            permissions: copy_array::<ConferenceAccessPermissions>(RawArray::new(
                native.permissions_count,
                &native.permissions,
            ))?,
        })
    }
}

impl Marshal for ConnectionOptions {
    type Native = NativeConnectionOptions;

    fn to_native(&self) -> Result<NativeConnectionOptions, SdkError> {
        Ok(NativeConnectionOptions {
            conference_access_token: NativeStr::encode(&self.conference_access_token)?,
            spatial_audio: self.spatial_audio.to_native()?,
        })
    }

    fn from_native(native: &NativeConnectionOptions) -> Result<Self, SdkError> {
        Ok(Self {
            conference_access_token: native.conference_access_token.decode()?,
            spatial_audio: bool::from_native(&native.spatial_audio)?,
        })
    }
}

impl Marshal for MediaConstraints {
    type Native = NativeMediaConstraints;

    fn to_native(&self) -> Result<NativeMediaConstraints, SdkError> {
        Ok(NativeMediaConstraints {
            audio: self.audio.to_native()?,
            video: self.video.to_native()?,
            audio_processing: self.audio_processing.to_native()?,
        })
    }

    fn from_native(native: &NativeMediaConstraints) -> Result<Self, SdkError> {
        Ok(Self {
            audio: bool::from_native(&native.audio)?,
            video: bool::from_native(&native.video)?,
            audio_processing: bool::from_native(&native.audio_processing)?,
        })
    }
}

impl Marshal for JoinOptions {
    type Native = NativeJoinOptions;

    fn to_native(&self) -> Result<NativeJoinOptions, SdkError> {
        Ok(NativeJoinOptions {
            connection: self.connection.to_native()?,
            constraints: self.constraints.to_native()?,
        })
    }

    fn from_native(native: &NativeJoinOptions) -> Result<Self, SdkError> {
        Ok(Self {
            connection: ConnectionOptions::from_native(&native.connection)?,
            constraints: MediaConstraints::from_native(&native.constraints)?,
        })
    }
}

impl Marshal for ListenOptions {
    type Native = NativeListenOptions;

    fn to_native(&self) -> Result<NativeListenOptions, SdkError> {
        Ok(NativeListenOptions {
            connection: self.connection.to_native()?,
        })
    }

    fn from_native(native: &NativeListenOptions) -> Result<Self, SdkError> {
        Ok(Self {
            connection: ConnectionOptions::from_native(&native.connection)?,
        })
    }
}

impl Marshal for ParticipantInfo {
    type Native = NativeParticipantInfo;

    fn to_native(&self) -> Result<NativeParticipantInfo, SdkError> {
        Ok(NativeParticipantInfo {
            name: NativeStr::encode(&self.name)?,
            external_id: NativeStr::encode(&self.external_id)?,
            avatar_url: NativeStr::encode(&self.avatar_url)?,
        })
    }

    fn from_native(native: &NativeParticipantInfo) -> Result<Self, SdkError> {
        Ok(Self {
            name: native.name.decode()?,
            external_id: native.external_id.decode()?,
            avatar_url: native.avatar_url.decode()?,
        })
    }
}

impl Marshal for Participant {
    type Native = NativeParticipant;

    fn to_native(&self) -> Result<NativeParticipant, SdkError> {
        Ok(NativeParticipant {
            id: NativeStr::encode(&self.id)?,
            info: self.info.to_native()?,
            participant_type: self.participant_type.to_native()?,
            status: self.status.to_native()?,
            is_sending_audio: self.is_sending_audio.to_native()?,
            is_audible_locally: self.is_audible_locally.to_native()?,
        })
    }

    fn from_native(native: &NativeParticipant) -> Result<Self, SdkError> {
        Ok(Self {
            id: native.id.decode()?,
            info: ParticipantInfo::from_native(&native.info)?,
            participant_type: ParticipantType::from_native(&native.participant_type)?,
            status: ParticipantStatus::from_native(&native.status)?,
            is_sending_audio: bool::from_native(&native.is_sending_audio)?,
            is_audible_locally: bool::from_native(&native.is_audible_locally)?,
        })
    }
}

impl Marshal for UserInfo {
    type Native = NativeUserInfo;

    fn to_native(&self) -> Result<NativeUserInfo, SdkError> {
        Ok(NativeUserInfo {
            participant_id: NativeStr::encode(&self.participant_id)?,
            name: NativeStr::encode(&self.name)?,
            external_id: NativeStr::encode(&self.external_id)?,
            avatar_url: NativeStr::encode(&self.avatar_url)?,
        })
    }

    fn from_native(native: &NativeUserInfo) -> Result<Self, SdkError> {
        Ok(Self {
            participant_id: native.participant_id.decode()?,
            name: native.name.decode()?,
            external_id: native.external_id.decode()?,
            avatar_url: native.avatar_url.decode()?,
        })
    }
}
