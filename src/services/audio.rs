use std::sync::Arc;

use crate::engine::SdkCore;
use crate::error::SdkError;
use crate::marshal::c_string;

/// Entry point for local and remote audio control.
pub struct AudioService {
    core: Arc<SdkCore>,
}

impl AudioService {
    pub(crate) fn new(core: Arc<SdkCore>) -> Self {
        Self { core }
    }

    pub fn local(&self) -> LocalAudioService {
        LocalAudioService {
            core: Arc::clone(&self.core),
        }
    }

    pub fn remote(&self) -> RemoteAudioService {
        RemoteAudioService {
            core: Arc::clone(&self.core),
        }
    }
}

/// Capture and send of the local participant's audio.
pub struct LocalAudioService {
    core: Arc<SdkCore>,
}

impl LocalAudioService {
    pub async fn start(&self) -> Result<(), SdkError> {
        self.core
            .invoke("local_audio_start", |engine| {
                engine.local_audio_start().check("local_audio_start")
            })
            .await
    }

    pub async fn stop(&self) -> Result<(), SdkError> {
        self.core
            .invoke("local_audio_stop", |engine| {
                engine.local_audio_stop().check("local_audio_stop")
            })
            .await
    }
}

/// Per-participant control of received audio.
pub struct RemoteAudioService {
    core: Arc<SdkCore>,
}

impl RemoteAudioService {
    /// Start receiving audio from `participant_id`.
    pub async fn start(&self, participant_id: &str) -> Result<(), SdkError> {
        self.core
            .call(
                "remote_audio_start",
                c_string(participant_id, "participant_id"),
                |engine, id| engine.remote_audio_start(&id).check("remote_audio_start"),
            )
            .await
    }

    /// Stop receiving audio from `participant_id`.
    pub async fn stop(&self, participant_id: &str) -> Result<(), SdkError> {
        self.core
            .call(
                "remote_audio_stop",
                c_string(participant_id, "participant_id"),
                |engine, id| engine.remote_audio_stop(&id).check("remote_audio_stop"),
            )
            .await
    }

    /// Mute or unmute `participant_id` locally. Other participants still hear
    /// them.
    pub async fn mute(&self, muted: bool, participant_id: &str) -> Result<(), SdkError> {
        self.core
            .call(
                "remote_audio_mute",
                c_string(participant_id, "participant_id"),
                move |engine, id| {
                    engine
                        .remote_audio_mute(muted, &id)
                        .check("remote_audio_mute")
                },
            )
            .await
    }
}
