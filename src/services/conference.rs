use std::sync::Arc;

use bytemuck::Zeroable;

use crate::engine::SdkCore;
use crate::error::SdkError;
use crate::marshal::{copy_array, Marshal};
use crate::native::NativeConferenceInfos;
use crate::types::{ConferenceInfos, ConferenceOptions, JoinOptions, ListenOptions, Participant};

/// Conference creation, joining and participant listing.
pub struct ConferenceService {
    core: Arc<SdkCore>,
}

impl ConferenceService {
    pub(crate) fn new(core: Arc<SdkCore>) -> Self {
        Self { core }
    }

    pub async fn create(&self, options: ConferenceOptions) -> Result<ConferenceInfos, SdkError> {
        self.core
            .call("conference_create", options.to_native(), |engine, native| {
                let mut out = NativeConferenceInfos::zeroed();
                engine
                    .conference_create(&native, &mut out)
                    .check("conference_create")?;
                ConferenceInfos::from_native(&out)
            })
            .await
    }

    /// Join `conference` as a user.
    pub async fn join(
        &self,
        conference: &ConferenceInfos,
        options: JoinOptions,
    ) -> Result<ConferenceInfos, SdkError> {
        let input = conference
            .to_native()
            .and_then(|conference| Ok((conference, options.to_native()?)));
        self.core
            .call("conference_join", input, |engine, (conference, options)| {
                let mut out = NativeConferenceInfos::zeroed();
                engine
                    .conference_join(&conference, &options, &mut out)
                    .check("conference_join")?;
                ConferenceInfos::from_native(&out)
            })
            .await
    }

    /// Join `conference` as a listener: receive only.
    pub async fn listen(
        &self,
        conference: &ConferenceInfos,
        options: ListenOptions,
    ) -> Result<ConferenceInfos, SdkError> {
        let input = conference
            .to_native()
            .and_then(|conference| Ok((conference, options.to_native()?)));
        self.core
            .call("conference_listen", input, |engine, (conference, options)| {
                let mut out = NativeConferenceInfos::zeroed();
                engine
                    .conference_listen(&conference, &options, &mut out)
                    .check("conference_listen")?;
                ConferenceInfos::from_native(&out)
            })
            .await
    }

    pub async fn leave(&self) -> Result<(), SdkError> {
        self.core
            .invoke("conference_leave", |engine| {
                engine.conference_leave().check("conference_leave")
            })
            .await
    }

    /// Participants of the current conference, local participant included.
    pub async fn participants(&self) -> Result<Vec<Participant>, SdkError> {
        self.core
            .invoke("conference_participants", |engine| {
                let mut participants: Result<Vec<Participant>, SdkError> = Ok(Vec::new());
                engine
                    .conference_participants(&mut |raw| participants = copy_array(raw))
                    .check("conference_participants")?;
                participants
            })
            .await
    }
}
