use std::sync::Arc;

use bytemuck::Zeroable;

use crate::engine::SdkCore;
use crate::error::SdkError;
use crate::marshal::Marshal;
use crate::native::NativeUserInfo;
use crate::types::UserInfo;

/// Session management: connects the local user to the backend.
pub struct SessionService {
    core: Arc<SdkCore>,
}

impl SessionService {
    pub(crate) fn new(core: Arc<SdkCore>) -> Self {
        Self { core }
    }

    /// Open a session for `user`. The returned info carries the participant
    /// id the engine assigned.
    pub async fn open(&self, user: UserInfo) -> Result<UserInfo, SdkError> {
        self.core
            .call("session_open", user.to_native(), |engine, native| {
                let mut out = NativeUserInfo::zeroed();
                engine.session_open(&native, &mut out).check("session_open")?;
                UserInfo::from_native(&out)
            })
            .await
    }

    pub async fn close(&self) -> Result<(), SdkError> {
        self.core
            .invoke("session_close", |engine| {
                engine.session_close().check("session_close")
            })
            .await
    }
}
