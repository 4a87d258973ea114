use std::collections::{HashMap, HashSet};
use std::ffi::{CStr, CString};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::marshal::Marshal;
use crate::types::{
    AudioDevice, ConferenceAccessPermissions, ConferenceInfos, ConferenceOptions,
    ConferenceStatus, JoinOptions, ListenOptions, Participant, ParticipantStatus,
    ParticipantType, UserInfo,
};

use super::{
    codes, DeviceCallback, DeviceChangedCallback, DeviceRemovedCallback, InvalidTokenCallback,
    NativeAudioDevice, NativeConferenceInfos, NativeConferenceOptions, NativeEngine,
    NativeJoinOptions, NativeListenOptions, NativeParticipant, NativeUserInfo, RawArray,
    SignalingErrorCallback, Status, UserData,
};

#[derive(Default)]
struct Registrations {
    device_added: Option<(DeviceCallback, UserData)>,
    device_removed: Option<(DeviceRemovedCallback, UserData)>,
    device_changed: Option<(DeviceChangedCallback, UserData)>,
    signaling_error: Option<(SignalingErrorCallback, UserData)>,
    invalid_token: Option<(InvalidTokenCallback, UserData)>,
}

#[derive(Default)]
struct StubState {
    initialized: bool,
    log_level: Option<i32>,
    latency: Duration,
    failures: HashMap<&'static str, Status>,
    release_calls: usize,
    reported_device_count: Option<i32>,

    devices: Vec<AudioDevice>,
    current_input: Option<String>,
    current_output: Option<String>,

    session: Option<UserInfo>,
    next_participant: u32,
    conferences: HashMap<String, ConferenceInfos>,
    next_conference: u32,
    active_conference: Option<String>,
    local_participant: Option<Participant>,
    remote_participants: Vec<Participant>,
    local_audio: bool,
    remote_receiving: HashSet<String>,
    remote_muted: HashSet<String>,

    callbacks: Registrations,
}

impl StubState {
    fn require_session(&self) -> Result<&UserInfo, Status> {
        self.session
            .as_ref()
            .ok_or_else(|| Status::failed(codes::INVALID_STATE, "no open session"))
    }

    fn require_conference(&self) -> Result<&str, Status> {
        self.active_conference
            .as_deref()
            .ok_or_else(|| Status::failed(codes::INVALID_STATE, "not in a conference"))
    }

    fn require_remote(&self, participant_id: &CStr) -> Result<String, Status> {
        self.require_conference()?;
        let id = participant_id.to_string_lossy().into_owned();
        if self.remote_participants.iter().any(|p| p.id == id) {
            Ok(id)
        } else {
            Err(Status::failed(
                codes::NOT_FOUND,
                format!("participant {} is not in the conference", id),
            ))
        }
    }

    fn find_device(&self, native: &NativeAudioDevice) -> Result<AudioDevice, Status> {
        let wanted = decode::<AudioDevice>(native)?;
        self.devices
            .iter()
            .find(|device| device.id == wanted.id)
            .cloned()
            .ok_or_else(|| Status::failed(codes::NOT_FOUND, format!("unknown device {}", wanted.id)))
    }

    fn current_device(&self, id: Option<&String>, out: &mut NativeAudioDevice) -> Result<(), Status> {
        let device = id
            .and_then(|id| self.devices.iter().find(|device| &device.id == id))
            .ok_or_else(|| Status::failed(codes::NOT_FOUND, "no device selected"))?;
        *out = encode(device)?;
        Ok(())
    }

    fn enter_conference(
        &mut self,
        conference: &NativeConferenceInfos,
        participant_type: ParticipantType,
        sending_audio: bool,
        out: &mut NativeConferenceInfos,
    ) -> Result<(), Status> {
        let user = self.require_session()?.clone();
        if self.active_conference.is_some() {
            return Err(Status::failed(codes::INVALID_STATE, "already in a conference"));
        }
        let wanted = decode::<ConferenceInfos>(conference)?;
        let infos = self.conferences.get_mut(&wanted.id).ok_or_else(|| {
            Status::failed(codes::NOT_FOUND, format!("unknown conference {}", wanted.id))
        })?;

        infos.status = ConferenceStatus::Joined;
        infos.is_new = false;
        *out = encode(&*infos)?;

        self.active_conference = Some(wanted.id);
        self.local_participant = Some(Participant {
            id: user.participant_id.clone(),
            participant_type,
            status: ParticipantStatus::OnAir,
            info: crate::types::ParticipantInfo {
                name: user.name,
                external_id: user.external_id,
                avatar_url: user.avatar_url,
            },
            is_sending_audio: sending_audio,
            is_audible_locally: false,
        });
        Ok(())
    }

    fn leave_conference(&mut self) {
        self.active_conference = None;
        self.local_participant = None;
        self.local_audio = false;
        self.remote_receiving.clear();
        self.remote_muted.clear();
    }
}

fn encode<M: Marshal>(value: &M) -> Result<M::Native, Status> {
    value
        .to_native()
        .map_err(|err| Status::failed(codes::GENERIC, err.to_string()))
}

fn decode<M: Marshal>(native: &M::Native) -> Result<M, Status> {
    M::from_native(native).map_err(|err| Status::failed(codes::INVALID_ARGUMENT, err.to_string()))
}

/// In-process engine used for deterministic tests and CLI tooling.
///
/// Simulates the native lifecycle, a device table and a single
/// session/conference without any real media. Failures can be injected per
/// operation with [`StubEngine::fail_next`], and the `simulate_*` helpers
/// deliver events through whatever trampolines are registered, from the
/// calling thread, the way a native engine would.
pub struct StubEngine {
    state: Mutex<StubState>,
}

impl StubEngine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StubState::default()),
        }
    }

    /// Stub seeded with a device table. The first input-capable and the
    /// first output-capable device become the current devices.
    pub fn with_devices(devices: Vec<AudioDevice>) -> Self {
        let stub = Self::new();
        {
            let mut state = stub.lock();
            state.current_input = devices
                .iter()
                .find(|device| device.direction.is_input())
                .map(|device| device.id.clone());
            state.current_output = devices
                .iter()
                .find(|device| device.direction.is_output())
                .map(|device| device.id.clone());
            state.devices = devices;
        }
        stub
    }

    fn lock(&self) -> MutexGuard<'_, StubState> {
        // A panicking test thread must not wedge every later call.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next call to `operation` return `code` with `diagnostic`.
    ///
    /// Operation names are the [`NativeEngine`] method names.
    pub fn fail_next(&self, operation: &'static str, code: i32, diagnostic: &str) {
        self.lock()
            .failures
            .insert(operation, Status::failed(code, diagnostic));
    }

    /// Block every subsequent call for `latency` before it runs.
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = latency;
    }

    /// Report `count` from `audio_devices` regardless of the real table size.
    pub fn report_device_count(&self, count: Option<i32>) {
        self.lock().reported_device_count = count;
    }

    pub fn release_calls(&self) -> usize {
        self.lock().release_calls
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    pub fn log_level(&self) -> Option<i32> {
        self.lock().log_level
    }

    pub fn current_input_id(&self) -> Option<String> {
        self.lock().current_input.clone()
    }

    pub fn current_output_id(&self) -> Option<String> {
        self.lock().current_output.clone()
    }

    pub fn local_audio_active(&self) -> bool {
        self.lock().local_audio
    }

    pub fn is_receiving_from(&self, participant_id: &str) -> bool {
        self.lock().remote_receiving.contains(participant_id)
    }

    pub fn is_muted(&self, participant_id: &str) -> bool {
        self.lock().remote_muted.contains(participant_id)
    }

    /// Add a remote participant to whatever conference is joined.
    pub fn add_remote_participant(&self, participant: Participant) {
        self.lock().remote_participants.push(participant);
    }

    /// Add a device to the table and announce it.
    pub fn plug_device(&self, device: AudioDevice) -> bool {
        self.lock().devices.push(device.clone());
        self.simulate_device_added(&device)
    }

    /// Remove a device from the table and announce it.
    pub fn unplug_device(&self, device_id: &str) -> bool {
        {
            let mut state = self.lock();
            state.devices.retain(|device| device.id != device_id);
            if state.current_input.as_deref() == Some(device_id) {
                state.current_input = None;
            }
            if state.current_output.as_deref() == Some(device_id) {
                state.current_output = None;
            }
        }
        self.simulate_device_removed(device_id)
    }

    /// Deliver a device-added event. Returns whether a callback was registered.
    pub fn simulate_device_added(&self, device: &AudioDevice) -> bool {
        let Some((callback, user_data)) = self.lock().callbacks.device_added else {
            return false;
        };
        let Ok(native) = device.to_native() else {
            log::warn!("stub cannot encode device {}", device.id);
            return false;
        };
        // SAFETY: the callback and user data were registered together.
        unsafe { callback(user_data.as_ptr(), &native) };
        true
    }

    pub fn simulate_device_removed(&self, device_id: &str) -> bool {
        let Some((callback, user_data)) = self.lock().callbacks.device_removed else {
            return false;
        };
        let Ok(id) = CString::new(device_id) else {
            return false;
        };
        // SAFETY: the callback and user data were registered together.
        unsafe { callback(user_data.as_ptr(), id.as_ptr()) };
        true
    }

    pub fn simulate_device_changed(&self, device: &AudioDevice, no_device: bool) -> bool {
        let Some((callback, user_data)) = self.lock().callbacks.device_changed else {
            return false;
        };
        let Ok(native) = device.to_native() else {
            log::warn!("stub cannot encode device {}", device.id);
            return false;
        };
        // SAFETY: the callback and user data were registered together.
        unsafe { callback(user_data.as_ptr(), &native, u8::from(no_device)) };
        true
    }

    /// Deliver a raw device record, bypassing encoding. Used to feed
    /// malformed native data to the bridge.
    pub fn simulate_raw_device_added(&self, native: &NativeAudioDevice) -> bool {
        let Some((callback, user_data)) = self.lock().callbacks.device_added else {
            return false;
        };
        // SAFETY: the callback and user data were registered together.
        unsafe { callback(user_data.as_ptr(), native) };
        true
    }

    pub fn simulate_signaling_error(&self, message: &str) -> bool {
        let Some((callback, user_data)) = self.lock().callbacks.signaling_error else {
            return false;
        };
        let Ok(message) = CString::new(message) else {
            return false;
        };
        // SAFETY: the callback and user data were registered together.
        unsafe { callback(user_data.as_ptr(), message.as_ptr()) };
        true
    }

    pub fn simulate_invalid_token(&self, reason: &str, description: &str) -> bool {
        let Some((callback, user_data)) = self.lock().callbacks.invalid_token else {
            return false;
        };
        let (Ok(reason), Ok(description)) = (CString::new(reason), CString::new(description))
        else {
            return false;
        };
        // SAFETY: the callback and user data were registered together.
        unsafe { callback(user_data.as_ptr(), reason.as_ptr(), description.as_ptr()) };
        true
    }

    fn pause(&self) {
        let latency = self.lock().latency;
        if !latency.is_zero() {
            std::thread::sleep(latency);
        }
    }

    /// Common prologue for every call that needs an initialized engine.
    fn call(
        &self,
        operation: &'static str,
        body: impl FnOnce(&mut StubState) -> Result<(), Status>,
    ) -> Status {
        self.pause();
        let mut state = self.lock();
        if let Some(status) = state.failures.remove(operation) {
            return status;
        }
        if !state.initialized {
            return Status::failed(
                codes::NOT_INITIALIZED,
                format!("{} called before init", operation),
            );
        }
        match body(&mut state) {
            Ok(()) => Status::ok(),
            Err(status) => status,
        }
    }
}

impl Default for StubEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeEngine for StubEngine {
    fn init(&self, app_key: &CStr) -> Status {
        self.pause();
        let mut state = self.lock();
        if let Some(status) = state.failures.remove("init") {
            return status;
        }
        if app_key.to_bytes().is_empty() {
            return Status::failed(codes::INVALID_ARGUMENT, "app key is empty");
        }
        if state.initialized {
            return Status::failed(codes::INVALID_STATE, "engine already initialized");
        }
        state.initialized = true;
        Status::ok()
    }

    fn release(&self) -> Status {
        self.pause();
        let mut state = self.lock();
        state.release_calls += 1;
        let was_initialized = std::mem::replace(&mut state.initialized, false);
        state.callbacks = Registrations::default();
        state.session = None;
        state.conferences.clear();
        state.leave_conference();

        if let Some(status) = state.failures.remove("release") {
            return status;
        }
        if !was_initialized {
            return Status::failed(codes::NOT_INITIALIZED, "release called before init");
        }
        Status::ok()
    }

    fn set_log_level(&self, level: i32) -> Status {
        self.call("set_log_level", |state| {
            if !(0..=5).contains(&level) {
                return Err(Status::failed(
                    codes::INVALID_ARGUMENT,
                    format!("log level {} out of range", level),
                ));
            }
            state.log_level = Some(level);
            Ok(())
        })
    }

    fn session_open(&self, user: &NativeUserInfo, out: &mut NativeUserInfo) -> Status {
        self.call("session_open", |state| {
            if state.session.is_some() {
                return Err(Status::failed(codes::INVALID_STATE, "session already open"));
            }
            let mut user = decode::<UserInfo>(user)?;
            if user.participant_id.is_empty() {
                state.next_participant += 1;
                user.participant_id = format!("participant-{}", state.next_participant);
            }
            *out = encode(&user)?;
            state.session = Some(user);
            Ok(())
        })
    }

    fn session_close(&self) -> Status {
        self.call("session_close", |state| {
            state.require_session()?;
            state.session = None;
            state.leave_conference();
            Ok(())
        })
    }

    fn conference_create(
        &self,
        options: &NativeConferenceOptions,
        out: &mut NativeConferenceInfos,
    ) -> Status {
        self.call("conference_create", |state| {
            state.require_session()?;
            let options = decode::<ConferenceOptions>(options)?;
            state.next_conference += 1;
            let infos = ConferenceInfos {
                id: format!("conf-{}", state.next_conference),
                alias: options.alias,
                is_new: true,
                status: ConferenceStatus::Created,
                permissions: vec![
                    ConferenceAccessPermissions::Invite,
                    ConferenceAccessPermissions::Join,
                    ConferenceAccessPermissions::SendAudio,
                ],
            };
            *out = encode(&infos)?;
            state.conferences.insert(infos.id.clone(), infos);
            Ok(())
        })
    }

    fn conference_join(
        &self,
        conference: &NativeConferenceInfos,
        options: &NativeJoinOptions,
        out: &mut NativeConferenceInfos,
    ) -> Status {
        self.call("conference_join", |state| {
            let options = decode::<JoinOptions>(options)?;
            state.enter_conference(
                conference,
                ParticipantType::User,
                options.constraints.audio,
                out,
            )
        })
    }

    fn conference_listen(
        &self,
        conference: &NativeConferenceInfos,
        options: &NativeListenOptions,
        out: &mut NativeConferenceInfos,
    ) -> Status {
        self.call("conference_listen", |state| {
            decode::<ListenOptions>(options)?;
            state.enter_conference(conference, ParticipantType::Listener, false, out)
        })
    }

    fn conference_leave(&self) -> Status {
        self.call("conference_leave", |state| {
            let id = state.require_conference()?.to_string();
            if let Some(infos) = state.conferences.get_mut(&id) {
                infos.status = ConferenceStatus::Left;
            }
            state.leave_conference();
            Ok(())
        })
    }

    fn conference_participants(
        &self,
        visit: &mut dyn FnMut(RawArray<'_, NativeParticipant>),
    ) -> Status {
        self.call("conference_participants", |state| {
            state.require_conference()?;
            let natives = state
                .local_participant
                .iter()
                .chain(state.remote_participants.iter())
                .map(encode)
                .collect::<Result<Vec<_>, _>>()?;
            visit(RawArray::from_slice(&natives));
            Ok(())
        })
    }

    fn audio_devices(&self, visit: &mut dyn FnMut(RawArray<'_, NativeAudioDevice>)) -> Status {
        self.call("audio_devices", |state| {
            let natives = state
                .devices
                .iter()
                .map(encode)
                .collect::<Result<Vec<_>, _>>()?;
            match state.reported_device_count {
                Some(count) => visit(RawArray::new(count, &natives)),
                None => visit(RawArray::from_slice(&natives)),
            }
            Ok(())
        })
    }

    fn current_audio_input_device(&self, out: &mut NativeAudioDevice) -> Status {
        self.call("current_audio_input_device", |state| {
            state.current_device(state.current_input.as_ref(), out)
        })
    }

    fn current_audio_output_device(&self, out: &mut NativeAudioDevice) -> Status {
        self.call("current_audio_output_device", |state| {
            state.current_device(state.current_output.as_ref(), out)
        })
    }

    fn set_preferred_audio_input_device(&self, device: &NativeAudioDevice) -> Status {
        self.call("set_preferred_audio_input_device", |state| {
            let device = state.find_device(device)?;
            if !device.direction.is_input() {
                return Err(Status::failed(
                    codes::INVALID_ARGUMENT,
                    format!("{} is not an input device", device.id),
                ));
            }
            state.current_input = Some(device.id);
            Ok(())
        })
    }

    fn set_preferred_audio_output_device(&self, device: &NativeAudioDevice) -> Status {
        self.call("set_preferred_audio_output_device", |state| {
            let device = state.find_device(device)?;
            if !device.direction.is_output() {
                return Err(Status::failed(
                    codes::INVALID_ARGUMENT,
                    format!("{} is not an output device", device.id),
                ));
            }
            state.current_output = Some(device.id);
            Ok(())
        })
    }

    fn local_audio_start(&self) -> Status {
        self.call("local_audio_start", |state| {
            state.require_conference()?;
            state.local_audio = true;
            Ok(())
        })
    }

    fn local_audio_stop(&self) -> Status {
        self.call("local_audio_stop", |state| {
            state.require_conference()?;
            state.local_audio = false;
            Ok(())
        })
    }

    fn remote_audio_start(&self, participant_id: &CStr) -> Status {
        self.call("remote_audio_start", |state| {
            let id = state.require_remote(participant_id)?;
            state.remote_receiving.insert(id);
            Ok(())
        })
    }

    fn remote_audio_stop(&self, participant_id: &CStr) -> Status {
        self.call("remote_audio_stop", |state| {
            let id = state.require_remote(participant_id)?;
            state.remote_receiving.remove(&id);
            Ok(())
        })
    }

    fn remote_audio_mute(&self, muted: bool, participant_id: &CStr) -> Status {
        self.call("remote_audio_mute", |state| {
            let id = state.require_remote(participant_id)?;
            if muted {
                state.remote_muted.insert(id);
            } else {
                state.remote_muted.remove(&id);
            }
            Ok(())
        })
    }

    fn set_on_device_added(&self, callback: DeviceCallback, user_data: UserData) -> Status {
        self.call("set_on_device_added", |state| {
            state.callbacks.device_added = Some((callback, user_data));
            Ok(())
        })
    }

    fn set_on_device_removed(
        &self,
        callback: DeviceRemovedCallback,
        user_data: UserData,
    ) -> Status {
        self.call("set_on_device_removed", |state| {
            state.callbacks.device_removed = Some((callback, user_data));
            Ok(())
        })
    }

    fn set_on_device_changed(
        &self,
        callback: DeviceChangedCallback,
        user_data: UserData,
    ) -> Status {
        self.call("set_on_device_changed", |state| {
            state.callbacks.device_changed = Some((callback, user_data));
            Ok(())
        })
    }

    fn set_on_signaling_channel_error(
        &self,
        callback: SignalingErrorCallback,
        user_data: UserData,
    ) -> Status {
        self.call("set_on_signaling_channel_error", |state| {
            state.callbacks.signaling_error = Some((callback, user_data));
            Ok(())
        })
    }

    fn set_on_invalid_token_error(
        &self,
        callback: InvalidTokenCallback,
        user_data: UserData,
    ) -> Status {
        self.call("set_on_invalid_token_error", |state| {
            state.callbacks.invalid_token = Some((callback, user_data));
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeviceDirection;
    use bytemuck::Zeroable;

    fn key() -> CString {
        CString::new("valid-key").unwrap()
    }

    fn seeded() -> StubEngine {
        let stub = StubEngine::with_devices(vec![
            AudioDevice::new("dev1", "Mic", DeviceDirection::Input),
            AudioDevice::new("dev2", "Speaker", DeviceDirection::Output),
        ]);
        assert!(stub.init(&key()).is_ok());
        stub
    }

    fn device_ids(stub: &StubEngine) -> Vec<String> {
        let mut ids = Vec::new();
        let status = stub.audio_devices(&mut |raw| {
            ids = raw
                .items()
                .iter()
                .map(|native| native.id.decode().unwrap())
                .collect();
        });
        assert!(status.is_ok());
        ids
    }

    #[test]
    fn test_lifecycle_and_release_counter() {
        let stub = StubEngine::new();
        let empty = CString::new("").unwrap();
        assert_eq!(stub.init(&empty).code(), codes::INVALID_ARGUMENT);

        assert!(stub.init(&key()).is_ok());
        assert_eq!(stub.init(&key()).code(), codes::INVALID_STATE);
        assert!(stub.release().is_ok());
        assert_eq!(stub.release().code(), codes::NOT_INITIALIZED);
        assert_eq!(stub.release_calls(), 2);
    }

    #[test]
    fn test_calls_before_init_fail() {
        let stub = StubEngine::new();
        let status = stub.audio_devices(&mut |_| panic!("visitor must not run"));
        assert_eq!(status.code(), codes::NOT_INITIALIZED);
    }

    #[test]
    fn test_device_table_and_preferred_input() {
        let stub = seeded();
        assert_eq!(device_ids(&stub), vec!["dev1", "dev2"]);
        assert_eq!(stub.current_input_id().as_deref(), Some("dev1"));

        let speaker = AudioDevice::new("dev2", "Speaker", DeviceDirection::Output)
            .to_native()
            .unwrap();
        let status = stub.set_preferred_audio_input_device(&speaker);
        assert_eq!(status.code(), codes::INVALID_ARGUMENT);

        let ghost = AudioDevice::new("ghost", "Ghost", DeviceDirection::Input)
            .to_native()
            .unwrap();
        assert_eq!(stub.set_preferred_audio_input_device(&ghost).code(), codes::NOT_FOUND);
    }

    #[test]
    fn test_failure_injection_is_one_shot() {
        let stub = seeded();
        stub.fail_next("audio_devices", codes::MEDIA_ENGINE, "device busy");

        let failed = stub.audio_devices(&mut |_| {});
        assert_eq!(failed.code(), codes::MEDIA_ENGINE);
        assert_eq!(failed.diagnostic(), Some("device busy"));
        assert!(stub.audio_devices(&mut |_| {}).is_ok());
    }

    #[test]
    fn test_release_failure_still_releases() {
        let stub = seeded();
        stub.fail_next("release", codes::GENERIC, "teardown error");
        assert_eq!(stub.release().code(), codes::GENERIC);
        assert!(!stub.is_initialized());
    }

    #[test]
    fn test_count_override_reaches_visitor() {
        let stub = seeded();
        stub.report_device_count(Some(-1));
        let mut seen = None;
        let _ = stub.audio_devices(&mut |raw| seen = Some(raw.count()));
        assert_eq!(seen, Some(-1));
    }

    #[test]
    fn test_simulate_without_registration_reports_false() {
        let stub = seeded();
        assert!(!stub.simulate_signaling_error("down"));
        assert!(!stub.unplug_device("dev1"));
        assert_eq!(device_ids(&stub), vec!["dev2"]);
        assert!(stub.current_input_id().is_none());
    }

    #[test]
    fn test_conference_flow() {
        let stub = seeded();
        let mut conference = NativeConferenceInfos::zeroed();
        let options = ConferenceOptions::default().to_native().unwrap();
        assert_eq!(
            stub.conference_create(&options, &mut conference).code(),
            codes::INVALID_STATE
        );

        let mut user = NativeUserInfo::zeroed();
        assert!(stub
            .session_open(&UserInfo::named("Ada").to_native().unwrap(), &mut user)
            .is_ok());
        assert_eq!(user.participant_id.decode().unwrap(), "participant-1");

        assert!(stub.conference_create(&options, &mut conference).is_ok());
        assert_eq!(conference.id.decode().unwrap(), "conf-1");

        let join = JoinOptions::default().to_native().unwrap();
        let mut joined = NativeConferenceInfos::zeroed();
        assert!(stub.conference_join(&conference, &join, &mut joined).is_ok());
        assert_eq!(
            ConferenceStatus::from_native(&joined.status).unwrap(),
            ConferenceStatus::Joined
        );

        let mut count = 0;
        assert!(stub
            .conference_participants(&mut |raw| count = raw.count())
            .is_ok());
        assert_eq!(count, 1);

        let missing = CString::new("nobody").unwrap();
        assert_eq!(stub.remote_audio_start(&missing).code(), codes::NOT_FOUND);
        assert!(stub.conference_leave().is_ok());
        assert_eq!(stub.conference_leave().code(), codes::INVALID_STATE);
    }
}
