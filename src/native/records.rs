//! Fixed-layout records exchanged with the native engine.
//!
//! Field order matches the native headers. Strings are inline, NUL-terminated
//! UTF-8 buffers; enums travel as `i32` and flags as `u8` (0 or 1);
//! variable-length lists are a fixed array plus an explicit count.

use bytemuck::Zeroable;

use crate::marshal::NativeStr;

pub const DEVICE_ID_CAPACITY: usize = 256;
pub const DEVICE_NAME_CAPACITY: usize = 256;
pub const IDENTIFIER_CAPACITY: usize = 128;
pub const ALIAS_CAPACITY: usize = 256;
pub const NAME_CAPACITY: usize = 256;
pub const URL_CAPACITY: usize = 1024;
pub const ACCESS_TOKEN_CAPACITY: usize = 2048;
pub const MAX_PERMISSIONS: usize = 16;

#[repr(C)]
#[derive(Debug, Clone, Copy, Zeroable)]
pub struct NativeAudioDevice {
    pub id: NativeStr<DEVICE_ID_CAPACITY>,
    pub name: NativeStr<DEVICE_NAME_CAPACITY>,
    pub direction: i32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Zeroable)]
pub struct NativeConferenceParams {
    pub dolby_voice: u8,
    pub stats: u8,
    pub spatial_audio_style: i32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Zeroable)]
pub struct NativeConferenceOptions {
    pub alias: NativeStr<ALIAS_CAPACITY>,
    pub params: NativeConferenceParams,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Zeroable)]
pub struct NativeConferenceInfos {
    pub id: NativeStr<IDENTIFIER_CAPACITY>,
    pub alias: NativeStr<ALIAS_CAPACITY>,
    pub is_new: u8,
    pub status: i32,
    pub permissions: [i32; MAX_PERMISSIONS],
    pub permissions_count: i32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Zeroable)]
pub struct NativeConnectionOptions {
    pub conference_access_token: NativeStr<ACCESS_TOKEN_CAPACITY>,
    pub spatial_audio: u8,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Zeroable)]
pub struct NativeMediaConstraints {
    pub audio: u8,
    pub video: u8,
    pub audio_processing: u8,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Zeroable)]
pub struct NativeJoinOptions {
    pub connection: NativeConnectionOptions,
    pub constraints: NativeMediaConstraints,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Zeroable)]
pub struct NativeListenOptions {
    pub connection: NativeConnectionOptions,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Zeroable)]
pub struct NativeParticipantInfo {
    pub name: NativeStr<NAME_CAPACITY>,
    pub external_id: NativeStr<IDENTIFIER_CAPACITY>,
    pub avatar_url: NativeStr<URL_CAPACITY>,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Zeroable)]
pub struct NativeParticipant {
    pub id: NativeStr<IDENTIFIER_CAPACITY>,
    pub info: NativeParticipantInfo,
    pub participant_type: i32,
    pub status: i32,
    pub is_sending_audio: u8,
    pub is_audible_locally: u8,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Zeroable)]
pub struct NativeUserInfo {
    pub participant_id: NativeStr<IDENTIFIER_CAPACITY>,
    pub name: NativeStr<NAME_CAPACITY>,
    pub external_id: NativeStr<IDENTIFIER_CAPACITY>,
    pub avatar_url: NativeStr<URL_CAPACITY>,
}
