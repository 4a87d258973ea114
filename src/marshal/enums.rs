// Enum ⇄ native integer mappings. Unknown integers are rejected, never
// defaulted.

use crate::error::SdkError;
use crate::types::{
    ConferenceAccessPermissions, ConferenceStatus, DeviceDirection, LogLevel, ParticipantStatus,
    ParticipantType, SpatialAudioStyle,
};

use super::Marshal;

macro_rules! native_enum {
    ($ty:ident, $label:literal { $($variant:ident = $value:literal),+ $(,)? }) => {
        impl Marshal for $ty {
            type Native = i32;

            fn to_native(&self) -> Result<i32, SdkError> {
                Ok(match self {
                    $($ty::$variant => $value,)+
                })
            }

            fn from_native(native: &i32) -> Result<Self, SdkError> {
                match *native {
                    $($value => Ok($ty::$variant),)+
                    other => Err(SdkError::marshalling(format!(
                        "unknown {} value {}",
                        $label, other
                    ))),
                }
            }
        }
    };
}

native_enum!(DeviceDirection, "device direction" {
    Input = 1,
    Output = 2,
    InputAndOutput = 3,
});

native_enum!(LogLevel, "log level" {
    Off = 0,
    Error = 1,
    Warning = 2,
    Info = 3,
    Debug = 4,
    Verbose = 5,
});

native_enum!(SpatialAudioStyle, "spatial audio style" {
    Disabled = 0,
    Individual = 1,
    Shared = 2,
});

native_enum!(ConferenceStatus, "conference status" {
    Creating = 0,
    Created = 1,
    Joining = 2,
    Joined = 3,
    Leaving = 4,
    Left = 5,
    Destroyed = 6,
    Error = 7,
});

native_enum!(ConferenceAccessPermissions, "conference permission" {
    Invite = 0,
    Join = 1,
    Kick = 2,
    Record = 3,
    Stream = 4,
    SendMessage = 5,
    SendAudio = 6,
    SendVideo = 7,
    ShareScreen = 8,
    ShareVideo = 9,
    ShareFile = 10,
    UpdatePermissions = 11,
});

native_enum!(ParticipantType, "participant type" {
    User = 0,
    Listener = 1,
});

native_enum!(ParticipantStatus, "participant status" {
    Reserved = 0,
    Connecting = 1,
    OnAir = 2,
    Decline = 3,
    Inactive = 4,
    Left = 5,
    Warning = 6,
    Error = 7,
    Kicked = 8,
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_values_match_native_header() {
        assert_eq!(DeviceDirection::Input.to_native().unwrap(), 1);
        assert_eq!(DeviceDirection::Output.to_native().unwrap(), 2);
        assert_eq!(
            DeviceDirection::from_native(&3).unwrap(),
            DeviceDirection::InputAndOutput
        );
    }

    #[test]
    fn test_unknown_value_is_marshalling_failure() {
        let err = DeviceDirection::from_native(&0).unwrap_err();
        match err {
            SdkError::MarshallingFailure { reason } => {
                assert!(reason.contains("device direction"));
                assert!(reason.contains('0'));
            }
            other => panic!("Expected MarshallingFailure, got {:?}", other),
        }
        assert!(ParticipantStatus::from_native(&9).is_err());
        assert!(LogLevel::from_native(&-1).is_err());
    }

    #[test]
    fn test_status_enums_decode() {
        assert_eq!(
            ConferenceStatus::from_native(&2).unwrap(),
            ConferenceStatus::Joining
        );
        assert_eq!(
            ParticipantStatus::from_native(&1).unwrap(),
            ParticipantStatus::Connecting
        );
        assert_eq!(
            SpatialAudioStyle::from_native(&2).unwrap(),
            SpatialAudioStyle::Shared
        );
    }
}
