// Native status translation

use crate::error::SdkError;
use crate::native::{codes, Status};

/// Human-readable message for a native status code.
///
/// Unknown codes still get a generic message; they are never treated as
/// success.
pub fn native_message(code: i32) -> String {
    match code {
        codes::OK => "Success".to_string(),
        codes::GENERIC => "Native engine reported a failure".to_string(),
        codes::INVALID_ARGUMENT => "Invalid argument passed to the native engine".to_string(),
        codes::NOT_INITIALIZED => "Native engine is not initialized".to_string(),
        codes::INVALID_STATE => "Operation not allowed in the current engine state".to_string(),
        codes::NOT_FOUND => "Requested object was not found".to_string(),
        codes::SIGNALING => "Signaling channel failure".to_string(),
        codes::INVALID_TOKEN => "Access token is invalid or expired".to_string(),
        codes::MEDIA_ENGINE => "Media engine failure".to_string(),
        codes::PERMISSION_DENIED => "Permission denied".to_string(),
        other => format!("Unknown native status {}", other),
    }
}

/// Translate a native status into success or a typed failure.
///
/// `operation` names the native call for the failure message. The engine's
/// diagnostic string, when present, is carried through untouched; an empty
/// diagnostic is dropped.
pub fn translate(operation: &'static str, status: Status) -> Result<(), SdkError> {
    if status.is_ok() {
        return Ok(());
    }

    let code = status.code();
    let diagnostic = status.into_diagnostic().filter(|d| !d.is_empty());

    Err(SdkError::NativeCallFailure {
        operation,
        code,
        message: native_message(code),
        diagnostic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_passes_through() {
        assert_eq!(translate("init", Status::ok()), Ok(()));
    }

    #[test]
    fn test_known_code_maps_to_message() {
        let err = translate(
            "set_preferred_audio_input_device",
            Status::failed(codes::NOT_FOUND, "no device dev9"),
        )
        .unwrap_err();

        match err {
            SdkError::NativeCallFailure {
                operation,
                code,
                message,
                diagnostic,
            } => {
                assert_eq!(operation, "set_preferred_audio_input_device");
                assert_eq!(code, codes::NOT_FOUND);
                assert_eq!(message, "Requested object was not found");
                assert_eq!(diagnostic.as_deref(), Some("no device dev9"));
            }
            other => panic!("Expected NativeCallFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_code_is_generic_failure() {
        let err = translate("release", Status::from_code(-42)).unwrap_err();
        match err {
            SdkError::NativeCallFailure {
                code,
                message,
                diagnostic,
                ..
            } => {
                assert_eq!(code, -42);
                assert!(message.contains("Unknown native status -42"));
                assert!(diagnostic.is_none());
            }
            other => panic!("Expected NativeCallFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_diagnostic_is_dropped() {
        let err = translate("init", Status::failed(codes::GENERIC, "")).unwrap_err();
        assert!(matches!(
            err,
            SdkError::NativeCallFailure {
                diagnostic: None,
                ..
            }
        ));
    }
}
