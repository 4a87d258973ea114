// SDK error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// SDK error code constants
///
/// Single source of truth for the numeric codes attached to [`SdkError`]
/// variants, so hosts can branch on failures without matching on messages.
///
/// Error code range: 3001-3006
pub struct SdkErrorCodes {}

impl SdkErrorCodes {
    /// A gated operation was called while no engine handle exists
    pub const NOT_INITIALIZED: i32 = 3001;

    /// Initialize was called while a handle exists or another initialize is in flight
    pub const ALREADY_INITIALIZED: i32 = 3002;

    /// The native engine reported a nonzero status
    pub const NATIVE_CALL_FAILURE: i32 = 3003;

    /// Native output was malformed or a value could not cross the boundary
    pub const MARSHALLING_FAILURE: i32 = 3004;

    /// Mutex/RwLock was poisoned
    pub const LOCK_POISONED: i32 = 3005;

    /// The background worker running a native call panicked or was aborted
    pub const WORKER_FAILURE: i32 = 3006;
}

/// Log an SDK error with structured context
///
/// Logs the numeric code, the failing operation and the message. Called once
/// per failed operation by the call wrapper and the lifecycle guard.
pub fn log_sdk_error(err: &SdkError, context: &str) {
    error!(
        "SDK error in {}: code={}, component=CommsSdk, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// SDK errors
///
/// Every outward-facing operation either succeeds with a fully populated
/// result or fails with exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    /// No live engine handle
    NotInitialized,

    /// Duplicate initialize
    AlreadyInitialized,

    /// Nonzero native status, translated
    NativeCallFailure {
        operation: &'static str,
        code: i32,
        message: String,
        diagnostic: Option<String>,
    },

    /// Malformed native output or a value that cannot be marshalled
    MarshallingFailure { reason: String },

    /// Mutex/RwLock was poisoned
    LockPoisoned { component: String },

    /// Background worker panicked or was aborted
    WorkerFailure { reason: String },
}

impl SdkError {
    pub(crate) fn marshalling(reason: impl Into<String>) -> Self {
        SdkError::MarshallingFailure {
            reason: reason.into(),
        }
    }

    pub(crate) fn poisoned(component: &str) -> Self {
        SdkError::LockPoisoned {
            component: component.to_string(),
        }
    }

    /// Native status code for `NativeCallFailure`, `None` otherwise.
    pub fn native_code(&self) -> Option<i32> {
        match self {
            SdkError::NativeCallFailure { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl ErrorCode for SdkError {
    fn code(&self) -> i32 {
        match self {
            SdkError::NotInitialized => SdkErrorCodes::NOT_INITIALIZED,
            SdkError::AlreadyInitialized => SdkErrorCodes::ALREADY_INITIALIZED,
            SdkError::NativeCallFailure { .. } => SdkErrorCodes::NATIVE_CALL_FAILURE,
            SdkError::MarshallingFailure { .. } => SdkErrorCodes::MARSHALLING_FAILURE,
            SdkError::LockPoisoned { .. } => SdkErrorCodes::LOCK_POISONED,
            SdkError::WorkerFailure { .. } => SdkErrorCodes::WORKER_FAILURE,
        }
    }

    fn message(&self) -> String {
        match self {
            SdkError::NotInitialized => {
                "SDK is not initialized. Call init() first.".to_string()
            }
            SdkError::AlreadyInitialized => {
                "SDK already initialized. Call dispose() first.".to_string()
            }
            SdkError::NativeCallFailure {
                operation,
                code,
                message,
                diagnostic,
            } => match diagnostic {
                Some(diagnostic) => format!(
                    "{} failed with native status {}: {} ({})",
                    operation, code, message, diagnostic
                ),
                None => format!(
                    "{} failed with native status {}: {}",
                    operation, code, message
                ),
            },
            SdkError::MarshallingFailure { reason } => {
                format!("Marshalling failed: {}", reason)
            }
            SdkError::LockPoisoned { component } => {
                format!("Lock poisoned on {}", component)
            }
            SdkError::WorkerFailure { reason } => {
                format!("Background worker failed: {}", reason)
            }
        }
    }
}

impl fmt::Display for SdkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SdkError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for SdkError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdk_error_codes() {
        assert_eq!(
            SdkError::NotInitialized.code(),
            SdkErrorCodes::NOT_INITIALIZED
        );
        assert_eq!(
            SdkError::AlreadyInitialized.code(),
            SdkErrorCodes::ALREADY_INITIALIZED
        );
        assert_eq!(
            SdkError::NativeCallFailure {
                operation: "init",
                code: 2,
                message: "test".to_string(),
                diagnostic: None,
            }
            .code(),
            SdkErrorCodes::NATIVE_CALL_FAILURE
        );
        assert_eq!(
            SdkError::marshalling("test").code(),
            SdkErrorCodes::MARSHALLING_FAILURE
        );
        assert_eq!(
            SdkError::poisoned("test").code(),
            SdkErrorCodes::LOCK_POISONED
        );
        assert_eq!(
            SdkError::WorkerFailure {
                reason: "test".to_string()
            }
            .code(),
            SdkErrorCodes::WORKER_FAILURE
        );
    }

    #[test]
    fn test_native_failure_message_includes_diagnostic() {
        let err = SdkError::NativeCallFailure {
            operation: "conference_join",
            code: 7,
            message: "Access token is invalid or expired".to_string(),
            diagnostic: Some("token expired at 12:00".to_string()),
        };
        let message = err.message();
        assert!(message.contains("conference_join"));
        assert!(message.contains("status 7"));
        assert!(message.contains("token expired at 12:00"));
        assert_eq!(err.native_code(), Some(7));
    }

    #[test]
    fn test_sdk_error_display() {
        let err = SdkError::NotInitialized;
        let display = format!("{}", err);
        assert!(display.contains("SdkError"));
        assert!(display.contains(&err.code().to_string()));
        assert!(display.contains("not initialized"));
        assert_eq!(err.native_code(), None);
    }
}
