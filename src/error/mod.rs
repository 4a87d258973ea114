// Error types for the communications SDK
//
// This module defines the typed failures surfaced by every SDK operation and
// the translator that turns native status codes into them. Every native call
// result goes through `translate` before anything else looks at it.

mod sdk;
mod translate;

pub use sdk::{log_sdk_error, SdkError, SdkErrorCodes};
pub use translate::{native_message, translate};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the native boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
