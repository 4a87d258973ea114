//! Telemetry event types published by the SDK core.

use serde::Serialize;

use crate::bridge::EventKind;

/// Lifecycle and call outcome reported on the telemetry channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEventKind {
    Initialized,
    InitializeFailed { code: i32 },
    Released,
    /// Teardown reported an error; the handle was still cleared.
    ReleaseFailed { code: i32 },
    CallFailed { operation: String, code: i32 },
    HandlerRegistered { kind: EventKind },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetryEvent {
    pub timestamp_ms: u64,
    pub kind: TelemetryEventKind,
}
