// Comms SDK - async Rust façade over the native communications engine
// Lifecycle guard, marshalling, callback bridge and service façades

// Module declarations
pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod marshal;
pub mod native;
pub mod sdk;
pub mod services;
pub mod telemetry;
pub mod types;

// Re-exports for convenience
pub use bridge::EventKind;
pub use config::SdkConfig;
pub use engine::LifecycleState;
pub use error::{ErrorCode, SdkError, SdkErrorCodes};
pub use native::{NativeEngine, StubEngine};
pub use sdk::CommsSdk;
pub use services::{
    AudioService, ConferenceService, LocalAudioService, MediaDeviceService, RemoteAudioService,
    SessionService,
};
pub use telemetry::{TelemetryEvent, TelemetryEventKind};
pub use types::*;
