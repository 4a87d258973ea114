//! Per-feature service façades.
//!
//! Each service is a thin handle on the shared [`SdkCore`](crate::engine::SdkCore);
//! every method goes through the core's call protocol, so it fails with
//! `NotInitialized` once the SDK is disposed even if the service was obtained
//! earlier.

mod audio;
mod conference;
mod media_device;
mod session;

pub use audio::{AudioService, LocalAudioService, RemoteAudioService};
pub use conference::ConferenceService;
pub use media_device::MediaDeviceService;
pub use session::SessionService;
