//! Public entry point of the SDK.

use std::sync::Arc;

use futures::Stream;
use tokio::sync::broadcast;

use crate::bridge::EventKind;
use crate::config::SdkConfig;
use crate::engine::{LifecycleState, SdkCore};
use crate::error::SdkError;
use crate::marshal::Marshal;
use crate::native::{default_engine, NativeEngine};
use crate::services::{AudioService, ConferenceService, MediaDeviceService, SessionService};
use crate::telemetry::{TelemetryEvent, TelemetrySnapshot};
use crate::types::LogLevel;

/// Asynchronous, error-typed handle on the native communications engine.
///
/// A `CommsSdk` owns at most one live engine handle. Create it, [`init`]
/// it with an application key, use the service accessors, and [`dispose`]
/// it when done. Every operation returns a future that resolves once the
/// blocking native call has finished on tokio's blocking pool, so all
/// methods must be awaited inside a tokio runtime.
///
/// Dropping an initialized `CommsSdk` releases the engine synchronously as
/// a last resort; call [`dispose`] to observe teardown errors.
///
/// [`init`]: CommsSdk::init
/// [`dispose`]: CommsSdk::dispose
pub struct CommsSdk {
    core: Arc<SdkCore>,
}

impl CommsSdk {
    /// SDK over the default engine with default configuration.
    pub fn new() -> Self {
        Self::with_engine(default_engine(), SdkConfig::default())
    }

    pub fn from_config(config: SdkConfig) -> Self {
        Self::with_engine(default_engine(), config)
    }

    pub fn with_engine(engine: Arc<dyn NativeEngine>, config: SdkConfig) -> Self {
        Self {
            core: Arc::new(SdkCore::new(engine, config)),
        }
    }

    /// Initialize the engine with `app_key`.
    ///
    /// Fails with `AlreadyInitialized` while a handle exists or another
    /// initialize is still running.
    pub async fn init(&self, app_key: &str) -> Result<(), SdkError> {
        self.core.initialize(app_key).await
    }

    /// Release the engine. A no-op when not initialized.
    pub async fn dispose(&self) -> Result<(), SdkError> {
        self.core.dispose().await
    }

    pub fn is_initialized(&self) -> bool {
        self.core.is_initialized()
    }

    pub fn state(&self) -> LifecycleState {
        self.core.state()
    }

    pub fn config(&self) -> &SdkConfig {
        self.core.config()
    }

    pub async fn set_log_level(&self, level: LogLevel) -> Result<(), SdkError> {
        self.core
            .call("set_log_level", level.to_native(), |engine, native| {
                engine.set_log_level(native).check("set_log_level")
            })
            .await
    }

    /// Replace the signaling-channel error handler.
    pub async fn set_signaling_channel_error<F>(&self, handler: F) -> Result<(), SdkError>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        self.core
            .register(EventKind::SignalingChannelError, move |bridge, engine| {
                bridge.set_signaling_error(engine, handler)
            })
            .await
    }

    /// Replace the invalid-token error handler. The handler receives the
    /// reason and a description.
    pub async fn set_invalid_token_error<F>(&self, handler: F) -> Result<(), SdkError>
    where
        F: Fn(String, String) + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        self.core
            .register(EventKind::InvalidTokenError, move |bridge, engine| {
                bridge.set_invalid_token(engine, handler)
            })
            .await
    }

    pub fn is_handler_registered(&self, kind: EventKind) -> bool {
        self.core.is_handler_registered(kind)
    }

    pub fn subscribe_telemetry(&self) -> broadcast::Receiver<TelemetryEvent> {
        self.core.telemetry().subscribe()
    }

    pub fn telemetry_stream(&self) -> impl Stream<Item = TelemetryEvent> + Send + 'static {
        self.core.telemetry().stream()
    }

    pub fn telemetry_snapshot(&self) -> TelemetrySnapshot {
        self.core.telemetry().snapshot()
    }

    pub fn session(&self) -> Result<SessionService, SdkError> {
        self.core.ensure_initialized()?;
        Ok(SessionService::new(Arc::clone(&self.core)))
    }

    pub fn conference(&self) -> Result<ConferenceService, SdkError> {
        self.core.ensure_initialized()?;
        Ok(ConferenceService::new(Arc::clone(&self.core)))
    }

    pub fn media_device(&self) -> Result<MediaDeviceService, SdkError> {
        self.core.ensure_initialized()?;
        Ok(MediaDeviceService::new(Arc::clone(&self.core)))
    }

    pub fn audio(&self) -> Result<AudioService, SdkError> {
        self.core.ensure_initialized()?;
        Ok(AudioService::new(Arc::clone(&self.core)))
    }
}

impl Default for CommsSdk {
    fn default() -> Self {
        Self::new()
    }
}
