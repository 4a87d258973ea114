//! SdkCore: the shared state behind the public SDK and its services.
//!
//! Owns the lifecycle guard, the callback bridge and the telemetry hub, and
//! implements the call protocol every service operation goes through:
//! guard check, input marshalling, blocking native call, status translation,
//! output marshalling. Failures are logged and published exactly once here.

use std::sync::Arc;

use crate::bridge::{CallbackBridge, EventKind};
use crate::config::SdkConfig;
use crate::error::{log_sdk_error, ErrorCode, SdkError};
use crate::marshal::Marshal;
use crate::native::NativeEngine;
use crate::telemetry::{TelemetryEventKind, TelemetryHub};
use crate::types::LogLevel;

use super::call::run_blocking;
use super::lifecycle::{LifecycleGuard, LifecycleState};

pub struct SdkCore {
    // Declared before `bridge`: dropping the guard releases the engine,
    // which drops the registrations pointing into the bridge's slots.
    lifecycle: LifecycleGuard,
    bridge: CallbackBridge,
    telemetry: TelemetryHub,
    config: SdkConfig,
}

impl SdkCore {
    pub fn new(engine: Arc<dyn NativeEngine>, config: SdkConfig) -> Self {
        Self {
            lifecycle: LifecycleGuard::new(engine),
            bridge: CallbackBridge::new(),
            telemetry: TelemetryHub::with_buffer(config.telemetry_buffer),
            config,
        }
    }

    pub fn telemetry(&self) -> &TelemetryHub {
        &self.telemetry
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle.is_initialized()
    }

    pub fn is_handler_registered(&self, kind: EventKind) -> bool {
        self.bridge.is_registered(kind)
    }

    /// Fail with `NotInitialized` unless a handle exists.
    pub fn ensure_initialized(&self) -> Result<(), SdkError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(SdkError::NotInitialized)
        }
    }

    fn report_failure(&self, operation: &'static str, err: &SdkError) {
        log_sdk_error(err, operation);
        self.telemetry.emit(TelemetryEventKind::CallFailed {
            operation: operation.to_string(),
            code: err.code(),
        });
    }

    pub async fn initialize(&self, app_key: &str) -> Result<(), SdkError> {
        match self.lifecycle.initialize(app_key).await {
            Ok(()) => {
                log::info!("[SdkCore] Native engine initialized");
                self.telemetry.emit(TelemetryEventKind::Initialized);
                if let Some(level) = self.config.log_level {
                    self.apply_configured_log_level(level).await;
                }
                Ok(())
            }
            Err(err) => {
                log_sdk_error(&err, "init");
                if !matches!(err, SdkError::AlreadyInitialized) {
                    self.telemetry
                        .emit(TelemetryEventKind::InitializeFailed { code: err.code() });
                }
                Err(err)
            }
        }
    }

    // A bad configured level must not undo a successful init.
    async fn apply_configured_log_level(&self, level: LogLevel) {
        let outcome = async {
            let lease = self.lifecycle.acquire()?;
            let native = level.to_native()?;
            run_blocking("set_log_level", move || {
                lease.engine().set_log_level(native).check("set_log_level")
            })
            .await
        }
        .await;
        if let Err(err) = outcome {
            log::warn!(
                "[SdkCore] Configured log level {:?} not applied: {}",
                level,
                err
            );
        }
    }

    pub async fn dispose(&self) -> Result<(), SdkError> {
        let bridge = self.bridge.clone();
        match self.lifecycle.dispose(move || bridge.clear()).await {
            Ok(true) => {
                log::info!("[SdkCore] Native engine released");
                self.telemetry.emit(TelemetryEventKind::Released);
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(err) => {
                log_sdk_error(&err, "release");
                self.telemetry
                    .emit(TelemetryEventKind::ReleaseFailed { code: err.code() });
                Err(err)
            }
        }
    }

    /// Run `call` against the engine with already-marshalled `input`.
    ///
    /// The guard is checked before `input` is looked at, so an uninitialized
    /// SDK reports `NotInitialized` even when the input is also bad. `call`
    /// runs on the blocking pool and must translate the native status and
    /// marshal any output before returning.
    pub async fn call<I, T, F>(
        &self,
        operation: &'static str,
        input: Result<I, SdkError>,
        call: F,
    ) -> Result<T, SdkError>
    where
        I: Send + 'static,
        T: Send + 'static,
        F: FnOnce(&dyn NativeEngine, I) -> Result<T, SdkError> + Send + 'static,
    {
        let result = async {
            let lease = self.lifecycle.acquire()?;
            let input = input?;
            run_blocking(operation, move || call(lease.engine(), input)).await
        }
        .await;

        if let Err(err) = &result {
            self.report_failure(operation, err);
        }
        result
    }

    /// [`SdkCore::call`] for operations without input.
    pub async fn invoke<T, F>(&self, operation: &'static str, call: F) -> Result<T, SdkError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn NativeEngine) -> Result<T, SdkError> + Send + 'static,
    {
        self.call(operation, Ok(()), move |engine, ()| call(engine))
            .await
    }

    /// Register a handler through the bridge.
    ///
    /// `register` runs on the blocking pool with the engine and a handle to
    /// the bridge; on success a `HandlerRegistered` event is published.
    pub async fn register<F>(&self, kind: EventKind, register: F) -> Result<(), SdkError>
    where
        F: FnOnce(&CallbackBridge, &dyn NativeEngine) -> Result<(), SdkError> + Send + 'static,
    {
        let bridge = self.bridge.clone();
        self.invoke(kind.as_str(), move |engine| register(&bridge, engine))
            .await?;
        log::debug!("[SdkCore] Registered {} handler", kind);
        self.telemetry
            .emit(TelemetryEventKind::HandlerRegistered { kind });
        Ok(())
    }
}
