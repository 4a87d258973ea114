//! Single-slot lifecycle guard around the native engine.
//!
//! The engine handle exists exactly while the guard is `Initialized`. Every
//! native call borrows it through an [`EngineLease`]; teardown waits until
//! all outstanding leases are returned, so release never races a call that
//! is still inside the engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::{OwnedRwLockReadGuard, RwLock};

use crate::error::{log_sdk_error, SdkError};
use crate::marshal::c_string;
use crate::native::NativeEngine;

use super::call::run_blocking;

/// Lifecycle phase of the engine handle.
///
/// `Initializing` and `Releasing` are transient and only visible while the
/// native init or release call is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Uninitialized,
    Initializing,
    Initialized,
    Releasing,
}

/// Proof that the engine is initialized, held for the duration of one call.
pub struct EngineLease {
    engine: Arc<dyn NativeEngine>,
    _permit: OwnedRwLockReadGuard<()>,
}

impl EngineLease {
    pub fn engine(&self) -> &dyn NativeEngine {
        self.engine.as_ref()
    }
}

fn lock_state(state: &Mutex<LifecycleState>) -> MutexGuard<'_, LifecycleState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A transient phase that settles when dropped.
///
/// Dropping settles the state whether the owner finished normally, returned
/// early, panicked, or was abandoned with the blocking call still running.
struct PendingPhase {
    state: Arc<Mutex<LifecycleState>>,
    settle: LifecycleState,
    settled: bool,
}

impl PendingPhase {
    fn new(state: &Arc<Mutex<LifecycleState>>) -> Self {
        Self {
            state: Arc::clone(state),
            settle: LifecycleState::Uninitialized,
            settled: false,
        }
    }
}

impl Drop for PendingPhase {
    fn drop(&mut self) {
        if !self.settled {
            *lock_state(&self.state) = self.settle;
        }
    }
}

pub struct LifecycleGuard {
    engine: Arc<dyn NativeEngine>,
    state: Arc<Mutex<LifecycleState>>,
    calls: Arc<RwLock<()>>,
    // Set under the state lock when the guard is dropped mid-initialize; the
    // init worker then owns the engine and releases it.
    abandoned: Arc<AtomicBool>,
}

impl LifecycleGuard {
    pub fn new(engine: Arc<dyn NativeEngine>) -> Self {
        Self {
            engine,
            state: Arc::new(Mutex::new(LifecycleState::Uninitialized)),
            calls: Arc::new(RwLock::new(())),
            abandoned: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> LifecycleState {
        *lock_state(&self.state)
    }

    pub fn is_initialized(&self) -> bool {
        self.state() == LifecycleState::Initialized
    }

    fn state_mut(&self) -> Result<MutexGuard<'_, LifecycleState>, SdkError> {
        self.state.lock().map_err(|_| SdkError::poisoned("lifecycle"))
    }

    /// Borrow the engine for one call.
    ///
    /// Fails with `NotInitialized` unless the state is `Initialized`.
    pub fn acquire(&self) -> Result<EngineLease, SdkError> {
        let state = self.state_mut()?;
        if *state != LifecycleState::Initialized {
            return Err(SdkError::NotInitialized);
        }
        // Only teardown takes the write side, and it flips the state to
        // `Releasing` first, so this cannot fail while still `Initialized`.
        let permit = Arc::clone(&self.calls)
            .try_read_owned()
            .map_err(|_| SdkError::NotInitialized)?;
        Ok(EngineLease {
            engine: Arc::clone(&self.engine),
            _permit: permit,
        })
    }

    /// Create the engine handle.
    ///
    /// A second initialize, including one racing an initialize that has not
    /// completed yet, fails with `AlreadyInitialized` without touching the
    /// engine. The state is committed on the blocking worker as soon as the
    /// native call returns, so it is durable even if this future is dropped.
    pub async fn initialize(&self, app_key: &str) -> Result<(), SdkError> {
        let mut phase = {
            let mut state = self.state_mut()?;
            if *state != LifecycleState::Uninitialized {
                return Err(SdkError::AlreadyInitialized);
            }
            *state = LifecycleState::Initializing;
            PendingPhase::new(&self.state)
        };

        let key = c_string(app_key, "app_key")?;
        let engine = Arc::clone(&self.engine);
        let abandoned = Arc::clone(&self.abandoned);
        run_blocking("init", move || {
            engine.init(&key).check("init")?;

            // Commit under the same lock `Drop` inspects, so the handle ends
            // up either recorded as initialized or released here.
            let mut state = lock_state(&phase.state);
            if abandoned.load(Ordering::Acquire) {
                drop(state);
                log::warn!("[Lifecycle] owner dropped during init; releasing native engine");
                if let Err(err) = engine.release().check("release") {
                    log_sdk_error(&err, "abandoned init");
                }
                return Err(SdkError::NotInitialized);
            }
            *state = LifecycleState::Initialized;
            drop(state);
            phase.settled = true;
            Ok(())
        })
        .await
    }

    /// Destroy the engine handle.
    ///
    /// Returns `Ok(false)` without touching the engine when there is no
    /// handle to release. Otherwise waits for in-flight calls, invokes native
    /// release exactly once, runs `after_release` and clears the handle. The
    /// handle is cleared even when release reports an error; that error is
    /// still returned.
    pub async fn dispose<F>(&self, after_release: F) -> Result<bool, SdkError>
    where
        F: FnOnce() + Send + 'static,
    {
        let phase = {
            let mut state = self.state_mut()?;
            match *state {
                LifecycleState::Initialized => {}
                other => {
                    log::warn!("[Lifecycle] dispose ignored while {:?}", other);
                    return Ok(false);
                }
            }
            *state = LifecycleState::Releasing;
            PendingPhase::new(&self.state)
        };

        let engine = Arc::clone(&self.engine);
        let calls = Arc::clone(&self.calls);
        // Teardown runs as its own task so it completes even if the caller
        // stops polling.
        let teardown = tokio::spawn(async move {
            let _phase = phase;
            let _drained = calls.write_owned().await;
            let result = run_blocking("release", move || engine.release().check("release")).await;
            after_release();
            result
        });

        match teardown.await {
            Ok(result) => result.map(|()| true),
            Err(err) => Err(SdkError::WorkerFailure {
                reason: format!("release task failed: {}", err),
            }),
        }
    }
}

impl Drop for LifecycleGuard {
    fn drop(&mut self) {
        let mut state = lock_state(&self.state);
        match *state {
            LifecycleState::Initialized => {}
            LifecycleState::Initializing => {
                self.abandoned.store(true, Ordering::Release);
                return;
            }
            _ => return,
        }
        log::warn!("[Lifecycle] dropped while initialized; releasing native engine");
        if let Err(err) = self.engine.release().check("release") {
            log_sdk_error(&err, "drop");
        }
        *state = LifecycleState::Uninitialized;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{codes, StubEngine};
    use std::time::Duration;

    fn guard() -> (Arc<StubEngine>, LifecycleGuard) {
        let stub = Arc::new(StubEngine::new());
        let guard = LifecycleGuard::new(stub.clone());
        (stub, guard)
    }

    #[tokio::test]
    async fn test_initialize_then_acquire() {
        let (_stub, guard) = guard();
        assert!(matches!(guard.acquire(), Err(SdkError::NotInitialized)));

        guard.initialize("valid-key").await.unwrap();
        assert_eq!(guard.state(), LifecycleState::Initialized);
        assert!(guard.acquire().is_ok());
    }

    #[tokio::test]
    async fn test_second_initialize_keeps_first_handle() {
        let (_stub, guard) = guard();
        guard.initialize("valid-key").await.unwrap();
        assert_eq!(
            guard.initialize("other-key").await,
            Err(SdkError::AlreadyInitialized)
        );
        assert!(guard.is_initialized());
    }

    #[tokio::test]
    async fn test_failed_init_returns_to_uninitialized() {
        let (stub, guard) = guard();
        stub.fail_next("init", codes::INVALID_TOKEN, "bad key");
        let err = guard.initialize("valid-key").await.unwrap_err();
        assert_eq!(err.native_code(), Some(codes::INVALID_TOKEN));
        assert_eq!(guard.state(), LifecycleState::Uninitialized);

        let err = guard.initialize("bad\0key").await.unwrap_err();
        assert!(matches!(err, SdkError::MarshallingFailure { .. }));
        assert_eq!(guard.state(), LifecycleState::Uninitialized);

        guard.initialize("valid-key").await.unwrap();
    }

    #[tokio::test]
    async fn test_dispose_twice_releases_once() {
        let (stub, guard) = guard();
        guard.initialize("valid-key").await.unwrap();

        assert_eq!(guard.dispose(|| {}).await, Ok(true));
        assert_eq!(guard.dispose(|| {}).await, Ok(false));
        assert_eq!(stub.release_calls(), 1);
    }

    #[tokio::test]
    async fn test_release_error_still_clears_handle() {
        let (stub, guard) = guard();
        guard.initialize("valid-key").await.unwrap();
        stub.fail_next("release", codes::GENERIC, "teardown failed");

        let err = guard.dispose(|| {}).await.unwrap_err();
        assert_eq!(err.native_code(), Some(codes::GENERIC));
        assert_eq!(guard.state(), LifecycleState::Uninitialized);
        assert!(matches!(guard.acquire(), Err(SdkError::NotInitialized)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dispose_waits_for_outstanding_lease() {
        let (stub, guard) = guard();
        let guard = Arc::new(guard);
        guard.initialize("valid-key").await.unwrap();

        let lease = guard.acquire().unwrap();
        let disposer = {
            let guard = Arc::clone(&guard);
            tokio::spawn(async move { guard.dispose(|| {}).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(guard.state(), LifecycleState::Releasing);
        assert_eq!(stub.release_calls(), 0);
        assert!(matches!(guard.acquire(), Err(SdkError::NotInitialized)));

        drop(lease);
        assert_eq!(disposer.await.unwrap(), Ok(true));
        assert_eq!(stub.release_calls(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_initialize_single_winner() {
        let (stub, guard) = guard();
        stub.set_latency(Duration::from_millis(30));

        let (first, second) =
            futures::join!(guard.initialize("valid-key"), guard.initialize("valid-key"));
        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes.contains(&Err(SdkError::AlreadyInitialized)));
        assert!(guard.is_initialized());
    }

    #[tokio::test]
    async fn test_drop_releases_live_engine() {
        let (stub, guard) = guard();
        guard.initialize("valid-key").await.unwrap();
        drop(guard);
        assert_eq!(stub.release_calls(), 1);
        assert!(!stub.is_initialized());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_drop_during_initialize_releases_engine() {
        let (stub, guard) = guard();
        stub.set_latency(Duration::from_millis(100));
        let guard = Arc::new(guard);

        let pending = {
            let guard = Arc::clone(&guard);
            tokio::spawn(async move { guard.initialize("valid-key").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(guard.state(), LifecycleState::Initializing);

        pending.abort();
        let _ = pending.await;
        drop(guard);

        // init finishes after ~100ms, then the worker releases (~100ms more).
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(stub.release_calls(), 1);
        assert!(!stub.is_initialized());
    }
}
