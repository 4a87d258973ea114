//! Integration tests for the SDK lifecycle
//!
//! These drive `CommsSdk` end to end over the in-process stub engine:
//! - init/dispose state machine and duplicate calls
//! - gating of every operation on an initialized engine
//! - teardown failures still clearing the handle
//! - telemetry published for lifecycle transitions

use std::sync::Arc;
use std::time::Duration;

use comms_sdk::native::codes;
use comms_sdk::{
    AudioDevice, CommsSdk, ConferenceInfos, ConferenceOptions, DeviceDirection, ErrorCode,
    EventKind, JoinOptions, LifecycleState, ListenOptions, LogLevel, SdkConfig, SdkError,
    SdkErrorCodes, StubEngine, TelemetryEventKind, UserInfo,
};
use futures::StreamExt;

fn default_devices() -> Vec<AudioDevice> {
    vec![
        AudioDevice::new("dev1", "Mic", DeviceDirection::Input),
        AudioDevice::new("dev2", "Speaker", DeviceDirection::Output),
    ]
}

fn stub_sdk() -> (Arc<StubEngine>, CommsSdk) {
    let stub = Arc::new(StubEngine::with_devices(default_devices()));
    let sdk = CommsSdk::with_engine(stub.clone(), SdkConfig::default());
    (stub, sdk)
}

/// Test the documented happy path: init, list, select, dispose, then refuse
#[tokio::test]
async fn test_device_selection_then_dispose() {
    let (stub, sdk) = stub_sdk();

    sdk.init("valid-key").await.unwrap();
    assert_eq!(sdk.state(), LifecycleState::Initialized);

    let media = sdk.media_device().unwrap();
    let devices = media.audio_devices().await.unwrap();
    assert_eq!(devices, default_devices());

    media
        .set_preferred_audio_input_device(&devices[0])
        .await
        .unwrap();
    assert_eq!(stub.current_input_id().as_deref(), Some("dev1"));

    sdk.dispose().await.unwrap();
    assert_eq!(sdk.state(), LifecycleState::Uninitialized);

    let err = media.audio_devices().await.unwrap_err();
    assert_eq!(err, SdkError::NotInitialized);
    assert_eq!(err.code(), SdkErrorCodes::NOT_INITIALIZED);
}

/// Every gated operation must fail with NotInitialized before init
#[tokio::test]
async fn test_operations_refused_before_init() {
    let (stub, sdk) = stub_sdk();

    assert!(matches!(sdk.session(), Err(SdkError::NotInitialized)));
    assert!(matches!(sdk.conference(), Err(SdkError::NotInitialized)));
    assert!(matches!(sdk.media_device(), Err(SdkError::NotInitialized)));
    assert!(matches!(sdk.audio(), Err(SdkError::NotInitialized)));

    assert_eq!(
        sdk.set_log_level(LogLevel::Debug).await,
        Err(SdkError::NotInitialized)
    );
    assert_eq!(
        sdk.set_signaling_channel_error(|_| {}).await,
        Err(SdkError::NotInitialized)
    );
    assert_eq!(
        sdk.set_invalid_token_error(|_, _| {}).await,
        Err(SdkError::NotInitialized)
    );

    // Services obtained while initialized are gated again after dispose.
    sdk.init("valid-key").await.unwrap();
    let session = sdk.session().unwrap();
    let conference = sdk.conference().unwrap();
    let media = sdk.media_device().unwrap();
    let audio = sdk.audio().unwrap();
    sdk.dispose().await.unwrap();

    assert_eq!(
        session.open(UserInfo::named("alice")).await,
        Err(SdkError::NotInitialized)
    );
    assert_eq!(session.close().await, Err(SdkError::NotInitialized));
    assert_eq!(
        conference.create(ConferenceOptions::default()).await,
        Err(SdkError::NotInitialized)
    );
    let infos = ConferenceInfos::default();
    assert_eq!(
        conference.join(&infos, JoinOptions::default()).await,
        Err(SdkError::NotInitialized)
    );
    assert_eq!(
        conference.listen(&infos, ListenOptions::default()).await,
        Err(SdkError::NotInitialized)
    );
    assert_eq!(conference.leave().await, Err(SdkError::NotInitialized));
    assert_eq!(conference.participants().await, Err(SdkError::NotInitialized));
    assert_eq!(
        media.current_audio_input_device().await,
        Err(SdkError::NotInitialized)
    );
    assert_eq!(
        media.current_audio_output_device().await,
        Err(SdkError::NotInitialized)
    );
    let devices = default_devices();
    assert_eq!(
        media.set_preferred_audio_input_device(&devices[0]).await,
        Err(SdkError::NotInitialized)
    );
    assert_eq!(
        media.set_preferred_audio_output_device(&devices[1]).await,
        Err(SdkError::NotInitialized)
    );
    assert_eq!(media.set_added(|_| {}).await, Err(SdkError::NotInitialized));
    assert_eq!(media.set_removed(|_| {}).await, Err(SdkError::NotInitialized));
    assert_eq!(
        media.set_changed(|_, _| {}).await,
        Err(SdkError::NotInitialized)
    );
    assert_eq!(audio.local().start().await, Err(SdkError::NotInitialized));
    assert_eq!(audio.local().stop().await, Err(SdkError::NotInitialized));
    assert_eq!(
        audio.remote().start("participant-1").await,
        Err(SdkError::NotInitialized)
    );
    assert_eq!(
        audio.remote().stop("participant-1").await,
        Err(SdkError::NotInitialized)
    );
    assert_eq!(
        audio.remote().mute(true, "participant-1").await,
        Err(SdkError::NotInitialized)
    );

    // Only the one dispose reached the engine.
    assert_eq!(stub.release_calls(), 1);
}

#[tokio::test]
async fn test_double_init_rejected() {
    let (stub, sdk) = stub_sdk();

    sdk.init("valid-key").await.unwrap();
    let err = sdk.init("valid-key").await.unwrap_err();
    assert_eq!(err, SdkError::AlreadyInitialized);
    assert!(sdk.is_initialized());
    assert!(stub.is_initialized());
}

#[tokio::test]
async fn test_dispose_twice_is_noop() {
    let (stub, sdk) = stub_sdk();

    // Dispose before init touches nothing.
    sdk.dispose().await.unwrap();
    assert_eq!(stub.release_calls(), 0);

    sdk.init("valid-key").await.unwrap();
    sdk.dispose().await.unwrap();
    sdk.dispose().await.unwrap();
    assert_eq!(stub.release_calls(), 1);
}

#[tokio::test]
async fn test_failed_init_leaves_sdk_reusable() {
    let (stub, sdk) = stub_sdk();

    let err = sdk.init("").await.unwrap_err();
    assert_eq!(err.native_code(), Some(codes::INVALID_ARGUMENT));
    assert_eq!(sdk.state(), LifecycleState::Uninitialized);

    stub.fail_next("init", codes::INVALID_TOKEN, "key revoked");
    let err = sdk.init("valid-key").await.unwrap_err();
    match &err {
        SdkError::NativeCallFailure {
            operation,
            code,
            diagnostic,
            ..
        } => {
            assert_eq!(*operation, "init");
            assert_eq!(*code, codes::INVALID_TOKEN);
            assert_eq!(diagnostic.as_deref(), Some("key revoked"));
        }
        other => panic!("Expected NativeCallFailure, got {:?}", other),
    }

    sdk.init("valid-key").await.unwrap();
    assert!(sdk.is_initialized());
}

#[tokio::test]
async fn test_init_key_with_nul_is_marshalling_failure() {
    let (stub, sdk) = stub_sdk();

    let err = sdk.init("bad\0key").await.unwrap_err();
    assert!(matches!(err, SdkError::MarshallingFailure { .. }));
    assert!(!stub.is_initialized());
    assert_eq!(sdk.state(), LifecycleState::Uninitialized);
}

/// A failing release still surfaces the error but drops the handle
#[tokio::test]
async fn test_teardown_failure_still_clears_handle() {
    let (stub, sdk) = stub_sdk();
    sdk.init("valid-key").await.unwrap();
    sdk.set_signaling_channel_error(|_| {}).await.unwrap();

    stub.fail_next("release", codes::GENERIC, "teardown hiccup");
    let err = sdk.dispose().await.unwrap_err();
    assert_eq!(err.native_code(), Some(codes::GENERIC));

    assert_eq!(sdk.state(), LifecycleState::Uninitialized);
    assert!(!sdk.is_handler_registered(EventKind::SignalingChannelError));
    assert!(matches!(sdk.media_device(), Err(SdkError::NotInitialized)));

    sdk.init("valid-key").await.unwrap();
    assert!(sdk.is_initialized());
}

/// Concurrent init calls: exactly one wins
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_init_single_winner() {
    let stub = Arc::new(StubEngine::with_devices(default_devices()));
    stub.set_latency(Duration::from_millis(50));
    let sdk = Arc::new(CommsSdk::with_engine(stub.clone(), SdkConfig::default()));

    let first = tokio::spawn({
        let sdk = Arc::clone(&sdk);
        async move { sdk.init("valid-key").await }
    });
    let second = tokio::spawn({
        let sdk = Arc::clone(&sdk);
        async move { sdk.init("valid-key").await }
    });

    let results = [first.await.unwrap(), second.await.unwrap()];
    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|result| *result == Err(SdkError::AlreadyInitialized)));
    assert!(sdk.is_initialized());
}

/// Dispose waits for an in-flight call instead of releasing under it
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_dispose_waits_for_in_flight_call() {
    let stub = Arc::new(StubEngine::with_devices(default_devices()));
    let sdk = Arc::new(CommsSdk::with_engine(stub.clone(), SdkConfig::default()));
    sdk.init("valid-key").await.unwrap();

    stub.set_latency(Duration::from_millis(100));
    let media = sdk.media_device().unwrap();
    let listing = tokio::spawn(async move { media.audio_devices().await });
    tokio::time::sleep(Duration::from_millis(20)).await;

    sdk.dispose().await.unwrap();
    assert_eq!(listing.await.unwrap().unwrap(), default_devices());
    assert_eq!(stub.release_calls(), 1);
}

#[tokio::test]
async fn test_configured_log_level_reaches_engine() {
    let stub = Arc::new(StubEngine::new());
    let config = SdkConfig {
        log_level: Some(LogLevel::Warning),
        ..SdkConfig::default()
    };
    let sdk = CommsSdk::with_engine(stub.clone(), config);

    sdk.init("valid-key").await.unwrap();
    assert_eq!(stub.log_level(), Some(2));

    sdk.set_log_level(LogLevel::Verbose).await.unwrap();
    assert_eq!(stub.log_level(), Some(5));
}

#[test]
fn test_drop_releases_engine() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to build test runtime");

    let stub = Arc::new(StubEngine::new());
    {
        let sdk = CommsSdk::with_engine(stub.clone(), SdkConfig::default());
        runtime.block_on(sdk.init("valid-key")).unwrap();
    }
    assert_eq!(stub.release_calls(), 1);
    assert!(!stub.is_initialized());
}

#[tokio::test]
async fn test_lifecycle_telemetry_stream() {
    let (stub, sdk) = stub_sdk();
    let stream = sdk.telemetry_stream();

    sdk.init("valid-key").await.unwrap();
    sdk.set_signaling_channel_error(|_| {}).await.unwrap();
    stub.fail_next("local_audio_start", codes::MEDIA_ENGINE, "no capture");
    let _ = sdk.audio().unwrap().local().start().await;
    sdk.dispose().await.unwrap();

    let kinds: Vec<TelemetryEventKind> = stream.take(4).map(|event| event.kind).collect().await;
    assert_eq!(
        kinds,
        vec![
            TelemetryEventKind::Initialized,
            TelemetryEventKind::HandlerRegistered {
                kind: EventKind::SignalingChannelError,
            },
            TelemetryEventKind::CallFailed {
                operation: "local_audio_start".to_string(),
                code: SdkErrorCodes::NATIVE_CALL_FAILURE,
            },
            TelemetryEventKind::Released,
        ]
    );

    let snapshot = sdk.telemetry_snapshot();
    assert_eq!(snapshot.total_events, 4);
    assert_eq!(snapshot.recent.len(), 4);
}
