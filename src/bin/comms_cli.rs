use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comms_sdk::{
    AudioDevice, CommsSdk, ConferenceOptions, DeviceDirection, ErrorCode, JoinOptions,
    NativeEngine, SdkConfig, SdkError, StubEngine, UserInfo,
};
use serde::Serialize;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(
    name = "comms_cli",
    about = "Drive the comms SDK against the in-process stub engine"
)]
struct Cli {
    /// JSON configuration file (log level, telemetry buffer, stub devices)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Application key passed to init
    #[arg(long, default_value = "demo-app-key")]
    app_key: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List audio devices and the current input/output
    Devices,
    /// Init, pick the first input device, dispose, then show a gated call failing
    Scenario {
        /// Also open a session and join a conference with this alias
        #[arg(long)]
        conference: Option<String>,
    },
    /// Register device handlers, hot-plug a device from another thread and print events
    Events,
}

#[derive(Serialize)]
struct FailureReport {
    operation: &'static str,
    code: i32,
    message: String,
}

impl FailureReport {
    fn new(operation: &'static str, err: &SdkError) -> Self {
        Self {
            operation,
            code: err.code(),
            message: err.to_string(),
        }
    }
}

fn main() -> ExitCode {
    // stdout carries the JSON report; logs go to stderr.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli
        .config
        .map(SdkConfig::load_from_file)
        .unwrap_or_default();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(async move {
        match cli.command {
            Commands::Devices => run_devices(config, &cli.app_key).await,
            Commands::Scenario { conference } => {
                run_scenario(config, &cli.app_key, conference).await
            }
            Commands::Events => run_events(config, &cli.app_key).await,
        }
    })
}

fn stub_sdk(config: SdkConfig) -> (Arc<StubEngine>, CommsSdk) {
    let stub = Arc::new(StubEngine::with_devices(config.stub_devices.clone()));
    let engine: Arc<dyn NativeEngine> = stub.clone();
    (stub, CommsSdk::with_engine(engine, config))
}

async fn run_devices(config: SdkConfig, app_key: &str) -> Result<ExitCode> {
    let (_stub, sdk) = stub_sdk(config);
    sdk.init(app_key).await.context("initializing SDK")?;

    let media = sdk.media_device()?;
    let devices = media.audio_devices().await.context("listing devices")?;
    let input = media.current_audio_input_device().await.ok();
    let output = media.current_audio_output_device().await.ok();

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "devices": devices,
            "current_input": input,
            "current_output": output,
        }))?
    );

    sdk.dispose().await.context("disposing SDK")?;
    Ok(ExitCode::from(0))
}

async fn run_scenario(
    config: SdkConfig,
    app_key: &str,
    conference: Option<String>,
) -> Result<ExitCode> {
    let (stub, sdk) = stub_sdk(config);
    sdk.init(app_key).await.context("initializing SDK")?;

    let media = sdk.media_device()?;
    let devices = media.audio_devices().await.context("listing devices")?;
    let preferred = devices
        .iter()
        .find(|device| device.direction.is_input())
        .cloned();
    if let Some(device) = &preferred {
        media
            .set_preferred_audio_input_device(device)
            .await
            .with_context(|| format!("selecting input {}", device.id))?;
    }

    let joined = match conference {
        Some(alias) => Some(join_and_leave(&sdk, alias).await?),
        None => None,
    };

    sdk.dispose().await.context("disposing SDK")?;

    // The service handle outlives the engine; every call must now be refused.
    let after_dispose = match media.audio_devices().await {
        Ok(devices) => {
            eprintln!("audio_devices succeeded after dispose: {devices:?}");
            return Ok(ExitCode::from(2));
        }
        Err(err) => FailureReport::new("audio_devices", &err),
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "devices": devices,
            "preferred_input": preferred,
            "selected_input_id": stub.current_input_id(),
            "conference": joined,
            "release_calls": stub.release_calls(),
            "after_dispose": after_dispose,
            "telemetry": sdk.telemetry_snapshot(),
        }))?
    );
    Ok(ExitCode::from(0))
}

async fn join_and_leave(sdk: &CommsSdk, alias: String) -> Result<serde_json::Value> {
    let user = sdk
        .session()?
        .open(UserInfo::named("comms-cli"))
        .await
        .context("opening session")?;

    let conferences = sdk.conference()?;
    let created = conferences
        .create(ConferenceOptions {
            alias,
            ..ConferenceOptions::default()
        })
        .await
        .context("creating conference")?;
    let joined = conferences
        .join(&created, JoinOptions::default())
        .await
        .context("joining conference")?;

    sdk.audio()?.local().start().await.context("starting local audio")?;
    let participants = conferences
        .participants()
        .await
        .context("listing participants")?;

    conferences.leave().await.context("leaving conference")?;
    sdk.session()?.close().await.context("closing session")?;

    Ok(json!({
        "user": user,
        "conference": joined,
        "participants": participants,
    }))
}

async fn run_events(config: SdkConfig, app_key: &str) -> Result<ExitCode> {
    let (stub, sdk) = stub_sdk(config);
    sdk.init(app_key).await.context("initializing SDK")?;

    let received: Arc<Mutex<Vec<serde_json::Value>>> = Arc::default();
    let media = sdk.media_device()?;
    {
        let received = Arc::clone(&received);
        media
            .set_added(move |device| push(&received, json!({ "added": device })))
            .await?;
    }
    {
        let received = Arc::clone(&received);
        media
            .set_removed(move |id| push(&received, json!({ "removed": id })))
            .await?;
    }

    let headset = AudioDevice::new("cli-headset", "CLI Headset", DeviceDirection::InputAndOutput);
    let plugger = Arc::clone(&stub);
    std::thread::spawn(move || {
        plugger.plug_device(headset);
        plugger.unplug_device("cli-headset");
    })
    .join()
    .map_err(|_| anyhow::anyhow!("event thread panicked"))?;

    let events = received
        .lock()
        .map_err(|_| anyhow::anyhow!("event log poisoned"))?
        .clone();
    for event in &events {
        println!("{}", serde_json::to_string(event)?);
    }

    sdk.dispose().await.context("disposing SDK")?;
    println!("{}", serde_json::to_string(&sdk.telemetry_snapshot())?);
    Ok(ExitCode::from(0))
}

fn push(received: &Mutex<Vec<serde_json::Value>>, event: serde_json::Value) {
    if let Ok(mut events) = received.lock() {
        events.push(event);
    }
}
