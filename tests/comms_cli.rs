use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_comms_cli"))
}

fn parse_stdout(output: &std::process::Output) -> Value {
    let stdout = String::from_utf8(output.stdout.clone()).expect("stdout UTF-8");
    serde_json::from_str(&stdout).expect("stdout JSON")
}

#[test]
fn devices_lists_default_table() {
    let output = cli()
        .arg("devices")
        .output()
        .expect("failed to run comms_cli devices");
    assert!(
        output.status.success(),
        "CLI exited with {:?}",
        output.status.code()
    );

    let payload = parse_stdout(&output);
    let ids: Vec<&str> = payload["devices"]
        .as_array()
        .expect("devices array")
        .iter()
        .filter_map(|device| device["id"].as_str())
        .collect();
    assert_eq!(ids, ["dev1", "dev2"]);
    assert_eq!(payload["current_input"]["id"], "dev1");
    assert_eq!(payload["current_output"]["id"], "dev2");
}

#[test]
fn scenario_reports_refused_call_after_dispose() {
    let output = cli()
        .args(["scenario", "--conference", "standup"])
        .output()
        .expect("failed to run comms_cli scenario");
    assert!(
        output.status.success(),
        "CLI exited with {:?}",
        output.status.code()
    );

    let payload = parse_stdout(&output);
    assert_eq!(payload["selected_input_id"], "dev1");
    assert_eq!(payload["release_calls"], 1);
    assert_eq!(payload["after_dispose"]["code"], 3001);
    assert_eq!(payload["conference"]["conference"]["alias"], "standup");
    assert_eq!(payload["conference"]["conference"]["status"], "joined");
}

#[test]
fn config_file_seeds_stub_devices() {
    let path = std::env::temp_dir().join(format!("comms-cli-config-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{"stub_devices":[{"id":"usb","name":"USB Mic","direction":"input_and_output"}]}"#,
    )
    .expect("write config");

    let output = cli()
        .arg("--config")
        .arg(PathBuf::from(&path))
        .arg("devices")
        .output()
        .expect("failed to run comms_cli devices");
    let _ = std::fs::remove_file(&path);
    assert!(output.status.success());

    let payload = parse_stdout(&output);
    assert_eq!(payload["devices"][0]["id"], "usb");
    assert_eq!(payload["current_output"]["id"], "usb");
}

#[test]
fn events_prints_hotplug_sequence() {
    let output = cli()
        .arg("events")
        .output()
        .expect("failed to run comms_cli events");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let lines: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("JSON line"))
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["added"]["id"], "cli-headset");
    assert_eq!(lines[1]["removed"], "cli-headset");
    assert!(lines[2]["total_events"].as_u64().unwrap_or(0) >= 4);
}
