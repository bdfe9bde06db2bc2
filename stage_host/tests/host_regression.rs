use std::fs;
use std::path::Path;
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};
use serde_json::Value;
use tempfile::tempdir;

fn run_host(args: &[&str]) -> Result<ExitStatus> {
    Command::new(env!("CARGO_BIN_EXE_stage_host"))
        .args(args)
        .status()
        .context("executing stage_host")
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn count_events(log: &Value, kind: &str) -> usize {
    log["events"]
        .as_array()
        .map(|events| events.iter().filter(|event| event["event"] == kind).count())
        .unwrap_or(0)
}

#[test]
fn demo_script_plays_to_the_end() -> Result<()> {
    let temp_dir = tempdir().context("creating temporary directory")?;
    let log_path = temp_dir.path().join("events.json");
    let trace_path = temp_dir.path().join("trace.json");

    let status = run_host(&[
        "--fps",
        "30",
        "--event-log-json",
        log_path.to_str().context("log path is not valid UTF-8")?,
        "--trace-json",
        trace_path.to_str().context("trace path is not valid UTF-8")?,
    ])?;
    assert!(status.success(), "stage_host exited with {status:?}");

    let log = read_json(&log_path)?;
    assert_eq!(log["outcome"], "finished");
    assert_eq!(count_events(&log, "panel_raised"), 1);
    assert_eq!(count_events(&log, "actor_entered"), 4);
    assert_eq!(count_events(&log, "line_shown"), 4);
    assert_eq!(count_events(&log, "line_cleared"), 4);
    assert_eq!(count_events(&log, "actor_left"), 4);
    assert_eq!(count_events(&log, "finished"), 1);
    assert_eq!(log["lines"].as_array().map(Vec::len), Some(4));

    // 0.75s panel, 8 one-second moves and 4 five-second holds.
    let elapsed = log["elapsed"].as_f64().context("elapsed is a number")?;
    assert!((28.7..29.5).contains(&elapsed), "elapsed {elapsed}");

    let trace = read_json(&trace_path)?;
    let frames = trace.as_array().context("trace is an array")?;
    assert_eq!(Some(frames.len() as u64), log["frames"].as_u64());
    let last = frames.last().context("trace has frames")?;
    assert_eq!(last["actors"].as_array().map(Vec::len), Some(0));
    let sampled_template = frames
        .iter()
        .filter_map(|frame| frame["actors"].as_array())
        .flatten()
        .find_map(|actor| actor["template"].as_str());
    assert_eq!(sampled_template, Some("actor"));
    Ok(())
}

#[test]
fn slot_conflict_exits_with_failure() -> Result<()> {
    let temp_dir = tempdir().context("creating temporary directory")?;
    let script_path = temp_dir.path().join("script.json");
    let log_path = temp_dir.path().join("events.json");
    fs::write(
        &script_path,
        r#"[
            {"kind": "introduce", "slot": "left", "template": "actor", "name": "A"},
            {"kind": "introduce", "slot": "left", "template": "actor", "name": "B"}
        ]"#,
    )
    .context("writing script")?;

    let status = run_host(&[
        "--script",
        script_path.to_str().context("script path is not valid UTF-8")?,
        "--event-log-json",
        log_path.to_str().context("log path is not valid UTF-8")?,
    ])?;
    assert!(!status.success(), "slot conflict should fail the run");

    let log = read_json(&log_path)?;
    let outcome = log["outcome"].as_str().context("outcome is a string")?;
    assert!(outcome.starts_with("failed"), "outcome {outcome}");
    assert_eq!(count_events(&log, "actor_entered"), 1);
    let failed = log["events"]
        .as_array()
        .and_then(|events| events.last())
        .context("events recorded")?;
    assert_eq!(failed["event"], "failed");
    assert_eq!(failed["direction"], 1);
    Ok(())
}

#[test]
fn config_timings_shape_the_timeline() -> Result<()> {
    let temp_dir = tempdir().context("creating temporary directory")?;
    let config_path = temp_dir.path().join("stage.json");
    let log_path = temp_dir.path().join("events.json");
    fs::write(
        &config_path,
        r#"{"timings": {"panel_raise": 0, "enter": 0, "message_hold": 0, "leave": 0}}"#,
    )
    .context("writing config")?;

    let status = run_host(&[
        "--config",
        config_path.to_str().context("config path is not valid UTF-8")?,
        "--event-log-json",
        log_path.to_str().context("log path is not valid UTF-8")?,
    ])?;
    assert!(status.success(), "stage_host exited with {status:?}");

    let log = read_json(&log_path)?;
    assert_eq!(log["outcome"], "finished");
    assert_eq!(log["frames"], 1);
    Ok(())
}

#[test]
fn rejects_zero_fps() -> Result<()> {
    let status = run_host(&["--fps", "0"])?;
    assert!(!status.success());
    Ok(())
}
