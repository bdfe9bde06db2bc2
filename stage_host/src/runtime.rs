use std::{fs, path::Path};

use anyhow::{ensure, Context, Result};
use serde::Serialize;
use stage_engine::recording::{RecordingFactory, RecordingRenderer, ShownLine, VisualEvent};
use stage_engine::{
    demo_script, Actor, Director, FixedStep, FrameClock, Progress, Script, Slot, StageConfig,
    TimedEvent,
};

use crate::cli::Args;

type HeadlessDirector = Director<RecordingRenderer, RecordingFactory>;

#[derive(Debug, Serialize)]
struct ActorSample {
    name: String,
    template: String,
    slot: Slot,
    position: [f32; 2],
    dimmed: bool,
    entering: bool,
}

#[derive(Debug, Serialize)]
struct FrameSample {
    frame: u64,
    time: f32,
    panel_alpha: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    direction: Option<usize>,
    actors: Vec<ActorSample>,
}

#[derive(Serialize)]
struct EventLog<'a> {
    fps: u32,
    frames: u64,
    elapsed: f32,
    outcome: String,
    events: &'a [TimedEvent],
    lines: Vec<ShownLine>,
    visuals: Vec<VisualEvent>,
}

pub fn execute(args: Args) -> Result<()> {
    let Args {
        script,
        config,
        fps,
        max_frames,
        event_log_json,
        trace_json,
        verbose,
    } = args;

    ensure!(fps > 0, "--fps must be positive (got {fps})");

    let config =
        StageConfig::from_json_file(config.as_deref()).context("loading stage config")?;
    let script = match script.as_deref() {
        Some(path) => load_script(path)?,
        None => demo_script(),
    };
    println!("Playing {} directions at {fps} fps", script.len());

    let renderer = RecordingRenderer::new();
    let factory = RecordingFactory::new();
    let mut director = Director::new(config, renderer.clone(), factory.clone());
    director.start(script).context("starting cutscene")?;

    let mut clock = FixedStep::from_fps(fps);
    let mut samples = Vec::new();
    let mut printed = 0;
    let outcome = loop {
        if director.frame() >= max_frames {
            log::warn!("frame limit {max_frames} reached; cancelling cutscene");
            director.cancel();
            break Ok(Progress::Cancelled);
        }
        let result = director.tick(clock.next_delta());
        if trace_json.is_some() {
            samples.push(sample_frame(&director));
        }
        if verbose {
            for entry in &director.events()[printed..] {
                println!(
                    "  [{:>6} {:>7.3}s] {}",
                    entry.frame,
                    entry.time,
                    serde_json::to_string(&entry.event)
                        .context("serializing stage event")?
                );
            }
            printed = director.events().len();
        }
        match result {
            Ok(Progress::Running) => continue,
            other => break other,
        }
    };

    let outcome_label = match &outcome {
        Ok(Progress::Finished) => "finished".to_string(),
        Ok(Progress::Cancelled) => "cancelled".to_string(),
        Ok(progress) => format!("{progress:?}").to_lowercase(),
        Err(err) => format!("failed: {err}"),
    };

    if let Some(path) = event_log_json.as_ref() {
        let log = EventLog {
            fps,
            frames: director.frame(),
            elapsed: director.elapsed(),
            outcome: outcome_label.clone(),
            events: director.events(),
            lines: renderer.lines(),
            visuals: factory.events(),
        };
        write_json(path, &log, "stage event log")?;
        println!("Saved stage event log to {}", path.display());
    }

    if let Some(path) = trace_json.as_ref() {
        write_json(path, &samples, "frame trace")?;
        println!("Saved frame trace ({} frames) to {}", samples.len(), path.display());
    }

    println!(
        "Cutscene {outcome_label} after {} frames ({:.2}s): {} lines shown, {} actors on stage",
        director.frame(),
        director.elapsed(),
        renderer.lines().len(),
        director.actors().len()
    );

    outcome.context("cutscene script failed")?;
    Ok(())
}

fn load_script(path: &Path) -> Result<Script> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    let script: Script = serde_json::from_str(&raw)
        .with_context(|| format!("parsing script JSON {}", path.display()))?;
    Ok(script)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, what: &str) -> Result<()> {
    let json =
        serde_json::to_string_pretty(value).with_context(|| format!("serializing {what} to JSON"))?;
    fs::write(path, json).with_context(|| format!("writing {what} to {}", path.display()))
}

fn sample_actor(actor: &Actor, entering: bool) -> ActorSample {
    let position = actor.position();
    ActorSample {
        name: actor.name().to_string(),
        template: actor.template().to_string(),
        slot: actor.slot(),
        position: [position.x, position.y],
        dimmed: actor.is_dimmed(),
        entering,
    }
}

fn sample_frame(director: &HeadlessDirector) -> FrameSample {
    let mut actors: Vec<ActorSample> = director
        .actors()
        .iter()
        .map(|actor| sample_actor(actor, false))
        .collect();
    if let Some(actor) = director.entering_actor() {
        actors.push(sample_actor(actor, true));
    }
    FrameSample {
        frame: director.frame(),
        time: director.elapsed(),
        panel_alpha: director.panel().alpha,
        direction: director.current_direction(),
        actors,
    }
}
