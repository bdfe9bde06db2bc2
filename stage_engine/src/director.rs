//! Frame-stepped scheduler that plays a [`Script`] against the stage.
//!
//! The director is a small state machine. Every suspension point (the panel
//! raise, an entrance, the hold after a line, an exit) is a [`Tween`] stored
//! in the current phase; [`Director::tick`] advances it by one frame and,
//! once it reports `t == 1`, finishes that direction and starts the next one
//! within the same frame. Directions never overlap.

use std::mem;

use glam::Vec2;

use crate::actors::{Actor, ActorFactory, ActorRegistry};
use crate::config::StageConfig;
use crate::direction::{Direction, Script};
use crate::error::CutsceneError;
use crate::events::{StageEvent, TimedEvent};
use crate::markup;
use crate::panel::{DialoguePanel, DialogueRenderer};
use crate::slots::{Slot, SlotRegistry};
use crate::tween::{self, Curve, FrameClock, Tween};

/// Result of a single [`Director::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// No script has been started.
    Idle,
    /// A direction (or the panel raise) is still in progress.
    Running,
    Finished,
    Cancelled,
}

#[derive(Debug)]
struct Entrance {
    direction: usize,
    actor: Actor,
    from: Vec2,
    to: Vec2,
    tween: Tween,
}

#[derive(Debug)]
struct Hold {
    direction: usize,
    dimmed: Vec<String>,
    tween: Tween,
}

#[derive(Debug)]
struct Exit {
    direction: usize,
    name: String,
    from: Vec2,
    to: Vec2,
    tween: Tween,
}

#[derive(Debug)]
enum Phase {
    Idle,
    RaisingPanel(Tween),
    /// Between directions; the next tick picks up `cursor`.
    Ready,
    Entering(Entrance),
    Holding(Hold),
    Leaving(Exit),
    Finished,
    Cancelled,
    Failed(CutsceneError),
}

/// Completion state of the phase advanced this frame.
enum Step {
    Suspended(Phase),
    Complete,
}

pub struct Director<R, F> {
    config: StageConfig,
    renderer: R,
    factory: F,
    slots: SlotRegistry,
    actors: ActorRegistry,
    panel: DialoguePanel,
    script: Script,
    cursor: usize,
    phase: Phase,
    frame: u64,
    time: f32,
    events: Vec<TimedEvent>,
}

impl<R, F> Director<R, F> {
    /// Destroys every actor the director still owns, including one that is
    /// mid-entrance, and frees their slots.
    fn release_actors(&mut self) {
        if let Phase::Entering(step) = mem::replace(&mut self.phase, Phase::Idle) {
            step.actor.destroy();
        }
        for actor in self.actors.drain() {
            actor.destroy();
        }
        self.slots.clear();
    }
}

impl<R, F> Drop for Director<R, F> {
    fn drop(&mut self) {
        self.release_actors();
    }
}

impl<R, F> Director<R, F>
where
    R: DialogueRenderer,
    F: ActorFactory,
{
    pub fn new(config: StageConfig, renderer: R, factory: F) -> Self {
        let slots = SlotRegistry::from_layout(&config.layout);
        let panel = DialoguePanel::hidden(&config.layout);
        Self {
            config,
            renderer,
            factory,
            slots,
            actors: ActorRegistry::new(),
            panel,
            script: Script::default(),
            cursor: 0,
            phase: Phase::Idle,
            frame: 0,
            time: 0.0,
            events: Vec::new(),
        }
    }

    pub fn actors(&self) -> &ActorRegistry {
        &self.actors
    }

    pub fn slots(&self) -> &SlotRegistry {
        &self.slots
    }

    pub fn panel(&self) -> &DialoguePanel {
        &self.panel
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    /// Frames ticked since the script started.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Clock time accumulated since the script started.
    pub fn elapsed(&self) -> f32 {
        self.time
    }

    /// Index of the direction currently suspended, if any.
    pub fn current_direction(&self) -> Option<usize> {
        match &self.phase {
            Phase::Entering(step) => Some(step.direction),
            Phase::Holding(step) => Some(step.direction),
            Phase::Leaving(step) => Some(step.direction),
            _ => None,
        }
    }

    /// Actor currently sliding onto the stage; not yet in the registry.
    pub fn entering_actor(&self) -> Option<&Actor> {
        match &self.phase {
            Phase::Entering(step) => Some(&step.actor),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        !matches!(
            self.phase,
            Phase::Idle | Phase::Finished | Phase::Cancelled | Phase::Failed(_)
        )
    }

    /// Arms the director with `script`. Nothing moves until the first tick,
    /// which begins raising the dialogue panel.
    pub fn start(&mut self, script: Script) -> Result<(), CutsceneError> {
        if !matches!(self.phase, Phase::Idle) {
            return Err(CutsceneError::AlreadyStarted);
        }
        log::info!("cutscene start ({} directions)", script.len());
        self.script = script;
        self.cursor = 0;
        self.frame = 0;
        self.time = 0.0;
        self.phase = Phase::RaisingPanel(Tween::new(self.config.timings.panel_raise));
        Ok(())
    }

    /// Plays `script` to completion, pulling frame deltas from `clock`.
    ///
    /// A delta that is not finite and positive would never finish a tween,
    /// so it stops the cutscene with [`CutsceneError::StalledClock`]. The
    /// stalled frame is treated like a cancel before the failure is recorded.
    pub fn run<C: FrameClock>(
        &mut self,
        script: Script,
        clock: &mut C,
    ) -> Result<(), CutsceneError> {
        self.start(script)?;
        loop {
            let dt = clock.next_delta();
            if !tween::is_advancing(dt) {
                log::warn!("frame clock reported delta {dt} at frame {}", self.frame);
                let frame = self.frame;
                self.abandon_phase(Phase::Ready);
                return Err(self.fail(CutsceneError::StalledClock { frame }));
            }
            match self.tick(dt)? {
                Progress::Running => continue,
                Progress::Idle | Progress::Finished | Progress::Cancelled => return Ok(()),
            }
        }
    }

    /// Advances the cutscene by one frame of `dt` clock time.
    ///
    /// After a failure every further tick reports the same error.
    pub fn tick(&mut self, dt: f32) -> Result<Progress, CutsceneError> {
        match &self.phase {
            Phase::Idle => return Ok(Progress::Idle),
            Phase::Finished => return Ok(Progress::Finished),
            Phase::Cancelled => return Ok(Progress::Cancelled),
            Phase::Failed(err) => return Err(err.clone()),
            _ => {}
        }

        self.frame += 1;
        self.time += dt.max(0.0);

        loop {
            let phase = match mem::replace(&mut self.phase, Phase::Ready) {
                Phase::Ready => match self.begin_next() {
                    Ok(Some(phase)) => phase,
                    Ok(None) => {
                        log::info!("cutscene finished after {} frames", self.frame);
                        self.record(StageEvent::Finished);
                        self.phase = Phase::Finished;
                        return Ok(Progress::Finished);
                    }
                    Err(err) => return Err(self.fail(err)),
                },
                phase => phase,
            };

            match self.advance(phase, dt) {
                Step::Suspended(phase) => {
                    self.phase = phase;
                    return Ok(Progress::Running);
                }
                Step::Complete => continue,
            }
        }
    }

    /// Stops the cutscene where it stands.
    ///
    /// An actor still entering is destroyed since it never reached the
    /// registry; dimmed actors are restored. Actors already on stage stay.
    /// That includes an actor cancelled mid-exit: it stays registered and
    /// keeps its slot, frozen wherever the exit left it.
    pub fn cancel(&mut self) {
        if !self.is_running() {
            return;
        }
        let direction = self.current_direction();
        self.abandon_phase(Phase::Cancelled);
        log::warn!("cutscene cancelled at direction {direction:?}");
        self.record(StageEvent::Cancelled { direction });
    }

    /// Returns the director to its initial state, destroying every actor.
    /// Dropping the director releases the actors the same way.
    pub fn reset(&mut self) {
        self.release_actors();
        self.panel = DialoguePanel::hidden(&self.config.layout);
        self.script = Script::default();
        self.cursor = 0;
        self.frame = 0;
        self.time = 0.0;
        self.events.clear();
    }

    fn begin_next(&mut self) -> Result<Option<Phase>, CutsceneError> {
        let index = self.cursor;
        let Some(direction) = self.script.get(index).cloned() else {
            return Ok(None);
        };
        self.cursor += 1;
        log::debug!("direction {index}: {}", direction.kind());

        let phase = match direction {
            Direction::Introduce {
                slot,
                template,
                name,
            } => self.begin_entrance(index, slot, &template, name)?,
            Direction::Message { speaker, text } => {
                self.begin_line(index, speaker.as_deref(), &text)?
            }
            Direction::Remove { name } => self.begin_exit(index, name)?,
        };
        Ok(Some(phase))
    }

    fn begin_entrance(
        &mut self,
        direction: usize,
        slot: Slot,
        template: &str,
        name: String,
    ) -> Result<Phase, CutsceneError> {
        if self.actors.contains(&name) {
            return Err(CutsceneError::DuplicateActor { direction, name });
        }
        if let Some(occupant) = self.slots.occupant(slot) {
            return Err(CutsceneError::SlotOccupied {
                direction,
                slot,
                occupant: occupant.to_string(),
            });
        }

        let to = self.slots.resolve_anchor(slot);
        let from = self.slots.offstage(slot.side(), to.y);
        let visual = self.factory.spawn(template, &name);
        let actor = Actor::new(name, template.to_string(), slot, from, visual);
        Ok(Phase::Entering(Entrance {
            direction,
            actor,
            from,
            to,
            tween: Tween::new(self.config.timings.enter),
        }))
    }

    fn begin_line(
        &mut self,
        direction: usize,
        speaker: Option<&str>,
        text: &str,
    ) -> Result<Phase, CutsceneError> {
        let mut slot = None;
        let mut dimmed = Vec::new();
        if let Some(name) = speaker {
            let Some(actor) = self.actors.find(name) else {
                return Err(CutsceneError::UnknownSpeaker {
                    direction,
                    name: name.to_string(),
                });
            };
            slot = Some(actor.slot());
            for other in self.actors.names() {
                if other != name {
                    self.actors.set_dimmed(&other, true);
                    dimmed.push(other);
                }
            }
        }

        let markup_issues = markup::check_balance(text);
        for issue in &markup_issues {
            log::warn!("direction {direction}: {issue}");
        }

        self.renderer.show_line(slot, speaker, text);
        self.record(StageEvent::LineShown {
            direction,
            speaker: speaker.map(|name| name.to_string()),
            slot,
            text: text.to_string(),
            dimmed: dimmed.clone(),
            markup_issues,
        });

        Ok(Phase::Holding(Hold {
            direction,
            dimmed,
            tween: Tween::new(self.config.timings.message_hold),
        }))
    }

    fn begin_exit(&mut self, direction: usize, name: String) -> Result<Phase, CutsceneError> {
        let Some(actor) = self.actors.find(&name) else {
            return Err(CutsceneError::UnknownActor { direction, name });
        };
        let position = actor.position();
        let anchor = self.slots.resolve_anchor(actor.slot());
        let from = Vec2::new(position.x, anchor.y);
        let to = self.slots.offstage(actor.slot().side(), position.y);
        Ok(Phase::Leaving(Exit {
            direction,
            name,
            from,
            to,
            tween: Tween::new(self.config.timings.leave),
        }))
    }

    fn advance(&mut self, phase: Phase, dt: f32) -> Step {
        match phase {
            Phase::RaisingPanel(mut tween) => {
                let t = tween.advance(dt).unwrap_or(1.0);
                self.panel.apply_raise(&self.config.layout, t);
                self.renderer.update_panel(&self.panel);
                if t < 1.0 {
                    return Step::Suspended(Phase::RaisingPanel(tween));
                }
                self.record(StageEvent::PanelRaised);
                Step::Complete
            }
            Phase::Entering(mut step) => {
                let t = step.tween.advance(dt).unwrap_or(1.0);
                step.actor
                    .move_to(Curve::SmoothStep.position(step.from, step.to, t));
                if t < 1.0 {
                    return Step::Suspended(Phase::Entering(step));
                }
                let Entrance {
                    direction, actor, ..
                } = step;
                let (name, slot) = (actor.name().to_string(), actor.slot());
                self.slots.occupy(slot, &name);
                self.actors.add(actor);
                log::debug!("direction {direction}: {name} entered at {slot}");
                self.record(StageEvent::ActorEntered {
                    direction,
                    name,
                    slot,
                });
                Step::Complete
            }
            Phase::Holding(mut step) => {
                let t = step.tween.advance(dt).unwrap_or(1.0);
                if t < 1.0 {
                    return Step::Suspended(Phase::Holding(step));
                }
                let names = self.actors.names();
                self.undim(&names);
                self.record(StageEvent::LineCleared {
                    direction: step.direction,
                });
                Step::Complete
            }
            Phase::Leaving(mut step) => {
                let t = step.tween.advance(dt).unwrap_or(1.0);
                let position = Curve::EaseIn.position(step.from, step.to, t);
                if let Some(actor) = self.actors.find_mut(&step.name) {
                    actor.move_to(position);
                }
                if t < 1.0 {
                    return Step::Suspended(Phase::Leaving(step));
                }
                if let Some(actor) = self.actors.remove(&step.name) {
                    let slot = actor.slot();
                    self.slots.vacate(slot);
                    actor.destroy();
                    log::debug!("direction {}: {} left from {slot}", step.direction, step.name);
                    self.record(StageEvent::ActorLeft {
                        direction: step.direction,
                        name: step.name,
                        slot,
                    });
                }
                Step::Complete
            }
            phase @ (Phase::Idle
            | Phase::Ready
            | Phase::Finished
            | Phase::Cancelled
            | Phase::Failed(_)) => Step::Suspended(phase),
        }
    }

    /// Leaves the current phase for `next`, undoing what only the abandoned
    /// step holds.
    fn abandon_phase(&mut self, next: Phase) {
        match mem::replace(&mut self.phase, next) {
            Phase::Entering(step) => step.actor.destroy(),
            Phase::Holding(step) => self.undim(&step.dimmed),
            _ => {}
        }
    }

    fn undim(&mut self, names: &[String]) {
        for name in names {
            self.actors.set_dimmed(name, false);
        }
    }

    fn fail(&mut self, err: CutsceneError) -> CutsceneError {
        log::error!("cutscene aborted: {err}");
        self.record(StageEvent::Failed {
            direction: err.direction(),
            error: err.to_string(),
        });
        self.phase = Phase::Failed(err.clone());
        err
    }

    fn record(&mut self, event: StageEvent) {
        self.events.push(TimedEvent {
            frame: self.frame,
            time: self.time,
            event,
        });
    }
}
