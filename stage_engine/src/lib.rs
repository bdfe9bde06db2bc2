//! Stage cutscene engine.
//!
//! Plays an ordered script of stage directions (introduce an actor, show a
//! line of dialogue, send an actor off stage) against a small scene made of
//! four anchor slots. Transitions are animated by frame-driven tweens and the
//! [`Director`] advances one frame at a time, so a host can embed it in any
//! render loop without threads or coroutines.

pub mod actors;
pub mod config;
pub mod direction;
pub mod director;
pub mod error;
pub mod events;
pub mod markup;
pub mod panel;
pub mod recording;
pub mod slots;
pub mod tween;

pub use actors::{Actor, ActorFactory, ActorRegistry, ActorVisual};
pub use config::{ConfigError, StageConfig, StageLayout, Timings};
pub use direction::{demo_script, Direction, DirectionBuilder, Script};
pub use director::{Director, Progress};
pub use error::{BuildError, CutsceneError, ScriptError};
pub use events::{StageEvent, TimedEvent};
pub use panel::{DialoguePanel, DialogueRenderer};
pub use slots::{Side, Slot, SlotRegistry};
pub use tween::{FixedStep, FrameClock, Tween};
