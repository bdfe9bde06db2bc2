use thiserror::Error;

use crate::slots::Slot;

/// Script errors raised while a cutscene runs. Each one aborts the rest of
/// the script; whatever already happened on stage stays as it is.
///
/// `direction` is the zero-based position of the failing direction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CutsceneError {
    #[error("direction {direction}: there already exists an actor in the scene with name {name:?}")]
    DuplicateActor { direction: usize, name: String },
    #[error("direction {direction}: slot {slot} is already held by {occupant:?}")]
    SlotOccupied {
        direction: usize,
        slot: Slot,
        occupant: String,
    },
    #[error("direction {direction}: speaker {name:?} is not on stage")]
    UnknownSpeaker { direction: usize, name: String },
    #[error("direction {direction}: there exists no actor in the scene with name {name:?}")]
    UnknownActor { direction: usize, name: String },
    #[error("director is already running a script")]
    AlreadyStarted,
    #[error("frame clock stopped advancing at frame {frame}")]
    StalledClock { frame: u64 },
}

impl CutsceneError {
    pub fn direction(&self) -> Option<usize> {
        match self {
            CutsceneError::DuplicateActor { direction, .. }
            | CutsceneError::SlotOccupied { direction, .. }
            | CutsceneError::UnknownSpeaker { direction, .. }
            | CutsceneError::UnknownActor { direction, .. } => Some(*direction),
            CutsceneError::AlreadyStarted | CutsceneError::StalledClock { .. } => None,
        }
    }
}

/// Misuse of a [`DirectionBuilder`](crate::DirectionBuilder).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("builder describes no direction")]
    Empty,
    #[error("builder mixes {first} and {second} directions")]
    MixedKinds {
        first: &'static str,
        second: &'static str,
    },
    #[error("{0} was set twice on the same builder")]
    Repeated(&'static str),
    #[error("speaker set without a message")]
    SpeakerWithoutMessage,
    #[error("{0} needs a non-empty actor name")]
    EmptyName(&'static str),
}

/// A builder in a script failed to build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("direction {index}: {source}")]
pub struct ScriptError {
    pub index: usize,
    #[source]
    pub source: BuildError,
}
