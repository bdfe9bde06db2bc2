use serde::{Deserialize, Serialize};

use crate::error::{BuildError, ScriptError};
use crate::slots::Slot;

/// One scripted stage instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Direction {
    /// Bring a new actor on stage from the edge nearest `slot`.
    Introduce {
        slot: Slot,
        template: String,
        name: String,
    },
    /// Show a line; without a speaker it is narration and nobody is dimmed.
    Message {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        speaker: Option<String>,
        text: String,
    },
    /// Send an actor off stage on the side they stand on.
    Remove { name: String },
}

impl Direction {
    pub fn introduce(slot: Slot, template: impl Into<String>, name: impl Into<String>) -> Self {
        Direction::Introduce {
            slot,
            template: template.into(),
            name: name.into(),
        }
    }

    pub fn message(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        let speaker = speaker.into();
        Direction::Message {
            speaker: (!speaker.is_empty()).then_some(speaker),
            text: text.into(),
        }
    }

    pub fn narration(text: impl Into<String>) -> Self {
        Direction::Message {
            speaker: None,
            text: text.into(),
        }
    }

    pub fn remove(name: impl Into<String>) -> Self {
        Direction::Remove { name: name.into() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Direction::Introduce { .. } => "introduce",
            Direction::Message { .. } => "message",
            Direction::Remove { .. } => "remove",
        }
    }
}

const INTRODUCE: &str = "introduce";
const MESSAGE: &str = "message";
const LEAVER: &str = "leaver";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Newcomer {
    slot: Slot,
    template: String,
    name: String,
}

/// Fluent builder for a single [`Direction`].
///
/// Each builder describes exactly one direction: an entrance, a line (with
/// an optional speaker), or a departure. Mixing kinds is reported by
/// [`build`](DirectionBuilder::build) rather than silently resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct DirectionBuilder {
    newcomer: Option<Newcomer>,
    message: Option<String>,
    speaker: Option<String>,
    leaver: Option<String>,
    repeated: Option<&'static str>,
}

impl DirectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn introduce_actor(
        mut self,
        slot: Slot,
        template: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.note_repeat(self.newcomer.is_some(), INTRODUCE);
        self.newcomer = Some(Newcomer {
            slot,
            template: template.into(),
            name: name.into(),
        });
        self
    }

    pub fn set_message(mut self, text: impl Into<String>) -> Self {
        self.note_repeat(self.message.is_some(), MESSAGE);
        self.message = Some(text.into());
        self
    }

    /// An empty speaker name means narration.
    pub fn set_speaker(mut self, name: impl Into<String>) -> Self {
        self.note_repeat(self.speaker.is_some(), "speaker");
        self.speaker = Some(name.into());
        self
    }

    pub fn add_leaver(mut self, name: impl Into<String>) -> Self {
        self.note_repeat(self.leaver.is_some(), LEAVER);
        self.leaver = Some(name.into());
        self
    }

    fn note_repeat(&mut self, already_set: bool, what: &'static str) {
        if already_set && self.repeated.is_none() {
            self.repeated = Some(what);
        }
    }

    pub fn build(self) -> Result<Direction, BuildError> {
        if let Some(what) = self.repeated {
            return Err(BuildError::Repeated(what));
        }

        let kinds: Vec<&'static str> = [
            self.newcomer.as_ref().map(|_| INTRODUCE),
            self.message.as_ref().map(|_| MESSAGE),
            self.leaver.as_ref().map(|_| LEAVER),
        ]
        .into_iter()
        .flatten()
        .collect();
        if let [first, second, ..] = kinds[..] {
            return Err(BuildError::MixedKinds { first, second });
        }
        if self.speaker.is_some() && self.message.is_none() {
            return Err(BuildError::SpeakerWithoutMessage);
        }

        if let Some(newcomer) = self.newcomer {
            if newcomer.name.is_empty() {
                return Err(BuildError::EmptyName(INTRODUCE));
            }
            return Ok(Direction::Introduce {
                slot: newcomer.slot,
                template: newcomer.template,
                name: newcomer.name,
            });
        }
        if let Some(text) = self.message {
            return Ok(Direction::message(self.speaker.unwrap_or_default(), text));
        }
        match self.leaver {
            Some(name) if name.is_empty() => Err(BuildError::EmptyName(LEAVER)),
            Some(name) => Ok(Direction::Remove { name }),
            None => Err(BuildError::Empty),
        }
    }
}

/// Ordered list of directions, fully built before anything plays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    directions: Vec<Direction>,
}

impl Script {
    pub fn new(directions: Vec<Direction>) -> Self {
        Self { directions }
    }

    /// Builds every builder in order; the first failure is reported with its
    /// position.
    pub fn from_builders<I>(builders: I) -> Result<Self, ScriptError>
    where
        I: IntoIterator<Item = DirectionBuilder>,
    {
        builders
            .into_iter()
            .enumerate()
            .map(|(index, builder)| {
                builder
                    .build()
                    .map_err(|source| ScriptError { index, source })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    pub fn get(&self, index: usize) -> Option<&Direction> {
        self.directions.get(index)
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Direction> {
        self.directions.iter()
    }
}

/// The rooftop scene: two friends talk, one leaves, two more arrive.
pub fn demo_script() -> Script {
    const TEMPLATE: &str = "actor";
    Script::new(vec![
        Direction::introduce(Slot::FarLeft, TEMPLATE, "J*n"),
        Direction::introduce(Slot::FarRight, TEMPLATE, "L*za"),
        Direction::message("L*za", "I wanna show you something."),
        Direction::message("L*za", "It's a little...<s><r>unconventional</r></s>."),
        Direction::message("J*n", "Is it...<s>illegal</s>?"),
        Direction::remove("L*za"),
        Direction::introduce(Slot::Left, TEMPLATE, "H*race"),
        Direction::introduce(Slot::Right, TEMPLATE, "C*risse"),
        Direction::message(
            "J*n",
            "Would you believe I'm actually from <w><r>Earth</r></w>?",
        ),
        Direction::remove("H*race"),
        Direction::remove("J*n"),
        Direction::remove("C*risse"),
    ])
}
