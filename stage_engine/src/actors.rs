use std::fmt;

use glam::Vec2;

use crate::slots::Slot;

/// Visual representation of an actor, owned by the host renderer.
pub trait ActorVisual {
    fn set_position(&mut self, position: Vec2);
    fn set_dimmed(&mut self, dimmed: bool);
    /// Releases the visual once the actor has left the stage.
    fn destroy(self: Box<Self>);
}

/// Produces a fresh visual for each actor a script introduces.
pub trait ActorFactory {
    fn spawn(&mut self, template: &str, name: &str) -> Box<dyn ActorVisual>;
}

/// An actor standing on (or moving across) the stage.
pub struct Actor {
    name: String,
    template: String,
    slot: Slot,
    position: Vec2,
    dimmed: bool,
    visual: Box<dyn ActorVisual>,
}

impl Actor {
    pub(crate) fn new(
        name: String,
        template: String,
        slot: Slot,
        position: Vec2,
        mut visual: Box<dyn ActorVisual>,
    ) -> Self {
        visual.set_position(position);
        Self {
            name,
            template,
            slot,
            position,
            dimmed: false,
            visual,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_dimmed(&self) -> bool {
        self.dimmed
    }

    pub(crate) fn move_to(&mut self, position: Vec2) {
        self.position = position;
        self.visual.set_position(position);
    }

    pub(crate) fn set_dimmed(&mut self, dimmed: bool) {
        if self.dimmed != dimmed {
            self.dimmed = dimmed;
            self.visual.set_dimmed(dimmed);
        }
    }

    pub(crate) fn destroy(self) {
        self.visual.destroy();
    }
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("name", &self.name)
            .field("template", &self.template)
            .field("slot", &self.slot)
            .field("position", &self.position)
            .field("dimmed", &self.dimmed)
            .finish_non_exhaustive()
    }
}

/// Actors currently present on stage, in the order they arrived.
///
/// Names are expected to be unique; the director checks that before
/// calling [`add`](ActorRegistry::add).
#[derive(Debug, Default)]
pub struct ActorRegistry {
    actors: Vec<Actor>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, name: &str) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.name == name)
    }

    pub(crate) fn find_mut(&mut self, name: &str) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|actor| actor.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub(crate) fn add(&mut self, actor: Actor) {
        debug_assert!(!self.contains(&actor.name), "duplicate actor {}", actor.name);
        self.actors.push(actor);
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Actor> {
        let index = self.actors.iter().position(|actor| actor.name == name)?;
        Some(self.actors.remove(index))
    }

    /// Returns `false` when no actor with that name is present.
    pub(crate) fn set_dimmed(&mut self, name: &str, dimmed: bool) -> bool {
        match self.find_mut(name) {
            Some(actor) => {
                actor.set_dimmed(dimmed);
                true
            }
            None => false,
        }
    }

    /// Snapshot of present names, in arrival order.
    pub fn names(&self) -> Vec<String> {
        self.actors.iter().map(|actor| actor.name.clone()).collect()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Actor> {
        self.actors.iter()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub(crate) fn drain(&mut self) -> Vec<Actor> {
        std::mem::take(&mut self.actors)
    }
}
