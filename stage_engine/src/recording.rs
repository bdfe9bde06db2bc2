//! Headless collaborators that record what the director asks of them.
//!
//! Clones share the same log, so a host can hand one clone to the
//! [`Director`](crate::Director) and keep another to inspect afterwards.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use glam::Vec2;
use serde::Serialize;

use crate::actors::{ActorFactory, ActorVisual};
use crate::panel::{DialoguePanel, DialogueRenderer};
use crate::slots::Slot;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisualEvent {
    Spawned { name: String, template: String },
    Dimmed { name: String, dimmed: bool },
    Destroyed { name: String },
}

#[derive(Debug, Default)]
struct VisualLog {
    events: Vec<VisualEvent>,
    positions: BTreeMap<String, Vec2>,
}

#[derive(Clone, Default)]
pub struct RecordingFactory {
    log: Rc<RefCell<VisualLog>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<VisualEvent> {
        self.log.borrow().events.clone()
    }

    /// Last position pushed to a live visual.
    pub fn position_of(&self, name: &str) -> Option<Vec2> {
        self.log.borrow().positions.get(name).copied()
    }

    pub fn live_visuals(&self) -> Vec<String> {
        self.log.borrow().positions.keys().cloned().collect()
    }
}

impl ActorFactory for RecordingFactory {
    fn spawn(&mut self, template: &str, name: &str) -> Box<dyn ActorVisual> {
        self.log.borrow_mut().events.push(VisualEvent::Spawned {
            name: name.to_string(),
            template: template.to_string(),
        });
        Box::new(RecordingVisual {
            name: name.to_string(),
            log: Rc::clone(&self.log),
        })
    }
}

struct RecordingVisual {
    name: String,
    log: Rc<RefCell<VisualLog>>,
}

impl ActorVisual for RecordingVisual {
    fn set_position(&mut self, position: Vec2) {
        self.log
            .borrow_mut()
            .positions
            .insert(self.name.clone(), position);
    }

    fn set_dimmed(&mut self, dimmed: bool) {
        self.log.borrow_mut().events.push(VisualEvent::Dimmed {
            name: self.name.clone(),
            dimmed,
        });
    }

    fn destroy(self: Box<Self>) {
        let mut log = self.log.borrow_mut();
        log.positions.remove(&self.name);
        log.events.push(VisualEvent::Destroyed {
            name: self.name.clone(),
        });
    }
}

/// A dialogue line exactly as it was handed to the renderer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShownLine {
    pub slot: Option<Slot>,
    pub speaker: Option<String>,
    pub text: String,
}

#[derive(Debug, Default)]
struct DialogueLog {
    lines: Vec<ShownLine>,
    panel: Option<DialoguePanel>,
    panel_updates: usize,
}

#[derive(Clone, Default)]
pub struct RecordingRenderer {
    log: Rc<RefCell<DialogueLog>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<ShownLine> {
        self.log.borrow().lines.clone()
    }

    pub fn last_panel(&self) -> Option<DialoguePanel> {
        self.log.borrow().panel
    }

    pub fn panel_updates(&self) -> usize {
        self.log.borrow().panel_updates
    }
}

impl DialogueRenderer for RecordingRenderer {
    fn show_line(&mut self, slot: Option<Slot>, speaker: Option<&str>, text: &str) {
        self.log.borrow_mut().lines.push(ShownLine {
            slot,
            speaker: speaker.map(|value| value.to_string()),
            text: text.to_string(),
        });
    }

    fn update_panel(&mut self, panel: &DialoguePanel) {
        let mut log = self.log.borrow_mut();
        log.panel = Some(*panel);
        log.panel_updates += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_clones_share_one_log() {
        let factory = RecordingFactory::new();
        let mut handle = factory.clone();
        let mut visual = handle.spawn("actor", "Jon");
        visual.set_position(Vec2::new(1.0, 2.0));
        visual.set_dimmed(true);
        assert_eq!(factory.live_visuals(), vec!["Jon"]);
        visual.destroy();

        assert_eq!(
            factory.events(),
            vec![
                VisualEvent::Spawned {
                    name: "Jon".into(),
                    template: "actor".into()
                },
                VisualEvent::Dimmed {
                    name: "Jon".into(),
                    dimmed: true
                },
                VisualEvent::Destroyed { name: "Jon".into() },
            ]
        );
        assert!(factory.live_visuals().is_empty());
        assert_eq!(factory.position_of("Jon"), None);
    }

    #[test]
    fn renderer_keeps_lines_verbatim() {
        let renderer = RecordingRenderer::new();
        let mut handle = renderer.clone();
        handle.show_line(Some(Slot::Left), Some("Jon"), "Is it...<s>illegal");
        handle.show_line(None, None, "narration");

        let lines = renderer.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Is it...<s>illegal");
        assert_eq!(lines[0].speaker.as_deref(), Some("Jon"));
        assert_eq!(lines[1].slot, None);
    }
}
