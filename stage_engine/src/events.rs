use serde::Serialize;

use crate::markup::MarkupIssue;
use crate::slots::Slot;

fn vec_is_empty<T>(vec: &Vec<T>) -> bool {
    vec.is_empty()
}

/// Timeline entries recorded by the director as a script plays.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StageEvent {
    PanelRaised,
    ActorEntered {
        direction: usize,
        name: String,
        slot: Slot,
    },
    LineShown {
        direction: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        speaker: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        slot: Option<Slot>,
        text: String,
        dimmed: Vec<String>,
        #[serde(skip_serializing_if = "vec_is_empty")]
        markup_issues: Vec<MarkupIssue>,
    },
    LineCleared {
        direction: usize,
    },
    ActorLeft {
        direction: usize,
        name: String,
        slot: Slot,
    },
    Finished,
    Failed {
        direction: Option<usize>,
        error: String,
    },
    Cancelled {
        direction: Option<usize>,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimedEvent {
    pub frame: u64,
    pub time: f32,
    #[serde(flatten)]
    pub event: StageEvent,
}
