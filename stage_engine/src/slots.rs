use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::StageLayout;

/// One of the four fixed on-stage anchor positions.
///
/// Narration (a line with no speaker) has no slot; it is represented as
/// `Option<Slot>::None` wherever a slot is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    FarLeft,
    Left,
    Right,
    FarRight,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::FarLeft, Slot::Left, Slot::Right, Slot::FarRight];

    /// Which edge of the stage this slot enters from and exits to.
    pub fn side(self) -> Side {
        match self {
            Slot::FarLeft | Slot::Left => Side::Left,
            Slot::Right | Slot::FarRight => Side::Right,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Slot::FarLeft => "far_left",
            Slot::Left => "left",
            Slot::Right => "right",
            Slot::FarRight => "far_right",
        }
    }

    fn index(self) -> usize {
        match self {
            Slot::FarLeft => 0,
            Slot::Left => 1,
            Slot::Right => 2,
            Slot::FarRight => 3,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Horizontal sign of this side of the stage.
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Anchor positions plus the name of whoever currently stands on each slot.
///
/// Occupancy only changes through the director, alongside the matching
/// [`ActorRegistry`](crate::actors::ActorRegistry) update.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotRegistry {
    anchors: [Vec2; 4],
    offstage_x: f32,
    occupants: [Option<String>; 4],
}

impl SlotRegistry {
    pub fn from_layout(layout: &StageLayout) -> Self {
        Self {
            anchors: Slot::ALL.map(|slot| layout.anchor(slot)),
            offstage_x: layout.width / 2.0 + layout.offstage_margin,
            occupants: Default::default(),
        }
    }

    pub fn resolve_anchor(&self, slot: Slot) -> Vec2 {
        self.anchors[slot.index()]
    }

    /// Point just past the stage edge on `side`, at height `y`.
    pub fn offstage(&self, side: Side, y: f32) -> Vec2 {
        Vec2::new(side.sign() * self.offstage_x, y)
    }

    pub fn is_occupied(&self, slot: Slot) -> bool {
        self.occupants[slot.index()].is_some()
    }

    pub fn occupant(&self, slot: Slot) -> Option<&str> {
        self.occupants[slot.index()].as_deref()
    }

    pub(crate) fn occupy(&mut self, slot: Slot, name: &str) {
        let entry = &mut self.occupants[slot.index()];
        debug_assert!(entry.is_none(), "slot {slot} already occupied");
        *entry = Some(name.to_string());
    }

    pub(crate) fn vacate(&mut self, slot: Slot) -> Option<String> {
        self.occupants[slot.index()].take()
    }

    pub(crate) fn clear(&mut self) {
        self.occupants = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_families_split_left_and_right() {
        assert_eq!(Slot::FarLeft.side(), Side::Left);
        assert_eq!(Slot::Left.side(), Side::Left);
        assert_eq!(Slot::Right.side(), Side::Right);
        assert_eq!(Slot::FarRight.side(), Side::Right);
        assert_eq!(Side::Left.sign(), -1.0);
        assert_eq!(Side::Right.sign(), 1.0);
    }

    #[test]
    fn anchors_follow_layout() {
        let layout = StageLayout::default();
        let slots = SlotRegistry::from_layout(&layout);
        for slot in Slot::ALL {
            assert_eq!(slots.resolve_anchor(slot), layout.anchor(slot));
        }
        assert!(slots.resolve_anchor(Slot::FarLeft).x < slots.resolve_anchor(Slot::Left).x);
        assert!(slots.resolve_anchor(Slot::Right).x < slots.resolve_anchor(Slot::FarRight).x);
    }

    #[test]
    fn offstage_points_sit_past_the_stage_edge() {
        let layout = StageLayout {
            width: 1000.0,
            offstage_margin: 300.0,
            ..StageLayout::default()
        };
        let slots = SlotRegistry::from_layout(&layout);
        assert_eq!(slots.offstage(Side::Left, 5.0), Vec2::new(-800.0, 5.0));
        assert_eq!(slots.offstage(Side::Right, 0.0), Vec2::new(800.0, 0.0));
    }

    #[test]
    fn occupancy_tracks_names() {
        let mut slots = SlotRegistry::from_layout(&StageLayout::default());
        assert!(!slots.is_occupied(Slot::Left));
        slots.occupy(Slot::Left, "Jon");
        assert!(slots.is_occupied(Slot::Left));
        assert_eq!(slots.occupant(Slot::Left), Some("Jon"));
        assert!(!slots.is_occupied(Slot::Right));
        assert_eq!(slots.vacate(Slot::Left).as_deref(), Some("Jon"));
        assert!(!slots.is_occupied(Slot::Left));
    }

    #[test]
    fn slots_serialize_as_snake_case() {
        let json = serde_json::to_string(&Slot::FarRight).expect("serialize slot");
        assert_eq!(json, "\"far_right\"");
        let slot: Slot = serde_json::from_str("\"left\"").expect("parse slot");
        assert_eq!(slot, Slot::Left);
    }
}
