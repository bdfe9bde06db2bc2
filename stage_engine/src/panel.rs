use serde::Serialize;

use crate::config::StageLayout;
use crate::slots::Slot;
use crate::tween::smoothstep;

/// Renders dialogue lines and the panel behind them.
///
/// Lines may carry custom markup such as `<w>wave</w>`; the renderer owns
/// its interpretation and receives the text exactly as scripted.
pub trait DialogueRenderer {
    fn show_line(&mut self, slot: Option<Slot>, speaker: Option<&str>, text: &str);

    /// Called every frame while the panel is being raised.
    fn update_panel(&mut self, _panel: &DialoguePanel) {}
}

/// Visibility of the dialogue panel. It is raised once at the start of a
/// cutscene and stays up until the director is reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DialoguePanel {
    pub alpha: f32,
    pub y: f32,
    pub raised: bool,
}

impl DialoguePanel {
    pub fn hidden(layout: &StageLayout) -> Self {
        Self {
            alpha: 0.0,
            y: layout.panel_start_y(),
            raised: false,
        }
    }

    /// Applies raise progress `t`. The square root front-loads the motion so
    /// the panel is mostly in place well before the tween ends.
    pub(crate) fn apply_raise(&mut self, layout: &StageLayout, t: f32) {
        let s = t.clamp(0.0, 1.0).sqrt();
        let from = layout.panel_start_y();
        let to = layout.panel_rest_y;
        self.alpha = s;
        self.y = from + (to - from) * smoothstep(s);
        self.raised = t >= 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_moves_from_start_to_rest() {
        let layout = StageLayout::default();
        let mut panel = DialoguePanel::hidden(&layout);
        assert_eq!(panel.alpha, 0.0);
        assert_eq!(panel.y, layout.panel_start_y());
        assert!(!panel.raised);

        panel.apply_raise(&layout, 0.25);
        assert_eq!(panel.alpha, 0.5);
        assert!(!panel.raised);
        assert!(panel.y > layout.panel_start_y() && panel.y < layout.panel_rest_y);

        panel.apply_raise(&layout, 1.0);
        assert_eq!(panel.alpha, 1.0);
        assert_eq!(panel.y, layout.panel_rest_y);
        assert!(panel.raised);
    }
}
