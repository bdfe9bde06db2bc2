use std::{
    fs,
    path::{Path, PathBuf},
};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::slots::Slot;

/// Stage geometry in scene units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageLayout {
    /// Playable width; actors enter and exit just past `width / 2`.
    pub width: f32,
    /// Extra distance beyond the stage edge where entering actors start.
    pub offstage_margin: f32,
    pub far_left_x: f32,
    pub left_x: f32,
    pub right_x: f32,
    pub far_right_x: f32,
    /// Resting height shared by every anchor.
    pub anchor_y: f32,
    /// Resting height of the dialogue panel once raised.
    pub panel_rest_y: f32,
    /// The panel starts at `panel_rest_y * panel_start_scale`.
    pub panel_start_scale: f32,
}

impl Default for StageLayout {
    fn default() -> Self {
        Self {
            width: 1920.0,
            offstage_margin: 300.0,
            far_left_x: -720.0,
            left_x: -360.0,
            right_x: 360.0,
            far_right_x: 720.0,
            anchor_y: 0.0,
            panel_rest_y: -380.0,
            panel_start_scale: 4.0,
        }
    }
}

impl StageLayout {
    pub fn anchor(&self, slot: Slot) -> Vec2 {
        let x = match slot {
            Slot::FarLeft => self.far_left_x,
            Slot::Left => self.left_x,
            Slot::Right => self.right_x,
            Slot::FarRight => self.far_right_x,
        };
        Vec2::new(x, self.anchor_y)
    }

    pub fn panel_start_y(&self) -> f32 {
        self.panel_rest_y * self.panel_start_scale
    }
}

/// Durations, in clock time units, of each animated step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub panel_raise: f32,
    pub enter: f32,
    pub message_hold: f32,
    pub leave: f32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            panel_raise: 0.75,
            enter: 1.0,
            message_hold: 5.0,
            leave: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub layout: StageLayout,
    pub timings: Timings,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read stage config {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse stage config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid stage config: {0}")]
    Invalid(String),
}

impl StageConfig {
    /// Loads a config file, falling back to defaults when no path is given.
    /// Fields missing from the file keep their default values.
    pub fn from_json_file(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: StageConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        if !(layout.width.is_finite() && layout.width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "stage width must be positive (got {})",
                layout.width
            )));
        }
        if !(layout.offstage_margin.is_finite() && layout.offstage_margin >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "offstage margin must be non-negative (got {})",
                layout.offstage_margin
            )));
        }
        let timings = [
            ("panel_raise", self.timings.panel_raise),
            ("enter", self.timings.enter),
            ("message_hold", self.timings.message_hold),
            ("leave", self.timings.leave),
        ];
        for (name, value) in timings {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "timing {name} must be a non-negative number (got {value})"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_stage_timings() {
        let config = StageConfig::default();
        assert_eq!(config.timings.enter, 1.0);
        assert_eq!(config.timings.leave, 1.0);
        assert_eq!(config.timings.message_hold, 5.0);
        assert_eq!(config.timings.panel_raise, 0.75);
        assert_eq!(config.layout.panel_start_y(), -1520.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = StageConfig::from_json_file(None).expect("defaults");
        assert_eq!(config, StageConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stage.json");
        let mut file = fs::File::create(&path).expect("create config");
        write!(file, r#"{{"timings": {{"message_hold": 2.5}}, "layout": {{"width": 800}}}}"#)
            .expect("write config");

        let config = StageConfig::from_json_file(Some(&path)).expect("load config");
        assert_eq!(config.timings.message_hold, 2.5);
        assert_eq!(config.timings.enter, 1.0);
        assert_eq!(config.layout.width, 800.0);
        assert_eq!(config.layout.offstage_margin, 300.0);
    }

    #[test]
    fn unreadable_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.json");
        let err = StageConfig::from_json_file(Some(&path)).expect_err("missing file");
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn rejects_negative_timings() {
        let err = StageConfig::from_json_str(r#"{"timings": {"enter": -1}}"#)
            .expect_err("negative timing");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_width() {
        let err = StageConfig::from_json_str(r#"{"layout": {"width": 0}}"#).expect_err("zero width");
        assert!(err.to_string().contains("width"));
    }
}
