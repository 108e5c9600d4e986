//! Application configuration, loaded from a JSON file and overridden from the
//! command line.
//!
//! Every field has a default, so `{}` is a valid config file:
//!
//! ```json
//! {
//!   "gesture": { "threshold_m": 0.45, "reset_on_track_loss": false },
//!   "sensor":  { "source": { "kind": "replay", "path": "talk.jsonl", "looping": false }, "fps": 30 },
//!   "output":  "uinput",
//!   "overlay": true
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use skeleton_gesture::GestureConfig;

use crate::error::AppError;

// ════════════════════════════════════════════════════════════════════════════
// Sensor
// ════════════════════════════════════════════════════════════════════════════

/// Where skeleton frames come from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceKind {
    /// Synthetic presenter driven from the overlay window's keyboard.
    #[default]
    Simulated,
    /// JSON-lines recording of skeleton frames.
    Replay {
        path: PathBuf,
        #[serde(default)]
        looping: bool,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub source:          SourceKind,
    /// Frame rate of the skeleton stream.
    pub fps:             u32,
    /// Color image the markers are drawn over.
    pub color_width:     u32,
    pub color_height:    u32,
    pub focal_length_px: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        SensorConfig {
            source:          SourceKind::Simulated,
            fps:             30,
            color_width:     640,
            color_height:    480,
            focal_length_px: 531.15,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Output
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Log each command; nothing is typed.
    #[default]
    Log,
    /// Press arrow keys through a virtual keyboard (Linux, `uinput` feature).
    Uinput,
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gesture: GestureConfig,
    pub sensor:  SensorConfig,
    pub output:  OutputKind,
    /// Open the marker window.  Off means headless.
    pub overlay: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            gesture: GestureConfig::default(),
            sensor:  SensorConfig::default(),
            output:  OutputKind::default(),
            overlay: true,
        }
    }
}

impl AppConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let contents = fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.gesture.validate()?;

        let s = &self.sensor;
        if s.fps == 0 {
            return Err(AppError::Config("sensor fps must be at least 1".into()));
        }
        if s.color_width == 0 || s.color_height == 0 {
            return Err(AppError::Config(format!(
                "color image must not be empty, got {}x{}",
                s.color_width, s.color_height
            )));
        }
        if !s.focal_length_px.is_finite() || s.focal_length_px <= 0.0 {
            return Err(AppError::Config(format!(
                "focal length must be positive, got {}",
                s.focal_length_px
            )));
        }
        if !self.overlay && s.source == SourceKind::Simulated {
            return Err(AppError::Config(
                "the simulated sensor is driven from the overlay window; use a replay source when headless".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parses_replay_source() {
        let cfg: AppConfig = serde_json::from_str(
            r#"{"sensor":{"source":{"kind":"replay","path":"talk.jsonl"},"fps":15},"output":"uinput","overlay":false}"#,
        )
        .unwrap();
        assert_eq!(
            cfg.sensor.source,
            SourceKind::Replay { path: PathBuf::from("talk.jsonl"), looping: false }
        );
        assert_eq!(cfg.sensor.fps, 15);
        assert_eq!(cfg.sensor.color_width, 640);
        assert_eq!(cfg.output, OutputKind::Uinput);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn headless_simulation_is_rejected() {
        let cfg = AppConfig { overlay: false, ..AppConfig::default() };
        assert!(matches!(cfg.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn bad_threshold_is_a_gesture_error() {
        let mut cfg = AppConfig::default();
        cfg.gesture.threshold_m = -1.0;
        assert!(matches!(cfg.validate(), Err(AppError::Gesture(_))));
    }

    #[test]
    fn zero_fps_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.sensor.fps = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = AppConfig::load(Path::new("/nonexistent/slide_control.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/slide_control.json"));
    }
}
