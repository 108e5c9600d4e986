//! Gesture tunables.

use serde::{Deserialize, Serialize};

use crate::detector::EXTENSION_THRESHOLD_M;
use crate::error::ConfigError;

/// Tunables for the gesture pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Hand-to-head horizontal distance, in meters, that counts as extended.
    pub threshold_m: f32,
    /// Clear both latches when the subject or one of its joints is lost.
    /// Off by default: losing track mid-gesture leaves the latch as it was.
    pub reset_on_track_loss: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            threshold_m:         EXTENSION_THRESHOLD_M,
            reset_on_track_loss: false,
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold_m.is_finite() || self.threshold_m <= 0.0 {
            return Err(ConfigError::InvalidThreshold(self.threshold_m));
        }
        Ok(())
    }
}
