//! Error types for the gesture core.
//!
//! Missing or untracked bodies are not errors; see
//! [`FrameOutcome`](crate::pipeline::FrameOutcome).

use thiserror::Error;

/// The command surface did not accept a directional command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No device or target to deliver to.
    #[error("command surface unavailable: {reason}")]
    Unavailable { reason: String },

    /// The target refused or failed to process the command.
    #[error("command rejected: {reason}")]
    Rejected { reason: String },
}

/// Invalid gesture configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("extension threshold must be a positive number of meters, got {0}")]
    InvalidThreshold(f32),
}
