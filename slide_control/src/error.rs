use std::io;
use std::path::PathBuf;

use skeleton_gesture::ConfigError;
use thiserror::Error;

/// Problems that end a session before it starts.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Nothing to read skeletons from.  Reported once; never retried.
    #[error("this application requires a skeleton sensor: {reason}")]
    NoSensor { reason: String },

    #[error("recording line {line} is not a skeleton frame: {source}")]
    BadRecording {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("invalid gesture settings: {0}")]
    Gesture(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("window error: {0}")]
    Window(String),
}
