//! Command-line flags.  Anything given here overrides the config file.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{AppConfig, OutputKind, SourceKind};
use crate::error::AppError;

#[derive(Debug, Parser)]
#[command(name = "slide_control", version, about = "Page through slides by extending an arm")]
pub struct Cli {
    /// JSON config file; every field is optional.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Replay a JSON-lines skeleton recording instead of the simulated sensor.
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,

    /// Restart the recording when it ends.
    #[arg(long = "loop", requires = "replay")]
    pub looping: bool,

    /// Run without the marker window (needs a recording).
    #[arg(long)]
    pub headless: bool,

    /// Where slide commands go.
    #[arg(long, value_enum)]
    pub output: Option<OutputKind>,

    /// Extension distance in meters.
    #[arg(long, value_name = "METERS")]
    pub threshold: Option<f32>,

    /// Clear gesture state whenever the presenter is lost.
    #[arg(long)]
    pub reset_on_track_loss: bool,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Build the effective configuration: file (or defaults), then flags.
    pub fn into_config(self) -> Result<AppConfig, AppError> {
        let mut cfg = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(path) = self.replay {
            cfg.sensor.source = SourceKind::Replay { path, looping: self.looping };
        }
        if self.headless {
            cfg.overlay = false;
        }
        if let Some(output) = self.output {
            cfg.output = output;
        }
        if let Some(threshold) = self.threshold {
            cfg.gesture.threshold_m = threshold;
        }
        if self.reset_on_track_loss {
            cfg.gesture.reset_on_track_loss = true;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}
