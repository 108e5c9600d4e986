//! # skeleton_gesture
//!
//! Turns depth-camera skeleton frames into slide navigation commands.
//!
//! ## Gesture → Command mapping
//!
//! | Gesture | Hand | Condition | Command |
//! |---|---|---|---|
//! | Forward | Right | `hand.x > head.x + 0.45 m` | [`Command::Next`] |
//! | Back | Left | `hand.x < head.x - 0.45 m` | [`Command::Previous`] |
//!
//! Each gesture fires once when the arm goes out and re-arms when it comes
//! back in; holding the arm out does not repeat the command.
//!
//! ## Per-frame flow
//!
//! ```text
//! SkeletonFrame ─▶ select_subject ─▶ head / hands tracked? ─▶ markers ─▶ latches ─▶ CommandSurface
//! ```
//!
//! [`FramePipeline`] runs that flow and owns the two latches.  The sensor,
//! the display and the command target are traits ([`CoordinateMapper`],
//! [`FeedbackSink`], [`CommandSurface`]) implemented by the host application.

pub mod joint;
pub mod selector;
pub mod detector;
pub mod command;
pub mod feedback;
pub mod config;
pub mod error;
pub mod pipeline;

pub use command::{Command, CommandSurface};
pub use config::GestureConfig;
pub use detector::{Direction, GestureDetector, LatchState, Transition, EXTENSION_THRESHOLD_M};
pub use error::{ConfigError, DispatchError};
pub use feedback::{CoordinateMapper, DisplayPoint, FeedbackSink, Marker, MarkerOverlay, MarkerPlacement, MarkerStyle};
pub use joint::{BodyTracking, JointKind, JointSample, JointTracking, SkeletonFrame, Subject, Vec3};
pub use pipeline::{Dispatch, FrameOutcome, FramePipeline, GestureReport};
pub use selector::{select_subject, subject_score};
