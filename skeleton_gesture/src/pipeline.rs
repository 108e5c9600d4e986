//! Per-frame orchestration: select a subject, validate its joints, update the
//! markers, then run both gesture latches.
//!
//! Every early exit is silent.  An empty room or a hand behind the body is the
//! normal state of affairs at 30 frames per second, so the outcome is reported
//! as a [`FrameOutcome`] variant rather than an error.

use tracing::{debug, info, warn};

use crate::command::{Command, CommandSurface};
use crate::config::GestureConfig;
use crate::detector::{Direction, GestureDetector, Transition};
use crate::error::DispatchError;
use crate::feedback::{CoordinateMapper, FeedbackSink, Marker};
use crate::joint::{JointKind, SkeletonFrame};
use crate::selector::select_subject;

// ════════════════════════════════════════════════════════════════════════════
// Outcome
// ════════════════════════════════════════════════════════════════════════════

/// One command sent this frame and what the surface said.
#[derive(Clone, Debug, PartialEq)]
pub struct Dispatch {
    pub command: Command,
    pub result:  Result<(), DispatchError>,
}

/// What happened to a frame that made it through validation.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureReport {
    pub tracking_id: u32,
    pub forward:     Transition,
    pub back:        Transition,
    pub dispatched:  Vec<Dispatch>,
}

impl GestureReport {
    pub fn commands(&self) -> impl Iterator<Item = Command> + '_ {
        self.dispatched.iter().map(|d| d.command)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FrameOutcome {
    /// The frame handle was gone before it could be read.
    NoFrame,
    /// Nobody fully tracked.
    NoSubject,
    /// The selected subject is missing this joint.
    JointNotTracked(JointKind),
    Processed(GestureReport),
}

impl FrameOutcome {
    /// Commands sent for this frame, if any.
    pub fn commands(&self) -> Vec<Command> {
        match self {
            FrameOutcome::Processed(report) => report.commands().collect(),
            _ => Vec::new(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FramePipeline
// ════════════════════════════════════════════════════════════════════════════

/// Owns the two gesture latches, the only state that survives between frames.
///
/// `process` takes `&mut self`, so frames are handled one at a time; a
/// multi-threaded sensor must funnel its frames to a single owner.
#[derive(Clone, Debug)]
pub struct FramePipeline {
    config:  GestureConfig,
    forward: GestureDetector,
    back:    GestureDetector,
}

impl FramePipeline {
    pub fn new(config: GestureConfig) -> Self {
        FramePipeline {
            forward: GestureDetector::new(Direction::Forward, config.threshold_m),
            back:    GestureDetector::new(Direction::Back, config.threshold_m),
            config,
        }
    }

    pub fn config(&self) -> &GestureConfig { &self.config }

    pub fn detector(&self, direction: Direction) -> &GestureDetector {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Back    => &self.back,
        }
    }

    pub fn is_active(&self, direction: Direction) -> bool {
        self.detector(direction).is_active()
    }

    /// Clear both latches (session start).
    pub fn reset(&mut self) {
        self.forward.reset();
        self.back.reset();
    }

    /// Run one frame through the pipeline.
    ///
    /// `frame` is `None` when the sensor's frame handle was invalid.
    pub fn process<M, F, S>(
        &mut self,
        frame:    Option<&SkeletonFrame>,
        mapper:   &M,
        feedback: &mut F,
        commands: &mut S,
    ) -> FrameOutcome
    where
        M: CoordinateMapper + ?Sized,
        F: FeedbackSink + ?Sized,
        S: CommandSurface + ?Sized,
    {
        // 1. frame handle
        let Some(frame) = frame else {
            return FrameOutcome::NoFrame;
        };

        // 2. subject
        let Some(subject) = select_subject(&frame.subjects) else {
            self.on_track_lost();
            return FrameOutcome::NoSubject;
        };

        // 3. joints
        let position = |kind| {
            subject.joint(kind)
                .filter(|j| j.is_tracked())
                .map(|j| j.position)
                .ok_or(kind)
        };
        let (head, left, right) = match (
            position(JointKind::Head),
            position(JointKind::HandLeft),
            position(JointKind::HandRight),
        ) {
            (Ok(head), Ok(left), Ok(right)) => (head, left, right),
            (Err(kind), _, _) | (_, Err(kind), _) | (_, _, Err(kind)) => {
                debug!(tracking_id = subject.tracking_id, joint = kind.as_str(), "joint not tracked");
                self.on_track_lost();
                return FrameOutcome::JointNotTracked(kind);
            }
        };

        // 4. markers, styled by the latch state coming into this frame
        feedback.place_marker(Marker::Head, mapper.map(head), false);
        feedback.place_marker(Marker::LeftHand, mapper.map(left), self.back.is_active());
        feedback.place_marker(Marker::RightHand, mapper.map(right), self.forward.is_active());

        // 5. latches
        let mut dispatched = Vec::new();
        let forward = self.forward.update(head, right);
        if forward == Transition::Fired {
            dispatched.push(send(commands, Direction::Forward.command()));
        }
        let back = self.back.update(head, left);
        if back == Transition::Fired {
            dispatched.push(send(commands, Direction::Back.command()));
        }

        FrameOutcome::Processed(GestureReport {
            tracking_id: subject.tracking_id,
            forward,
            back,
            dispatched,
        })
    }

    fn on_track_lost(&mut self) {
        if self.config.reset_on_track_loss && (self.forward.is_active() || self.back.is_active()) {
            debug!("track lost, clearing gesture latches");
            self.reset();
        }
    }
}

fn send<S: CommandSurface + ?Sized>(surface: &mut S, command: Command) -> Dispatch {
    let result = surface.send(command);
    match &result {
        Ok(())   => info!(%command, surface = surface.name(), "command sent"),
        Err(err) => warn!(%command, surface = surface.name(), %err, "command not delivered"),
    }
    Dispatch { command, result }
}
