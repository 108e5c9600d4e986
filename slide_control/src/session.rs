//! The session context: everything that lives from sensor start to teardown.
//!
//! `Session` owns the gesture pipeline, the marker overlay state, the command
//! surface and the camera projection, and is the only thing that touches
//! them.  Frames are handed in one at a time through [`Session::handle`].

use skeleton_gesture::{
    CommandSurface, CoordinateMapper, Direction, FrameOutcome, FramePipeline, GestureConfig, MarkerOverlay,
};
use tracing::trace;

use crate::sensor::FrameReady;

/// Running totals for one session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames:            u64,
    pub invalid_frames:    u64,
    pub no_subject:        u64,
    pub untracked_joints:  u64,
    pub processed:         u64,
    pub commands_sent:     u64,
    pub dispatch_failures: u64,
}

impl SessionStats {
    fn record(&mut self, outcome: &FrameOutcome) {
        self.frames += 1;
        match outcome {
            FrameOutcome::NoFrame            => self.invalid_frames += 1,
            FrameOutcome::NoSubject          => self.no_subject += 1,
            FrameOutcome::JointNotTracked(_) => self.untracked_joints += 1,
            FrameOutcome::Processed(report)  => {
                self.processed += 1;
                for d in &report.dispatched {
                    if d.result.is_ok() {
                        self.commands_sent += 1;
                    } else {
                        self.dispatch_failures += 1;
                    }
                }
            }
        }
    }
}

pub struct Session {
    pipeline: FramePipeline,
    mapper:   Box<dyn CoordinateMapper>,
    overlay:  MarkerOverlay,
    commands: Box<dyn CommandSurface>,
    stats:    SessionStats,
    tracking: bool,
}

impl Session {
    pub fn new(
        gesture:  GestureConfig,
        mapper:   Box<dyn CoordinateMapper>,
        commands: Box<dyn CommandSurface>,
    ) -> Self {
        Session {
            pipeline: FramePipeline::new(gesture),
            mapper,
            overlay: MarkerOverlay::new(),
            commands,
            stats: SessionStats::default(),
            tracking: false,
        }
    }

    /// Process one frame-ready notification.
    pub fn handle(&mut self, ready: FrameReady) -> FrameOutcome {
        let outcome = self.pipeline.process(
            ready.0.as_ref(),
            self.mapper.as_ref(),
            &mut self.overlay,
            &mut self.commands,
        );
        trace!(?outcome, "frame");
        self.stats.record(&outcome);
        match &outcome {
            FrameOutcome::NoFrame => {}
            FrameOutcome::Processed(_) => self.tracking = true,
            _ => self.tracking = false,
        }
        outcome
    }

    pub fn stats(&self) -> &SessionStats { &self.stats }
    pub fn overlay(&self) -> &MarkerOverlay { &self.overlay }
    pub fn overlay_mut(&mut self) -> &mut MarkerOverlay { &mut self.overlay }

    /// One-line summary for the window title.
    pub fn status_line(&self) -> String {
        let mut line = String::from(if self.tracking { "tracking" } else { "no presenter" });
        for d in Direction::ALL {
            let latch = if self.pipeline.is_active(d) { "ON" } else { "off" };
            line.push_str(&format!("  {}:{}", d.as_str(), latch));
        }
        line.push_str(&format!(
            "  sent:{}  markers:{}  [C] markers  [Q] quit",
            self.stats.commands_sent,
            if self.overlay.is_visible() { "shown" } else { "hidden" },
        ));
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{PinholeMapper, SimInput, SimKey, SimPose};
    use skeleton_gesture::{Command, DispatchError, Marker};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<Command>>>);

    impl CommandSurface for Shared {
        fn send(&mut self, command: Command) -> Result<(), DispatchError> {
            self.0.lock().unwrap().push(command);
            Ok(())
        }
        fn name(&self) -> &str { "shared" }
    }

    struct Refuse;

    impl CommandSurface for Refuse {
        fn send(&mut self, _: Command) -> Result<(), DispatchError> {
            Err(DispatchError::Rejected { reason: "no window".into() })
        }
        fn name(&self) -> &str { "refuse" }
    }

    fn mapper() -> Box<dyn CoordinateMapper> {
        Box::new(PinholeMapper { width: 640.0, height: 480.0, focal_px: 531.15 })
    }

    fn pose_frame(pose: &SimPose) -> FrameReady {
        FrameReady(Some(pose.frame(0)))
    }

    #[test]
    fn simulated_arm_swing_sends_next_once() {
        let sent = Shared::default();
        let mut session = Session::new(GestureConfig::default(), mapper(), Box::new(sent.clone()));
        let mut pose = SimPose::default();

        session.handle(pose_frame(&pose));
        pose.apply(SimInput::KeyDown(SimKey::ExtendRight));
        for _ in 0..30 {
            session.handle(pose_frame(&pose));
        }
        pose.apply(SimInput::KeyUp(SimKey::ExtendRight));
        session.handle(pose_frame(&pose));

        assert_eq!(*sent.0.lock().unwrap(), vec![Command::Next]);
        assert_eq!(session.stats().commands_sent, 1);
        assert_eq!(session.stats().processed, 32);
    }

    #[test]
    fn stats_count_each_outcome() {
        let mut session = Session::new(GestureConfig::default(), mapper(), Box::new(Refuse));
        let mut pose = SimPose::default();

        session.handle(FrameReady(None));
        pose.apply(SimInput::KeyDown(SimKey::ExtendLeft));
        session.handle(pose_frame(&pose));
        pose.apply(SimInput::KeyDown(SimKey::ToggleHands));
        session.handle(pose_frame(&pose));
        session.handle(FrameReady(Some(Default::default())));

        let stats = session.stats();
        assert_eq!(stats.frames, 4);
        assert_eq!(stats.invalid_frames, 1);
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.dispatch_failures, 1);
        assert_eq!(stats.untracked_joints, 1);
        assert_eq!(stats.no_subject, 1);
        assert_eq!(stats.commands_sent, 0);
    }

    #[test]
    fn markers_land_on_the_color_image() {
        let mut session = Session::new(GestureConfig::default(), mapper(), Box::new(Shared::default()));
        session.handle(pose_frame(&SimPose::default()));
        let head = session.overlay().placement(Marker::Head).unwrap().center;
        assert_eq!(head.x, 320.0);
        assert!(head.y < 240.0);
    }

    #[test]
    fn status_reflects_toggle_and_latch() {
        let mut session = Session::new(GestureConfig::default(), mapper(), Box::new(Shared::default()));
        assert!(session.status_line().starts_with("no presenter"));

        let mut pose = SimPose::default();
        pose.apply(SimInput::KeyDown(SimKey::ExtendRight));
        session.handle(pose_frame(&pose));
        session.overlay_mut().toggle();

        let status = session.status_line();
        assert!(status.contains("forward:ON  back:off"), "{status}");
        assert!(status.contains("markers:hidden"), "{status}");
    }
}
