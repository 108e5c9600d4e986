//! Frame-sequence behavior of the pipeline as seen from the outside:
//! which commands reach the surface for a given run of frames.

use skeleton_gesture::{
    BodyTracking, Command, CommandSurface, CoordinateMapper, Direction, DispatchError, DisplayPoint,
    FrameOutcome, FramePipeline, GestureConfig, JointKind, JointSample, JointTracking, MarkerOverlay,
    SkeletonFrame, Subject, Vec3,
};

struct Identity;

impl CoordinateMapper for Identity {
    fn map(&self, p: Vec3) -> DisplayPoint {
        DisplayPoint { x: p.x, y: p.y }
    }
}

#[derive(Default)]
struct Sent(Vec<Command>);

impl CommandSurface for Sent {
    fn send(&mut self, command: Command) -> Result<(), DispatchError> {
        self.0.push(command);
        Ok(())
    }
    fn name(&self) -> &str { "sent" }
}

struct Session {
    pipeline: FramePipeline,
    overlay:  MarkerOverlay,
    sent:     Sent,
}

impl Session {
    fn new() -> Self {
        Session {
            pipeline: FramePipeline::new(GestureConfig::default()),
            overlay:  MarkerOverlay::new(),
            sent:     Sent::default(),
        }
    }

    fn feed(&mut self, frame: &SkeletonFrame) -> FrameOutcome {
        self.pipeline.process(Some(frame), &Identity, &mut self.overlay, &mut self.sent)
    }
}

const HEAD_X: f32 = 0.05;

/// A presenter whose right hand is `right` meters right of the head and left
/// hand `left` meters left of it.
fn presenter(right: f32, left: f32) -> Subject {
    Subject {
        tracking_id: 11,
        tracking: BodyTracking::Tracked,
        position: Vec3::new(HEAD_X, 0.0, 2.0),
        joints: vec![
            JointSample::tracked(JointKind::Head, Vec3::new(HEAD_X, 0.6, 2.0)),
            JointSample::tracked(JointKind::HandRight, Vec3::new(HEAD_X + right, 0.3, 1.9)),
            JointSample::tracked(JointKind::HandLeft, Vec3::new(HEAD_X - left, 0.3, 1.9)),
        ],
    }
}

fn frame_of(subject: Subject) -> SkeletonFrame {
    SkeletonFrame { timestamp_ms: 0, subjects: vec![subject] }
}

#[test]
fn held_extension_fires_exactly_once() {
    for len in [1, 2, 10, 300] {
        let mut s = Session::new();
        for _ in 0..len {
            s.feed(&frame_of(presenter(0.6, 0.0)));
        }
        assert_eq!(s.sent.0, vec![Command::Next], "hold of {len} frames");
    }
}

#[test]
fn oscillating_offset_fires_twice() {
    let mut s = Session::new();
    let fired: Vec<Vec<Command>> = [0.50, 0.40, 0.50]
        .into_iter()
        .map(|offset| s.feed(&frame_of(presenter(offset, 0.0))).commands())
        .collect();

    assert_eq!(fired, vec![vec![Command::Next], vec![], vec![Command::Next]]);
    assert_eq!(s.sent.0.len(), 2);
}

#[test]
fn reset_frame_clears_latch() {
    let mut s = Session::new();
    s.feed(&frame_of(presenter(0.50, 0.0)));
    assert!(s.pipeline.is_active(Direction::Forward));
    s.feed(&frame_of(presenter(0.40, 0.0)));
    assert!(!s.pipeline.is_active(Direction::Forward));
}

#[test]
fn any_untracked_joint_freezes_everything() {
    for missing in JointKind::REQUIRED {
        let mut s = Session::new();
        // Latch the back gesture so a frozen state is observable.
        s.feed(&frame_of(presenter(0.0, 0.6)));
        assert!(s.pipeline.is_active(Direction::Back));

        let mut blind = presenter(0.6, 0.0);
        for j in blind.joints.iter_mut().filter(|j| j.kind == missing) {
            j.tracking = JointTracking::NotTracked;
        }
        let outcome = s.feed(&frame_of(blind));

        assert_eq!(outcome, FrameOutcome::JointNotTracked(missing));
        assert!(s.pipeline.is_active(Direction::Back), "{missing:?}");
        assert!(!s.pipeline.is_active(Direction::Forward), "{missing:?}");
        assert_eq!(s.sent.0, vec![Command::Previous], "{missing:?}");
    }
}

#[test]
fn directions_are_independent() {
    let mut s = Session::new();
    s.feed(&frame_of(presenter(0.0, 0.6)));
    assert!(s.pipeline.is_active(Direction::Back));

    // Forward fires while back stays held; back must neither re-fire nor reset.
    let outcome = s.feed(&frame_of(presenter(0.6, 0.6)));
    assert_eq!(outcome.commands(), vec![Command::Next]);
    assert!(s.pipeline.is_active(Direction::Back));

    // Forward released, back untouched.
    s.feed(&frame_of(presenter(0.0, 0.6)));
    assert!(!s.pipeline.is_active(Direction::Forward));
    assert!(s.pipeline.is_active(Direction::Back));
    assert_eq!(s.sent.0, vec![Command::Previous, Command::Next]);
}

#[test]
fn closest_centered_subject_drives_gestures() {
    let mut s = Session::new();

    // A: z=2, x=0.1 (score 0.2) arms relaxed.  B: z=1, x=3 (score 3) arm out.
    let mut a = presenter(0.0, 0.0);
    a.tracking_id = 1;
    a.position = Vec3::new(0.1, 0.0, 2.0);
    let mut b = presenter(0.8, 0.0);
    b.tracking_id = 2;
    b.position = Vec3::new(3.0, 0.0, 1.0);

    let frame = SkeletonFrame { timestamp_ms: 0, subjects: vec![b, a] };
    match s.feed(&frame) {
        FrameOutcome::Processed(report) => assert_eq!(report.tracking_id, 1),
        other => panic!("unexpected {other:?}"),
    }
    assert!(s.sent.0.is_empty());
}

#[test]
fn untracked_bodies_produce_no_subject() {
    let mut s = Session::new();
    let mut ghost = presenter(0.8, 0.0);
    ghost.tracking = BodyTracking::PositionOnly;
    let mut gone = presenter(0.8, 0.0);
    gone.tracking = BodyTracking::NotTracked;

    let frame = SkeletonFrame { timestamp_ms: 0, subjects: vec![ghost, gone] };
    assert_eq!(s.feed(&frame), FrameOutcome::NoSubject);
    assert!(s.sent.0.is_empty());
}

#[test]
fn toggle_twice_is_identity() {
    let mut overlay = MarkerOverlay::new();
    let start = overlay.is_visible();
    overlay.toggle();
    overlay.toggle();
    assert_eq!(overlay.is_visible(), start);
}
