//! Per-frame body data as delivered by the depth sensor.
//!
//! Everything here is produced fresh for each frame and dropped at the end of
//! that frame's processing.  Nothing in this module carries state across
//! frames.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Vec3
// ════════════════════════════════════════════════════════════════════════════

/// A position in sensor body space, in meters.
///
/// `x` grows to the sensor's right, `y` upward, `z` away from the sensor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Joints
// ════════════════════════════════════════════════════════════════════════════

/// The joints the gesture logic reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointKind {
    Head,
    HandLeft,
    HandRight,
}

impl JointKind {
    pub const REQUIRED: [JointKind; 3] = [JointKind::Head, JointKind::HandLeft, JointKind::HandRight];

    pub fn as_str(&self) -> &'static str {
        match self {
            JointKind::Head      => "head",
            JointKind::HandLeft  => "hand_left",
            JointKind::HandRight => "hand_right",
        }
    }
}

/// Sensor confidence for one joint.
///
/// `Inferred` joints are positioned from neighbouring joints rather than seen
/// directly; they are still usable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointTracking {
    Tracked,
    Inferred,
    NotTracked,
}

/// One joint of one body in one frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointSample {
    pub kind:     JointKind,
    pub position: Vec3,
    pub tracking: JointTracking,
}

impl JointSample {
    pub fn tracked(kind: JointKind, position: Vec3) -> Self {
        JointSample { kind, position, tracking: JointTracking::Tracked }
    }

    pub fn not_tracked(kind: JointKind) -> Self {
        JointSample { kind, position: Vec3::default(), tracking: JointTracking::NotTracked }
    }

    pub fn is_tracked(&self) -> bool {
        self.tracking != JointTracking::NotTracked
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Subject
// ════════════════════════════════════════════════════════════════════════════

/// Overall tracking quality of a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyTracking {
    /// Full skeleton available.
    Tracked,
    /// Only the body's center position is known; joints are meaningless.
    PositionOnly,
    NotTracked,
}

/// One tracked human body within a frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub tracking_id: u32,
    pub tracking:    BodyTracking,
    /// Center of the body.
    pub position:    Vec3,
    #[serde(default)]
    pub joints:      Vec<JointSample>,
}

impl Subject {
    /// First sample of `kind`.  A joint the sensor did not report at all is
    /// treated the same as one reported as not tracked.
    pub fn joint(&self, kind: JointKind) -> Option<&JointSample> {
        self.joints.iter().find(|j| j.kind == kind)
    }

    pub fn is_fully_tracked(&self) -> bool {
        self.tracking == BodyTracking::Tracked
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SkeletonFrame
// ════════════════════════════════════════════════════════════════════════════

/// All bodies the sensor reported for one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonFrame {
    #[serde(default)]
    pub timestamp_ms: u64,
    #[serde(default)]
    pub subjects:     Vec<Subject>,
}
