//! Edge-triggered gesture latches.
//!
//! One [`GestureDetector`] per [`Direction`].  Each is a two-state machine:
//!
//! | State    | Extended? | Next state | Transition |
//! |----------|-----------|------------|------------|
//! | Inactive | yes       | Active     | `Fired`    |
//! | Active   | yes       | Active     | `Held`     |
//! | Active   | no        | Inactive   | `Released` |
//! | Inactive | no        | Inactive   | `Idle`     |
//!
//! Only `Fired` causes a command to be sent, so holding an arm out produces
//! exactly one command no matter how many frames it stays out.

use tracing::debug;

use crate::command::Command;
use crate::joint::{JointKind, Vec3};

/// Horizontal hand-to-head distance (meters) that counts as an extended arm.
pub const EXTENSION_THRESHOLD_M: f32 = 0.45;

// ════════════════════════════════════════════════════════════════════════════
// Direction
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Right arm out to the right.
    Forward,
    /// Left arm out to the left.
    Back,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Forward, Direction::Back];

    pub fn hand(self) -> JointKind {
        match self {
            Direction::Forward => JointKind::HandRight,
            Direction::Back    => JointKind::HandLeft,
        }
    }

    pub fn command(self) -> Command {
        match self {
            Direction::Forward => Command::Next,
            Direction::Back    => Command::Previous,
        }
    }

    /// Mirrored extension test: the hand must be more than `threshold` beyond
    /// the head on this direction's side.
    pub fn is_extended(self, head: Vec3, hand: Vec3, threshold: f32) -> bool {
        match self {
            Direction::Forward => hand.x > head.x + threshold,
            Direction::Back    => hand.x < head.x - threshold,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Back    => "back",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Latch
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LatchState {
    #[default]
    Inactive,
    Active,
}

/// Which edge of the state table one update took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Inactive → Active.  The caller must dispatch the command.
    Fired,
    /// Active → Active.
    Held,
    /// Active → Inactive.
    Released,
    /// Inactive → Inactive.
    Idle,
}

#[derive(Clone, Debug)]
pub struct GestureDetector {
    direction: Direction,
    threshold: f32,
    state:     LatchState,
}

impl GestureDetector {
    pub fn new(direction: Direction, threshold: f32) -> Self {
        GestureDetector { direction, threshold, state: LatchState::Inactive }
    }

    pub fn direction(&self) -> Direction { self.direction }
    pub fn state(&self)     -> LatchState { self.state }
    pub fn is_active(&self) -> bool      { self.state == LatchState::Active }

    /// Evaluate one frame's head and hand positions.
    pub fn update(&mut self, head: Vec3, hand: Vec3) -> Transition {
        let extended = self.direction.is_extended(head, hand, self.threshold);
        let transition = match (self.state, extended) {
            (LatchState::Inactive, true)  => Transition::Fired,
            (LatchState::Active,   true)  => Transition::Held,
            (LatchState::Active,   false) => Transition::Released,
            (LatchState::Inactive, false) => Transition::Idle,
        };
        self.state = if extended { LatchState::Active } else { LatchState::Inactive };

        if matches!(transition, Transition::Fired | Transition::Released) {
            debug!(
                direction = self.direction.as_str(),
                ?transition,
                offset = hand.x - head.x,
                "gesture latch changed"
            );
        }
        transition
    }

    /// Force the latch back to `Inactive` without firing.
    pub fn reset(&mut self) {
        self.state = LatchState::Inactive;
    }
}
