//! Skeleton sensors, simulated from the keyboard or replayed from disk.
//!
//! The public interface is [`FrameReady`] delivered over a single-slot
//! channel.  The session doesn't need to know which source produced a frame.
//!
//! Each source runs on its own thread and owns nothing the session touches.
//! Frames reach the session's single consumer through a `sync_channel(1)`, so
//! at most one frame is ever waiting; a live source that finds the slot full
//! drops its frame instead of queueing it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TryRecvError, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use skeleton_gesture::{
    BodyTracking, CoordinateMapper, DisplayPoint, JointKind, JointSample, SkeletonFrame, Subject, Vec3,
};
use tracing::{debug, info, trace, warn};

use crate::config::{SensorConfig, SourceKind};
use crate::error::SessionError;

// ════════════════════════════════════════════════════════════════════════════
// Frame delivery
// ════════════════════════════════════════════════════════════════════════════

/// One frame-ready notification.  `None` means the frame expired before it
/// could be read.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReady(pub Option<SkeletonFrame>);

/// Raised by the session to end a source's thread.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Producer end of the frame slot.
#[derive(Clone)]
pub struct FrameSender {
    tx:      SyncSender<FrameReady>,
    dropped: Arc<AtomicU64>,
}

impl FrameSender {
    /// Hand over a frame if the consumer is idle, otherwise drop it.
    /// Returns `false` once the consumer has gone away.
    pub fn offer(&self, frame: FrameReady) -> bool {
        match self.tx.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                trace!("consumer busy, frame dropped");
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Wait for the consumer to take the frame.
    pub fn deliver(&self, frame: FrameReady) -> bool {
        self.tx.send(frame).is_ok()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SkeletonSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can produce skeleton frames on its own thread.
pub trait SkeletonSource: Send + 'static {
    fn name(&self) -> &str;

    /// Produce frames until the stream ends, the consumer disconnects, or
    /// `stop` is raised.
    fn run(self: Box<Self>, frames: FrameSender, stop: StopSignal);
}

/// A running source.  Stopping joins the thread; dropping the handle stops it.
pub struct SensorHandle {
    name:    String,
    stop:    StopSignal,
    dropped: Arc<AtomicU64>,
    thread:  Option<JoinHandle<()>>,
}

impl SensorHandle {
    /// Spawn `source` and return the consumer end of its frame slot.
    pub fn start(source: Box<dyn SkeletonSource>) -> (SensorHandle, Receiver<FrameReady>) {
        let (tx, rx) = mpsc::sync_channel(1);
        let stop = StopSignal::default();
        let dropped = Arc::new(AtomicU64::new(0));
        let name = source.name().to_string();

        let sender = FrameSender { tx, dropped: Arc::clone(&dropped) };
        let signal = stop.clone();
        let thread = thread::spawn(move || source.run(sender, signal));
        info!(sensor = %name, "sensor started");

        (SensorHandle { name, stop, dropped, thread: Some(thread) }, rx)
    }

    pub fn name(&self) -> &str { &self.name }

    /// Frames a live source discarded because the consumer was busy.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Stop delivery and release the source.
    ///
    /// Drop the frame receiver first if the source may be blocked in
    /// [`FrameSender::deliver`].
    pub fn stop(&mut self) {
        let Some(thread) = self.thread.take() else { return };
        self.stop.raise();
        if thread.join().is_err() {
            warn!(sensor = %self.name, "sensor thread panicked");
        }
        info!(sensor = %self.name, dropped = self.dropped_frames(), "sensor stopped");
    }
}

impl Drop for SensorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn frame_period(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / fps.max(1) as f64)
}

// ════════════════════════════════════════════════════════════════════════════
// PinholeMapper
// ════════════════════════════════════════════════════════════════════════════

/// Projects body space onto the color image with a pinhole camera model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinholeMapper {
    pub width:    f32,
    pub height:   f32,
    pub focal_px: f32,
}

impl PinholeMapper {
    pub fn from_config(cfg: &SensorConfig) -> Self {
        PinholeMapper {
            width:    cfg.color_width as f32,
            height:   cfg.color_height as f32,
            focal_px: cfg.focal_length_px,
        }
    }
}

impl CoordinateMapper for PinholeMapper {
    fn map(&self, p: Vec3) -> DisplayPoint {
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        if p.z <= 0.0 {
            return DisplayPoint { x: cx, y: cy };
        }
        DisplayPoint {
            x: cx + self.focal_px * p.x / p.z,
            // body +y is up, screen +y is down
            y: cy - self.focal_px * p.y / p.z,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimulatedSensor
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the overlay window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    KeyDown(SimKey),
    KeyUp(SimKey),
}

/// Simulated controls (mapped from minifb keys).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    ExtendRight, // Right / D, held
    ExtendLeft,  // Left / A, held
    ToggleHands, // H
    ToggleBody,  // B
}

/// Pose of the simulated presenter.
#[derive(Clone, Debug, PartialEq)]
pub struct SimPose {
    pub right_extended: bool,
    pub left_extended:  bool,
    pub hands_tracked:  bool,
    pub body_tracked:   bool,
}

impl Default for SimPose {
    fn default() -> Self {
        SimPose { right_extended: false, left_extended: false, hands_tracked: true, body_tracked: true }
    }
}

const PRESENTER_ID: u32 = 1;
const BYSTANDER_ID: u32 = 2;

impl SimPose {
    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::KeyDown(SimKey::ExtendRight) => self.right_extended = true,
            SimInput::KeyUp(SimKey::ExtendRight)   => self.right_extended = false,
            SimInput::KeyDown(SimKey::ExtendLeft)  => self.left_extended = true,
            SimInput::KeyUp(SimKey::ExtendLeft)    => self.left_extended = false,
            SimInput::KeyDown(SimKey::ToggleHands) => self.hands_tracked = !self.hands_tracked,
            SimInput::KeyDown(SimKey::ToggleBody)  => self.body_tracked = !self.body_tracked,
            SimInput::KeyUp(_) => {}
        }
    }

    /// The presenter two meters out on the center line, plus a bystander
    /// further back and off to the side.
    pub fn frame(&self, timestamp_ms: u64) -> SkeletonFrame {
        let presenter_tracking = if self.body_tracked {
            BodyTracking::Tracked
        } else {
            BodyTracking::PositionOnly
        };
        let presenter = body(
            PRESENTER_ID,
            presenter_tracking,
            Vec3::new(0.0, 0.0, 2.0),
            self.right_extended,
            self.left_extended,
            self.hands_tracked,
        );
        let bystander = body(BYSTANDER_ID, BodyTracking::Tracked, Vec3::new(1.2, 0.0, 3.5), false, false, true);
        SkeletonFrame { timestamp_ms, subjects: vec![presenter, bystander] }
    }
}

fn body(id: u32, tracking: BodyTracking, at: Vec3, right_out: bool, left_out: bool, hands: bool) -> Subject {
    let head = Vec3::new(at.x, at.y + 0.55, at.z);
    let hand = |side: f32, out: bool| {
        if out {
            Vec3::new(at.x + side * 0.70, at.y + 0.35, at.z - 0.10)
        } else {
            Vec3::new(at.x + side * 0.20, at.y - 0.20, at.z - 0.05)
        }
    };
    let sample = |kind, position| {
        if hands { JointSample::tracked(kind, position) } else { JointSample::not_tracked(kind) }
    };
    Subject {
        tracking_id: id,
        tracking,
        position: at,
        joints: vec![
            JointSample::tracked(JointKind::Head, head),
            sample(JointKind::HandLeft, hand(-1.0, left_out)),
            sample(JointKind::HandRight, hand(1.0, right_out)),
        ],
    }
}

/// Keyboard-driven stand-in for a depth camera.
pub struct SimulatedSensor {
    input: Receiver<SimInput>,
    fps:   u32,
    pose:  SimPose,
}

impl SimulatedSensor {
    pub fn new(fps: u32) -> (Self, Sender<SimInput>) {
        let (tx, rx) = mpsc::channel();
        (SimulatedSensor { input: rx, fps, pose: SimPose::default() }, tx)
    }
}

impl SkeletonSource for SimulatedSensor {
    fn name(&self) -> &str { "simulated" }

    fn run(mut self: Box<Self>, frames: FrameSender, stop: StopSignal) {
        let period = frame_period(self.fps);
        let mut timestamp_ms = 0u64;
        while !stop.is_raised() {
            loop {
                match self.input.try_recv() {
                    Ok(input) => {
                        debug!(?input, "simulated input");
                        self.pose.apply(input);
                    }
                    Err(TryRecvError::Empty) => break,
                    // window gone; keep the last pose until stopped
                    Err(TryRecvError::Disconnected) => break,
                }
            }
            if !frames.offer(FrameReady(Some(self.pose.frame(timestamp_ms)))) {
                return;
            }
            timestamp_ms += period.as_millis() as u64;
            thread::sleep(period);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplaySensor
// ════════════════════════════════════════════════════════════════════════════

/// Plays back a JSON-lines recording: one [`SkeletonFrame`] per line, or
/// `null` for a frame that could not be read.  Blank lines are skipped.
pub struct ReplaySensor {
    path:    PathBuf,
    frames:  Vec<Option<SkeletonFrame>>,
    fps:     u32,
    looping: bool,
}

impl ReplaySensor {
    pub fn open(path: &Path, fps: u32, looping: bool) -> Result<Self, SessionError> {
        let text = fs::read_to_string(path).map_err(|e| SessionError::NoSensor {
            reason: format!("cannot read recording {}: {e}", path.display()),
        })?;
        let frames = parse_recording(&text)?;
        if frames.is_empty() {
            return Err(SessionError::NoSensor {
                reason: format!("recording {} has no frames", path.display()),
            });
        }
        Ok(ReplaySensor { path: path.to_path_buf(), frames, fps, looping })
    }
}

pub fn parse_recording(text: &str) -> Result<Vec<Option<SkeletonFrame>>, SessionError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| SessionError::BadRecording { line: i + 1, source })
        })
        .collect()
}

impl SkeletonSource for ReplaySensor {
    fn name(&self) -> &str { "replay" }

    fn run(self: Box<Self>, frames: FrameSender, stop: StopSignal) {
        let period = frame_period(self.fps);
        info!(path = %self.path.display(), frames = self.frames.len(), looping = self.looping, "replaying");
        loop {
            for frame in &self.frames {
                if stop.is_raised() || !frames.deliver(FrameReady(frame.clone())) {
                    return;
                }
                thread::sleep(period);
            }
            if !self.looping {
                debug!("recording finished");
                return;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// open_sensor
// ════════════════════════════════════════════════════════════════════════════

/// A source ready to start, with the projection for its color image.
pub struct OpenedSensor {
    pub source:    Box<dyn SkeletonSource>,
    pub mapper:    PinholeMapper,
    /// Keyboard feed for the simulated sensor.
    pub sim_input: Option<Sender<SimInput>>,
}

pub fn open_sensor(cfg: &SensorConfig) -> Result<OpenedSensor, SessionError> {
    let mapper = PinholeMapper::from_config(cfg);
    match &cfg.source {
        SourceKind::Simulated => {
            let (sensor, input) = SimulatedSensor::new(cfg.fps);
            Ok(OpenedSensor { source: Box::new(sensor), mapper, sim_input: Some(input) })
        }
        SourceKind::Replay { path, looping } => {
            let sensor = ReplaySensor::open(path, cfg.fps, *looping)?;
            Ok(OpenedSensor { source: Box::new(sensor), mapper, sim_input: None })
        }
    }
}
