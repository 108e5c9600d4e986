//! Top-level run loop.
//!
//! `run` opens the sensor and the command surface, starts the sensor thread
//! and feeds every frame-ready notification through one [`Session`].  With
//! the overlay on, the loop also polls the window and redraws it; headless,
//! it blocks on the frame slot until the source runs out.

use std::sync::mpsc::{Receiver, TryRecvError};

use tracing::{error, info};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::output::open_command_surface;
use crate::overlay::Overlay;
use crate::sensor::{open_sensor, FrameReady, SensorHandle};
use crate::session::{Session, SessionStats};

pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    run_session(cfg).map(|_| ())
}

/// Same as [`run`], handing back the final stats.
pub fn run_session(cfg: AppConfig) -> Result<SessionStats, AppError> {
    cfg.validate()?;

    // ── Sensor ────────────────────────────────────────────────────────────
    let opened = open_sensor(&cfg.sensor).map_err(|e| {
        error!(error = %e, "no skeleton sensor available");
        e
    })?;

    // ── Session ───────────────────────────────────────────────────────────
    let commands = open_command_surface(cfg.output);
    info!(
        output = commands.name(),
        threshold_m = cfg.gesture.threshold_m,
        reset_on_track_loss = cfg.gesture.reset_on_track_loss,
        "session starting"
    );
    let mut session = Session::new(cfg.gesture, Box::new(opened.mapper), commands);

    // The overlay goes up before the sensor starts so a window failure
    // leaves no thread behind.
    let overlay = if cfg.overlay {
        Some(Overlay::new(
            cfg.sensor.color_width as usize,
            cfg.sensor.color_height as usize,
            opened.sim_input,
        )?)
    } else {
        None
    };

    let (mut sensor, frames) = SensorHandle::start(opened.source);

    match overlay {
        Some(mut overlay) => windowed_loop(&mut session, &mut overlay, &frames),
        None => headless_loop(&mut session, &frames),
    }

    // ── Teardown ──────────────────────────────────────────────────────────
    // A replay source may be parked in a blocking send; release it first.
    drop(frames);
    sensor.stop();

    let stats = session.stats().clone();
    info!(
        sensor = sensor.name(),
        frames = stats.frames,
        processed = stats.processed,
        no_subject = stats.no_subject,
        untracked_joints = stats.untracked_joints,
        invalid_frames = stats.invalid_frames,
        commands_sent = stats.commands_sent,
        dispatch_failures = stats.dispatch_failures,
        dropped_frames = sensor.dropped_frames(),
        "session finished"
    );
    Ok(stats)
}

fn windowed_loop(session: &mut Session, overlay: &mut Overlay, frames: &Receiver<FrameReady>) {
    let mut source_done = false;

    while overlay.is_open() {
        // 1. Keys: marker toggle, quit, simulated pose
        if !overlay.poll_input(session.overlay_mut()) { break; }

        // 2. Drain ready frames
        while !source_done {
            match frames.try_recv() {
                Ok(ready) => { session.handle(ready); }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!("sensor stream ended");
                    source_done = true;
                }
            }
        }

        // 3. Render
        let status = session.status_line();
        overlay.render(session.overlay(), &status);
    }
}

fn headless_loop(session: &mut Session, frames: &Receiver<FrameReady>) {
    for ready in frames {
        session.handle(ready);
    }
    info!("sensor stream ended");
}
