//! Software-rendered marker window using `minifb`.
//!
//! The window is the size of the sensor's color image.  Each frame it draws
//! the head and hand markers from a [`MarkerOverlay`] and puts the session
//! status in the title bar.
//!
//! | Key | Action |
//! |---|---|
//! | `C` | Show / hide markers |
//! | `Right` / `D` (hold) | Simulated: extend right arm |
//! | `Left` / `A` (hold) | Simulated: extend left arm |
//! | `H` | Simulated: lose / regain hand tracking |
//! | `B` | Simulated: presenter steps out / back in |
//! | `Q` / `Escape` | Quit |

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use skeleton_gesture::MarkerOverlay;

use crate::error::AppError;
use crate::sensor::{SimInput, SimKey};

const BG_COLOR:      u32 = 0xFF101820;
const OUTLINE_COLOR: u32 = 0xFF000000;
const OUTLINE_PX:    f32 = 2.0;

pub struct Overlay {
    window: Window,
    buf:    Vec<u32>,
    width:  usize,
    height: usize,
    /// Present only when the simulated sensor is in use.
    sim_tx: Option<Sender<SimInput>>,
}

impl Overlay {
    pub fn new(width: usize, height: usize, sim_tx: Option<Sender<SimInput>>) -> Result<Self, AppError> {
        let mut window = Window::new(
            "slide_control",
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| AppError::Window(e.to_string()))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Overlay {
            window,
            buf: vec![BG_COLOR; width * height],
            width,
            height,
            sim_tx,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Handle keyboard input.  Returns false when the user asked to quit.
    pub fn poll_input(&mut self, markers: &mut MarkerOverlay) -> bool {
        if !self.window.is_open() { return false; }

        let pressed = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        if pressed(Key::Q) || pressed(Key::Escape) {
            return false;
        }
        if pressed(Key::C) {
            markers.toggle();
        }

        if let Some(tx) = &self.sim_tx {
            let released = |k: Key| self.window.is_key_released(k);
            let held_keys = [
                (SimKey::ExtendRight, [Key::Right, Key::D]),
                (SimKey::ExtendLeft,  [Key::Left,  Key::A]),
            ];
            for (sim, keys) in held_keys {
                if keys.iter().any(|&k| pressed(k)) {
                    let _ = tx.send(SimInput::KeyDown(sim));
                }
                if keys.iter().any(|&k| released(k)) {
                    let _ = tx.send(SimInput::KeyUp(sim));
                }
            }
            if pressed(Key::H) {
                let _ = tx.send(SimInput::KeyDown(SimKey::ToggleHands));
            }
            if pressed(Key::B) {
                let _ = tx.send(SimInput::KeyDown(SimKey::ToggleBody));
            }
        }
        true
    }

    /// Render one frame.
    pub fn render(&mut self, markers: &MarkerOverlay, status: &str) {
        self.buf.fill(BG_COLOR);

        for (_, placement) in markers.visible_markers() {
            let r = placement.style.diameter as f32 / 2.0;
            let (cx, cy) = (placement.center.x, placement.center.y);
            self.fill_circle(cx, cy, r + OUTLINE_PX, OUTLINE_COLOR);
            self.fill_circle(cx, cy, r, placement.style.color);
        }

        self.window.set_title(status);
        self.window.update_with_buffer(&self.buf, self.width, self.height).ok();
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: u32) {
        if !(cx.is_finite() && cy.is_finite()) { return; }
        let x0 = (cx - r).floor().max(0.0) as usize;
        let y0 = (cy - r).floor().max(0.0) as usize;
        let x1 = ((cx + r).ceil().max(0.0) as usize).min(self.width);
        let y1 = ((cy + r).ceil().max(0.0) as usize).min(self.height);
        let r2 = r * r;

        for row in y0..y1 {
            let dy = row as f32 + 0.5 - cy;
            for col in x0..x1 {
                let dx = col as f32 + 0.5 - cx;
                if dx * dx + dy * dy <= r2 {
                    self.buf[row * self.width + col] = color;
                }
            }
        }
    }
}
