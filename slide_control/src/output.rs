//! Command surfaces: where Next and Previous end up.
//!
//! With the `uinput` feature on Linux, commands become Right / Left arrow key
//! presses on a virtual keyboard, which the focused slideshow treats like a
//! real keyboard.  Otherwise, or when the virtual keyboard can't be created,
//! commands are only logged.

use skeleton_gesture::{Command, CommandSurface, DispatchError};
use tracing::{info, warn};

use crate::config::OutputKind;

/// Name of the key a command is typed as.
pub fn key_name(command: Command) -> &'static str {
    match command {
        Command::Next     => "Right",
        Command::Previous => "Left",
    }
}

// ── log backend (always available) ────────────────────────────────────────

pub struct LogSurface;

impl CommandSurface for LogSurface {
    fn send(&mut self, command: Command) -> Result<(), DispatchError> {
        info!(%command, key = key_name(command), "slide command");
        Ok(())
    }

    fn name(&self) -> &str { "log" }
}

// ── uinput backend ────────────────────────────────────────────────────────

#[cfg(all(feature = "uinput", target_os = "linux"))]
pub use self::uinput::UinputSurface;

#[cfg(all(feature = "uinput", target_os = "linux"))]
mod uinput {
    use std::io;

    use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
    use evdev::{AttributeSet, EventType, InputEvent, Key};
    use skeleton_gesture::{Command, CommandSurface, DispatchError};

    const DEVICE_NAME: &str = "slide_control virtual keyboard";

    fn key_for(command: Command) -> Key {
        match command {
            Command::Next     => Key::KEY_RIGHT,
            Command::Previous => Key::KEY_LEFT,
        }
    }

    /// Virtual keyboard that types arrow keys into the focused window.
    pub struct UinputSurface {
        device: VirtualDevice,
    }

    impl UinputSurface {
        pub fn open() -> io::Result<Self> {
            let mut keys = AttributeSet::<Key>::new();
            keys.insert(Key::KEY_RIGHT);
            keys.insert(Key::KEY_LEFT);

            let device = VirtualDeviceBuilder::new()?
                .name(DEVICE_NAME)
                .with_keys(&keys)?
                .build()?;
            Ok(UinputSurface { device })
        }

        fn tap(&mut self, key: Key) -> io::Result<()> {
            self.device.emit(&[InputEvent::new(EventType::KEY, key.code(), 1)])?;
            self.device.emit(&[InputEvent::new(EventType::KEY, key.code(), 0)])
        }
    }

    impl CommandSurface for UinputSurface {
        fn send(&mut self, command: Command) -> Result<(), DispatchError> {
            self.tap(key_for(command))
                .map_err(|e| DispatchError::Unavailable { reason: e.to_string() })
        }

        fn name(&self) -> &str { "uinput" }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// open_command_surface: pick a backend, falling back to the log
// ════════════════════════════════════════════════════════════════════════════

pub fn open_command_surface(kind: OutputKind) -> Box<dyn CommandSurface> {
    match kind {
        OutputKind::Log    => Box::new(LogSurface),
        OutputKind::Uinput => open_uinput(),
    }
}

#[cfg(all(feature = "uinput", target_os = "linux"))]
fn open_uinput() -> Box<dyn CommandSurface> {
    match UinputSurface::open() {
        Ok(surface) => {
            info!("virtual keyboard ready");
            Box::new(surface)
        }
        Err(e) => {
            warn!(error = %e, "cannot create virtual keyboard (is /dev/uinput writable?), logging commands instead");
            Box::new(LogSurface)
        }
    }
}

#[cfg(not(all(feature = "uinput", target_os = "linux")))]
fn open_uinput() -> Box<dyn CommandSurface> {
    warn!("built without uinput support, logging commands instead");
    Box::new(LogSurface)
}
