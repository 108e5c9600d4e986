//! # slide_control
//!
//! Desktop host for [`skeleton_gesture`]: reads skeleton frames from a
//! sensor, draws joint markers over the color image and sends Next /
//! Previous to the slideshow.
//!
//! ## Sources
//!
//! * (default) **Simulated**: a presenter and a bystander, posed from the
//!   overlay window's keyboard.
//! * `--replay FILE`: a JSON-lines recording, one `SkeletonFrame` (or
//!   `null`) per line.
//!
//! ## Feature flags
//!
//! * (default): commands are logged.
//! * `uinput`: commands are typed as Right / Left arrow keys through a
//!   virtual keyboard (Linux only).
//!
//! ### Overlay keyboard shortcuts
//!
//! | Key | Action |
//! |---|---|
//! | `C` | Show / hide joint markers |
//! | `Right` / `D` (hold) | Extend the simulated right arm |
//! | `Left` / `A` (hold) | Extend the simulated left arm |
//! | `H` | Simulated hands lose / regain tracking |
//! | `B` | Simulated presenter leaves / returns |
//! | `Q` / `Escape` | Quit |

pub mod config;
pub mod error;
pub mod sensor;
pub mod output;
pub mod session;
pub mod overlay;
pub mod app;
pub mod cli;
