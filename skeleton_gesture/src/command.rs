//! Directional commands and the surface that receives them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

/// A slide navigation command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Next,
    Previous,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Next     => "next",
            Command::Previous => "previous",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whatever relays commands to the application that has input focus.
///
/// Delivery is a single best-effort send: there is no acknowledgement from
/// the focused application, and callers do not retry.
pub trait CommandSurface {
    fn send(&mut self, command: Command) -> Result<(), DispatchError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

impl<S: CommandSurface + ?Sized> CommandSurface for Box<S> {
    fn send(&mut self, command: Command) -> Result<(), DispatchError> {
        (**self).send(command)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
