//! # Servo Controller Commands
//!
//! The serial servo controller board accepts one token per channel,
//! `#<channel> P<pulse> S<speed>`, and a full command is the space separated
//! list of tokens, e.g. `#0 P1500 S1000 #2 P1500 S1000`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Demand for a single servo channel.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServoCmd {
    /// Hardware channel on the controller board.
    pub channel: u8,

    /// Pulse width to drive the servo to.
    ///
    /// Units: microseconds
    pub pulse_us: u32,

    /// Move speed passed through to the controller board.
    pub speed: u32,
}

/// A full command for the controller board, one [`ServoCmd`] per joint in joint order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServoCommand {
    pub cmds: Vec<ServoCmd>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl fmt::Display for ServoCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} P{} S{}", self.channel, self.pulse_us, self.speed)
    }
}

impl fmt::Display for ServoCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.cmds.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", cmd)?;
        }

        Ok(())
    }
}

impl From<Vec<ServoCmd>> for ServoCommand {
    fn from(cmds: Vec<ServoCmd>) -> Self {
        Self { cmds }
    }
}
