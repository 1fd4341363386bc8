//! # Arm control telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use structopt::{clap::AppSettings, StructOpt};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command that can be completed by arm control.
///
/// All angles are given in the display frame, i.e. with the configured
/// convention offset not yet applied to the base joint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, StructOpt)]
#[structopt(name = "arm")]
pub enum ArmCmd {
    /// Compute the end effector pose from joint angles.
    ///
    /// Also produces the servo command string that would drive the arm to
    /// those angles.
    #[structopt(name = "fk", setting = AppSettings::AllowNegativeNumbers)]
    ForwardKinematics {
        /// Joint angles in degrees, base joint first. One per link.
        #[structopt(required = true, min_values = 2, max_values = 3)]
        angles_deg: Vec<f64>,
    },

    /// Compute both joint angle solutions reaching a target position.
    #[structopt(name = "ik", setting = AppSettings::AllowNegativeNumbers)]
    InverseKinematics {
        /// Horizontal position of the target from the base.
        ///
        /// Units: millimeters
        px_mm: f64,

        /// Vertical position of the target from the base.
        ///
        /// Units: millimeters
        py_mm: f64,

        /// Desired end effector orientation in degrees, required for 3 link arms.
        #[structopt(long = "phi")]
        phi_deg: Option<f64>,

        /// Index of the solution to run (0 = elbow A, 1 = elbow B).
        ///
        /// The chosen solution is checked with forward kinematics and its servo
        /// command string is produced.
        #[structopt(long = "run")]
        run: Option<usize>,
    },

    /// Estimate the gripper jaw opening from a servo pulse width.
    #[structopt(name = "grip")]
    Gripper {
        /// Pulse width currently applied to the gripper servo.
        ///
        /// Units: microseconds
        pulse_us: f64,
    },

    /// Change the angle convention offset used by subsequent commands.
    ///
    /// 90 measures the base joint from vertical, 0 from the positive x axis.
    #[structopt(name = "offset", setting = AppSettings::AllowNegativeNumbers)]
    SetOffset {
        /// Offset in degrees.
        offset_deg: f64,
    },
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ArmCmd {
    /// Parse a command from a single line of text, e.g. `ik 150 80 --phi 0`.
    pub fn from_line(line: &str) -> Result<Self, structopt::clap::Error> {
        Self::from_iter_safe(std::iter::once("arm").chain(line.split_whitespace()))
    }
}
