//! Servo control module
//!
//! Maps joint angles onto servo pulse widths and assembles the command string
//! for the servo controller board. The gripper servo has its own calibration,
//! see [`GripperMap`].

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod gripper;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::{Deserialize, Serialize};

// Internal
pub use gripper::*;

use crate::arm_ctrl::JointAngles;
use comms_if::eqpt::servo::{ServoCmd, ServoCommand};
use util::maths::lin_map;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Calibration of the servo driving one joint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServoChannelConfig {
    /// Channel of the servo on the controller board.
    pub channel: u8,

    /// Lowest commandable joint angle.
    ///
    /// Units: degrees
    pub min_angle_deg: f64,

    /// Highest commandable joint angle.
    ///
    /// Units: degrees
    pub max_angle_deg: f64,

    /// Pulse width at `min_angle_deg`.
    ///
    /// Units: microseconds
    pub min_pulse_us: u32,

    /// Pulse width at `max_angle_deg`.
    ///
    /// Units: microseconds
    pub max_pulse_us: u32,
}

/// The angle to pulse maps of every joint in the chain, in joint order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServoMap {
    channels: Vec<ServoChannelConfig>,

    speed: u32,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Servo and gripper calibration errors.
///
/// These are configuration errors, raised when the maps are built rather than
/// when they are used.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServoError {
    #[error("Servo channel {channel} has an empty angle or pulse range")]
    DegenerateMapping { channel: u8 },

    #[error("Servo channel {channel} has a minimum angle or pulse above its maximum")]
    InvertedMapping { channel: u8 },

    #[error("The gripper open and closed pulse widths must differ and be finite")]
    DegenerateGripper,

    #[error("The gripper opening must be positive, found {0} mm")]
    InvalidGripperOpening(f64),

    #[error("Expected {expected} joint angles (one per servo channel), found {found}")]
    ChannelCountMismatch { expected: usize, found: usize },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ServoChannelConfig {
    /// Check the ranges are non-empty and increasing.
    pub fn validate(&self) -> Result<(), ServoError> {
        let channel = self.channel;

        if !self.min_angle_deg.is_finite()
            || !self.max_angle_deg.is_finite()
            || self.min_angle_deg == self.max_angle_deg
            || self.min_pulse_us == self.max_pulse_us
        {
            return Err(ServoError::DegenerateMapping { channel });
        }

        if self.min_angle_deg > self.max_angle_deg || self.min_pulse_us > self.max_pulse_us {
            return Err(ServoError::InvertedMapping { channel });
        }

        Ok(())
    }

    /// Pulse width for a joint angle, see [`angle_to_pulse`].
    pub fn angle_to_pulse(&self, angle_deg: f64) -> u32 {
        angle_to_pulse(
            angle_deg,
            self.min_angle_deg,
            self.max_angle_deg,
            self.min_pulse_us,
            self.max_pulse_us,
        )
    }

    /// Whether the angle can be reached without clamping.
    pub fn within_limits(&self, angle_deg: f64) -> bool {
        self.min_angle_deg <= angle_deg && angle_deg <= self.max_angle_deg
    }

    /// The command token for a joint angle.
    pub fn command(&self, angle_deg: f64, speed: u32) -> ServoCmd {
        ServoCmd {
            channel: self.channel,
            pulse_us: self.angle_to_pulse(angle_deg),
            speed,
        }
    }
}

impl ServoMap {
    /// Build the map, validating every channel.
    pub fn new(channels: Vec<ServoChannelConfig>, speed: u32) -> Result<Self, ServoError> {
        for channel in channels.iter() {
            channel.validate()?;
        }

        Ok(Self { channels, speed })
    }

    /// Build the command for a full set of joint angles.
    ///
    /// Returns the command along with a flag per joint which is `true` if
    /// that joint's angle was outside its servo limits and has been clamped.
    pub fn command(&self, angles: &JointAngles) -> Result<(ServoCommand, Vec<bool>), ServoError> {
        if angles.len() != self.channels.len() {
            return Err(ServoError::ChannelCountMismatch {
                expected: self.channels.len(),
                found: angles.len(),
            });
        }

        let mut limited = Vec::with_capacity(self.channels.len());
        let mut cmds = Vec::with_capacity(self.channels.len());

        for (cfg, &angle_deg) in self.channels.iter().zip(angles.iter()) {
            let cmd = cfg.command(angle_deg, self.speed);

            trace!("{:.3} deg -> {}", angle_deg, cmd);

            limited.push(!cfg.within_limits(angle_deg));
            cmds.push(cmd);
        }

        let command = ServoCommand::from(cmds);

        debug!("Servo command: {}", command);

        Ok((command, limited))
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Map a joint angle onto a servo pulse width.
///
/// The angle is clamped into `[min_angle_deg, max_angle_deg]`, mapped
/// linearly onto `[min_pulse_us, max_pulse_us]` and rounded to the nearest
/// microsecond. A `NaN` angle is treated as the minimum angle.
pub fn angle_to_pulse(
    angle_deg: f64,
    min_angle_deg: f64,
    max_angle_deg: f64,
    min_pulse_us: u32,
    max_pulse_us: u32,
) -> u32 {
    // f64::max ignores NaN
    let clamped_deg = angle_deg.max(min_angle_deg).min(max_angle_deg);

    let pulse_us = lin_map(
        (min_angle_deg, max_angle_deg),
        (min_pulse_us as f64, max_pulse_us as f64),
        clamped_deg,
    )
    .round();

    pulse_us as u32
}
