//! Parameters structure for ArmCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::{AngleConvention, ArmCtrlError, LinkChain};
use crate::servo_ctrl::{GripperConfig, GripperMap, ServoChannelConfig, ServoError, ServoMap};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Arm control.
///
/// Loaded once per session and only read while a command is processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    // ---- GEOMETRY ----
    /// Length of each link, base link first. Either 2 or 3 links.
    ///
    /// Units: millimeters
    pub link_lengths_mm: LinkChain,

    /// Offset between the display frame and the mathematical frame of the
    /// base joint. 90 measures the base joint from vertical, 0 from the
    /// positive x axis.
    ///
    /// Units: degrees
    #[serde(default)]
    pub angle_offset_deg: f64,

    // ---- SERVOS ----
    /// Speed passed to the servo controller with every demand.
    pub command_speed: u32,

    /// Calibration of each joint servo, in joint order. Must have one entry
    /// per link.
    pub servos: Vec<ServoChannelConfig>,

    /// Calibration of the gripper servo.
    pub gripper: GripperConfig,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        let servo = |channel| ServoChannelConfig {
            channel,
            min_angle_deg: -90.0,
            max_angle_deg: 90.0,
            min_pulse_us: 500,
            max_pulse_us: 2500,
        };

        Self {
            link_lengths_mm: LinkChain::default(),
            angle_offset_deg: AngleConvention::VERTICAL_ZERO.offset_deg,
            command_speed: 1000,
            servos: vec![servo(0), servo(2), servo(3)],
            gripper: GripperConfig {
                pulse_open_us: 500.0,
                pulse_closed_us: 2500.0,
                mm_open: 50.0,
            },
        }
    }
}

impl Params {
    /// Determines if the parameters are valid, building the servo and
    /// gripper maps they describe.
    pub fn validate(&self) -> Result<(ServoMap, GripperMap), ArmCtrlError> {
        Ok((self.servo_map()?, self.gripper_map()?))
    }

    /// The angle convention the parameters select.
    pub fn convention(&self) -> AngleConvention {
        AngleConvention::new(self.angle_offset_deg)
    }

    /// Build the joint servo map, checking there is one servo per link.
    pub fn servo_map(&self) -> Result<ServoMap, ArmCtrlError> {
        if self.servos.len() != self.link_lengths_mm.num_links() {
            return Err(ArmCtrlError::ServoCountMismatch {
                expected: self.link_lengths_mm.num_links(),
                found: self.servos.len(),
            });
        }

        Ok(ServoMap::new(self.servos.clone(), self.command_speed)?)
    }

    pub fn gripper_map(&self) -> Result<GripperMap, ServoError> {
        GripperMap::new(self.gripper)
    }
}
